/// Result alias used across the crate.
pub type ReelResult<T> = Result<T, ReelError>;

/// Error taxonomy of the video assembly pipeline.
///
/// Every variant is terminal for the run that produced it: the pipeline never retries and never
/// exposes a partial artifact.
#[derive(thiserror::Error, Debug)]
pub enum ReelError {
    /// The encoding engine could not be loaded or initialized.
    #[error("encoding engine unavailable: {0}")]
    EngineUnavailable(String),

    /// The script had no renderable (non-blank) lines.
    #[error("empty script: no renderable lines")]
    EmptyScript,

    /// The drawing surface or its fonts could not produce a frame.
    #[error("rasterization failed: {0}")]
    RasterizationFailed(String),

    /// The engine ran but did not produce a usable container.
    #[error("encoding failed: {0}")]
    EncodingFailed(String),

    /// Malformed input handed to one of the stages.
    #[error("validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ReelError {
    /// Build a [`ReelError::EngineUnavailable`] value.
    pub fn engine_unavailable(msg: impl Into<String>) -> Self {
        Self::EngineUnavailable(msg.into())
    }

    /// Build a [`ReelError::RasterizationFailed`] value.
    pub fn rasterization(msg: impl Into<String>) -> Self {
        Self::RasterizationFailed(msg.into())
    }

    /// Build a [`ReelError::EncodingFailed`] value.
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::EncodingFailed(msg.into())
    }

    /// Build a [`ReelError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Short stable name of the variant, used in logs and CLI summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EngineUnavailable(_) => "EngineUnavailable",
            Self::EmptyScript => "EmptyScript",
            Self::RasterizationFailed(_) => "RasterizationFailed",
            Self::EncodingFailed(_) => "EncodingFailed",
            Self::Validation(_) => "Validation",
            Self::Other(_) => "Other",
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
