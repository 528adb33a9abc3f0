use crate::foundation::core::FRAME_DURATION_SECS;
use crate::foundation::error::{ReelError, ReelResult};

/// One `file` line of a concat manifest, optionally followed by a `duration` line.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ManifestEntry {
    pub frame_name: String,
    pub duration_secs: Option<u32>,
}

/// Playback list for ffmpeg's concat demuxer.
///
/// Invariant: at least one entry; every entry but the last carries a duration, the last carries
/// none.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Manifest {
    entries: Vec<ManifestEntry>,
}

impl Manifest {
    /// Build the manifest for frames named `names`, in playback order.
    pub fn for_frames<S: AsRef<str>>(names: &[S]) -> ReelResult<Self> {
        let Some(last) = names.len().checked_sub(1) else {
            return Err(ReelError::EmptyScript);
        };
        let entries = names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let name = name.as_ref();
                if name.contains('\'') || name.contains('\n') {
                    return Err(ReelError::validation(format!(
                        "frame name {name:?} cannot be quoted in a concat manifest"
                    )));
                }
                Ok(ManifestEntry {
                    frame_name: name.to_owned(),
                    duration_secs: (i != last).then_some(FRAME_DURATION_SECS),
                })
            })
            .collect::<ReelResult<Vec<_>>>()?;
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[ManifestEntry] {
        &self.entries
    }

    pub fn frame_count(&self) -> usize {
        self.entries.len()
    }

    pub fn duration_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.duration_secs.is_some())
            .count()
    }

    /// Sum of the explicit durations. The terminal frame contributes nothing.
    pub fn nominal_duration_secs(&self) -> u32 {
        self.entries.iter().filter_map(|e| e.duration_secs).sum()
    }

    /// Render the manifest text: `file '<name>'` lines, each non-terminal one followed by
    /// `duration <secs>`.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (i, e) in self.entries.iter().enumerate() {
            if i > 0 {
                out.push('\n');
            }
            out.push_str(&format!("file '{}'", e.frame_name));
            if let Some(d) = e.duration_secs {
                out.push_str(&format!("\nduration {d}"));
            }
        }
        out
    }

    /// Parse manifest text produced by [`Manifest::to_text`].
    pub fn parse(text: &str) -> ReelResult<Self> {
        let mut entries: Vec<ManifestEntry> = Vec::new();
        for (lineno, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            if let Some(rest) = line.strip_prefix("file ") {
                let name = rest
                    .trim()
                    .strip_prefix('\'')
                    .and_then(|s| s.strip_suffix('\''))
                    .ok_or_else(|| {
                        ReelError::validation(format!(
                            "manifest line {}: file name must be single-quoted",
                            lineno + 1
                        ))
                    })?;
                entries.push(ManifestEntry {
                    frame_name: name.to_owned(),
                    duration_secs: None,
                });
            } else if let Some(rest) = line.strip_prefix("duration ") {
                let secs: u32 = rest.trim().parse().map_err(|_| {
                    ReelError::validation(format!(
                        "manifest line {}: invalid duration '{}'",
                        lineno + 1,
                        rest.trim()
                    ))
                })?;
                let entry = entries
                    .last_mut()
                    .filter(|e| e.duration_secs.is_none())
                    .ok_or_else(|| {
                        ReelError::validation(format!(
                            "manifest line {}: duration without a preceding file",
                            lineno + 1
                        ))
                    })?;
                entry.duration_secs = Some(secs);
            } else {
                return Err(ReelError::validation(format!(
                    "manifest line {}: unknown directive '{line}'",
                    lineno + 1
                )));
            }
        }

        let Some((last, init)) = entries.split_last() else {
            return Err(ReelError::validation("manifest has no file entries"));
        };
        if last.duration_secs.is_some() || init.iter().any(|e| e.duration_secs.is_none()) {
            return Err(ReelError::validation(
                "manifest must give every file but the last a duration",
            ));
        }
        Ok(Self { entries })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/manifest.rs"]
mod tests;
