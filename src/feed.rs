//! Topic prediction feed: the records a script is generated for.
//!
//! Only [`TopicPrediction::topic`] feeds the video pipeline; the signal fields are carried for
//! display.

use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};

/// Per-feature contribution to a prediction score.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ShapContribution {
    pub feature: String,
    pub contribution: f64,
}

/// One predicted topic together with the signals behind it.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TopicPrediction {
    pub topic: String,
    pub snapshot_time: String,
    pub google_trends_slope_7d: f64,
    pub tiktok_views_7d: u64,
    pub youtube_avg_retention_48h: f64,
    pub reddit_posts_7d: u64,
    pub creator_collision: u64,
    pub model_prob_60d: f64,
    pub fast_gate_passed: bool,
    pub calibrated: bool,
    #[serde(default)]
    pub shap_explanation: Vec<ShapContribution>,
}

impl TopicPrediction {
    /// Built-in record used whenever the feed cannot be read.
    pub fn fallback() -> Self {
        Self {
            topic: "AI Voice Cloning for Podcasters".to_string(),
            snapshot_time: "2025-11-02T12:00:00Z".to_string(),
            google_trends_slope_7d: 5.4,
            tiktok_views_7d: 890_000,
            youtube_avg_retention_48h: 0.68,
            reddit_posts_7d: 42,
            creator_collision: 9,
            model_prob_60d: 0.93,
            fast_gate_passed: true,
            calibrated: true,
            shap_explanation: vec![
                ShapContribution {
                    feature: "tiktok_views_7d".to_string(),
                    contribution: 0.32,
                },
                ShapContribution {
                    feature: "retention_48h".to_string(),
                    contribution: 0.28,
                },
                ShapContribution {
                    feature: "creator_collision".to_string(),
                    contribution: 0.21,
                },
            ],
        }
    }
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum FeedDoc {
    Many(Vec<TopicPrediction>),
    One(Box<TopicPrediction>),
}

/// Parse a feed document holding either a single record or an array of records.
pub fn parse_feed(json: &str) -> ReelResult<Vec<TopicPrediction>> {
    let doc: FeedDoc = serde_json::from_str(json)
        .map_err(|e| ReelError::validation(format!("invalid prediction feed: {e}")))?;
    Ok(match doc {
        FeedDoc::Many(v) => v,
        FeedDoc::One(p) => vec![*p],
    })
}

/// Load the feed at `path`, falling back to [`TopicPrediction::fallback`] on any failure.
pub fn load_feed(path: &Path) -> Vec<TopicPrediction> {
    let loaded = std::fs::read_to_string(path)
        .map_err(|e| {
            ReelError::Other(anyhow::Error::new(e).context(format!(
                "failed to read prediction feed '{}'",
                path.display()
            )))
        })
        .and_then(|s| parse_feed(&s));

    match loaded {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(%err, "using built-in fallback prediction");
            vec![TopicPrediction::fallback()]
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/feed.rs"]
mod tests;
