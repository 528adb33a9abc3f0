//! Script text: splitting into renderable lines and the built-in generators.

use crate::foundation::error::{ReelError, ReelResult};

/// One non-empty, trimmed line of a script, in source order.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ScriptLine(String);

impl ScriptLine {
    /// Build a line from raw text, trimming it. Blank input is rejected.
    pub fn new(text: impl AsRef<str>) -> ReelResult<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(ReelError::validation("script line must not be blank"));
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ScriptLine {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScriptLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split multi-line script text into renderable lines.
///
/// Lines are trimmed and blank or whitespace-only lines are dropped; the relative order of the
/// remaining lines is preserved. Both `\n` and `\r\n` endings are accepted.
pub fn script_lines(text: &str) -> Vec<ScriptLine> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(|l| ScriptLine(l.to_owned()))
        .collect()
}

/// Producer of script text for a topic.
pub trait ScriptGenerator {
    /// Full multi-line script for `topic`.
    fn script(&self, topic: &str) -> String;

    /// Script for `topic` already split into renderable lines.
    fn lines(&self, topic: &str) -> Vec<ScriptLine> {
        script_lines(&self.script(topic))
    }
}

/// Four-beat shorts script: hook, tease, action, call to action.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShortsTemplate;

impl ScriptGenerator for ShortsTemplate {
    fn script(&self, topic: &str) -> String {
        format!(
            "Hook (0–5s): Can you clone your voice in 10 seconds? — {topic}\n\
             Tease (5–10s): I tried AI voice cloning for my podcast about {topic}.\n\
             Action (10–30s): Here’s how it works—and why it’s blowing up around {topic}.\n\
             CTA (30–35s): Try it and tag #VoiceClonePodcast."
        )
    }
}

/// Timestamped outline for a long-form video on the same topic.
#[derive(Clone, Copy, Debug, Default)]
pub struct LongOutlineTemplate;

impl ScriptGenerator for LongOutlineTemplate {
    fn script(&self, topic: &str) -> String {
        format!(
            "0:00 Intro: What if you could clone your voice for {topic}?\n\
             0:30 Context: Why podcasters covering {topic} are rushing to AI voice tools\n\
             1:00 Step 1: Choose your model (ElevenLabs vs PlayHT) for {topic}\n\
             4:00 Step 2: Record clean audio with tips specific to {topic}\n\
             7:00 Tips: Avoid the “uncanny valley” when discussing {topic}\n\
             9:00 CTA: Like, subscribe, download our {topic} voice template"
        )
    }
}

#[cfg(test)]
#[path = "../tests/unit/script.rs"]
mod tests;
