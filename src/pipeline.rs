//! Run controller: engine load, per-line rendering, staging, encoding.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use anyhow::Context as _;

use crate::encode::engine::EngineLoader;
use crate::encode::invoke::{EncodedVideo, encode};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{ReelError, ReelResult};
use crate::render::raster::Rasterize;
use crate::script::{ScriptGenerator, ScriptLine, script_lines};
use crate::stage::writer::{MANIFEST_NAME, stage};

/// Where the controller is in a run.
///
/// `Idle` and `Ready` are resting states; a new run may start from either. `Failed` is entered
/// when a run aborts and is immediately followed by `Idle`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    LoadingEngine,
    /// `done` of `total` frames rendered so far.
    Rendering {
        done: usize,
        total: usize,
    },
    Staging,
    Encoding,
    Ready,
    /// `kind` is [`ReelError::kind`] of the error, or `"Aborted"` when the run panicked.
    Failed {
        kind: &'static str,
        message: String,
    },
}

impl PipelineState {
    /// `true` while a run owns the controller.
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::LoadingEngine | Self::Rendering { .. } | Self::Staging | Self::Encoding
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::LoadingEngine => "loading-engine",
            Self::Rendering { .. } => "rendering",
            Self::Staging => "staging",
            Self::Encoding => "encoding",
            Self::Ready => "ready",
            Self::Failed { .. } => "failed",
        }
    }
}

/// The result of a successful run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Artifact {
    pub topic: String,
    pub video: EncodedVideo,
    /// Suggested download name, see [`download_file_name`].
    pub file_name: String,
    pub frame_count: usize,
    /// Sum of the manifest's explicit frame durations, before the output cap.
    pub nominal_duration_secs: u32,
}

impl Artifact {
    /// Write the container to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> ReelResult<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create output directory '{}'", parent.display())
            })?;
        }
        std::fs::write(path, self.video.as_bytes())
            .with_context(|| format!("failed to write video '{}'", path.display()))?;
        Ok(())
    }

    /// Write the container into `dir` under [`Artifact::file_name`].
    ///
    /// The name must be a single plain file name; anything that would leave `dir` is rejected.
    pub fn save_in_dir(&self, dir: &Path) -> ReelResult<PathBuf> {
        let mut components = Path::new(&self.file_name).components();
        let plain = matches!(
            (components.next(), components.next()),
            (Some(std::path::Component::Normal(_)), None)
        );
        if !plain || self.file_name.contains(['/', '\\']) {
            return Err(ReelError::validation(format!(
                "artifact file name '{}' is not a plain file name",
                self.file_name
            )));
        }
        let path = dir.join(&self.file_name);
        self.save_to(&path)?;
        Ok(path)
    }
}

/// Download name for a topic: every whitespace run becomes `_`, then `_final.mp4` is appended.
///
/// Path separators are replaced by `_` too, so the name never spans directories.
pub fn download_file_name(topic: &str) -> String {
    let mut out = String::with_capacity(topic.len() + 10);
    let mut in_space = false;
    for c in topic.chars() {
        if c == '/' || c == '\\' {
            out.push('_');
            in_space = false;
        } else if c.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out.push_str("_final.mp4");
    out
}

/// What a call to [`Pipeline::run`] came to.
#[derive(Debug)]
pub enum RunOutcome {
    Ready(Artifact),
    Failed(ReelError),
    /// Another run was active; nothing was done.
    Rejected,
}

impl RunOutcome {
    pub fn into_result(self) -> ReelResult<Artifact> {
        match self {
            Self::Ready(a) => Ok(a),
            Self::Failed(e) => Err(e),
            Self::Rejected => Err(ReelError::validation("another run is already in progress")),
        }
    }
}

/// Callback invoked on every state transition, while the controller's state lock is held.
pub type StateObserver = Box<dyn Fn(&PipelineState) + Send + Sync>;

struct Status {
    state: PipelineState,
    artifact: Option<Artifact>,
    last_diagnostic: Option<String>,
}

struct Components<L, R> {
    loader: L,
    rasterizer: R,
}

/// Drives one run at a time from script lines to an encoded video.
///
/// The controller can be shared between threads. A run requested while another is active returns
/// [`RunOutcome::Rejected`] immediately and leaves the active run untouched.
pub struct Pipeline<L, R> {
    status: Mutex<Status>,
    components: Mutex<Components<L, R>>,
    observer: Option<StateObserver>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<L: EngineLoader, R: Rasterize> Pipeline<L, R> {
    pub fn new(loader: L, rasterizer: R) -> Self {
        Self {
            status: Mutex::new(Status {
                state: PipelineState::Idle,
                artifact: None,
                last_diagnostic: None,
            }),
            components: Mutex::new(Components { loader, rasterizer }),
            observer: None,
        }
    }

    /// Observe state transitions. The observer must not call back into the pipeline.
    pub fn with_observer(mut self, observer: StateObserver) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn state(&self) -> PipelineState {
        lock(&self.status).state.clone()
    }

    /// Artifact of the last run, present only while the controller is `Ready`.
    pub fn artifact(&self) -> Option<Artifact> {
        lock(&self.status).artifact.clone()
    }

    /// Diagnostic of the last failed run, cleared when a new run starts.
    pub fn last_diagnostic(&self) -> Option<String> {
        lock(&self.status).last_diagnostic.clone()
    }

    /// Run the full pipeline for `lines`, captioned with `topic`.
    #[tracing::instrument(skip(self, lines), fields(lines = lines.len()))]
    pub fn run(&self, topic: &str, lines: &[ScriptLine]) -> RunOutcome {
        {
            let mut status = lock(&self.status);
            if status.state.is_active() {
                tracing::debug!(state = status.state.name(), "run rejected");
                return RunOutcome::Rejected;
            }
            status.artifact = None;
            status.last_diagnostic = None;
            self.transition(&mut status, PipelineState::Idle);
            self.transition(&mut status, PipelineState::LoadingEngine);
        }

        let guard = ActiveRun {
            pipeline: self,
            settled: false,
        };
        let result = {
            let mut components = lock(&self.components);
            self.execute(&mut components, topic, lines)
        };
        guard.settle();

        let mut status = lock(&self.status);
        match result {
            Ok(artifact) => {
                status.artifact = Some(artifact.clone());
                self.transition(&mut status, PipelineState::Ready);
                tracing::info!(
                    file = %artifact.file_name,
                    bytes = artifact.video.len(),
                    "video ready"
                );
                RunOutcome::Ready(artifact)
            }
            Err(err) => {
                tracing::warn!(kind = err.kind(), %err, "run failed");
                self.transition(
                    &mut status,
                    PipelineState::Failed {
                        kind: err.kind(),
                        message: err.to_string(),
                    },
                );
                status.last_diagnostic = Some(err.to_string());
                self.transition(&mut status, PipelineState::Idle);
                RunOutcome::Failed(err)
            }
        }
    }

    /// Split `text` into lines and run.
    pub fn run_script(&self, topic: &str, text: &str) -> RunOutcome {
        self.run(topic, &script_lines(text))
    }

    /// Generate the script for `topic` and run.
    pub fn run_generated(&self, topic: &str, generator: &dyn ScriptGenerator) -> RunOutcome {
        self.run(topic, &generator.lines(topic))
    }

    fn execute(
        &self,
        components: &mut Components<L, R>,
        topic: &str,
        lines: &[ScriptLine],
    ) -> ReelResult<Artifact> {
        if lines.is_empty() {
            return Err(ReelError::EmptyScript);
        }
        let total = lines.len();

        let mut engine = components.loader.load().map_err(|e| match e {
            ReelError::EngineUnavailable(_) => e,
            other => ReelError::engine_unavailable(other.to_string()),
        })?;

        self.set_state(PipelineState::Rendering { done: 0, total });
        let mut frames = Vec::with_capacity(total);
        for (i, line) in lines.iter().enumerate() {
            let index = u32::try_from(i)
                .map(FrameIndex)
                .map_err(|_| ReelError::validation("too many script lines"))?;
            let frame = components
                .rasterizer
                .render_frame(index, line.as_str(), topic)
                .map_err(|e| match e {
                    ReelError::RasterizationFailed(_) => e,
                    other => ReelError::rasterization(other.to_string()),
                })?;
            frames.push(frame);
            self.set_state(PipelineState::Rendering { done: i + 1, total });
        }

        self.set_state(PipelineState::Staging);
        let manifest = stage(&frames, engine.area())?;
        drop(frames);

        self.set_state(PipelineState::Encoding);
        let video = encode(engine.as_mut(), MANIFEST_NAME)?;

        Ok(Artifact {
            topic: topic.to_owned(),
            video,
            file_name: download_file_name(topic),
            frame_count: manifest.frame_count(),
            nominal_duration_secs: manifest.nominal_duration_secs(),
        })
    }

    /// Release the gate after a run that unwound without settling.
    fn abort_active_run(&self) {
        let mut status = lock(&self.status);
        if !status.state.is_active() {
            return;
        }
        let message = "run aborted by a panic".to_owned();
        tracing::error!(state = status.state.name(), "{message}");
        status.artifact = None;
        self.transition(
            &mut status,
            PipelineState::Failed {
                kind: "Aborted",
                message: message.clone(),
            },
        );
        status.last_diagnostic = Some(message);
        self.transition(&mut status, PipelineState::Idle);
    }

    fn set_state(&self, state: PipelineState) {
        let mut status = lock(&self.status);
        self.transition(&mut status, state);
    }

    fn transition(&self, status: &mut Status, state: PipelineState) {
        tracing::debug!(from = status.state.name(), to = state.name(), "state");
        status.state = state;
        if let Some(observer) = &self.observer {
            observer(&status.state);
        }
    }
}

/// Held for the duration of a run; resets the gate if the run unwinds before settling.
struct ActiveRun<'p, L: EngineLoader, R: Rasterize> {
    pipeline: &'p Pipeline<L, R>,
    settled: bool,
}

impl<L: EngineLoader, R: Rasterize> ActiveRun<'_, L, R> {
    fn settle(mut self) {
        self.settled = true;
    }
}

impl<L: EngineLoader, R: Rasterize> Drop for ActiveRun<'_, L, R> {
    fn drop(&mut self) {
        if !self.settled {
            self.pipeline.abort_active_run();
        }
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
