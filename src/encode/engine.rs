use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::foundation::error::{ReelError, ReelResult};
use crate::stage::area::{DirWorkArea, WorkArea};

/// A loaded encoding engine together with the working area it reads and writes.
pub trait EncodingEngine: Send {
    /// The engine's working area. Frames and manifest are staged here and output is read back
    /// from here.
    fn area(&mut self) -> &mut dyn WorkArea;

    /// Run the engine once with `args`. Relative names in `args` resolve inside [`area`].
    ///
    /// [`area`]: EncodingEngine::area
    fn run(&mut self, args: &[String]) -> ReelResult<()>;
}

/// Acquires an [`EncodingEngine`] at the start of a run.
///
/// Failure to load is reported as [`ReelError::EngineUnavailable`]. The returned handle lives for
/// one run and is dropped at its end.
pub trait EngineLoader {
    fn load(&self) -> ReelResult<Box<dyn EncodingEngine>>;
}

/// Options for [`FfmpegLoader`].
#[derive(Clone, Debug)]
pub struct FfmpegLoaderOpts {
    /// Program to invoke; looked up on `PATH` when not a path.
    pub program: PathBuf,
    /// Directory run scratch areas are created in. `None` uses the system temp dir.
    pub work_root: Option<PathBuf>,
    /// Leave each run's scratch area on disk for inspection.
    pub keep_workdir: bool,
}

impl Default for FfmpegLoaderOpts {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
            work_root: None,
            keep_workdir: false,
        }
    }
}

impl FfmpegLoaderOpts {
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_work_root(mut self, root: Option<PathBuf>) -> Self {
        self.work_root = root;
        self
    }

    pub fn with_keep_workdir(mut self, keep: bool) -> Self {
        self.keep_workdir = keep;
        self
    }
}

/// Loads the system `ffmpeg` binary.
#[derive(Clone, Debug, Default)]
pub struct FfmpegLoader {
    opts: FfmpegLoaderOpts,
}

impl FfmpegLoader {
    pub fn new(opts: FfmpegLoaderOpts) -> Self {
        Self { opts }
    }

    pub fn opts(&self) -> &FfmpegLoaderOpts {
        &self.opts
    }
}

impl EngineLoader for FfmpegLoader {
    #[tracing::instrument(skip(self), fields(program = %self.opts.program.display()))]
    fn load(&self) -> ReelResult<Box<dyn EncodingEngine>> {
        let program = resolve_program(&self.opts.program)?;
        if !is_program_runnable(&program) {
            return Err(ReelError::engine_unavailable(format!(
                "'{}' could not be started (is ffmpeg installed and on PATH?)",
                self.opts.program.display()
            )));
        }

        let area = match &self.opts.work_root {
            Some(root) => DirWorkArea::create_in(root),
            None => DirWorkArea::create_temp(),
        }
        .map_err(|e| ReelError::engine_unavailable(format!("failed to create work area: {e}")))?
        .keep(self.opts.keep_workdir);

        tracing::debug!(dir = %area.path().display(), "engine loaded");
        Ok(Box::new(FfmpegEngine { program, area }))
    }
}

/// Make a program given as a path absolute, so it still resolves once the engine runs inside its
/// work area. Bare names are left for the `PATH` lookup.
fn resolve_program(program: &Path) -> ReelResult<PathBuf> {
    if program.components().count() <= 1 || program.is_absolute() {
        return Ok(program.to_path_buf());
    }
    std::path::absolute(program).map_err(|e| {
        ReelError::engine_unavailable(format!(
            "failed to resolve program path '{}': {e}",
            program.display()
        ))
    })
}

/// `ffmpeg` process runner bound to a scratch directory.
pub struct FfmpegEngine {
    program: PathBuf,
    area: DirWorkArea,
}

/// Flags passed ahead of every invocation: quiet output, overwrite existing files.
const GLOBAL_ARGS: [&str; 4] = ["-hide_banner", "-loglevel", "error", "-y"];

impl EncodingEngine for FfmpegEngine {
    fn area(&mut self) -> &mut dyn WorkArea {
        &mut self.area
    }

    fn run(&mut self, args: &[String]) -> ReelResult<()> {
        let output = Command::new(&self.program)
            .args(GLOBAL_ARGS)
            .args(args)
            .current_dir(self.area.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                ReelError::encoding(format!(
                    "failed to spawn '{}': {e}",
                    self.program.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ReelError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// Return `true` when `program -version` runs and exits successfully.
pub fn is_program_runnable(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_program_runnable(Path::new("ffmpeg"))
}

#[cfg(test)]
#[path = "../../tests/unit/encode/engine.rs"]
mod tests;
