use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context as _;

use crate::foundation::error::{ReelError, ReelResult};

/// Flat namespace of named byte slots that frames, the manifest, and the encoded output live in.
pub trait WorkArea: Send {
    /// Create or overwrite slot `name`.
    fn write(&mut self, name: &str, bytes: &[u8]) -> ReelResult<()>;
    fn read(&self, name: &str) -> ReelResult<Vec<u8>>;
    fn contains(&self, name: &str) -> bool;
    /// Slot names in lexicographic order.
    fn names(&self) -> Vec<String>;
    /// Backing directory, for areas an external process can see.
    fn root(&self) -> Option<&Path> {
        None
    }
}

/// Validate a slot name: a single non-empty path component.
pub fn validate_slot_name(name: &str) -> ReelResult<&str> {
    if name.is_empty() {
        return Err(ReelError::validation("slot name must be non-empty"));
    }
    if name.contains(['/', '\\']) {
        return Err(ReelError::validation(format!(
            "slot name '{name}' must not contain path separators"
        )));
    }
    if name == "." || name == ".." {
        return Err(ReelError::validation(format!(
            "slot name '{name}' is not a file name"
        )));
    }
    Ok(name)
}

/// In-memory [`WorkArea`].
#[derive(Debug, Default, Clone)]
pub struct MemWorkArea {
    slots: BTreeMap<String, Vec<u8>>,
}

impl MemWorkArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl WorkArea for MemWorkArea {
    fn write(&mut self, name: &str, bytes: &[u8]) -> ReelResult<()> {
        let name = validate_slot_name(name)?;
        self.slots.insert(name.to_owned(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, name: &str) -> ReelResult<Vec<u8>> {
        let name = validate_slot_name(name)?;
        self.slots
            .get(name)
            .cloned()
            .ok_or_else(|| ReelError::validation(format!("slot '{name}' does not exist")))
    }

    fn contains(&self, name: &str) -> bool {
        validate_slot_name(name).is_ok() && self.slots.contains_key(name)
    }

    fn names(&self) -> Vec<String> {
        self.slots.keys().cloned().collect()
    }
}

static NEXT_AREA_ID: AtomicU64 = AtomicU64::new(0);

/// [`WorkArea`] backed by a scratch directory on disk.
///
/// Unless [`DirWorkArea::keep`] is set, the directory and everything in it is removed on drop.
#[derive(Debug)]
pub struct DirWorkArea {
    dir: PathBuf,
    keep: bool,
}

impl DirWorkArea {
    /// Create a fresh, uniquely named directory under `parent`.
    pub fn create_in(parent: &Path) -> ReelResult<Self> {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let seq = NEXT_AREA_ID.fetch_add(1, Ordering::Relaxed);
        let dir = parent.join(format!(
            "shortreel_{}_{}_{}",
            std::process::id(),
            nanos,
            seq
        ));
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create work area '{}'", dir.display()))?;
        Ok(Self { dir, keep: false })
    }

    /// Create a fresh directory under the system temp dir.
    pub fn create_temp() -> ReelResult<Self> {
        Self::create_in(&std::env::temp_dir())
    }

    /// Leave the directory on disk after drop.
    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, name: &str) -> ReelResult<PathBuf> {
        Ok(self.dir.join(validate_slot_name(name)?))
    }
}

impl WorkArea for DirWorkArea {
    fn write(&mut self, name: &str, bytes: &[u8]) -> ReelResult<()> {
        let p = self.slot_path(name)?;
        std::fs::write(&p, bytes)
            .with_context(|| format!("failed to write slot '{}'", p.display()))?;
        Ok(())
    }

    fn read(&self, name: &str) -> ReelResult<Vec<u8>> {
        let p = self.slot_path(name)?;
        let bytes =
            std::fs::read(&p).with_context(|| format!("failed to read slot '{}'", p.display()))?;
        Ok(bytes)
    }

    fn contains(&self, name: &str) -> bool {
        self.slot_path(name).map(|p| p.is_file()).unwrap_or(false)
    }

    fn names(&self) -> Vec<String> {
        let mut out: Vec<String> = std::fs::read_dir(&self.dir)
            .into_iter()
            .flatten()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().is_file())
            .filter_map(|e| e.file_name().into_string().ok())
            .collect();
        out.sort();
        out
    }

    fn root(&self) -> Option<&Path> {
        Some(&self.dir)
    }
}

impl Drop for DirWorkArea {
    fn drop(&mut self) {
        if self.keep {
            tracing::info!(dir = %self.dir.display(), "keeping work area");
            return;
        }
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stage/area.rs"]
mod tests;
