//! News snapshot file.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::types::{NewsSnapshot, Result};

#[derive(Debug, Clone)]
pub struct NewsStore {
    path: PathBuf,
}

impl NewsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Last saved snapshot; empty when nothing has been saved yet
    pub fn load(&self) -> Result<NewsSnapshot> {
        match fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(NewsSnapshot::empty()),
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the snapshot file whole (temp file, then rename)
    pub fn save(&self, snapshot: &NewsSnapshot) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(snapshot)?)?;
        fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), items = snapshot.items.len(), "News snapshot saved");
        Ok(())
    }
}
