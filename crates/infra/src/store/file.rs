//! JSON snapshot file

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use lazycache_common::CommonError;
use lazycache_core::{Payload, PersistenceStore};
use lazycache_domain::Result;
use tracing::{debug, info, instrument};

use crate::codec::PayloadCodec;
use crate::errors::{report, StoreError};

/// Snapshot persisted to a single file
///
/// Saves write a sibling `.tmp` file and rename it over the snapshot, so a
/// crash mid-save leaves the previous snapshot intact.
#[derive(Debug)]
pub struct FileStore {
    codec: PayloadCodec,
    path: PathBuf,
}

impl FileStore {
    /// Store snapshots at `path`. Nothing is touched until the first save.
    pub fn new(codec: PayloadCodec, path: impl Into<PathBuf>) -> Self {
        Self { codec, path: path.into() }
    }

    /// Snapshot file location.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, payloads: &[&dyn Payload]) -> std::result::Result<usize, StoreError> {
        let text = self.codec.encode(payloads)?;
        let temp_path = self.temp_path();

        if let Some(parent) = temp_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| {
                CommonError::persistence_op("create_dir", format!("{}: {err}", parent.display()))
            })?;
        }

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(text.as_bytes())?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &self.path).map_err(|err| {
            CommonError::persistence_op("rename", format!("{}: {err}", self.path.display()))
        })?;
        Ok(text.len())
    }

    // `snapshot.json` -> `snapshot.json.tmp`
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".tmp");
        PathBuf::from(name)
    }

    fn read_snapshot(&self) -> std::result::Result<Vec<Box<dyn Payload>>, StoreError> {
        if !self.path.exists() {
            debug!("snapshot file does not exist yet");
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&self.path)?;
        self.codec.decode(&text)
    }
}

impl PersistenceStore for FileStore {
    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn save(&self, payloads: &[&dyn Payload]) -> Result<()> {
        let start = Instant::now();
        let bytes = self.write_snapshot(payloads).map_err(|err| report("file store save", err))?;
        info!(records = payloads.len(), bytes, elapsed = ?start.elapsed(), "saved snapshot");
        Ok(())
    }

    #[instrument(skip_all, fields(path = %self.path.display()))]
    fn load(&self) -> Result<Vec<Box<dyn Payload>>> {
        let start = Instant::now();
        let payloads = self.read_snapshot().map_err(|err| report("file store load", err))?;
        info!(records = payloads.len(), elapsed = ?start.elapsed(), "loaded snapshot");
        Ok(payloads)
    }
}
