use crate::app::ports::{PersistedMatch, RecordStorePort};
use crate::domain::FlatRecord;
use crate::error::{FlattenError, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// One pretty-printed JSON array per game at `<dir>/<match_id>.json`.
pub struct FsRecordStore {
    pub dir: PathBuf,
}

impl FsRecordStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Target path for a game. Ids that could escape the directory are
    /// rejected as malformed input.
    pub fn output_path(&self, match_id: &str) -> Result<PathBuf> {
        if match_id.is_empty()
            || match_id == "."
            || match_id == ".."
            || match_id.contains(['/', '\\'])
        {
            return Err(FlattenError::malformed(
                match_id,
                format!("game id '{}' cannot be used as a file name", match_id),
            ));
        }
        Ok(self.dir.join(format!("{}.json", match_id)))
    }
}

/// Write into a hidden temp file next to `target`, fsync, then rename over
/// it. Readers see either the old file or the complete new one. The temp
/// file is removed when any step fails.
pub fn write_atomically(dir: &Path, target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    fs::create_dir_all(dir)?;
    let mut tmp = tempfile::Builder::new()
        .prefix(".")
        .suffix(".tmp")
        .tempfile_in(dir)?;
    tmp.write_all(bytes)?;
    tmp.as_file().sync_all()?;
    tmp.persist(target).map_err(|e| e.error)?;
    Ok(())
}

#[async_trait]
impl RecordStorePort for FsRecordStore {
    async fn check_writable(&self) -> Result<()> {
        let dir = self.dir.clone();
        let probe = tokio::task::spawn_blocking(move || -> std::io::Result<()> {
            fs::create_dir_all(&dir)?;
            tempfile::tempfile_in(&dir)?;
            Ok(())
        })
        .await
        .map_err(|e| FlattenError::Storage(e.to_string()))?;
        probe.map_err(|e| {
            FlattenError::Storage(format!("output directory {}: {}", self.dir.display(), e))
        })
    }

    async fn exists(&self, match_id: &str) -> Result<bool> {
        let path = self.output_path(match_id)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn persist(&self, match_id: &str, records: &[FlatRecord]) -> Result<PersistedMatch> {
        let persistence = |source: std::io::Error| FlattenError::Persistence {
            match_id: match_id.to_string(),
            source,
        };

        let target = self.output_path(match_id)?;
        let bytes = serde_json::to_vec_pretty(records)?;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        let dir = self.dir.clone();
        let target_for_write = target.clone();
        tokio::task::spawn_blocking(move || write_atomically(&dir, &target_for_write, &bytes))
            .await
            .map_err(|e| persistence(std::io::Error::new(std::io::ErrorKind::Other, e)))?
            .map_err(persistence)?;

        debug!("Wrote {} records to {}", records.len(), target.display());
        Ok(PersistedMatch {
            match_id: match_id.to_string(),
            record_count: records.len(),
            location: target.to_string_lossy().to_string(),
            sha256,
        })
    }
}
