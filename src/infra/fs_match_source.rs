use crate::app::ports::{MatchCandidate, MatchSourcePort};
use crate::constants::RAW_EXTENSION;
use crate::error::{FlattenError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads raw game documents (`*.json`) from one directory.
pub struct FsMatchSource {
    pub dir: PathBuf,
}

impl FsMatchSource {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl MatchSourcePort for FsMatchSource {
    async fn check_available(&self) -> Result<()> {
        match tokio::fs::metadata(&self.dir).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(FlattenError::Storage(format!(
                "raw games path {} is not a directory",
                self.dir.display()
            ))),
            Err(e) => Err(FlattenError::Storage(format!(
                "raw games directory {}: {}",
                self.dir.display(),
                e
            ))),
        }
    }

    /// Candidates sorted by file name so runs are reproducible.
    async fn list_candidates(&self) -> Result<Vec<MatchCandidate>> {
        let storage_err =
            |e: std::io::Error| FlattenError::Storage(format!("listing {}: {}", self.dir.display(), e));

        let mut candidates = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.dir).await.map_err(storage_err)?;
        while let Some(entry) = entries.next_entry().await.map_err(storage_err)? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(RAW_EXTENSION) {
                continue;
            }
            if !entry.file_type().await.map_err(storage_err)?.is_file() {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                debug!("Ignoring non UTF-8 file name {}", path.display());
                continue;
            };
            candidates.push(MatchCandidate {
                source_key: stem.to_string(),
                location: path.clone(),
            });
        }
        candidates.sort_by(|a, b| a.location.cmp(&b.location));
        Ok(candidates)
    }

    async fn read(&self, candidate: &MatchCandidate) -> Result<Vec<u8>> {
        Ok(tokio::fs::read(&candidate.location).await?)
    }
}
