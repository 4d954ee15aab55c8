use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;

use crate::domain::FlatRecord;
use crate::error::Result;

/// A raw game document waiting to be processed. `source_key` is the file
/// stem and names the game until its own id has been read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MatchCandidate {
    pub source_key: String,
    pub location: PathBuf,
}

// Input side
#[async_trait]
pub trait MatchSourcePort: Send + Sync {
    /// Pre-flight: fails with a fatal error when the source cannot be read at all.
    async fn check_available(&self) -> Result<()>;
    async fn list_candidates(&self) -> Result<Vec<MatchCandidate>>;
    async fn read(&self, candidate: &MatchCandidate) -> Result<Vec<u8>>;
}

/// What the store reports back after a game has been written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PersistedMatch {
    pub match_id: String,
    pub record_count: usize,
    pub location: String,
    pub sha256: String,
}

// Output side
#[async_trait]
pub trait RecordStorePort: Send + Sync {
    /// Pre-flight: fails with a fatal error when nothing could be written.
    async fn check_writable(&self) -> Result<()>;
    async fn exists(&self, match_id: &str) -> Result<bool>;
    /// Writes all records of one game as a single unit. Either the complete
    /// output becomes visible or nothing does.
    async fn persist(&self, match_id: &str, records: &[FlatRecord]) -> Result<PersistedMatch>;
}

#[async_trait]
pub trait NotifierPort: Send + Sync {
    /// Pre-flight: declare whatever the channel needs before the first publish.
    async fn prepare(&self) -> Result<()> {
        Ok(())
    }
    async fn publish_match(&self, persisted: &PersistedMatch) -> Result<()>;
    async fn publish_batch(&self, parsed_games: &[String]) -> Result<()>;
}
