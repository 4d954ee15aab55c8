use crate::app::ports::{NotifierPort, PersistedMatch};
use crate::domain::{BatchParsedEvent, GameFlattenedEvent};
use crate::error::{FlattenError, Result};
use async_trait::async_trait;
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;

/// Appends each event as one JSON line to a local file.
pub struct NdjsonNotifier {
    pub path: PathBuf,
    pub batch_event_type: String,
}

impl NdjsonNotifier {
    pub fn new<P: Into<PathBuf>>(path: P, batch_event_type: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            batch_event_type: batch_event_type.into(),
        }
    }

    async fn append<T: Serialize>(&self, match_id: &str, event: &T) -> Result<()> {
        let failed = |message: String| FlattenError::Notification {
            match_id: match_id.to_string(),
            message,
        };
        let mut line = serde_json::to_string(event)?;
        line.push('\n');
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| failed(format!("open {}: {}", self.path.display(), e)))?;
        file.write_all(line.as_bytes())
            .await
            .map_err(|e| failed(e.to_string()))?;
        file.flush().await.map_err(|e| failed(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl NotifierPort for NdjsonNotifier {
    async fn prepare(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                FlattenError::ChannelUnavailable(format!("{}: {}", parent.display(), e))
            })?;
        }
        Ok(())
    }

    async fn publish_match(&self, persisted: &PersistedMatch) -> Result<()> {
        let event = GameFlattenedEvent::new(persisted);
        self.append(&persisted.match_id, &event).await
    }

    async fn publish_batch(&self, parsed_games: &[String]) -> Result<()> {
        let event = BatchParsedEvent::new(&self.batch_event_type, parsed_games);
        self.append("batch", &event).await
    }
}

/// Publishing disabled; every call succeeds.
pub struct NoopNotifier;

#[async_trait]
impl NotifierPort for NoopNotifier {
    async fn publish_match(&self, _persisted: &PersistedMatch) -> Result<()> {
        Ok(())
    }

    async fn publish_batch(&self, _parsed_games: &[String]) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;
    use tempfile::TempDir;

    #[tokio::test]
    async fn appends_one_line_per_event() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("events/notifications.ndjson");
        let notifier = NdjsonNotifier::new(&path, "all_games_parsed");
        notifier.prepare().await.unwrap();

        let persisted = PersistedMatch {
            match_id: "g1".into(),
            record_count: 800,
            location: "flat/g1.json".into(),
            sha256: "ab".repeat(32),
        };
        notifier.publish_match(&persisted).await.unwrap();
        notifier.publish_batch(&["g1".to_string()]).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<Value> = content
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event_type"], "game_flattened");
        assert_eq!(lines[0]["match_id"], "g1");
        assert_eq!(lines[0]["record_count"], 800);
        assert_eq!(lines[1]["event_type"], "all_games_parsed");
        assert_eq!(lines[1]["parsed_games"][0], "g1");
    }
}
