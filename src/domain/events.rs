use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::ports::PersistedMatch;
use crate::constants::GAME_FLATTENED_EVENT;

/// Announces that one game's flattened output is on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameFlattenedEvent {
    pub event_uuid: Uuid,
    pub event_type: String,
    pub match_id: String,
    pub record_count: usize,
    pub output_path: String,
    pub sha256: String,
    pub published_at: DateTime<Utc>,
}

impl GameFlattenedEvent {
    pub fn new(persisted: &PersistedMatch) -> Self {
        Self {
            event_uuid: Uuid::new_v4(),
            event_type: GAME_FLATTENED_EVENT.to_string(),
            match_id: persisted.match_id.clone(),
            record_count: persisted.record_count,
            output_path: persisted.location.clone(),
            sha256: persisted.sha256.clone(),
            published_at: Utc::now(),
        }
    }
}

/// Sent once after a batch that produced at least one new game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchParsedEvent {
    pub event_uuid: Uuid,
    pub event_type: String,
    pub parsed_games: Vec<String>,
    pub published_at: DateTime<Utc>,
}

impl BatchParsedEvent {
    pub fn new(event_type: &str, parsed_games: &[String]) -> Self {
        Self {
            event_uuid: Uuid::new_v4(),
            event_type: event_type.to_string(),
            parsed_games: parsed_games.to_vec(),
            published_at: Utc::now(),
        }
    }
}
