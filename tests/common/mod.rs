#![allow(dead_code)]

use async_trait::async_trait;
use cs2_flattener::app::ports::{NotifierPort, PersistedMatch};
use cs2_flattener::domain::ValidationRules;
use cs2_flattener::infra::{FsMatchSource, FsRecordStore};
use cs2_flattener::pipeline::{MatchPipeline, PipelineOptions};
use cs2_flattener::{FlattenError, Result};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A complete game with two teams of `team_size` and `rounds` rounds.
pub fn game_json(id: &str, team_size: usize, rounds: usize) -> Value {
    let players: Vec<Value> = (0..team_size * 2)
        .map(|i| {
            let (team, opponent) = if i < team_size { ("t1", "t2") } else { ("t2", "t1") };
            json!({
                "player": {"id": format!("{id}_p{i}")},
                "team": {"id": team},
                "opponent": {"id": opponent},
                "adr": 80.5,
                "kast": 71.0,
                "rating": 1.05,
                "kills": 18,
                "deaths": 15,
                "assists": 4,
                "headshots": 9,
                "flash_assists": 2,
                "first_kills_diff": 1,
                "k_d_diff": 3
            })
        })
        .collect();
    let rounds: Vec<Value> = (1..=rounds)
        .map(|i| {
            json!({
                "round": i,
                "ct": if i <= 12 { "t1" } else { "t2" },
                "terrorists": if i <= 12 { "t2" } else { "t1" },
                "winner_team": if i % 2 == 0 { "t2" } else { "t1" },
                "outcome": "eliminated"
            })
        })
        .collect();
    json!({
        "id": id,
        "begin_at": "2024-01-01T00:00:00Z",
        "map": {"id": 100},
        "match": {
            "league": {"id": 10},
            "serie": {"id": 20, "tier": "a"},
            "tournament": {"id": 30}
        },
        "players": players,
        "rounds": rounds
    })
}

pub fn write_game(dir: &Path, file_stem: &str, game: &Value) {
    std::fs::create_dir_all(dir).unwrap();
    std::fs::write(
        dir.join(format!("{file_stem}.json")),
        serde_json::to_vec_pretty(game).unwrap(),
    )
    .unwrap();
}

/// Remembers every event instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    pub matches: Arc<Mutex<Vec<PersistedMatch>>>,
    pub batches: Arc<Mutex<Vec<Vec<String>>>>,
}

#[async_trait]
impl NotifierPort for RecordingNotifier {
    async fn publish_match(&self, persisted: &PersistedMatch) -> Result<()> {
        self.matches.lock().unwrap().push(persisted.clone());
        Ok(())
    }

    async fn publish_batch(&self, parsed_games: &[String]) -> Result<()> {
        self.batches.lock().unwrap().push(parsed_games.to_vec());
        Ok(())
    }
}

/// Broker that refuses every publish.
pub struct FailingNotifier;

#[async_trait]
impl NotifierPort for FailingNotifier {
    async fn publish_match(&self, persisted: &PersistedMatch) -> Result<()> {
        Err(FlattenError::Notification {
            match_id: persisted.match_id.clone(),
            message: "connection refused".to_string(),
        })
    }

    async fn publish_batch(&self, _parsed_games: &[String]) -> Result<()> {
        Err(FlattenError::Notification {
            match_id: "batch".to_string(),
            message: "connection refused".to_string(),
        })
    }
}

pub fn pipeline(
    raw_dir: &Path,
    flat_dir: &Path,
    notifier: Box<dyn NotifierPort>,
    force: bool,
    rules: ValidationRules,
) -> MatchPipeline {
    MatchPipeline::new(
        Box::new(FsMatchSource::new(raw_dir)),
        Box::new(FsRecordStore::new(flat_dir)),
        notifier,
        PipelineOptions { force, rules },
    )
}
