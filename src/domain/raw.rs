use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::document::PlayerStats;
use crate::error::{FlattenError, Result};

/// Identifier as the upstream feed emits it: usually an integer, sometimes a slug.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Num(i64),
    Text(String),
}

impl EntityId {
    pub fn is_blank(&self) -> bool {
        matches!(self, EntityId::Text(s) if s.trim().is_empty())
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Num(n) => write!(f, "{n}"),
            EntityId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for EntityId {
    fn from(n: i64) -> Self {
        EntityId::Num(n)
    }
}

impl From<&str> for EntityId {
    fn from(s: &str) -> Self {
        EntityId::Text(s.to_string())
    }
}

/// `{ "id": ... }` wrapper used for map, league, team and friends.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawRef {
    pub id: Option<EntityId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSerie {
    pub id: Option<EntityId>,
    pub tier: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMatchInfo {
    pub league: Option<RawRef>,
    pub serie: Option<RawSerie>,
    pub tournament: Option<RawRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawPlayer {
    pub player: Option<RawRef>,
    pub team: Option<RawRef>,
    pub opponent: Option<RawRef>,
    #[serde(flatten)]
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawRound {
    pub round: Option<i64>,
    pub ct: Option<EntityId>,
    pub terrorists: Option<EntityId>,
    pub winner_team: Option<EntityId>,
    pub outcome: Option<String>,
}

/// Untrusted shape of one game document. Every field is optional here so that
/// validation can name exactly what is missing.
#[derive(Debug, Clone, Deserialize)]
pub struct RawGame {
    pub id: Option<EntityId>,
    pub begin_at: Option<String>,
    pub map: Option<RawRef>,
    #[serde(rename = "match")]
    pub match_info: Option<RawMatchInfo>,
    pub players: Option<Vec<RawPlayer>>,
    pub rounds: Option<Vec<RawRound>>,
}

impl RawGame {
    /// Decode bytes into the raw shape. `source_key` names the failure when
    /// the document is not even readable JSON.
    pub fn decode(source_key: &str, bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| FlattenError::malformed(source_key, e.to_string()))
    }

    /// The game id rendered as a storage key, if the document carries one.
    pub fn match_key(&self) -> Option<String> {
        self.id
            .as_ref()
            .filter(|id| !id.is_blank())
            .map(|id| id.to_string())
    }
}
