use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

use crate::domain::document::{MatchDocument, Player, PlayerStats, RoundRecord};
use crate::domain::raw::EntityId;

/// One output row: a (round, player, opponent) triple with the context the
/// downstream models join on. Field order is the on-disk column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlatRecord {
    #[serde(rename = "game_id")]
    pub match_id: EntityId,
    pub begin_at: DateTime<FixedOffset>,
    pub map_id: EntityId,
    pub league_id: Option<EntityId>,
    pub serie_id: Option<EntityId>,
    pub serie_tier: Option<u8>,
    pub tournament_id: Option<EntityId>,
    pub team_id: EntityId,
    pub team_opponent_id: EntityId,
    pub player_id: EntityId,
    #[serde(rename = "player_opponent_id")]
    pub opponent_id: EntityId,
    #[serde(flatten)]
    pub stats: PlayerStats,
    #[serde(rename = "round")]
    pub round_number: u32,
    pub is_ct: u8,
    pub outcome: Option<u8>,
    pub win: u8,
}

impl FlatRecord {
    pub fn new(
        doc: &MatchDocument,
        round: &RoundRecord,
        player: &Player,
        opponent: &Player,
    ) -> Self {
        Self {
            match_id: doc.match_id.clone(),
            begin_at: doc.begin_at,
            map_id: doc.map_id.clone(),
            league_id: doc.league_id.clone(),
            serie_id: doc.serie_id.clone(),
            serie_tier: doc.serie_tier.map(|t| t.code()),
            tournament_id: doc.tournament_id.clone(),
            team_id: player.team_id.clone(),
            team_opponent_id: player.opponent_team_id.clone(),
            player_id: player.id.clone(),
            opponent_id: opponent.id.clone(),
            stats: player.stats,
            round_number: round.number,
            is_ct: u8::from(round.ct == player.team_id),
            outcome: round.outcome.map(|o| o.code()),
            win: u8::from(round.winner == player.team_id),
        }
    }
}
