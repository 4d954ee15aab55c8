use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

use crate::constants::{DEFAULT_MIN_ROUNDS, DEFAULT_TEAM_SIZE};
use crate::domain::raw::{EntityId, RawGame, RawPlayer, RawRound};
use crate::error::{FlattenError, Result};

/// Shape rules a game must satisfy before it is flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationRules {
    /// Players per side.
    pub team_size: usize,
    /// Fewer rounds than this means the game was abandoned or is still live.
    pub min_rounds: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            team_size: DEFAULT_TEAM_SIZE,
            min_rounds: DEFAULT_MIN_ROUNDS,
        }
    }
}

fn null_as_zero<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Per-player match statistics, copied onto every record of that player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub adr: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub kast: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub kills: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub deaths: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub assists: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub headshots: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub flash_assists: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub first_kills_diff: i64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub k_d_diff: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerieTier {
    S,
    A,
    B,
    C,
    D,
}

impl SerieTier {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "s" => Some(SerieTier::S),
            "a" => Some(SerieTier::A),
            "b" => Some(SerieTier::B),
            "c" => Some(SerieTier::C),
            "d" => Some(SerieTier::D),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            SerieTier::S => 1,
            SerieTier::A => 2,
            SerieTier::B => 3,
            SerieTier::C => 4,
            SerieTier::D => 5,
        }
    }
}

/// How a round ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    Exploded,
    Defused,
    Eliminated,
    Timeout,
}

impl RoundOutcome {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "exploded" => Some(RoundOutcome::Exploded),
            "defused" => Some(RoundOutcome::Defused),
            "eliminated" => Some(RoundOutcome::Eliminated),
            "timeout" => Some(RoundOutcome::Timeout),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            RoundOutcome::Exploded => 1,
            RoundOutcome::Defused => 2,
            RoundOutcome::Eliminated => 3,
            RoundOutcome::Timeout => 4,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: EntityId,
    pub team_id: EntityId,
    pub opponent_team_id: EntityId,
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoundRecord {
    pub number: u32,
    pub ct: EntityId,
    pub terrorists: EntityId,
    pub winner: EntityId,
    pub outcome: Option<RoundOutcome>,
}

impl RoundRecord {
    /// Whether `team_id` played this round on either side.
    pub fn involves(&self, team_id: &EntityId) -> bool {
        &self.ct == team_id || &self.terrorists == team_id
    }
}

/// A structurally valid game. Rounds are sorted ascending by number; players
/// keep their document order.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchDocument {
    pub match_id: EntityId,
    pub begin_at: DateTime<FixedOffset>,
    pub map_id: EntityId,
    pub league_id: Option<EntityId>,
    pub serie_id: Option<EntityId>,
    pub serie_tier: Option<SerieTier>,
    pub tournament_id: Option<EntityId>,
    pub players: Vec<Player>,
    pub rounds: Vec<RoundRecord>,
}

impl MatchDocument {
    /// Decode and validate in one step.
    pub fn parse(source_key: &str, bytes: &[u8], rules: &ValidationRules) -> Result<Self> {
        let raw = RawGame::decode(source_key, bytes)?;
        Self::from_raw(raw, source_key, rules)
    }

    /// Validate a decoded document. Every rejection carries the game id, or
    /// `source_key` when the id itself is missing.
    pub fn from_raw(raw: RawGame, source_key: &str, rules: &ValidationRules) -> Result<Self> {
        let match_id = raw
            .id
            .filter(|id| !id.is_blank())
            .ok_or_else(|| FlattenError::malformed(source_key, "missing field `id`"))?;
        let key = match_id.to_string();
        let malformed = |reason: String| FlattenError::malformed(key.as_str(), reason);

        let begin_at_raw = raw
            .begin_at
            .ok_or_else(|| malformed("missing field `begin_at`".to_string()))?;
        let begin_at = DateTime::parse_from_rfc3339(&begin_at_raw)
            .map_err(|e| malformed(format!("invalid `begin_at` {begin_at_raw:?}: {e}")))?;

        let map_id = raw
            .map
            .and_then(|m| m.id)
            .ok_or_else(|| malformed("missing field `map.id`".to_string()))?;

        let info = raw.match_info.unwrap_or_default();
        let serie = info.serie.unwrap_or_default();

        let raw_players = raw
            .players
            .ok_or_else(|| malformed("missing field `players`".to_string()))?;
        let players = validate_players(raw_players, rules).map_err(&malformed)?;

        let raw_rounds = raw
            .rounds
            .ok_or_else(|| malformed("missing field `rounds`".to_string()))?;
        let rounds = validate_rounds(raw_rounds, &players, rules).map_err(&malformed)?;

        Ok(MatchDocument {
            match_id,
            begin_at,
            map_id,
            league_id: info.league.and_then(|r| r.id),
            serie_id: serie.id,
            serie_tier: serie.tier.as_deref().and_then(SerieTier::from_label),
            tournament_id: info.tournament.and_then(|r| r.id),
            players,
            rounds,
        })
    }

    pub fn key(&self) -> String {
        self.match_id.to_string()
    }
}

fn validate_players(
    raw_players: Vec<RawPlayer>,
    rules: &ValidationRules,
) -> std::result::Result<Vec<Player>, String> {
    let mut players = Vec::with_capacity(raw_players.len());
    let mut seen = HashSet::new();
    // Teams in order of first appearance.
    let mut teams: Vec<EntityId> = Vec::new();

    for (idx, raw) in raw_players.into_iter().enumerate() {
        let id = raw
            .player
            .and_then(|r| r.id)
            .ok_or_else(|| format!("players[{idx}] is missing `player.id`"))?;
        let team_id = raw
            .team
            .and_then(|r| r.id)
            .ok_or_else(|| format!("player {id} is missing `team.id`"))?;
        let opponent_team_id = raw
            .opponent
            .and_then(|r| r.id)
            .ok_or_else(|| format!("player {id} is missing `opponent.id`"))?;

        if !seen.insert(id.clone()) {
            return Err(format!("player {id} is listed more than once"));
        }
        if team_id == opponent_team_id {
            return Err(format!("player {id} has team {team_id} as its own opponent"));
        }
        if !teams.contains(&team_id) {
            teams.push(team_id.clone());
        }
        players.push(Player {
            id,
            team_id,
            opponent_team_id,
            stats: raw.stats,
        });
    }

    if teams.len() != 2 {
        return Err(format!("expected exactly 2 teams, found {}", teams.len()));
    }

    for player in &players {
        if !teams.contains(&player.opponent_team_id) {
            return Err(format!(
                "player {} names unknown opponent team {}",
                player.id, player.opponent_team_id
            ));
        }
    }

    for team in &teams {
        let size = players.iter().filter(|p| &p.team_id == team).count();
        if size != rules.team_size {
            return Err(format!(
                "team {team} has {size} players, expected {}",
                rules.team_size
            ));
        }
    }

    Ok(players)
}

fn validate_rounds(
    raw_rounds: Vec<RawRound>,
    players: &[Player],
    rules: &ValidationRules,
) -> std::result::Result<Vec<RoundRecord>, String> {
    if raw_rounds.is_empty() {
        return Err("rounds is empty".to_string());
    }
    if raw_rounds.len() < rules.min_rounds {
        return Err(format!(
            "incomplete game: {} rounds, at least {} required",
            raw_rounds.len(),
            rules.min_rounds
        ));
    }

    let is_team = |id: &EntityId| players.iter().any(|p| &p.team_id == id);
    let mut numbers = HashSet::new();
    let mut rounds = Vec::with_capacity(raw_rounds.len());

    for (idx, raw) in raw_rounds.into_iter().enumerate() {
        let number = raw
            .round
            .ok_or_else(|| format!("rounds[{idx}] is missing `round`"))?;
        let number = u32::try_from(number)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| format!("rounds[{idx}] has invalid round number {number}"))?;
        if !numbers.insert(number) {
            return Err(format!("round {number} appears more than once"));
        }

        let ct = raw
            .ct
            .ok_or_else(|| format!("round {number} is missing `ct`"))?;
        let terrorists = raw
            .terrorists
            .ok_or_else(|| format!("round {number} is missing `terrorists`"))?;
        let winner = raw
            .winner_team
            .ok_or_else(|| format!("round {number} is missing `winner_team`"))?;

        for (field, team) in [("ct", &ct), ("terrorists", &terrorists), ("winner_team", &winner)] {
            if !is_team(team) {
                return Err(format!("round {number} references unknown team {team} in `{field}`"));
            }
        }
        if ct == terrorists {
            return Err(format!("round {number} has team {ct} on both sides"));
        }

        rounds.push(RoundRecord {
            number,
            ct,
            terrorists,
            winner,
            outcome: raw.outcome.as_deref().and_then(RoundOutcome::from_label),
        });
    }

    rounds.sort_by_key(|r| r.number);
    if rounds[0].number != 1 {
        return Err(format!("first round is {}, expected 1", rounds[0].number));
    }

    Ok(rounds)
}
