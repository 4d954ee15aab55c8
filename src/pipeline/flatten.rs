use crate::domain::{FlatRecord, MatchDocument, Player};

/// Opponents of `player`: every member of the team it names as opponent, in
/// roster order. Games are team-vs-team, so nobody outside that roster counts.
pub fn opponents_of<'a>(
    doc: &'a MatchDocument,
    player: &'a Player,
) -> impl Iterator<Item = &'a Player> + 'a {
    doc.players
        .iter()
        .filter(move |p| p.team_id == player.opponent_team_id && p.id != player.id)
}

/// Flatten a validated game into (round, player, opponent) records.
///
/// Output order is rounds ascending, then players in roster order, then
/// opponents in roster order. A player whose team did not play a round gets
/// no record for it.
pub fn flatten(doc: &MatchDocument) -> Vec<FlatRecord> {
    let mut records = Vec::new();
    for round in &doc.rounds {
        for player in &doc.players {
            if !round.involves(&player.team_id) {
                continue;
            }
            for opponent in opponents_of(doc, player) {
                records.push(FlatRecord::new(doc, round, player, opponent));
            }
        }
    }
    records
}
