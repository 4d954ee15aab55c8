pub mod document;
pub mod events;
pub mod raw;
pub mod record;

pub use document::{
    MatchDocument, Player, PlayerStats, RoundOutcome, RoundRecord, SerieTier, ValidationRules,
};
pub use events::{BatchParsedEvent, GameFlattenedEvent};
pub use raw::{EntityId, RawGame};
pub use record::FlatRecord;
