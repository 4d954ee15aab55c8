pub mod flatten;
pub mod orchestrator;
pub mod outcome;

pub use flatten::{flatten, opponents_of};
pub use orchestrator::{MatchPipeline, PipelineOptions};
pub use outcome::{BatchSummary, MatchStage, OutcomeStatus, ProcessingOutcome};
