use serde::Serialize;
use std::fmt;

/// Where a game is in its run. Failures keep the last stage reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MatchStage {
    Discovered,
    Validated,
    Flattened,
    Written,
    Notified,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum OutcomeStatus {
    Success {
        record_count: usize,
        location: String,
        /// Set when the output was written but the notification could not be published.
        notification_warning: Option<String>,
    },
    SkippedAlreadyProcessed,
    Failed {
        stage: MatchStage,
        kind: &'static str,
        reason: String,
    },
}

impl OutcomeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            OutcomeStatus::Success { .. } => "success",
            OutcomeStatus::SkippedAlreadyProcessed => "skipped",
            OutcomeStatus::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingOutcome {
    pub match_id: String,
    pub status: OutcomeStatus,
}

/// Result of one pass over the raw directory
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchSummary {
    pub outcomes: Vec<ProcessingOutcome>,
    pub batch_notification_warning: Option<String>,
}

impl BatchSummary {
    pub fn succeeded(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Success { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::SkippedAlreadyProcessed))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, OutcomeStatus::Failed { .. }))
    }

    pub fn notification_warnings(&self) -> usize {
        self.count(|s| {
            matches!(
                s,
                OutcomeStatus::Success {
                    notification_warning: Some(_),
                    ..
                }
            )
        })
    }

    /// Ids of games written in this run, in processing order.
    pub fn parsed_games(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, OutcomeStatus::Success { .. }))
            .map(|o| o.match_id.clone())
            .collect()
    }

    pub fn outcome_for(&self, match_id: &str) -> Option<&OutcomeStatus> {
        self.outcomes
            .iter()
            .find(|o| o.match_id == match_id)
            .map(|o| &o.status)
    }

    fn count(&self, pred: impl Fn(&OutcomeStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📊 Batch results:")?;
        writeln!(f, "   Candidates: {}", self.outcomes.len())?;
        writeln!(f, "   Succeeded: {}", self.succeeded())?;
        writeln!(f, "   Skipped: {}", self.skipped())?;
        writeln!(f, "   Failed: {}", self.failed())?;
        writeln!(f, "   Notification warnings: {}", self.notification_warnings())?;
        for outcome in &self.outcomes {
            match &outcome.status {
                OutcomeStatus::Failed { stage, kind, reason } => {
                    writeln!(f, "   ❌ {} [{} at {:?}]: {}", outcome.match_id, kind, stage, reason)?;
                }
                OutcomeStatus::Success {
                    notification_warning: Some(warning),
                    ..
                } => {
                    writeln!(f, "   ⚠️  {} written, not announced: {}", outcome.match_id, warning)?;
                }
                _ => {}
            }
        }
        if let Some(warning) = &self.batch_notification_warning {
            writeln!(f, "   ⚠️  batch notification failed: {}", warning)?;
        }
        Ok(())
    }
}
