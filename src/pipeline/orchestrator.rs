use std::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

use crate::app::ports::{MatchCandidate, MatchSourcePort, NotifierPort, RecordStorePort};
use crate::domain::{MatchDocument, RawGame, ValidationRules};
use crate::error::Result;
use crate::pipeline::flatten::flatten;
use crate::pipeline::outcome::{BatchSummary, MatchStage, OutcomeStatus, ProcessingOutcome};

#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineOptions {
    /// Re-flatten games whose output already exists.
    pub force: bool,
    pub rules: ValidationRules,
}

/// Tracks one game through its stages.
struct Progress {
    match_id: String,
    stage: MatchStage,
}

impl Progress {
    fn advance(&mut self, next: MatchStage) {
        debug!(from = ?self.stage, to = ?next, "stage transition");
        self.stage = next;
    }
}

/// Drives every candidate game through validate → flatten → write → notify.
/// One game's failure never stops the batch.
pub struct MatchPipeline {
    source: Box<dyn MatchSourcePort>,
    store: Box<dyn RecordStorePort>,
    notifier: Box<dyn NotifierPort>,
    options: PipelineOptions,
}

impl MatchPipeline {
    pub fn new(
        source: Box<dyn MatchSourcePort>,
        store: Box<dyn RecordStorePort>,
        notifier: Box<dyn NotifierPort>,
        options: PipelineOptions,
    ) -> Self {
        Self {
            source,
            store,
            notifier,
            options,
        }
    }

    /// Checks that run before any game is touched. Errors here are fatal.
    pub async fn preflight(&self) -> Result<()> {
        self.source.check_available().await?;
        self.store.check_writable().await?;
        self.notifier.prepare().await?;
        Ok(())
    }

    /// Process every candidate once. Only pre-flight and listing errors escape.
    pub async fn run(&self) -> Result<BatchSummary> {
        self.preflight().await?;

        let candidates = self.source.list_candidates().await?;
        if candidates.is_empty() {
            warn!("No raw games found");
        }
        info!("🚀 Processing {} raw games", candidates.len());

        let mut summary = BatchSummary::default();
        for candidate in &candidates {
            let outcome = self.process_candidate(candidate).await;
            summary.outcomes.push(outcome);
        }

        let parsed_games = summary.parsed_games();
        if !parsed_games.is_empty() {
            if let Err(e) = self.notifier.publish_batch(&parsed_games).await {
                warn!("Batch notification failed: {}", e);
                crate::metrics::pipeline::notification_failed();
                summary.batch_notification_warning = Some(e.to_string());
            }
        }

        info!(
            succeeded = summary.succeeded(),
            skipped = summary.skipped(),
            failed = summary.failed(),
            "✅ Batch finished"
        );
        Ok(summary)
    }

    /// Run one game to a terminal state. Never fails: errors become outcomes.
    pub async fn process_candidate(&self, candidate: &MatchCandidate) -> ProcessingOutcome {
        let started = Instant::now();
        let mut progress = Progress {
            match_id: candidate.source_key.clone(),
            stage: MatchStage::Discovered,
        };
        let span = info_span!("match", match_id = %candidate.source_key);

        let result = self.drive(candidate, &mut progress).instrument(span).await;

        let status = match result {
            Ok(status) => status,
            Err(e) => {
                error!(match_id = %progress.match_id, stage = ?progress.stage, kind = e.kind(), "Game failed: {}", e);
                OutcomeStatus::Failed {
                    stage: progress.stage,
                    kind: e.kind(),
                    reason: e.to_string(),
                }
            }
        };

        match &status {
            OutcomeStatus::Success { record_count, location, .. } => {
                info!(match_id = %progress.match_id, "💾 Game saved ({} records) to {}", record_count, location);
            }
            OutcomeStatus::SkippedAlreadyProcessed => {
                info!(match_id = %progress.match_id, "⏭️ Output exists, skipping");
            }
            OutcomeStatus::Failed { .. } => {}
        }
        crate::metrics::pipeline::match_finished(status.label(), started.elapsed().as_secs_f64());

        ProcessingOutcome {
            match_id: progress.match_id,
            status,
        }
    }

    async fn drive(&self, candidate: &MatchCandidate, progress: &mut Progress) -> Result<OutcomeStatus> {
        let bytes = self.source.read(candidate).await?;
        let raw = RawGame::decode(&candidate.source_key, &bytes)?;
        drop(bytes);
        if let Some(key) = raw.match_key() {
            progress.match_id = key;
        }

        if !self.options.force && self.store.exists(&progress.match_id).await? {
            return Ok(OutcomeStatus::SkippedAlreadyProcessed);
        }

        let document = MatchDocument::from_raw(raw, &candidate.source_key, &self.options.rules)?;
        progress.advance(MatchStage::Validated);

        let records = flatten(&document);
        drop(document);
        progress.advance(MatchStage::Flattened);

        let persisted = self.store.persist(&progress.match_id, &records).await?;
        drop(records);
        crate::metrics::pipeline::records_written(persisted.record_count);
        progress.advance(MatchStage::Written);

        let notification_warning = match self.notifier.publish_match(&persisted).await {
            Ok(()) => {
                progress.advance(MatchStage::Notified);
                None
            }
            Err(e) => {
                warn!(match_id = %progress.match_id, "📨 Notification failed, output kept: {}", e);
                crate::metrics::pipeline::notification_failed();
                Some(e.to_string())
            }
        };
        progress.advance(MatchStage::Done);

        Ok(OutcomeStatus::Success {
            record_count: persisted.record_count,
            location: persisted.location,
            notification_warning,
        })
    }
}
