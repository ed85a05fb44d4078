use std::sync::mpsc::Sender;
use std::time::Instant;

use tracing::{debug, info};

use crate::core::ExplainError;
use crate::explainers::IncrementalSage;
use crate::models::Model;
use crate::preview::{ExplanationCurve, SageSnapshot};
use crate::streams::Stream;

/// Drives an explainer over a stream, one example at a time, recording the
/// SAGE values every `sample_frequency` examples and once at the end unless
/// the last periodic snapshot already covers it.
pub struct IncrementalExplanation<M: Model> {
    explainer: IncrementalSage<M>,
    stream: Box<dyn Stream>,

    curve: ExplanationCurve,

    max_instances: Option<u64>,
    max_seconds: Option<u64>,
    sample_frequency: u64,

    processed: u64,
    last_snapshot_at: Option<u64>,
    start_time: Instant,

    progress_tx: Option<Sender<SageSnapshot>>,
}

impl<M: Model> IncrementalExplanation<M> {
    pub fn new(
        explainer: IncrementalSage<M>,
        stream: Box<dyn Stream>,
        max_instances: Option<u64>,
        max_seconds: Option<u64>,
        sample_frequency: u64,
    ) -> Result<Self, ExplainError> {
        if sample_frequency == 0 {
            return Err(ExplainError::invalid("sample_frequency must be > 0"));
        }
        if let Some(missing) = explainer
            .feature_names()
            .iter()
            .find(|name| stream.schema().index_of_feature(name).is_none())
        {
            return Err(ExplainError::MissingFeature(missing.clone()));
        }

        Ok(Self {
            explainer,
            stream,
            curve: ExplanationCurve::default(),
            max_instances,
            max_seconds,
            sample_frequency,
            processed: 0,
            last_snapshot_at: None,
            start_time: Instant::now(),
            progress_tx: None,
        })
    }

    pub fn with_progress(mut self, tx: Sender<SageSnapshot>) -> Self {
        self.progress_tx = Some(tx);
        self
    }

    pub fn run(&mut self) -> Result<(), ExplainError> {
        self.start_time = Instant::now();
        debug!(
            max_instances = ?self.max_instances,
            sample_frequency = self.sample_frequency,
            "explanation run started"
        );

        while self.stream.has_more_examples() {
            if self.max_instances.is_some_and(|n| self.processed >= n) {
                break;
            }
            if self
                .max_seconds
                .is_some_and(|s| self.start_time.elapsed().as_secs() >= s)
            {
                break;
            }
            let Some(example) = self.stream.next_example() else {
                break;
            };

            self.explainer.explain_one(&example.x, example.y)?;
            self.processed += 1;

            if self.processed % self.sample_frequency == 0 {
                self.push_snapshot();
            }
        }

        if self.last_snapshot_at != Some(self.processed) {
            self.push_snapshot();
        }
        info!(
            processed = self.processed,
            seconds = self.start_time.elapsed().as_secs_f64(),
            "explanation run finished"
        );
        Ok(())
    }

    pub fn curve(&self) -> &ExplanationCurve {
        &self.curve
    }

    pub fn explainer(&self) -> &IncrementalSage<M> {
        &self.explainer
    }

    pub fn into_explainer(self) -> IncrementalSage<M> {
        self.explainer
    }

    fn push_snapshot(&mut self) {
        let snapshot = SageSnapshot {
            instances_seen: self.processed,
            seconds: self.start_time.elapsed().as_secs_f64(),
            values: self.explainer.sage_values_ordered(),
        };

        if let Some(tx) = &self.progress_tx {
            let _ = tx.send(snapshot.clone());
        }

        self.last_snapshot_at = Some(self.processed);

        self.curve.push(snapshot);
    }
}
