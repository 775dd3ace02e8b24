//! Sequential, cancellable description enrichment.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::progress::Progress;
use crate::config::{ConfigError, ProviderConfig};
use crate::model::collection::{missing_descriptions, position, set_description};
use crate::model::LinkRecord;
use crate::ports::clock::Clock;
use crate::ports::describer::{DescribeRequest, DescriptionGenerator, ProviderError};
use crate::ports::sink::{CollectionSink, CommitError};

/// Errors that stop a run from starting or from finishing.
///
/// Per-item [`ProviderError`]s never show up here; they are collected in
/// [`RunReport::failures`].
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A run is already live on this pipeline.
    #[error("an enrichment run is already in progress")]
    AlreadyRunning,
    /// The provider configuration cannot be used.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The store rejected a snapshot; the run stopped at that item.
    #[error(transparent)]
    Commit(#[from] CommitError),
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// Every target was processed.
    Completed,
    /// A stop request was honoured before the last target.
    Cancelled,
}

/// A target whose generation call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    /// Id of the link left without a description.
    pub id: String,
    /// Its title, for diagnostics.
    pub title: String,
    /// What the provider reported.
    pub error: ProviderError,
    /// When the failure was observed.
    pub at: DateTime<Utc>,
}

/// Summary handed back when a run reaches a terminal state.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Identifier used in log events for this run.
    pub run_id: Uuid,
    /// Terminal state.
    pub outcome: RunOutcome,
    /// Final progress of the run.
    pub progress: Progress,
    /// Targets that received a description.
    pub succeeded: usize,
    /// Targets whose generation failed.
    pub failures: Vec<FailureRecord>,
    /// The collection as last committed (or unchanged if nothing succeeded).
    pub collection: Vec<LinkRecord>,
}

impl RunReport {
    /// Number of failed targets.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

#[derive(Debug, Default)]
struct RunFlags {
    running: AtomicBool,
    cancel: AtomicBool,
}

/// Cloneable stop button for the pipeline it came from.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    flags: Arc<RunFlags>,
}

impl CancelHandle {
    /// Asks the live run to stop before its next item.
    ///
    /// Idempotent. Returns `false` and does nothing when no run is live.
    ///
    /// The flag is cleared only when a run ends, so a request made right
    /// after `start` claims the pipeline is never lost. A request racing
    /// the end of one run can still land on the next run started at once.
    pub fn request_cancel(&self) -> bool {
        if !self.flags.running.load(Ordering::Acquire) {
            return false;
        }
        self.flags.cancel.store(true, Ordering::Release);
        true
    }
}

/// Runs enrichment passes, at most one at a time.
pub struct EnrichmentPipeline<'a> {
    describer: &'a dyn DescriptionGenerator,
    sink: &'a dyn CollectionSink,
    clock: &'a dyn Clock,
    flags: Arc<RunFlags>,
    progress: watch::Sender<Progress>,
}

impl<'a> EnrichmentPipeline<'a> {
    /// Creates an idle pipeline.
    #[must_use]
    pub fn new(
        describer: &'a dyn DescriptionGenerator,
        sink: &'a dyn CollectionSink,
        clock: &'a dyn Clock,
    ) -> Self {
        let (progress, _) = watch::channel(Progress::default());
        Self { describer, sink, clock, flags: Arc::default(), progress }
    }

    /// Subscribes to progress updates.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Progress> {
        self.progress.subscribe()
    }

    /// Latest published progress.
    #[must_use]
    pub fn progress(&self) -> Progress {
        *self.progress.borrow()
    }

    /// Whether a run is live.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.flags.running.load(Ordering::Acquire)
    }

    /// Returns a handle that can stop runs from another task.
    #[must_use]
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle { flags: Arc::clone(&self.flags) }
    }

    /// Asks the live run to stop; see [`CancelHandle::request_cancel`].
    pub fn request_cancel(&self) -> bool {
        self.cancel_handle().request_cancel()
    }

    /// Claims the pipeline for a new run over `collection`.
    ///
    /// The targets are fixed here: every record lacking a description, in
    /// collection order. Nothing is generated or committed until
    /// [`EnrichmentRun::execute`] is awaited.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AlreadyRunning`] if another run is live,
    /// whatever `config` holds, and [`PipelineError::Config`] if `config`
    /// is unusable. A rejected call never claims the pipeline.
    pub fn start(
        &self,
        collection: Vec<LinkRecord>,
        config: &ProviderConfig,
    ) -> Result<EnrichmentRun<'_>, PipelineError> {
        if self.is_running() {
            return Err(PipelineError::AlreadyRunning);
        }
        config.validate()?;
        if self
            .flags
            .running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(PipelineError::AlreadyRunning);
        }

        let targets = missing_descriptions(&collection);
        let run_id = Uuid::new_v4();
        self.progress.send_replace(Progress { current: 0, total: targets.len(), running: true });
        info!(%run_id, total = targets.len(), provider = %config.provider, "enrichment run started");

        Ok(EnrichmentRun {
            pipeline: self,
            run_id,
            config: config.clone(),
            collection,
            targets,
            cursor: 0,
            succeeded: 0,
            failures: Vec::new(),
        })
    }

    /// Starts a run and drives it to a terminal state.
    ///
    /// # Errors
    ///
    /// See [`EnrichmentPipeline::start`] and [`EnrichmentRun::execute`].
    pub async fn run(
        &self,
        collection: Vec<LinkRecord>,
        config: &ProviderConfig,
    ) -> Result<RunReport, PipelineError> {
        self.start(collection, config)?.execute().await
    }
}

/// A live run. Dropping it, finished or not, frees the pipeline.
pub struct EnrichmentRun<'p> {
    pipeline: &'p EnrichmentPipeline<'p>,
    run_id: Uuid,
    config: ProviderConfig,
    collection: Vec<LinkRecord>,
    targets: Vec<String>,
    cursor: usize,
    succeeded: usize,
    failures: Vec<FailureRecord>,
}

impl EnrichmentRun<'_> {
    /// Identifier of this run.
    #[must_use]
    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Ids this run will process, in order.
    #[must_use]
    pub fn targets(&self) -> &[String] {
        &self.targets
    }

    /// Processes the targets one by one until done or cancelled.
    ///
    /// The stop flag is checked only between items, so an in-flight call
    /// always finishes and its result is applied.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Commit`] if the sink rejects a snapshot.
    /// Items committed before that point stay committed.
    pub async fn execute(mut self) -> Result<RunReport, PipelineError> {
        let outcome = loop {
            if self.cursor == self.targets.len() {
                break RunOutcome::Completed;
            }
            if self.pipeline.flags.cancel.load(Ordering::Acquire) {
                break RunOutcome::Cancelled;
            }
            let id = self.targets[self.cursor].clone();
            self.process(&id).await?;
            self.cursor += 1;
            let current = self.cursor;
            self.pipeline.progress.send_modify(|p| p.current = current);
        };

        let report = RunReport {
            run_id: self.run_id,
            outcome,
            progress: Progress { current: self.cursor, total: self.targets.len(), running: false },
            succeeded: self.succeeded,
            failures: std::mem::take(&mut self.failures),
            collection: std::mem::take(&mut self.collection),
        };
        info!(
            run_id = %report.run_id,
            outcome = ?report.outcome,
            succeeded = report.succeeded,
            failed = report.failed(),
            "enrichment run finished"
        );
        drop(self);
        Ok(report)
    }

    async fn process(&mut self, id: &str) -> Result<(), CommitError> {
        let Some(index) = position(&self.collection, id) else {
            return Ok(());
        };
        let request = DescribeRequest {
            title: self.collection[index].title.clone(),
            url: self.collection[index].url.clone(),
        };

        let generated = self.pipeline.describer.describe(&request, &self.config).await;
        let result = generated.and_then(|text| {
            let text = text.trim().to_string();
            if text.is_empty() {
                Err(ProviderError::Empty { provider: self.config.provider.to_string() })
            } else {
                Ok(text)
            }
        });

        match result {
            Ok(description) => {
                set_description(&mut self.collection, id, &description);
                self.pipeline.sink.commit(&self.collection)?;
                self.succeeded += 1;
                debug!(run_id = %self.run_id, %id, "description committed");
            }
            Err(error) => {
                let failure = FailureRecord {
                    id: id.to_string(),
                    title: request.title,
                    error,
                    at: self.pipeline.clock.now(),
                };
                warn!(
                    run_id = %self.run_id,
                    id = %failure.id,
                    title = %failure.title,
                    error = %failure.error,
                    "description generation failed"
                );
                self.failures.push(failure);
            }
        }
        Ok(())
    }
}

impl Drop for EnrichmentRun<'_> {
    fn drop(&mut self) {
        self.pipeline.progress.send_modify(|p| p.running = false);
        self.pipeline.flags.running.store(false, Ordering::Release);
        self.pipeline.flags.cancel.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use chrono::TimeZone;

    use super::*;
    use crate::ports::describer::DescribeFuture;

    struct FixedClock;

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap()
        }
    }

    /// Answers by title; can pull the stop lever while serving a given title.
    #[derive(Default)]
    struct ScriptedDescriber {
        answers: HashMap<String, Result<String, ProviderError>>,
        calls: Mutex<Vec<String>>,
        cancel_during: Mutex<Option<(String, CancelHandle)>>,
    }

    impl ScriptedDescriber {
        fn answering(answers: &[(&str, Result<&str, &str>)]) -> Self {
            let answers = answers
                .iter()
                .map(|(title, answer)| {
                    let answer = (*answer)
                        .map(str::to_string)
                        .map_err(|msg| ProviderError::Other(msg.to_string()));
                    ((*title).to_string(), answer)
                })
                .collect();
            Self { answers, ..Self::default() }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl DescriptionGenerator for ScriptedDescriber {
        fn describe(&self, request: &DescribeRequest, _config: &ProviderConfig) -> DescribeFuture<'_> {
            self.calls.lock().unwrap().push(request.title.clone());
            if let Some((title, handle)) = self.cancel_during.lock().unwrap().as_ref() {
                if *title == request.title {
                    handle.request_cancel();
                }
            }
            let answer = self
                .answers
                .get(&request.title)
                .cloned()
                .unwrap_or_else(|| Ok(format!("About {}", request.title)));
            Box::pin(async move { answer })
        }
    }

    #[derive(Default)]
    struct MemSink {
        commits: Mutex<Vec<Vec<LinkRecord>>>,
        fail: bool,
    }

    impl MemSink {
        fn commits(&self) -> Vec<Vec<LinkRecord>> {
            self.commits.lock().unwrap().clone()
        }
    }

    impl CollectionSink for MemSink {
        fn commit(&self, links: &[LinkRecord]) -> Result<(), CommitError> {
            if self.fail {
                return Err(CommitError("disk full".into()));
            }
            self.commits.lock().unwrap().push(links.to_vec());
            Ok(())
        }
    }

    fn config() -> ProviderConfig {
        ProviderConfig { api_key: "test-key".into(), ..ProviderConfig::default() }
    }

    fn link(id: &str, description: Option<&str>) -> LinkRecord {
        let link = LinkRecord::new(id, id, format!("https://{id}.example"), "misc");
        match description {
            Some(text) => link.with_description(text),
            None => link,
        }
    }

    fn description_of<'l>(links: &'l [LinkRecord], id: &str) -> Option<&'l str> {
        links.iter().find(|l| l.id == id).and_then(|l| l.description.as_deref())
    }

    #[tokio::test]
    async fn targets_exactly_the_missing_set_in_order() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);

        let collection = vec![link("Z", Some("kept")), link("X", None), link("Y", None)];
        let report = pipeline.run(collection, &config()).await.unwrap();

        assert_eq!(describer.calls(), ["X", "Y"]);
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.succeeded, 2);
        assert_eq!(description_of(&report.collection, "Z"), Some("kept"));
        assert_eq!(description_of(&report.collection, "X"), Some("About X"));

        let commits = sink.commits();
        assert_eq!(commits.len(), 2, "one commit per enriched item");
        assert_eq!(description_of(&commits[0], "X"), Some("About X"));
        assert_eq!(description_of(&commits[0], "Y"), None);
        assert_eq!(commits[1], report.collection);
    }

    #[tokio::test]
    async fn single_failure_does_not_abort_the_batch() {
        let describer = ScriptedDescriber::answering(&[
            ("X", Err("quota exceeded")),
            ("Y", Ok("Why not")),
        ]);
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);

        let report = pipeline.run(vec![link("X", None), link("Y", None)], &config()).await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.progress.current, 2);
        assert_eq!(report.progress.total, 2);
        assert_eq!(description_of(&report.collection, "X"), None);
        assert_eq!(description_of(&report.collection, "Y"), Some("Why not"));
        assert_eq!(report.failed(), 1);
        assert_eq!(report.failures[0].id, "X");
        assert_eq!(report.failures[0].error, ProviderError::Other("quota exceeded".into()));
        assert_eq!(report.failures[0].at, FixedClock.now());
        assert_eq!(sink.commits().len(), 1);
        assert_eq!(pipeline.progress(), Progress { current: 2, total: 2, running: false });
    }

    #[tokio::test]
    async fn blank_output_counts_as_failure() {
        let describer = ScriptedDescriber::answering(&[("X", Ok("   "))]);
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);

        let report = pipeline.run(vec![link("X", None)], &config()).await.unwrap();

        assert_eq!(report.failures[0].error, ProviderError::Empty { provider: "gemini".into() });
        assert!(sink.commits().is_empty());
    }

    #[tokio::test]
    async fn cancellation_is_honoured_between_items() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);
        *describer.cancel_during.lock().unwrap() = Some(("X".into(), pipeline.cancel_handle()));

        let report = pipeline.run(vec![link("X", None), link("Y", None)], &config()).await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Cancelled);
        assert_eq!(describer.calls(), ["X"]);
        assert_eq!(description_of(&report.collection, "X"), Some("About X"));
        assert_eq!(description_of(&report.collection, "Y"), None);
        assert_eq!(report.progress.current, 1);
        assert_eq!(sink.commits().len(), 1);
        assert!(!pipeline.is_running());
    }

    #[tokio::test]
    async fn second_start_is_rejected_while_live() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);
        let collection = vec![link("X", None), link("Y", None)];

        let run = pipeline.start(collection.clone(), &config()).unwrap();
        assert!(matches!(
            pipeline.start(collection.clone(), &config()),
            Err(PipelineError::AlreadyRunning)
        ));
        run.execute().await.unwrap();

        assert_eq!(sink.commits().len(), 2);
        assert_eq!(describer.calls(), ["X", "Y"]);

        // Terminal state reached: the pipeline accepts a new run.
        let again = pipeline.run(collection, &config()).await.unwrap();
        assert_eq!(again.outcome, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn live_run_wins_over_a_bad_config() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);
        let collection = vec![link("X", None)];

        let run = pipeline.start(collection.clone(), &config()).unwrap();
        assert!(matches!(
            pipeline.start(collection, &ProviderConfig::default()),
            Err(PipelineError::AlreadyRunning)
        ));
        assert!(pipeline.is_running());

        let report = run.execute().await.unwrap();
        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.succeeded, 1);
    }

    #[tokio::test]
    async fn cancel_right_after_start_stops_before_first_item() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);

        let run = pipeline.start(vec![link("X", None), link("Y", None)], &config()).unwrap();
        let run_id = run.run_id();
        assert!(pipeline.request_cancel());
        let report = run.execute().await.unwrap();

        assert_eq!(report.run_id, run_id);
        assert_eq!(report.outcome, RunOutcome::Cancelled);
        assert!(describer.calls().is_empty());
        assert!(sink.commits().is_empty());

        // The stop request died with the run.
        let next = pipeline.run(vec![link("X", None)], &config()).await.unwrap();
        assert_eq!(next.outcome, RunOutcome::Completed);
        assert_ne!(next.run_id, run_id);
    }

    #[tokio::test]
    async fn nothing_to_do_completes_without_commit() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);

        let report = pipeline.run(vec![link("Z", Some("done"))], &config()).await.unwrap();

        assert_eq!(report.outcome, RunOutcome::Completed);
        assert_eq!(report.progress.total, 0);
        assert!(sink.commits().is_empty());
        assert!(describer.calls().is_empty());
    }

    #[tokio::test]
    async fn cancel_without_live_run_is_ignored() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);

        assert!(!pipeline.request_cancel());
        let report = pipeline.run(vec![link("X", None)], &config()).await.unwrap();
        assert_eq!(report.outcome, RunOutcome::Completed);
    }

    #[tokio::test]
    async fn commit_failure_ends_the_run_and_frees_the_pipeline() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink { fail: true, ..MemSink::default() };
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);

        let err = pipeline.run(vec![link("X", None), link("Y", None)], &config()).await.unwrap_err();

        assert!(matches!(err, PipelineError::Commit(_)));
        assert_eq!(describer.calls(), ["X"]);
        assert!(!pipeline.is_running());
        assert!(!pipeline.progress().running);
    }

    #[tokio::test]
    async fn invalid_config_is_rejected_before_claiming() {
        let describer = ScriptedDescriber::default();
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);

        let err = pipeline.run(vec![link("X", None)], &ProviderConfig::default()).await.unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::MissingApiKey(_))));
        assert!(!pipeline.is_running());
    }

    /// Records the progress visible to subscribers at each commit.
    #[derive(Default)]
    struct ProgressSink {
        rx: Mutex<Option<watch::Receiver<Progress>>>,
        seen: Mutex<Vec<usize>>,
    }

    impl CollectionSink for ProgressSink {
        fn commit(&self, _links: &[LinkRecord]) -> Result<(), CommitError> {
            if let Some(rx) = self.rx.lock().unwrap().as_ref() {
                let current = rx.borrow().current;
                self.seen.lock().unwrap().push(current);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn progress_advances_one_item_at_a_time() {
        let describer = ScriptedDescriber::default();
        let sink = ProgressSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);
        *sink.rx.lock().unwrap() = Some(pipeline.subscribe());

        let report = pipeline
            .run(vec![link("A", None), link("B", None), link("C", None)], &config())
            .await
            .unwrap();

        assert_eq!(*sink.seen.lock().unwrap(), [0, 1, 2]);
        assert_eq!(report.progress, Progress { current: 3, total: 3, running: false });
    }

    #[tokio::test]
    async fn progress_is_published_monotonically() {
        let describer = ScriptedDescriber::answering(&[("B", Err("boom"))]);
        let sink = MemSink::default();
        let pipeline = EnrichmentPipeline::new(&describer, &sink, &FixedClock);
        let mut rx = pipeline.subscribe();

        let run = pipeline
            .start(vec![link("A", None), link("B", None), link("C", None)], &config())
            .unwrap();
        assert_eq!(*rx.borrow_and_update(), Progress { current: 0, total: 3, running: true });
        run.execute().await.unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), Progress { current: 3, total: 3, running: false });
    }
}
