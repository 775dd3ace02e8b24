//! `linkboard enrich` command.
//!
//! Fills in missing descriptions one link at a time, printing progress to
//! stderr. Ctrl-C asks the run to stop after the link in flight.

use std::fmt::Write as _;
use std::path::Path;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::ProviderConfig;
use crate::context::ServiceContext;
use crate::enrich::{EnrichmentPipeline, Progress, RunOutcome, RunReport};
use crate::model::LinkRecord;
use crate::store::LinkStore;

/// Execute the `enrich` command.
///
/// Per-link provider failures are reported but do not fail the command.
///
/// # Errors
///
/// Returns an error string if the store cannot be loaded, the provider
/// configuration is invalid, or a commit fails.
pub async fn run(ctx: &ServiceContext, store_path: &Path, config: &ProviderConfig) -> Result<(), String> {
    let store = LinkStore::new(ctx.fs.as_ref(), store_path);
    let links = store.load().map_err(|e| e.to_string())?.links;
    let report = enrich(ctx, &store, links, config).await?;
    print!("{}", summarize(&report));
    Ok(())
}

async fn enrich(
    ctx: &ServiceContext,
    store: &LinkStore<'_>,
    links: Vec<LinkRecord>,
    config: &ProviderConfig,
) -> Result<RunReport, String> {
    let pipeline = EnrichmentPipeline::new(ctx.describer.as_ref(), store, ctx.clock.as_ref());
    let run = pipeline.start(links, config).map_err(|e| e.to_string())?;
    info!(
        run_id = %run.run_id(),
        store = %store.path().display(),
        targets = run.targets().len(),
        "enriching links"
    );
    if !run.targets().is_empty() {
        eprintln!("Describing {} link(s) with {}...", run.targets().len(), config.provider);
    }

    let printer = spawn_progress_printer(pipeline.subscribe());
    let handle = pipeline.cancel_handle();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() && handle.request_cancel() {
            eprintln!("Interrupted; stopping after the current link.");
        }
    });

    let result = run.execute().await;
    interrupt.abort();
    // Closing the progress channel ends the printer.
    drop(pipeline);
    let _ = printer.await;
    result.map_err(|e| e.to_string())
}

fn spawn_progress_printer(mut progress: watch::Receiver<Progress>) -> JoinHandle<()> {
    tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let snapshot = *progress.borrow_and_update();
            if snapshot.running && snapshot.current > 0 {
                eprintln!("  {snapshot}");
            }
        }
    })
}

fn summarize(report: &RunReport) -> String {
    let outcome = match report.outcome {
        RunOutcome::Completed => "completed",
        RunOutcome::Cancelled => "cancelled",
    };
    let mut out = format!(
        "Enrichment {outcome} at {}: {} described, {} failed.\n",
        report.progress,
        report.succeeded,
        report.failed()
    );
    for failure in &report.failures {
        let _ = writeln!(out, "  {} ({}): {}", failure.id, failure.title, failure.error);
    }
    out
}
