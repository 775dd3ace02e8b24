//! Ordered link collection with drag reordering and batch description enrichment.
//!
//! The core lives in [`model::collection`] (pure reordering), [`reorder`]
//! (the drag state machine) and [`enrich`] (the sequential, cancellable
//! enrichment pipeline). Everything else wires those to a YAML store, the
//! text-generation providers and the `linkboard` CLI.

pub mod adapters;
pub mod cassette;
pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod enrich;
pub mod logging;
pub mod model;
pub mod ports;
pub mod reorder;
pub mod store;

use clap::Parser;

/// Run the CLI with the provided arguments.
///
/// # Errors
///
/// Returns an error string when argument parsing fails or command execution fails.
pub async fn run<I, T>(args: I) -> Result<(), String>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let cli = cli::Cli::try_parse_from(args).map_err(|err| err.to_string())?;
    commands::dispatch(&cli).await
}

#[cfg(test)]
mod tests {
    use super::run;

    #[tokio::test]
    async fn run_lists_an_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = dir.path().join("links.yaml");
        let result = run(["linkboard", "--store", store.to_str().unwrap(), "list"]).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn run_errors_on_unknown_subcommand() {
        let result = run(["linkboard", "unknown"]).await;
        assert!(result.is_err());
    }
}
