//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Provider;

/// Top-level CLI parser for `linkboard`.
#[derive(Debug, Parser)]
#[command(name = "linkboard", version, about = "Reorder bookmarks and fill in missing descriptions")]
pub struct Cli {
    /// YAML link document (defaults to `LINKBOARD_STORE`, then `links.yaml`).
    #[arg(long, global = true, value_name = "PATH")]
    pub store: Option<PathBuf>,
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the collection in its stored order.
    List {
        /// Only show links in this category (`all` shows everything).
        #[arg(long)]
        category: Option<String>,
    },
    /// Print the categories links are filed under.
    Categories,
    /// Drag a link over one or more targets, then drop it.
    Move {
        /// Id of the link to drag.
        id: String,
        /// Ids hovered in turn; the link ends up right before the last one.
        #[arg(long = "over", value_name = "TARGET", required = true, num_args = 1..)]
        over: Vec<String>,
        /// Commit once on drop instead of after every hover.
        #[arg(long)]
        on_drop: bool,
    },
    /// Generate descriptions for links that have none.
    Enrich {
        /// Provider override (`gemini` or `openai-compatible`).
        #[arg(long)]
        provider: Option<Provider>,
        /// Model override.
        #[arg(long)]
        model: Option<String>,
        /// Base URL override for OpenAI-compatible endpoints.
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::{Cli, Command};
    use crate::config::Provider;
    use clap::Parser;

    #[test]
    fn parses_move_with_several_targets() {
        let cli = Cli::parse_from(["linkboard", "move", "gh", "--over", "rs", "--over", "docs", "--on-drop"]);
        match cli.command {
            Command::Move { id, over, on_drop } => {
                assert_eq!(id, "gh");
                assert_eq!(over, ["rs", "docs"]);
                assert!(on_drop);
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn move_requires_a_target() {
        assert!(Cli::try_parse_from(["linkboard", "move", "gh"]).is_err());
    }

    #[test]
    fn parses_enrich_overrides_and_global_store() {
        let cli = Cli::parse_from([
            "linkboard",
            "enrich",
            "--provider",
            "openai-compatible",
            "--base-url",
            "http://localhost:11434/v1",
            "--store",
            "/tmp/nav.yaml",
        ]);
        assert_eq!(cli.store.as_deref(), Some(std::path::Path::new("/tmp/nav.yaml")));
        assert!(matches!(
            cli.command,
            Command::Enrich { provider: Some(Provider::OpenaiCompatible), base_url: Some(_), model: None }
        ));
    }

    #[test]
    fn rejects_unknown_provider() {
        assert!(Cli::try_parse_from(["linkboard", "enrich", "--provider", "mystery"]).is_err());
    }
}
