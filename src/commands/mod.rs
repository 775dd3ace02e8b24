//! Command dispatch and handlers.

pub mod categories;
pub mod enrich;
pub mod list;
pub mod reorder;

use crate::cli::{Cli, Command};
use crate::config::Settings;
use crate::context::ServiceContext;
use crate::reorder::CommitPolicy;

/// Dispatch a parsed command line to its handler.
///
/// `LINKBOARD_REPLAY` or `LINKBOARD_RECORD` switch the description
/// generator to a cassette; see [`ServiceContext::from_env`].
///
/// # Errors
///
/// Returns an error string if settings are invalid or the handler fails.
pub async fn dispatch(cli: &Cli) -> Result<(), String> {
    let mut settings = Settings::from_env().map_err(|e| e.to_string())?;
    if let Some(store) = &cli.store {
        settings.store_path.clone_from(store);
    }
    let ctx = ServiceContext::from_env()?;
    dispatch_with_context(&cli.command, &settings, &ctx).await
}

/// Dispatch a command with the given settings and service context.
async fn dispatch_with_context(
    command: &Command,
    settings: &Settings,
    ctx: &ServiceContext,
) -> Result<(), String> {
    let store_path = settings.store_path.as_path();
    match command {
        Command::List { category } => list::run(ctx, store_path, category.as_deref()),
        Command::Categories => categories::run(ctx, store_path),
        Command::Move { id, over, on_drop } => {
            let policy = if *on_drop { CommitPolicy::OnDrop } else { CommitPolicy::Eager };
            reorder::run(ctx, store_path, id, over, policy)
        }
        Command::Enrich { provider, model, base_url } => {
            let mut config = settings.provider.clone();
            if let Some(provider) = provider {
                config.provider = *provider;
            }
            if let Some(model) = model {
                config.model.clone_from(model);
            }
            if let Some(url) = base_url {
                config.base_url = Some(url.trim_end_matches('/').to_string());
            }
            enrich::run(ctx, store_path, &config).await
        }
    }
}
