//! `linkboard move` command.

use std::path::Path;

use crate::context::ServiceContext;
use crate::model::collection::position;
use crate::model::{CategoryFilter, LinkRecord};
use crate::ports::sink::CollectionSink;
use crate::reorder::{CommitPolicy, DragReorderController, Hover};
use crate::store::{LinkDocument, LinkStore};

use super::list;

/// Execute the `move` command: grab `id`, hover each of `over` in turn, drop.
///
/// # Errors
///
/// Returns an error string if the store cannot be loaded, `id` is not in the
/// collection, or a commit fails.
pub fn run(
    ctx: &ServiceContext,
    store_path: &Path,
    id: &str,
    over: &[String],
    policy: CommitPolicy,
) -> Result<(), String> {
    let store = LinkStore::new(ctx.fs.as_ref(), store_path);
    let LinkDocument { categories, links } = store.load().map_err(|e| e.to_string())?;
    let links = drag(&store, links, id, over, policy)?;
    print!("{}", list::render(&LinkDocument { categories, links }, &CategoryFilter::All));
    Ok(())
}

/// Replays one drag gesture against `sink` and returns the final order.
pub(crate) fn drag(
    sink: &dyn CollectionSink,
    mut current: Vec<LinkRecord>,
    id: &str,
    over: &[String],
    policy: CommitPolicy,
) -> Result<Vec<LinkRecord>, String> {
    if position(&current, id).is_none() {
        return Err(format!("no link with id `{id}`"));
    }

    let mut controller = DragReorderController::with_policy(sink, policy);
    controller.drag_start(id);
    for target in over {
        match controller.drag_over(&current, target).map_err(|e| e.to_string())? {
            Hover::Moved(next) => current = next,
            Hover::Unchanged => {}
            Hover::Ignored => eprintln!("Ignoring hover over `{target}`."),
        }
    }
    controller.drop_item().map_err(|e| e.to_string())?;
    Ok(current)
}
