//! `linkboard categories` command.

use std::fmt::Write as _;
use std::path::Path;

use crate::context::ServiceContext;
use crate::model::collection::categories_in_use;
use crate::store::{LinkDocument, LinkStore};

/// Execute the `categories` command.
///
/// # Errors
///
/// Returns an error string if the store cannot be loaded.
pub fn run(ctx: &ServiceContext, store_path: &Path) -> Result<(), String> {
    let document = LinkStore::new(ctx.fs.as_ref(), store_path).load().map_err(|e| e.to_string())?;
    print!("{}", render(&document));
    Ok(())
}

/// Declared categories first, then ids that links use without a declaration.
fn render(document: &LinkDocument) -> String {
    let mut ids: Vec<String> = document.categories.iter().map(|c| c.id.clone()).collect();
    for id in categories_in_use(&document.links) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    if ids.is_empty() {
        return "No categories.\n".to_string();
    }

    let mut out = String::new();
    for id in &ids {
        let count = document.links.iter().filter(|l| l.category_id == *id).count();
        let _ = writeln!(out, "{id}\t{} ({count})", document.category_name(id));
    }
    out
}
