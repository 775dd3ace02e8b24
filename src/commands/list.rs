//! `linkboard list` command.

use std::fmt::Write as _;
use std::path::Path;

use crate::context::ServiceContext;
use crate::model::collection::filter_by_category;
use crate::model::CategoryFilter;
use crate::store::{LinkDocument, LinkStore};

/// Execute the `list` command.
///
/// # Errors
///
/// Returns an error string if the store cannot be loaded.
pub fn run(ctx: &ServiceContext, store_path: &Path, category: Option<&str>) -> Result<(), String> {
    let document = LinkStore::new(ctx.fs.as_ref(), store_path).load().map_err(|e| e.to_string())?;
    print!("{}", render(&document, &CategoryFilter::from_arg(category)));
    Ok(())
}

/// Formats the links matching `filter`, one numbered block per link.
pub(crate) fn render(document: &LinkDocument, filter: &CategoryFilter) -> String {
    let links = filter_by_category(&document.links, filter);
    if links.is_empty() {
        return "No links found.\n".to_string();
    }

    let mut out = String::new();
    for (i, link) in links.iter().enumerate() {
        let category = document.category_name(&link.category_id);
        let _ = writeln!(out, "{:>3}. {} [{category}] {}", i + 1, link.id, link.title);
        let _ = writeln!(out, "     {}", link.url);
        match link.description.as_deref().map(str::trim).filter(|d| !d.is_empty()) {
            Some(description) => {
                let _ = writeln!(out, "     {description}");
            }
            None => out.push_str("     (no description)\n"),
        }
    }
    out
}
