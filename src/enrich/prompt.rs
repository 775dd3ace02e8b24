//! Prompt construction and response clean-up for description generation.

use crate::ports::describer::DescribeRequest;

/// Upper bound on description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 120;

/// Builds the instruction sent to the provider for one link.
#[must_use]
pub fn build_prompt(request: &DescribeRequest) -> String {
    format!(
        "Write a one-sentence description of the website below for a bookmark \
         dashboard. Keep it under {MAX_DESCRIPTION_CHARS} characters, describe what \
         the site is for, and reply with the description only.\n\n\
         Title: {title}\nURL: {url}",
        title = request.title.trim(),
        url = request.url.trim(),
    )
}

/// Normalises raw model output into a single-line description.
///
/// Strips surrounding whitespace and quotes, keeps the first non-empty line
/// and truncates to [`MAX_DESCRIPTION_CHARS`]. Returns `None` when nothing
/// usable is left.
#[must_use]
pub fn clean_description(raw: &str) -> Option<String> {
    let line = raw.lines().map(str::trim).find(|line| !line.is_empty())?;
    let line = line.trim_matches(|c| matches!(c, '"' | '\'' | '`' | '“' | '”')).trim();
    if line.is_empty() {
        return None;
    }
    Some(line.chars().take(MAX_DESCRIPTION_CHARS).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_title_and_url() {
        let prompt = build_prompt(&DescribeRequest {
            title: " GitHub ".into(),
            url: "https://github.com".into(),
        });
        assert!(prompt.contains("Title: GitHub\n"));
        assert!(prompt.ends_with("URL: https://github.com"));
    }

    #[test]
    fn cleans_quotes_and_extra_lines() {
        assert_eq!(
            clean_description("\n  \"Code hosting and collaboration.\"\n\nExtra chatter"),
            Some("Code hosting and collaboration.".into())
        );
        assert_eq!(clean_description("  \n \"\" "), None);
    }

    #[test]
    fn truncates_long_output() {
        let long = "x".repeat(500);
        assert_eq!(clean_description(&long).unwrap().chars().count(), MAX_DESCRIPTION_CHARS);
    }
}
