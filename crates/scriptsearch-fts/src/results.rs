//! Result formatting.
//!
//! Turns engine hits into [`QueryResult`]s and renders them as text. Engine
//! order is preserved; the formatter never re-sorts.

use scriptsearch_client::Hit;
use scriptsearch_core::util::lenient::{text, text_or_list_field};
use scriptsearch_core::{QueryResult, coerce_rating};
use serde_json::Value;

/// Rendered when a query matches nothing.
pub const NO_RESULTS: &str = "No results found for your query.";

/// Highlight fragments shown per result.
pub const FRAGMENTS_PER_RESULT: usize = 2;

/// Fields whose highlights are shown, in preference order.
const RENDERED_HIGHLIGHT_FIELDS: &[&str] = &["screenplay_text", "combined_text"];

/// Convert engine hits into results, keeping engine order.
///
/// Missing fields default to empty text or zero.
pub fn to_results(hits: &[Hit]) -> Vec<QueryResult> {
    hits.iter().map(to_result).collect()
}

fn to_result(hit: &Hit) -> QueryResult {
    let source = Value::Object(hit.source.clone());
    let field = |key: &str| source.get(key).and_then(text).unwrap_or_default();

    let movie_id = match field("movie_id") {
        id if id.is_empty() => hit.id.clone().unwrap_or_default(),
        id => id,
    };

    QueryResult {
        movie_id,
        title: field("title"),
        year: field("year"),
        directors: text_or_list_field(&source, "directors")
            .map(|d| d.to_text())
            .unwrap_or_default(),
        imdb_rating: coerce_rating(source.get("imdb_rating")),
        score: hit.score.unwrap_or_default(),
        highlights: hit.highlight.clone(),
    }
}

/// Replace engine emphasis tags with `*`.
///
/// # Examples
///
/// ```
/// use scriptsearch_fts::clean_highlight;
///
/// assert_eq!(clean_highlight("He said <em>hello</em> there"), "He said *hello* there");
/// ```
pub fn clean_highlight(fragment: &str) -> String {
    fragment.replace("<em>", "*").replace("</em>", "*")
}

/// Render results for display.
pub fn render(results: &[QueryResult], query: &str) -> String {
    if results.is_empty() {
        return NO_RESULTS.to_string();
    }

    let mut lines = vec![
        format!("Search results for: '{query}'"),
        String::new(),
        format!("Found {} results", results.len()),
        String::new(),
    ];

    for (i, result) in results.iter().enumerate() {
        lines.push(format!(
            "{}. {} ({}) - IMDb: {:?}",
            i + 1,
            result.title,
            result.year,
            result.imdb_rating
        ));
        lines.push(format!("   Director: {}", result.directors));
        lines.push(format!("   Score: {:.2}", result.score));

        let shown = RENDERED_HIGHLIGHT_FIELDS.iter().find_map(|field| {
            result
                .highlights
                .get(*field)
                .filter(|fragments| !fragments.is_empty())
                .map(|fragments| (*field, fragments))
        });
        if let Some((field, fragments)) = shown {
            lines.push(format!("   Highlights from {field}:"));
            for fragment in fragments.iter().take(FRAGMENTS_PER_RESULT) {
                lines.push(format!("     - {}", clean_highlight(fragment)));
            }
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

// ============================================================================
// Tests
// ============================================================================
