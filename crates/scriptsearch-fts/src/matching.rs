//! Identifier matching between screenplays and metadata.
//!
//! A quick pre-flight check: for a sample of screenplay files, how many
//! identifiers would find their metadata record?

use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use scriptsearch_core::{Result, source_label};
use serde::Serialize;

use crate::corpus::MetadataIndex;
use crate::screenplay::{ensure_directory, find_files_with_extensions, read_screenplay};

/// Example matches listed in a report.
pub const MATCH_EXAMPLES: usize = 3;

/// One sampled identifier and its metadata title, if matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchExample {
    /// Screenplay identifier.
    pub movie_id: String,
    /// Whether metadata exists for it.
    pub matched: bool,
    /// Metadata title, when matched and present.
    pub title: Option<String>,
}

impl fmt::Display for MatchExample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.matched {
            write!(
                f,
                "✓ Match found: {} -> {}",
                self.movie_id,
                self.title.as_deref().unwrap_or("(untitled)")
            )
        } else {
            write!(f, "✗ No match: {}", self.movie_id)
        }
    }
}

/// Result of checking a screenplay sample against the metadata index.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MatchReport {
    /// Identifiers in the metadata index.
    pub metadata_ids: usize,
    /// Distinct screenplay identifiers in the sample, in file order.
    pub sample_ids: Vec<String>,
    /// Sample identifiers without metadata, in file order.
    pub missing: Vec<String>,
    /// The first few sample identifiers and whether they matched.
    pub examples: Vec<MatchExample>,
    /// Sampled files that could not be read, with the reason.
    pub unreadable: Vec<(String, String)>,
}

/// Compare sampled screenplay identifiers with the index.
///
/// `sample` holds the identifier of each sampled file in order; files
/// without one contribute `None` and are ignored. Repeated identifiers are
/// counted once.
pub fn match_report(index: &MetadataIndex, sample: &[Option<String>]) -> MatchReport {
    let mut seen = HashSet::new();
    let sample_ids: Vec<String> = sample
        .iter()
        .flatten()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect();

    let missing = sample_ids
        .iter()
        .filter(|id| !index.contains(id))
        .cloned()
        .collect();

    let examples = sample_ids
        .iter()
        .take(MATCH_EXAMPLES)
        .map(|id| {
            let record = index.lookup(id);
            MatchExample {
                movie_id: id.clone(),
                matched: record.is_some(),
                title: record.and_then(|r| r.title.clone()),
            }
        })
        .collect();

    MatchReport {
        metadata_ids: index.len(),
        sample_ids,
        missing,
        examples,
        unreadable: Vec::new(),
    }
}

/// Read the first `sample_size` screenplay files under `dir` and match
/// their identifiers against `index`.
pub async fn check_matching(
    dir: &Path,
    extensions: &HashSet<String>,
    index: &MetadataIndex,
    sample_size: usize,
) -> Result<MatchReport> {
    ensure_directory(dir).await?;
    let files = find_files_with_extensions(dir, extensions).await?;

    let mut ids = Vec::with_capacity(sample_size.min(files.len()));
    let mut unreadable = Vec::new();
    for path in files.iter().take(sample_size) {
        match read_screenplay(path).await {
            Ok(record) => ids.push(record.movie_id),
            Err(e) => {
                log::warn!("Error reading {}: {e}", source_label(path));
                unreadable.push((source_label(path), e.to_string()));
            }
        }
    }

    Ok(MatchReport {
        unreadable,
        ..match_report(index, &ids)
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::screenplay::extension_set;
    use serde_json::json;
    use tempfile::TempDir;

    fn index() -> MetadataIndex {
        MetadataIndex::from_value(
            &json!({"movies": [
                {"movie_id": "m1", "title": "Alien"},
                {"movie_id": "m2"},
                {"movie_id": "m3", "title": "Heat"}
            ]}),
            "test",
        )
        .unwrap()
    }

    fn ids(items: &[Option<&str>]) -> Vec<Option<String>> {
        items.iter().map(|i| i.map(str::to_string)).collect()
    }

    #[test]
    fn test_match_report() {
        let sample = ids(&[Some("m1"), None, Some("x9"), Some("m1"), Some("m2"), Some("m3")]);
        let report = match_report(&index(), &sample);

        assert_eq!(report.metadata_ids, 3);
        assert_eq!(report.sample_ids, vec!["m1", "x9", "m2", "m3"]);
        assert_eq!(report.missing, vec!["x9"]);
        assert_eq!(report.examples.len(), MATCH_EXAMPLES);
        assert_eq!(report.examples[0].to_string(), "✓ Match found: m1 -> Alien");
        assert_eq!(report.examples[1].to_string(), "✗ No match: x9");
        assert_eq!(report.examples[2].to_string(), "✓ Match found: m2 -> (untitled)");
    }

    #[test]
    fn test_match_report_empty_sample() {
        let report = match_report(&index(), &[]);
        assert!(report.sample_ids.is_empty());
        assert!(report.missing.is_empty());
        assert!(report.examples.is_empty());
    }

    #[tokio::test]
    async fn test_check_matching_samples_first_files() {
        let dir = TempDir::new().unwrap();
        for (name, body) in [
            ("a.json", r#"{"movie_id": "m1"}"#),
            ("b.json", "{broken"),
            ("c.json", r#"{"movie_id": "zz"}"#),
            ("d.json", r#"{"movie_id": "m3"}"#),
        ] {
            std::fs::write(dir.path().join(name), body).unwrap();
        }

        let report = check_matching(dir.path(), &extension_set(&["json".to_string()]), &index(), 3)
            .await
            .unwrap();

        assert_eq!(report.sample_ids, vec!["m1", "zz"]);
        assert_eq!(report.missing, vec!["zz"]);
        assert_eq!(report.unreadable.len(), 1);
        assert_eq!(report.unreadable[0].0, "b.json");
    }
}
