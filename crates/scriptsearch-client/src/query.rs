//! Query body construction.
//!
//! [`QueryBuilder`] turns free text into a weighted multi-field match with
//! fuzzy term matching and highlighting on the large text fields.

use serde_json::{Value, json};

/// Fields that produce highlight fragments.
pub const HIGHLIGHT_FIELDS: &[&str] = &["screenplay_text", "title", "combined_text"];

/// Per-field boosts for a multi-field query.
///
/// Order is preserved in the request body.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldWeights(Vec<(String, f32)>);

impl FieldWeights {
    /// Create weights from `(field, boost)` pairs.
    pub fn new<I, S>(weights: I) -> Self
    where
        I: IntoIterator<Item = (S, f32)>,
        S: Into<String>,
    {
        Self(weights.into_iter().map(|(f, w)| (f.into(), w)).collect())
    }

    /// Field expressions in engine syntax, e.g. `title^5`.
    ///
    /// A boost of exactly 1 is written without suffix.
    pub fn to_fields(&self) -> Vec<String> {
        self.0
            .iter()
            .map(|(field, weight)| {
                if (*weight - 1.0).abs() < f32::EPSILON {
                    field.clone()
                } else {
                    format!("{field}^{weight}")
                }
            })
            .collect()
    }

    /// Boost for `field`, if it is queried.
    pub fn weight(&self, field: &str) -> Option<f32> {
        self.0.iter().find(|(f, _)| f == field).map(|(_, w)| *w)
    }
}

impl Default for FieldWeights {
    /// Title outranks screenplay text, which outranks the rest.
    fn default() -> Self {
        Self::new([
            ("title", 5.0),
            ("screenplay_text", 3.0),
            ("combined_text", 2.0),
            ("cast", 2.0),
            ("directors", 2.0),
            ("genres", 2.0),
            ("plot", 1.0),
        ])
    }
}

/// Builds search request bodies.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    weights: FieldWeights,
    fuzziness: String,
    size: usize,
}

impl QueryBuilder {
    /// Create a builder with the given weights.
    pub fn new(weights: FieldWeights) -> Self {
        Self {
            weights,
            fuzziness: "AUTO".to_string(),
            size: 10,
        }
    }

    /// Set the maximum number of hits.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set the fuzziness parameter (`"AUTO"`, `"0"`, `"1"`, ...).
    pub fn with_fuzziness(mut self, fuzziness: impl Into<String>) -> Self {
        self.fuzziness = fuzziness.into();
        self
    }

    /// Build the request body for `text`.
    pub fn build(&self, text: &str) -> Value {
        let highlight: serde_json::Map<String, Value> = HIGHLIGHT_FIELDS
            .iter()
            .map(|field| ((*field).to_string(), json!({})))
            .collect();

        json!({
            "size": self.size,
            "query": {
                "multi_match": {
                    "query": text,
                    "fields": self.weights.to_fields(),
                    "fuzziness": self.fuzziness
                }
            },
            "highlight": {"fields": highlight}
        })
    }
}

impl Default for QueryBuilder {
    fn default() -> Self {
        Self::new(FieldWeights::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_fields() {
        assert_eq!(
            FieldWeights::default().to_fields(),
            vec![
                "title^5",
                "screenplay_text^3",
                "combined_text^2",
                "cast^2",
                "directors^2",
                "genres^2",
                "plot"
            ]
        );
    }

    #[test]
    fn test_fractional_weight() {
        let weights = FieldWeights::new([("plot", 1.5)]);
        assert_eq!(weights.to_fields(), vec!["plot^1.5"]);
        assert_eq!(weights.weight("plot"), Some(1.5));
        assert_eq!(weights.weight("title"), None);
    }

    #[test]
    fn test_build_body() {
        let body = QueryBuilder::default().with_size(3).build("alien mother");
        assert_eq!(body["size"], json!(3));
        assert_eq!(body["query"]["multi_match"]["query"], json!("alien mother"));
        assert_eq!(body["query"]["multi_match"]["fuzziness"], json!("AUTO"));
        assert_eq!(body["query"]["multi_match"]["fields"][0], json!("title^5"));
        for field in HIGHLIGHT_FIELDS {
            assert!(body["highlight"]["fields"].get(*field).is_some());
        }
    }

    #[test]
    fn test_custom_fuzziness() {
        let body = QueryBuilder::default().with_fuzziness("0").build("x");
        assert_eq!(body["query"]["multi_match"]["fuzziness"], json!("0"));
    }
}
