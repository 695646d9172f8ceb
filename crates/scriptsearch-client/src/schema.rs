//! Index settings and field mappings.
//!
//! Field types:
//! - `movie_id`, `imdb_id`, `year`: keyword (exact match)
//! - `title`, `cast`, `directors`, `genres`: analyzed text with a `keyword`
//!   sub-field for exact match and sorting
//! - `writers`, `plot`, `screenplay_text`, `combined_text`: analyzed text
//! - `imdb_rating`: float
//!
//! All text fields use a custom analyzer: standard tokenizer, lowercase,
//! ASCII folding.

use serde_json::{Map, Value, json};

/// Name of the custom text analyzer.
pub const ANALYZER_NAME: &str = "screenplay_analyzer";

const KEYWORD_FIELDS: &[&str] = &["movie_id", "imdb_id", "year"];
const TEXT_WITH_KEYWORD_FIELDS: &[&str] = &["title", "cast", "directors", "genres"];
const TEXT_FIELDS: &[&str] = &["writers", "plot", "screenplay_text", "combined_text"];

/// Index creation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSchema {
    /// Primary shard count.
    pub shards: u32,
    /// Replica count.
    pub replicas: u32,
}

impl Default for IndexSchema {
    fn default() -> Self {
        Self {
            shards: 1,
            replicas: 1,
        }
    }
}

impl IndexSchema {
    /// Build the index creation request body.
    pub fn to_body(&self) -> Value {
        let mut properties = Map::new();

        for field in KEYWORD_FIELDS {
            properties.insert((*field).to_string(), json!({"type": "keyword"}));
        }
        for field in TEXT_WITH_KEYWORD_FIELDS {
            properties.insert(
                (*field).to_string(),
                json!({
                    "type": "text",
                    "analyzer": ANALYZER_NAME,
                    "fields": {"keyword": {"type": "keyword"}}
                }),
            );
        }
        for field in TEXT_FIELDS {
            properties.insert(
                (*field).to_string(),
                json!({"type": "text", "analyzer": ANALYZER_NAME}),
            );
        }
        properties.insert("imdb_rating".to_string(), json!({"type": "float"}));

        json!({
            "settings": {
                "index": {
                    "number_of_shards": self.shards,
                    "number_of_replicas": self.replicas
                },
                "analysis": {
                    "analyzer": {
                        ANALYZER_NAME: {
                            "type": "custom",
                            "tokenizer": "standard",
                            "filter": ["lowercase", "asciifolding"]
                        }
                    }
                }
            },
            "mappings": {"properties": properties}
        })
    }
}
