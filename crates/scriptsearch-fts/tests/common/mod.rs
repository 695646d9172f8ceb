//! Common fixtures for scriptsearch-fts integration tests.

use std::path::PathBuf;
use std::sync::Arc;

use scriptsearch_client::{ClientConfig, MemoryTransport, SearchGateway};
use scriptsearch_fts::MetadataIndex;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Index name used by every fixture gateway.
pub const INDEX: &str = "screenplays";

/// A metadata file and a screenplay directory on disk.
pub struct Corpus {
    /// Keeps the fixture files alive.
    pub dir: TempDir,
}

impl Corpus {
    /// Write the standard three-movie corpus.
    pub fn standard() -> Self {
        let corpus = Self {
            dir: TempDir::new().unwrap(),
        };
        corpus.write_metadata(&json!({"movies": [
            {
                "movie_id": "m1",
                "title": "Alien",
                "year": 1979,
                "directors": "Ridley Scott",
                "genres": ["Horror", "Sci-Fi"],
                "imdb_rating": "8.5",
                "cast": ["Sigourney Weaver", "Tom Skerritt"]
            },
            {
                "movie_id": "m2",
                "title": "Heat",
                "year": "1995",
                "directors": ["Michael Mann"],
                "imdb_rating": 8.3
            },
            {"movie_id": "m3", "title": "Unfilmed"}
        ]}));
        corpus.write_screenplay("alien.json", &json!({
            "movie_id": "m1",
            "dialogues": [
                {"speaker": "RIPLEY", "text": "Get away from her"},
                {"speaker": "ASH", "text": "ok"}
            ],
            "scenes": [{"location": "INT. NOSTROMO"}]
        }));
        corpus.write_screenplay("heat.json", &json!({
            "movie_id": "m2",
            "scenes": [{"location": "INT. DINER"}]
        }));
        corpus.write_screenplay("orphan.json", &json!({"movie_id": "m404"}));
        corpus
    }

    /// Path of the metadata corpus.
    pub fn metadata_path(&self) -> PathBuf {
        self.dir.path().join("metadata.json")
    }

    /// Directory holding screenplay files.
    pub fn screenplays(&self) -> PathBuf {
        self.dir.path().join("screenplays")
    }

    /// Write the metadata corpus.
    pub fn write_metadata(&self, value: &Value) {
        std::fs::write(self.metadata_path(), value.to_string()).unwrap();
    }

    /// Write one screenplay file.
    pub fn write_screenplay(&self, name: &str, value: &Value) {
        self.write_raw(name, &value.to_string());
    }

    /// Write one screenplay file verbatim.
    pub fn write_raw(&self, name: &str, body: &str) {
        let dir = self.screenplays();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(name), body).unwrap();
    }

    /// Load the metadata index.
    pub async fn index(&self) -> MetadataIndex {
        MetadataIndex::load(&self.metadata_path()).await.unwrap()
    }
}

/// A gateway over an in-memory engine.
pub fn memory_gateway() -> (Arc<MemoryTransport>, SearchGateway) {
    let transport = Arc::new(MemoryTransport::new());
    let gateway = SearchGateway::new(transport.clone(), ClientConfig::default());
    (transport, gateway)
}
