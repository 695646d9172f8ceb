//! Source records: movie metadata and screenplays.
//!
//! Both record types are built from raw JSON with [`MetadataRecord::from_value`]
//! and [`ScreenplayRecord::from_value`]. Construction never fails on a field's
//! shape; the only rejection is a record that is not a JSON object (or, for
//! metadata, one without a usable `movie_id`).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::util::ids::movie_id_of;
use crate::util::lenient::{
    object_list_field, string_list_field, text_field, text_or_list_field,
};

/// A metadata field that the corpus stores either as free text or as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    /// Free text, e.g. `"Ridley Scott"`.
    Text(String),
    /// A list, e.g. `["Horror", "Sci-Fi"]`.
    List(Vec<String>),
}

impl TextOrList {
    /// Render as a single line of text; list entries are joined with `", "`.
    pub fn to_text(&self) -> String {
        match self {
            TextOrList::Text(text) => text.clone(),
            TextOrList::List(items) => items.join(", "),
        }
    }

    /// Returns `true` if there is no text at all.
    pub fn is_empty(&self) -> bool {
        match self {
            TextOrList::Text(text) => text.is_empty(),
            TextOrList::List(items) => items.iter().all(String::is_empty),
        }
    }
}

impl Default for TextOrList {
    fn default() -> Self {
        TextOrList::Text(String::new())
    }
}

impl From<&str> for TextOrList {
    fn from(text: &str) -> Self {
        TextOrList::Text(text.to_string())
    }
}

/// One movie from the metadata corpus.
///
/// Immutable once loaded. `imdb_rating` keeps its raw JSON form; coercion
/// to a float happens when the searchable document is derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetadataRecord {
    /// Movie identifier (unique key, never empty).
    pub movie_id: String,
    /// Movie title.
    pub title: Option<String>,
    /// External rating identifier (IMDb id).
    pub imdb_id: Option<String>,
    /// Raw rating value as found in the corpus.
    pub imdb_rating: Option<Value>,
    /// Release year, compared as a token.
    pub year: Option<String>,
    /// Ordered cast list.
    pub cast: Vec<String>,
    /// Director(s).
    pub directors: Option<TextOrList>,
    /// Writer(s).
    pub writers: Option<TextOrList>,
    /// Genre(s).
    pub genres: Option<TextOrList>,
    /// Plot summary.
    pub plot: Option<String>,
}

impl MetadataRecord {
    /// Build a record from one entry of the corpus `movies` array.
    ///
    /// Returns `None` if the entry is not an object or has no usable
    /// `movie_id`.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }
        let movie_id = movie_id_of(value)?;

        Some(Self {
            movie_id,
            title: text_field(value, "title"),
            imdb_id: text_field(value, "imdb_id"),
            imdb_rating: value.get("imdb_rating").filter(|v| !v.is_null()).cloned(),
            year: text_field(value, "year"),
            cast: string_list_field(value, "cast"),
            directors: text_or_list_field(value, "directors"),
            writers: text_or_list_field(value, "writers"),
            genres: text_or_list_field(value, "genres"),
            plot: text_field(value, "plot"),
        })
    }
}

/// A single line of dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dialogue {
    /// Speaking character, if recorded.
    pub speaker: Option<String>,
    /// Spoken text.
    pub text: Option<String>,
}

/// A scene heading.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    /// Scene location, e.g. `"INT. NOSTROMO - BRIDGE"`.
    pub location: Option<String>,
    /// Any other scene attributes, kept verbatim.
    pub extra: serde_json::Map<String, Value>,
}

/// One screenplay source file.
///
/// Transient: read, turned into a document, discarded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenplayRecord {
    /// Movie identifier, if the file carries one.
    pub movie_id: Option<String>,
    /// Dialogue lines in source order.
    pub dialogues: Vec<Dialogue>,
    /// Scenes in source order.
    pub scenes: Vec<Scene>,
}

impl ScreenplayRecord {
    /// Build a record from a parsed screenplay file.
    ///
    /// Returns `None` if the file's top level is not an object. Dialogue and
    /// scene entries that are not objects are ignored.
    pub fn from_value(value: &Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        let dialogues = object_list_field(value, "dialogues")
            .into_iter()
            .map(|d| Dialogue {
                speaker: text_field(d, "speaker"),
                text: text_field(d, "text"),
            })
            .collect();

        let scenes = object_list_field(value, "scenes")
            .into_iter()
            .map(|s| Scene {
                location: text_field(s, "location"),
                extra: s
                    .as_object()
                    .map(|fields| {
                        fields
                            .iter()
                            .filter(|(key, _)| key.as_str() != "location")
                            .map(|(key, v)| (key.clone(), v.clone()))
                            .collect()
                    })
                    .unwrap_or_default(),
            })
            .collect();

        Some(Self {
            movie_id: movie_id_of(value),
            dialogues,
            scenes,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    // -------------------------------------------------------------------------
    // TextOrList tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_text_or_list_to_text() {
        assert_eq!(TextOrList::from("Nolan").to_text(), "Nolan");
        let list = TextOrList::List(vec!["Lana".to_string(), "Lilly".to_string()]);
        assert_eq!(list.to_text(), "Lana, Lilly");
    }

    #[test]
    fn test_text_or_list_is_empty() {
        assert!(TextOrList::default().is_empty());
        assert!(TextOrList::List(vec![]).is_empty());
        assert!(!TextOrList::from("x").is_empty());
    }

    #[test]
    fn test_text_or_list_serializes_untagged() {
        let text = serde_json::to_value(TextOrList::from("Drama")).unwrap();
        assert_eq!(text, json!("Drama"));
        let list = serde_json::to_value(TextOrList::List(vec!["A".to_string()])).unwrap();
        assert_eq!(list, json!(["A"]));
    }

    // -------------------------------------------------------------------------
    // MetadataRecord tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_metadata_record_full() {
        let value = json!({
            "movie_id": "m1",
            "title": "Alien",
            "imdb_id": "tt0078748",
            "imdb_rating": "8.5",
            "year": 1979,
            "cast": ["Sigourney Weaver", "Tom Skerritt"],
            "directors": "Ridley Scott",
            "writers": ["Dan O'Bannon"],
            "genres": ["Horror", "Sci-Fi"],
            "plot": "In space no one can hear you scream."
        });

        let record = MetadataRecord::from_value(&value).unwrap();
        assert_eq!(record.movie_id, "m1");
        assert_eq!(record.title.as_deref(), Some("Alien"));
        assert_eq!(record.year.as_deref(), Some("1979"));
        assert_eq!(record.imdb_rating, Some(json!("8.5")));
        assert_eq!(record.cast.len(), 2);
        assert_eq!(record.directors, Some(TextOrList::from("Ridley Scott")));
        assert_eq!(
            record.genres,
            Some(TextOrList::List(vec![
                "Horror".to_string(),
                "Sci-Fi".to_string()
            ]))
        );
    }

    #[test]
    fn test_metadata_record_minimal() {
        let record = MetadataRecord::from_value(&json!({"movie_id": 12})).unwrap();
        assert_eq!(record.movie_id, "12");
        assert!(record.title.is_none());
        assert!(record.imdb_rating.is_none());
        assert!(record.cast.is_empty());
    }

    #[test]
    fn test_metadata_record_null_rating_is_absent() {
        let record =
            MetadataRecord::from_value(&json!({"movie_id": "m", "imdb_rating": null})).unwrap();
        assert!(record.imdb_rating.is_none());
    }

    #[test]
    fn test_metadata_record_without_id() {
        assert!(MetadataRecord::from_value(&json!({"title": "Orphan"})).is_none());
        assert!(MetadataRecord::from_value(&json!({"movie_id": ""})).is_none());
    }

    #[test]
    fn test_metadata_record_not_object() {
        assert!(MetadataRecord::from_value(&json!("m1")).is_none());
        assert!(MetadataRecord::from_value(&json!(null)).is_none());
    }

    // -------------------------------------------------------------------------
    // ScreenplayRecord tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_screenplay_record_full() {
        let value = json!({
            "movie_id": "m1",
            "dialogues": [
                {"speaker": "RIPLEY", "text": "Get away from her, you bitch!"},
                {"text": "Hello?"},
                "not a dialogue"
            ],
            "scenes": [
                {"location": "INT. NOSTROMO", "time": "NIGHT"},
                {"time": "DAY"}
            ]
        });

        let record = ScreenplayRecord::from_value(&value).unwrap();
        assert_eq!(record.movie_id.as_deref(), Some("m1"));
        assert_eq!(record.dialogues.len(), 2);
        assert_eq!(record.dialogues[0].speaker.as_deref(), Some("RIPLEY"));
        assert!(record.dialogues[1].speaker.is_none());
        assert_eq!(record.scenes.len(), 2);
        assert_eq!(record.scenes[0].location.as_deref(), Some("INT. NOSTROMO"));
        assert_eq!(record.scenes[0].extra.get("time"), Some(&json!("NIGHT")));
        assert!(!record.scenes[0].extra.contains_key("location"));
        assert!(record.scenes[1].location.is_none());
    }

    #[test]
    fn test_screenplay_record_without_id() {
        let record = ScreenplayRecord::from_value(&json!({"dialogues": []})).unwrap();
        assert!(record.movie_id.is_none());
        assert!(record.dialogues.is_empty());
        assert!(record.scenes.is_empty());
    }

    #[test]
    fn test_screenplay_record_not_object() {
        assert!(ScreenplayRecord::from_value(&json!([1, 2, 3])).is_none());
    }
}
