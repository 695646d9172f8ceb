//! Identifier coercion utilities.
//!
//! Movie identifiers arrive as arbitrary JSON scalars (`"tt0111161"`, `42`,
//! `1.5`). Everything downstream keys on a non-empty string, so all coercion
//! goes through [`coerce_id`].

use std::path::Path;

use serde_json::Value;

/// Coerce a JSON scalar into a movie identifier.
///
/// Strings are trimmed, numbers and booleans use their JSON text. Null,
/// arrays, objects and blank strings yield `None`.
///
/// # Examples
///
/// ```
/// use scriptsearch_core::util::ids::coerce_id;
/// use serde_json::json;
///
/// assert_eq!(coerce_id(&json!(" tt01 ")), Some("tt01".to_string()));
/// assert_eq!(coerce_id(&json!(42)), Some("42".to_string()));
/// assert_eq!(coerce_id(&json!("   ")), None);
/// assert_eq!(coerce_id(&json!(null)), None);
/// ```
pub fn coerce_id(value: &Value) -> Option<String> {
    let id = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };

    if id.is_empty() { None } else { Some(id) }
}

/// Look up and coerce the `movie_id` field of a JSON object.
pub fn movie_id_of(value: &Value) -> Option<String> {
    value.get("movie_id").and_then(coerce_id)
}

/// Short label for a source file, used in per-record diagnostics.
///
/// Falls back to the full display path when there is no file name.
pub fn source_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // -------------------------------------------------------------------------
    // coerce_id tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_coerce_id_string() {
        assert_eq!(coerce_id(&json!("tt0111161")), Some("tt0111161".to_string()));
    }

    #[test]
    fn test_coerce_id_trims() {
        assert_eq!(coerce_id(&json!("  m-1\n")), Some("m-1".to_string()));
    }

    #[test]
    fn test_coerce_id_integer() {
        assert_eq!(coerce_id(&json!(1024)), Some("1024".to_string()));
    }

    #[test]
    fn test_coerce_id_float() {
        assert_eq!(coerce_id(&json!(1.5)), Some("1.5".to_string()));
    }

    #[test]
    fn test_coerce_id_bool() {
        assert_eq!(coerce_id(&json!(true)), Some("true".to_string()));
    }

    #[test]
    fn test_coerce_id_rejects_non_scalars() {
        assert_eq!(coerce_id(&json!(null)), None);
        assert_eq!(coerce_id(&json!(["a"])), None);
        assert_eq!(coerce_id(&json!({"id": "a"})), None);
    }

    #[test]
    fn test_coerce_id_rejects_blank() {
        assert_eq!(coerce_id(&json!("")), None);
        assert_eq!(coerce_id(&json!("   ")), None);
    }

    // -------------------------------------------------------------------------
    // movie_id_of tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_movie_id_of_present() {
        let record = json!({"movie_id": 7, "title": "Seven"});
        assert_eq!(movie_id_of(&record), Some("7".to_string()));
    }

    #[test]
    fn test_movie_id_of_missing() {
        let record = json!({"title": "Nameless"});
        assert_eq!(movie_id_of(&record), None);
    }

    #[test]
    fn test_movie_id_of_non_object() {
        assert_eq!(movie_id_of(&json!("movie_id")), None);
    }

    // -------------------------------------------------------------------------
    // source_label tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_source_label_file_name() {
        let path = Path::new("/data/screenplays/alien.json");
        assert_eq!(source_label(path), "alien.json");
    }

    #[test]
    fn test_source_label_no_file_name() {
        assert_eq!(source_label(Path::new("/")), "/");
    }
}
