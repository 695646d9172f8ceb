//! Document construction.
//!
//! Joins one screenplay with its metadata record and derives the searchable
//! text fields. Everything here is a pure function of its inputs: no I/O,
//! no clocks, no randomness. Building the same inputs twice yields equal
//! documents, which is what makes re-indexing idempotent.
//!
//! # Derived fields
//!
//! `screenplay_text` is the dialogue lines (`"{speaker}: {text}"`) followed
//! by the scene headings (`"[Scene: {location}]"`), in source order, joined
//! with single spaces. Texts and locations of three characters or fewer
//! after trimming are noise and are left out; kept values are written as
//! they appear in the file.
//!
//! `combined_text` is title, directors, writers, genres, plot, each cast
//! member, then `screenplay_text`, joined with single spaces. An absent
//! field contributes an empty fragment so positions never shift.

use scriptsearch_core::{
    BuildOutcome, Document, MetadataRecord, ScreenplayRecord, SkipReason, TextOrList,
    coerce_rating,
};

use crate::corpus::MetadataIndex;

/// Texts at or below this many characters are dropped.
pub const MIN_TEXT_CHARS: usize = 3;

/// Speaker used when a dialogue line has none.
pub const UNKNOWN_SPEAKER: &str = "Unknown";

/// Title used when the metadata has none.
pub const UNKNOWN_TITLE: &str = "Unknown Title";

/// Join a screenplay with its metadata.
///
/// Skips, in priority order: no identifier on the screenplay, then no
/// metadata for that identifier. The join is inner; a document is never
/// built with placeholder metadata.
pub fn build(screenplay: &ScreenplayRecord, index: &MetadataIndex) -> BuildOutcome {
    let Some(movie_id) = screenplay.movie_id.as_deref() else {
        return BuildOutcome::Skipped(SkipReason::MissingMovieId);
    };
    let Some(metadata) = index.lookup(movie_id) else {
        return BuildOutcome::Skipped(SkipReason::NoMetadataMatch {
            movie_id: movie_id.to_string(),
        });
    };

    let screenplay_text = extract_screenplay_text(screenplay);
    let combined_text = combined_text(metadata, &screenplay_text);

    BuildOutcome::Built(Box::new(Document {
        movie_id: movie_id.to_string(),
        title: metadata
            .title
            .clone()
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string()),
        imdb_id: metadata.imdb_id.clone().unwrap_or_default(),
        imdb_rating: coerce_rating(metadata.imdb_rating.as_ref()),
        year: metadata.year.clone().unwrap_or_default(),
        cast: metadata.cast.clone(),
        directors: metadata.directors.clone().unwrap_or_default(),
        writers: metadata.writers.clone().unwrap_or_default(),
        genres: metadata.genres.clone().unwrap_or_default(),
        plot: metadata.plot.clone().unwrap_or_default(),
        screenplay_text,
        combined_text,
    }))
}

/// The text as written, if its trimmed form is long enough to keep.
fn signal(text: Option<&str>) -> Option<&str> {
    text.filter(|t| t.trim().chars().count() > MIN_TEXT_CHARS)
}

/// Derive `screenplay_text` from dialogues and scenes.
pub fn extract_screenplay_text(screenplay: &ScreenplayRecord) -> String {
    let dialogues = screenplay.dialogues.iter().filter_map(|dialogue| {
        let text = signal(dialogue.text.as_deref())?;
        let speaker = dialogue.speaker.as_deref().unwrap_or(UNKNOWN_SPEAKER);
        Some(format!("{speaker}: {text}"))
    });

    let scenes = screenplay
        .scenes
        .iter()
        .filter_map(|scene| signal(scene.location.as_deref()))
        .map(|location| format!("[Scene: {location}]"));

    dialogues.chain(scenes).collect::<Vec<_>>().join(" ")
}

/// Derive `combined_text` from metadata and the screenplay text.
pub fn combined_text(metadata: &MetadataRecord, screenplay_text: &str) -> String {
    let text = |field: &Option<String>| field.clone().unwrap_or_default();
    let list = |field: &Option<TextOrList>| field.as_ref().map(TextOrList::to_text).unwrap_or_default();

    let mut fragments = vec![
        text(&metadata.title),
        list(&metadata.directors),
        list(&metadata.writers),
        list(&metadata.genres),
        text(&metadata.plot),
    ];
    fragments.extend(metadata.cast.iter().cloned());
    fragments.push(screenplay_text.to_string());

    fragments.join(" ")
}

// ============================================================================
// Tests
// ============================================================================
