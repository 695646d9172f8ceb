//! Command handlers.
//!
//! Each handler does its work through the library crates, prints a report
//! to stdout, and returns the data it printed. Logging goes to stderr.
//! Errors are returned only for precondition and connection failures;
//! skipped screenplays and rejected documents are reported, not raised.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use scriptsearch_client::{IndexSchema, MemoryTransport, SearchGateway};
use scriptsearch_core::QueryResult;
use scriptsearch_fts::{
    CorpusSummary, IngestionReport, Ingestor, MatchReport, MetadataIndex, ScreenplaySummary,
    check_matching, extension_set, render, to_results,
};

use crate::cli::{Cli, Command, CorpusArgs};
use crate::config::AppConfig;
use crate::config_handlers::handle_config_command;

/// Skip diagnostics printed before summarizing the rest.
const LISTED_SKIPS: usize = 10;

/// Run the parsed command line.
pub async fn run(cli: Cli) -> Result<()> {
    if let Command::Config { action } = cli.command {
        return Ok(handle_config_command(
            cli.config.as_deref(),
            &cli.connection,
            action,
        )?);
    }

    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.connection.apply(&mut config.connection);
    log::debug!("Effective connection: {:?}", config.connection.masked());

    match cli.command {
        Command::Ingest {
            corpus,
            dry_run,
            concurrency,
        } => {
            if let Some(n) = concurrency {
                config.ingest.concurrency = n;
            }
            ingest(&config, &corpus, dry_run).await.map(drop)
        }
        Command::Search { query, limit, json } => {
            if let Some(n) = limit {
                config.connection.result_limit = n;
            }
            search(&config, &query.join(" "), json).await.map(drop)
        }
        Command::Inspect { corpus } => inspect(&config, &corpus).await,
        Command::CheckMatching { corpus, sample } => {
            check(&config, &corpus, sample).await.map(drop)
        }
        Command::Ping => ping(&config).await,
        Command::Config { .. } => Ok(()),
    }
}

fn gateway(config: &AppConfig, dry_run: bool) -> Result<SearchGateway> {
    if dry_run {
        log::info!("Dry run: documents are indexed in memory only");
        Ok(SearchGateway::new(
            Arc::new(MemoryTransport::new()),
            config.connection.clone(),
        ))
    } else {
        Ok(SearchGateway::opensearch(config.connection.clone())?)
    }
}

async fn load_index(path: &Path) -> Result<MetadataIndex> {
    MetadataIndex::load(path)
        .await
        .with_context(|| format!("Cannot ingest without metadata from {}", path.display()))
}

// ============================================================================
// ingest
// ============================================================================

/// Build and index every screenplay.
///
/// Ctrl-C stops the run between files; what was built is still written.
pub async fn ingest(config: &AppConfig, corpus: &CorpusArgs, dry_run: bool) -> Result<IngestionReport> {
    let index = load_index(&corpus.metadata).await?;
    let gateway = gateway(config, dry_run)?;

    let ingestor = Ingestor::new(config.ingest.clone()).with_progress(|source_ref, outcome| {
        if outcome.is_built() {
            log::debug!("Built document for {source_ref}");
        }
    });
    let token = ingestor.cancellation_token();
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted; finishing files in flight");
            token.cancel();
        }
    });

    let result = ingestor
        .run(&corpus.screenplays_dir, &index, &gateway, &IndexSchema::default())
        .await;
    interrupt.abort();

    let report = result?;
    print!("{}", format_ingestion_report(&report, dry_run));
    Ok(report)
}

/// Summarize an ingestion run.
pub fn format_ingestion_report(report: &IngestionReport, dry_run: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Found {} screenplay files", report.files_found);
    let _ = writeln!(out, "Loaded metadata for {} movies", report.metadata_records);
    let _ = writeln!(
        out,
        "Successfully processed {} files, {} skipped",
        report.processed, report.skipped
    );

    for diagnostic in report.diagnostics.iter().take(LISTED_SKIPS) {
        let _ = writeln!(out, "  - {}: {}", diagnostic.source_ref, diagnostic.reason);
    }
    if report.diagnostics.len() > LISTED_SKIPS {
        let _ = writeln!(out, "  ... and {} more", report.diagnostics.len() - LISTED_SKIPS);
    }

    if report.cancelled {
        let _ = writeln!(
            out,
            "Cancelled after {} of {} files",
            report.examined(),
            report.files_found
        );
    }

    match &report.bulk {
        Some(bulk) if bulk.total() == 0 => {
            let _ = writeln!(out, "No documents to index");
        }
        Some(bulk) => {
            let _ = writeln!(
                out,
                "Indexed {} documents, {} failed{}",
                bulk.indexed.len(),
                bulk.failed.len(),
                if dry_run { " (dry run)" } else { "" }
            );
            for failure in &bulk.failed {
                let _ = writeln!(
                    out,
                    "  ✗ {} (status {}): {}",
                    failure.movie_id, failure.status, failure.reason
                );
            }
        }
        None => {}
    }

    out
}

// ============================================================================
// search
// ============================================================================

/// Run a query and print the rendered results.
pub async fn search(config: &AppConfig, query: &str, json: bool) -> Result<Vec<QueryResult>> {
    let gateway = gateway(config, false)?;
    let results = to_results(&gateway.search(query).await?);
    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("{}", render(&results, query));
    }
    Ok(results)
}

// ============================================================================
// inspect
// ============================================================================

/// Print the shape of both corpora.
///
/// Problems with either corpus are printed in its section rather than
/// failing the command.
pub async fn inspect(config: &AppConfig, corpus: &CorpusArgs) -> Result<()> {
    let metadata = CorpusSummary::load(&corpus.metadata).await;
    let extensions = extension_set(&config.ingest.extensions);
    let screenplays = ScreenplaySummary::inspect(&corpus.screenplays_dir, &extensions).await;

    let mut out = String::from("=== METADATA INSPECTION ===\n");
    match metadata {
        Ok(summary) => out.push_str(&format_corpus_summary(&summary)),
        Err(e) => {
            let _ = writeln!(out, "Error inspecting metadata: {e}");
        }
    }

    out.push_str("\n=== SCREENPLAY INSPECTION ===\n");
    match screenplays {
        Ok(summary) => out.push_str(&format_screenplay_summary(&summary)),
        Err(e) => {
            let _ = writeln!(out, "Error inspecting screenplays: {e}");
        }
    }

    print!("{out}");
    Ok(())
}

/// Describe a metadata corpus.
pub fn format_corpus_summary(summary: &CorpusSummary) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Number of movies: {}", summary.movie_count);
    if summary.movie_count > 0 {
        let _ = writeln!(out, "First movie keys: {:?}", summary.first_record_keys);
        let _ = writeln!(
            out,
            "First movie_id: {}",
            summary.first_movie_id.as_deref().unwrap_or("Not found")
        );
        let _ = writeln!(
            out,
            "First title: {}",
            summary.first_title.as_deref().unwrap_or("Not found")
        );
        let _ = writeln!(
            out,
            "Movies with movie_id: {}/{}",
            summary.with_movie_id, summary.movie_count
        );
    }
    out
}

/// Describe a screenplay directory.
pub fn format_screenplay_summary(summary: &ScreenplaySummary) -> String {
    if summary.file_count == 0 {
        return "No screenplay files found!\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Found {} screenplay files", summary.file_count);
    if let Some(error) = &summary.sample_error {
        let _ = writeln!(out, "Error inspecting screenplay: {error}");
    }
    if let Some(sample) = &summary.sample {
        let _ = writeln!(out, "Sample file: {}", sample.file_name);
        let _ = writeln!(out, "Screenplay keys: {:?}", sample.keys);
        if let Some(id) = &sample.movie_id {
            let _ = writeln!(out, "Screenplay movie_id: {id}");
        }
        if let Some(n) = sample.dialogue_count {
            let _ = writeln!(out, "Number of dialogues: {n}");
            if !sample.first_dialogue_keys.is_empty() {
                let _ = writeln!(out, "First dialogue keys: {:?}", sample.first_dialogue_keys);
            }
        }
        if let Some(n) = sample.scene_count {
            let _ = writeln!(out, "Number of scenes: {n}");
        }
    }
    out
}

// ============================================================================
// check-matching
// ============================================================================

/// Match a sample of screenplay identifiers against the metadata.
pub async fn check(config: &AppConfig, corpus: &CorpusArgs, sample: usize) -> Result<MatchReport> {
    let index = load_index(&corpus.metadata).await?;
    let extensions = extension_set(&config.ingest.extensions);
    let report = check_matching(&corpus.screenplays_dir, &extensions, &index, sample).await?;
    print!("{}", format_match_report(&report));
    Ok(report)
}

/// Describe a match report.
pub fn format_match_report(report: &MatchReport) -> String {
    let mut out = String::from("=== MOVIE ID MATCHING CHECK ===\n");
    let _ = writeln!(out, "Unique movie_ids in metadata: {}", report.metadata_ids);
    for (file, error) in &report.unreadable {
        let _ = writeln!(out, "Error reading {file}: {error}");
    }
    let _ = writeln!(
        out,
        "Unique movie_ids in screenplays (sample): {}",
        report.sample_ids.len()
    );
    let _ = writeln!(
        out,
        "Screenplay movie_ids missing metadata: {:?}",
        report.missing
    );
    for example in &report.examples {
        let _ = writeln!(out, "{example}");
    }
    out
}

// ============================================================================
// ping
// ============================================================================

/// Connect with retry and report.
pub async fn ping(config: &AppConfig) -> Result<()> {
    let gateway = gateway(config, false)?;
    gateway
        .connect()
        .await
        .with_context(|| format!("Could not connect to {}", config.connection.base_url()))?;
    println!(
        "✓ Successfully connected to OpenSearch at {}",
        config.connection.base_url()
    );
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use scriptsearch_client::BulkReport;
    use scriptsearch_core::SkipReason;
    use scriptsearch_fts::{MatchExample, SkipDiagnostic};
    use serde_json::json;
    use tempfile::TempDir;

    fn corpus_on_disk() -> (TempDir, CorpusArgs) {
        let dir = TempDir::new().unwrap();
        let screenplays = dir.path().join("screenplays");
        std::fs::create_dir(&screenplays).unwrap();
        std::fs::write(
            dir.path().join("meta.json"),
            json!({"movies": [{"movie_id": "m1", "title": "Alien"}]}).to_string(),
        )
        .unwrap();
        std::fs::write(
            screenplays.join("alien.json"),
            json!({"movie_id": "m1", "dialogues": [{"speaker": "RIPLEY", "text": "Mother!"}]})
                .to_string(),
        )
        .unwrap();
        std::fs::write(screenplays.join("lost.json"), json!({"movie_id": "x"}).to_string())
            .unwrap();
        let args = CorpusArgs {
            screenplays_dir: screenplays,
            metadata: dir.path().join("meta.json"),
        };
        (dir, args)
    }

    // ------------------------------------------------------------------------
    // ingest
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_ingest_dry_run() {
        let (_dir, corpus) = corpus_on_disk();
        let report = ingest(&AppConfig::default(), &corpus, true).await.unwrap();

        assert_eq!(report.processed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.indexed(), 1);
    }

    #[tokio::test]
    async fn test_ingest_missing_metadata_is_fatal() {
        let (dir, mut corpus) = corpus_on_disk();
        corpus.metadata = dir.path().join("absent.json");

        let err = ingest(&AppConfig::default(), &corpus, true).await.unwrap_err();
        assert!(err.to_string().contains("Cannot ingest without metadata"));
    }

    #[test]
    fn test_format_ingestion_report() {
        let report = IngestionReport {
            files_found: 3,
            metadata_records: 2,
            processed: 2,
            skipped: 1,
            diagnostics: vec![SkipDiagnostic {
                source_ref: "x".to_string(),
                reason: SkipReason::NoMetadataMatch {
                    movie_id: "x".to_string(),
                },
            }],
            bulk: Some(BulkReport {
                indexed: vec!["m1".to_string()],
                failed: BulkReport::all_failed(&["m2".to_string()], "too large").failed,
            }),
            ..Default::default()
        };

        let out = format_ingestion_report(&report, false);
        assert!(out.contains("Found 3 screenplay files"));
        assert!(out.contains("Successfully processed 2 files, 1 skipped"));
        assert!(out.contains("  - x: movie_id x not found in metadata"));
        assert!(out.contains("Indexed 1 documents, 1 failed\n"));
        assert!(out.contains("  ✗ m2 (status 0): too large"));
    }

    #[test]
    fn test_format_ingestion_report_nothing_to_index() {
        let report = IngestionReport {
            bulk: Some(BulkReport::default()),
            ..Default::default()
        };
        assert!(format_ingestion_report(&report, true).contains("No documents to index"));
    }

    #[test]
    fn test_format_ingestion_report_truncates_skips() {
        let diagnostics = (0..LISTED_SKIPS + 2)
            .map(|i| SkipDiagnostic {
                source_ref: format!("f{i}.json"),
                reason: SkipReason::MissingMovieId,
            })
            .collect();
        let report = IngestionReport {
            diagnostics,
            ..Default::default()
        };
        let out = format_ingestion_report(&report, false);
        assert!(out.contains("  ... and 2 more"));
        assert!(!out.contains("f11.json"));
    }

    // ------------------------------------------------------------------------
    // inspect / check-matching
    // ------------------------------------------------------------------------

    #[test]
    fn test_format_corpus_summary() {
        let summary = CorpusSummary::from_value(
            &json!({"movies": [{"movie_id": "m1"}, {"title": "x"}]}),
            "meta.json",
        )
        .unwrap();
        let out = format_corpus_summary(&summary);
        assert!(out.contains("Number of movies: 2"));
        assert!(out.contains("First movie_id: m1"));
        assert!(out.contains("First title: Not found"));
        assert!(out.contains("Movies with movie_id: 1/2"));
    }

    #[test]
    fn test_format_screenplay_summary_empty() {
        let summary = ScreenplaySummary {
            file_count: 0,
            sample: None,
            sample_error: None,
        };
        assert_eq!(format_screenplay_summary(&summary), "No screenplay files found!\n");
    }

    #[tokio::test]
    async fn test_check_matching_command() {
        let (_dir, corpus) = corpus_on_disk();
        let report = check(&AppConfig::default(), &corpus, 10).await.unwrap();
        assert_eq!(report.missing, vec!["x"]);
    }

    #[test]
    fn test_format_match_report() {
        let report = MatchReport {
            metadata_ids: 5,
            sample_ids: vec!["m1".to_string(), "x".to_string()],
            missing: vec!["x".to_string()],
            examples: vec![
                MatchExample {
                    movie_id: "m1".to_string(),
                    matched: true,
                    title: Some("Alien".to_string()),
                },
                MatchExample {
                    movie_id: "x".to_string(),
                    matched: false,
                    title: None,
                },
            ],
            unreadable: vec![("bad.json".to_string(), "invalid JSON".to_string())],
        };
        let out = format_match_report(&report);
        assert!(out.contains("Unique movie_ids in metadata: 5"));
        assert!(out.contains("Error reading bad.json: invalid JSON"));
        assert!(out.contains("Unique movie_ids in screenplays (sample): 2"));
        assert!(out.contains("Screenplay movie_ids missing metadata: [\"x\"]"));
        assert!(out.contains("✓ Match found: m1 -> Alien\n✗ No match: x\n"));
    }
}
