//! Batch ingestion.
//!
//! [`Ingestor`] walks a screenplay directory, joins every file with the
//! metadata index, and hands the accumulated documents to the gateway as
//! one chunked bulk write.
//!
//! Per-file problems never stop a run. A file that cannot be read, has no
//! identifier, or has no metadata is recorded as a [`SkipDiagnostic`] and
//! the walk continues. Only preconditions (a missing directory) and
//! connection failures end a run early.
//!
//! Files are read and built concurrently, `concurrency` at a time; results
//! are collected in discovery order so reports are deterministic.
//!
//! # Usage
//!
//! ```rust,ignore
//! use scriptsearch_fts::{IngestConfig, Ingestor, MetadataIndex};
//!
//! let index = MetadataIndex::load(&metadata_path).await?;
//! let ingestor = Ingestor::new(IngestConfig::default());
//! let report = ingestor.run(&screenplays, &index, &gateway, &IndexSchema::default()).await?;
//! println!("Indexed {} documents", report.indexed());
//! ```

use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use futures::future;
use scriptsearch_client::{BulkReport, IndexSchema, SearchGateway};
use scriptsearch_core::{BuildOutcome, Document, Result, SkipReason, source_label};
use tokio_util::sync::CancellationToken;

use crate::corpus::MetadataIndex;
use crate::document::build;
use crate::screenplay::{ensure_directory, extension_set, find_files_with_extensions, read_screenplay};
use crate::types::IngestConfig;

/// Metadata identifiers logged at the start of a run.
const SAMPLE_IDS: usize = 3;

/// One skipped screenplay file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipDiagnostic {
    /// Movie identifier if the file had one, else the file name.
    pub source_ref: String,
    /// Why no document was built.
    pub reason: SkipReason,
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    /// Screenplay files discovered.
    pub files_found: usize,
    /// Movies in the metadata index.
    pub metadata_records: usize,
    /// Files that produced a document.
    pub processed: usize,
    /// Files skipped.
    pub skipped: usize,
    /// One entry per skipped file, in discovery order.
    pub diagnostics: Vec<SkipDiagnostic>,
    /// Built documents, in discovery order.
    pub documents: Vec<Document>,
    /// Result of the bulk write, when one was made.
    pub bulk: Option<BulkReport>,
    /// Whether the run stopped early on cancellation.
    pub cancelled: bool,
}

impl IngestionReport {
    /// Files examined before the run finished or was cancelled.
    pub fn examined(&self) -> usize {
        self.processed + self.skipped
    }

    /// Documents the engine accepted.
    pub fn indexed(&self) -> usize {
        self.bulk.as_ref().map_or(0, |b| b.indexed.len())
    }

    /// Documents the engine rejected.
    pub fn failed(&self) -> usize {
        self.bulk.as_ref().map_or(0, |b| b.failed.len())
    }

    fn record(&mut self, source_ref: String, outcome: BuildOutcome) {
        match outcome {
            BuildOutcome::Built(document) => {
                self.processed += 1;
                self.documents.push(*document);
            }
            BuildOutcome::Skipped(reason) => {
                log::debug!("Skipped {source_ref}: {reason}");
                self.skipped += 1;
                self.diagnostics.push(SkipDiagnostic { source_ref, reason });
            }
        }
    }
}

/// Observer called once per examined file, in discovery order.
pub type ProgressFn = dyn Fn(&str, &BuildOutcome) + Send + Sync;

/// Batch ingestion coordinator.
pub struct Ingestor {
    config: IngestConfig,
    cancel: CancellationToken,
    progress: Option<Arc<ProgressFn>>,
}

impl Ingestor {
    /// Create an ingestor with its own cancellation token.
    pub fn new(config: IngestConfig) -> Self {
        Self::with_cancellation(config, CancellationToken::new())
    }

    /// Create an ingestor that stops when `cancel` is cancelled.
    pub fn with_cancellation(config: IngestConfig, cancel: CancellationToken) -> Self {
        Self {
            config,
            cancel,
            progress: None,
        }
    }

    /// Report each file's source reference and outcome as it completes.
    pub fn with_progress(
        mut self,
        progress: impl Fn(&str, &BuildOutcome) + Send + Sync + 'static,
    ) -> Self {
        self.progress = Some(Arc::new(progress));
        self
    }

    /// Token that stops this ingestor between files.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Build documents for every screenplay under `dir`, without writing.
    ///
    /// Cancellation is checked before each file is started. Files already in
    /// flight finish and are kept, so a cancelled report holds valid
    /// documents for a partial write.
    ///
    /// # Errors
    ///
    /// `NotFound` if `dir` is not a directory. Nothing per file is an error.
    pub async fn collect(&self, dir: &Path, index: &MetadataIndex) -> Result<IngestionReport> {
        ensure_directory(dir).await?;
        let extensions = extension_set(&self.config.extensions);
        let files = find_files_with_extensions(dir, &extensions).await?;

        log::info!("Found {} screenplay file(s) in {}", files.len(), dir.display());
        log::info!("Loaded metadata for {} movie(s)", index.len());
        if !index.is_empty() {
            log::debug!("Sample movie IDs in metadata: {:?}", index.sample_ids(SAMPLE_IDS));
        }

        let mut report = IngestionReport {
            files_found: files.len(),
            metadata_records: index.len(),
            ..Default::default()
        };

        let cancel = &self.cancel;
        let progress = self.progress.as_deref();
        let outcomes: Vec<(String, BuildOutcome)> = futures::stream::iter(files.iter())
            .take_while(|_| future::ready(!cancel.is_cancelled()))
            .map(|path| process_file(path, index))
            .buffered(self.config.concurrency.max(1))
            .inspect(|(source_ref, outcome)| {
                if let Some(progress) = progress {
                    progress(source_ref.as_str(), outcome);
                }
            })
            .collect()
            .await;

        for (source_ref, outcome) in outcomes {
            report.record(source_ref, outcome);
        }
        report.cancelled = report.examined() < report.files_found;

        if report.cancelled {
            log::warn!(
                "Ingestion cancelled after {} of {} file(s)",
                report.examined(),
                report.files_found
            );
        }
        log::info!(
            "Built {} document(s), skipped {} file(s)",
            report.processed,
            report.skipped
        );

        Ok(report)
    }

    /// Ingest every screenplay under `dir` into the gateway's index.
    ///
    /// Ensures the index exists, builds all documents, then writes them in
    /// chunked bulk requests. A cancelled run still writes what it built.
    ///
    /// # Errors
    ///
    /// `NotFound` if `dir` is not a directory (checked before any network
    /// call), `Connection` if the engine cannot be reached, and `Index` if
    /// the index cannot be created. Rejected documents are reported in
    /// [`IngestionReport::bulk`], not raised.
    pub async fn run(
        &self,
        dir: &Path,
        index: &MetadataIndex,
        gateway: &SearchGateway,
        schema: &IndexSchema,
    ) -> Result<IngestionReport> {
        ensure_directory(dir).await?;
        gateway.ensure_index(schema).await?;

        let mut report = self.collect(dir, index).await?;
        if report.cancelled && !report.documents.is_empty() {
            log::warn!("Writing {} document(s) from a partial run", report.documents.len());
        }

        report.bulk = Some(gateway.upsert_batch(&report.documents).await?);
        Ok(report)
    }
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor")
            .field("config", &self.config)
            .field("cancelled", &self.cancel.is_cancelled())
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

async fn process_file(path: &Path, index: &MetadataIndex) -> (String, BuildOutcome) {
    let file_name = source_label(path);
    match read_screenplay(path).await {
        Ok(record) => {
            let source_ref = record.movie_id.clone().unwrap_or(file_name);
            (source_ref, build(&record, index))
        }
        Err(e) => (
            file_name,
            BuildOutcome::Skipped(SkipReason::Unreadable {
                message: e.to_string(),
            }),
        ),
    }
}

// ============================================================================
// Tests
// ============================================================================
