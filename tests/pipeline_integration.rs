//! Integration tests for the ingestion pipeline.

use std::fs;
use std::path::Path;

use async_trait::async_trait;
use helix_indexer::backend::{Document, DocumentStore};
use helix_indexer::watcher::{ChangeEvent, IngestionPipeline, PipelineConfig};
use helix_indexer::Result;
use parking_lot::Mutex;
use tempfile::TempDir;

/// Store that records every submission.
#[derive(Default)]
struct RecordingStore {
    documents: Mutex<Vec<Document>>,
}

impl RecordingStore {
    fn filepaths(&self) -> Vec<String> {
        let mut paths: Vec<String> = self
            .documents
            .lock()
            .iter()
            .map(|d| d.filepath.clone())
            .collect();
        paths.dedup();
        paths
    }
}

#[async_trait]
impl DocumentStore for RecordingStore {
    async fn submit(&self, document: &Document) -> Result<()> {
        self.documents.lock().push(document.clone());
        Ok(())
    }

    async fn health_check(&self) -> Result<()> {
        Ok(())
    }
}

fn write(path: &Path, content: &str) {
    fs::write(path, content).unwrap();
}

/// Creating a.py, b.tmp and c.py with batch size 2 flushes exactly once with
/// the two Python files.
#[tokio::test]
async fn test_end_to_end_batch_excludes_tmp_files() {
    helix_indexer::observability::try_init_tracing("debug");

    let tmp = TempDir::new().unwrap();
    let ws = tmp.path().join("ws");
    fs::create_dir_all(&ws).unwrap();

    let config = PipelineConfig {
        exclude_patterns: vec!["*.tmp".to_string()],
        batch_size: 2,
        ..Default::default()
    };
    let mut pipeline = IngestionPipeline::new(&config, RecordingStore::default()).unwrap();

    let a = ws.join("a.py");
    let b = ws.join("b.tmp");
    let c = ws.join("c.py");
    write(&a, "def a():\n    return 1\n");
    write(&b, "scratch");
    write(&c, "class C:\n    pass\n");

    let mut reports = Vec::new();
    for event in [
        ChangeEvent::created(&a),
        ChangeEvent::created(&b),
        ChangeEvent::created(&c),
    ] {
        if let Some(report) = pipeline.handle_event(event).await {
            reports.push(report);
        }
    }

    assert_eq!(reports.len(), 1, "expected exactly one flush");
    assert_eq!(reports[0].attempted, 2);
    assert_eq!(reports[0].indexed, 2);

    let store = pipeline.store();
    let mut paths = store.filepaths();
    paths.sort();
    assert_eq!(
        paths,
        vec![a.to_string_lossy().to_string(), c.to_string_lossy().to_string()]
    );
    assert!(store.documents.lock().iter().all(|d| d.filetype == "py"));
    assert_eq!(pipeline.stats().events_filtered, 1);
}

/// Files moved into a watched tree are indexed like new ones, and every
/// chunk carries the file metadata.
#[tokio::test]
async fn test_moved_in_file_carries_metadata() {
    let tmp = TempDir::new().unwrap();
    let file = tmp.path().join("README");
    let body = format!("{}\n\n{}", "intro ".repeat(300), "details ".repeat(200));
    write(&file, &body);

    let config = PipelineConfig {
        batch_size: 1,
        ..Default::default()
    };
    let mut pipeline = IngestionPipeline::new(&config, RecordingStore::default()).unwrap();

    let report = pipeline
        .handle_event(ChangeEvent::moved_in(&file))
        .await
        .unwrap();
    assert_eq!(report.indexed, 1);

    let documents = pipeline.store().documents.lock().clone();
    assert_eq!(documents.len(), 2);
    for (i, doc) in documents.iter().enumerate() {
        assert_eq!(doc.filetype, "unknown");
        assert_eq!(doc.metadata.chunk_index, i);
        assert_eq!(doc.metadata.chunk_count, 2);
        assert_eq!(doc.metadata.document.filename, "README");
        assert_eq!(doc.metadata.document.size_bytes, body.len());
        assert_eq!(
            doc.metadata.document.directory,
            tmp.path().to_string_lossy()
        );
    }
}

/// A final flush on shutdown drains a batch that never reached its threshold.
#[tokio::test]
async fn test_shutdown_flushes_partial_batch() {
    let tmp = TempDir::new().unwrap();
    let config = PipelineConfig::default();
    let mut pipeline = IngestionPipeline::new(&config, RecordingStore::default()).unwrap();

    for name in ["one.toml", "two.json", "three.sh"] {
        let path = tmp.path().join(name);
        write(&path, "key = 1\n");
        assert!(pipeline.handle_event(ChangeEvent::modified(&path)).await.is_none());
    }
    assert_eq!(pipeline.pending_len(), 3);

    let report = pipeline.shutdown().await;

    assert_eq!(report.indexed, 3);
    assert_eq!(pipeline.pending_len(), 0);
    assert_eq!(pipeline.store().filepaths().len(), 3);
}
