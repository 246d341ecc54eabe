//! Persistence for the CV record, saved templates and generated documents.

use std::collections::BTreeMap;
use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::models::cv::CvRecord;
use crate::models::template::Template;

pub mod json_file;

pub use json_file::JsonFileStore;

pub type Templates = BTreeMap<String, Template>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Background write failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// A file previously written to the output directory.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutputFile {
    pub name: String,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Whole-document storage. Every call reads or replaces a complete document;
/// there is no locking, so interleaved load/modify/save sequences are
/// last-writer-wins.
#[async_trait]
pub trait CvStore: Send + Sync {
    /// Returns the stored record, or all-empty defaults when nothing is stored yet.
    async fn load_cv(&self) -> Result<CvRecord, StoreError>;

    async fn save_cv(&self, cv: &CvRecord) -> Result<(), StoreError>;

    /// Returns saved templates keyed by name; empty when nothing is stored yet.
    async fn load_templates(&self) -> Result<Templates, StoreError>;

    async fn save_templates(&self, templates: &Templates) -> Result<(), StoreError>;

    /// Writes a rendered document into the output area and returns its file name.
    async fn write_output(&self, file_name: &str, content: &str) -> Result<String, StoreError>;

    /// Reads a generated document. `None` if it does not exist or the path
    /// points outside the output area.
    async fn read_output(&self, rel_path: &str) -> Result<Option<Vec<u8>>, StoreError>;

    async fn list_outputs(&self) -> Result<Vec<OutputFile>, StoreError>;
}
