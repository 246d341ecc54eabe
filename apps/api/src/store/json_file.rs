use std::io::{ErrorKind, Write};
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::models::cv::CvRecord;
use crate::store::{CvStore, OutputFile, StoreError, Templates};

const CV_FILE: &str = "cv.json";
const TEMPLATES_FILE: &str = "templates.json";
const OUTPUT_DIR: &str = "output";

/// Stores everything as indented UTF-8 JSON under a single data directory:
/// `cv.json`, `templates.json` and generated documents in `output/`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
    output_dir: PathBuf,
}

impl JsonFileStore {
    /// Opens the store, creating the data and output directories if missing.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let output_dir = data_dir.join(OUTPUT_DIR);
        std::fs::create_dir_all(&output_dir).map_err(|source| StoreError::Io {
            path: output_dir.clone(),
            source,
        })?;
        info!("Data directory: {}", data_dir.display());
        Ok(Self {
            data_dir,
            output_dir,
        })
    }

    async fn read_json<T>(&self, path: PathBuf) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("{} not found, using defaults", path.display());
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }

    async fn write_json<T>(&self, path: PathBuf, value: &T) -> Result<(), StoreError>
    where
        T: Serialize + ?Sized,
    {
        let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        tokio::task::spawn_blocking(move || write_atomic(&path, &bytes)).await?
    }
}

/// Writes to a temp file next to `path`, then renames it over `path`, so a
/// crash mid-write never leaves a truncated document behind.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
    tmp.write_all(bytes).map_err(io_err)?;
    tmp.as_file().sync_all().map_err(io_err)?;
    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Only plain relative paths below the output directory are served.
fn is_contained(rel_path: &Path) -> bool {
    let mut components = rel_path.components().peekable();
    components.peek().is_some() && components.all(|c| matches!(c, Component::Normal(_)))
}

#[async_trait]
impl CvStore for JsonFileStore {
    async fn load_cv(&self) -> Result<CvRecord, StoreError> {
        Ok(self
            .read_json(self.data_dir.join(CV_FILE))
            .await?
            .unwrap_or_default())
    }

    async fn save_cv(&self, cv: &CvRecord) -> Result<(), StoreError> {
        self.write_json(self.data_dir.join(CV_FILE), cv).await?;
        debug!("Saved {}", CV_FILE);
        Ok(())
    }

    async fn load_templates(&self) -> Result<Templates, StoreError> {
        Ok(self
            .read_json(self.data_dir.join(TEMPLATES_FILE))
            .await?
            .unwrap_or_default())
    }

    async fn save_templates(&self, templates: &Templates) -> Result<(), StoreError> {
        self.write_json(self.data_dir.join(TEMPLATES_FILE), templates)
            .await?;
        debug!("Saved {} templates", templates.len());
        Ok(())
    }

    async fn write_output(&self, file_name: &str, content: &str) -> Result<String, StoreError> {
        let path = self.output_dir.join(file_name);
        let bytes = content.as_bytes().to_vec();
        let target = path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&target, &bytes)).await??;
        info!("Generated {}", path.display());
        Ok(file_name.to_string())
    }

    async fn read_output(&self, rel_path: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if !is_contained(Path::new(rel_path)) {
            return Ok(None);
        }
        let path = self.output_dir.join(rel_path);
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        }
        tokio::fs::read(&path)
            .await
            .map(Some)
            .map_err(|source| StoreError::Io { path, source })
    }

    async fn list_outputs(&self) -> Result<Vec<OutputFile>, StoreError> {
        let io_err = |source| StoreError::Io {
            path: self.output_dir.clone(),
            source,
        };
        let mut entries = tokio::fs::read_dir(&self.output_dir)
            .await
            .map_err(io_err)?;
        let mut files = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_err)? {
            let metadata = entry.metadata().await.map_err(io_err)?;
            if !metadata.is_file() {
                continue;
            }
            files.push(OutputFile {
                name: entry.file_name().to_string_lossy().into_owned(),
                size: metadata.len(),
                modified: metadata.modified().ok().map(DateTime::<Utc>::from),
            });
        }
        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::cv::{Contact, OtherItem, SkillItem};
    use crate::models::template::{SectionSelection, Selection, Template};

    fn sample_cv() -> CvRecord {
        CvRecord {
            contact: Contact {
                name: "Ana Pérez".to_string(),
                email: "ana@example.com".to_string(),
                links: vec!["https://github.com/ana".to_string()],
                ..Default::default()
            },
            summary: "Ingeniera de software".to_string(),
            skills: vec![SkillItem {
                name: "Rust".to_string(),
                level: "advanced".to_string(),
                tags: vec!["backend".to_string()],
                ..Default::default()
            }],
            otros: vec![OtherItem {
                title: "Charla".to_string(),
                periodo: "2023".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_open_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        JsonFileStore::open(dir.path().join("data")).unwrap();
        assert!(dir.path().join("data").is_dir());
        assert!(dir.path().join("data").join(OUTPUT_DIR).is_dir());
    }

    #[tokio::test]
    async fn test_missing_documents_give_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.load_cv().await.unwrap(), CvRecord::default());
        assert!(store.load_templates().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let cv = sample_cv();
        store.save_cv(&cv).await.unwrap();
        assert_eq!(store.load_cv().await.unwrap(), cv);
    }

    #[tokio::test]
    async fn test_cv_written_indented_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.save_cv(&sample_cv()).await.unwrap();
        let raw = std::fs::read_to_string(dir.path().join(CV_FILE)).unwrap();
        assert!(raw.contains("Ana Pérez"));
        assert!(raw.contains("\n  \"contact\""));
    }

    #[tokio::test]
    async fn test_save_overwrites_without_leftovers() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.save_cv(&sample_cv()).await.unwrap();
        store.save_cv(&CvRecord::default()).await.unwrap();
        assert_eq!(store.load_cv().await.unwrap(), CvRecord::default());

        let names: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 2, "unexpected files: {names:?}");
    }

    #[tokio::test]
    async fn test_nulls_and_numbers_load_as_strings() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let cases: [(&str, fn(&CvRecord) -> bool); 5] = [
            (r#"{"experience": [{"title": "Dev", "end": null}]}"#, |cv| {
                cv.experience[0].end.is_empty() && cv.experience[0].title == "Dev"
            }),
            (r#"{"courses": [{"name": "K8s", "hours": 40}]}"#, |cv| {
                cv.courses[0].hours == "40"
            }),
            (r#"{"skills": [{"name": "Rust", "tags": null}]}"#, |cv| {
                cv.skills[0].tags.is_empty()
            }),
            (r#"{"summary": null, "contact": null}"#, |cv| {
                cv.summary.is_empty() && cv.contact == Contact::default()
            }),
            (r#"{"otros": null, "education": [{"degree": "BSc", "start": 2012}]}"#, |cv| {
                cv.otros.is_empty() && cv.education[0].start == "2012"
            }),
        ];
        for (raw, check) in cases {
            std::fs::write(dir.path().join(CV_FILE), raw).unwrap();
            let cv = store.load_cv().await.unwrap();
            assert!(check(&cv), "unexpected record for {raw}: {cv:?}");
        }
    }

    #[tokio::test]
    async fn test_corrupt_cv_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        std::fs::write(dir.path().join(CV_FILE), "{not json").unwrap();
        assert!(matches!(
            store.load_cv().await,
            Err(StoreError::Json { .. })
        ));
    }

    #[tokio::test]
    async fn test_templates_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let mut templates = Templates::new();
        templates.insert(
            "backend".to_string(),
            Template {
                name: "backend".to_string(),
                description: "Backend roles".to_string(),
                selection: Selection {
                    include_summary: false,
                    skills: Some(SectionSelection {
                        selected: Some(vec![1, 0]),
                        order: None,
                    }),
                    ..Default::default()
                },
                created: "2024-05-01".to_string(),
            },
        );
        store.save_templates(&templates).await.unwrap();
        assert_eq!(store.load_templates().await.unwrap(), templates);
    }

    #[tokio::test]
    async fn test_output_write_read_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        let name = store.write_output("CV.md", "# Ana\n").await.unwrap();
        assert_eq!(name, "CV.md");

        let bytes = store.read_output("CV.md").await.unwrap().unwrap();
        assert_eq!(bytes, b"# Ana\n");
        assert!(store.read_output("missing.md").await.unwrap().is_none());

        let files = store.list_outputs().await.unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "CV.md");
        assert_eq!(files[0].size, 6);
    }

    #[tokio::test]
    async fn test_read_output_rejects_escaping_paths() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        store.save_cv(&sample_cv()).await.unwrap();
        assert!(store.read_output("../cv.json").await.unwrap().is_none());
        assert!(store.read_output("/etc/passwd").await.unwrap().is_none());
        assert!(store.read_output("").await.unwrap().is_none());
    }
}
