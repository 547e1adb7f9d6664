// # File Record Store
//
// File-based implementation of RecordStore.
//
// ## Purpose
//
// Persists one entry per creation run so a later monitor invocation can
// rebuild its tracked set. Single writer, no locking.
//
// ## File Format
//
// ```json
// {
//   "entries": [
//     {
//       "customer_id": "1234567890",
//       "campaign_id": "111",
//       "ad_group_resource_name": "customers/1234567890/adGroups/1",
//       "ad_resource_name": "customers/1234567890/ads/2",
//       "ad_group_ad_resource_name": "customers/1234567890/adGroupAds/1~2",
//       "initial_final_url": "https://shop.example.com/landing",
//       "created_at": "2026-01-09T12:00:00Z"
//     }
//   ]
// }
// ```
//
// ## Corruption
//
// A file that exists but does not parse is treated as empty (with a warning
// log), never as an error; the next append rewrites it as a valid store.
// Writes go through a temporary file and an atomic rename.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::Error;
use crate::traits::record_store::{CreatedRecord, RecordStore};

/// File-based record store
///
/// Entries are held in memory and the whole file is rewritten on each
/// append.
///
/// # Example
///
/// ```rust,no_run
/// use adsync_core::state::FileRecordStore;
/// use adsync_core::traits::RecordStore;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = FileRecordStore::new("data/created_ads.json").await?;
///     let entries = store.read_all().await?;
///     println!("{} tracked rollout(s)", entries.len());
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct FileRecordStore {
    path: PathBuf,
    entries: Arc<RwLock<Vec<CreatedRecord>>>,
}

/// Serializable store file format
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct RecordFileFormat {
    #[serde(default)]
    entries: Vec<CreatedRecord>,
}

impl FileRecordStore {
    /// Create or load a file record store
    ///
    /// This will:
    /// 1. Create parent directories if needed
    /// 2. Load the existing file, if any
    /// 3. Treat an unparsable file as empty (corruption is non-fatal)
    pub async fn new<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).await.map_err(|e| {
                    Error::record_store(format!(
                        "Failed to create record directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        let entries = Self::load_entries(&path).await?;

        Ok(Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    /// Load entries from file
    ///
    /// Missing file → empty. Unparsable file → warn and empty. Any other
    /// I/O failure is a real error.
    async fn load_entries(path: &Path) -> Result<Vec<CreatedRecord>, Error> {
        let content = match fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Record file does not exist: {}", path.display());
                return Ok(Vec::new());
            }
            Err(e) => {
                return Err(Error::record_store(format!(
                    "Failed to read record file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        match serde_json::from_str::<RecordFileFormat>(&content) {
            Ok(file) => {
                tracing::debug!(
                    "Loaded {} record(s) from {}",
                    file.entries.len(),
                    path.display()
                );
                Ok(file.entries)
            }
            Err(e) => {
                tracing::warn!(
                    "Record file {} is unparsable ({}); treating store as empty",
                    path.display(),
                    e
                );
                Ok(Vec::new())
            }
        }
    }

    /// Write all entries to file atomically
    async fn write_entries(&self, entries: &[CreatedRecord]) -> Result<(), Error> {
        let file = RecordFileFormat {
            entries: entries.to_vec(),
        };

        let json = serde_json::to_string_pretty(&file)
            .map_err(|e| Error::record_store(format!("Failed to serialize records: {}", e)))?;

        // Write to temporary file first, then rename into place
        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::record_store(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(json.as_bytes()).await.map_err(|e| {
                Error::record_store(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::record_store(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::record_store(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Records written to file: {}", self.path.display());
        Ok(())
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        temp.set_extension("tmp");
        temp
    }
}

#[async_trait]
impl RecordStore for FileRecordStore {
    async fn append(&self, record: &CreatedRecord) -> Result<(), Error> {
        // Hold the write lock across the file write so concurrent appends
        // within this process serialize.
        let mut entries = self.entries.write().await;
        entries.push(record.clone());
        self.write_entries(&entries).await
    }

    async fn read_all(&self) -> Result<Vec<CreatedRecord>, Error> {
        Ok(self.entries.read().await.clone())
    }
}
