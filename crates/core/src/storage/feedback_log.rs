use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::errors::CoreError;
use crate::models::feedback::FeedbackRecord;

/// Append-only sink for feedback records.
pub trait FeedbackLog: Send {
    /// Add one record after all existing ones.
    fn append(&mut self, record: &FeedbackRecord) -> Result<(), CoreError>;

    /// Every record in the log, oldest first.
    fn read_all(&self) -> Result<Vec<FeedbackRecord>, CoreError>;
}

/// Feedback log stored as a CSV file, one record per row.
///
/// The file (and its parent directory) is created on the first append, with
/// a header row. Existing rows are never rewritten. Single writer only.
#[derive(Debug, Clone)]
pub struct CsvFeedbackLog {
    path: PathBuf,
}

impl CsvFeedbackLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeedbackLog for CsvFeedbackLog {
    fn append(&mut self, record: &FeedbackRecord) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let is_new = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        tracing::info!(
            path = %self.path.display(),
            user_id = %record.user_id,
            risk_profile = %record.risk_profile,
            "feedback appended"
        );
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<FeedbackRecord>, CoreError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();
        if headers.iter().ne(FeedbackRecord::CSV_HEADER) {
            return Err(CoreError::FeedbackLog(format!(
                "unexpected header in {}: {}",
                self.path.display(),
                headers.iter().collect::<Vec<_>>().join(",")
            )));
        }

        reader
            .deserialize()
            .map(|row| row.map_err(CoreError::from))
            .collect()
    }
}

/// Feedback log kept in memory, for embedding targets without a filesystem.
#[derive(Debug, Clone, Default)]
pub struct MemoryFeedbackLog {
    records: Vec<FeedbackRecord>,
}

impl MemoryFeedbackLog {
    pub fn new() -> Self {
        Self::default()
    }
}

impl FeedbackLog for MemoryFeedbackLog {
    fn append(&mut self, record: &FeedbackRecord) -> Result<(), CoreError> {
        self.records.push(record.clone());
        Ok(())
    }

    fn read_all(&self) -> Result<Vec<FeedbackRecord>, CoreError> {
        Ok(self.records.clone())
    }
}
