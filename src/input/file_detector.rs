//! File type detection

use crate::error::{JobSignalError, Result};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// A JSON document: an array of records, or one object
    Json,
    /// One JSON record per line
    JsonLines,
    Unknown,
}

impl FileType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "json" => FileType::Json,
            "jsonl" | "ndjson" => FileType::JsonLines,
            _ => FileType::Unknown,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path.extension().and_then(|ext| ext.to_str()).ok_or_else(|| {
            JobSignalError::InvalidInput(format!("File has no extension: {}", path.display()))
        })?;
        Ok(Self::from_extension(extension))
    }
}
