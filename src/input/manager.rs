//! Input manager for signal, job and profile files

use crate::error::{JobSignalError, Result};
use crate::input::file_detector::FileType;
use crate::input::records::{parse_records, parse_single};
use crate::schema::{CandidateProfile, RawSignal, StructuredJob};
use log::info;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::Path;
use tokio::fs;

pub struct InputManager {
    cache: HashMap<String, String>,
    enable_cache: bool,
}

impl Default for InputManager {
    fn default() -> Self {
        Self::new()
    }
}

impl InputManager {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            enable_cache: true,
        }
    }

    pub fn with_cache(mut self, enable: bool) -> Self {
        self.enable_cache = enable;
        self
    }

    pub async fn load_signals(&mut self, path: &Path) -> Result<Vec<RawSignal>> {
        let signals: Vec<RawSignal> = self.load_records(path).await?;
        info!("Loaded {} raw signals from {}", signals.len(), path.display());
        Ok(signals)
    }

    pub async fn load_jobs(&mut self, path: &Path) -> Result<Vec<StructuredJob>> {
        let jobs: Vec<StructuredJob> = self.load_records(path).await?;
        info!("Loaded {} structured jobs from {}", jobs.len(), path.display());
        Ok(jobs)
    }

    pub async fn load_profile(&mut self, path: &Path) -> Result<CandidateProfile> {
        let file_type = FileType::from_path(path)?;
        let content = self.read_content(path).await?;
        parse_single(&content, file_type, &path.display().to_string())
    }

    async fn load_records<T: DeserializeOwned>(&mut self, path: &Path) -> Result<Vec<T>> {
        let file_type = FileType::from_path(path)?;
        let content = self.read_content(path).await?;
        parse_records(&content, file_type, &path.display().to_string())
    }

    async fn read_content(&mut self, path: &Path) -> Result<String> {
        let path_str = path.to_string_lossy().to_string();

        if self.enable_cache {
            if let Some(cached) = self.cache.get(&path_str) {
                info!("Using cached content for: {}", path.display());
                return Ok(cached.clone());
            }
        }

        if !path.exists() {
            return Err(JobSignalError::InvalidInput(format!(
                "File does not exist: {}",
                path.display()
            )));
        }

        let content = fs::read_to_string(path).await?;
        if self.enable_cache {
            self.cache.insert(path_str, content.clone());
        }
        Ok(content)
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    pub fn cache_size(&self) -> usize {
        self.cache.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_load_jobs_from_jsonl_and_cache() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("jobs.jsonl");
        std::fs::write(
            &path,
            concat!(
                "{\"source\":\"indeed\",\"source_url\":\"https://x.com/1\",",
                "\"is_valid_job\":true,\"skills\":[\"Rust\"]}\n",
            ),
        )
        .unwrap();

        let mut manager = InputManager::new();
        let jobs = manager.load_jobs(&path).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].skills, vec!["Rust"]);
        assert_eq!(manager.cache_size(), 1);

        // Served from cache after the file is gone
        std::fs::remove_file(&path).unwrap();
        assert_eq!(manager.load_jobs(&path).await.unwrap().len(), 1);

        manager.clear_cache();
        assert!(manager.load_jobs(&path).await.is_err());
    }

    #[tokio::test]
    async fn test_cache_can_be_disabled() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("profile.json");
        std::fs::write(&path, r#"{"skills": ["Python", "SQL"], "experience_years": "3"}"#).unwrap();

        let mut manager = InputManager::new().with_cache(false);
        let profile = manager.load_profile(&path).await.unwrap();
        assert_eq!(profile.skills, vec!["Python", "SQL"]);
        assert_eq!(profile.experience_years, "3");
        assert_eq!(manager.cache_size(), 0);
    }

    #[tokio::test]
    async fn test_missing_and_unsupported_files() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = InputManager::new();

        let missing = manager.load_signals(&temp_dir.path().join("nope.json")).await;
        assert!(matches!(missing, Err(JobSignalError::InvalidInput(_))));

        let text = temp_dir.path().join("signals.txt");
        std::fs::write(&text, "hello").unwrap();
        assert!(matches!(
            manager.load_signals(&text).await,
            Err(JobSignalError::UnsupportedFormat(_))
        ));
    }
}
