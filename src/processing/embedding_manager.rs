//! Model2Vec model catalogue, download and local resolution

use crate::config::AvailableModel;
use crate::error::{JobSignalError, Result};
use hf_hub::api::tokio::Api;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Files a model directory must hold before Model2Vec can load it
const REQUIRED_FILES: [&str; 2] = ["model.safetensors", "tokenizer.json"];
const OPTIONAL_FILES: [&str; 2] = ["config.json", "README.md"];

/// Information about an embedding model that can be downloaded
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingModelInfo {
    pub id: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
    /// Output dimension when known ahead of loading
    pub dimensions: Option<usize>,
}

impl From<&AvailableModel> for EmbeddingModelInfo {
    fn from(model: &AvailableModel) -> Self {
        Self {
            id: model.name.clone(),
            repo_id: model.repo_id.clone(),
            size_mb: model.size_mb,
            description: model.description.clone(),
            dimensions: None,
        }
    }
}

/// Handles download, caching and lookup of embedding models
pub struct EmbeddingModelManager {
    models_dir: PathBuf,
    available_models: BTreeMap<String, EmbeddingModelInfo>,
    downloaded_models: HashSet<String>,
}

impl EmbeddingModelManager {
    /// Create a manager over `models_dir` with the built-in catalogue.
    ///
    /// `extra_models` (usually from the config file) are added on top;
    /// built-in entries keep their known dimensions.
    pub async fn new(models_dir: PathBuf, extra_models: &[AvailableModel]) -> Result<Self> {
        fs::create_dir_all(&models_dir).await.map_err(|e| {
            JobSignalError::ModelError(format!(
                "Failed to create models directory {}: {}",
                models_dir.display(),
                e
            ))
        })?;

        let mut available_models: BTreeMap<String, EmbeddingModelInfo> = builtin_models()
            .into_iter()
            .map(|info| (info.id.clone(), info))
            .collect();
        for model in extra_models {
            available_models
                .entry(model.name.clone())
                .or_insert_with(|| EmbeddingModelInfo::from(model));
        }

        let mut manager = Self {
            models_dir,
            available_models,
            downloaded_models: HashSet::new(),
        };
        manager.scan_downloaded_models().await?;
        Ok(manager)
    }

    async fn scan_downloaded_models(&mut self) -> Result<()> {
        let mut entries = fs::read_dir(&self.models_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }
            if is_model_directory(&entry.path()).await {
                let model_id = entry.file_name().to_string_lossy().to_string();
                debug!("Found downloaded model: {}", model_id);
                self.downloaded_models.insert(model_id);
            }
        }
        Ok(())
    }

    /// Download a catalogue model from the Hugging Face Hub
    pub async fn download_model(&mut self, model_id: &str) -> Result<PathBuf> {
        let model_info = self
            .available_models
            .get(model_id)
            .cloned()
            .ok_or_else(|| {
                JobSignalError::ModelError(format!("Unknown embedding model: {}", model_id))
            })?;

        let model_dir = self.models_dir.join(model_id);
        if self.downloaded_models.contains(model_id) {
            return Ok(model_dir);
        }

        info!(
            "Downloading embedding model {} ({} MB) from {}",
            model_id, model_info.size_mb, model_info.repo_id
        );
        fs::create_dir_all(&model_dir).await?;

        let api = Api::new().map_err(|e| {
            JobSignalError::ModelError(format!("Failed to initialize HF API: {}", e))
        })?;
        let repo = api.model(model_info.repo_id.clone());

        for file in REQUIRED_FILES.iter().chain(OPTIONAL_FILES.iter()) {
            match repo.get(file).await {
                Ok(cached) => {
                    fs::copy(&cached, model_dir.join(file)).await.map_err(|e| {
                        JobSignalError::ModelError(format!("Failed to copy {}: {}", file, e))
                    })?;
                    debug!("Downloaded {}", file);
                }
                Err(e) if OPTIONAL_FILES.contains(file) => {
                    warn!("Optional file {} not found for {}: {}", file, model_id, e);
                }
                Err(e) => {
                    return Err(JobSignalError::ModelError(format!(
                        "Failed to download required file {}: {}",
                        file, e
                    )));
                }
            }
        }

        self.downloaded_models.insert(model_id.to_string());
        info!("Embedding model {} ready at {}", model_id, model_dir.display());
        Ok(model_dir)
    }

    pub fn get_model_path(&self, model_id: &str) -> Option<PathBuf> {
        self.downloaded_models
            .contains(model_id)
            .then(|| self.models_dir.join(model_id))
    }

    /// Path of a local model, downloading it first when missing
    pub async fn ensure_model_available(&mut self, model_id: &str) -> Result<PathBuf> {
        match self.get_model_path(model_id) {
            Some(path) => Ok(path),
            None => self.download_model(model_id).await,
        }
    }

    /// Catalogue entries sorted by id
    pub fn list_available_models(&self) -> Vec<&EmbeddingModelInfo> {
        self.available_models.values().collect()
    }

    pub fn list_downloaded_models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.downloaded_models.iter().cloned().collect();
        models.sort();
        models
    }

    pub fn get_model_info(&self, model_id: &str) -> Option<&EmbeddingModelInfo> {
        self.available_models.get(model_id)
    }

    pub fn is_model_downloaded(&self, model_id: &str) -> bool {
        self.downloaded_models.contains(model_id)
    }

    /// Resolve a model id from an id or a Hugging Face repo id
    pub fn resolve_model_id(&self, input: &str) -> Option<String> {
        if self.available_models.contains_key(input) {
            return Some(input.to_string());
        }
        let input_lower = input.to_lowercase();
        self.available_models
            .values()
            .find(|info| {
                info.repo_id.to_lowercase() == input_lower || info.id.to_lowercase() == input_lower
            })
            .map(|info| info.id.clone())
    }
}

fn builtin_models() -> Vec<EmbeddingModelInfo> {
    vec![
        EmbeddingModelInfo {
            id: "potion-base-8M".to_string(),
            repo_id: "minishlab/potion-base-8M".to_string(),
            size_mb: 33,
            description: "Small Model2Vec model, good default for job matching".to_string(),
            dimensions: Some(256),
        },
        EmbeddingModelInfo {
            id: "m2v-base".to_string(),
            repo_id: "minishlab/M2V_base_output".to_string(),
            size_mb: 90,
            description: "Fast Model2Vec base embeddings model".to_string(),
            dimensions: Some(256),
        },
        EmbeddingModelInfo {
            id: "m2v-large".to_string(),
            repo_id: "minishlab/M2V_large_output".to_string(),
            size_mb: 250,
            description: "Higher capacity Model2Vec model".to_string(),
            dimensions: Some(512),
        },
    ]
}

async fn is_model_directory(path: &Path) -> bool {
    for file in REQUIRED_FILES {
        if fs::metadata(path.join(file)).await.is_err() {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_manager_lists_builtin_catalogue() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf(), &[])
            .await
            .unwrap();

        let ids: Vec<&str> = manager
            .list_available_models()
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["m2v-base", "m2v-large", "potion-base-8M"]);
        assert!(manager.list_downloaded_models().is_empty());
        assert_eq!(manager.get_model_info("potion-base-8M").unwrap().dimensions, Some(256));
    }

    #[tokio::test]
    async fn test_config_models_extend_catalogue() {
        let temp_dir = TempDir::new().unwrap();
        let custom = AvailableModel {
            name: "custom".to_string(),
            repo_id: "someone/custom-m2v".to_string(),
            size_mb: 10,
            description: "Custom model".to_string(),
        };
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf(), &[custom])
            .await
            .unwrap();

        let info = manager.get_model_info("custom").unwrap();
        assert_eq!(info.repo_id, "someone/custom-m2v");
        assert_eq!(info.dimensions, None);
    }

    #[tokio::test]
    async fn test_scan_detects_complete_model_directories() {
        let temp_dir = TempDir::new().unwrap();
        let complete = temp_dir.path().join("potion-base-8M");
        std::fs::create_dir_all(&complete).unwrap();
        std::fs::write(complete.join("model.safetensors"), b"x").unwrap();
        std::fs::write(complete.join("tokenizer.json"), b"{}").unwrap();
        let partial = temp_dir.path().join("m2v-base");
        std::fs::create_dir_all(&partial).unwrap();
        std::fs::write(partial.join("tokenizer.json"), b"{}").unwrap();

        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf(), &[])
            .await
            .unwrap();
        assert!(manager.is_model_downloaded("potion-base-8M"));
        assert!(!manager.is_model_downloaded("m2v-base"));
        assert_eq!(manager.get_model_path("potion-base-8M"), Some(complete));
    }

    #[tokio::test]
    async fn test_resolve_model_id() {
        let temp_dir = TempDir::new().unwrap();
        let manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf(), &[])
            .await
            .unwrap();

        assert_eq!(manager.resolve_model_id("potion-base-8M"), Some("potion-base-8M".to_string()));
        assert_eq!(
            manager.resolve_model_id("minishlab/potion-base-8M"),
            Some("potion-base-8M".to_string())
        );
        assert_eq!(manager.resolve_model_id("M2V-LARGE"), Some("m2v-large".to_string()));
        assert_eq!(manager.resolve_model_id("unknown"), None);
    }

    #[tokio::test]
    async fn test_download_unknown_model_fails() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = EmbeddingModelManager::new(temp_dir.path().to_path_buf(), &[])
            .await
            .unwrap();
        assert!(matches!(
            manager.download_model("nope").await,
            Err(JobSignalError::ModelError(_))
        ));
    }
}
