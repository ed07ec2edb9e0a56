//! Configuration management for the job signal ranker

use crate::error::{JobSignalError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tolerance used when checking that ranking weights sum to one.
pub const WEIGHT_SUM_TOLERANCE: f32 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub models: ModelConfig,
    pub ranking: RankingConfig,
    pub dedup: DedupConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub models_dir: PathBuf,
    pub default_embedding_model: String,
    /// Texts sent to the embedding model per call
    pub batch_size: usize,
    pub available_models: Vec<AvailableModel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableModel {
    pub name: String,
    pub repo_id: String,
    pub size_mb: u64,
    pub description: String,
}

/// Weights of the four ranking sub-scores.
///
/// The final score stays inside `[0, 1]` only while every weight is
/// non-negative and the weights sum to one, so [`RankingWeights::new`]
/// rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingWeights {
    pub embedding: f32,
    pub location: f32,
    pub recency: f32,
    pub skill_overlap: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    pub weights: RankingWeights,
    /// Age in days at which the recency sub-score reaches zero.
    pub recency_horizon_days: u32,
    /// Extra neighbours requested from the index beyond the job count.
    pub over_fetch: usize,
    /// Number of top-ranked jobs fed into skill gap analysis.
    pub gap_top_jobs: usize,
    pub gap_skills_per_job: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DedupConfig {
    /// Title and company are truncated to this many characters in dedup keys.
    pub key_prefix_chars: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
    pub top_results: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Console,
    Json,
    Markdown,
    Csv,
}

impl RankingWeights {
    pub fn new(embedding: f32, location: f32, recency: f32, skill_overlap: f32) -> Result<Self> {
        let weights = Self {
            embedding,
            location,
            recency,
            skill_overlap,
        };
        weights.validate()?;
        Ok(weights)
    }

    pub fn validate(&self) -> Result<()> {
        let all = [self.embedding, self.location, self.recency, self.skill_overlap];
        if all.iter().any(|w| !w.is_finite() || *w < 0.0) {
            return Err(JobSignalError::InvalidInput(format!(
                "ranking weights must be finite and non-negative: {:?}",
                self
            )));
        }

        let sum = self.sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(JobSignalError::InvalidInput(format!(
                "ranking weights must sum to 1.0, got {}",
                sum
            )));
        }
        Ok(())
    }

    pub fn sum(&self) -> f32 {
        self.embedding + self.location + self.recency + self.skill_overlap
    }
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            embedding: 0.7,
            location: 0.1,
            recency: 0.1,
            skill_overlap: 0.1,
        }
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            recency_horizon_days: 90,
            over_fetch: 100,
            gap_top_jobs: 10,
            gap_skills_per_job: 10,
        }
    }
}

impl RankingConfig {
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        if self.recency_horizon_days == 0 {
            return Err(JobSignalError::Configuration(
                "ranking.recency_horizon_days must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self { key_prefix_chars: 50 }
    }
}

impl Default for Config {
    fn default() -> Self {
        let models_dir = dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".job-signal")
            .join("models");

        Self {
            models: ModelConfig {
                models_dir,
                default_embedding_model: "potion-base-8M".to_string(),
                batch_size: 32,
                available_models: vec![
                    AvailableModel {
                        name: "potion-base-8M".to_string(),
                        repo_id: "minishlab/potion-base-8M".to_string(),
                        size_mb: 33,
                        description: "Small Model2Vec model, good default for job matching"
                            .to_string(),
                    },
                    AvailableModel {
                        name: "m2v-base".to_string(),
                        repo_id: "minishlab/M2V_base_output".to_string(),
                        size_mb: 90,
                        description: "Fast Model2Vec base embeddings model".to_string(),
                    },
                ],
            },
            ranking: RankingConfig::default(),
            dedup: DedupConfig::default(),
            output: OutputConfig {
                format: OutputFormat::Console,
                detailed: false,
                color_output: true,
                top_results: 20,
            },
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults on first use
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = std::fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&content).map_err(|e| {
                JobSignalError::Configuration(format!("Failed to parse config: {}", e))
            })?;
            config.validate()?;
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self).map_err(|e| {
            JobSignalError::Configuration(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(config_path, content)?;
        Ok(())
    }

    /// Overwrite `config_path` with defaults without reading what is there
    pub fn reset_to(config_path: &Path) -> Result<Self> {
        let config = Self::default();
        config.save_to(config_path)?;
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-signal")
            .join("config.toml")
    }

    pub fn validate(&self) -> Result<()> {
        self.ranking.validate()?;
        if self.dedup.key_prefix_chars == 0 {
            return Err(JobSignalError::Configuration(
                "dedup.key_prefix_chars must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn models_dir(&self) -> &PathBuf {
        &self.models.models_dir
    }
}
