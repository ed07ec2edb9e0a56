//! Embedding providers: Model2Vec static models and a deterministic hashing embedder

use crate::error::{JobSignalError, Result};
use anyhow::Context;
use model2vec_rs::model::StaticModel;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// Placeholder embedded in place of blank text; some providers reject empty input.
pub const BLANK_TEXT_PLACEHOLDER: &str = " ";

/// Maps text to fixed-length vectors.
///
/// `dimension` must stay constant for the provider's lifetime, since every
/// vector in one index has to share it.
pub trait EmbeddingProvider: Send + Sync {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>>;

    fn batch_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn dimension(&self) -> usize;

    fn name(&self) -> &str;
}

/// Substitute the placeholder for blank text; other text passes through untouched.
pub fn prepare_text(text: &str) -> &str {
    if text.trim().is_empty() {
        BLANK_TEXT_PLACEHOLDER
    } else {
        text
    }
}

/// Local Model2Vec embeddings with an in-memory text cache
pub struct Model2VecEmbedder {
    model: StaticModel,
    dimension: usize,
    batch_size: usize,
    cache: Mutex<HashMap<String, Vec<f32>>>,
    model_name: String,
}

impl Model2VecEmbedder {
    pub fn new(model_path: &Path, model_name: &str, batch_size: usize) -> Result<Self> {
        let start_time = Instant::now();

        log::info!("Loading Model2Vec embedding model from: {}", model_path.display());

        let model = StaticModel::from_pretrained(
            model_path,
            None, // token
            None, // normalize
            None, // subfolder
        )
        .with_context(|| format!("Failed to load model from {}", model_path.display()))?;

        // Static models expose no dimension accessor; measure it once.
        let dimension = model.encode_single(BLANK_TEXT_PLACEHOLDER).len();
        if dimension == 0 {
            return Err(JobSignalError::ModelError(format!(
                "Model at {} produced empty embeddings",
                model_path.display()
            )));
        }

        log::info!(
            "Model loaded in {:.2?} (dimension {})",
            start_time.elapsed(),
            dimension
        );

        Ok(Self {
            model,
            dimension,
            batch_size: batch_size.max(1),
            cache: Mutex::new(HashMap::new()),
            model_name: model_name.to_string(),
        })
    }
}

impl EmbeddingProvider for Model2VecEmbedder {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        let text = prepare_text(text);
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(cached) = cache.get(text) {
            return Ok(cached.clone());
        }

        let embedding = self.model.encode_single(text);
        cache.insert(text.to_string(), embedding.clone());
        Ok(embedding)
    }

    fn batch_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let prepared: Vec<String> = texts.iter().map(|t| prepare_text(t).to_string()).collect();
        let mut results: Vec<Option<Vec<f32>>> = vec![None; prepared.len()];
        let mut cache = self.cache.lock().unwrap_or_else(|e| e.into_inner());

        let mut uncached_texts = Vec::new();
        let mut uncached_indices = Vec::new();
        for (i, text) in prepared.iter().enumerate() {
            match cache.get(text) {
                Some(cached) => results[i] = Some(cached.clone()),
                None => {
                    uncached_texts.push(text.clone());
                    uncached_indices.push(i);
                }
            }
        }

        let cache_hits = prepared.len() - uncached_texts.len();
        for (batch, indices) in uncached_texts
            .chunks(self.batch_size)
            .zip(uncached_indices.chunks(self.batch_size))
        {
            let embeddings = self.model.encode(batch);
            if embeddings.len() != batch.len() {
                return Err(JobSignalError::Embedding(format!(
                    "Model returned {} embeddings for {} texts",
                    embeddings.len(),
                    batch.len()
                )));
            }
            for ((text, embedding), &i) in batch.iter().zip(embeddings).zip(indices) {
                cache.insert(text.clone(), embedding.clone());
                results[i] = Some(embedding);
            }
        }

        log::debug!(
            "Embedded {} texts ({} cache hits)",
            prepared.len(),
            cache_hits
        );

        results
            .into_iter()
            .map(|r| {
                r.ok_or_else(|| JobSignalError::Embedding("Missing embedding in batch".to_string()))
            })
            .collect()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        &self.model_name
    }
}

/// Model-free embedder that hashes word tokens into signed buckets.
///
/// Vectors are reproducible across runs and machines, and texts sharing
/// words get positive cosine similarity. Used by tests and offline runs.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
}

impl HashingEmbedder {
    pub const DEFAULT_DIMENSION: usize = 256;

    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: dimension.max(1),
        }
    }

    fn embed_prepared(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimension];
        for token in tokenize(text) {
            let hash = fnv1a(token.as_bytes());
            let bucket = (hash % self.dimension as u64) as usize;
            let sign = if (hash >> 63) == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }
        vector
    }
}

impl Default for HashingEmbedder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DIMENSION)
    }
}

impl EmbeddingProvider for HashingEmbedder {
    fn embed_text(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_prepared(prepare_text(text)))
    }

    fn batch_embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_prepared(prepare_text(t))).collect())
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn name(&self) -> &str {
        "hashing"
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !(c.is_alphanumeric() || c == '+' || c == '#'))
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn fnv1a(bytes: &[u8]) -> u64 {
    const OFFSET: u64 = 0xcbf29ce484222325;
    const PRIME: u64 = 0x100000001b3;
    bytes.iter().fold(OFFSET, |hash, b| (hash ^ *b as u64).wrapping_mul(PRIME))
}
