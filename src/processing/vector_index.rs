//! Exact cosine-similarity search over job embeddings

use crate::error::{JobSignalError, Result};
use crate::processing::embeddings::EmbeddingProvider;
use crate::schema::StructuredJob;
use ndarray::{ArrayView1, ArrayView2};

/// Characters of the description summary included in a job's embedding text
pub const DESCRIPTION_EMBED_CHARS: usize = 2000;

/// Nearest-neighbour search keyed by job id.
///
/// Similarities are cosine values in `[-1, 1]`; see [`similarity_to_unit`].
pub trait VectorSearch {
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(String, f32)>>;

    fn size(&self) -> usize;

    fn dimension(&self) -> usize;
}

/// Brute-force inner-product index over L2-normalized vectors.
///
/// Vectors live in one row-major buffer whose row `i` belongs to `job_ids[i]`.
/// Adding the same id twice keeps both rows.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    dimension: usize,
    data: Vec<f32>,
    job_ids: Vec<String>,
}

impl FlatIndex {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            data: Vec::new(),
            job_ids: Vec::new(),
        }
    }

    /// Append vectors under the given ids, normalizing each to unit length.
    pub fn add(&mut self, vectors: &[Vec<f32>], job_ids: &[String]) -> Result<()> {
        if vectors.is_empty() || job_ids.is_empty() || vectors.len() != job_ids.len() {
            return Err(JobSignalError::InvalidInput(format!(
                "vectors and job_ids must be non-empty and of equal length (got {} and {})",
                vectors.len(),
                job_ids.len()
            )));
        }
        if let Some((i, v)) = vectors.iter().enumerate().find(|(_, v)| v.len() != self.dimension) {
            return Err(JobSignalError::InvalidInput(format!(
                "vector {} has dimension {}, index expects {}",
                i,
                v.len(),
                self.dimension
            )));
        }

        self.data.reserve(vectors.len() * self.dimension);
        for vector in vectors {
            self.data.extend(normalize_l2(vector));
        }
        self.job_ids.extend(job_ids.iter().cloned());

        log::info!("Added {} embeddings; total {}", job_ids.len(), self.job_ids.len());
        Ok(())
    }

    pub fn clear(&mut self) {
        self.data.clear();
        self.job_ids.clear();
        log::debug!("Cleared vector index (dimension {})", self.dimension);
    }

    pub fn is_empty(&self) -> bool {
        self.job_ids.is_empty()
    }

    pub fn job_ids(&self) -> &[String] {
        &self.job_ids
    }

    fn matrix(&self) -> Result<ArrayView2<'_, f32>> {
        ArrayView2::from_shape((self.job_ids.len(), self.dimension), &self.data)
            .map_err(|e| JobSignalError::InvalidInput(format!("corrupt index storage: {}", e)))
    }
}

impl VectorSearch for FlatIndex {
    /// Up to `top_k` `(job_id, similarity)` pairs, best first; ties keep insertion order.
    /// NaN similarities sort after every number.
    fn search(&self, query: &[f32], top_k: usize) -> Result<Vec<(String, f32)>> {
        if self.is_empty() || top_k == 0 {
            return Ok(Vec::new());
        }
        if query.len() != self.dimension {
            return Err(JobSignalError::InvalidInput(format!(
                "query has dimension {}, index expects {}",
                query.len(),
                self.dimension
            )));
        }

        let query = normalize_l2(query);
        let scores = self.matrix()?.dot(&ArrayView1::from(&query[..]));

        let mut ranked: Vec<(usize, f32)> = scores.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| a.1.is_nan().cmp(&b.1.is_nan()).then(b.1.total_cmp(&a.1)));
        ranked.truncate(top_k.min(self.job_ids.len()));

        Ok(ranked
            .into_iter()
            .map(|(i, score)| (self.job_ids[i].clone(), score))
            .collect())
    }

    fn size(&self) -> usize {
        self.job_ids.len()
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Scale a vector to unit L2 norm; a zero vector is returned unchanged.
pub fn normalize_l2(vector: &[f32]) -> Vec<f32> {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 && norm.is_finite() {
        vector.iter().map(|x| x / norm).collect()
    } else {
        vector.to_vec()
    }
}

/// Remap a cosine similarity from `[-1, 1]` onto `[0, 1]`; NaN maps to 0.
pub fn similarity_to_unit(similarity: f32) -> f32 {
    if similarity.is_nan() {
        return 0.0;
    }
    ((similarity + 1.0) / 2.0).clamp(0.0, 1.0)
}

/// Text embedded for a job: title, company, skills and the start of the summary.
pub fn job_embedding_text(job: &StructuredJob) -> String {
    let mut parts: Vec<String> = Vec::new();

    for field in [&job.title, &job.company] {
        if let Some(value) = field.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            parts.push(value.to_string());
        }
    }
    if !job.skills.is_empty() {
        parts.push(job.skills.join(", "));
    }
    if let Some(summary) = job.description_summary.as_deref().filter(|s| !s.trim().is_empty()) {
        parts.push(summary.chars().take(DESCRIPTION_EMBED_CHARS).collect());
    }

    parts.join(" | ")
}

/// Embed every job in one batch and index it under its `source_url`.
pub fn build_job_index(
    jobs: &[StructuredJob],
    embedder: &dyn EmbeddingProvider,
) -> Result<FlatIndex> {
    let mut index = FlatIndex::new(embedder.dimension());
    if jobs.is_empty() {
        return Ok(index);
    }

    let texts: Vec<String> = jobs.iter().map(job_embedding_text).collect();
    let vectors = embedder.batch_embed(&texts)?;
    let job_ids: Vec<String> = jobs.iter().map(|j| j.source_url.clone()).collect();
    index.add(&vectors, &job_ids)?;

    log::info!("Built job index with {} entries using {}", index.size(), embedder.name());
    Ok(index)
}
