//! Deduplication, embedding, indexing and ranking

pub mod date_parser;
pub mod dedup;
pub mod embedding_manager;
pub mod embeddings;
pub mod filters;
pub mod gap_analyzer;
pub mod normalizer;
pub mod pipeline;
pub mod ranker;
pub mod vector_index;
