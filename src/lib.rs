//! Job signal library: deduplicate scraped job postings and rank them for a candidate

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;
pub mod schema;

pub use config::Config;
pub use error::{JobSignalError, Result};
