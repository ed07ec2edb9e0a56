//! Records exchanged with the search, extraction and CV collaborators

pub mod signal;
pub mod job;
pub mod profile;

pub use job::StructuredJob;
pub use profile::CandidateProfile;
pub use signal::{RawSignal, SourceKey};
