//! Input loading
//! Handles file detection, record decoding and input caching

pub mod file_detector;
pub mod manager;
pub mod records;

pub use manager::InputManager;
