//! Configuration and progress types for fetching.
//!
//! These types are plain data: they are built up front and passed by
//! reference into the effectful layer.

pub mod options;
pub mod progress;

pub use options::{FetchOptions, FetchPhase, ProgressCallback, StreamOptions, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE};
pub use progress::Progress;
