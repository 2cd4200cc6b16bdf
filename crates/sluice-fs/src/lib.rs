//! Staged files with atomic placement.
//!
//! A [`StagedFile`] is written next to its destination and renamed into place
//! on [`StagedFile::commit`]. Until then nothing is visible at the destination;
//! dropping an uncommitted file removes it.

mod error;
mod staged;

pub use error::{Error, Result};
pub use staged::{StageOptions, StagedFile};
