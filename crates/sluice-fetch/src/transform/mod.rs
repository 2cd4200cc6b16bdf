//! Stream transformations applied to downloaded content.
//!
//! Both transforms are lazy: they pull from upstream only as their own
//! consumer asks for more.

mod decompress;
mod text;

pub use decompress::GzipChunks;
pub use text::TextDecoder;
