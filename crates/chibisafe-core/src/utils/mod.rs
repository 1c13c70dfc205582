//! Utility functions for payload decoding and display formatting.

pub mod blob;
pub mod format;

// Re-export commonly used functions at module level
pub use blob::{base64_to_blob, Blob, DEFAULT_CHUNK_SIZE};
pub use format::{content_type_for_path, format_size, truncate_string};
