//! Utility helpers: JSON serialization and atomic file writes.
pub mod serialization;

pub use serialization::FileUtils;
pub use serialization::JsonSerializer;
pub use serialization::Serializer;
