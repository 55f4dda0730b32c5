//! Photo normalization.
//!
//! Turns arbitrary user-selected images into width-bounded JPEGs ready for
//! upload to the inference service.

pub mod normalizer;

pub use normalizer::{normalize, normalize_batch, NormalizedImage, RawImage};
