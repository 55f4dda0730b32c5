//! Configuration module.
//!
//! Declares the configuration structures shared by the CLI driver and the
//! library entry points.

pub mod config;

pub use config::{AnalyzeConfig, NormalizeConfig};
