//! Configuration module for Fiscally
//!
//! This module provides configuration management including:
//! - Data directory resolution
//! - User settings persistence
//! - Analytics engine parameters

pub mod paths;
pub mod settings;

pub use paths::FiscallyPaths;
pub use settings::{EngineSettings, Settings};
