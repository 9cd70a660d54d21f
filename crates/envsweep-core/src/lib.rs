//! Discovery and health-classification engine for Python environments.
//!
//! This crate walks configured search roots, decides which directories are
//! Python environments (venv, virtualenv, conda), extracts their metadata
//! (interpreter version, size, installed package count), joins in activation
//! history from the usage tracker, and classifies each environment's health
//! to drive cleanup decisions. Rendering, prompts, and backup tooling are
//! external consumers of the registry this crate produces.

pub mod config;
pub mod detect;
pub mod discovery;
pub mod environment;
pub mod error;
pub mod health;
pub mod metadata;
pub mod python;
pub mod registry;
pub mod scanner;
pub mod usage;

// Re-export commonly used types
pub use crate::config::SweepConfig;
pub use crate::discovery::{DiscoveryEngine, ScanContext};
pub use crate::environment::{EnvironmentInfo, EnvironmentKind, HealthStatus};
pub use crate::error::{SweepError, SweepResult};
pub use crate::metadata::EnvironmentFacts;
pub use crate::python::PythonVersion;
pub use crate::registry::{EnvironmentRegistry, SortKey, SortOrder};
pub use crate::usage::{UsageLog, UsageRecord, UsageSource};

/// Initialize the library
pub fn init() {
    // Set up logging if not already configured
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();
}
