//! Error types for the omnilab engine.

use thiserror::Error;

/// Errors surfaced by engine operations.
#[derive(Error, Debug)]
pub enum LabError {
    /// A diagnostic run was requested with no assembly in the workspace.
    #[error("no active prototype in the workspace")]
    NoActiveAssembly,

    /// A diagnostic run was requested while one is already in progress.
    #[error("a diagnostic run is already in progress")]
    DiagnosticRunning,

    /// A configuration value is outside its legal range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ConfigParse(#[from] toml::de::Error),
}
