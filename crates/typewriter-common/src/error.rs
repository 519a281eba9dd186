//! Error types for typewriter - thin wrapper over the core errors

use miette::Diagnostic;
use typewriter_core::{ImportError, ParseError, SpanError, StoreError};

/// Main error type for typewriter operations
#[derive(thiserror::Error, Debug, Diagnostic)]
pub enum TypewriterError {
    /// Span model contract violation
    #[error(transparent)]
    #[diagnostic(transparent)]
    Span(#[from] SpanError),

    /// Structured HTML parse failure
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),

    /// Document store failure
    #[error(transparent)]
    #[diagnostic(transparent)]
    Store(#[from] StoreError),

    /// Unsupported import
    #[error(transparent)]
    #[diagnostic(transparent)]
    Import(#[from] ImportError),

    /// Invalid or unreadable configuration
    #[error("configuration error: {0}")]
    #[diagnostic(code(typewriter::config))]
    Config(String),

    /// IO error
    #[error(transparent)]
    #[diagnostic(code(typewriter::io))]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error(transparent)]
    #[diagnostic(transparent)]
    Serde(#[from] SerDeError),
}

/// Serialization/deserialization errors
#[derive(thiserror::Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum SerDeError {
    #[error(transparent)]
    #[diagnostic(code(typewriter::serde::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(code(typewriter::serde::toml))]
    TomlDe(#[from] toml::de::Error),

    #[error(transparent)]
    #[diagnostic(code(typewriter::serde::toml))]
    TomlSer(#[from] toml::ser::Error),
}

impl From<serde_json::Error> for TypewriterError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err.into())
    }
}

impl From<toml::de::Error> for TypewriterError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serde(err.into())
    }
}

impl From<toml::ser::Error> for TypewriterError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serde(err.into())
    }
}
