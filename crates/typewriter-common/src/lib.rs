//! Shared plumbing for the typewriter binaries: configuration, telemetry
//! and the top-level error type.

pub mod config;
pub mod error;
pub mod telemetry;

pub use crate::config::{Config, FileStore, Loader, Saver};
pub use crate::error::{SerDeError, TypewriterError};
pub use typewriter_core;
