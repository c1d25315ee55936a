//! Pack loading API for stickerpack.
//!
//! This crate is the consumer-facing entry point: it dispatches a load to the
//! manifest parser or the store loader, applies the configured validator, and
//! classifies every failure into one of a small set of [`ErrorKind`]s so
//! callers can react without matching on the layered error types below.

pub mod config;
pub mod loader;

pub use config::{default_config_path, ConfigError, LoaderConfig};
pub use loader::{load_from_manifest, load_from_store, Loader, PackSource};

use stickerpack_schema::ManifestError;
use stickerpack_store::StoreError;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("manifest error: {0}")]
    Manifest(#[from] ManifestError),
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Coarse classification of a failed load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input could not be read or is not well-formed JSON.
    Structural,
    /// Well-formed input with unknown keys, missing keys, or wrong value shapes.
    Schema,
    /// A pack or item broke a content rule.
    Invariant,
    /// The content store could not be queried.
    StoreUnavailable,
    /// One asset payload was missing, unreadable, corrupt, or empty.
    AssetUnavailable,
    /// The loader configuration could not be used.
    Config,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorKind::Structural => "structural",
            ErrorKind::Schema => "schema",
            ErrorKind::Invariant => "invariant",
            ErrorKind::StoreUnavailable => "store-unavailable",
            ErrorKind::AssetUnavailable => "asset-unavailable",
            ErrorKind::Config => "config",
        };
        f.write_str(s)
    }
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Manifest(e) => match e {
                ManifestError::Io(_) | ManifestError::Malformed(_) => ErrorKind::Structural,
                ManifestError::Schema(_) => ErrorKind::Schema,
                ManifestError::Invalid(_) => ErrorKind::Invariant,
            },
            CoreError::Store(e) => match e {
                StoreError::Invalid(_) => ErrorKind::Invariant,
                StoreError::AssetNotFound { .. }
                | StoreError::IntegrityFailure { .. }
                | StoreError::AssetUnavailable { .. }
                | StoreError::EmptyAsset { .. } => ErrorKind::AssetUnavailable,
                StoreError::Io(_)
                | StoreError::Unavailable(_)
                | StoreError::VersionMismatch { .. }
                | StoreError::Serialization(_)
                | StoreError::InvalidKey(_) => ErrorKind::StoreUnavailable,
            },
            CoreError::Config(_) => ErrorKind::Config,
        }
    }
}
