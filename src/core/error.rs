//! Error types for the voxel world

use std::path::PathBuf;

use thiserror::Error;

use crate::engine_state::voxels::chunk::ColumnPosition;

/// Failure while loading a block definition file.
///
/// Every variant is fatal for the catalog being built: there is no partial
/// catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unable to open block file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unrecognised block token \"{token}\" in {name}")]
    UnrecognisedToken { token: String, name: String },

    #[error("missing value for \"{key}\" in {name}")]
    MissingValue { key: &'static str, name: String },

    #[error("invalid value \"{value}\" for \"{key}\" in {name}")]
    InvalidValue {
        key: &'static str,
        value: String,
        name: String,
    },

    #[error("block {name} does not define an ID")]
    MissingId { name: String },
}

/// Main error type for the world
#[derive(Debug, Error)]
pub enum WorldError {
    #[error("unable to read settings {path}: {source}")]
    SettingsIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid world settings: {0}")]
    SettingsParse(#[from] serde_json::Error),

    #[error("invalid world settings: {0}")]
    InvalidSettings(String),

    #[error("block catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("generation failed for column ({}, {}): {reason}", .position.x, .position.y)]
    Generation {
        position: ColumnPosition,
        reason: String,
    },

    #[error("unable to start streaming worker: {0}")]
    Worker(#[source] std::io::Error),
}
