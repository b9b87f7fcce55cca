//! Core error types

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Cannot find Chart.yaml in {path}")]
    DescriptorNotFound { path: String },

    #[error("Invalid Chart.yaml at {path}: {message}")]
    InvalidDescriptor { path: String, message: String },

    #[error("Chart build directory already exists: {}", path.display())]
    BuildDirExists { path: PathBuf },

    #[error("Required chart file missing: {}", path.display())]
    MissingChartFile { path: PathBuf },

    #[error("Invalid version '{version}': {source}")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    #[error("Failed to parse Chart.yaml: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
