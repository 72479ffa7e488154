//! Error types for packstage
//!
//! Domain-specific error types using thiserror.

use std::path::PathBuf;
use thiserror::Error;

use crate::core::pipeline::Stage;

/// Recipe and run-configuration errors
///
/// All of these are raised before any external tool runs.
#[derive(Error, Debug)]
pub enum RecipeError {
    /// Recipe file not found
    #[error("Recipe not found at '{path}'")]
    NotFound { path: PathBuf },

    /// Recipe file could not be read
    #[error("Failed to read recipe '{path}': {error}")]
    Unreadable { path: PathBuf, error: String },

    /// Recipe parse error
    #[error("Failed to parse recipe: {source}")]
    Parse { source: toml::de::Error },

    /// Unsupported checksum algorithm name
    #[error("Unknown hash algorithm '{name}' (expected 'md5' or 'sha1')")]
    UnknownHash { name: String },

    /// Unsupported package format name
    #[error("Unknown package format '{name}' (expected 'deb' or 'rpm')")]
    UnknownFormat { name: String },

    /// Licence name has no file in the licence directory
    #[error("Unknown licence '{name}': no file at '{path}'")]
    UnknownLicence { name: String, path: PathBuf },

    /// Selection root does not exist
    #[error("Selection root not found: {path}")]
    SelectionRootNotFound { path: PathBuf },

    /// Walking a selection root failed
    #[error("Failed to scan selection root '{path}': {error}")]
    SelectionScan { path: PathBuf, error: String },

    /// Missing required recipe field
    #[error("Recipe is missing required field '{field}'")]
    MissingField { field: String },

    /// Another run holds the staging directory
    #[error("Staging directory for '{platform}' in '{path}' is in use by another run")]
    StagingLocked { platform: String, path: PathBuf },
}

/// Filesystem errors
#[derive(Error, Debug)]
pub enum FilesystemError {
    /// Failed to create directory
    #[error("Failed to create directory '{path}': {error}")]
    CreateDir { path: PathBuf, error: String },

    /// Failed to remove directory
    #[error("Failed to remove directory '{path}': {error}")]
    RemoveDir { path: PathBuf, error: String },

    /// Failed to write file
    #[error("Failed to write file '{path}': {error}")]
    WriteFile { path: PathBuf, error: String },

    /// Failed to read file
    #[error("Failed to read file '{path}': {error}")]
    ReadFile { path: PathBuf, error: String },

    /// Failed to set permissions
    #[error("Failed to set permissions on '{path}': {error}")]
    SetPermissions { path: PathBuf, error: String },
}

/// A single failed file copy, collected during staging
#[derive(Error, Debug)]
#[error("Failed to copy '{from}' to '{to}': {error}")]
pub struct CopyError {
    pub from: PathBuf,
    pub to: PathBuf,
    pub error: String,
}

/// Staging-tree errors
#[derive(Error, Debug)]
pub enum StagingError {
    /// Filesystem error while building the tree
    #[error(transparent)]
    Filesystem(#[from] FilesystemError),

    /// One or more file copies failed
    #[error("{} of the staged file copies failed", errors.len())]
    CopyFailed { errors: Vec<CopyError> },

    /// Failed to checksum a staged file
    #[error("Failed to checksum '{path}': {error}")]
    Checksum { path: PathBuf, error: String },
}

/// External builder invocation errors
#[derive(Error, Debug)]
pub enum InvokeError {
    /// Tool could not be started
    #[error("Failed to start '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Waiting on the tool failed
    #[error("Failed waiting for '{command}': {error}")]
    Wait { command: String, error: String },

    /// Tool ran past the configured timeout and was killed
    #[error("'{command}' did not finish within {seconds}s and was killed")]
    Timeout { command: String, seconds: u64 },

    /// Tool exited with a non-zero status
    #[error("'{command}' exited with status {code}:\n{output}")]
    NonZeroExit {
        command: String,
        code: i32,
        output: String,
    },
}

/// Artifact verification and delivery errors
#[derive(Error, Debug)]
pub enum ArtifactError {
    /// Builder reported success but the expected file is absent
    #[error("Expected artifact '{path}' was not produced by the build tool")]
    Missing { path: PathBuf },

    /// Destination directory does not exist
    #[error("Destination directory not found: {path}")]
    DestinationNotFound { path: PathBuf },

    /// Copy to the destination failed; the staged artifact is kept
    #[error("Failed to deliver '{artifact}' to '{dest}': {error}")]
    Deliver {
        artifact: PathBuf,
        dest: PathBuf,
        error: String,
    },
}

/// Top-level packstage error type
#[derive(Error, Debug)]
pub enum PackstageError {
    /// Recipe error
    #[error("Recipe error: {0}")]
    Recipe(#[from] RecipeError),

    /// Filesystem error
    #[error("Filesystem error: {0}")]
    Filesystem(#[from] FilesystemError),

    /// Staging error
    #[error("Staging error: {0}")]
    Staging(#[from] StagingError),

    /// Build tool error
    #[error("Build tool error: {0}")]
    Invoke(#[from] InvokeError),

    /// Artifact error
    #[error("Artifact error: {0}")]
    Artifact(#[from] ArtifactError),
}

/// A pipeline failure tagged with the stage that produced it
///
/// The underlying cause is carried as the error source, not repeated in
/// the message, so cause chains print it exactly once.
#[derive(Error, Debug)]
#[error("Pipeline failed during {stage}")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub source: PackstageError,
}

impl PipelineError {
    pub fn new(stage: Stage, source: impl Into<PackstageError>) -> Self {
        Self {
            stage,
            source: source.into(),
        }
    }
}
