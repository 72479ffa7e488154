//! Payload checksums
//!
//! MD5 or SHA1 digests of staged files, rendered in the md5sums line
//! format: digest, two spaces, path relative to the staging root.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{RecipeError, StagingError};

/// Supported digest algorithms
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HashKind {
    #[default]
    Md5,
    Sha1,
}

impl HashKind {
    /// Parse a recipe algorithm name
    pub fn parse(name: &str) -> Result<Self, RecipeError> {
        match name.to_ascii_lowercase().as_str() {
            "md5" => Ok(Self::Md5),
            "sha1" => Ok(Self::Sha1),
            _ => Err(RecipeError::UnknownHash {
                name: name.to_string(),
            }),
        }
    }

    /// Hex digest of a byte slice
    pub fn digest(self, content: &[u8]) -> String {
        match self {
            Self::Md5 => format!("{:x}", md5::compute(content)),
            Self::Sha1 => hex::encode(sha1_smol::Sha1::from(content).digest().bytes()),
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Md5 => write!(f, "md5"),
            Self::Sha1 => write!(f, "sha1"),
        }
    }
}

/// Checksum of one staged file
#[derive(Debug, Clone)]
pub struct ChecksumRecord {
    pub algorithm: HashKind,
    pub digest: String,
    pub relative_path: PathBuf,
}

impl ChecksumRecord {
    /// Digest the file at `path`, recording it under `relative_path`
    pub fn for_file(
        algorithm: HashKind,
        path: &Path,
        relative_path: &Path,
    ) -> Result<Self, StagingError> {
        let content = std::fs::read(path).map_err(|e| StagingError::Checksum {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Ok(Self {
            algorithm,
            digest: algorithm.digest(&content),
            relative_path: relative_path.to_path_buf(),
        })
    }

    /// md5sums-style line
    pub fn line(&self) -> String {
        format!("{}  {}", self.digest, self.relative_path.display())
    }
}
