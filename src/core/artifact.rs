//! Built-artifact verification and delivery

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ArtifactError;
use crate::infra::filesystem;

/// Check that the builder left the expected file behind; returns its size
pub fn verify(path: &Path) -> Result<u64, ArtifactError> {
    let metadata = std::fs::metadata(path).map_err(|_| ArtifactError::Missing {
        path: path.to_path_buf(),
    })?;
    if !metadata.is_file() {
        return Err(ArtifactError::Missing {
            path: path.to_path_buf(),
        });
    }
    Ok(metadata.len())
}

/// Copy the artifact into the destination directory, keeping its file name
///
/// The staged copy stays behind, so a failed delivery can be retried
/// without rebuilding.
pub fn deliver(artifact: &Path, dest_dir: &Path) -> Result<PathBuf, ArtifactError> {
    if !dest_dir.is_dir() {
        return Err(ArtifactError::DestinationNotFound {
            path: dest_dir.to_path_buf(),
        });
    }

    let file_name = artifact.file_name().ok_or_else(|| ArtifactError::Missing {
        path: artifact.to_path_buf(),
    })?;
    let target = dest_dir.join(file_name);

    filesystem::copy_file(artifact, &target).map_err(|e| ArtifactError::Deliver {
        artifact: artifact.to_path_buf(),
        dest: target.clone(),
        error: e.to_string(),
    })?;

    info!("Delivered {}", target.display());
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_verify_reports_size() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("app-1.0-1.deb");
        std::fs::write(&pkg, vec![0u8; 42]).unwrap();

        assert_eq!(verify(&pkg).unwrap(), 42);
    }

    #[test]
    fn test_verify_rejects_missing_artifact() {
        let tmp = TempDir::new().unwrap();
        let err = verify(&tmp.path().join("nope.deb")).unwrap_err();
        assert!(matches!(err, ArtifactError::Missing { .. }));
    }

    #[test]
    fn test_deliver_keeps_file_name() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("app-1.0-1.deb");
        std::fs::write(&pkg, "payload").unwrap();
        let dest = tmp.path().join("out");
        std::fs::create_dir(&dest).unwrap();

        let delivered = deliver(&pkg, &dest).unwrap();

        assert_eq!(delivered, dest.join("app-1.0-1.deb"));
        assert_eq!(std::fs::read_to_string(&delivered).unwrap(), "payload");
        assert!(pkg.is_file(), "staged artifact must stay behind");
    }

    #[test]
    fn test_deliver_requires_existing_destination() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("app-1.0-1.deb");
        std::fs::write(&pkg, "payload").unwrap();

        let err = deliver(&pkg, &tmp.path().join("absent")).unwrap_err();
        assert!(matches!(err, ArtifactError::DestinationNotFound { .. }));
    }

    #[test]
    fn test_failed_delivery_leaves_artifact_in_place() {
        let tmp = TempDir::new().unwrap();
        let pkg = tmp.path().join("app-1.0-1.deb");
        std::fs::write(&pkg, "payload").unwrap();
        let dest = tmp.path().join("out");
        // a directory squatting on the target name makes the copy fail
        std::fs::create_dir_all(dest.join("app-1.0-1.deb")).unwrap();

        let err = deliver(&pkg, &dest).unwrap_err();

        assert!(matches!(err, ArtifactError::Deliver { .. }));
        assert_eq!(std::fs::read_to_string(&pkg).unwrap(), "payload");
    }
}
