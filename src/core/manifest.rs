//! File-copy manifest
//!
//! Turns declarative source selections into a single destination-keyed
//! copy map rooted in the payload subtree. Building the map is pure
//! computation; the staging step performs the copies later.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::RecipeError;

/// One declarative pick of files below a source root
///
/// Paths in `files` and `dirs` are relative to `root` and keep that
/// relative shape inside the package payload (identity mapping).
#[derive(Debug, Clone)]
pub struct Selection {
    /// Absolute source root the relative paths hang off
    pub root: PathBuf,
    /// Relative paths of files to copy
    pub files: Vec<PathBuf>,
    /// Relative paths of directories to materialize even when empty
    pub dirs: Vec<PathBuf>,
}

impl Selection {
    /// Selection with an explicit file list
    pub fn with_files(root: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            root: root.into(),
            files,
            dirs: Vec::new(),
        }
    }

    /// Selection of the entire tree below `root`
    ///
    /// Enumerates every file and directory, no pattern matching.
    pub fn scan(root: &Path) -> Result<Self, RecipeError> {
        if !root.is_dir() {
            return Err(RecipeError::SelectionRootNotFound {
                path: root.to_path_buf(),
            });
        }

        let mut files = Vec::new();
        let mut dirs = Vec::new();
        for entry in WalkDir::new(root).min_depth(1) {
            let entry = entry.map_err(|e| RecipeError::SelectionScan {
                path: root.to_path_buf(),
                error: e.to_string(),
            })?;
            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|e| RecipeError::SelectionScan {
                    path: root.to_path_buf(),
                    error: e.to_string(),
                })?
                .to_path_buf();
            if entry.file_type().is_dir() {
                dirs.push(relative);
            } else {
                files.push(relative);
            }
        }

        Ok(Self {
            root: root.to_path_buf(),
            files,
            dirs,
        })
    }
}

/// Planned copies, keyed by absolute destination
///
/// Later selections overwrite earlier ones on a destination collision.
/// Iteration order is sorted by destination, which keeps downstream
/// checksum lists reproducible.
#[derive(Debug, Clone, Default)]
pub struct CopyManifest {
    files: BTreeMap<PathBuf, PathBuf>,
    dirs: BTreeSet<PathBuf>,
}

impl CopyManifest {
    /// Merge selections into one manifest below `payload_root`
    pub fn build(payload_root: &Path, selections: &[Selection]) -> Self {
        let mut files = BTreeMap::new();
        let mut dirs = BTreeSet::new();

        for selection in selections {
            for relative in &selection.files {
                let src = selection.root.join(relative);
                let dest = payload_root.join(relative);
                files.insert(dest, src);
            }
            for relative in &selection.dirs {
                dirs.insert(payload_root.join(relative));
            }
        }

        Self { files, dirs }
    }

    /// Number of distinct file destinations
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dirs.is_empty()
    }

    /// Planned file copies as `(destination, source)` pairs
    pub fn files(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.files.iter().map(|(d, s)| (d.as_path(), s.as_path()))
    }

    /// Destination directories to create
    pub fn dirs(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn dir_count(&self) -> usize {
        self.dirs.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_distinct_files_map_one_to_one() {
        let payload = Path::new("/stage/plat/usr");
        let selections = vec![
            Selection::with_files(
                "/src/a",
                vec![PathBuf::from("bin/tool"), PathBuf::from("share/doc.txt")],
            ),
            Selection::with_files("/src/b", vec![PathBuf::from("share/extra.txt")]),
        ];

        let manifest = CopyManifest::build(payload, &selections);

        assert_eq!(manifest.len(), 3);
        for (dest, _) in manifest.files() {
            assert!(dest.starts_with(payload));
        }
    }

    #[test]
    fn test_later_selection_wins_destination_collisions() {
        let payload = Path::new("/stage/plat/usr");
        let selections = vec![
            Selection::with_files("/src/base", vec![PathBuf::from("etc/app.conf")]),
            Selection::with_files("/src/override", vec![PathBuf::from("etc/app.conf")]),
        ];

        let manifest = CopyManifest::build(payload, &selections);

        assert_eq!(manifest.len(), 1);
        let (_, src) = manifest.files().next().unwrap();
        assert_eq!(src, Path::new("/src/override/etc/app.conf"));
    }

    #[test]
    fn test_duplicate_dirs_collapse() {
        let payload = Path::new("/stage/plat/usr");
        let mut first = Selection::with_files("/src/a", vec![]);
        first.dirs.push(PathBuf::from("share/empty"));
        let mut second = Selection::with_files("/src/b", vec![]);
        second.dirs.push(PathBuf::from("share/empty"));

        let manifest = CopyManifest::build(payload, &[first, second]);

        assert_eq!(manifest.dir_count(), 1);
        assert_eq!(
            manifest.dirs().next(),
            Some(Path::new("/stage/plat/usr/share/empty"))
        );
    }

    #[test]
    fn test_iteration_is_sorted_by_destination() {
        let payload = Path::new("/p");
        let selections = vec![Selection::with_files(
            "/s",
            vec![
                PathBuf::from("zeta"),
                PathBuf::from("alpha"),
                PathBuf::from("midway"),
            ],
        )];

        let manifest = CopyManifest::build(payload, &selections);
        let dests: Vec<_> = manifest.files().map(|(d, _)| d.to_path_buf()).collect();

        let mut sorted = dests.clone();
        sorted.sort();
        assert_eq!(dests, sorted);
    }

    #[test]
    fn test_scan_enumerates_the_whole_tree() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("bin")).unwrap();
        std::fs::create_dir_all(tmp.path().join("share/empty")).unwrap();
        std::fs::write(tmp.path().join("bin/tool"), "x").unwrap();
        std::fs::write(tmp.path().join("readme"), "y").unwrap();

        let selection = Selection::scan(tmp.path()).unwrap();

        let mut files = selection.files.clone();
        files.sort();
        assert_eq!(
            files,
            vec![PathBuf::from("bin/tool"), PathBuf::from("readme")]
        );

        let mut dirs = selection.dirs.clone();
        dirs.sort();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("bin"),
                PathBuf::from("share"),
                PathBuf::from("share/empty")
            ]
        );
    }

    #[test]
    fn test_scan_missing_root_is_a_recipe_error() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("absent");
        let err = Selection::scan(&missing).unwrap_err();
        assert!(err.to_string().contains("Selection root not found"));
    }

    proptest! {
        #[test]
        fn prop_collision_free_selections_keep_every_file(
            names in prop::collection::hash_set("[a-z]{1,8}", 1..20)
        ) {
            let files: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();
            let expected = files.len();
            let manifest = CopyManifest::build(
                Path::new("/stage/plat/usr"),
                &[Selection::with_files("/src", files)],
            );

            prop_assert_eq!(manifest.len(), expected);
            for (dest, _) in manifest.files() {
                prop_assert!(dest.starts_with("/stage/plat/usr"));
            }
        }
    }
}
