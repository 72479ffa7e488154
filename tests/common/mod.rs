//! Common test utilities and helpers
//!
//! This module provides shared utilities for integration tests: a
//! temporary project directory, sample recipes and executable stand-ins
//! for the native packaging tools.

use std::path::PathBuf;
use tempfile::TempDir;

/// Test project context
///
/// Creates a temporary directory for test projects and provides
/// utilities for setting up test scenarios.
pub struct TestProject {
    /// Temporary directory for the test project
    pub dir: TempDir,
}

impl TestProject {
    /// Create a new test project in a temporary directory
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Get the path to the test project directory
    pub fn path(&self) -> PathBuf {
        self.dir.path().to_path_buf()
    }

    /// Create a file in the test project
    pub fn create_file(&self, name: &str, content: &str) {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Create a directory in the test project
    pub fn create_dir(&self, name: &str) {
        let path = self.dir.path().join(name);
        std::fs::create_dir_all(path).expect("Failed to create directory");
    }

    /// Check if a file exists in the test project
    pub fn file_exists(&self, name: &str) -> bool {
        self.dir.path().join(name).exists()
    }

    /// Read a file from the test project
    pub fn read_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join(name)).expect("Failed to read file")
    }
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample Debian recipe for testing
///
/// Stages everything below `payload/` and expects a `licences/proprietary`
/// licence text next to the recipe.
#[allow(dead_code)]
pub const SAMPLE_DEB_RECIPE: &str = r#"
[package]
name = "app"
platform = "trusty"
format = "deb"

[dirs]
temp = "tmp"
dest = "dist"

[metadata]
summary = "Demo application"
version = "1.0"
description = "Stages a demo application payload."
changelog = "* initial release"

[[metadata.authors]]
name = "Jana Dvorakova"
e-mail = "jana@example.org"

[sections]
depends = "nginx"

[[selection]]
root = "payload"
"#;

/// Sample RPM recipe for testing
#[allow(dead_code)]
pub const SAMPLE_RPM_RECIPE: &str = r#"
[package]
name = "app"
platform = "centos"
format = "rpm"

[dirs]
temp = "tmp"
dest = "dist"

[metadata]
summary = "Demo application"
version = "1.0"
description = "Stages a demo application payload."
changelog = "* Mon Aug 24 2026 Jana Dvorakova <jana@example.org> 1.0-1"

[sections]
install = "install -Dp app /opt/app"
files = "/opt/app"

[[selection]]
root = "payload"
"#;

/// Stand-in for fakeroot: answers version probes, otherwise runs its
/// arguments as a command
#[allow(dead_code)]
#[cfg(unix)]
pub const FAKEROOT_STUB: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "fakeroot version 1.31"
    exit 0
fi
exec "$@"
"#;

/// Stand-in for dpkg-deb: checks the control file exists and writes the
/// requested archive path
///
/// The value of PACKSTAGE_STUB_ENV is captured into `stub-env.txt` in the
/// working directory so tests can observe the environment the builder ran
/// with.
#[allow(dead_code)]
#[cfg(unix)]
pub const DPKG_DEB_STUB: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "Debian 'dpkg-deb' package archive backend version 1.21.1"
    exit 0
fi
if [ "$1" != "-b" ]; then
    echo "dpkg-deb: unexpected arguments: $*" >&2
    exit 64
fi
if [ ! -f "$2/DEBIAN/control" ]; then
    echo "dpkg-deb: no control file in $2" >&2
    exit 2
fi
printf '%s' "$PACKSTAGE_STUB_ENV" > stub-env.txt
printf 'deb-archive' > "$3"
"#;

/// Stand-in for dpkg-deb that always fails
#[allow(dead_code)]
#[cfg(unix)]
pub const FAILING_DPKG_DEB_STUB: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "Debian 'dpkg-deb' package archive backend version 1.21.1"
    exit 0
fi
echo "dpkg-deb: internal error" >&2
exit 2
"#;

/// Stand-in for rpmbuild: reads the package coordinates from the spec
/// file and drops a fake archive where rpmbuild would
///
/// The full argument list is captured into `rpmbuild-args.txt` in the
/// working directory.
#[allow(dead_code)]
#[cfg(unix)]
pub const RPMBUILD_STUB: &str = r#"#!/bin/sh
if [ "$1" = "--version" ]; then
    echo "RPM version 4.16.1.3"
    exit 0
fi
printf '%s\n' "$@" > rpmbuild-args.txt
arch=noarch
spec=
for arg in "$@"; do
    case "$arg" in
        --target=*) arch="${arg#--target=}" ;;
        *.spec) spec="$arg" ;;
    esac
done
if [ -z "$spec" ] || [ ! -f "$spec" ]; then
    echo "rpmbuild: spec file not found" >&2
    exit 1
fi
name=$(sed -n 's/^Name: //p' "$spec")
version=$(sed -n 's/^Version: //p' "$spec")
release=$(sed -n 's/^Release: //p' "$spec")
mkdir -p "RPMS/$arch"
printf 'rpm-archive' > "RPMS/$arch/$name-$version-$release.$arch.rpm"
"#;

/// Write one executable stand-in into `bin`
#[allow(dead_code)]
#[cfg(unix)]
pub fn write_stub(bin: &std::path::Path, name: &str, body: &str) {
    use std::os::unix::fs::PermissionsExt;
    std::fs::create_dir_all(bin).expect("Failed to create stub bin directory");
    let path = bin.join(name);
    std::fs::write(&path, body).expect("Failed to write stub tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to mark stub tool executable");
}

/// Install working stand-ins for all three packaging tools
///
/// Returns the directory to put at the front of PATH.
#[allow(dead_code)]
#[cfg(unix)]
pub fn install_stub_tools(project: &TestProject) -> PathBuf {
    let bin = project.path().join("stub-bin");
    write_stub(&bin, "fakeroot", FAKEROOT_STUB);
    write_stub(&bin, "dpkg-deb", DPKG_DEB_STUB);
    write_stub(&bin, "rpmbuild", RPMBUILD_STUB);
    bin
}

/// PATH value that resolves the stand-ins before the real tools
#[allow(dead_code)]
pub fn stub_path_env(bin: &std::path::Path) -> String {
    match std::env::var("PATH") {
        Ok(path) => format!("{}:{}", bin.display(), path),
        Err(_) => bin.display().to_string(),
    }
}
