//! Package format parameterization
//!
//! Everything that differs between the Debian and RPM paths lives here:
//! staging layout, directory modes, build command construction, artifact
//! naming and the bundled control-file templates. The pipeline itself is
//! format-agnostic and asks this module for the specifics.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::config::defaults;
use crate::error::RecipeError;
use crate::infra::process;

/// Target native package format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageFormat {
    Deb,
    Rpm,
}

/// Name/version coordinates that parameterize paths and commands
#[derive(Debug, Clone, Copy)]
pub struct PackageIdent<'a> {
    pub name: &'a str,
    pub version: &'a str,
    pub release: &'a str,
    pub arch: &'a str,
}

/// Fully resolved builder invocation
#[derive(Debug, Clone)]
pub struct BuildCommand {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl BuildCommand {
    /// Human-readable command line
    pub fn display(&self) -> String {
        process::display_command(&self.program, &self.args)
    }
}

impl PackageFormat {
    /// Parse a recipe format name
    pub fn parse(name: &str) -> Result<Self, RecipeError> {
        match name.to_ascii_lowercase().as_str() {
            "deb" => Ok(Self::Deb),
            "rpm" => Ok(Self::Rpm),
            _ => Err(RecipeError::UnknownFormat {
                name: name.to_string(),
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Deb => "deb",
            Self::Rpm => "rpm",
        }
    }

    /// Permission bits for the staging root
    pub fn workdir_mode(self) -> u32 {
        match self {
            Self::Deb => defaults::DEB_DIR_MODE,
            Self::Rpm => defaults::RPM_DIR_MODE,
        }
    }

    /// Control subdirectories to create below the staging root
    pub fn control_subdirs(self) -> &'static [(&'static str, u32)] {
        match self {
            Self::Deb => &[("DEBIAN", defaults::DEB_DIR_MODE)],
            Self::Rpm => &[
                ("SOURCES", defaults::RPM_DIR_MODE),
                ("SPECS", defaults::DEB_DIR_MODE),
                ("RPMS", defaults::DEB_DIR_MODE),
                ("BUILDROOT", defaults::DEB_DIR_MODE),
                ("SRPMS", defaults::DEB_DIR_MODE),
            ],
        }
    }

    /// Payload subtree name below the staging root
    pub fn payload_dir(self) -> &'static str {
        match self {
            Self::Deb => "usr",
            Self::Rpm => "SOURCES",
        }
    }

    /// Architecture used when the metadata does not name one
    pub fn default_arch(self) -> &'static str {
        match self {
            Self::Deb => defaults::DEB_DEFAULT_ARCH,
            Self::Rpm => defaults::RPM_DEFAULT_ARCH,
        }
    }

    /// File name of the finished package
    pub fn artifact_file_name(self, ident: PackageIdent<'_>) -> String {
        match self {
            Self::Deb => format!("{}-{}-{}.deb", ident.name, ident.version, ident.release),
            Self::Rpm => format!(
                "{}-{}-{}.{}.rpm",
                ident.name, ident.version, ident.release, ident.arch
            ),
        }
    }

    /// Where the native tool leaves the finished package
    ///
    /// Debian writes next to the staging root; rpmbuild sorts by
    /// architecture below `RPMS/`.
    pub fn artifact_path(
        self,
        temp_dir: &Path,
        platform: &str,
        ident: PackageIdent<'_>,
    ) -> PathBuf {
        let file_name = self.artifact_file_name(ident);
        match self {
            Self::Deb => temp_dir.join(file_name),
            Self::Rpm => temp_dir
                .join(platform)
                .join("RPMS")
                .join(ident.arch)
                .join(file_name),
        }
    }

    /// The native tool invocation for this format
    pub fn build_command(
        self,
        temp_dir: &Path,
        platform: &str,
        ident: PackageIdent<'_>,
        sign: bool,
    ) -> BuildCommand {
        let workdir = temp_dir.join(platform);
        match self {
            Self::Deb => BuildCommand {
                program: "fakeroot".to_string(),
                args: vec![
                    "dpkg-deb".to_string(),
                    "-b".to_string(),
                    platform.to_string(),
                    self.artifact_path(temp_dir, platform, ident)
                        .display()
                        .to_string(),
                ],
                cwd: temp_dir.to_path_buf(),
            },
            Self::Rpm => {
                let mut args = vec![format!("--target={}", ident.arch)];
                args.push("--define".to_string());
                args.push(format!("_topdir {}", workdir.display()));
                for (macro_name, subdir) in [
                    ("_builddir", "BUILDROOT"),
                    ("_rpmdir", "RPMS"),
                    ("_srcrpmdir", "SRPMS"),
                    ("_specdir", "SPECS"),
                    ("_sourcedir", "SOURCES"),
                ] {
                    args.push("--define".to_string());
                    args.push(format!("{} %{{_topdir}}/{}", macro_name, subdir));
                }
                if sign {
                    args.push("--sign".to_string());
                }
                args.push("-ba".to_string());
                args.push(
                    workdir
                        .join("SPECS")
                        .join(format!("{}.spec", ident.name))
                        .display()
                        .to_string(),
                );
                BuildCommand {
                    program: "rpmbuild".to_string(),
                    args,
                    cwd: workdir,
                }
            }
        }
    }

    /// Bundled control-file template
    pub fn control_template(self) -> &'static str {
        match self {
            Self::Deb => include_str!("../templates/debian-control.tmpl"),
            Self::Rpm => include_str!("../templates/rpm-spec.tmpl"),
        }
    }

    /// Section placeholders the RPM spec template references
    pub fn section_tokens(self) -> &'static [&'static str] {
        match self {
            Self::Deb => &[],
            Self::Rpm => &["Sources", "Preparing", "Build", "Install", "Clean", "Files"],
        }
    }
}

impl fmt::Display for PackageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
