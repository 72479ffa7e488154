//! Pipeline orchestration
//!
//! Drives one packaging run through its stages: clean, prepare, stage,
//! render, build, verify, deliver. The first failure aborts the run and
//! is reported together with the stage it happened in. Nothing persists
//! between runs; every run starts from a wiped working directory.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Datelike, Utc};
use tracing::debug;

use crate::config::defaults;
use crate::core::artifact;
use crate::core::checksum::HashKind;
use crate::core::format::{PackageFormat, PackageIdent};
use crate::core::invoker::Invoker;
use crate::core::manifest::{CopyManifest, Selection};
use crate::core::metadata::MetadataStore;
use crate::core::sections::SectionRegistry;
use crate::core::staging::{CopyOutcome, StagingArea, StagingLock};
use crate::core::template::{self, Substitutions};
use crate::error::{PackstageError, PipelineError, RecipeError, StagingError};
use crate::infra::filesystem;

/// Pipeline stages, in execution order
///
/// The lock is taken before the first stage; lock failures are reported
/// against [`Stage::Clean`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Clean,
    Prepare,
    Stage,
    Render,
    Build,
    Verify,
    Deliver,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Clean => "cleanup",
            Stage::Prepare => "preparation",
            Stage::Stage => "staging",
            Stage::Render => "rendering",
            Stage::Build => "build",
            Stage::Verify => "verification",
            Stage::Deliver => "delivery",
        };
        f.write_str(name)
    }
}

/// Everything one packaging run needs, already validated
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub name: String,
    pub platform: String,
    pub format: PackageFormat,
    pub temp_dir: PathBuf,
    pub dest_dir: PathBuf,
    pub licence_dir: PathBuf,
    pub hash: HashKind,
    pub sign: bool,
    pub timeout: Option<Duration>,
    pub env: Vec<(String, String)>,
    pub metadata: MetadataStore,
    pub sections: SectionRegistry,
    pub selections: Vec<Selection>,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub format: PackageFormat,
    /// Artifact where the builder left it, inside the staging area
    pub artifact: PathBuf,
    /// Delivered copy in the destination directory
    pub delivered: PathBuf,
    pub size: u64,
    pub copied: usize,
    pub skipped: usize,
}

pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage in order, stopping at the first failure
    pub fn run(&self) -> Result<BuildReport, PipelineError> {
        let cfg = &self.config;
        let area = StagingArea::new(&cfg.temp_dir, &cfg.platform, cfg.format);

        let _lock = match StagingLock::try_acquire(&area) {
            Ok(Some(lock)) => lock,
            Ok(None) => {
                return Err(PipelineError::new(
                    Stage::Clean,
                    RecipeError::StagingLocked {
                        platform: cfg.platform.clone(),
                        path: area.lock_path(),
                    },
                ));
            }
            Err(error) => return Err(PipelineError::new(Stage::Clean, error)),
        };

        area.clean()
            .map_err(|e| PipelineError::new(Stage::Clean, e))?;
        area.prepare()
            .map_err(|e| PipelineError::new(Stage::Prepare, e))?;

        let manifest = CopyManifest::build(&area.payload_root(), &cfg.selections);
        debug!(
            "{} files and {} directories selected for {}",
            manifest.len(),
            manifest.dir_count(),
            cfg.platform
        );

        let outcome = area
            .copy_all(&manifest, cfg.hash)
            .map_err(|e| PipelineError::new(Stage::Stage, e))?;
        if !outcome.errors.is_empty() {
            return Err(PipelineError::new(
                Stage::Stage,
                StagingError::CopyFailed {
                    errors: outcome.errors,
                },
            ));
        }

        let substitutions = self.substitutions();
        self.render_control_files(&area, &outcome, &substitutions)
            .map_err(|e| PipelineError::new(Stage::Render, e))?;

        let version = cfg.metadata.text_or("Version", defaults::DEFAULT_VERSION);
        let release = cfg.metadata.text_or("Release", defaults::DEFAULT_RELEASE);
        let arch = cfg.metadata.text_or("BuildArch", cfg.format.default_arch());
        let ident = PackageIdent {
            name: &cfg.name,
            version,
            release,
            arch,
        };

        let command = cfg
            .format
            .build_command(&cfg.temp_dir, &cfg.platform, ident, cfg.sign);
        let invoker = Invoker::new()
            .envs(cfg.env.iter().cloned())
            .timeout(cfg.timeout);
        let result = invoker
            .run(&command)
            .map_err(|e| PipelineError::new(Stage::Build, e))?;
        if !result.stdout.trim().is_empty() {
            debug!("Builder output:\n{}", result.stdout.trim_end());
        }

        let artifact_path = cfg
            .format
            .artifact_path(&cfg.temp_dir, &cfg.platform, ident);
        let size = artifact::verify(&artifact_path)
            .map_err(|e| PipelineError::new(Stage::Verify, e))?;

        let delivered = artifact::deliver(&artifact_path, &cfg.dest_dir)
            .map_err(|e| PipelineError::new(Stage::Deliver, e))?;

        Ok(BuildReport {
            format: cfg.format,
            artifact: artifact_path,
            delivered,
            size,
            copied: outcome.copied,
            skipped: outcome.skipped,
        })
    }

    /// Token values shared by every rendered file
    ///
    /// Metadata properties win over defaults; absent optional properties
    /// render as empty strings.
    fn substitutions(&self) -> Substitutions {
        let cfg = &self.config;
        let metadata = &cfg.metadata;
        let mut subs = Substitutions::new();

        subs.set("Name", cfg.name.as_str())
            .set("Year", Utc::now().year().to_string())
            .set(
                "License",
                metadata.text_or("License", defaults::DEFAULT_LICENCE),
            )
            .set("Summary", metadata.text_or("Summary", ""))
            .set(
                "Version",
                metadata.text_or("Version", defaults::DEFAULT_VERSION),
            )
            .set(
                "Release",
                metadata.text_or("Release", defaults::DEFAULT_RELEASE),
            )
            .set("Group", metadata.text_or("Group", defaults::DEFAULT_GROUP))
            .set(
                "Priority",
                metadata.text_or("Priority", defaults::DEFAULT_PRIORITY),
            )
            .set(
                "BuildArch",
                metadata.text_or("BuildArch", cfg.format.default_arch()),
            )
            .set("Description", metadata.text_or("Description", ""))
            .set("Changelog", metadata.text_or("Changelog", ""))
            .set("Author", metadata.author().unwrap_or_default())
            .set("Maintainer", metadata.maintainer().unwrap_or_default())
            .set("Homepage", metadata.text_or("Homepage", ""));

        // Depends expands to a whole control line so an absent section
        // leaves no blank line behind.
        let depends = match cfg.sections.get("Depends") {
            Some(value) => format!("Depends: {value}\n"),
            None => String::new(),
        };
        subs.set("Depends", depends);

        for name in cfg.format.section_tokens() {
            subs.set(*name, cfg.sections.resolve(name, cfg.format));
        }

        subs
    }

    fn render_control_files(
        &self,
        area: &StagingArea,
        outcome: &CopyOutcome,
        substitutions: &Substitutions,
    ) -> Result<(), PackstageError> {
        let cfg = &self.config;
        let control_dir = area.control_dir();

        match cfg.format {
            PackageFormat::Deb => {
                let control = template::render(cfg.format.control_template(), substitutions);
                filesystem::write_file(&control_dir.join("control"), &control)?;

                let changelog = cfg.metadata.text_or("Changelog", "");
                filesystem::write_file(&control_dir.join("changelog"), changelog)?;

                let copyright = self.render_copyright(substitutions)?;
                filesystem::write_file(&control_dir.join("copyright"), &copyright)?;

                let mut md5sums = outcome
                    .checksums
                    .iter()
                    .map(|record| record.line())
                    .collect::<Vec<_>>()
                    .join("\n");
                if !md5sums.is_empty() {
                    md5sums.push('\n');
                }
                filesystem::write_file(&control_dir.join("md5sums"), &md5sums)?;
            }
            PackageFormat::Rpm => {
                let spec = template::render(cfg.format.control_template(), substitutions);
                let spec_file = control_dir.join(format!("{}.spec", cfg.name));
                filesystem::write_file(&spec_file, &spec)?;
            }
        }

        Ok(())
    }

    /// Licence text for `DEBIAN/copyright`, resolved from the licence
    /// directory by name
    fn render_copyright(&self, substitutions: &Substitutions) -> Result<String, PackstageError> {
        let cfg = &self.config;
        let licence = cfg.metadata.text_or("License", defaults::DEFAULT_LICENCE);
        let path = cfg.licence_dir.join(licence);
        if !path.is_file() {
            return Err(RecipeError::UnknownLicence {
                name: licence.to_string(),
                path,
            }
            .into());
        }
        let text = filesystem::read_file(&path)?;
        Ok(template::render(&text, substitutions))
    }
}
