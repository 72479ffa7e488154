//! Recipe (packstage.toml) parsing and validation
//!
//! The recipe is the single configuration file for a packaging run.
//! Supports opt-in environment variable substitution using ${VAR} syntax.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use regex::Regex;
use serde::Deserialize;

use crate::config::defaults;
use crate::core::checksum::HashKind;
use crate::core::format::PackageFormat;
use crate::core::manifest::Selection;
use crate::core::metadata::{MetadataEntry, MetadataStore};
use crate::core::pipeline::PipelineConfig;
use crate::core::sections::SectionRegistry;
use crate::core::staging::StagingArea;
use crate::error::RecipeError;

/// The recipe file as written (packstage.toml)
#[derive(Debug, Clone, Deserialize)]
pub struct Recipe {
    /// Package identity
    pub package: PackageConfig,

    /// Directory layout
    #[serde(default)]
    pub dirs: DirsConfig,

    /// Build switches
    #[serde(default)]
    pub build: BuildConfig,

    /// Free-form package properties; nested arrays of tables form groups
    #[serde(default)]
    pub metadata: toml::Table,

    /// Named raw text blocks for control-file sections
    #[serde(default)]
    pub sections: BTreeMap<String, String>,

    /// Source selections, in order
    #[serde(default, rename = "selection")]
    pub selections: Vec<SelectionConfig>,
}

/// `[package]` table
#[derive(Debug, Clone, Deserialize)]
pub struct PackageConfig {
    /// Package name, also the artifact base name
    pub name: String,

    /// Target platform label, names the staging subdirectory
    pub platform: String,

    /// "deb" or "rpm"
    pub format: String,
}

/// `[dirs]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DirsConfig {
    /// Staging parent directory
    pub temp: Option<PathBuf>,

    /// Delivery directory for finished artifacts
    pub dest: Option<PathBuf>,

    /// Licence text directory, defaults to `licences/` beside the recipe
    pub licences: Option<PathBuf>,
}

/// `[build]` table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfig {
    /// Checksum algorithm, "md5" (default) or "sha1"
    #[serde(default)]
    pub hash: Option<String>,

    /// Pass --sign to rpmbuild
    #[serde(default)]
    pub sign: bool,

    /// Kill the build tool after this many seconds
    #[serde(default, rename = "timeout-secs")]
    pub timeout_secs: Option<u64>,

    /// Extra environment for the build tool
    #[serde(default)]
    pub env: BTreeMap<String, String>,
}

/// One `[[selection]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    /// Source root, resolved against the recipe directory when relative
    pub root: PathBuf,

    /// Relative file paths; omitted means the whole tree below `root`
    #[serde(default)]
    pub files: Option<Vec<PathBuf>>,

    /// Extra relative directories to materialize even when empty
    #[serde(default)]
    pub dirs: Vec<PathBuf>,
}

impl Recipe {
    /// Load a recipe from a file path
    pub fn load(path: &Path, expand_env: bool) -> Result<Self, RecipeError> {
        if !path.is_file() {
            return Err(RecipeError::NotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path).map_err(|e| RecipeError::Unreadable {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;
        Self::from_toml(&content, expand_env)
    }

    /// Load a recipe from a TOML string
    pub fn from_toml(content: &str, expand_env: bool) -> Result<Self, RecipeError> {
        if expand_env {
            let mut value: toml::Value =
                toml::from_str(content).map_err(|e| RecipeError::Parse { source: e })?;
            expand_env_in_value(&mut value);
            value
                .try_into()
                .map_err(|e| RecipeError::Parse { source: e })
        } else {
            toml::from_str(content).map_err(|e| RecipeError::Parse { source: e })
        }
    }

    /// Validate the recipe and resolve it into a runnable pipeline
    /// configuration
    ///
    /// `base_dir` anchors every relative path in the recipe, normally the
    /// directory the recipe file sits in. Selections with no `files` list
    /// are scanned here, so a missing source root fails the load rather
    /// than the run.
    pub fn into_pipeline_config(self, base_dir: &Path) -> Result<PipelineConfig, RecipeError> {
        let format = PackageFormat::parse(&self.package.format)?;
        let hash = match self.build.hash.as_deref() {
            Some(name) => HashKind::parse(name)?,
            None => HashKind::default(),
        };

        let temp_dir = self
            .dirs
            .temp
            .as_deref()
            .map(|dir| resolve(base_dir, dir))
            .ok_or_else(|| RecipeError::MissingField {
                field: "dirs.temp".to_string(),
            })?;
        let dest_dir = self
            .dirs
            .dest
            .as_deref()
            .map(|dir| resolve(base_dir, dir))
            .ok_or_else(|| RecipeError::MissingField {
                field: "dirs.dest".to_string(),
            })?;
        let licence_dir = self
            .dirs
            .licences
            .as_deref()
            .map(|dir| resolve(base_dir, dir))
            .unwrap_or_else(|| base_dir.join(defaults::LICENCE_DIR));

        let mut sections = SectionRegistry::new();
        for (name, text) in &self.sections {
            sections.add(name.clone(), text);
        }

        let mut selections = Vec::with_capacity(self.selections.len());
        for entry in &self.selections {
            let root = resolve(base_dir, &entry.root);
            let mut selection = match &entry.files {
                Some(files) => Selection::with_files(root, files.clone()),
                None => Selection::scan(&root)?,
            };
            selection.dirs.extend(entry.dirs.iter().cloned());
            selections.push(selection);
        }

        Ok(PipelineConfig {
            name: self.package.name,
            platform: self.package.platform,
            format,
            temp_dir,
            dest_dir,
            licence_dir,
            hash,
            sign: self.build.sign,
            timeout: self.build.timeout_secs.map(Duration::from_secs),
            env: self.build.env.into_iter().collect(),
            metadata: metadata_store(&self.metadata),
            sections,
            selections,
        })
    }

    /// Staging area for this recipe, without resolving selections
    ///
    /// Enough for cleanup, which must work even when a source root has
    /// since disappeared.
    pub fn staging_area(&self, base_dir: &Path) -> Result<StagingArea, RecipeError> {
        let format = PackageFormat::parse(&self.package.format)?;
        let temp_dir = self
            .dirs
            .temp
            .as_deref()
            .map(|dir| resolve(base_dir, dir))
            .ok_or_else(|| RecipeError::MissingField {
                field: "dirs.temp".to_string(),
            })?;
        Ok(StagingArea::new(
            temp_dir,
            self.package.platform.clone(),
            format,
        ))
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Build the metadata store from the `[metadata]` table
///
/// Scalar values become properties. Arrays of tables become groups whose
/// entries are named by their `name` key, with every other key attached
/// as a child property (this is how `[[metadata.authors]]` carries
/// per-author e-mail addresses).
fn metadata_store(table: &toml::Table) -> MetadataStore {
    let mut store = MetadataStore::new();
    for (key, value) in table {
        match value {
            toml::Value::Array(items) => {
                let children = items
                    .iter()
                    .filter_map(toml::Value::as_table)
                    .map(group_member)
                    .collect();
                store.push(MetadataEntry::group(key.clone(), children));
            }
            other => {
                store.push(MetadataEntry::scalar(key.clone(), scalar_text(other)));
            }
        }
    }
    store
}

fn group_member(member: &toml::Table) -> MetadataEntry {
    let name = member
        .get("name")
        .and_then(toml::Value::as_str)
        .unwrap_or_default();
    let children = member
        .iter()
        .filter(|(key, _)| key.as_str() != "name")
        .map(|(key, value)| MetadataEntry::scalar(key.clone(), scalar_text(value)))
        .collect();
    MetadataEntry::group(name, children)
}

fn scalar_text(value: &toml::Value) -> String {
    match value {
        toml::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Substitute environment variables in a string using ${VAR} syntax
///
/// Unset variables expand to the empty string.
fn expand_env(input: &str) -> String {
    let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap();

    let mut last_end = 0;
    let mut output = String::new();
    for cap in re.captures_iter(input) {
        let full_match = match cap.get(0) {
            Some(m) => m,
            None => continue,
        };
        output.push_str(&input[last_end..full_match.start()]);
        let value = std::env::var(&cap[1]).unwrap_or_default();
        output.push_str(&value);
        last_end = full_match.end();
    }
    output.push_str(&input[last_end..]);
    output
}

/// Recursively substitute environment variables in every string value
fn expand_env_in_value(value: &mut toml::Value) {
    match value {
        toml::Value::String(s) => *s = expand_env(s),
        toml::Value::Array(items) => {
            for item in items.iter_mut() {
                expand_env_in_value(item);
            }
        }
        toml::Value::Table(table) => {
            for (_, v) in table.iter_mut() {
                expand_env_in_value(v);
            }
        }
        _ => {}
    }
}
