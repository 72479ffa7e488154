//! Build command implementation
//!
//! Loads the recipe, runs the whole packaging pipeline and reports the
//! delivered artifact.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::cli::output::{create_spinner, is_json, print_detail, print_success};
use crate::config::recipe::Recipe;
use crate::core::pipeline::Pipeline;

/// Build options
pub struct BuildOptions {
    /// Recipe file path, relative paths resolved against the working
    /// directory
    pub recipe: PathBuf,
    /// Substitute ${VAR} environment references in the recipe
    pub expand_env: bool,
    /// Force artifact signing on, regardless of the recipe
    pub sign: bool,
}

/// Execute the build command
pub fn execute(current_dir: &Path, options: BuildOptions) -> Result<()> {
    let recipe_path = resolve_recipe_path(current_dir, &options.recipe);
    let base_dir = recipe_path
        .parent()
        .unwrap_or(current_dir)
        .to_path_buf();

    let recipe = Recipe::load(&recipe_path, options.expand_env)
        .with_context(|| format!("Failed to load recipe '{}'", recipe_path.display()))?;
    let mut config = recipe.into_pipeline_config(&base_dir)?;
    config.sign = config.sign || options.sign;

    let platform = config.platform.clone();
    let format_name = config.format.name();

    let spinner = create_spinner(&format!("Building {format_name} package for {platform}..."));
    let result = Pipeline::new(config).run();
    spinner.finish_and_clear();
    let report = result?;

    if is_json() {
        let json_result = serde_json::json!({
            "status": "success",
            "platform": platform,
            "format": format_name,
            "artifact": report.delivered.display().to_string(),
            "size_bytes": report.size,
            "files_copied": report.copied,
            "files_skipped": report.skipped,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json_result).unwrap_or_default()
        );
        return Ok(());
    }

    print_success(&format!("Built {}", report.delivered.display()));
    print_detail(&format!("Platform: {platform} ({format_name})"));
    print_detail(&format!(
        "Files staged: {} ({} skipped)",
        report.copied, report.skipped
    ));
    print_detail(&format!("Size: {} bytes", report.size));

    Ok(())
}

pub(crate) fn resolve_recipe_path(current_dir: &Path, recipe: &Path) -> PathBuf {
    if recipe.is_absolute() {
        recipe.to_path_buf()
    } else {
        current_dir.join(recipe)
    }
}
