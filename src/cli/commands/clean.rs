//! CLI implementation for `packstage clean`
//!
//! Removes the staging directory a previous run left behind. The
//! delivered artifacts in the destination directory are not touched.

use std::path::Path;

use anyhow::{Context, Result};

use crate::cli::output::print_success;
use crate::config::recipe::Recipe;

use super::build::resolve_recipe_path;

/// Execute the clean command
pub fn execute(current_dir: &Path, recipe: &Path, expand_env: bool) -> Result<()> {
    let recipe_path = resolve_recipe_path(current_dir, recipe);
    let base_dir = recipe_path.parent().unwrap_or(current_dir);

    let recipe = Recipe::load(&recipe_path, expand_env)
        .with_context(|| format!("Failed to load recipe '{}'", recipe_path.display()))?;
    let area = recipe.staging_area(base_dir)?;

    if !area.workdir().exists() {
        print_success("Nothing to clean");
        return Ok(());
    }

    area.clean()
        .with_context(|| "Failed to remove staging directory")?;
    print_success(&format!("Removed {}", area.workdir().display()));

    Ok(())
}
