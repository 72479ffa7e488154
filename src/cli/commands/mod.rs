//! CLI command implementations
//!
//! Each command is implemented in its own submodule.

pub mod build;
pub mod clean;
pub mod doctor;

use std::path::PathBuf;

use anyhow::Result;
use clap::Subcommand;

use crate::config::defaults;

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stage, build and deliver the package described by the recipe
    Build {
        /// Recipe file
        #[arg(short, long, value_name = "FILE", default_value = defaults::RECIPE_FILE)]
        recipe: PathBuf,

        /// Substitute ${VAR} environment references in the recipe
        #[arg(long)]
        expand_env: bool,

        /// Sign the artifact even when the recipe does not ask for it
        #[arg(long)]
        sign: bool,
    },

    /// Remove the staging directory of a previous run
    Clean {
        /// Recipe file
        #[arg(short, long, value_name = "FILE", default_value = defaults::RECIPE_FILE)]
        recipe: PathBuf,

        /// Substitute ${VAR} environment references in the recipe
        #[arg(long)]
        expand_env: bool,
    },

    /// Check that the native packaging tools are installed
    Doctor,
}

impl Commands {
    /// Execute the command
    pub fn run(self) -> Result<()> {
        match self {
            Self::Build {
                recipe,
                expand_env,
                sign,
            } => {
                let current_dir = std::env::current_dir()?;
                let options = build::BuildOptions {
                    recipe,
                    expand_env,
                    sign,
                };
                build::execute(&current_dir, options)
            }
            Self::Clean { recipe, expand_env } => {
                let current_dir = std::env::current_dir()?;
                clean::execute(&current_dir, &recipe, expand_env)
            }
            Self::Doctor => {
                let recipe_path = std::env::current_dir()
                    .ok()
                    .map(|dir| dir.join(defaults::RECIPE_FILE));
                doctor::execute(recipe_path.as_deref())
            }
        }
    }
}
