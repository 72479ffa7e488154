//! Output formatting and progress indicators
//!
//! This module provides utilities for displaying progress spinners,
//! status messages and the global quiet/json output switches.

use std::sync::OnceLock;

use indicatif::{ProgressBar, ProgressStyle};

/// Process-wide output switches, set once from the parsed CLI flags
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    pub quiet: bool,
    pub json: bool,
    pub verbose: u8,
}

static OUTPUT_CONFIG: OnceLock<OutputConfig> = OnceLock::new();

impl OutputConfig {
    pub fn new(quiet: bool, json: bool, verbose: u8) -> Self {
        Self {
            quiet,
            json,
            verbose,
        }
    }

    /// Install as the process-wide configuration; later calls are ignored
    pub fn apply_global(self) {
        let _ = OUTPUT_CONFIG.set(self);
    }
}

fn global() -> OutputConfig {
    OUTPUT_CONFIG.get().copied().unwrap_or_default()
}

/// Whether --quiet was given
pub fn is_quiet() -> bool {
    global().quiet
}

/// Whether --json was given
pub fn is_json() -> bool {
    global().json
}

/// Print an error and its cause chain to stderr
///
/// Not silenced by --quiet; errors are the one thing quiet mode keeps.
pub fn display_error(error: &anyhow::Error) {
    eprintln!("{} Error: {error}", status::ERROR);
    for cause in error.chain().skip(1) {
        eprintln!("  Caused by: {cause}");
    }
}

pub fn print_success(message: &str) {
    if !is_quiet() {
        println!("{} {message}", status::SUCCESS);
    }
}

pub fn print_info(message: &str) {
    if !is_quiet() {
        println!("{} {message}", status::INFO);
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet() {
        println!("{} {message}", status::WARNING);
    }
}

pub fn print_detail(message: &str) {
    if !is_quiet() {
        println!("  {message}");
    }
}

/// Create a spinner for operations with unknown duration
///
/// Hidden in quiet and json modes so machine-readable output stays clean.
pub fn create_spinner(message: &str) -> ProgressBar {
    if is_quiet() || is_json() {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.blue} {msg}")
            .expect("Invalid spinner template"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb
}

/// Status message prefixes
pub mod status {
    /// Success prefix (green checkmark)
    pub const SUCCESS: &str = "✓";

    /// Error prefix (red X)
    pub const ERROR: &str = "✗";

    /// Warning prefix (yellow triangle)
    pub const WARNING: &str = "⚠";

    /// Info prefix (blue circle)
    pub const INFO: &str = "ℹ";
}
