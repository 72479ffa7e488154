//! CLI command for `packstage doctor`
//!
//! Checks that the native packaging tools are installed and reports
//! which package formats can be built on this machine.

use std::path::Path;

use anyhow::Result;

use crate::cli::output::{
    is_json, is_quiet, print_detail, print_info, print_success, print_warning, status,
};
use crate::core::doctor::run_doctor;

/// Execute the doctor command
pub fn execute(recipe_path: Option<&Path>) -> Result<()> {
    let report = run_doctor(recipe_path);

    // JSON output mode
    if is_json() {
        let json_result = serde_json::json!({
            "status": if report.all_passed() { "success" } else if report.any_format_ready() { "warning" } else { "error" },
            "deb_ready": report.deb_ready(),
            "rpm_ready": report.rpm_ready(),
            "checks": report.checks.iter().map(|c| serde_json::json!({
                "name": c.name,
                "passed": c.passed,
                "version": c.version,
                "path": c.path,
                "error": c.error,
                "suggestion": c.suggestion
            })).collect::<Vec<_>>(),
            "config_issues": report.config_issues,
            "passed_count": report.passed_count(),
            "total_count": report.checks.len()
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&json_result).unwrap_or_default()
        );

        if !report.any_format_ready() {
            return Err(anyhow::anyhow!("No packaging toolchain available"));
        }
        return Ok(());
    }

    // Quiet mode - only show errors
    if is_quiet() {
        if !report.any_format_ready() {
            for check in report.checks.iter().filter(|c| !c.passed) {
                eprintln!("{} Missing: {}", status::ERROR, check.name);
            }
            return Err(anyhow::anyhow!("No packaging toolchain available"));
        }
        return Ok(());
    }

    // Normal output mode
    print_info("Checking packaging tools...");
    println!();

    for check in &report.checks {
        let version_str = check
            .version
            .as_ref()
            .map(|v| format!(" (v{v})"))
            .unwrap_or_default();

        if check.passed {
            println!("  {} {}{version_str}", status::SUCCESS, check.name);
            if let Some(path) = &check.path {
                print_detail(&format!("at {path}"));
            }
        } else {
            println!("  {} {}", status::ERROR, check.name);
            if let Some(error) = &check.error {
                print_detail(&format!("Error: {error}"));
            }
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("Suggestion: {suggestion}"));
            }
        }
    }

    if !report.config_issues.is_empty() {
        println!();
        print_warning("Recipe issues:");
        for issue in &report.config_issues {
            print_detail(&format!("• {issue}"));
        }
    }

    println!();
    let passed = report.passed_count();
    let total = report.checks.len();

    if report.all_passed() {
        print_success(&format!(
            "All checks passed ({passed}/{total}); .deb and .rpm builds are available"
        ));
    } else if report.any_format_ready() {
        let format = if report.deb_ready() { ".deb" } else { ".rpm" };
        print_warning(&format!(
            "{passed}/{total} checks passed; only {format} builds are available"
        ));
    } else {
        println!("{} {passed}/{total} checks passed", status::ERROR);
        print_detail("No package format can be built; install at least one toolchain:");
        for check in report.checks.iter().filter(|c| !c.passed) {
            if let Some(suggestion) = &check.suggestion {
                print_detail(&format!("• {}: {suggestion}", check.name));
            }
        }
        return Err(anyhow::anyhow!("No packaging toolchain available"));
    }

    Ok(())
}
