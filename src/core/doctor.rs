//! Doctor command logic
//!
//! Checks that the native packaging tools are installed and that the
//! recipe, when one is present, resolves to a runnable configuration.

use std::path::Path;

use crate::config::recipe::Recipe;

/// Result of a single tool check
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the tool being checked
    pub name: String,
    /// Whether the tool was found
    pub passed: bool,
    /// Version if it could be determined
    pub version: Option<String>,
    /// Resolved binary path
    pub path: Option<String>,
    /// Error message if the check failed
    pub error: Option<String>,
    /// Suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl CheckResult {
    /// Create a passing check result
    pub fn pass(name: &str, version: Option<String>, path: String) -> Self {
        Self {
            name: name.to_string(),
            passed: true,
            version,
            path: Some(path),
            error: None,
            suggestion: None,
        }
    }

    /// Create a failing check result
    pub fn fail(name: &str, error: &str, suggestion: &str) -> Self {
        Self {
            name: name.to_string(),
            passed: false,
            version: None,
            path: None,
            error: Some(error.to_string()),
            suggestion: Some(suggestion.to_string()),
        }
    }
}

/// Overall doctor report
///
/// Tool availability is judged per package format; a machine that only
/// builds RPMs does not need the Debian toolchain.
#[derive(Debug, Default)]
pub struct DoctorReport {
    /// Individual tool checks
    pub checks: Vec<CheckResult>,
    /// Recipe problems found in the working directory
    pub config_issues: Vec<String>,
}

impl DoctorReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_check(&mut self, result: CheckResult) {
        self.checks.push(result);
    }

    pub fn add_config_issue(&mut self, issue: String) {
        self.config_issues.push(issue);
    }

    fn tool_passed(&self, name: &str) -> bool {
        self.checks.iter().any(|c| c.name == name && c.passed)
    }

    /// Whether .deb packages can be built here
    pub fn deb_ready(&self) -> bool {
        self.tool_passed("fakeroot") && self.tool_passed("dpkg-deb")
    }

    /// Whether .rpm packages can be built here
    pub fn rpm_ready(&self) -> bool {
        self.tool_passed("rpmbuild")
    }

    /// Whether at least one package format is fully available
    pub fn any_format_ready(&self) -> bool {
        self.deb_ready() || self.rpm_ready()
    }

    /// Check if every tool was found and the recipe is clean
    pub fn all_passed(&self) -> bool {
        self.checks.iter().all(|c| c.passed) && self.config_issues.is_empty()
    }

    /// Count passed checks
    pub fn passed_count(&self) -> usize {
        self.checks.iter().filter(|c| c.passed).count()
    }
}

/// Locate a tool on PATH and probe its version
fn check_tool(name: &str, suggestion: &str) -> CheckResult {
    match which::which(name) {
        Ok(path) => CheckResult::pass(name, probe_version(name), path.display().to_string()),
        Err(_) => CheckResult::fail(name, &format!("'{name}' not found in PATH"), suggestion),
    }
}

/// Run `<tool> --version` and pull a version number out of the output
fn probe_version(name: &str) -> Option<String> {
    std::process::Command::new(name)
        .arg("--version")
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                let stdout = String::from_utf8_lossy(&output.stdout);
                let stderr = String::from_utf8_lossy(&output.stderr);
                extract_version(&format!("{stdout}{stderr}"))
            } else {
                None
            }
        })
}

/// Extract a dotted version number from tool output
///
/// Handles two-part (fakeroot 1.31) through four-part (rpm 4.16.1.3)
/// version strings.
fn extract_version(output: &str) -> Option<String> {
    let version_regex = regex::Regex::new(r"(\d+(?:\.\d+)+)").ok()?;
    version_regex
        .captures(output)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Validate the recipe file, reporting every resolution problem
pub fn check_recipe(path: &Path) -> Vec<String> {
    let mut issues = Vec::new();
    if !path.is_file() {
        return issues;
    }

    match Recipe::load(path, false) {
        Ok(recipe) => {
            let base_dir = path.parent().unwrap_or(Path::new("."));
            if let Err(e) = recipe.into_pipeline_config(base_dir) {
                issues.push(e.to_string());
            }
        }
        Err(e) => issues.push(e.to_string()),
    }

    issues
}

/// Run all doctor checks
pub fn run_doctor(recipe_path: Option<&Path>) -> DoctorReport {
    let mut report = DoctorReport::new();

    report.add_check(check_tool(
        "fakeroot",
        "Install fakeroot (e.g. apt install fakeroot); needed for .deb builds",
    ));
    report.add_check(check_tool(
        "dpkg-deb",
        "Install dpkg (e.g. apt install dpkg); needed for .deb builds",
    ));
    report.add_check(check_tool(
        "rpmbuild",
        "Install rpm-build (e.g. yum install rpm-build or apt install rpm); needed for .rpm builds",
    ));

    if let Some(path) = recipe_path {
        for issue in check_recipe(path) {
            report.add_config_issue(issue);
        }
    }

    report
}
