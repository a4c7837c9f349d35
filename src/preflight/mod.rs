//! Preflight checks before driving external builds.
//!
//! Validates that the host can run the build BEFORE the first library is
//! built, so a missing tool fails fast instead of after a partial build.
//!
//! # Usage
//!
//! ```rust,ignore
//! use otlibs::preflight::run_all;
//!
//! let report = run_all(otlibs::build::MAKE);
//! if !report.is_ok() {
//!     report.print_summary();
//!     std::process::exit(1);
//! }
//! ```

mod host_tools;

pub use host_tools::{check_host_tools, has_tool};

/// Result of a single preflight check.
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Whether the check passed
    pub passed: bool,
    /// Human-readable message
    pub message: String,
    /// Optional suggestion for fixing the issue
    pub suggestion: Option<String>,
}

impl CheckResult {
    /// Create a passing check result.
    pub fn pass(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed: true,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Create a failing check result.
    pub fn fail(
        name: impl Into<String>,
        message: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            passed: false,
            message: message.into(),
            suggestion: Some(suggestion.into()),
        }
    }
}

/// All preflight results.
#[derive(Debug, Default)]
pub struct PreflightReport {
    pub checks: Vec<CheckResult>,
}

impl PreflightReport {
    /// Check if all preflight checks passed.
    pub fn is_ok(&self) -> bool {
        self.checks.iter().all(|c| c.passed)
    }

    /// Get all failing checks.
    pub fn errors(&self) -> Vec<&CheckResult> {
        self.checks.iter().filter(|c| !c.passed).collect()
    }

    /// One line per failing check, with its suggestion.
    pub fn error_summary(&self) -> String {
        self.errors()
            .iter()
            .map(|c| match &c.suggestion {
                Some(s) => format!("{}: {} (try: {})", c.name, c.message, s),
                None => format!("{}: {}", c.name, c.message),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Print a summary of the preflight checks.
    pub fn print_summary(&self) {
        println!("=== Preflight Check Results ===\n");

        for check in &self.checks {
            let status = if check.passed { "[OK]" } else { "[FAIL]" };
            println!("{} {}: {}", status, check.name, check.message);
            if let Some(suggestion) = &check.suggestion {
                println!("     Suggestion: {}", suggestion);
            }
        }
    }
}

/// Run every preflight check.
pub fn run_all(program: &str) -> PreflightReport {
    PreflightReport {
        checks: check_host_tools(program),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_pass() {
        let result = CheckResult::pass("test", "passed");
        assert!(result.passed);
        assert!(result.suggestion.is_none());
    }

    #[test]
    fn test_check_result_fail() {
        let result = CheckResult::fail("test", "failed", "fix it");
        assert!(!result.passed);
        assert!(result.suggestion.is_some());
    }

    #[test]
    fn test_preflight_report_is_ok() {
        let mut report = PreflightReport::default();
        assert!(report.is_ok()); // Empty is OK

        report.checks.push(CheckResult::pass("test1", "ok"));
        assert!(report.is_ok());

        report.checks.push(CheckResult::fail("test2", "bad", "fix"));
        assert!(!report.is_ok());
        assert_eq!(report.error_summary(), "test2: bad (try: fix)");
    }
}
