//! Host tool validation for library builds.
//!
//! Checks that the external build program is installed. Tools are looked up
//! on `PATH`, never executed.

use std::path::PathBuf;

use super::CheckResult;

/// Install hint for a build program.
fn install_hint(tool: &str) -> String {
    match tool {
        "make" => "sudo apt install make (or: sudo dnf install make)".to_string(),
        other => format!("install {} and make sure it is on PATH", other),
    }
}

/// Check that the build program is installed.
pub fn check_host_tools(program: &str) -> Vec<CheckResult> {
    vec![check_tool(program, "Build libraries", which::which(program).ok())]
}

fn check_tool(tool: &str, purpose: &str, found: Option<PathBuf>) -> CheckResult {
    match found {
        Some(path) => CheckResult::pass(
            format!("{} tool", tool),
            format!("Found at {} ({})", path.display(), purpose),
        ),
        None => CheckResult::fail(
            format!("{} tool", tool),
            format!("Not found (needed for: {})", purpose),
            install_hint(tool),
        ),
    }
}

/// Check if a specific tool is on `PATH`.
pub fn has_tool(tool: &str) -> bool {
    which::which(tool).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[cfg(unix)]
    fn install_script(dir: &std::path::Path, name: &str, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    #[cfg(unix)]
    fn test_found_tool_is_not_executed() {
        let bin = tempdir().unwrap();
        let marker = bin.path().join("ran");
        let script = install_script(
            bin.path(),
            "fake-make",
            &format!("touch {}\nexit 3", marker.display()),
        );

        let found = which::which_in("fake-make", Some(bin.path()), bin.path()).ok();
        assert_eq!(found.as_deref(), Some(script.as_path()));

        let result = check_tool("fake-make", "Build libraries", found);
        assert!(result.passed);
        assert!(result.message.starts_with("Found at "));
        assert!(result.message.contains(&script.display().to_string()));
        assert!(!marker.exists());
    }

    #[test]
    #[cfg(unix)]
    fn test_non_executable_file_is_not_a_tool() {
        let bin = tempdir().unwrap();
        fs::write(bin.path().join("fake-make"), "").unwrap();

        assert!(which::which_in("fake-make", Some(bin.path()), bin.path()).is_err());
    }

    #[test]
    fn test_has_tool_nonexistent() {
        assert!(!has_tool("definitely_not_a_real_command_12345"));
    }

    #[test]
    fn test_missing_tool_suggests_install() {
        let results = check_host_tools("definitely_not_a_real_command_12345");
        assert_eq!(results.len(), 1);
        assert!(!results[0].passed);
        assert_eq!(
            results[0].suggestion.as_deref(),
            Some("install definitely_not_a_real_command_12345 and make sure it is on PATH")
        );
    }

    #[test]
    fn test_make_hint() {
        let result = check_tool("make", "Build libraries", None);
        assert!(!result.passed);
        assert!(result.suggestion.unwrap().contains("install make"));
    }
}
