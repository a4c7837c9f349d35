//! Cross-checks of the configuration against the resolved catalog.
//!
//! For every target:
//!
//! - each required and each dropped library must be known,
//! - each known library must be either required or dropped,
//! - no library may be both.
//!
//! Everything here runs before any filesystem mutation.

use std::collections::{BTreeMap, BTreeSet};

use crate::catalog::ResolvedCatalog;
use crate::config::{ConfigWarning, ImportConfig, TargetConfig};
use crate::error::{LibList, OtlibsError, Result};

/// Outcome of a successful validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Non-fatal findings, in document order.
    pub warnings: Vec<ConfigWarning>,
    /// Number of targets checked.
    pub targets_checked: usize,
}

impl ValidationReport {
    /// True when validation produced no warnings.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Validate every target. Stops at the first violation.
pub fn validate(config: &ImportConfig, catalog: &ResolvedCatalog) -> Result<ValidationReport> {
    let empty = BTreeMap::new();

    for (target, params) in &config.targets {
        let known = catalog.libraries(target).unwrap_or(&empty);
        validate_target(target, params, known.keys().map(String::as_str).collect())?;
    }

    Ok(ValidationReport {
        warnings: config.warnings.clone(),
        targets_checked: config.targets.len(),
    })
}

fn validate_target(target: &str, params: &TargetConfig, known: BTreeSet<&str>) -> Result<()> {
    let unknown = |list: LibList, library: &str| OtlibsError::UnknownLibrary {
        target: target.to_string(),
        library: library.to_string(),
        list,
    };

    if let Some(lib) = params.required_libs.iter().find(|l| !known.contains(l.as_str())) {
        return Err(unknown(LibList::Required, lib.as_str()));
    }
    if let Some(lib) = params.dropped_libs.iter().find(|l| !known.contains(l.as_str())) {
        return Err(unknown(LibList::Dropped, lib.as_str()));
    }

    let required: BTreeSet<&str> = params.required_libs.iter().map(String::as_str).collect();
    let dropped: BTreeSet<&str> = params.dropped_libs.iter().map(String::as_str).collect();

    if let Some(lib) = known
        .iter()
        .find(|l| !required.contains(*l) && !dropped.contains(*l))
    {
        return Err(OtlibsError::UnhandledLibrary {
            target: target.to_string(),
            library: lib.to_string(),
        });
    }

    let conflicting: Vec<String> = required
        .intersection(&dropped)
        .map(|l| l.to_string())
        .collect();
    if !conflicting.is_empty() {
        return Err(OtlibsError::ConflictingLibrary {
            target: target.to_string(),
            libraries: conflicting,
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::resolve;
    use crate::config::LibraryCatalog;
    use std::path::Path;

    fn run(config: &str, catalog: &str) -> Result<ValidationReport> {
        let config = ImportConfig::parse(config, Path::new("config.yaml"))?;
        let catalog = LibraryCatalog::parse(catalog, Path::new("catalog.yaml"))?;
        let resolved = resolve(config.targets.keys(), &catalog.templates);
        validate(&config, &resolved)
    }

    #[test]
    fn test_valid_configuration_passes() {
        let report = run(
            "T1:\n  required_libs: [libA]\n  dropped_libs: []\n  compilers: [gcc]\n",
            "libA:\n  target_dir: d\n",
        )
        .unwrap();

        assert!(report.is_clean());
        assert_eq!(report.targets_checked, 1);
    }

    #[test]
    fn test_warnings_are_reported_not_fatal() {
        let report = run("T1:\n  required_libs: [libA]\n", "libA:\n").unwrap();
        assert_eq!(report.warnings.len(), 2);
    }

    #[test]
    fn test_unknown_required_library() {
        let err = run(
            "T1:\n  required_libs: [libA, libZ]\n  dropped_libs: []\n  compilers: []\n",
            "libA:\n",
        )
        .unwrap_err();

        match err {
            OtlibsError::UnknownLibrary { target, library, list } => {
                assert_eq!(target, "T1");
                assert_eq!(library, "libZ");
                assert_eq!(list, LibList::Required);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_dropped_library() {
        let err = run(
            "T1:\n  required_libs: [libA]\n  dropped_libs: [libZ]\n  compilers: []\n",
            "libA:\n",
        )
        .unwrap_err();

        assert!(matches!(
            err,
            OtlibsError::UnknownLibrary { list: LibList::Dropped, .. }
        ));
    }

    #[test]
    fn test_unhandled_library() {
        let err = run(
            "T1:\n  required_libs: [libA]\n  dropped_libs: []\n  compilers: []\n",
            "libA:\nlibB:\n",
        )
        .unwrap_err();

        match err {
            OtlibsError::UnhandledLibrary { target, library } => {
                assert_eq!(target, "T1");
                assert_eq!(library, "libB");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_conflicting_library() {
        let err = run(
            "T1:\n  required_libs: [libA]\n  dropped_libs: [libA]\n  compilers: []\n",
            "libA:\n",
        )
        .unwrap_err();

        match err {
            OtlibsError::ConflictingLibrary { target, libraries } => {
                assert_eq!(target, "T1");
                assert_eq!(libraries, vec!["libA"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_conflict_reports_every_offender() {
        let err = run(
            "T1:\n  required_libs: [libA, libB, libC]\n  dropped_libs: [libC, libA]\n  compilers: []\n",
            "libA:\nlibB:\nlibC:\n",
        )
        .unwrap_err();

        match err {
            OtlibsError::ConflictingLibrary { libraries, .. } => {
                assert_eq!(libraries, vec!["libA", "libC"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_templated_names_checked_per_target() {
        let config = "T1:\n  required_libs: [lib-T1]\n  dropped_libs: []\n  compilers: []\n\
                      T2:\n  required_libs: []\n  dropped_libs: [lib-T2]\n  compilers: []\n";
        assert!(run(config, "lib-{target_name}:\n").is_ok());

        let crossed = "T1:\n  required_libs: [lib-T2]\n  dropped_libs: []\n  compilers: []\n";
        assert!(matches!(
            run(crossed, "lib-{target_name}:\n"),
            Err(OtlibsError::UnknownLibrary { .. })
        ));
    }
}
