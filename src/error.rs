//! Error types for library import operations.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Which configuration list a library name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LibList {
    Required,
    Dropped,
}

impl std::fmt::Display for LibList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LibList::Required => f.write_str("required"),
            LibList::Dropped => f.write_str("dropped"),
        }
    }
}

/// Errors that can occur while loading, validating or importing libraries.
///
/// Every variant is fatal. The only non-fatal condition (a missing target
/// attribute) is reported as a [`crate::config::ConfigWarning`] instead.
#[derive(Debug, thiserror::Error)]
pub enum OtlibsError {
    /// A configuration or catalog document does not exist.
    #[error("document not found: {}", path.display())]
    MissingDocument {
        /// The path that was not found.
        path: PathBuf,
    },

    /// YAML parse error.
    #[error("YAML parse error in {}: {source}", path.display())]
    Yaml {
        /// Document being parsed.
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A target carries an attribute outside the fixed set.
    #[error("unexpected param \"{attribute}\" for \"{target}\"")]
    UnexpectedAttribute { target: String, attribute: String },

    /// A configured library is not in the resolved catalog.
    #[error("unexpected {list} lib \"{library}\" for \"{target}\"")]
    UnknownLibrary {
        target: String,
        library: String,
        list: LibList,
    },

    /// A catalog library is neither required nor dropped.
    #[error("lib \"{library}\" not handled for \"{target}\"")]
    UnhandledLibrary { target: String, library: String },

    /// Libraries listed as both required and dropped.
    #[error("libs \"{}\" added as both required and dropped for \"{target}\"", libraries.join(" "))]
    ConflictingLibrary {
        target: String,
        libraries: Vec<String>,
    },

    /// A library archive whose name matches no known library.
    #[error("unknown lib present {name} ({})", path.display())]
    UnknownArtifact { name: String, path: PathBuf },

    /// A configured toolchain with no path rules.
    #[error("unknown compiler \"{name}\" for \"{target}\" (expected gcc, keil or iar)")]
    UnknownToolchain { target: String, name: String },

    /// Path resolution needs a library directory and none is known.
    #[error("lib \"{library}\" has no target_dir for \"{target}\"")]
    MissingTargetDir { target: String, library: String },

    /// The built archive to copy does not exist.
    #[error("library archive not found: {}", path.display())]
    MissingArtifact { path: PathBuf },

    /// The external build command exited unsuccessfully.
    #[error("build of \"{library}\" for \"{target}\" failed ({status})")]
    BuildFailed {
        target: String,
        library: String,
        status: ExitStatus,
    },

    /// A target that the configuration does not define.
    #[error("target \"{target}\" is not configured")]
    UnknownTarget { target: String },
}

impl OtlibsError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        OtlibsError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for otlibs operations.
pub type Result<T> = std::result::Result<T, OtlibsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflicting_message_names_every_library() {
        let err = OtlibsError::ConflictingLibrary {
            target: "nrf52840".into(),
            libraries: vec!["libA".into(), "libB".into()],
        };
        assert_eq!(
            err.to_string(),
            "libs \"libA libB\" added as both required and dropped for \"nrf52840\""
        );
    }

    #[test]
    fn test_unknown_library_names_list() {
        let err = OtlibsError::UnknownLibrary {
            target: "T1".into(),
            library: "libZ".into(),
            list: LibList::Dropped,
        };
        assert_eq!(err.to_string(), "unexpected dropped lib \"libZ\" for \"T1\"");
    }
}
