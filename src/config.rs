//! Import configuration and library catalog documents.
//!
//! Two YAML documents drive every command:
//!
//! - the **configuration** (`import_libs_config.yaml`) maps each target to
//!   the libraries it requires, the libraries it drops and the compilers
//!   it is imported for;
//! - the **catalog** (`known_libs.yaml`) lists every known library as a
//!   name pattern, optionally with `target_dir` / `src_path` templates.
//!
//! # Example
//!
//! ```rust
//! use std::path::Path;
//! use otlibs::config::ImportConfig;
//!
//! let yaml = "nrf52840:\n  required_libs: [libopenthread-ftd]\n  dropped_libs: []\n  compilers: [gcc]\n";
//! let config = ImportConfig::parse(yaml, Path::new("import_libs_config.yaml")).unwrap();
//! assert_eq!(config.targets["nrf52840"].compilers, vec!["gcc"]);
//! assert!(config.warnings.is_empty());
//! ```

use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::{OtlibsError, Result};

/// Default configuration document name, relative to the project directory.
pub const CONFIG_FILE_NAME: &str = "import_libs_config.yaml";

/// Default catalog document name, relative to the project directory.
pub const CATALOG_FILE_NAME: &str = "known_libs.yaml";

/// The only attributes a target may carry.
pub const TARGET_ATTRIBUTES: [&str; 3] = ["required_libs", "dropped_libs", "compilers"];

/// Library configuration of a single target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetConfig {
    /// Libraries that must be built and copied.
    pub required_libs: Vec<String>,
    /// Known libraries intentionally left out.
    pub dropped_libs: Vec<String>,
    /// Compiler names this target is imported for.
    pub compilers: Vec<String>,
}

/// A target attribute that was absent and defaulted to an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub target: String,
    pub attribute: &'static str,
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing param \"{}\" for \"{}\"", self.attribute, self.target)
    }
}

/// Target mapping as written in the document, before it is closed.
#[derive(Debug, Default, Deserialize)]
struct RawTargetConfig {
    required_libs: Option<Vec<String>>,
    dropped_libs: Option<Vec<String>>,
    compilers: Option<Vec<String>>,
    #[serde(flatten)]
    extra: BTreeMap<String, serde_yaml::Value>,
}

impl RawTargetConfig {
    /// Close the record: default missing lists, reject foreign attributes.
    fn close(self, target: &str, warnings: &mut Vec<ConfigWarning>) -> Result<TargetConfig> {
        let mut take = |value: Option<Vec<String>>, attribute: &'static str| {
            value.unwrap_or_else(|| {
                warnings.push(ConfigWarning {
                    target: target.to_string(),
                    attribute,
                });
                Vec::new()
            })
        };

        let closed = TargetConfig {
            required_libs: take(self.required_libs, TARGET_ATTRIBUTES[0]),
            dropped_libs: take(self.dropped_libs, TARGET_ATTRIBUTES[1]),
            compilers: take(self.compilers, TARGET_ATTRIBUTES[2]),
        };

        if let Some(attribute) = self.extra.into_keys().next() {
            return Err(OtlibsError::UnexpectedAttribute {
                target: target.to_string(),
                attribute,
            });
        }
        Ok(closed)
    }
}

/// Parsed configuration document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportConfig {
    /// Target name to its library configuration.
    pub targets: BTreeMap<String, TargetConfig>,
    /// Attributes that were missing and defaulted while parsing.
    pub warnings: Vec<ConfigWarning>,
}

impl ImportConfig {
    /// Parse a configuration document. `origin` is only used in errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let raw: BTreeMap<String, Option<RawTargetConfig>> = parse_document(text, origin)?;

        let mut config = ImportConfig::default();
        for (target, params) in raw {
            let closed = match params.unwrap_or_default().close(&target, &mut config.warnings) {
                Ok(closed) => closed,
                Err(e) => {
                    // Warnings never reach the caller once parsing fails.
                    for warning in &config.warnings {
                        log::warn!("{}", warning);
                    }
                    return Err(e);
                }
            };
            config.targets.insert(target, closed);
        }
        Ok(config)
    }

    /// Look up a target, failing if it is not configured.
    pub fn target(&self, name: &str) -> Result<&TargetConfig> {
        self.targets
            .get(name)
            .ok_or_else(|| OtlibsError::UnknownTarget {
                target: name.to_string(),
            })
    }
}

/// Catalog entry: a library name pattern's optional path templates.
///
/// Templates may contain `{target_name}`, substituted per target by
/// [`crate::catalog::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LibraryTemplate {
    pub target_dir: Option<String>,
    pub src_path: Option<String>,
}

/// Parsed catalog document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryCatalog {
    /// Name pattern to its templates.
    pub templates: BTreeMap<String, LibraryTemplate>,
}

impl LibraryCatalog {
    /// Parse a catalog document. `origin` is only used in errors.
    pub fn parse(text: &str, origin: &Path) -> Result<Self> {
        let raw: BTreeMap<String, Option<LibraryTemplate>> = parse_document(text, origin)?;
        Ok(LibraryCatalog {
            templates: raw
                .into_iter()
                .map(|(pattern, template)| (pattern, template.unwrap_or_default()))
                .collect(),
        })
    }
}

/// Both documents, loaded together.
#[derive(Debug, Clone)]
pub struct Documents {
    pub config: ImportConfig,
    pub catalog: LibraryCatalog,
}

/// Load the configuration and catalog documents.
///
/// # Errors
///
/// [`OtlibsError::MissingDocument`] if either file is absent, a YAML error
/// if either is malformed, [`OtlibsError::UnexpectedAttribute`] if a target
/// carries a foreign attribute.
pub fn load(config_path: &Path, catalog_path: &Path) -> Result<Documents> {
    log::debug!("Loading config from file \"{}\"", config_path.display());
    let config = ImportConfig::parse(&read_document(config_path)?, config_path)?;

    log::debug!("Loading libs from file \"{}\"", catalog_path.display());
    let catalog = LibraryCatalog::parse(&read_document(catalog_path)?, catalog_path)?;

    Ok(Documents { config, catalog })
}

fn read_document(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => OtlibsError::MissingDocument {
            path: path.to_path_buf(),
        },
        _ => OtlibsError::io(path, e),
    })
}

/// Deserialize a mapping document; an empty document is an empty mapping.
fn parse_document<T: DeserializeOwned + Default>(text: &str, origin: &Path) -> Result<T> {
    if text.trim().is_empty() {
        return Ok(T::default());
    }
    let parsed: Option<T> = serde_yaml::from_str(text).map_err(|source| OtlibsError::Yaml {
        path: origin.to_path_buf(),
        source,
    })?;
    Ok(parsed.unwrap_or_default())
}
