//! Project layout and the shared load → resolve → validate pipeline.
//!
//! Every command runs from a project directory holding the two YAML
//! documents and one working directory per target:
//!
//! ```text
//! project/
//! ├── import_libs_config.yaml
//! ├── known_libs.yaml
//! ├── lib/                  prebuilt archives, scanned for strays
//! ├── nrf52840/<lib_dir>/   per-target library build trees
//! └── ...
//! ../lib/<target>/<toolchain>/   imported archives
//! ```

use std::path::{Path, PathBuf};

use crate::catalog::{resolve, ResolvedCatalog};
use crate::config::{self, ImportConfig, CATALOG_FILE_NAME, CONFIG_FILE_NAME};
use crate::error::Result;
use crate::toolchain::output_root;
use crate::validate::{validate, ValidationReport};

/// Paths used by every command.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    /// Project directory; every relative path is resolved against it.
    pub root: PathBuf,
    /// Configuration document.
    pub config: PathBuf,
    /// Library catalog document.
    pub catalog: PathBuf,
}

impl ProjectPaths {
    /// Default layout under `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: root.join(CONFIG_FILE_NAME),
            catalog: root.join(CATALOG_FILE_NAME),
            root,
        }
    }

    /// Use a different configuration document (relative to the root).
    pub fn with_config(mut self, path: impl AsRef<Path>) -> Self {
        self.config = self.root.join(path);
        self
    }

    /// Use a different catalog document (relative to the root).
    pub fn with_catalog(mut self, path: impl AsRef<Path>) -> Self {
        self.catalog = self.root.join(path);
        self
    }

    /// Directory scanned for stray archives before importing.
    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join("lib")
    }

    /// Root of the imported library tree.
    pub fn output_dir(&self) -> PathBuf {
        self.root.join(output_root())
    }

    /// Working directory of a target.
    pub fn target_dir(&self, target: &str) -> PathBuf {
        self.root.join(target)
    }

    /// Resolve a project-relative path.
    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }
}

/// A loaded and validated project.
#[derive(Debug, Clone)]
pub struct Project {
    pub paths: ProjectPaths,
    pub config: ImportConfig,
    pub libraries: ResolvedCatalog,
    pub report: ValidationReport,
}

impl Project {
    /// Load both documents, resolve the catalog and validate.
    ///
    /// Warnings are logged here; every error is returned.
    pub fn open(paths: ProjectPaths) -> Result<Self> {
        let documents = config::load(&paths.config, &paths.catalog)?;
        let libraries = resolve(documents.config.targets.keys(), &documents.catalog.templates);
        let report = validate(&documents.config, &libraries)?;

        for warning in &report.warnings {
            log::warn!("{}", warning);
        }
        log::debug!(
            "Validated {} target(s) against {} known lib(s)",
            report.targets_checked,
            documents.catalog.templates.len()
        );

        Ok(Self {
            paths,
            config: documents.config,
            libraries,
            report,
        })
    }

    /// Load only the configuration document.
    ///
    /// Used by commands that never look at libraries.
    pub fn open_config(paths: &ProjectPaths) -> Result<ImportConfig> {
        let documents = config::load(&paths.config, &paths.catalog)?;
        for warning in &documents.config.warnings {
            log::warn!("{}", warning);
        }
        Ok(documents.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::OtlibsError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_layout() {
        let paths = ProjectPaths::new("/sdk/project");
        assert_eq!(paths.config, PathBuf::from("/sdk/project/import_libs_config.yaml"));
        assert_eq!(paths.catalog, PathBuf::from("/sdk/project/known_libs.yaml"));
        assert_eq!(paths.artifacts_dir(), PathBuf::from("/sdk/project/lib"));
        assert_eq!(paths.output_dir(), PathBuf::from("/sdk/project/../lib"));
        assert_eq!(paths.target_dir("T1"), PathBuf::from("/sdk/project/T1"));
    }

    #[test]
    fn test_document_overrides() {
        let paths = ProjectPaths::new("/p")
            .with_config("cfg/targets.yaml")
            .with_catalog("cfg/libs.yaml");
        assert_eq!(paths.config, PathBuf::from("/p/cfg/targets.yaml"));
        assert_eq!(paths.catalog, PathBuf::from("/p/cfg/libs.yaml"));
    }

    #[test]
    fn test_open_validates() {
        let dir = tempdir().unwrap();
        let paths = ProjectPaths::new(dir.path());
        fs::write(
            &paths.config,
            "T1:\n  required_libs: [libA]\n  dropped_libs: [libA]\n  compilers: []\n",
        )
        .unwrap();
        fs::write(&paths.catalog, "libA:\n  target_dir: d\n").unwrap();

        assert!(matches!(
            Project::open(paths),
            Err(OtlibsError::ConflictingLibrary { .. })
        ));
    }

    #[test]
    fn test_open_resolves() {
        let dir = tempdir().unwrap();
        let paths = ProjectPaths::new(dir.path());
        fs::write(
            &paths.config,
            "T1:\n  required_libs: [libA]\n  dropped_libs: []\n  compilers: [gcc]\n",
        )
        .unwrap();
        fs::write(&paths.catalog, "libA:\n  target_dir: d\n").unwrap();

        let project = Project::open(paths).unwrap();
        assert_eq!(
            project.libraries.library("T1", "libA").unwrap().target_dir.as_deref(),
            Some("d")
        );
        assert!(project.report.is_clean());
    }
}
