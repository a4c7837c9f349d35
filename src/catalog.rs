//! Per-target expansion of the library catalog.
//!
//! Catalog names and path templates may embed [`TARGET_PLACEHOLDER`]. For
//! every configured target each template is expanded once, producing the
//! set of libraries that target knows about.

use std::collections::{BTreeMap, BTreeSet};

use crate::config::LibraryTemplate;

/// Placeholder substituted with the target name.
pub const TARGET_PLACEHOLDER: &str = "{target_name}";

/// A catalog entry expanded for one target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedLibrary {
    /// Library name with the target substituted.
    pub name: String,
    /// Build directory relative to the target directory.
    pub target_dir: Option<String>,
    /// Source location, carried for reference.
    pub src_path: Option<String>,
}

/// Target name to its libraries, keyed by resolved name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedCatalog {
    targets: BTreeMap<String, BTreeMap<String, ResolvedLibrary>>,
}

impl ResolvedCatalog {
    /// Libraries known for `target`, if the target was resolved.
    pub fn libraries(&self, target: &str) -> Option<&BTreeMap<String, ResolvedLibrary>> {
        self.targets.get(target)
    }

    /// A single resolved library.
    pub fn library(&self, target: &str, name: &str) -> Option<&ResolvedLibrary> {
        self.targets.get(target)?.get(name)
    }

    /// Resolved library names across every target.
    pub fn all_names(&self) -> BTreeSet<&str> {
        self.targets
            .values()
            .flat_map(|libs| libs.keys().map(String::as_str))
            .collect()
    }
}

/// Substitute `target` into a template string.
pub fn substitute(template: &str, target: &str) -> String {
    template.replace(TARGET_PLACEHOLDER, target)
}

/// Expand every catalog template for every target.
///
/// A template without attributes resolves to a name-only library. When two
/// patterns expand to the same name for a target, the later one (in name
/// order) wins.
pub fn resolve<'a, I>(targets: I, templates: &BTreeMap<String, LibraryTemplate>) -> ResolvedCatalog
where
    I: IntoIterator<Item = &'a String>,
{
    let mut catalog = ResolvedCatalog::default();

    for target in targets {
        let libs = templates
            .iter()
            .map(|(pattern, template)| {
                let name = substitute(pattern, target);
                let resolved = ResolvedLibrary {
                    name: name.clone(),
                    target_dir: template.target_dir.as_deref().map(|t| substitute(t, target)),
                    src_path: template.src_path.as_deref().map(|t| substitute(t, target)),
                };
                (name, resolved)
            })
            .collect();
        catalog.targets.insert(target.clone(), libs);
    }

    catalog
}
