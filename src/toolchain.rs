//! Toolchain-specific archive locations.
//!
//! Each supported compiler builds a library under its own subdirectory of
//! the library's build directory and names the archive its own way:
//!
//! | Toolchain | Built archive | Imported as |
//! |-----------|---------------|-------------|
//! | gcc  | `<target>/<dir>/armgcc/<name>.a` | `../lib/<target>/gcc/<name>.a` |
//! | keil | `<target>/<dir>/arm5_no_packs/_build/<name>.lib` | `../lib/<target>/keil/<name>.lib` |
//! | iar  | `<target>/<dir>/iar/_build/ot_<target>_<iar name>.a` | `../lib/<target>/iar/<name>.a` |
//!
//! `<name>` is the [archive name](archive_name); the IAR build also turns
//! every hyphen of it into an underscore. All paths are relative to the
//! project directory.

use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::catalog::ResolvedLibrary;
use crate::error::{OtlibsError, Result};

/// Subdirectory of a library's build directory holding the GCC makefile.
pub const GCC_BUILD_SUBDIR: &str = "armgcc";

/// Filename prefix of IAR archives.
const IAR_PREFIX: &str = "ot";

/// A supported compiler toolchain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Toolchain {
    Gcc,
    Keil,
    Iar,
}

/// Where a library's archive is built and where it is imported to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryPaths {
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Pure path rule of a toolchain: `(target, archive name, library dir)`.
type PathRule = fn(&str, &str, &Path) -> LibraryPaths;

impl Toolchain {
    /// Every supported toolchain.
    pub const ALL: [Toolchain; 3] = [Toolchain::Gcc, Toolchain::Keil, Toolchain::Iar];

    /// Lowercase name, also used as the output directory name.
    pub fn name(self) -> &'static str {
        match self {
            Toolchain::Gcc => "gcc",
            Toolchain::Keil => "keil",
            Toolchain::Iar => "iar",
        }
    }

    /// Archive file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Toolchain::Keil => "lib",
            Toolchain::Gcc | Toolchain::Iar => "a",
        }
    }

    /// Parse a toolchain name, ignoring case.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.name().eq_ignore_ascii_case(name))
    }

    /// Parse a toolchain configured for `target`.
    pub fn for_target(target: &str, name: &str) -> Result<Self> {
        Self::parse(name).ok_or_else(|| OtlibsError::UnknownToolchain {
            target: target.to_string(),
            name: name.to_string(),
        })
    }

    fn rule(self) -> PathRule {
        match self {
            Toolchain::Gcc => gcc_paths,
            Toolchain::Keil => keil_paths,
            Toolchain::Iar => iar_paths,
        }
    }

    /// Source and destination of `library` for `target`.
    ///
    /// `lib_dir` overrides the library's `target_dir`.
    ///
    /// # Errors
    ///
    /// [`OtlibsError::MissingTargetDir`] when neither is available.
    pub fn paths(
        self,
        target: &str,
        library: &ResolvedLibrary,
        lib_dir: Option<&Path>,
    ) -> Result<LibraryPaths> {
        let lib_dir = match (lib_dir, library.target_dir.as_deref()) {
            (Some(dir), _) => normalize(dir),
            (None, Some(dir)) => normalize(Path::new(dir)),
            (None, None) => {
                return Err(OtlibsError::MissingTargetDir {
                    target: target.to_string(),
                    library: library.name.clone(),
                })
            }
        };

        let archive = archive_name(target, &library.name);
        let paths = (self.rule())(target, &archive, &lib_dir);
        log::debug!(
            "{}: lib \"{}\" from \"{}\" to \"{}\"",
            self,
            library.name,
            paths.source.display(),
            paths.destination.display()
        );
        Ok(paths)
    }

    /// Where the toolchain builds `library`.
    pub fn source_path(
        self,
        target: &str,
        library: &ResolvedLibrary,
        lib_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        self.paths(target, library, lib_dir).map(|p| p.source)
    }

    /// Where `library` is imported to.
    pub fn destination_path(
        self,
        target: &str,
        library: &ResolvedLibrary,
        lib_dir: Option<&Path>,
    ) -> Result<PathBuf> {
        self.paths(target, library, lib_dir).map(|p| p.destination)
    }

    /// Output directory of this toolchain for `target`.
    pub fn output_dir(self, target: &str) -> PathBuf {
        output_root().join(target).join(self.name())
    }
}

impl fmt::Display for Toolchain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Caller-supplied allow-list of toolchain names.
///
/// Names are compared case-insensitively. An empty list allows everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolchainFilter {
    allowed: Option<Vec<String>>,
}

impl ToolchainFilter {
    /// Allow every toolchain.
    pub fn all() -> Self {
        Self::default()
    }

    /// Build from command line arguments.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        if names.is_empty() {
            return Self::all();
        }
        Self {
            allowed: Some(names.iter().map(|n| n.as_ref().to_lowercase()).collect()),
        }
    }

    /// Whether a configured toolchain name passes the filter.
    pub fn allows(&self, name: &str) -> bool {
        match &self.allowed {
            None => true,
            Some(allowed) => allowed.iter().any(|a| a.eq_ignore_ascii_case(name)),
        }
    }
}

/// Root of the imported library tree, relative to the project directory.
pub fn output_root() -> PathBuf {
    Path::new("..").join("lib")
}

/// Library name as it appears in archive filenames.
///
/// Archives carry the target name; it is appended as `-<target>` unless
/// the library name already contains it.
pub fn archive_name(target: &str, library: &str) -> String {
    if library.contains(target) {
        library.to_string()
    } else {
        format!("{library}-{target}")
    }
}

/// Archive name as the IAR project spells it.
pub fn iar_archive_name(archive: &str) -> String {
    archive.replace('-', "_")
}

/// Drop `.` segments and redundant separators.
fn normalize(dir: &Path) -> PathBuf {
    dir.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

fn file(stem: &str, extension: &str) -> String {
    format!("{stem}.{extension}")
}

fn gcc_paths(target: &str, archive: &str, lib_dir: &Path) -> LibraryPaths {
    let name = file(archive, Toolchain::Gcc.extension());
    LibraryPaths {
        source: Path::new(target).join(lib_dir).join(GCC_BUILD_SUBDIR).join(&name),
        destination: Toolchain::Gcc.output_dir(target).join(name),
    }
}

fn keil_paths(target: &str, archive: &str, lib_dir: &Path) -> LibraryPaths {
    let name = file(archive, Toolchain::Keil.extension());
    LibraryPaths {
        source: Path::new(target)
            .join(lib_dir)
            .join("arm5_no_packs")
            .join("_build")
            .join(&name),
        destination: Toolchain::Keil.output_dir(target).join(name),
    }
}

fn iar_paths(target: &str, archive: &str, lib_dir: &Path) -> LibraryPaths {
    let extension = Toolchain::Iar.extension();
    let built = format!("{IAR_PREFIX}_{target}_{}", iar_archive_name(archive));
    LibraryPaths {
        source: Path::new(target)
            .join(lib_dir)
            .join("iar")
            .join("_build")
            .join(file(&built, extension)),
        destination: Toolchain::Iar.output_dir(target).join(file(archive, extension)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lib(name: &str, target_dir: Option<&str>) -> ResolvedLibrary {
        ResolvedLibrary {
            name: name.to_string(),
            target_dir: target_dir.map(String::from),
            src_path: None,
        }
    }

    #[test]
    fn test_parse_ignores_case() {
        assert_eq!(Toolchain::parse("gcc"), Some(Toolchain::Gcc));
        assert_eq!(Toolchain::parse("Keil"), Some(Toolchain::Keil));
        assert_eq!(Toolchain::parse("IAR"), Some(Toolchain::Iar));
        assert_eq!(Toolchain::parse("clang"), None);
    }

    #[test]
    fn test_for_target_unknown() {
        match Toolchain::for_target("T1", "sdcc").unwrap_err() {
            OtlibsError::UnknownToolchain { target, name } => {
                assert_eq!(target, "T1");
                assert_eq!(name, "sdcc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_archive_name_suffix() {
        assert_eq!(archive_name("T1", "libA"), "libA-T1");
        assert_eq!(archive_name("nrf52840", "libopenthread-nrf52840"), "libopenthread-nrf52840");
    }

    #[test]
    fn test_gcc_paths() {
        let paths = Toolchain::Gcc.paths("T1", &lib("libA", Some("d")), None).unwrap();
        assert_eq!(paths.source, PathBuf::from("T1/d/armgcc/libA-T1.a"));
        assert_eq!(paths.destination, PathBuf::from("../lib/T1/gcc/libA-T1.a"));
    }

    #[test]
    fn test_keil_paths() {
        let paths = Toolchain::Keil.paths("T1", &lib("libA", Some("d")), None).unwrap();
        assert_eq!(paths.source, PathBuf::from("T1/d/arm5_no_packs/_build/libA-T1.lib"));
        assert_eq!(paths.destination, PathBuf::from("../lib/T1/keil/libA-T1.lib"));
    }

    #[test]
    fn test_iar_paths_rewrite_hyphens() {
        let library = lib("libopenthread-ftd", Some("libopenthread/ftd"));
        let paths = Toolchain::Iar.paths("nrf52840", &library, None).unwrap();

        assert_eq!(
            paths.source,
            PathBuf::from(
                "nrf52840/libopenthread/ftd/iar/_build/ot_nrf52840_libopenthread_ftd_nrf52840.a"
            )
        );
        assert_eq!(
            paths.destination,
            PathBuf::from("../lib/nrf52840/iar/libopenthread-ftd-nrf52840.a")
        );

        let rewritten = iar_archive_name(&archive_name("nrf52840", &library.name));
        assert!(paths.source.to_string_lossy().contains(&rewritten));
    }

    #[test]
    fn test_source_and_destination_share_archive_name() {
        let library = lib("libmbedcrypto", Some("./mbedtls//lib"));
        for toolchain in [Toolchain::Gcc, Toolchain::Keil] {
            let paths = toolchain.paths("T1", &library, None).unwrap();
            assert_eq!(paths.source.file_name(), paths.destination.file_name());
        }
    }

    #[test]
    fn test_lib_dir_is_normalized() {
        let path = Toolchain::Gcc
            .source_path("T1", &lib("libA", Some("./a//b/")), None)
            .unwrap();
        assert_eq!(path, PathBuf::from("T1/a/b/armgcc/libA-T1.a"));
    }

    #[test]
    fn test_override_wins_and_is_required_without_target_dir() {
        let library = lib("libA", None);
        assert!(matches!(
            Toolchain::Gcc.source_path("T1", &library, None),
            Err(OtlibsError::MissingTargetDir { .. })
        ));

        let path = Toolchain::Gcc
            .destination_path("T1", &library, Some(Path::new("other")))
            .unwrap();
        assert_eq!(path, PathBuf::from("../lib/T1/gcc/libA-T1.a"));
        let path = Toolchain::Gcc
            .source_path("T1", &lib("libA", Some("d")), Some(Path::new("other")))
            .unwrap();
        assert_eq!(path, PathBuf::from("T1/other/armgcc/libA-T1.a"));
    }

    #[test]
    fn test_filter() {
        let all = ToolchainFilter::from_names::<&str>(&[]);
        assert_eq!(all, ToolchainFilter::all());
        assert!(all.allows("keil"));

        let some = ToolchainFilter::from_names(&["GCC", "iar"]);
        assert!(some.allows("gcc"));
        assert!(some.allows("IAR"));
        assert!(!some.allows("keil"));
        assert_ne!(some, ToolchainFilter::all());
    }

    #[test]
    fn test_output_dir() {
        assert_eq!(Toolchain::Keil.output_dir("T1"), PathBuf::from("../lib/T1/keil"));
    }
}
