//! Source tree layout description consumed by the assembler.
//!
//! Every path-producing method takes the relevant root explicitly; nothing in
//! here reads ambient process state such as the current working directory.

use std::path::{Path, PathBuf};

/// Owned description of where distribution inputs live relative to the
/// source and build roots, plus the naming rules of the output tree.
#[derive(Debug, Clone)]
pub struct SourceLayout {
    /// Software name used in output root paths.
    pub software: String,
    /// Software version used in output root paths.
    pub version: String,
    /// Instructions document copied into `docs/`.
    pub instructions_doc: String,
    /// License file copied into `docs/` under [`SourceLayout::license_name`].
    pub license_file: String,
    /// File name the license is installed under.
    pub license_name: String,
    /// Root-level directory of extra executables bundled with every build.
    pub extra_bin_dir: String,
    /// Directory of module config files copied into each module root.
    pub config_dir: String,
    /// Directories scanned for `.mi` shader metadata files.
    pub mi_dirs: Vec<String>,
    /// Parent directory of per-host-version MEL script directories.
    pub versioned_scripts_dir: String,
    /// Version-independent MEL script directories.
    pub script_dirs: Vec<String>,
    /// Directories scanned for `.xpm` icon files.
    pub icon_dirs: Vec<String>,
    /// Release binaries directory inside a build directory.
    pub release_bin_dir: String,
    /// Release library directory inside a build directory.
    pub release_lib_dir: String,
    /// Name prefix of renderer engine directories under the release library.
    pub renderer_prefix: String,
    /// Name prefix of host application module directories under the release
    /// library.
    pub host_prefix: String,
    /// Architecture suffix stripped from module names to derive version keys.
    pub arch_suffix: String,
    /// Versioned shader library that receives a relative symlink.
    pub versioned_library: String,
}

impl SourceLayout {
    /// Path of the instructions document under the source root.
    pub fn instructions_doc_path(&self, source_root: &Path) -> PathBuf {
        source_root.join(&self.instructions_doc)
    }

    /// Path of the license file under the source root.
    pub fn license_path(&self, source_root: &Path) -> PathBuf {
        source_root.join(&self.license_file)
    }

    /// Root-level extra binaries directory.
    pub fn extra_bin_path(&self, source_root: &Path) -> PathBuf {
        source_root.join(&self.extra_bin_dir)
    }

    /// Module config files directory.
    pub fn config_path(&self, source_root: &Path) -> PathBuf {
        source_root.join(&self.config_dir)
    }

    /// All directories scanned for `.mi` metadata files.
    pub fn mi_paths(&self, source_root: &Path) -> Vec<PathBuf> {
        self.mi_dirs.iter().map(|dir| source_root.join(dir)).collect()
    }

    /// The script directory keyed by a host application version.
    pub fn versioned_scripts_path(&self, source_root: &Path, version_key: &str) -> PathBuf {
        source_root.join(&self.versioned_scripts_dir).join(version_key)
    }

    /// Version-independent script directories.
    pub fn script_paths(&self, source_root: &Path) -> Vec<PathBuf> {
        self.script_dirs.iter().map(|dir| source_root.join(dir)).collect()
    }

    /// Icon source directories.
    pub fn icon_paths(&self, source_root: &Path) -> Vec<PathBuf> {
        self.icon_dirs.iter().map(|dir| source_root.join(dir)).collect()
    }

    /// Derive a module's version key by stripping the architecture suffix.
    ///
    /// `maya8.5-x64` and `maya8.5` share the version key `maya8.5`, so both
    /// module flavours pick up the same versioned scripts.
    pub fn module_version_key<'a>(&self, module_name: &'a str) -> &'a str {
        module_name
            .strip_suffix(&self.arch_suffix)
            .unwrap_or(module_name)
    }

    /// Output root of the full distribution under an install prefix.
    pub fn install_output_root(&self, install_root: &Path) -> PathBuf {
        install_root.join(&self.software).join(&self.version)
    }

    /// Output root of the demo distribution under a demo prefix.
    pub fn demo_output_root(&self, demo_root: &Path) -> PathBuf {
        demo_root
            .join(format!("{}-demo", self.software))
            .join(&self.version)
    }
}
