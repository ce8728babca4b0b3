//! Project configuration loader describing the distribution source layout.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::layout::SourceLayout;

const DEFAULT_CONFIG_FILE: &str = "mrdist.config.json";

/// Discoverable project configuration describing the source tree layout.
///
/// Every field has a default matching the historical mrLiquid tree, so a
/// missing or partial configuration file still produces a usable layout.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Software name used in output root paths.
    pub software: String,
    /// Software version used in output root paths.
    pub version: String,
    /// Relative path of the instructions document.
    pub instructions_doc: String,
    /// Relative path of the license file to bundle.
    pub license_file: String,
    /// File name the license is installed under.
    pub license_name: String,
    /// Root-level directory of extra executables.
    pub extra_bin_dir: String,
    /// Directory of module config files.
    pub config_dir: String,
    /// Directories scanned for `.mi` shader metadata files.
    pub mi_dirs: Vec<String>,
    /// Parent directory of per-host-version script directories.
    pub versioned_scripts_dir: String,
    /// Version-independent MEL script directories.
    pub script_dirs: Vec<String>,
    /// Directories scanned for `.xpm` icon files.
    pub icon_dirs: Vec<String>,
    /// Release binaries directory inside a build directory.
    pub release_bin_dir: String,
    /// Release library directory inside a build directory.
    pub release_lib_dir: String,
    /// Name prefix of renderer engine directories.
    pub renderer_prefix: String,
    /// Name prefix of host application module directories.
    pub host_prefix: String,
    /// Architecture suffix stripped from module names.
    pub arch_suffix: String,
    /// Versioned shader library that receives a relative symlink.
    pub versioned_library: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            software: "mrLiquid".into(),
            version: "0.8.0".into(),
            instructions_doc: "doc/Instructions.pdf".into(),
            license_file: "installers/License_Commercial.txt".into(),
            license_name: "LICENSE.txt".into(),
            extra_bin_dir: "bin".into(),
            config_dir: "config".into(),
            mi_dirs: vec![
                "mrClasses/GGShaderLib/mi".into(),
                "mrLiquid/src/shaders".into(),
            ],
            versioned_scripts_dir: "mrLiquid/scripts".into(),
            script_dirs: vec![
                "rubyMEL/scripts".into(),
                "mrClasses/GGShaderLib/AEtemplates".into(),
            ],
            icon_dirs: vec![
                "mrClasses/GGShaderLib/icons".into(),
                "mrLiquid/icons".into(),
            ],
            release_bin_dir: "Release/bin".into(),
            release_lib_dir: "Release/lib".into(),
            renderer_prefix: "mentalray".into(),
            host_prefix: "maya".into(),
            arch_suffix: "-x64".into(),
            versioned_library: "libmrLibrary.so".into(),
        }
    }
}

impl ProjectConfig {
    /// Attempt to load configuration from the provided directory.
    ///
    /// When the configuration file does not exist or fails to parse we fall
    /// back to default values so the assembler can run against an unmodified
    /// source tree.
    pub fn discover(source_root: &Path) -> Self {
        let candidate = source_root.join(DEFAULT_CONFIG_FILE);
        Self::from_path(&candidate).unwrap_or_default()
    }

    /// Read configuration from a specific JSON file.
    pub fn from_path(path: &Path) -> Option<Self> {
        let content = fs::read_to_string(path).ok()?;
        serde_json::from_str(&content).ok()
    }

    /// Convert the configuration into an owned layout description.
    pub fn into_layout(self) -> SourceLayout {
        SourceLayout {
            software: self.software,
            version: self.version,
            instructions_doc: self.instructions_doc,
            license_file: self.license_file,
            license_name: self.license_name,
            extra_bin_dir: self.extra_bin_dir,
            config_dir: self.config_dir,
            mi_dirs: self.mi_dirs,
            versioned_scripts_dir: self.versioned_scripts_dir,
            script_dirs: self.script_dirs,
            icon_dirs: self.icon_dirs,
            release_bin_dir: self.release_bin_dir,
            release_lib_dir: self.release_lib_dir,
            renderer_prefix: self.renderer_prefix,
            host_prefix: self.host_prefix,
            arch_suffix: self.arch_suffix,
            versioned_library: self.versioned_library,
        }
    }
}
