//! Named file-name predicates used while selecting distribution contents.

use std::sync::OnceLock;

use regex::Regex;

fn ignored_extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.(?:exp|lib|pdb|a)$").expect("invalid ignored extension regex")
    })
}

fn shader_extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.(?:sog|so|dll|manifest)$").expect("invalid shader extension regex")
    })
}

fn plugin_extension_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\.(?:sog|so|mll|manifest)$").expect("invalid plugin extension regex")
    })
}

/// Build byproducts that never ship: import/export stubs, static archives
/// and debug symbol databases.
pub fn is_ignored_extension(name: &str) -> bool {
    ignored_extension_pattern().is_match(name)
}

/// Editor backup files (`~` suffix).
pub fn is_backup_file(name: &str) -> bool {
    name.ends_with('~')
}

/// Shader payloads: compiled shader libraries for any platform, their
/// manifests, and anything following the `lib*` naming convention.
pub fn is_shader_file(name: &str) -> bool {
    shader_extension_pattern().is_match(name) || name.starts_with("lib")
}

/// Host application plugin binaries and their manifests.
pub fn is_plugin_binary(name: &str) -> bool {
    plugin_extension_pattern().is_match(name)
}

/// Whether a file name carries the given extension (without the dot).
pub fn has_extension(name: &str, extension: &str) -> bool {
    std::path::Path::new(name)
        .extension()
        .is_some_and(|ext| ext == extension)
}

/// Whether this is a versioned flavour (`{library}.{suffix}`) of the given
/// library name, as opposed to the bare library name itself.
pub fn is_versioned_library(name: &str, library: &str) -> bool {
    name.strip_prefix(library)
        .is_some_and(|suffix| suffix.starts_with('.') && suffix.len() > 1)
}
