//! Distribution variants and the plugin-name rule they imply.

/// Which plugin binaries end up in an assembled distribution.
///
/// The full variant carries every plugin except the demo builds; a tagged
/// variant carries only plugins whose file name contains `-{tag}`. The demo
/// distribution is the tagged variant with tag `demo`; other tags are a
/// library-level extension point that the CLI does not expose.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Variant {
    /// Commercial distribution: all plugins except `-demo` builds.
    Full,
    /// Restricted distribution: only plugins carrying a `-{tag}` marker.
    Tagged(String),
}

impl Variant {
    /// The demo distribution variant.
    pub fn demo() -> Self {
        Variant::Tagged("demo".to_string())
    }

    /// Short label used in log output and the run summary.
    pub fn label(&self) -> &str {
        match self {
            Variant::Full => "full",
            Variant::Tagged(tag) => tag,
        }
    }

    /// Whether a plugin binary with this file name belongs in the variant.
    pub fn includes_plugin_name(&self, name: &str) -> bool {
        match self {
            Variant::Full => !name.contains("-demo"),
            Variant::Tagged(tag) => name.contains(&format!("-{tag}")),
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}
