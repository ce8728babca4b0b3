//! Platform and architecture tables driving the per-build iteration.

use serde::{Deserialize, Serialize};

/// Target platforms a distribution is assembled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Platform {
    /// Linux on x86 hardware, 32 or 64 bit.
    LinuxX86,
    /// Windows, 32 or 64 bit.
    Windows,
    /// macOS; no per-architecture builds are produced.
    Osx,
}

/// Architectures a platform may carry builds for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Architecture {
    /// 32-bit Linux.
    I686,
    /// 64-bit Linux.
    X86_64,
    /// 32-bit Windows.
    Win32,
    /// 64-bit Windows.
    Win64,
}

/// Every platform the assembler iterates over, in output order.
pub const PLATFORMS: [Platform; 3] = [Platform::LinuxX86, Platform::Windows, Platform::Osx];

impl Platform {
    /// Directory name used for this platform inside the output tree.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Platform::LinuxX86 => "Linux-x86",
            Platform::Windows => "Windows",
            Platform::Osx => "OSX",
        }
    }

    /// OS family prefix used when matching build directories (`{os}-*-{bits}`).
    ///
    /// This is the platform directory name with everything from the first
    /// hyphen onwards removed.
    pub fn os_family(&self) -> &'static str {
        match self {
            Platform::LinuxX86 => "Linux",
            Platform::Windows => "Windows",
            Platform::Osx => "OSX",
        }
    }

    /// Architectures built for this platform. OSX has none and therefore
    /// produces no per-architecture output at all.
    pub fn architectures(&self) -> &'static [Architecture] {
        match self {
            Platform::LinuxX86 => &[Architecture::I686, Architecture::X86_64],
            Platform::Windows => &[Architecture::Win32, Architecture::Win64],
            Platform::Osx => &[],
        }
    }
}

impl Architecture {
    /// Directory name used for this architecture inside the output tree.
    pub fn dir_name(&self) -> &'static str {
        match self {
            Architecture::I686 => "i686",
            Architecture::X86_64 => "x86_64",
            Architecture::Win32 => "win32",
            Architecture::Win64 => "win64",
        }
    }

    /// Word size of the build, used in the build directory pattern.
    pub fn bit_width(&self) -> u32 {
        match self {
            Architecture::I686 | Architecture::Win32 => 32,
            Architecture::X86_64 | Architecture::Win64 => 64,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}

impl std::fmt::Display for Architecture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dir_name())
    }
}
