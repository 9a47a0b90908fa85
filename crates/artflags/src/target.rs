//! Build target description.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Instruction set architectures the runtime supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arch {
    Arm,
    Arm64,
    Mips,
    Mips64,
    X86,
    #[serde(rename = "x86_64")]
    X86_64,
}

impl Arch {
    /// Order used when emitting per-architecture definitions.
    pub const ALL: [Arch; 6] = [
        Arch::Arm,
        Arch::Arm64,
        Arch::Mips,
        Arch::Mips64,
        Arch::X86,
        Arch::X86_64,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::Mips => "mips",
            Self::Mips64 => "mips64",
            Self::X86 => "x86",
            Self::X86_64 => "x86_64",
        }
    }

    /// Bytes reserved below the stack limit for overflow handling.
    pub fn stack_overflow_gap(self) -> u32 {
        match self {
            Self::Mips | Self::Mips64 => 16384,
            Self::Arm | Self::Arm64 | Self::X86 | Self::X86_64 => 8192,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Arch::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| format!("unknown architecture '{s}'"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Os {
    #[default]
    Linux,
    Android,
    Darwin,
}

impl Os {
    pub fn name(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Android => "android",
            Self::Darwin => "darwin",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Os {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "linux" => Ok(Self::Linux),
            "android" => Ok(Self::Android),
            "darwin" => Ok(Self::Darwin),
            _ => Err(format!("unknown os '{s}'")),
        }
    }
}

/// The build's default (OS, architecture) pair, used for toolchain lookup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildTarget {
    pub os: Os,
    pub arch: Arch,
}

impl Default for BuildTarget {
    fn default() -> Self {
        Self {
            os: Os::Linux,
            arch: Arch::X86_64,
        }
    }
}

impl fmt::Display for BuildTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.os, self.arch)
    }
}

impl FromStr for BuildTarget {
    type Err = String;

    /// Parses `<os>-<arch>`, e.g. `linux-x86_64`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (os, arch) = s
            .split_once('-')
            .ok_or_else(|| format!("expected <os>-<arch>, got '{s}'"))?;
        Ok(Self {
            os: os.parse()?,
            arch: arch.parse()?,
        })
    }
}

/// What the orchestrator knows about one module compile.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TargetDescriptor {
    pub is_host: bool,
    pub is_device: bool,
    /// Any sanitizer configured for the device target.
    pub sanitizer_enabled: bool,
    pub base_address_host: String,
    pub base_address_device: String,
}

impl TargetDescriptor {
    pub fn device(base_address_device: impl Into<String>) -> Self {
        Self {
            is_device: true,
            base_address_device: base_address_device.into(),
            ..Self::default()
        }
    }

    pub fn host(base_address_host: impl Into<String>) -> Self {
        Self {
            is_host: true,
            base_address_host: base_address_host.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sanitizer(mut self, enabled: bool) -> Self {
        self.sanitizer_enabled = enabled;
        self
    }
}
