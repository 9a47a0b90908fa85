//! Toolchain lookup.
//!
//! The build owns toolchain discovery; this module only defines the seam
//! ([`ToolchainResolver`]) and a table-backed implementation fed from the build
//! config.

use crate::target::{Arch, BuildTarget, Os};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Prebuilt tools copied next to the test cases.
pub const PREBUILT_TOOLS: [&str; 3] = ["as", "addr2line", "objdump"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolchainError {
    #[error("no toolchain configured for {os}-{arch}")]
    NotFound { os: Os, arch: Arch },

    #[error("toolchain for {os}-{arch} has an empty {field}")]
    Incomplete {
        os: Os,
        arch: Arch,
        field: &'static str,
    },
}

/// A resolved cross toolchain.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Toolchain {
    /// Install root, e.g. `prebuilts/gcc/linux-x86/host/x86_64-linux-glibc2.15-4.8`.
    pub root: String,
    /// Tool name prefix, e.g. `x86_64-linux`.
    pub triple: String,
}

impl Toolchain {
    /// `<root>/bin/<triple>-<tool>`
    pub fn tool_path(&self, tool: &str) -> String {
        format!("{}/bin/{}-{}", self.root.trim_end_matches('/'), self.triple, tool)
    }
}

pub trait ToolchainResolver {
    fn resolve(&self, os: Os, arch: Arch) -> Result<Toolchain, ToolchainError>;
}

/// Resolver backed by a fixed `<os>-<arch>` table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ToolchainTable {
    entries: BTreeMap<(Os, Arch), Toolchain>,
}

impl ToolchainTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, target: BuildTarget, toolchain: Toolchain) {
        self.entries.insert((target.os, target.arch), toolchain);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ToolchainResolver for ToolchainTable {
    fn resolve(&self, os: Os, arch: Arch) -> Result<Toolchain, ToolchainError> {
        let tc = self
            .entries
            .get(&(os, arch))
            .ok_or(ToolchainError::NotFound { os, arch })?;
        if tc.root.is_empty() {
            return Err(ToolchainError::Incomplete {
                os,
                arch,
                field: "root",
            });
        }
        if tc.triple.is_empty() {
            return Err(ToolchainError::Incomplete {
                os,
                arch,
                field: "triple",
            });
        }
        Ok(tc.clone())
    }
}
