//! Build configuration file.
//!
//! Holds what the build orchestrator knows about the whole build: image base
//! addresses, device sanitizers, the default target, test inputs and
//! toolchains. Every field is optional, so `{}` is a valid config.

use crate::assets::{TestAssetMap, TestMap};
use crate::env::{EnvOverrides, OverrideSource};
use crate::target::{BuildTarget, TargetDescriptor};
use crate::toolchain::{Toolchain, ToolchainTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_HOST_BASE_ADDRESS: &str = "0x60000000";
pub const DEFAULT_DEVICE_BASE_ADDRESS: &str = "0x70000000";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid toolchain key '{key}': {reason}")]
    ToolchainKey { key: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    pub host_base_address: String,
    pub device_base_address: String,
    /// Sanitizers enabled for device builds, e.g. `["address"]`.
    pub sanitize_device: Vec<String>,
    pub default_target: BuildTarget,
    /// Destination path -> source path.
    pub test_assets: TestAssetMap,
    /// Suite -> test names.
    pub tests: TestMap,
    /// `<os>-<arch>` -> toolchain.
    pub toolchains: BTreeMap<String, Toolchain>,
    /// Applied on top of the process environment.
    pub overrides: BTreeMap<String, String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            host_base_address: DEFAULT_HOST_BASE_ADDRESS.to_string(),
            device_base_address: DEFAULT_DEVICE_BASE_ADDRESS.to_string(),
            sanitize_device: Vec::new(),
            default_target: BuildTarget::default(),
            test_assets: TestAssetMap::new(),
            tests: TestMap::new(),
            toolchains: BTreeMap::new(),
            overrides: BTreeMap::new(),
        }
    }
}

impl BuildConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Descriptor for a module built for the device, the host, or both.
    pub fn descriptor(&self, is_host: bool, is_device: bool) -> TargetDescriptor {
        TargetDescriptor {
            is_host,
            is_device,
            sanitizer_enabled: !self.sanitize_device.is_empty(),
            base_address_host: self.host_base_address.clone(),
            base_address_device: self.device_base_address.clone(),
        }
    }

    pub fn toolchain_table(&self) -> Result<ToolchainTable, ConfigError> {
        let mut table = ToolchainTable::new();
        for (key, tc) in &self.toolchains {
            let target: BuildTarget = key.parse().map_err(|reason| ConfigError::ToolchainKey {
                key: key.clone(),
                reason,
            })?;
            table.insert(target, tc.clone());
        }
        Ok(table)
    }

    /// Capture overrides from `source`, then apply this config's inline
    /// overrides and finally `extra` (usually `--set` pairs).
    pub fn overrides_from(
        &self,
        source: &dyn OverrideSource,
        extra: impl IntoIterator<Item = (String, String)>,
    ) -> EnvOverrides {
        EnvOverrides::capture(source)
            .layered(self.overrides.iter().map(|(k, v)| (k.clone(), v.clone())))
            .layered(extra)
    }
}
