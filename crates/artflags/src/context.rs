//! Memoized flag sets.
//!
//! A [`FlagContext`] owns one override snapshot and three write-once cells.
//! The first caller of each accessor computes the value; concurrent callers
//! block until it is ready, and every later call returns the same value.
//! Device and host cells are filled from the descriptor of whichever module
//! asks first, since base addresses and sanitizer settings are fixed for a
//! whole build.

use crate::env::EnvOverrides;
use crate::flags::{self, DerivedFlagSet};
use crate::target::TargetDescriptor;
use serde::Serialize;
use std::sync::OnceLock;

/// Flags to append to one module's compile and assemble lines.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ModuleFlags {
    pub cflags: Vec<String>,
    pub asflags: Vec<String>,
}

#[derive(Debug)]
pub struct FlagContext {
    env: EnvOverrides,
    global: OnceLock<DerivedFlagSet>,
    device: OnceLock<Vec<String>>,
    host: OnceLock<Vec<String>>,
}

impl FlagContext {
    pub fn new(env: EnvOverrides) -> Self {
        Self {
            env,
            global: OnceLock::new(),
            device: OnceLock::new(),
            host: OnceLock::new(),
        }
    }

    pub fn overrides(&self) -> &EnvOverrides {
        &self.env
    }

    pub fn global_flags(&self) -> &DerivedFlagSet {
        if let Some(set) = self.global.get() {
            log::trace!("global flags: cached");
            return set;
        }
        self.global.get_or_init(|| {
            let set = flags::derive_global_flags(&self.env);
            log::debug!(
                "computed global flags ({} compile, {} assemble)",
                set.compile_definitions.len(),
                set.assemble_definitions.len()
            );
            set
        })
    }

    pub fn device_flags(&self, target: &TargetDescriptor) -> &[String] {
        self.device.get_or_init(|| {
            let cflags = flags::derive_device_flags(&self.env, target);
            log::debug!("computed device flags: {}", cflags.join(" "));
            cflags
        })
    }

    pub fn host_flags(&self, target: &TargetDescriptor) -> &[String] {
        self.host.get_or_init(|| {
            let cflags = flags::derive_host_flags(&self.env, target);
            log::debug!("computed host flags: {}", cflags.join(" "));
            cflags
        })
    }

    /// Global flags, then device flags if `target` is a device, then host
    /// flags if it is a host.
    pub fn module_flags(&self, target: &TargetDescriptor) -> ModuleFlags {
        let global = self.global_flags();
        let mut out = ModuleFlags {
            cflags: global.compile_definitions.clone(),
            asflags: global.assemble_definitions.clone(),
        };
        if target.is_device {
            out.cflags.extend_from_slice(self.device_flags(target));
        }
        if target.is_host {
            out.cflags.extend_from_slice(self.host_flags(target));
        }
        out
    }
}
