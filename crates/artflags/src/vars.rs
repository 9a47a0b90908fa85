//! Makefile variables.

use crate::assets;
use crate::config::BuildConfig;
use crate::toolchain::{ToolchainError, ToolchainResolver};
use std::fmt::Write as _;

pub const HOST_BASE_ADDRESS_VAR: &str = "LIBART_IMG_HOST_BASE_ADDRESS";
pub const TARGET_BASE_ADDRESS_VAR: &str = "LIBART_IMG_TARGET_BASE_ADDRESS";
pub const TEST_LIST_PREFIX: &str = "ART_TEST_LIST_";
pub const TESTCASES_CONTENT_VAR: &str = "ART_TESTCASES_CONTENT";

/// Receives flat `name = value` build variables.
pub trait VariableSink {
    fn set_variable(&mut self, name: &str, value: String);
}

/// Collects variables in emission order and renders them as make assignments.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MakeVars {
    vars: Vec<(String, String)>,
}

impl MakeVars {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.vars.iter().map(|(n, _)| n.as_str())
    }

    /// One `NAME := value` line per variable.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (name, value) in &self.vars {
            let _ = writeln!(out, "{name} := {value}");
        }
        out
    }
}

impl VariableSink for MakeVars {
    fn set_variable(&mut self, name: &str, value: String) {
        self.vars.push((name.to_string(), value));
    }
}

/// Emit the runtime's build variables.
///
/// Order: base addresses, test lists, then the test case content list. The
/// content list needs the toolchain, so it is built before anything is
/// emitted; a resolver failure returns with `sink` untouched.
pub fn emit_make_vars(
    config: &BuildConfig,
    resolver: &dyn ToolchainResolver,
    sink: &mut dyn VariableSink,
) -> Result<(), ToolchainError> {
    let content =
        assets::build_test_asset_copy_directives(&config.test_assets, resolver, config.default_target)?;

    sink.set_variable(HOST_BASE_ADDRESS_VAR, config.host_base_address.clone());
    sink.set_variable(TARGET_BASE_ADDRESS_VAR, config.device_base_address.clone());

    let lists = assets::derive_test_list(&config.tests);
    for (suite, names) in lists {
        sink.set_variable(&format!("{TEST_LIST_PREFIX}{suite}"), names);
    }

    sink.set_variable(TESTCASES_CONTENT_VAR, content);

    log::info!(
        "emitted {} test list(s) and {} test asset(s)",
        config.tests.len(),
        config.test_assets.len()
    );
    Ok(())
}
