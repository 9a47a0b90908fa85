//! Test case install lists.
//!
//! Everything here iterates in sorted key order so the generated variable
//! values are byte-identical between runs.

use crate::target::BuildTarget;
use crate::toolchain::{PREBUILT_TOOLS, ToolchainError, ToolchainResolver};
use std::collections::{BTreeMap, HashMap};

/// Destination path -> source path.
pub type TestAssetMap = HashMap<String, String>;
/// Suite name -> test names.
pub type TestMap = HashMap<String, Vec<String>>;

/// Build the space-joined `source:dest` copy list for the test cases
/// directory: data assets in destination order, then the prebuilt tools of
/// the default target's toolchain.
///
/// Sources are relative to the build root and destinations to the test cases
/// directory. Prebuilt tools keep their toolchain-relative path on both
/// sides (`<root>/bin/<triple>-<tool>:<root>/bin/<triple>-<tool>`), so tests
/// run from the test cases directory find them where the build has them.
///
/// Fails without producing any output if the toolchain cannot be resolved.
pub fn build_test_asset_copy_directives(
    assets: &TestAssetMap,
    resolver: &dyn ToolchainResolver,
    target: BuildTarget,
) -> Result<String, ToolchainError> {
    let toolchain = resolver.resolve(target.os, target.arch)?;

    let mut dests: Vec<&String> = assets.keys().collect();
    dests.sort();

    let mut directives: Vec<String> = dests
        .into_iter()
        .map(|dest| format!("{}:{}", assets[dest], dest))
        .collect();
    directives.extend(PREBUILT_TOOLS.iter().map(|tool| {
        let path = toolchain.tool_path(tool);
        format!("{path}:{path}")
    }));

    log::debug!(
        "{} test asset(s), {} prebuilt tool(s) from {}",
        assets.len(),
        PREBUILT_TOOLS.len(),
        toolchain.root
    );
    Ok(directives.join(" "))
}

/// One space-joined test list per suite, keyed (and ordered) by suite name.
pub fn derive_test_list(tests: &TestMap) -> BTreeMap<String, String> {
    tests
        .iter()
        .map(|(suite, names)| (suite.clone(), names.join(" ")))
        .collect()
}
