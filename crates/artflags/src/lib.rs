//! # artflags
//!
//! Compiler flags and Makefile variables for ART runtime builds.
//!
//! ## Flow
//!
//! 1. Capture overrides once into an [`EnvOverrides`] snapshot.
//! 2. Wrap it in a [`FlagContext`], which memoizes the global, device and host
//!    flag sets.
//! 3. Ask the context for each module's [`ModuleFlags`].
//! 4. Emit build variables through a [`VariableSink`] with [`emit_make_vars`].
//!
//! ```
//! use artflags::{EnvOverrides, FlagContext, TargetDescriptor};
//!
//! let ctx = FlagContext::new(EnvOverrides::new());
//! let flags = ctx.module_flags(&TargetDescriptor::device("0x70000000"));
//! assert!(flags.cflags.contains(&"-DART_TARGET_ANDROID".to_string()));
//! ```

pub mod assets;
pub mod config;
pub mod context;
pub mod env;
pub mod flags;
pub mod target;
pub mod toolchain;
pub mod vars;

pub use assets::{TestAssetMap, TestMap, build_test_asset_copy_directives, derive_test_list};
pub use config::{BuildConfig, ConfigError};
pub use context::{FlagContext, ModuleFlags};
pub use env::{EnvOverrides, OverrideSource, ProcessEnv};
pub use flags::{DerivedFlagSet, derive_device_flags, derive_global_flags, derive_host_flags};
pub use target::{Arch, BuildTarget, Os, TargetDescriptor};
pub use toolchain::{Toolchain, ToolchainError, ToolchainResolver, ToolchainTable};
pub use vars::{MakeVars, VariableSink, emit_make_vars};
