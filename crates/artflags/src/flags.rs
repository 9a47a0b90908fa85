//! Flag derivation.
//!
//! Pure functions from an [`EnvOverrides`] snapshot (and, for the per-target
//! sets, a [`TargetDescriptor`]) to ordered lists of compiler and assembler
//! definitions. Nothing here is validated: GC types, barrier types and
//! address deltas are passed to the compiler verbatim.

use crate::env::{self, EnvOverrides};
use crate::target::{Arch, TargetDescriptor};

pub const DEFAULT_GC_TYPE: &str = "CMS";
pub const DEBUG_GC_TYPE: &str = "SS";
pub const DEFAULT_IMT_SIZE: &str = "43";
pub const DEFAULT_READ_BARRIER_TYPE: &str = "BAKER";
pub const DEFAULT_MIN_BASE_ADDRESS_DELTA: &str = "-0x1000000";
pub const DEFAULT_MAX_BASE_ADDRESS_DELTA: &str = "0x1000000";

/// Frame size limit for unsanitized builds.
pub const FRAME_SIZE_LIMIT: u32 = 1736;
/// Sanitizers instrument frames, so device builds using them get more room.
pub const SANITIZED_FRAME_SIZE_LIMIT: u32 = 6400;

/// Global compile and assemble definitions.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DerivedFlagSet {
    pub compile_definitions: Vec<String>,
    pub assemble_definitions: Vec<String>,
}

impl DerivedFlagSet {
    fn both(&mut self, flag: String) {
        self.compile_definitions.push(flag.clone());
        self.assemble_definitions.push(flag);
    }
}

/// Flags applied to every module regardless of target.
pub fn derive_global_flags(env: &EnvOverrides) -> DerivedFlagSet {
    let mut set = DerivedFlagSet::default();

    let mut gc_type = env.get_or(env::DEFAULT_GC_TYPE, DEFAULT_GC_TYPE);
    let mut tlab = false;
    if env.is_true(env::TEST_DEBUG_GC) {
        gc_type = DEBUG_GC_TYPE;
        tlab = true;
    }

    set.compile_definitions
        .push(format!("-DART_DEFAULT_GC_TYPE_IS_{gc_type}"));
    if tlab {
        set.compile_definitions.push("-DART_USE_TLAB=1".to_string());
    }

    // Keyed on the GC type override, not a dedicated IMT key. Kept as-is so the
    // generated flags stay identical to existing builds.
    let imt_size = env.get_or(env::DEFAULT_GC_TYPE, DEFAULT_IMT_SIZE);
    set.compile_definitions.push(format!("-DIMT_SIZE={imt_size}"));

    if env.is_true(env::HEAP_POISONING) {
        set.both("-DART_HEAP_POISONING=1".to_string());
    }

    if env.is_true(env::USE_READ_BARRIER) {
        // BAKER, BROOKS or TABLELOOKUP.
        let barrier = env.get_or(env::READ_BARRIER_TYPE, DEFAULT_READ_BARRIER_TYPE);
        set.both("-DART_USE_READ_BARRIER=1".to_string());
        set.both(format!("-DART_READ_BARRIER_TYPE_IS_{barrier}=1"));

        // -fstack-protector-strong is a major slowdown with read barriers.
        set.compile_definitions.push("-fstack-protector".to_string());
    }

    set.compile_definitions.extend(
        Arch::ALL
            .iter()
            .map(|a| format!("-DART_STACK_OVERFLOW_GAP_{}={}", a.name(), a.stack_overflow_gap())),
    );

    set
}

/// Extra compile flags for device modules.
pub fn derive_device_flags(env: &EnvOverrides, target: &TargetDescriptor) -> Vec<String> {
    let limit = if target.sanitizer_enabled {
        SANITIZED_FRAME_SIZE_LIMIT
    } else {
        FRAME_SIZE_LIMIT
    };

    let mut cflags = frame_size_flags(limit);
    cflags.push(format!("-DART_BASE_ADDRESS={}", target.base_address_device));
    if env.is_true(env::TARGET_LINUX) {
        cflags.push("-DART_TARGET_LINUX".to_string());
    } else {
        cflags.push("-DART_TARGET_ANDROID".to_string());
    }
    cflags.extend(delta_flags(
        env,
        env::TARGET_MIN_BASE_ADDRESS_DELTA,
        env::TARGET_MAX_BASE_ADDRESS_DELTA,
    ));
    cflags
}

/// Extra compile flags for host modules. Host builds never widen the frame limit.
pub fn derive_host_flags(env: &EnvOverrides, target: &TargetDescriptor) -> Vec<String> {
    let mut cflags = frame_size_flags(FRAME_SIZE_LIMIT);
    cflags.push(format!("-DART_BASE_ADDRESS={}", target.base_address_host));
    cflags.push("-DART_DEFAULT_INSTRUCTION_SET_FEATURES=default".to_string());
    cflags.extend(delta_flags(
        env,
        env::HOST_MIN_BASE_ADDRESS_DELTA,
        env::HOST_MAX_BASE_ADDRESS_DELTA,
    ));
    cflags
}

fn frame_size_flags(limit: u32) -> Vec<String> {
    vec![
        format!("-Wframe-larger-than={limit}"),
        format!("-DART_FRAME_SIZE_LIMIT={limit}"),
    ]
}

fn delta_flags(env: &EnvOverrides, min_key: &str, max_key: &str) -> [String; 2] {
    [
        format!(
            "-DART_BASE_ADDRESS_MIN_DELTA={}",
            env.get_or(min_key, DEFAULT_MIN_BASE_ADDRESS_DELTA)
        ),
        format!(
            "-DART_BASE_ADDRESS_MAX_DELTA={}",
            env.get_or(max_key, DEFAULT_MAX_BASE_ADDRESS_DELTA)
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAPS: [&str; 6] = [
        "-DART_STACK_OVERFLOW_GAP_arm=8192",
        "-DART_STACK_OVERFLOW_GAP_arm64=8192",
        "-DART_STACK_OVERFLOW_GAP_mips=16384",
        "-DART_STACK_OVERFLOW_GAP_mips64=16384",
        "-DART_STACK_OVERFLOW_GAP_x86=8192",
        "-DART_STACK_OVERFLOW_GAP_x86_64=8192",
    ];

    fn overrides(pairs: &[(&str, &str)]) -> EnvOverrides {
        pairs.iter().copied().collect()
    }

    fn count(flags: &[String], flag: &str) -> usize {
        flags.iter().filter(|f| *f == flag).count()
    }

    #[test]
    fn test_global_defaults() {
        let set = derive_global_flags(&EnvOverrides::new());

        let mut expected = vec![
            "-DART_DEFAULT_GC_TYPE_IS_CMS".to_string(),
            "-DIMT_SIZE=43".to_string(),
        ];
        expected.extend(GAPS.iter().map(ToString::to_string));
        assert_eq!(set.compile_definitions, expected);
        assert!(set.assemble_definitions.is_empty());

        for gap in GAPS {
            assert_eq!(count(&set.compile_definitions, gap), 1);
        }
    }

    #[test]
    fn test_debug_gc_overrides_explicit_gc_type() {
        let set = derive_global_flags(&overrides(&[
            (env::DEFAULT_GC_TYPE, "GSS"),
            (env::TEST_DEBUG_GC, "true"),
        ]));
        let c = &set.compile_definitions;
        assert_eq!(count(c, "-DART_DEFAULT_GC_TYPE_IS_SS"), 1);
        assert_eq!(count(c, "-DART_DEFAULT_GC_TYPE_IS_GSS"), 0);
        assert_eq!(count(c, "-DART_USE_TLAB=1"), 1);
    }

    #[test]
    fn test_imt_size_reads_gc_type_key() {
        let set = derive_global_flags(&overrides(&[(env::DEFAULT_GC_TYPE, "GSS")]));
        assert_eq!(count(&set.compile_definitions, "-DIMT_SIZE=GSS"), 1);
    }

    #[test]
    fn test_heap_poisoning_in_both_sets() {
        let set = derive_global_flags(&overrides(&[(env::HEAP_POISONING, "true")]));
        assert_eq!(count(&set.compile_definitions, "-DART_HEAP_POISONING=1"), 1);
        assert_eq!(set.assemble_definitions, vec!["-DART_HEAP_POISONING=1"]);
    }

    #[test]
    fn test_heap_poisoning_correct_spelling_is_ignored() {
        let set = derive_global_flags(&overrides(&[("ART_HEAP_POISONING", "true")]));
        assert!(set.assemble_definitions.is_empty());
    }

    #[test]
    fn test_read_barrier_default_type() {
        let base = derive_global_flags(&EnvOverrides::new());
        let set = derive_global_flags(&overrides(&[(env::USE_READ_BARRIER, "true")]));

        assert_eq!(
            set.assemble_definitions,
            vec![
                "-DART_USE_READ_BARRIER=1",
                "-DART_READ_BARRIER_TYPE_IS_BAKER=1"
            ]
        );
        // Two definitions plus the stack protector downgrade.
        assert_eq!(
            set.compile_definitions.len(),
            base.compile_definitions.len() + 3
        );
        assert_eq!(count(&set.compile_definitions, "-DART_USE_READ_BARRIER=1"), 1);
        assert_eq!(
            count(&set.compile_definitions, "-DART_READ_BARRIER_TYPE_IS_BAKER=1"),
            1
        );
        assert_eq!(count(&set.compile_definitions, "-fstack-protector"), 1);
        assert_eq!(count(&set.assemble_definitions, "-fstack-protector"), 0);
    }

    #[test]
    fn test_read_barrier_type_passed_through() {
        let set = derive_global_flags(&overrides(&[
            (env::USE_READ_BARRIER, "true"),
            (env::READ_BARRIER_TYPE, "NOT_A_BARRIER"),
        ]));
        assert!(set
            .assemble_definitions
            .contains(&"-DART_READ_BARRIER_TYPE_IS_NOT_A_BARRIER=1".to_string()));
    }

    #[test]
    fn test_barrier_type_without_toggle_does_nothing() {
        let set = derive_global_flags(&overrides(&[(env::READ_BARRIER_TYPE, "BROOKS")]));
        assert_eq!(set, derive_global_flags(&EnvOverrides::new()));
    }

    #[test]
    fn test_device_defaults() {
        let flags = derive_device_flags(
            &EnvOverrides::new(),
            &TargetDescriptor::device("0x70000000"),
        );
        assert_eq!(
            flags,
            vec![
                "-Wframe-larger-than=1736",
                "-DART_FRAME_SIZE_LIMIT=1736",
                "-DART_BASE_ADDRESS=0x70000000",
                "-DART_TARGET_ANDROID",
                "-DART_BASE_ADDRESS_MIN_DELTA=-0x1000000",
                "-DART_BASE_ADDRESS_MAX_DELTA=0x1000000",
            ]
        );
    }

    #[test]
    fn test_device_sanitizer_widens_frame_limit() {
        let target = TargetDescriptor::device("0x70000000").with_sanitizer(true);
        let flags = derive_device_flags(&EnvOverrides::new(), &target);
        assert_eq!(flags[0], "-Wframe-larger-than=6400");
        assert_eq!(flags[1], "-DART_FRAME_SIZE_LIMIT=6400");
    }

    #[test]
    fn test_device_linux_and_deltas() {
        let env = overrides(&[
            (env::TARGET_LINUX, "true"),
            (env::TARGET_MIN_BASE_ADDRESS_DELTA, "-0x2000"),
            (env::TARGET_MAX_BASE_ADDRESS_DELTA, "0x3000"),
            (env::HOST_MAX_BASE_ADDRESS_DELTA, "0x9999"),
        ]);
        let flags = derive_device_flags(&env, &TargetDescriptor::device("0x1"));
        assert_eq!(count(&flags, "-DART_TARGET_LINUX"), 1);
        assert_eq!(count(&flags, "-DART_TARGET_ANDROID"), 0);
        assert_eq!(count(&flags, "-DART_BASE_ADDRESS_MIN_DELTA=-0x2000"), 1);
        assert_eq!(count(&flags, "-DART_BASE_ADDRESS_MAX_DELTA=0x3000"), 1);
    }

    #[test]
    fn test_host_ignores_sanitizer() {
        let target = TargetDescriptor::host("0x60000000").with_sanitizer(true);
        let flags = derive_host_flags(
            &overrides(&[(env::HOST_MIN_BASE_ADDRESS_DELTA, "-0x10")]),
            &target,
        );
        assert_eq!(
            flags,
            vec![
                "-Wframe-larger-than=1736",
                "-DART_FRAME_SIZE_LIMIT=1736",
                "-DART_BASE_ADDRESS=0x60000000",
                "-DART_DEFAULT_INSTRUCTION_SET_FEATURES=default",
                "-DART_BASE_ADDRESS_MIN_DELTA=-0x10",
                "-DART_BASE_ADDRESS_MAX_DELTA=0x1000000",
            ]
        );
    }
}
