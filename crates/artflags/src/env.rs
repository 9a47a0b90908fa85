//! Environment overrides.
//!
//! Overrides are captured once into an [`EnvOverrides`] snapshot. The flag
//! engine only ever reads the snapshot, never the live process environment.

use std::collections::BTreeMap;

pub const DEFAULT_GC_TYPE: &str = "ART_DEFAULT_GC_TYPE";
pub const TEST_DEBUG_GC: &str = "ART_TEST_DEBUG_GC";
/// Spelled the way the build has always spelled it.
pub const HEAP_POISONING: &str = "ART_HEAP_POISIONING";
pub const USE_READ_BARRIER: &str = "ART_USE_READ_BARRIER";
pub const READ_BARRIER_TYPE: &str = "ART_READ_BARRIER_TYPE";
pub const TARGET_LINUX: &str = "ART_TARGET_LINUX";
pub const TARGET_MIN_BASE_ADDRESS_DELTA: &str = "LIBART_IMG_TARGET_MIN_BASE_ADDRESS_DELTA";
pub const TARGET_MAX_BASE_ADDRESS_DELTA: &str = "LIBART_IMG_TARGET_MAX_BASE_ADDRESS_DELTA";
pub const HOST_MIN_BASE_ADDRESS_DELTA: &str = "LIBART_IMG_HOST_MIN_BASE_ADDRESS_DELTA";
pub const HOST_MAX_BASE_ADDRESS_DELTA: &str = "LIBART_IMG_HOST_MAX_BASE_ADDRESS_DELTA";

/// Every key the flag engine consults.
pub const KNOWN_KEYS: &[&str] = &[
    DEFAULT_GC_TYPE,
    TEST_DEBUG_GC,
    HEAP_POISONING,
    USE_READ_BARRIER,
    READ_BARRIER_TYPE,
    TARGET_LINUX,
    TARGET_MIN_BASE_ADDRESS_DELTA,
    TARGET_MAX_BASE_ADDRESS_DELTA,
    HOST_MIN_BASE_ADDRESS_DELTA,
    HOST_MAX_BASE_ADDRESS_DELTA,
];

/// A place overrides can be looked up from.
pub trait OverrideSource {
    /// Returns the raw value for `key`, or `None` if unset.
    fn get_override(&self, key: &str) -> Option<String>;
}

/// The live process environment.
pub struct ProcessEnv;

impl OverrideSource for ProcessEnv {
    fn get_override(&self, key: &str) -> Option<String> {
        match std::env::var_os(key)?.into_string() {
            Ok(value) => Some(value),
            Err(raw) => {
                log::warn!("{key} is not valid UTF-8 ({raw:?}); using the default");
                None
            }
        }
    }
}

impl OverrideSource for BTreeMap<String, String> {
    fn get_override(&self, key: &str) -> Option<String> {
        self.get(key).cloned()
    }
}

/// Immutable snapshot of the overrides in effect for one build.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    values: BTreeMap<String, String>,
}

impl EnvOverrides {
    /// Empty snapshot: every lookup falls back to its default.
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the known keys from `source`. Empty values are treated as unset.
    pub fn capture(source: &dyn OverrideSource) -> Self {
        let values = KNOWN_KEYS
            .iter()
            .filter_map(|key| {
                source
                    .get_override(key)
                    .filter(|v| !v.is_empty())
                    .map(|v| ((*key).to_string(), v))
            })
            .collect();
        Self { values }
    }

    /// Layer `pairs` on top of this snapshot, later pairs winning.
    #[must_use]
    pub fn layered<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in pairs {
            let v = v.into();
            let k = k.into();
            if v.is_empty() {
                self.values.remove(&k);
            } else {
                self.values.insert(k, v);
            }
        }
        self
    }

    /// Value of `key`, or `default` when unset or empty.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.values.get(key).map_or(default, String::as_str)
    }

    /// A toggle is on only when its value is exactly `true`.
    pub fn is_true(&self, key: &str) -> bool {
        self.values.get(key).is_some_and(|v| v == "true")
    }

    /// All set overrides in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvOverrides {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::new().layered(iter)
    }
}

/// Parse a `KEY=VALUE` pair as given on the command line.
pub fn parse_assignment(s: &str) -> Option<(String, String)> {
    let (k, v) = s.split_once('=')?;
    let k = k.trim();
    if k.is_empty() {
        return None;
    }
    Some((k.to_string(), v.to_string()))
}
