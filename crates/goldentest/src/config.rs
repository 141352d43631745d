// crates/goldentest/src/config.rs
// ============================================================================
// Module: Golden Configuration
// Description: Update-mode flag resolution and comparator configuration.
// Purpose: Resolve process-wide flags once and hand them to comparators as values.
// Dependencies: std, tracing
// ============================================================================

//! ## Overview
//! Update mode is driven by a boolean flag named `update`. Flags come from a
//! [`FlagRegistry`]; the default registry reads `GOLDEN_<NAME>` environment
//! variables because the libtest runner rejects unknown command-line options.
//! A flag enables update mode only when it is registered and truthy.
//!
//! [`GoldenConfig`] captures the resolved mode together with the fixture
//! directory so the comparator never consults global state after setup.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use goldentest_fixture::DEFAULT_FIXTURE_DIR;
use tracing::debug;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Name of the flag that enables update mode.
pub const UPDATE_FLAG: &str = "update";
/// Environment variable prefix used by [`EnvFlagRegistry`].
pub const ENV_FLAG_PREFIX: &str = "GOLDEN_";
/// Environment variable backing the update flag.
pub const UPDATE_ENV_VAR: &str = "GOLDEN_UPDATE";

// ============================================================================
// SECTION: Flag Registries
// ============================================================================

/// Source of named command-line style flags.
pub trait FlagRegistry {
    /// Returns the raw value of `name`, or `None` when the flag is not registered.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Flag registry backed by `GOLDEN_<NAME>` environment variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvFlagRegistry;

impl EnvFlagRegistry {
    /// Returns the environment variable consulted for `name`.
    #[must_use]
    pub fn env_var_name(name: &str) -> String {
        format!("{ENV_FLAG_PREFIX}{}", name.to_ascii_uppercase().replace('-', "_"))
    }
}

impl FlagRegistry for EnvFlagRegistry {
    fn lookup(&self, name: &str) -> Option<String> {
        env::var_os(Self::env_var_name(name)).map(|value| value.to_string_lossy().into_owned())
    }
}

/// Flag registry with explicitly registered values.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticFlagRegistry {
    /// Registered flags keyed by name.
    flags: BTreeMap<String, String>,
}

impl StaticFlagRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `name` with `value`, replacing any prior value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.flags.insert(name.into(), value.into());
        self
    }
}

impl FlagRegistry for StaticFlagRegistry {
    fn lookup(&self, name: &str) -> Option<String> {
        self.flags.get(name).cloned()
    }
}

/// Returns true for `1`, `true`, `yes`, or `on`, ignoring case and surrounding whitespace.
#[must_use]
pub fn parse_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

// ============================================================================
// SECTION: Update Mode
// ============================================================================

/// Whether golden comparisons assert against fixtures or regenerate them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdateMode {
    /// Compare actual values with stored fixtures.
    #[default]
    Assert,
    /// Overwrite fixtures with actual values.
    Update,
}

impl UpdateMode {
    /// Resolves the mode from the `update` flag of `registry`.
    #[must_use]
    pub fn resolve(registry: &dyn FlagRegistry) -> Self {
        let mode = match registry.lookup(UPDATE_FLAG) {
            Some(raw) if parse_truthy(&raw) => Self::Update,
            _ => Self::Assert,
        };
        debug!(update = mode.is_update(), "resolved golden update mode");
        mode
    }

    /// Returns true in update mode.
    #[must_use]
    pub const fn is_update(self) -> bool {
        matches!(self, Self::Update)
    }
}

// ============================================================================
// SECTION: Golden Configuration
// ============================================================================

/// Settings fixed at comparator construction.
///
/// # Invariants
/// - `update_mode` is resolved before the comparator exists and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenConfig {
    /// Directory holding fixtures, relative to the test working directory.
    pub fixture_dir: PathBuf,
    /// Resolved update mode.
    pub update_mode: UpdateMode,
}

impl GoldenConfig {
    /// Resolves configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_registry(&EnvFlagRegistry)
    }

    /// Resolves configuration from an explicit flag registry.
    #[must_use]
    pub fn from_registry(registry: &dyn FlagRegistry) -> Self {
        Self {
            update_mode: UpdateMode::resolve(registry),
            ..Self::default()
        }
    }

    /// Overrides the fixture directory.
    #[must_use]
    pub fn with_fixture_dir(mut self, fixture_dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = fixture_dir.into();
        self
    }

    /// Overrides the update mode.
    #[must_use]
    pub fn with_update_mode(mut self, update_mode: UpdateMode) -> Self {
        self.update_mode = update_mode;
        self
    }
}

impl Default for GoldenConfig {
    fn default() -> Self {
        Self {
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            update_mode: UpdateMode::Assert,
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
