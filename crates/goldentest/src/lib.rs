// crates/goldentest/src/lib.rs
// ============================================================================
// Module: Goldentest Library
// Description: Golden-file comparisons with an explicit update mode.
// Purpose: Compare computed values against recorded fixtures or regenerate them.
// Dependencies: goldentest-fixture, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! A golden test serializes an actual value and compares it byte-for-byte with
//! a fixture recorded under `testdata`. When update mode is enabled the fixture
//! is rewritten from the actual value instead and no comparison happens.
//!
//! Update mode is resolved once, at setup, from the `update` flag
//! (`GOLDEN_UPDATE=1` in the environment) and is fixed for the lifetime of a
//! [`Golden`] instance.
//!
//! Filenames ending in `.json` hold 2-space indented JSON; every other fixture
//! holds raw bytes or text verbatim.
//!
//! ```no_run
//! use goldentest::Golden;
//! use goldentest::Json;
//! use goldentest::assert_golden;
//!
//! #[derive(serde::Serialize)]
//! struct Summary {
//!     name: &'static str,
//!     count: u32,
//! }
//!
//! let golden = Golden::from_env();
//! assert_golden!(golden, "summary.json", Json(Summary { name: "a", count: 1 }));
//! assert_golden!(golden, "greeting.txt", "hello", "greeting for {}", "a");
//! ```

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod format;
pub mod golden;
pub mod soft;
pub mod value;

// ============================================================================
// SECTION: Errors
// ============================================================================

use goldentest_fixture::FixtureError;
use thiserror::Error;

/// Errors raised by golden comparisons.
///
/// # Invariants
/// - [`GoldenError::Mismatch`] is the only recoverable variant; every other
///   variant aborts the current test.
/// - [`GoldenError::UnsupportedType`] always names the offending type.
#[derive(Debug, Error)]
pub enum GoldenError {
    /// Fixture could not be read or written.
    #[error(transparent)]
    Fixture(#[from] FixtureError),
    /// Actual value could not be encoded as JSON.
    #[error("failed to serialize actual value to JSON: {0}")]
    Serialization(String),
    /// Value type cannot be stored verbatim in a non-JSON fixture.
    #[error("unsupported value type for golden file '{filename}': {type_name}")]
    UnsupportedType {
        /// Fixture filename.
        filename: String,
        /// Rust type name of the rejected value.
        type_name: &'static str,
    },
    /// Stored fixture differs from the actual value.
    #[error("{0}")]
    Mismatch(Box<GoldenMismatch>),
}

impl GoldenError {
    /// Returns true when the error must abort the current test.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_mismatch()
    }

    /// Returns true when the error is a content mismatch.
    #[must_use]
    pub const fn is_mismatch(&self) -> bool {
        matches!(self, Self::Mismatch(_))
    }
}

// ============================================================================
// SECTION: Macros
// ============================================================================

/// Asserts that a value matches its golden fixture, or rewrites the fixture
/// in update mode.
///
/// Trailing arguments are formatted into failure context, as with
/// [`assert_eq!`].
///
/// ```no_run
/// # use goldentest::{Golden, assert_golden};
/// let golden = Golden::from_env();
/// assert_golden!(golden, "out.txt", "hello");
/// assert_golden!(golden, "out.txt", "hello", "case {}", 3);
/// ```
#[macro_export]
macro_rules! assert_golden {
    ($golden:expr, $filename:expr, $actual:expr $(,)?) => {
        $golden.assert_golden($filename, $actual)
    };
    ($golden:expr, $filename:expr, $actual:expr, $($context:tt)+) => {
        $golden.assert_golden_with($filename, $actual, ::std::format_args!($($context)+))
    };
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::EnvFlagRegistry;
pub use config::FlagRegistry;
pub use config::GoldenConfig;
pub use config::StaticFlagRegistry;
pub use config::UPDATE_ENV_VAR;
pub use config::UPDATE_FLAG;
pub use config::UpdateMode;
pub use config::parse_truthy;
pub use format::FixtureFormat;
pub use golden::Golden;
pub use golden::GoldenMismatch;
pub use golden::GoldenOutcome;
pub use goldentest_fixture::DirFixtureStore;
pub use goldentest_fixture::FixtureStore;
pub use goldentest_fixture::InMemoryFixtureStore;
pub use soft::SoftGolden;
pub use value::GoldenValue;
pub use value::IntoGoldenValue;
pub use value::Json;
