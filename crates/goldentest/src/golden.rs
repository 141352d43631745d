// crates/goldentest/src/golden.rs
// ============================================================================
// Module: Golden Comparator
// Description: Compares actual values with fixtures or regenerates fixtures.
// Purpose: Implement the update/assert protocol for golden-file tests.
// Dependencies: goldentest-fixture, tracing
// ============================================================================

//! ## Overview
//! [`Golden`] holds a fixture store and an update mode fixed at construction.
//! Each comparison is self-contained: in update mode the actual value is
//! rendered and written, replacing the fixture, and no comparison happens;
//! in assert mode the fixture is read fresh, the actual value is rendered
//! with the same format dispatch, and the two byte strings must be equal.
//!
//! Fixture I/O, serialization, and unsupported-type failures are fatal.
//! Content mismatches are reported separately so callers can keep going.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use goldentest_fixture::DirFixtureStore;
use goldentest_fixture::FixtureStore;
use tracing::debug;
use tracing::info;
use tracing::warn;

use crate::GoldenError;
use crate::config::GoldenConfig;
use crate::config::UpdateMode;
use crate::format::FixtureFormat;
use crate::value::IntoGoldenValue;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Result of a successful golden comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoldenOutcome {
    /// Update mode rewrote the fixture.
    Updated,
    /// Assert mode found the fixture equal to the actual value.
    Matched,
}

/// A fixture whose stored content differs from the actual value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoldenMismatch {
    /// Fixture filename.
    pub filename: String,
    /// Stored fixture content.
    pub expected: String,
    /// Rendered actual value.
    pub actual: String,
    /// Caller-supplied failure context.
    pub context: Option<String>,
}

impl fmt::Display for GoldenMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "golden mismatch for '{}'", self.filename)?;
        writeln!(f, "expected: {}", self.expected)?;
        write!(f, "actual: {}", self.actual)?;
        if let Some(context) = &self.context {
            write!(f, "\ncontext: {context}")?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Golden Comparator
// ============================================================================

/// Golden-file comparator.
///
/// # Invariants
/// - `update_mode` never changes after construction.
/// - Fixture content is never cached; every call reads or writes the store.
#[derive(Debug, Clone)]
pub struct Golden<S = DirFixtureStore> {
    /// Store holding fixture bytes.
    store: S,
    /// Mode resolved at construction.
    update_mode: UpdateMode,
}

impl Golden<DirFixtureStore> {
    /// Creates a comparator over the configured fixture directory.
    #[must_use]
    pub fn new(config: GoldenConfig) -> Self {
        Self::with_store(DirFixtureStore::new(config.fixture_dir), config.update_mode)
    }

    /// Creates a comparator over `testdata`, resolving update mode from the environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GoldenConfig::from_env())
    }
}

impl Default for Golden<DirFixtureStore> {
    fn default() -> Self {
        Self::new(GoldenConfig::default())
    }
}

impl<S: FixtureStore> Golden<S> {
    /// Creates a comparator over an explicit store.
    #[must_use]
    pub const fn with_store(store: S, update_mode: UpdateMode) -> Self {
        Self {
            store,
            update_mode,
        }
    }

    /// Returns the mode fixed at construction.
    #[must_use]
    pub const fn update_mode(&self) -> UpdateMode {
        self.update_mode
    }

    /// Returns the underlying fixture store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Compares `actual` with the fixture `filename`, or rewrites it in update mode.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::Mismatch`] when the fixture differs, and a fatal
    /// [`GoldenError`] for I/O, serialization, or unsupported-type failures.
    pub fn check(
        &self,
        filename: &str,
        actual: impl IntoGoldenValue,
    ) -> Result<GoldenOutcome, GoldenError> {
        self.check_with(filename, actual, None)
    }

    /// Same as [`Golden::check`], attaching `context` to any mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::Mismatch`] when the fixture differs, and a fatal
    /// [`GoldenError`] for I/O, serialization, or unsupported-type failures.
    pub fn check_with(
        &self,
        filename: &str,
        actual: impl IntoGoldenValue,
        context: Option<String>,
    ) -> Result<GoldenOutcome, GoldenError> {
        let format = FixtureFormat::for_filename(filename);

        if self.update_mode.is_update() {
            let value = actual.into_golden_value()?;
            let kind = value.kind();
            let rendered = format.render(filename, value)?;
            self.store.write(filename, &rendered)?;
            info!(fixture = filename, kind, bytes = rendered.len(), "updated golden fixture");
            return Ok(GoldenOutcome::Updated);
        }

        let expected = self.store.read(filename)?;
        let rendered = format.render(filename, actual.into_golden_value()?)?;
        if expected == rendered {
            debug!(fixture = filename, "golden fixture matched");
            return Ok(GoldenOutcome::Matched);
        }

        warn!(fixture = filename, "golden fixture mismatch");
        let (expected, actual) = display_sides(&expected, &rendered);
        Err(GoldenError::Mismatch(Box::new(GoldenMismatch {
            filename: filename.to_string(),
            expected,
            actual,
            context,
        })))
    }

    /// Asserts that `actual` matches the fixture `filename`, or rewrites it in update mode.
    ///
    /// # Panics
    ///
    /// Panics on a content mismatch or on any fatal fixture, serialization, or
    /// unsupported-type error.
    #[track_caller]
    pub fn assert_golden(&self, filename: &str, actual: impl IntoGoldenValue) {
        report(self.check_with(filename, actual, None));
    }

    /// Same as [`Golden::assert_golden`], attaching formatted failure context.
    ///
    /// # Panics
    ///
    /// Panics on a content mismatch or on any fatal fixture, serialization, or
    /// unsupported-type error.
    #[track_caller]
    pub fn assert_golden_with(
        &self,
        filename: &str,
        actual: impl IntoGoldenValue,
        context: fmt::Arguments<'_>,
    ) {
        report(self.check_with(filename, actual, Some(context.to_string())));
    }
}

// ============================================================================
// SECTION: Reporting
// ============================================================================

/// Renders both sides of a mismatch for display.
///
/// Sides are shown as text when both are valid UTF-8; otherwise both are
/// shown with non-ASCII bytes escaped so distinct bytes never print alike.
fn display_sides(expected: &[u8], actual: &[u8]) -> (String, String) {
    match (std::str::from_utf8(expected), std::str::from_utf8(actual)) {
        (Ok(expected), Ok(actual)) => (expected.to_string(), actual.to_string()),
        _ => (expected.escape_ascii().to_string(), actual.escape_ascii().to_string()),
    }
}

/// Converts a comparison result into a test failure.
#[track_caller]
#[allow(clippy::panic, reason = "Golden assertions fail tests by panicking.")]
fn report(result: Result<GoldenOutcome, GoldenError>) {
    match result {
        Ok(_) => {}
        Err(GoldenError::Mismatch(mismatch)) => panic!("{mismatch}"),
        Err(err) => panic!("golden fixture error: {err}"),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
