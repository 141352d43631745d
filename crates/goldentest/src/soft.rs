// crates/goldentest/src/soft.rs
// ============================================================================
// Module: Soft Golden Assertions
// Description: Golden checks that record mismatches and keep the test running.
// Purpose: Separate recoverable mismatches from fatal fixture errors.
// Dependencies: goldentest-fixture
// ============================================================================

//! ## Overview
//! [`SoftGolden`] runs many golden checks in one test. Fatal errors still abort
//! immediately, but mismatches are collected and reported together by
//! [`SoftGolden::finish`]. Dropping a `SoftGolden` that still holds mismatches
//! fails the test, so recorded mismatches cannot be lost.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt::Write as _;

use goldentest_fixture::DirFixtureStore;
use goldentest_fixture::FixtureStore;

use crate::GoldenError;
use crate::golden::Golden;
use crate::golden::GoldenMismatch;
use crate::golden::GoldenOutcome;
use crate::value::IntoGoldenValue;

// ============================================================================
// SECTION: Soft Golden
// ============================================================================

/// Golden comparator that defers mismatch failures.
#[derive(Debug)]
pub struct SoftGolden<S: FixtureStore = DirFixtureStore> {
    /// Comparator used for each check.
    golden: Golden<S>,
    /// Mismatches recorded so far.
    mismatches: Vec<GoldenMismatch>,
}

impl<S: FixtureStore> SoftGolden<S> {
    /// Wraps a comparator.
    #[must_use]
    pub const fn new(golden: Golden<S>) -> Self {
        Self {
            golden,
            mismatches: Vec::new(),
        }
    }

    /// Runs a golden check, recording a mismatch instead of failing.
    ///
    /// Returns `None` when a mismatch was recorded.
    ///
    /// # Panics
    ///
    /// Panics immediately on fatal fixture, serialization, or unsupported-type errors.
    #[track_caller]
    pub fn check(&mut self, filename: &str, actual: impl IntoGoldenValue) -> Option<GoldenOutcome> {
        self.check_with(filename, actual, None)
    }

    /// Same as [`SoftGolden::check`], attaching context to a recorded mismatch.
    ///
    /// # Panics
    ///
    /// Panics immediately on fatal fixture, serialization, or unsupported-type errors.
    #[track_caller]
    #[allow(clippy::panic, reason = "Fatal golden errors abort the current test.")]
    pub fn check_with(
        &mut self,
        filename: &str,
        actual: impl IntoGoldenValue,
        context: Option<String>,
    ) -> Option<GoldenOutcome> {
        match self.golden.check_with(filename, actual, context) {
            Ok(outcome) => Some(outcome),
            Err(GoldenError::Mismatch(mismatch)) => {
                self.mismatches.push(*mismatch);
                None
            }
            Err(err) => panic!("golden fixture error: {err}"),
        }
    }

    /// Returns the mismatches recorded so far.
    #[must_use]
    pub fn mismatches(&self) -> &[GoldenMismatch] {
        &self.mismatches
    }

    /// Returns true when no mismatch has been recorded.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.mismatches.is_empty()
    }

    /// Consumes the wrapper and returns the recorded mismatches without failing.
    #[must_use]
    pub fn into_mismatches(mut self) -> Vec<GoldenMismatch> {
        std::mem::take(&mut self.mismatches)
    }

    /// Fails the test when any mismatch was recorded.
    ///
    /// # Panics
    ///
    /// Panics with every recorded mismatch when at least one exists.
    #[track_caller]
    #[allow(clippy::panic, reason = "Recorded golden mismatches fail the current test.")]
    pub fn finish(self) {
        let mismatches = self.into_mismatches();
        if !mismatches.is_empty() {
            panic!("{}", summarize(&mismatches));
        }
    }
}

impl<S: FixtureStore> Drop for SoftGolden<S> {
    #[allow(clippy::panic, reason = "Unreported golden mismatches must fail the test.")]
    fn drop(&mut self) {
        if !self.mismatches.is_empty() && !std::thread::panicking() {
            panic!("{}", summarize(&self.mismatches));
        }
    }
}

/// Joins mismatch reports into a single failure message.
fn summarize(mismatches: &[GoldenMismatch]) -> String {
    let mut message = format!("{} golden mismatch(es)", mismatches.len());
    for mismatch in mismatches {
        let _ = write!(message, "\n\n{mismatch}");
    }
    message
}
