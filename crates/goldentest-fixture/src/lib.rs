// crates/goldentest-fixture/src/lib.rs
// ============================================================================
// Module: Goldentest Fixture Library
// Description: Filename-keyed byte storage for golden-file fixtures.
// Purpose: Provide the read/write collaborator used by golden comparisons.
// Dependencies: cap-std, thiserror, tracing
// ============================================================================

//! ## Overview
//! Fixtures are named blobs of bytes stored flat under a base directory
//! (`testdata` by default). This crate exposes the [`FixtureStore`] contract,
//! a capability-based on-disk implementation, and an in-memory store for
//! harness tests. Stores never cache content; every call is a fresh read or
//! write.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod store;

// ============================================================================
// SECTION: Errors
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by fixture stores.
///
/// # Invariants
/// - Every variant is fatal to the calling test; none describe content mismatches.
/// - Path-carrying variants always include the offending path.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Fixture name is empty or escapes the base directory.
    #[error("invalid fixture name: {0}")]
    InvalidName(String),
    /// Base directory is missing, unsafe, or inaccessible.
    #[error("invalid fixture directory '{}': {message}", path.display())]
    BaseDir {
        /// Base directory path.
        path: PathBuf,
        /// Underlying failure description.
        message: String,
    },
    /// Fixture could not be read.
    #[error("failed to read fixture '{}': {message}", path.display())]
    Read {
        /// Fixture path relative to the working directory.
        path: PathBuf,
        /// Underlying failure description.
        message: String,
    },
    /// Fixture could not be written.
    #[error("failed to write fixture '{}': {message}", path.display())]
    Write {
        /// Fixture path relative to the working directory.
        path: PathBuf,
        /// Underlying failure description.
        message: String,
    },
}

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use store::DEFAULT_FIXTURE_DIR;
pub use store::DirFixtureStore;
pub use store::FixtureStore;
pub use store::InMemoryFixtureStore;
pub use store::validate_fixture_name;
