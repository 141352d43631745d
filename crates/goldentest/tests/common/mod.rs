// crates/goldentest/tests/common/mod.rs
// ============================================================================
// Module: Common Test Helpers
// Description: Shared setup for goldentest integration tests.
// Purpose: Provide isolated fixture directories and log capture.
// Dependencies: goldentest, tempfile, tracing-subscriber
// ============================================================================

//! ## Overview
//! Helpers shared by the integration test binaries: a temporary fixture
//! directory per test and a tracing subscriber that writes through the test
//! harness so logs only appear for failing tests.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use goldentest::Golden;
use goldentest::GoldenConfig;
use goldentest::UpdateMode;
use serde::Serialize;
use tempfile::TempDir;

// ============================================================================
// SECTION: Fixtures
// ============================================================================

/// Structured sample whose fields serialize in declaration order.
#[derive(Debug, Clone, Serialize)]
pub struct Record {
    /// Record name.
    pub name: String,
    /// Record count.
    pub count: u32,
}

impl Record {
    /// Builds a record.
    pub fn new(name: &str, count: u32) -> Self {
        Self {
            name: name.to_string(),
            count,
        }
    }
}

/// Temporary fixture directory with comparators in both modes.
pub struct FixtureDir {
    /// Owns the temporary directory for the lifetime of the test.
    temp: TempDir,
}

impl FixtureDir {
    /// Creates an empty temporary fixture directory.
    pub fn new() -> std::io::Result<Self> {
        init_tracing();
        Ok(Self {
            temp: tempfile::tempdir()?,
        })
    }

    /// Returns the fixture directory path.
    pub fn path(&self) -> PathBuf {
        self.temp.path().join("testdata")
    }

    /// Returns a comparator in the given mode over this directory.
    pub fn golden(&self, update_mode: UpdateMode) -> Golden {
        Golden::new(GoldenConfig::default().with_fixture_dir(self.path()).with_update_mode(update_mode))
    }

    /// Returns an update-mode comparator.
    pub fn updater(&self) -> Golden {
        self.golden(UpdateMode::Update)
    }

    /// Returns an assert-mode comparator.
    pub fn asserter(&self) -> Golden {
        self.golden(UpdateMode::Assert)
    }

    /// Reads a stored fixture directly from disk.
    pub fn read(&self, name: &str) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.path().join(name))
    }

    /// Seeds a fixture directly on disk.
    pub fn seed(&self, name: &str, bytes: &[u8]) -> std::io::Result<()> {
        std::fs::create_dir_all(self.path())?;
        std::fs::write(self.path().join(name), bytes)
    }
}

// ============================================================================
// SECTION: Logging
// ============================================================================

/// Installs a test-writer tracing subscriber once per test binary.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}
