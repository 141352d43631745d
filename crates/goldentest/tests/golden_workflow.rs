// crates/goldentest/tests/golden_workflow.rs
// ============================================================================
// Module: Golden Workflow Tests
// Description: End-to-end update and assert flows against on-disk fixtures.
// Purpose: Validate stored encodings, idempotence, and failure taxonomy.
// Dependencies: goldentest, tempfile
// ============================================================================

//! ## Overview
//! Each test owns a temporary `testdata` directory. Update-mode comparators
//! write fixtures and fresh assert-mode comparators check them, mirroring a
//! developer regenerating fixtures and then rerunning the suite.

#![allow(clippy::panic, reason = "Test-only assertions are permitted.")]

mod common;

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::panic;

use common::FixtureDir;
use common::Record;
use goldentest::GoldenError;
use goldentest::GoldenOutcome;
use goldentest::Json;
use goldentest::assert_golden;

// ============================================================================
// SECTION: Update Mode
// ============================================================================

/// Ensures a JSON fixture is stored indented in field order and then matches.
#[test]
fn json_update_then_assert_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    let record = Record::new("a", 1);

    dir.updater().check("out.json", Json(&record))?;
    if dir.read("out.json")? != b"{\n  \"name\": \"a\",\n  \"count\": 1\n}" {
        return Err("stored JSON fixture is not the indented encoding".into());
    }
    if dir.asserter().check("out.json", Json(&record))? != GoldenOutcome::Matched {
        return Err("expected fresh comparator to match the updated fixture".into());
    }
    Ok(())
}

/// Ensures nested structures survive the update/assert cycle.
#[test]
fn nested_json_update_then_assert_round_trips() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    let records = vec![Record::new("a", 1), Record::new("b", 2)];

    let golden = dir.updater();
    golden.check("nested/records.json", Json(&records))?;
    dir.asserter().check("nested/records.json", Json(&records))?;
    Ok(())
}

/// Ensures text is stored verbatim with no quoting or trailing newline.
#[test]
fn text_update_is_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    dir.updater().check("out.txt", "hello")?;
    if dir.read("out.txt")? != b"hello" {
        return Err("text fixture was not stored verbatim".into());
    }
    dir.asserter().check("out.txt", "hello")?;
    Ok(())
}

/// Ensures raw bytes are stored verbatim, including invalid UTF-8.
#[test]
fn bytes_update_is_verbatim() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    let bytes: Vec<u8> = vec![0xff, 0x00, 0xfe, b'\n'];
    dir.updater().check("out.bin", &bytes)?;
    if dir.read("out.bin")? != bytes {
        return Err("byte fixture was not stored verbatim".into());
    }
    dir.asserter().check("out.bin", bytes)?;
    Ok(())
}

/// Ensures update mode overwrites a fixture that would otherwise mismatch.
#[test]
fn update_mode_never_reports_mismatch() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    dir.seed("out.txt", b"old")?;
    if dir.updater().check("out.txt", "new")? != GoldenOutcome::Updated {
        return Err("expected update outcome".into());
    }
    if dir.read("out.txt")? != b"new" {
        return Err("fixture was not replaced".into());
    }
    Ok(())
}

/// Ensures update mode creates the fixture directory on first use.
#[test]
fn update_mode_creates_fixture_dir() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    if dir.path().exists() {
        return Err("fixture directory should not exist yet".into());
    }
    assert_golden!(dir.updater(), "fresh.txt", "created");
    if dir.read("fresh.txt")? != b"created" {
        return Err("fixture was not created".into());
    }
    Ok(())
}

// ============================================================================
// SECTION: Assert Mode
// ============================================================================

/// Ensures a mismatch reports both the stored and the actual content.
#[test]
fn text_mismatch_reports_expected_and_actual() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    dir.updater().check("out.txt", "hello")?;

    let Err(err) = dir.asserter().check("out.txt", "world") else {
        return Err("expected mismatch".into());
    };
    let GoldenError::Mismatch(mismatch) = err else {
        return Err(format!("expected mismatch, got fatal error: {err}").into());
    };
    if mismatch.expected != "hello" || mismatch.actual != "world" {
        return Err("mismatch sides are wrong".into());
    }
    Ok(())
}

/// Ensures the panicking surface carries both sides and caller context.
#[test]
fn assert_golden_panic_message_includes_context() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    dir.seed("out.txt", b"hello")?;
    let golden = dir.asserter();

    let Err(payload) = panic::catch_unwind(|| {
        assert_golden!(golden, "out.txt", "world", "user {} greeting", 42);
    }) else {
        return Err("expected assert_golden to panic".into());
    };
    let message = payload
        .downcast_ref::<String>()
        .cloned()
        .ok_or("panic payload should be a formatted string")?;
    for needle in ["out.txt", "expected: hello", "actual: world", "context: user 42 greeting"] {
        if !message.contains(needle) {
            return Err(format!("panic message missing '{needle}': {message}").into());
        }
    }
    Ok(())
}

/// Ensures a missing fixture is fatal rather than a mismatch.
#[test]
fn missing_fixture_is_fatal() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    dir.seed("other.json", b"{}")?;
    let Err(err) = dir.asserter().check("absent.json", Json(Record::new("a", 1))) else {
        return Err("expected missing fixture to fail".into());
    };
    if !err.is_fatal() || !matches!(err, GoldenError::Fixture(_)) {
        return Err(format!("expected fatal fixture error, got: {err}").into());
    }
    Ok(())
}

/// Ensures a JSON fixture stored compactly does not match the indented encoding.
#[test]
fn compact_json_fixture_mismatches() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    dir.seed("out.json", br#"{"name":"a","count":1}"#)?;
    let Err(err) = dir.asserter().check("out.json", Json(Record::new("a", 1))) else {
        return Err("expected compact fixture to mismatch".into());
    };
    if !err.is_mismatch() {
        return Err(format!("expected mismatch, got: {err}").into());
    }
    Ok(())
}

// ============================================================================
// SECTION: Unsupported Types
// ============================================================================

/// Ensures structured values cannot target verbatim fixtures in update mode.
#[test]
fn structured_value_for_text_fixture_is_rejected() -> Result<(), Box<dyn std::error::Error>> {
    let dir = FixtureDir::new()?;
    let Err(err) = dir.updater().check("out.txt", Json(Record::new("a", 1))) else {
        return Err("expected unsupported type".into());
    };
    let GoldenError::UnsupportedType {
        filename,
        type_name,
    } = &err
    else {
        return Err(format!("expected UnsupportedType, got: {err}").into());
    };
    if filename != "out.txt" || !type_name.ends_with("Record") {
        return Err(format!("unexpected unsupported-type details: {err}").into());
    }
    if dir.path().join("out.txt").exists() {
        return Err("nothing should be written for an unsupported type".into());
    }
    Ok(())
}

/// Ensures the panicking surface reports unsupported types as fatal.
#[test]
#[should_panic(expected = "unsupported value type for golden file 'out.txt'")]
fn assert_golden_rejects_structured_text_fixture() {
    let Ok(dir) = FixtureDir::new() else {
        panic!("failed to create fixture directory");
    };
    dir.updater().assert_golden("out.txt", Json(Record::new("a", 1)));
}
