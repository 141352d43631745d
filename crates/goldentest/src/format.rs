// crates/goldentest/src/format.rs
// ============================================================================
// Module: Fixture Formats
// Description: Filename-suffix dispatch between JSON and verbatim fixtures.
// Purpose: Produce the exact bytes stored for, and compared against, a fixture.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A fixture whose filename ends with `.json` stores 2-space indented JSON;
//! any other fixture stores bytes or text verbatim. The same rendering is used
//! when updating and when asserting, so a freshly updated fixture always
//! compares equal to the value that produced it.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::GoldenError;
use crate::value::GoldenValue;
use crate::value::render_json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Filename suffix selecting the JSON format.
pub const JSON_SUFFIX: &str = ".json";

// ============================================================================
// SECTION: Fixture Format
// ============================================================================

/// Storage format selected from a fixture filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureFormat {
    /// Indented JSON text.
    Json,
    /// Raw bytes or text, unchanged.
    Verbatim,
}

impl FixtureFormat {
    /// Selects the format for `filename` by its literal, case-sensitive suffix.
    #[must_use]
    pub fn for_filename(filename: &str) -> Self {
        if filename.ends_with(JSON_SUFFIX) { Self::Json } else { Self::Verbatim }
    }

    /// Renders `value` into the bytes stored under `filename`.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::Serialization`] when JSON encoding fails, or
    /// [`GoldenError::UnsupportedType`] when a structured value targets a
    /// verbatim fixture.
    pub fn render(self, filename: &str, value: GoldenValue) -> Result<Vec<u8>, GoldenError> {
        match (self, value) {
            (Self::Json, GoldenValue::Structured {
                rendered,
                ..
            }) => Ok(rendered),
            (Self::Json, GoldenValue::Text(text)) => render_json(&text),
            (Self::Json, GoldenValue::Bytes(bytes)) => render_json(&bytes),
            (Self::Verbatim, GoldenValue::Text(text)) => Ok(text.into_bytes()),
            (Self::Verbatim, GoldenValue::Bytes(bytes)) => Ok(bytes),
            (Self::Verbatim, GoldenValue::Structured {
                type_name,
                ..
            }) => Err(GoldenError::UnsupportedType {
                filename: filename.to_string(),
                type_name,
            }),
        }
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
