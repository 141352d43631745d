// crates/goldentest/src/value.rs
// ============================================================================
// Module: Golden Values
// Description: The closed set of value shapes a golden fixture can hold.
// Purpose: Resolve an actual value's serialization capability exactly once.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Actual values enter a comparison as a [`GoldenValue`]: raw bytes, text, or
//! a structured value already rendered as indented JSON. Conversions go
//! through [`IntoGoldenValue`], so byte slices and strings are accepted
//! directly and any `Serialize` type is accepted when wrapped in [`Json`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::GoldenError;

// ============================================================================
// SECTION: Golden Value
// ============================================================================

/// An actual value ready for format dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoldenValue {
    /// Raw bytes, stored verbatim in non-JSON fixtures.
    Bytes(Vec<u8>),
    /// Text, stored verbatim in non-JSON fixtures.
    Text(String),
    /// Structured value rendered as 2-space indented JSON in field order.
    Structured {
        /// Indented JSON encoding without a trailing newline.
        rendered: Vec<u8>,
        /// Rust type name of the source value.
        type_name: &'static str,
    },
}

impl GoldenValue {
    /// Renders a serializable value as a structured golden value.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::Serialization`] when `value` cannot be encoded as JSON.
    pub fn structured<T: Serialize + ?Sized>(value: &T) -> Result<Self, GoldenError> {
        let rendered = render_json(value)?;
        Ok(Self::Structured {
            rendered,
            type_name: std::any::type_name::<T>(),
        })
    }

    /// Names the variant for diagnostics.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Bytes(_) => "bytes",
            Self::Text(_) => "text",
            Self::Structured {
                ..
            } => "structured",
        }
    }
}

/// Encodes a value as 2-space indented JSON without a trailing newline.
pub(crate) fn render_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, GoldenError> {
    serde_json::to_vec_pretty(value).map_err(|err| GoldenError::Serialization(err.to_string()))
}

// ============================================================================
// SECTION: Conversions
// ============================================================================

/// Marks a value for structured (JSON) serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Json<T>(pub T);

/// Conversion into a [`GoldenValue`].
pub trait IntoGoldenValue {
    /// Converts `self`, rendering structured values eagerly.
    ///
    /// # Errors
    ///
    /// Returns [`GoldenError::Serialization`] when a structured value cannot be encoded.
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError>;
}

impl IntoGoldenValue for GoldenValue {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        Ok(self)
    }
}

impl IntoGoldenValue for Vec<u8> {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        Ok(GoldenValue::Bytes(self))
    }
}

impl IntoGoldenValue for &Vec<u8> {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        Ok(GoldenValue::Bytes(self.clone()))
    }
}

impl IntoGoldenValue for &[u8] {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        Ok(GoldenValue::Bytes(self.to_vec()))
    }
}

impl<const N: usize> IntoGoldenValue for &[u8; N] {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        Ok(GoldenValue::Bytes(self.to_vec()))
    }
}

impl IntoGoldenValue for String {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        Ok(GoldenValue::Text(self))
    }
}

impl IntoGoldenValue for &String {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        Ok(GoldenValue::Text(self.clone()))
    }
}

impl IntoGoldenValue for &str {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        Ok(GoldenValue::Text(self.to_string()))
    }
}

impl<T: Serialize> IntoGoldenValue for Json<T> {
    fn into_golden_value(self) -> Result<GoldenValue, GoldenError> {
        GoldenValue::structured(&self.0)
    }
}
