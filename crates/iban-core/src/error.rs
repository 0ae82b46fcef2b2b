//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout the IBAN engine. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Validation errors are ordinary results. Malformed input is routine for
//!   a validation library and never escalates to a panic.
//! - Each validation error carries the detail that explains it: the expected
//!   vs actual length, the offending position, the checksum remainder.
//! - Registry errors name the country and the broken invariant so that a bad
//!   replacement dataset is rejected with an actionable message.

use thiserror::Error;

use crate::registry::FieldKind;

/// Reason a candidate string is not a valid IBAN.
///
/// The Validator checks in a fixed order and reports the first failure, so
/// an input with several problems always yields the same variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The country prefix is not present in the registry.
    #[error("unknown country code '{code}'")]
    UnknownCountry {
        /// The two-character prefix that was looked up.
        code: String,
    },

    /// The normalized input does not have the length the country requires.
    ///
    /// `expected` is `None` when the input is too short to carry a country
    /// code at all.
    #[error("wrong length {actual}, expected {}", describe_expected(.expected))]
    WrongLength {
        /// Length required by the country rule, if a rule could be found.
        expected: Option<usize>,
        /// Length of the normalized input.
        actual: usize,
    },

    /// A character does not belong to the charset of its field.
    #[error("invalid character at position {position} ({})", describe_field(.field))]
    InvalidCharset {
        /// The BBAN field containing the character; `None` for the check digits.
        field: Option<FieldKind>,
        /// Zero-based position in the normalized IBAN.
        position: usize,
    },

    /// The MOD 97-10 remainder of the rearranged string is not 1.
    #[error("checksum mismatch (remainder {remainder}, expected 1)")]
    ChecksumMismatch {
        /// The computed remainder.
        remainder: u8,
    },
}

fn describe_expected(expected: &Option<usize>) -> String {
    match expected {
        Some(n) => n.to_string(),
        None => "at least 2 characters".to_string(),
    }
}

fn describe_field(field: &Option<FieldKind>) -> String {
    match field {
        Some(kind) => kind.as_str().to_string(),
        None => "check digits".to_string(),
    }
}

/// Error in the MOD 97-10 computation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChecksumError {
    /// The input contains a character outside `0-9A-Z`.
    #[error("character '{character}' at position {position} cannot be mapped to digits")]
    InvalidCharacter {
        /// The offending character.
        character: char,
        /// Zero-based position in the checksum input.
        position: usize,
    },

    /// The input is too short to hold a country code and check digits.
    #[error("input of length {0} is too short for rearrangement")]
    TooShort(usize),
}

/// Error while loading or querying a country registry.
#[derive(Error, Debug)]
pub enum RegistryError {
    /// No rule is registered for the country code.
    #[error("unknown country code '{0}'")]
    UnknownCountry(String),

    /// A rule violates a structural invariant.
    #[error("invalid rule for '{code}': {reason}")]
    InvalidRule {
        /// Country code of the offending rule.
        code: String,
        /// Description of the violated invariant.
        reason: String,
    },

    /// Two rules share a country code.
    #[error("duplicate rule for country '{0}'")]
    DuplicateCountry(String),

    /// The dataset could not be parsed as JSON.
    #[error("failed to parse registry JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The dataset could not be parsed as YAML.
    #[error("failed to parse registry YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The dataset file could not be read.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
