//! # Validator
//!
//! Accepts or rejects a candidate IBAN string and reports the reason for a
//! rejection. The checks run in a fixed order and stop at the first failure:
//!
//! | # | Check | Error |
//! |---|-------|-------|
//! | 1 | normalize (keep ASCII letters and digits; uppercase) | none |
//! | 2 | at least 2 characters, country registered | `WrongLength` / `UnknownCountry` |
//! | 3 | length equals the country's IBAN length | `WrongLength` |
//! | 4 | check digits numeric, each BBAN field in its charset | `InvalidCharset` |
//! | 5 | MOD 97-10 remainder is 1 | `ChecksumMismatch` |
//!
//! An input with several defects therefore always reports the earliest one,
//! e.g. `ZZ12` is `UnknownCountry` rather than `WrongLength`.

use crate::checksum;
use crate::error::ValidationError;
use crate::iban::Iban;
use crate::registry::{self, Registry, PREFIX_LENGTH};

/// Outcome of a validation: the validated value or the first failure.
pub type ValidationResult = Result<Iban, ValidationError>;

/// Drop every character that is not an ASCII letter or digit, and
/// uppercase the rest. Spaces, separators, brackets and stray non-ASCII
/// characters from extracted text all disappear here.
pub fn normalize(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Validate against the built-in registry.
pub fn validate(raw: &str) -> ValidationResult {
    Validator::default().validate(raw)
}

/// Returns whether `raw` is a valid IBAN under the built-in registry.
pub fn is_valid(raw: &str) -> bool {
    validate(raw).is_ok()
}

/// IBAN validator bound to a registry.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r Registry,
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new(registry::builtin())
    }
}

impl<'r> Validator<'r> {
    /// Create a validator reading layouts from `registry`.
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// The registry this validator reads from.
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Returns whether `raw` is a valid IBAN.
    pub fn is_valid(&self, raw: &str) -> bool {
        self.validate(raw).is_ok()
    }

    /// Validate a candidate IBAN.
    ///
    /// # Errors
    ///
    /// Returns the first failing check as a [`ValidationError`].
    pub fn validate(&self, raw: &str) -> ValidationResult {
        let normalized = normalize(raw);
        let result = self.validate_normalized(normalized);
        if let Err(ref e) = result {
            tracing::trace!(error = %e, "IBAN rejected");
        }
        result
    }

    fn validate_normalized(&self, normalized: String) -> ValidationResult {
        // `normalize` leaves only ASCII, so byte offsets are char offsets.
        let bytes = normalized.as_bytes();

        if bytes.len() < 2 {
            return Err(ValidationError::WrongLength {
                expected: None,
                actual: bytes.len(),
            });
        }

        let rule = self
            .registry
            .get(&normalized[..2])
            .ok_or_else(|| ValidationError::UnknownCountry {
                code: normalized[..2].to_string(),
            })?;

        if bytes.len() != rule.total_length() {
            return Err(ValidationError::WrongLength {
                expected: Some(rule.total_length()),
                actual: bytes.len(),
            });
        }

        if let Some(position) = (2..PREFIX_LENGTH).find(|&i| !bytes[i].is_ascii_digit()) {
            return Err(ValidationError::InvalidCharset {
                field: None,
                position,
            });
        }

        for (field, range) in rule.field_ranges() {
            if let Some(position) = range
                .clone()
                .find(|&i| !field.charset.accepts(bytes[i] as char))
            {
                return Err(ValidationError::InvalidCharset {
                    field: Some(field.kind),
                    position,
                });
            }
        }

        let remainder = checksum::checked_remainder(bytes);
        if remainder != 1 {
            return Err(ValidationError::ChecksumMismatch { remainder });
        }

        Ok(Iban::from_validated(normalized, rule))
    }
}
