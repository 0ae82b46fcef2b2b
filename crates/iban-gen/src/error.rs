//! # Generator Errors
//!
//! `UnknownCountry` and `InvalidOverride` are caller mistakes and ordinary
//! results. `InvariantViolation` means the generator assembled a string its
//! own Validator rejects: the checksum engine or the registry layout is
//! wrong. It is logged at `error` level and never retried.

use iban_core::{ChecksumError, FieldKind, ValidationError};
use thiserror::Error;

/// Error returned by the generator.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// No rule is registered for the requested country.
    #[error("unknown country code '{0}'")]
    UnknownCountry(String),

    /// The registry has no countries to pick from.
    #[error("registry is empty")]
    EmptyRegistry,

    /// A field override does not fit the country layout.
    #[error("invalid override for {field}: {reason}")]
    InvalidOverride {
        /// The overridden field.
        field: FieldKind,
        /// Why the override was rejected.
        reason: String,
    },

    /// Check digit computation failed on an assembled string.
    #[error("checksum error: {0}")]
    Checksum(#[from] ChecksumError),

    /// The generated IBAN failed its own validation. This is a defect in the
    /// checksum engine or the registry, not a caller error.
    #[error("generated IBAN '{iban}' failed self-validation: {source}")]
    InvariantViolation {
        /// The rejected string.
        iban: String,
        /// The validation failure.
        #[source]
        source: ValidationError,
    },
}
