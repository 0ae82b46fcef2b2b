//! # iban-gen — Synthetic IBAN Generation
//!
//! Produces IBANs that pass every check of the `iban-core` Validator, for
//! test fixtures, load generation and demo data.
//!
//! - **Solved check digits.** The two check digits are derived as
//!   `98 - remainder` from the placeholder form, not searched for.
//! - **Reproducible.** A seed fixes the output byte for byte. Each call owns
//!   its RNG; no global random state exists.
//! - **Self-checked.** Every result is re-validated before it is returned. A
//!   failure surfaces as [`GenerateError::InvariantViolation`].
//!
//! ## Crate Policy
//!
//! - Depends only on `iban-core` internally.
//! - Never bypasses the Validator or re-implements the checksum.

pub mod error;
pub mod generator;
pub mod options;

pub use error::GenerateError;
pub use generator::{generate, Generator};
pub use options::{FieldOverrides, GenerateOptions};
