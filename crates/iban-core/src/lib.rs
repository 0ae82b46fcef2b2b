//! # iban-core — IBAN Validation Engine
//!
//! This crate is the leaf of the IBAN toolkit. It defines the country layout
//! registry, the ISO 7064 MOD 97-10 checksum, the Validator, and the
//! validated [`Iban`] value type. The generator crate and any extraction or
//! formatting layer build on these; none of them re-implement the checksum.
//!
//! ## Key Design Principles
//!
//! 1. **Validated newtype.** An [`Iban`] can only be obtained through the
//!    Validator, so holding one proves length, layout and checksum were
//!    checked. Deserialization routes through the same path.
//!
//! 2. **Fixed check order.** Validation short-circuits in a documented order
//!    (country, length, charset, checksum). Inputs with several defects always
//!    report the same reason.
//!
//! 3. **Incremental MOD 97.** The remainder is folded digit by digit; the
//!    68-digit integer behind a 34-character IBAN is never materialized.
//!
//! 4. **Read-only registry.** The built-in country table is parsed once and
//!    shared as `&'static`. Replacement tables load from JSON or YAML and are
//!    passed explicitly, so no component owns mutable global state.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `iban-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - Validation failures are values, never panics.

pub mod checksum;
pub mod error;
pub mod extract;
pub mod iban;
pub mod registry;
pub mod validator;

// Re-export primary types for ergonomic imports.
pub use error::{ChecksumError, RegistryError, ValidationError};
pub use extract::{scan, IbanMatch, Scanner};
pub use iban::Iban;
pub use registry::{builtin, Charset, CountryRule, FieldKind, FieldSpec, Registry};
pub use validator::{is_valid, normalize, validate, ValidationResult, Validator};
