//! # IBAN Value Type
//!
//! [`Iban`] wraps a normalized IBAN string that has passed validation. It is
//! only produced by the Validator (and, through it, by the Generator), so
//! holding an `Iban` proves the layout and checksum were verified.
//!
//! Values are immutable. Formatting produces new strings:
//!
//! - `Display` and [`Iban::as_str`]: electronic format, `GB29NWBK60161331926819`
//! - `{:#}` and [`Iban::print_format`]: groups of four, `GB29 NWBK 6016 1331 9268 19`
//!
//! Serialization uses the electronic format. Deserialization routes through
//! the Validator against the built-in registry, so invalid strings are
//! rejected at deserialization time.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::registry::{CountryRule, FieldKind};

/// A validated International Bank Account Number.
#[derive(Debug, Clone)]
pub struct Iban {
    value: String,
    bank: Option<Range<usize>>,
    branch: Option<Range<usize>>,
}

impl Iban {
    /// Wrap a string that has already been validated against `rule`.
    pub(crate) fn from_validated(value: String, rule: &CountryRule) -> Self {
        Self {
            value,
            bank: rule.field_range(FieldKind::BankCode),
            branch: rule.field_range(FieldKind::BranchCode),
        }
    }

    /// Electronic format (no separators).
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consume the value, returning the electronic format.
    pub fn into_string(self) -> String {
        self.value
    }

    /// ISO 3166-1 alpha-2 country code.
    pub fn country_code(&self) -> &str {
        &self.value[..2]
    }

    /// The two check digits.
    pub fn check_digits(&self) -> &str {
        &self.value[2..4]
    }

    /// Basic Bank Account Number: everything after the check digits.
    pub fn bban(&self) -> &str {
        &self.value[4..]
    }

    /// National bank identifier, the usual key for BIC lookups.
    pub fn bank_code(&self) -> Option<&str> {
        self.bank.clone().map(|r| &self.value[r])
    }

    /// Branch or sort code, for layouts that have one.
    pub fn branch_code(&self) -> Option<&str> {
        self.branch.clone().map(|r| &self.value[r])
    }

    /// Print format: groups of four characters separated by single spaces.
    pub fn print_format(&self) -> String {
        let mut out = String::with_capacity(self.value.len() + self.value.len() / 4);
        for (i, c) in self.value.chars().enumerate() {
            if i > 0 && i % 4 == 0 {
                out.push(' ');
            }
            out.push(c);
        }
        out
    }
}

impl PartialEq for Iban {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Iban {}

impl std::hash::Hash for Iban {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for Iban {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Iban {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.value.cmp(&other.value)
    }
}

impl AsRef<str> for Iban {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl std::fmt::Display for Iban {
    /// Electronic format; the alternate flag (`{:#}`) selects print format.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if f.alternate() {
            f.write_str(&self.print_format())
        } else {
            f.write_str(&self.value)
        }
    }
}

impl std::str::FromStr for Iban {
    type Err = ValidationError;

    /// Validate against the built-in registry.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        crate::validator::validate(s)
    }
}

impl Serialize for Iban {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for Iban {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
