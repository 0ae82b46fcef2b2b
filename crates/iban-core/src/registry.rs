//! # Country Registry
//!
//! Maps a two-letter ISO 3166-1 country code to the IBAN layout of that
//! country: total length and the ordered BBAN fields with their charsets.
//!
//! ## Dataset
//!
//! The built-in table is embedded from `data/countries.json` and parsed once
//! per process on first use. It is never mutated afterwards, so the
//! `&'static Registry` returned by [`builtin()`] is shared freely across
//! threads.
//!
//! Country layouts change over time. A replacement table can be loaded with
//! [`Registry::from_json`], [`Registry::from_yaml`] or [`Registry::from_path`]
//! and handed to the Validator and Generator without touching their code.
//!
//! ## Invariants
//!
//! Every rule admitted into a registry satisfies:
//!
//! - the code is exactly two ASCII uppercase letters;
//! - the total length is within `5..=34`;
//! - the BBAN field lengths plus 4 equal the total length;
//! - no field has length zero;
//! - a field kind appears at most once.

use std::collections::HashMap;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Shortest IBAN length admitted by any rule.
pub const MIN_IBAN_LENGTH: usize = 5;

/// Longest IBAN length admitted by any rule.
pub const MAX_IBAN_LENGTH: usize = 34;

/// Length of the country code plus check digits prefix.
pub const PREFIX_LENGTH: usize = 4;

const BUILTIN_DATASET: &str = include_str!("../data/countries.json");

static BUILTIN: OnceLock<Registry> = OnceLock::new();

/// Return the built-in registry, parsing the embedded dataset on first use.
pub fn builtin() -> &'static Registry {
    BUILTIN.get_or_init(|| {
        // The embedded dataset is checked by `builtin_dataset_loads` below.
        Registry::from_json(BUILTIN_DATASET).expect("embedded country dataset is valid")
    })
}

// ---------------------------------------------------------------------------
// Field layout primitives
// ---------------------------------------------------------------------------

/// Character class a BBAN field draws from.
///
/// Mirrors the SWIFT registry notation: `n` digits, `a` upper-case letters,
/// `c` upper-case alphanumerics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    /// `0-9`.
    Digits,
    /// `A-Z`.
    UpperAlpha,
    /// `0-9A-Z`.
    Alphanumeric,
}

impl Charset {
    /// Returns whether `c` belongs to this charset.
    pub fn accepts(self, c: char) -> bool {
        match self {
            Self::Digits => c.is_ascii_digit(),
            Self::UpperAlpha => c.is_ascii_uppercase(),
            Self::Alphanumeric => c.is_ascii_digit() || c.is_ascii_uppercase(),
        }
    }

    /// All characters of this charset in ascending order.
    pub fn alphabet(self) -> &'static [u8] {
        match self {
            Self::Digits => b"0123456789",
            Self::UpperAlpha => b"ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            Self::Alphanumeric => b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ",
        }
    }

    /// Returns the SWIFT registry symbol (`n`, `a` or `c`).
    pub fn symbol(self) -> char {
        match self {
            Self::Digits => 'n',
            Self::UpperAlpha => 'a',
            Self::Alphanumeric => 'c',
        }
    }
}

/// Role of a BBAN field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// National bank identifier.
    BankCode,
    /// Branch or sort code.
    BranchCode,
    /// Account type or balance account indicator.
    AccountType,
    /// Account number prefix (CZ, SK).
    AccountPrefix,
    /// Account number proper.
    AccountNumber,
    /// National check digit or check letter.
    NationalCheck,
    /// ISO 4217 currency code.
    Currency,
    /// Account owner type (BR).
    OwnerType,
    /// Reserved position, always zero in issued IBANs.
    Reserved,
}

impl FieldKind {
    /// Returns the snake_case identifier used in datasets.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BankCode => "bank_code",
            Self::BranchCode => "branch_code",
            Self::AccountType => "account_type",
            Self::AccountPrefix => "account_prefix",
            Self::AccountNumber => "account_number",
            Self::NationalCheck => "national_check",
            Self::Currency => "currency",
            Self::OwnerType => "owner_type",
            Self::Reserved => "reserved",
        }
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One BBAN field: its role, fixed length and charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldSpec {
    /// Role of the field.
    pub kind: FieldKind,
    /// Number of characters.
    pub length: usize,
    /// Allowed characters.
    pub charset: Charset,
}

impl FieldSpec {
    /// Create a field spec.
    pub fn new(kind: FieldKind, length: usize, charset: Charset) -> Self {
        Self {
            kind,
            length,
            charset,
        }
    }
}

impl std::fmt::Display for FieldSpec {
    /// Renders in SWIFT notation, e.g. `8!n`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}!{}", self.length, self.charset.symbol())
    }
}

// ---------------------------------------------------------------------------
// CountryRule
// ---------------------------------------------------------------------------

/// IBAN layout of one country.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryRule {
    code: String,
    name: String,
    #[serde(rename = "length")]
    total_length: usize,
    fields: Vec<FieldSpec>,
}

impl CountryRule {
    /// Create a rule, checking every layout invariant.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidRule`] naming the violated invariant.
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        total_length: usize,
        fields: Vec<FieldSpec>,
    ) -> Result<Self, RegistryError> {
        let rule = Self {
            code: code.into(),
            name: name.into(),
            total_length,
            fields,
        };
        rule.check()?;
        Ok(rule)
    }

    fn check(&self) -> Result<(), RegistryError> {
        let invalid = |reason: String| RegistryError::InvalidRule {
            code: self.code.clone(),
            reason,
        };

        if self.code.len() != 2 || !self.code.bytes().all(|b| b.is_ascii_uppercase()) {
            return Err(invalid(
                "country code must be two ASCII uppercase letters".to_string(),
            ));
        }
        if !(MIN_IBAN_LENGTH..=MAX_IBAN_LENGTH).contains(&self.total_length) {
            return Err(invalid(format!(
                "length {} outside {MIN_IBAN_LENGTH}..={MAX_IBAN_LENGTH}",
                self.total_length
            )));
        }
        if let Some(empty) = self.fields.iter().find(|f| f.length == 0) {
            return Err(invalid(format!("field {} has length 0", empty.kind)));
        }
        let mut seen = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            if seen.contains(&field.kind) {
                return Err(invalid(format!("field {} appears twice", field.kind)));
            }
            seen.push(field.kind);
        }
        let bban_length: usize = self.fields.iter().map(|f| f.length).sum();
        if bban_length + PREFIX_LENGTH != self.total_length {
            return Err(invalid(format!(
                "fields sum to {bban_length}, expected {}",
                self.total_length - PREFIX_LENGTH
            )));
        }
        Ok(())
    }

    /// ISO 3166-1 alpha-2 country code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Human-readable country name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Total IBAN length including country code and check digits.
    pub fn total_length(&self) -> usize {
        self.total_length
    }

    /// BBAN length (total length minus the 4-character prefix).
    pub fn bban_length(&self) -> usize {
        self.total_length - PREFIX_LENGTH
    }

    /// Ordered BBAN fields.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Look up a field by kind.
    pub fn field(&self, kind: FieldKind) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.kind == kind)
    }

    /// Iterate over the fields with their absolute position in the IBAN.
    pub fn field_ranges(&self) -> impl Iterator<Item = (&FieldSpec, Range<usize>)> + '_ {
        let mut offset = PREFIX_LENGTH;
        self.fields.iter().map(move |field| {
            let range = offset..offset + field.length;
            offset = range.end;
            (field, range)
        })
    }

    /// Absolute position of a field in the IBAN, if the layout has it.
    pub fn field_range(&self, kind: FieldKind) -> Option<Range<usize>> {
        self.field_ranges()
            .find(|(field, _)| field.kind == kind)
            .map(|(_, range)| range)
    }

    /// BBAN layout in SWIFT notation, e.g. `4!a6!n8!n`.
    pub fn bban_format(&self) -> String {
        self.fields.iter().map(ToString::to_string).collect()
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable table of country rules keyed by country code.
#[derive(Debug, Clone)]
pub struct Registry {
    rules: HashMap<[u8; 2], CountryRule>,
}

impl Registry {
    /// Build a registry from rules, checking every invariant.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::InvalidRule`] for a malformed rule and
    /// [`RegistryError::DuplicateCountry`] when two rules share a code.
    pub fn from_rules(rules: impl IntoIterator<Item = CountryRule>) -> Result<Self, RegistryError> {
        let mut map = HashMap::new();
        for rule in rules {
            if let Err(e) = rule.check() {
                tracing::warn!(code = %rule.code, error = %e, "rejecting country registry dataset");
                return Err(e);
            }
            let key = code_key(&rule.code).ok_or_else(|| RegistryError::InvalidRule {
                code: rule.code.clone(),
                reason: "country code must be two ASCII uppercase letters".to_string(),
            })?;
            if map.contains_key(&key) {
                tracing::warn!(code = %rule.code, "duplicate country in registry dataset");
                return Err(RegistryError::DuplicateCountry(rule.code));
            }
            map.insert(key, rule);
        }
        tracing::debug!(countries = map.len(), "country registry loaded");
        Ok(Self { rules: map })
    }

    /// Parse a registry from a JSON array of rules.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Json`] on malformed JSON and the
    /// [`Registry::from_rules`] errors on invariant violations.
    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let rules: Vec<CountryRule> = serde_json::from_str(json)?;
        Self::from_rules(rules)
    }

    /// Parse a registry from a YAML sequence of rules.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Yaml`] on malformed YAML and the
    /// [`Registry::from_rules`] errors on invariant violations.
    pub fn from_yaml(yaml: &str) -> Result<Self, RegistryError> {
        let rules: Vec<CountryRule> = serde_yaml::from_str(yaml)?;
        Self::from_rules(rules)
    }

    /// Load a registry file. `.yaml` and `.yml` files are parsed as YAML,
    /// anything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be read, otherwise
    /// the errors of the matching parser.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading country registry");
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&content),
            _ => Self::from_json(&content),
        }
    }

    /// Look up the rule for a country code. Case-insensitive.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCountry`] if the code is not registered.
    pub fn lookup(&self, code: &str) -> Result<&CountryRule, RegistryError> {
        self.get(code)
            .ok_or_else(|| RegistryError::UnknownCountry(code.to_string()))
    }

    /// Look up the rule for a country code, returning `None` when absent.
    pub fn get(&self, code: &str) -> Option<&CountryRule> {
        let upper = code.to_ascii_uppercase();
        code_key(&upper).and_then(|key| self.rules.get(&key))
    }

    /// Returns whether a rule exists for the code.
    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }

    /// Number of registered countries.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns whether the registry has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered country codes in ascending order.
    pub fn countries(&self) -> Vec<&str> {
        let mut codes: Vec<&str> = self.rules.values().map(CountryRule::code).collect();
        codes.sort_unstable();
        codes
    }

    /// Iterate over all rules in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &CountryRule> {
        self.rules.values()
    }
}

impl Default for Registry {
    /// A copy of the built-in registry.
    fn default() -> Self {
        builtin().clone()
    }
}

fn code_key(code: &str) -> Option<[u8; 2]> {
    let bytes: [u8; 2] = code.as_bytes().try_into().ok()?;
    bytes
        .iter()
        .all(|b| b.is_ascii_uppercase())
        .then_some(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gb_rule() -> CountryRule {
        CountryRule::new(
            "GB",
            "United Kingdom",
            22,
            vec![
                FieldSpec::new(FieldKind::BankCode, 4, Charset::UpperAlpha),
                FieldSpec::new(FieldKind::BranchCode, 6, Charset::Digits),
                FieldSpec::new(FieldKind::AccountNumber, 8, Charset::Digits),
            ],
        )
        .unwrap()
    }

    #[test]
    fn builtin_dataset_loads() {
        let registry = Registry::from_json(BUILTIN_DATASET).unwrap();
        assert_eq!(registry.len(), 77);
    }

    #[test]
    fn builtin_is_shared() {
        let a = builtin() as *const Registry;
        let b = builtin() as *const Registry;
        assert_eq!(a, b);
    }

    #[test]
    fn lookup_known_country() {
        let rule = builtin().lookup("DE").unwrap();
        assert_eq!(rule.code(), "DE");
        assert_eq!(rule.name(), "Germany");
        assert_eq!(rule.total_length(), 22);
        assert_eq!(rule.bban_format(), "8!n10!n");
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(builtin().lookup("gb").unwrap().code(), "GB");
    }

    #[test]
    fn lookup_unknown_country() {
        let err = builtin().lookup("ZZ").unwrap_err();
        assert!(matches!(err, RegistryError::UnknownCountry(ref c) if c == "ZZ"));
        assert!(builtin().lookup("").is_err());
        assert!(builtin().lookup("GBR").is_err());
        assert!(builtin().lookup("1B").is_err());
    }

    #[test]
    fn every_builtin_rule_sums_to_total_length() {
        for rule in builtin().iter() {
            let sum: usize = rule.fields().iter().map(|f| f.length).sum();
            assert_eq!(sum + PREFIX_LENGTH, rule.total_length(), "{}", rule.code());
            assert!(rule.field(FieldKind::BankCode).is_some(), "{}", rule.code());
        }
    }

    #[test]
    fn countries_are_sorted() {
        let codes = builtin().countries();
        assert_eq!(codes.first(), Some(&"AD"));
        assert_eq!(codes.last(), Some(&"XK"));
        assert!(codes.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn field_range_accounts_for_leading_fields() {
        let it = builtin().lookup("IT").unwrap();
        assert_eq!(it.field_range(FieldKind::NationalCheck), Some(4..5));
        assert_eq!(it.field_range(FieldKind::BankCode), Some(5..10));
        assert_eq!(it.field_range(FieldKind::Currency), None);

        let gb = gb_rule();
        assert_eq!(gb.field_range(FieldKind::BankCode), Some(4..8));
        assert_eq!(gb.field_range(FieldKind::BranchCode), Some(8..14));
        assert_eq!(gb.field_range(FieldKind::AccountNumber), Some(14..22));
    }

    #[test]
    fn rule_rejects_wrong_sum() {
        let err = CountryRule::new(
            "GB",
            "United Kingdom",
            22,
            vec![FieldSpec::new(FieldKind::BankCode, 4, Charset::UpperAlpha)],
        )
        .unwrap_err();
        assert!(err.to_string().contains("fields sum to 4, expected 18"));
    }

    #[test]
    fn rule_rejects_bad_code() {
        let fields = vec![FieldSpec::new(FieldKind::AccountNumber, 4, Charset::Digits)];
        assert!(CountryRule::new("gb", "x", 8, fields.clone()).is_err());
        assert!(CountryRule::new("G1", "x", 8, fields.clone()).is_err());
        assert!(CountryRule::new("GBR", "x", 8, fields).is_err());
    }

    #[test]
    fn rule_rejects_out_of_bounds_length() {
        let fields = vec![FieldSpec::new(FieldKind::AccountNumber, 31, Charset::Digits)];
        assert!(CountryRule::new("XX", "x", 35, fields).is_err());
        let fields = vec![FieldSpec::new(FieldKind::AccountNumber, 0, Charset::Digits)];
        assert!(CountryRule::new("XX", "x", 4, fields).is_err());
    }

    #[test]
    fn rule_rejects_duplicate_kind_and_empty_field() {
        let dup = vec![
            FieldSpec::new(FieldKind::AccountNumber, 2, Charset::Digits),
            FieldSpec::new(FieldKind::AccountNumber, 2, Charset::Digits),
        ];
        assert!(CountryRule::new("XX", "x", 8, dup).is_err());

        let empty = vec![
            FieldSpec::new(FieldKind::BankCode, 0, Charset::Digits),
            FieldSpec::new(FieldKind::AccountNumber, 4, Charset::Digits),
        ];
        assert!(CountryRule::new("XX", "x", 8, empty).is_err());
    }

    #[test]
    fn registry_rejects_duplicate_country() {
        let err = Registry::from_rules(vec![gb_rule(), gb_rule()]).unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCountry(ref c) if c == "GB"));
    }

    #[test]
    fn registry_rejects_unchecked_deserialized_rule() {
        let json = r#"[{"code": "XX", "name": "Bad", "length": 10, "fields": [
            {"kind": "account_number", "length": 3, "charset": "digits"}]}]"#;
        let err = Registry::from_json(json).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidRule { .. }));
    }

    #[test]
    fn registry_from_yaml() {
        let yaml = r#"
- code: XA
  name: Example
  length: 10
  fields:
    - kind: bank_code
      length: 2
      charset: upper_alpha
    - kind: account_number
      length: 4
      charset: digits
"#;
        let registry = Registry::from_yaml(yaml).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.lookup("XA").unwrap().bban_format(), "2!a4!n");
    }

    #[test]
    fn registry_from_malformed_json() {
        assert!(matches!(
            Registry::from_json("{not json"),
            Err(RegistryError::Json(_))
        ));
    }

    #[test]
    fn registry_from_missing_path() {
        let err = Registry::from_path("/nonexistent/countries.json").unwrap_err();
        assert!(matches!(err, RegistryError::Io(_)));
    }

    #[test]
    fn charset_membership() {
        assert!(Charset::Digits.accepts('7'));
        assert!(!Charset::Digits.accepts('A'));
        assert!(Charset::UpperAlpha.accepts('Q'));
        assert!(!Charset::UpperAlpha.accepts('q'));
        assert!(Charset::Alphanumeric.accepts('Z'));
        assert!(Charset::Alphanumeric.accepts('0'));
        assert!(!Charset::Alphanumeric.accepts('-'));
        for charset in [Charset::Digits, Charset::UpperAlpha, Charset::Alphanumeric] {
            assert!(charset.alphabet().iter().all(|&b| charset.accepts(b as char)));
        }
    }

    #[test]
    fn rule_serde_roundtrip() {
        let rule = gb_rule();
        let json = serde_json::to_string(&rule).unwrap();
        assert!(json.contains("\"length\":22"));
        let back: CountryRule = serde_json::from_str(&json).unwrap();
        assert_eq!(rule, back);
    }
}
