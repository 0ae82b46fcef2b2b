//! # ISO 7064 MOD 97-10
//!
//! The checksum shared by validation and generation:
//!
//! 1. Move the first four characters (country code + check digits) to the end.
//! 2. Replace each letter by its two-digit value (`A` = 10 … `Z` = 35).
//! 3. Reduce the resulting decimal number modulo 97.
//!
//! The decimal expansion of a 34-character IBAN has up to 68 digits, so the
//! remainder is folded left to right and the full integer never exists.
//!
//! ## Check digit derivation
//!
//! Let `N` be the value of `bban ‖ country` after letter expansion. The
//! rearranged IBAN with check digits `cd` has value `N·100 + cd`. With
//! `r = (N·100) mod 97`, choosing `cd = 98 - r` gives
//! `(N·100 + 98 - r) mod 97 = 98 mod 97 = 1`. Since `r` is in `0..=96`,
//! `cd` is in `2..=98`, so `00`, `01` and `99` never occur.

use crate::error::ChecksumError;
use crate::registry::PREFIX_LENGTH;

const MODULUS: u32 = 97;

/// Move the country code and check digits to the end.
///
/// # Errors
///
/// Returns [`ChecksumError::TooShort`] if `iban` has fewer than 4 characters
/// and [`ChecksumError::InvalidCharacter`] if the split would land inside a
/// multi-byte character.
pub fn rearrange(iban: &str) -> Result<String, ChecksumError> {
    if iban.len() < PREFIX_LENGTH {
        return Err(ChecksumError::TooShort(iban.len()));
    }
    if !iban.is_char_boundary(PREFIX_LENGTH) {
        let (position, character) = iban
            .char_indices()
            .find(|(_, c)| !c.is_ascii())
            .unwrap_or((0, '\u{fffd}'));
        return Err(ChecksumError::InvalidCharacter {
            character,
            position,
        });
    }
    let (prefix, rest) = iban.split_at(PREFIX_LENGTH);
    let mut out = String::with_capacity(iban.len());
    out.push_str(rest);
    out.push_str(prefix);
    Ok(out)
}

/// Numeric value of an IBAN character: `0-9` map to themselves and `A-Z`
/// to `10..=35`.
fn char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => Some(c as u32 - '0' as u32),
        'A'..='Z' => Some(c as u32 - 'A' as u32 + 10),
        _ => None,
    }
}

/// Expand letters into their two-digit values.
///
/// Exposed for diagnostics; [`remainder`] folds without building this string.
///
/// # Errors
///
/// Returns [`ChecksumError::InvalidCharacter`] for characters outside `0-9A-Z`.
pub fn to_numeric(rearranged: &str) -> Result<String, ChecksumError> {
    let mut out = String::with_capacity(rearranged.len() * 2);
    for (position, character) in rearranged.chars().enumerate() {
        let value =
            char_value(character).ok_or(ChecksumError::InvalidCharacter { character, position })?;
        out.push_str(&value.to_string());
    }
    Ok(out)
}

/// MOD 97-10 remainder of an already rearranged string, in `0..=96`.
///
/// # Errors
///
/// Returns [`ChecksumError::InvalidCharacter`] for characters outside `0-9A-Z`.
pub fn remainder(rearranged: &str) -> Result<u8, ChecksumError> {
    let mut acc: u32 = 0;
    for (position, character) in rearranged.chars().enumerate() {
        let value =
            char_value(character).ok_or(ChecksumError::InvalidCharacter { character, position })?;
        acc = fold(acc, value);
    }
    // acc < 97 after every step
    Ok(acc as u8)
}

fn fold(acc: u32, value: u32) -> u32 {
    // Letters contribute two decimal digits.
    let shift = if value >= 10 { 100 } else { 10 };
    (acc * shift + value) % MODULUS
}

/// Remainder of an IBAN in normal order whose characters are already known
/// to be `0-9A-Z` and whose length is at least 4.
///
/// The Validator calls this after its charset checks, which guarantee both
/// preconditions, so there is no error path.
pub(crate) fn checked_remainder(iban: &[u8]) -> u8 {
    let (prefix, bban) = iban.split_at(PREFIX_LENGTH.min(iban.len()));
    let acc = bban.iter().chain(prefix).fold(0, |acc, &b| {
        let value = if b.is_ascii_digit() {
            u32::from(b - b'0')
        } else {
            u32::from(b.wrapping_sub(b'A')) + 10
        };
        fold(acc, value)
    });
    acc as u8
}

/// MOD 97-10 remainder of an IBAN in its normal order.
///
/// # Errors
///
/// See [`rearrange`] and [`remainder`].
pub fn iban_remainder(iban: &str) -> Result<u8, ChecksumError> {
    remainder(&rearrange(iban)?)
}

/// Returns whether the checksum of an IBAN in normal order is satisfied.
pub fn is_valid(iban: &str) -> bool {
    matches!(iban_remainder(iban), Ok(1))
}

/// Compute the two check digits for a country code and BBAN.
///
/// # Errors
///
/// Returns [`ChecksumError::InvalidCharacter`] if the country code or BBAN
/// contains characters outside `0-9A-Z`.
pub fn check_digits(country_code: &str, bban: &str) -> Result<String, ChecksumError> {
    let mut rearranged = String::with_capacity(bban.len() + PREFIX_LENGTH);
    rearranged.push_str(bban);
    rearranged.push_str(country_code);
    rearranged.push_str("00");
    let r = remainder(&rearranged)?;
    Ok(format!("{:02}", 98 - r))
}
