//! # Candidate Scanner
//!
//! Finds IBANs in free text. The scanner only proposes candidates; every
//! candidate goes through [`Validator::validate`] and only accepted values
//! are returned.
//!
//! A candidate starts at an alphanumeric run beginning with two letters of
//! either case and two digits, and extends over following runs separated by
//! a single space, hyphen or dot, which covers both the electronic and the
//! print format. The registered length of the country decides where the
//! candidate ends.

use crate::iban::Iban;
use crate::validator::Validator;

/// An IBAN found in text, with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IbanMatch {
    /// The validated IBAN.
    pub iban: Iban,
    /// Byte offset of the first character.
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

/// Scan `text` using the built-in registry.
pub fn scan(text: &str) -> Vec<IbanMatch> {
    Scanner::new(Validator::default()).scan(text)
}

/// Text scanner bound to a validator.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'r> {
    validator: Validator<'r>,
}

impl<'r> Scanner<'r> {
    /// Create a scanner that validates candidates with `validator`.
    pub fn new(validator: Validator<'r>) -> Self {
        Self { validator }
    }

    /// Return every valid IBAN in `text`, in order of appearance.
    pub fn scan(&self, text: &str) -> Vec<IbanMatch> {
        let runs = alphanumeric_runs(text);
        let mut found = Vec::new();
        let mut i = 0;

        while i < runs.len() {
            match self.candidate_at(text, &runs, i) {
                Some((m, last)) => {
                    found.push(m);
                    i = last + 1;
                }
                None => i += 1,
            }
        }

        tracing::debug!(found = found.len(), "scanned text for IBANs");
        found
    }

    fn candidate_at(
        &self,
        text: &str,
        runs: &[(usize, usize)],
        first: usize,
    ) -> Option<(IbanMatch, usize)> {
        let (start, first_end) = runs[first];
        let head = &text.as_bytes()[start..first_end];
        if head.len() < 4
            || !head[..2].iter().all(u8::is_ascii_alphabetic)
            || !head[2..4].iter().all(u8::is_ascii_digit)
        {
            return None;
        }

        let code = &text[start..start + 2];
        let target = self.validator.registry().get(code)?.total_length();

        let mut length = 0;
        for j in first..runs.len() {
            let (run_start, run_end) = runs[j];
            if j > first {
                let gap = &text[runs[j - 1].1..run_start];
                if !matches!(gap, " " | "-" | ".") {
                    return None;
                }
            }
            length += run_end - run_start;
            if length == target {
                let iban = self.validator.validate(&text[start..run_end]).ok()?;
                let m = IbanMatch {
                    iban,
                    start,
                    end: run_end,
                };
                return Some((m, j));
            }
            if length > target {
                return None;
            }
        }
        None
    }
}

/// Maximal runs of ASCII alphanumerics as byte ranges.
fn alphanumeric_runs(text: &str) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut current: Option<usize> = None;
    for (i, b) in text.bytes().enumerate() {
        match (b.is_ascii_alphanumeric(), current) {
            (true, None) => current = Some(i),
            (false, Some(start)) => {
                runs.push((start, i));
                current = None;
            }
            _ => {}
        }
    }
    if let Some(start) = current {
        runs.push((start, text.len()));
    }
    runs
}
