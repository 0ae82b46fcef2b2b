//! Shared helpers for the cross-crate integration tests.

#![allow(dead_code)]

use std::ops::Range;
use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Every string obtained by replacing exactly one character of `iban` in
/// `positions` with a different character from `0-9A-Z`.
pub fn single_substitutions(iban: &str, positions: Range<usize>) -> Vec<String> {
    const ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let bytes = iban.as_bytes();
    let mut out = Vec::new();
    for pos in positions {
        for &replacement in ALPHABET {
            if replacement == bytes[pos] {
                continue;
            }
            let mut changed = bytes.to_vec();
            changed[pos] = replacement;
            out.push(String::from_utf8_lossy(&changed).into_owned());
        }
    }
    out
}
