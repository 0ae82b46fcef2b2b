//! # Seeded Generation Determinism
//!
//! Same seed + same country ⇒ byte-identical output, across repeated calls
//! and across threads running concurrently.

mod common;

use std::thread;

use iban_core::builtin;
use iban_gen::{generate, GenerateOptions, Generator};
use proptest::prelude::*;

use common::init_tracing;

#[test]
fn de_seed_42_is_stable() {
    init_tracing();
    let first = generate("DE", &GenerateOptions::seeded(42)).unwrap();
    // Fixed for the pinned rand release.
    assert_eq!(first.as_str(), "DE48152564064378610895");
    for _ in 0..100 {
        let again = generate("DE", &GenerateOptions::seeded(42)).unwrap();
        assert_eq!(again.as_str(), first.as_str());
    }
}

#[test]
fn concurrent_seeded_generation_does_not_interfere() {
    init_tracing();
    let expected: Vec<String> = builtin()
        .countries()
        .into_iter()
        .map(|code| generate(code, &GenerateOptions::seeded(42)).unwrap().into_string())
        .collect();

    let results: Vec<Vec<String>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(|| {
                    let generator = Generator::default();
                    builtin()
                        .countries()
                        .into_iter()
                        .map(|code| {
                            generator
                                .generate(code, &GenerateOptions::seeded(42))
                                .unwrap()
                                .into_string()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for result in results {
        assert_eq!(result, expected);
    }
}

#[test]
fn unseeded_generation_still_validates() {
    let a = generate("GB", &GenerateOptions::default()).unwrap();
    assert!(iban_core::is_valid(a.as_str()));
}

proptest! {
    #[test]
    fn any_seed_is_reproducible(seed in any::<u64>()) {
        let a = generate("CH", &GenerateOptions::seeded(seed)).unwrap();
        let b = generate("CH", &GenerateOptions::seeded(seed)).unwrap();
        prop_assert_eq!(a.as_str(), b.as_str());
    }

    #[test]
    fn seeded_batches_are_reproducible(seed in any::<u64>(), count in 1usize..20) {
        let generator = Generator::default();
        let options = GenerateOptions::seeded(seed);
        let a = generator.generate_batch("SC", count, &options).unwrap();
        let b = generator.generate_batch("SC", count, &options).unwrap();
        prop_assert_eq!(a, b);
    }
}
