//! Common test utilities and helpers for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - proptest configuration presets
//! - generators for integer-like and non-integer values
//! - a lock serializing tests that touch the process-wide seed generator

#![allow(dead_code)]

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Standard proptest configuration with 100 iterations.
pub fn proptest_config() -> ProptestConfig {
    ProptestConfig {
        cases: 100,
        ..ProptestConfig::default()
    }
}

static GLOBAL_SEED_LOCK: Mutex<()> = Mutex::new(());

/// Hold for the duration of any test that clears or draws from the
/// process-wide seed generator.
pub fn global_seed_guard() -> MutexGuard<'static, ()> {
    GLOBAL_SEED_LOCK
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Panic unless every value in `seeds` is distinct and positive.
pub fn assert_unique_positive(seeds: &[u32]) {
    let unique: HashSet<u32> = seeds.iter().copied().collect();
    assert_eq!(unique.len(), seeds.len(), "duplicate seeds in {:?}", seeds);
    assert!(seeds.iter().all(|&s| s > 0), "non-positive seed in {:?}", seeds);
}

/// Format `n` with `_` between every group of three digits.
pub fn with_digit_groups(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push('_');
        }
        out.push(c);
    }
    out
}

/// Finite floats with a non-zero fractional part.
pub fn fractional_f64() -> impl Strategy<Value = f64> {
    (-1_000_000i64..1_000_000, 1u32..1000)
        .prop_map(|(whole, frac)| whole as f64 + f64::from(frac) / 1000.0)
}
