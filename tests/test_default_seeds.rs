// Integration tests for the process-wide default seed generator

mod common;

use simcore::seed::{clear_seed_rng, get_random_seed, get_seed_rng, global_slot, SeedRng};

#[test]
fn test_seed_generator_init() {
    let _guard = common::global_seed_guard();

    clear_seed_rng();
    assert!(get_seed_rng().is_none());

    let seed = get_random_seed();
    assert!(seed > 0);
    assert!(get_seed_rng().is_some());
}

#[test]
fn test_clear_resets_until_next_draw() {
    let _guard = common::global_seed_guard();

    get_random_seed();
    let before = get_seed_rng().unwrap();

    clear_seed_rng();
    assert!(get_seed_rng().is_none());
    assert!(get_seed_rng().is_none());

    get_random_seed();
    let after = get_seed_rng().unwrap();
    assert!(!before.same_instance(&after));
}

#[test]
fn test_unique() {
    let _guard = common::global_seed_guard();
    let n = 100;

    clear_seed_rng();
    let seeds1: Vec<u32> = (0..n).map(|_| get_random_seed()).collect();
    common::assert_unique_positive(&seeds1);

    let seeds2: Vec<u32> = (0..n).map(|_| get_random_seed()).collect();
    common::assert_unique_positive(&seeds2);

    let all: Vec<u32> = seeds1.iter().chain(&seeds2).copied().collect();
    assert_eq!(all.len(), 2 * n);
    common::assert_unique_positive(&all);
}

#[test]
fn test_draws_reuse_one_instance() {
    let _guard = common::global_seed_guard();

    clear_seed_rng();
    get_random_seed();
    let rng = get_seed_rng().unwrap();
    for _ in 0..9 {
        get_random_seed();
    }
    assert!(rng.same_instance(&get_seed_rng().unwrap()));
    assert_eq!(rng.draws(), 10);
    assert_eq!(rng.pid(), std::process::id());
}

#[test]
fn test_handle_draws_from_cached_stream() {
    let _guard = common::global_seed_guard();

    global_slot().set(SeedRng::with_seed(2024));
    let reference = SeedRng::with_seed(2024);

    let handle = get_seed_rng().unwrap();
    assert_eq!(handle.next_seed(), reference.next_seed());
    assert_eq!(get_random_seed(), reference.next_seed());
    assert_eq!(handle.draws(), 2);

    clear_seed_rng();
}
