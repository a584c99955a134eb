//! Process-wide default random seed generator.
//!
//! Simulations that are not given an explicit seed draw one from here. The
//! generator behind [`get_random_seed`] is built lazily on first use, cached in
//! a single process-wide [`SeedSlot`], and can be discarded with
//! [`clear_seed_rng`].
//!
//! Each process owns its own generator. The slot remembers which process built
//! the cached instance, so a child forked after the parent has drawn seeds
//! does not replay the parent's stream: it sees an empty slot and builds a
//! fresh generator from its own entropy.

use chrono::{DateTime, Utc};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use std::process;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace, warn};

/// Smallest seed ever returned.
pub const MIN_SEED: u32 = 1;

/// Largest seed ever returned (`2^32 - 1`).
pub const MAX_SEED: u32 = u32::MAX;

/// Distinguishes generators built within one process in the same clock tick.
static CONSTRUCTION_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Where a generator's initial state came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropySource {
    /// OS randomness mixed with process id and clock.
    Os,
    /// Process id and clock only; OS randomness was unavailable.
    ClockAndPid,
    /// Caller-supplied seed.
    Fixed,
}

#[derive(Debug)]
struct SeedRngState {
    rng: StdRng,
    draws: u64,
}

/// Handle to one seed generator instance.
///
/// Clones share the same stream: drawing through any clone advances the
/// instance held by the slot it came from.
#[derive(Debug, Clone)]
pub struct SeedRng {
    state: Arc<Mutex<SeedRngState>>,
    pid: u32,
    created_at: DateTime<Utc>,
    source: EntropySource,
}

impl SeedRng {
    /// Build a generator from OS entropy mixed with process identity and the
    /// high-resolution clock.
    ///
    /// Never fails: if the OS source errors, the process/clock mix alone is
    /// used and a warning is logged.
    pub fn from_entropy() -> Self {
        let pid = process::id();
        let mut seed = <StdRng as SeedableRng>::Seed::default();
        let source = match OsRng.try_fill_bytes(&mut seed) {
            Ok(()) => EntropySource::Os,
            Err(e) => {
                warn!(pid, error = %e, "OS entropy unavailable, seeding from clock and pid");
                EntropySource::ClockAndPid
            }
        };
        mix_process_entropy(&mut seed, pid);

        debug!(pid, source = ?source, "Constructed seed generator");
        Self::build(StdRng::from_seed(seed), pid, source)
    }

    /// Build a reproducible generator from a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::build(StdRng::seed_from_u64(seed), process::id(), EntropySource::Fixed)
    }

    fn build(rng: StdRng, pid: u32, source: EntropySource) -> Self {
        Self {
            state: Arc::new(Mutex::new(SeedRngState { rng, draws: 0 })),
            pid,
            created_at: Utc::now(),
            source,
        }
    }

    /// Draw one seed, uniform over `MIN_SEED..=MAX_SEED`.
    pub fn next_seed(&self) -> u32 {
        let mut state = lock(&self.state);
        state.draws += 1;
        let seed = state.rng.gen_range(MIN_SEED..=MAX_SEED);
        trace!(seed, draws = state.draws, "Drew random seed");
        seed
    }

    /// Id of the process that built this generator.
    pub fn pid(&self) -> u32 {
        self.pid
    }

    /// When this generator was built.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn source(&self) -> EntropySource {
        self.source
    }

    /// Number of seeds drawn from this instance so far, across all clones.
    pub fn draws(&self) -> u64 {
        lock(&self.state).draws
    }

    /// Whether `self` and `other` are handles to the same instance.
    pub fn same_instance(&self, other: &SeedRng) -> bool {
        Arc::ptr_eq(&self.state, &other.state)
    }

    fn owned_by_current_process(&self) -> bool {
        self.pid == process::id()
    }
}

/// A single optional slot holding the current seed generator.
///
/// All access goes through one mutex, so two threads hitting an empty slot
/// build exactly one generator between them.
#[derive(Debug, Default)]
pub struct SeedSlot {
    current: Mutex<Option<SeedRng>>,
}

impl SeedSlot {
    pub const fn new() -> Self {
        Self {
            current: Mutex::new(None),
        }
    }

    /// The cached generator, if one was built by this process.
    ///
    /// An instance inherited across `fork` belongs to the parent and is
    /// reported as absent.
    pub fn get(&self) -> Option<SeedRng> {
        lock(&self.current)
            .as_ref()
            .filter(|rng| rng.owned_by_current_process())
            .cloned()
    }

    /// The cached generator, building one first if the slot is empty or holds
    /// an instance from another process.
    pub fn get_or_init(&self) -> SeedRng {
        let mut current = lock(&self.current);
        if let Some(rng) = current.as_ref().filter(|rng| rng.owned_by_current_process()) {
            return rng.clone();
        }
        if let Some(stale) = current.take() {
            debug!(
                owner_pid = stale.pid,
                owner_created_at = %stale.created_at(),
                pid = process::id(),
                "Discarding seed generator inherited from another process"
            );
        }
        let rng = SeedRng::from_entropy();
        *current = Some(rng.clone());
        rng
    }

    /// Install `rng` as the cached generator, returning the previous one.
    pub fn set(&self, rng: SeedRng) -> Option<SeedRng> {
        lock(&self.current).replace(rng)
    }

    /// Drop the cached generator; the next draw rebuilds it.
    pub fn clear(&self) {
        if lock(&self.current).take().is_some() {
            debug!(pid = process::id(), "Cleared seed generator");
        }
    }

    /// Draw one seed from the cached generator, building it if needed.
    pub fn next_seed(&self) -> u32 {
        self.get_or_init().next_seed()
    }
}

static SEED_RNG: SeedSlot = SeedSlot::new();

/// The process-wide slot behind [`get_random_seed`].
pub fn global_slot() -> &'static SeedSlot {
    &SEED_RNG
}

/// Return a fresh positive seed from the process-wide generator.
pub fn get_random_seed() -> u32 {
    SEED_RNG.next_seed()
}

/// Discard the process-wide generator.
pub fn clear_seed_rng() {
    SEED_RNG.clear();
}

/// The process-wide generator, or `None` if this process has not drawn a seed
/// since start or since the last [`clear_seed_rng`].
pub fn get_seed_rng() -> Option<SeedRng> {
    SEED_RNG.get()
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// XOR the clock, pid and a per-process counter into `seed`, so generators
/// built by sibling processes in the same instant still diverge even without
/// OS entropy.
fn mix_process_entropy(seed: &mut [u8; 32], pid: u32) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or_default();
    let counter = CONSTRUCTION_COUNTER.fetch_add(1, Ordering::Relaxed);
    let words = [
        nanos as u64,
        (nanos >> 64) as u64,
        u64::from(pid),
        counter,
    ];
    for (chunk, word) in seed.chunks_exact_mut(8).zip(words) {
        for (byte, mix) in chunk.iter_mut().zip(splitmix64(word).to_le_bytes()) {
            *byte ^= mix;
        }
    }
}

fn splitmix64(x: u64) -> u64 {
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}
