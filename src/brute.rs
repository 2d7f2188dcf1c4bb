//! Random-sampling key recovery against a KEM ciphertext, and how long an
//! exhaustive search would take.
use std::time::{Duration, Instant};

use log::info;
use rand::Rng;
use zeroize::Zeroizing;

use crate::kem::{simulated::KEY_LEN, Kem};

pub const SECONDS_PER_YEAR: f64 = 60.0 * 60.0 * 24.0 * 365.0;

#[derive(Debug, Clone)]
pub struct BruteForceReport {
    pub found: bool,
    /// the guess that reproduced the shared secret
    pub key: Option<Zeroizing<Vec<u8>>>,
    /// guesses made, including the successful one
    pub attempts: u64,
    /// guesses the backend refused to decapsulate
    pub rejected: u64,
    pub elapsed: Duration,
}

/// Draws up to `attempts` random `key_len`-byte secret keys and decapsulates
/// `ciphertext` with each, stopping at the first one whose output equals
/// `target`.
///
/// A backend error on a guess counts as a miss. Each guess hits with
/// probability `2^-(8 * key_len)`, so for real key sizes this never succeeds.
pub fn brute_force<K: Kem + ?Sized>(
    kem: &K,
    mut rng: impl Rng,
    ciphertext: &[u8],
    target: &[u8],
    attempts: u64,
    key_len: usize,
) -> BruteForceReport {
    let start = Instant::now();
    let mut guess = Zeroizing::new(vec![0u8; key_len]);
    let mut rejected = 0;

    for i in 0..attempts {
        rng.fill(guess.as_mut_slice());
        let matched = match kem.decapsulate(&guess, ciphertext) {
            Ok(shared) => shared.as_slice() == target,
            Err(_) => {
                rejected += 1;
                false
            }
        };
        if matched {
            let elapsed = start.elapsed();
            info!("key found after {} guesses in {:?}", i + 1, elapsed);
            return BruteForceReport {
                found: true,
                key: Some(guess),
                attempts: i + 1,
                rejected,
                elapsed,
            };
        }
    }

    let elapsed = start.elapsed();
    info!(
        "no key found in {} guesses ({} rejected) after {:?}",
        attempts, rejected, elapsed
    );
    BruteForceReport {
        found: false,
        key: None,
        attempts,
        rejected,
        elapsed,
    }
}

/// [`brute_force`] over full-size keys with guesses from the thread rng.
pub fn brute_force_attack<K: Kem + ?Sized>(
    kem: &K,
    ciphertext: &[u8],
    shared: &[u8],
    attempts: u64,
) -> BruteForceReport {
    brute_force(kem, rand::thread_rng(), ciphertext, shared, attempts, KEY_LEN)
}

/// Years needed to try all `2^key_bits` keys at `ops_per_second`.
pub fn estimate_full_search_years(key_bits: u32, ops_per_second: f64) -> f64 {
    2f64.powf(key_bits as f64) / ops_per_second / SECONDS_PER_YEAR
}
