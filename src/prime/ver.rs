use lazy_static::lazy_static;
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::Rng;

use crate::algo::modpow;

/// Number of Miller-Rabin rounds used by [`is_prime`]
pub const DEFAULT_ROUNDS: usize = 8;

lazy_static! {
    static ref SMALL_PRIMES: Vec<BigUint> = [2u32, 3, 5, 7, 11, 13, 17, 19, 23, 29]
        .iter()
        .map(|&p| BigUint::from(p))
        .collect();
}

/// Checks primality with [`DEFAULT_ROUNDS`] witnesses.
pub fn is_prime(n: &BigUint) -> bool {
    is_probable_prime(n, DEFAULT_ROUNDS)
}

/// Trial division by the small primes followed by `rounds` rounds of Miller-Rabin.
///
/// A composite passes with probability at most `4^-rounds`.
pub fn is_probable_prime(n: &BigUint, rounds: usize) -> bool {
    is_probable_prime_with(rand::thread_rng(), n, rounds)
}

/// Same as [`is_probable_prime`], drawing the witnesses from `rng`.
pub fn is_probable_prime_with(mut rng: impl Rng, n: &BigUint, rounds: usize) -> bool {
    if n < &SMALL_PRIMES[0] {
        return false;
    }
    for p in SMALL_PRIMES.iter() {
        if (n % p).is_zero() {
            return n == p;
        }
    }

    // n >= 31 and odd from here on
    let one = BigUint::one();
    let n_minus_one = n - &one;

    // n - 1 = d * 2^s
    let mut d = n_minus_one.clone();
    let mut s = 0u32;
    while d.is_even() {
        d >>= 1;
        s += 1;
    }

    let two = BigUint::from(2u32);
    let is_witness = |a: &BigUint| {
        let mut x = modpow(a, &d, n);
        if x == one || x == n_minus_one {
            return false;
        }
        for _ in 1..s {
            x = modpow(&x, &two, n);
            if x == n_minus_one {
                return false;
            }
        }
        true
    };

    for _ in 0..rounds {
        // a in [2, n-2]
        let a = rng.gen_biguint_range(&two, &n_minus_one);
        if is_witness(&a) {
            return false;
        }
    }
    true
}
