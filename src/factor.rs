//! Breaking toy RSA keys by factoring the modulus.
//!
//! Once `n = p * q` is split, phi and therefore `d` follow directly from the
//! public exponent. Trial division is only feasible because the primes are
//! tiny; for a 32 bit modulus it takes at most 2^16 divisions.
use std::time::{Duration, Instant};

use log::{debug, info};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use thiserror::Error;

use crate::{
    algo::{self, NoInverse},
    rsa::{self, RsaPublic},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FactorError {
    #[error("{0} has no divisor up to its square root")]
    NoDivisor(BigUint),

    #[error("recovered factors do not yield a private exponent: {0}")]
    NoInverse(#[from] NoInverse),

    #[error("recovered key decrypts to {recovered:02x?}, expected {expected:02x?}")]
    PlaintextMismatch { expected: Vec<u8>, recovered: Vec<u8> },
}

/// Outcome of a successful factoring attack
#[derive(Debug, Clone)]
pub struct FactorAttackReport {
    pub p: BigUint,
    pub q: BigUint,
    /// private exponent re-derived from `p` and `q`
    pub d: BigUint,
    /// plaintext decrypted with the recovered exponent
    pub plaintext: Vec<u8>,
    /// number of trial divisions performed
    pub attempts: u64,
    pub elapsed: Duration,
}

/// Prime widths above this make trial division take noticeably long
pub const SLOW_PRIME_BITS: u64 = 24;

/// Whether factoring a modulus built from two `prime_bits`-wide primes needs
/// more than `2^SLOW_PRIME_BITS` divisions.
pub fn trial_division_is_slow(prime_bits: u64) -> bool {
    prime_bits > SLOW_PRIME_BITS
}

/// Splits `n` into `(a, n / a)` where `a` is its smallest divisor above one.
pub fn factor(n: &BigUint) -> Result<(BigUint, BigUint), FactorError> {
    trial_divide(n).map(|(p, q, _)| (p, q))
}

fn trial_divide(n: &BigUint) -> Result<(BigUint, BigUint, u64), FactorError> {
    let limit = n.sqrt();
    let mut a = BigUint::from(2u32);
    let mut attempts = 0u64;
    while a <= limit {
        attempts += 1;
        if (n % &a).is_zero() {
            let b = n / &a;
            return Ok((a, b, attempts));
        }
        a += 1u32;
    }
    Err(FactorError::NoDivisor(n.clone()))
}

/// `d = e^-1 mod (p - 1)(q - 1)`
pub fn recover_private_exponent(
    e: &BigUint,
    p: &BigUint,
    q: &BigUint,
) -> Result<BigUint, NoInverse> {
    algo::modinv(e, &rsa::totient(p, q))
}

/// Recovers the private key from the public one and decrypts `cipher` with it.
///
/// The attack only counts as successful when the result matches `expected`,
/// the plaintext obtained by the legitimate key holder.
pub fn break_rsa(
    public: &RsaPublic,
    cipher: &BigUint,
    expected: &[u8],
) -> Result<FactorAttackReport, FactorError> {
    let start = Instant::now();
    let (p, q, attempts) = trial_divide(public.n())?;
    debug!("factored n={} into {} * {}", public.n(), p, q);

    let d = recover_private_exponent(public.e(), &p, &q)?;
    let plaintext = rsa::decrypt(cipher, &d, public.n());
    let elapsed = start.elapsed();

    if plaintext != expected {
        return Err(FactorError::PlaintextMismatch {
            expected: expected.to_vec(),
            recovered: plaintext,
        });
    }
    info!(
        "recovered d={} after {} divisions in {:?}",
        d, attempts, elapsed
    );
    Ok(FactorAttackReport {
        p,
        q,
        d,
        plaintext,
        attempts,
        elapsed,
    })
}

/// Whether `(p, q)` is a non-trivial factorisation of `n`.
pub fn is_nontrivial_split(n: &BigUint, p: &BigUint, q: &BigUint) -> bool {
    let one = BigUint::one();
    &(p * q) == n && p > &one && q > &one && p < n && q < n
}
