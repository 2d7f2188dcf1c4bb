use num_bigint::{BigUint, RandBigInt};
use rand::{rngs::OsRng, CryptoRng, Rng};

use super::ver;

/// Generates a random prime of exactly `bits` bits using the OS random source.
///
/// Panics if `bits < 2`.
pub fn generate_prime(bits: u64) -> BigUint {
    new_prime(&mut OsRng, bits)
}

/// Samples odd `bits`-wide integers (top and bottom bit forced to one) until
/// one passes the primality test.
///
/// Panics if `bits < 2`, as no such prime exists.
pub fn new_prime<R: Rng + CryptoRng>(rng: &mut R, bits: u64) -> BigUint {
    assert!(bits >= 2, "there are no primes of {} bits", bits);
    loop {
        let mut candidate = rng.gen_biguint(bits);
        candidate.set_bit(bits - 1, true);
        candidate.set_bit(0, true);
        if ver::is_prime(&candidate) {
            return candidate;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primes_have_requested_width() {
        for bits in [2, 3, 8, 16, 32, 64, 128] {
            let p = generate_prime(bits);
            assert_eq!(p.bits(), bits);
            assert!(ver::is_prime(&p));
        }
    }

    #[test]
    fn two_bit_prime_is_three() {
        assert_eq!(generate_prime(2), BigUint::from(3u32));
    }

    #[test]
    #[should_panic]
    fn one_bit_is_rejected() {
        generate_prime(1);
    }
}
