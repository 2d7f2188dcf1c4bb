//! Settings for a harness run. Every component receives what it needs from
//! here explicitly; nothing is read from global state.
use crate::{
    kem::simulated::KEY_LEN,
    rsa::{EXP, FALLBACK_EXP, MAX_PRIME_BITS, MIN_PRIME_BITS},
};

/// Message used by the demos
pub const DEMO_MESSAGE: &[u8] = b"Quantum?";

/// How the prime width relates to the message being encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModulusSizing {
    /// Use `prime_bits` as configured. Messages at or above the modulus are
    /// rejected with `MessageTooLarge`.
    Preserve,
    /// Widen the primes until the modulus is guaranteed to exceed the message
    /// by at least `margin_bits`.
    FitMessage { margin_bits: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsaConfig {
    /// width of each prime
    pub prime_bits: u64,
    pub public_exponent: u64,
    pub fallback_exponent: u64,
    pub sizing: ModulusSizing,
}

#[derive(Debug, Clone, PartialEq)]
pub struct KemConfig {
    /// guesses made by the brute force attack
    pub attempts: u64,
    /// length of each guessed secret key
    pub key_len: usize,
    /// key size used for the full search estimate
    pub key_bits: u32,
    pub ops_per_second: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HarnessConfig {
    pub message: Vec<u8>,
    pub rsa: RsaConfig,
    pub kem: KemConfig,
    /// whether the AES-GCM step of the KEM run is performed
    pub aead_available: bool,
}

impl Default for RsaConfig {
    fn default() -> Self {
        Self {
            prime_bits: 16,
            public_exponent: EXP,
            fallback_exponent: FALLBACK_EXP,
            sizing: ModulusSizing::Preserve,
        }
    }
}

impl Default for KemConfig {
    fn default() -> Self {
        Self {
            attempts: 10_000,
            key_len: KEY_LEN,
            key_bits: 256,
            ops_per_second: 1e7,
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            message: DEMO_MESSAGE.to_vec(),
            rsa: RsaConfig::default(),
            kem: KemConfig::default(),
            aead_available: true,
        }
    }
}

impl RsaConfig {
    /// Exponents in the order key generation tries them
    pub fn exponents(&self) -> Vec<u64> {
        let mut exps = vec![self.public_exponent];
        if self.fallback_exponent != self.public_exponent {
            exps.push(self.fallback_exponent);
        }
        exps
    }

    /// Prime width to use for a message of `message_bits` bits.
    ///
    /// Two `k`-bit primes give a modulus of at least `2^(2k - 2)`, so
    /// `FitMessage` picks the smallest `k` with `2k - 2 >= message_bits + margin`.
    pub fn prime_bits_for(&self, message_bits: u64) -> u64 {
        match self.sizing {
            ModulusSizing::Preserve => self.prime_bits,
            ModulusSizing::FitMessage { margin_bits } => {
                let needed = (message_bits + margin_bits + 2 + 1) / 2;
                needed
                    .max(self.prime_bits)
                    .max(MIN_PRIME_BITS)
                    .min(MAX_PRIME_BITS)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = HarnessConfig::default();
        assert_eq!(config.message, b"Quantum?");
        assert_eq!(config.rsa.prime_bits, 16);
        assert_eq!(config.rsa.exponents(), vec![65537, 17]);
        assert_eq!(config.kem.attempts, 10_000);
        assert!(config.aead_available);
    }

    #[test]
    fn duplicate_fallback_is_dropped() {
        let rsa = RsaConfig {
            fallback_exponent: EXP,
            ..RsaConfig::default()
        };
        assert_eq!(rsa.exponents(), vec![EXP]);
    }

    #[test]
    fn preserve_ignores_message() {
        let rsa = RsaConfig::default();
        assert_eq!(rsa.prime_bits_for(63), 16);
    }

    #[test]
    fn fit_message_widens_primes() {
        let rsa = RsaConfig {
            sizing: ModulusSizing::FitMessage { margin_bits: 2 },
            ..RsaConfig::default()
        };
        // 2 * 34 - 2 = 66 >= 63 + 2
        assert_eq!(rsa.prime_bits_for(63), 34);
        // never below the configured width
        assert_eq!(rsa.prime_bits_for(8), 16);
    }
}
