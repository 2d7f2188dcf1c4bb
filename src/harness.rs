//! End-to-end runs: build a key, use it legitimately, then break it.
use std::fmt;

use log::{debug, info, warn};
use num_bigint::BigUint;
use rand::rngs::OsRng;
use thiserror::Error;

use crate::{
    brute::{self, BruteForceReport},
    config::HarnessConfig,
    factor::{self, FactorAttackReport, FactorError},
    kem::{Kem, KemBackend, KemError},
    letter::{Letter, LetterError},
    rsa::{self, RsaError, RsaGenError, RsaKeypair},
};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("key generation: {0}")]
    KeyGeneration(#[from] RsaGenError),

    #[error("encryption: {0}")]
    Rsa(#[from] RsaError),

    #[error("attack: {0}")]
    Factor(#[from] FactorError),

    #[error("kem: {0}")]
    Kem(#[from] KemError),

    #[error("letter: {0}")]
    Letter(#[from] LetterError),

    #[error("decapsulation by the key holder did not reproduce the shared secret")]
    SharedSecretMismatch,
}

#[derive(Debug)]
pub struct RsaRunReport {
    pub keypair: RsaKeypair,
    pub cipher: BigUint,
    /// plaintext from the legitimate key
    pub decrypted: Vec<u8>,
    pub attack: FactorAttackReport,
}

#[derive(Debug)]
pub struct KemRunReport {
    pub backend: &'static str,
    pub ciphertext: Vec<u8>,
    /// message after the AES-GCM round trip, `None` when AEAD is unavailable
    pub recovered: Option<Vec<u8>>,
    pub brute_force: BruteForceReport,
    pub estimated_years: f64,
    pub key_bits: u32,
    pub ops_per_second: f64,
}

/// Generates a toy RSA key, encrypts the configured message and recovers it
/// by factoring the modulus.
pub fn run_rsa(config: &HarnessConfig) -> Result<RsaRunReport, HarnessError> {
    let message_bits = rsa::int_from_bytes(&config.message).bits();
    let bits = config.rsa.prime_bits_for(message_bits);
    if factor::trial_division_is_slow(bits) {
        warn!(
            "{}-bit primes need up to 2^{} trial divisions, the attack may take a long time",
            bits, bits
        );
    }
    let keypair = rsa::generate_rsa_keypair_with(&mut OsRng, bits, &config.rsa.exponents())?;
    info!(
        "generated RSA key: n={} ({} bits), e={}",
        keypair.n(),
        keypair.n().bits(),
        keypair.e()
    );

    let cipher = keypair.public().encrypt(&config.message)?;
    debug!("ciphertext: {}", cipher);
    let decrypted = keypair.private().decrypt(&cipher);

    let attack = factor::break_rsa(&keypair.public(), &cipher, &decrypted)?;
    Ok(RsaRunReport {
        keypair,
        cipher,
        decrypted,
        attack,
    })
}

/// Encapsulates against a fresh key pair, protects the configured message with
/// the derived AES key, then tries to recover the secret key by sampling.
pub fn run_kem(config: &HarnessConfig, kem: &KemBackend) -> Result<KemRunReport, HarnessError> {
    info!("running KEM demo with backend {}", kem.name());
    let keypair = kem.generate_keypair()?;
    let enc = kem.encapsulate(&keypair.public)?;
    if kem.decapsulate(&keypair.secret, &enc.ciphertext)? != enc.shared {
        return Err(HarnessError::SharedSecretMismatch);
    }

    let recovered = if config.aead_available {
        let letter = Letter::from_encapsulation(&enc, &config.message)?;
        Some(letter.open(kem, &keypair.secret)?)
    } else {
        warn!("AEAD not available, skipping symmetric encryption");
        None
    };

    let brute_force = brute::brute_force(
        kem,
        rand::thread_rng(),
        &enc.ciphertext,
        &enc.shared,
        config.kem.attempts,
        config.kem.key_len,
    );
    let estimated_years =
        brute::estimate_full_search_years(config.kem.key_bits, config.kem.ops_per_second);

    Ok(KemRunReport {
        backend: kem.name(),
        ciphertext: enc.ciphertext,
        recovered,
        brute_force,
        estimated_years,
        key_bits: config.kem.key_bits,
        ops_per_second: config.kem.ops_per_second,
    })
}

impl fmt::Display for RsaRunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "n={} ({} bits) e={}",
            self.keypair.n(),
            self.keypair.n().bits(),
            self.keypair.e()
        )?;
        writeln!(f, "ciphertext: {}", self.cipher)?;
        writeln!(f, "decrypted (legit): {}", hex::encode(&self.decrypted))?;
        writeln!(
            f,
            "factors: p={} q={} after {} divisions in {:?}",
            self.attack.p, self.attack.q, self.attack.attempts, self.attack.elapsed
        )?;
        write!(f, "decrypted (attack): {}", hex::encode(&self.attack.plaintext))
    }
}

impl fmt::Display for KemRunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "backend: {}", self.backend)?;
        writeln!(f, "ciphertext: {}", hex::encode(&self.ciphertext))?;
        match &self.recovered {
            Some(msg) => writeln!(f, "recovered (legit): {}", hex::encode(msg))?,
            None => writeln!(f, "recovered (legit): skipped, no AEAD")?,
        }
        let bf = &self.brute_force;
        writeln!(
            f,
            "sampling attempts: {}, elapsed {:?}, found={}",
            bf.attempts, bf.elapsed, bf.found
        )?;
        if let Some(key) = &bf.key {
            writeln!(f, "found private key: {}", hex::encode(key.as_slice()))?;
        }
        write!(
            f,
            "full search of {} bits at {:.0} ops/s: {:.2e} years",
            self.key_bits, self.ops_per_second, self.estimated_years
        )
    }
}
