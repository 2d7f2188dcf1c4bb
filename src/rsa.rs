//! Textbook RSA over toy-sized primes.
//!
//! The keys produced here are deliberately tiny so that [`crate::factor`] can
//! break them by trial division in a fraction of a second. There is no
//! padding and nothing runs in constant time.
use log::{debug, warn};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{rngs::OsRng, CryptoRng, Rng};
use thiserror::Error;

use crate::{
    algo::{self, NoInverse},
    prime::{gen, ver},
};

/// Smallest accepted width of a single prime
pub const MIN_PRIME_BITS: u64 = 8;
/// Largest accepted width of a single prime
pub const MAX_PRIME_BITS: u64 = 512;

/// Default exponent for RSA keys
pub const EXP: u64 = 65537;
/// Exponent tried when [`EXP`] shares a factor with phi
pub const FALLBACK_EXP: u64 = 17;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsaError {
    #[error("message ({message}) is not smaller than the modulus ({modulus})")]
    MessageTooLarge { message: BigUint, modulus: BigUint },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RsaGenError {
    #[error("prime size is too small")]
    KeyTooSmall,

    #[error("prime size is too big")]
    KeyTooBig,

    #[error("p and q must be distinct")]
    EqualPrimes,

    #[error("{0} is not a prime")]
    NotAPrime(BigUint),

    #[error("no usable public exponent among {tried:?}")]
    NoUsableExponent { tried: Vec<u64> },

    #[error(transparent)]
    NoInverse(#[from] NoInverse),
}

/// Rsa private key
#[derive(Debug, Clone)]
pub struct RsaPrivate {
    d: BigUint,
    n: BigUint,
}

/// Rsa public key
#[derive(Debug, Clone)]
pub struct RsaPublic {
    e: BigUint,
    n: BigUint,
}

/// Full key material. `p`, `q` and `d` are private, `n` and `e` public.
#[derive(Debug, Clone)]
pub struct RsaKeypair {
    p: BigUint,
    q: BigUint,
    n: BigUint,
    e: BigUint,
    d: BigUint,
}

impl RsaKeypair {
    /// Builds a keypair from two distinct primes and a public exponent.
    #[allow(clippy::many_single_char_names)]
    pub fn from_primes(p: BigUint, q: BigUint, e: BigUint) -> Result<Self, RsaGenError> {
        if p == q {
            return Err(RsaGenError::EqualPrimes);
        }
        for x in [&p, &q] {
            if !ver::is_prime(x) {
                return Err(RsaGenError::NotAPrime(x.clone()));
            }
        }
        let n = &p * &q;
        let phi = totient(&p, &q);
        let d = algo::modinv(&e, &phi)?;
        Ok(Self { p, q, n, e, d })
    }

    pub fn public(&self) -> RsaPublic {
        RsaPublic {
            e: self.e.clone(),
            n: self.n.clone(),
        }
    }

    pub fn private(&self) -> RsaPrivate {
        RsaPrivate {
            d: self.d.clone(),
            n: self.n.clone(),
        }
    }

    /// Get a reference to the keypair's p.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Get a reference to the keypair's q.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// Get a reference to the keypair's n.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Get a reference to the keypair's e.
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// Get a reference to the keypair's d.
    pub fn d(&self) -> &BigUint {
        &self.d
    }
}

impl RsaPrivate {
    pub fn decrypt(&self, cipher: &BigUint) -> Vec<u8> {
        decrypt(cipher, &self.d, &self.n)
    }

    /// Get a reference to the rsa private's n.
    pub fn n(&self) -> &BigUint {
        &self.n
    }

    /// Get a reference to the rsa private's d.
    pub fn d(&self) -> &BigUint {
        &self.d
    }
}

impl RsaPublic {
    pub fn encrypt(&self, message: &[u8]) -> Result<BigUint, RsaError> {
        encrypt(message, &self.n, &self.e)
    }

    /// Get a reference to the rsa public's e.
    pub fn e(&self) -> &BigUint {
        &self.e
    }

    /// Get a reference to the rsa public's n.
    pub fn n(&self) -> &BigUint {
        &self.n
    }
}

/// `(p - 1) * (q - 1)`
pub fn totient(p: &BigUint, q: &BigUint) -> BigUint {
    (p - 1u32) * (q - 1u32)
}

/// Generates a keypair from two `bits`-wide primes, trying [`EXP`] and then
/// [`FALLBACK_EXP`].
pub fn generate_rsa_keypair(bits: u64) -> Result<RsaKeypair, RsaGenError> {
    generate_rsa_keypair_with(&mut OsRng, bits, &[EXP, FALLBACK_EXP])
}

/// Generates a keypair from two distinct `bits`-wide primes, using the first
/// exponent in `exponents` that is coprime with phi.
#[allow(clippy::many_single_char_names)]
pub fn generate_rsa_keypair_with<R: Rng + CryptoRng>(
    rng: &mut R,
    bits: u64,
    exponents: &[u64],
) -> Result<RsaKeypair, RsaGenError> {
    if bits < MIN_PRIME_BITS {
        return Err(RsaGenError::KeyTooSmall);
    }
    if bits > MAX_PRIME_BITS {
        return Err(RsaGenError::KeyTooBig);
    }

    let (p, q) = gen_prime_pair(rng, bits);
    let n = &p * &q;
    let phi = totient(&p, &q);
    debug!("drew primes, n={} has {} bits", n, n.bits());

    for (i, &exp) in exponents.iter().enumerate() {
        let e = BigUint::from(exp);
        match algo::modinv(&e, &phi) {
            Ok(d) => {
                if i > 0 {
                    warn!("falling back to public exponent {}", exp);
                }
                return Ok(RsaKeypair { p, q, n, e, d });
            }
            Err(err) => debug!("exponent rejected: {}", err),
        }
    }
    Err(RsaGenError::NoUsableExponent {
        tried: exponents.to_vec(),
    })
}

fn gen_prime_pair<R: Rng + CryptoRng>(rng: &mut R, bits: u64) -> (BigUint, BigUint) {
    let p = gen::new_prime(rng, bits);
    loop {
        let q = gen::new_prime(rng, bits);
        if p != q {
            break (p, q);
        }
    }
}

/// Interprets bytes as a big-endian unsigned integer.
pub fn int_from_bytes(bytes: &[u8]) -> BigUint {
    BigUint::from_bytes_be(bytes)
}

/// Minimal big-endian encoding. Zero encodes as the empty string.
pub fn int_to_bytes(num: &BigUint) -> Vec<u8> {
    if num.is_zero() {
        Vec::new()
    } else {
        num.to_bytes_be()
    }
}

/// Computes `m^e mod n` for the message read as a big-endian integer.
/// The message must be smaller than `n`; it is never reduced or truncated.
pub fn encrypt(message: &[u8], n: &BigUint, e: &BigUint) -> Result<BigUint, RsaError> {
    let m = int_from_bytes(message);
    if &m >= n {
        return Err(RsaError::MessageTooLarge {
            message: m,
            modulus: n.clone(),
        });
    }
    Ok(algo::modpow(&m, e, n))
}

/// Computes `c^d mod n`. Leading zero bytes of the original message are not
/// recovered.
pub fn decrypt(cipher: &BigUint, d: &BigUint, n: &BigUint) -> Vec<u8> {
    int_to_bytes(&algo::modpow(cipher, d, n))
}

/// Whether `e` can serve as a public exponent for `p * q`.
pub fn is_usable_exponent(e: &BigUint, p: &BigUint, q: &BigUint) -> bool {
    e.gcd(&totient(p, q)).is_one()
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    fn check_keypair(kp: &RsaKeypair) {
        assert_ne!(kp.p(), kp.q());
        assert!(ver::is_prime(kp.p()));
        assert!(ver::is_prime(kp.q()));
        assert_eq!(kp.n(), &(kp.p() * kp.q()));
        assert!(is_usable_exponent(kp.e(), kp.p(), kp.q()));
        let phi = totient(kp.p(), kp.q());
        assert!((kp.e() * kp.d() % phi).is_one());
    }

    #[test]
    fn keypair_invariants() {
        for bits in [8, 12, 16, 24, 32, 64] {
            let kp = generate_rsa_keypair(bits).unwrap();
            check_keypair(&kp);
        }
    }

    #[test]
    fn key_size_bounds() {
        assert_eq!(generate_rsa_keypair(7).unwrap_err(), RsaGenError::KeyTooSmall);
        assert_eq!(generate_rsa_keypair(513).unwrap_err(), RsaGenError::KeyTooBig);
    }

    #[test]
    fn sixteen_bit_primes_with_fallback() {
        let p = gen::generate_prime(16);
        let mut q = gen::generate_prime(16);
        while q == p {
            q = gen::generate_prime(16);
        }
        let mut e = BigUint::from(EXP);
        if !is_usable_exponent(&e, &p, &q) {
            e = BigUint::from(FALLBACK_EXP);
        }
        let kp = RsaKeypair::from_primes(p, q, e).unwrap();
        check_keypair(&kp);
    }

    #[test]
    fn falls_back_when_first_exponent_is_unusable() {
        // 2 always divides phi of two odd primes
        let kp = generate_rsa_keypair_with(&mut OsRng, 16, &[2, EXP, FALLBACK_EXP]).unwrap();
        assert_ne!(kp.e(), &BigUint::from(2u32));
        check_keypair(&kp);
    }

    #[test]
    fn no_usable_exponent() {
        let err = generate_rsa_keypair_with(&mut OsRng, 16, &[2, 4]).unwrap_err();
        assert_eq!(err, RsaGenError::NoUsableExponent { tried: vec![2, 4] });
    }

    #[test]
    fn from_primes_rejects_bad_input() {
        let p = BigUint::from(61u32);
        let q = BigUint::from(53u32);
        let e = BigUint::from(17u32);
        assert_eq!(
            RsaKeypair::from_primes(p.clone(), p.clone(), e.clone()).unwrap_err(),
            RsaGenError::EqualPrimes
        );
        assert_eq!(
            RsaKeypair::from_primes(p.clone(), BigUint::from(51u32), e.clone()).unwrap_err(),
            RsaGenError::NotAPrime(BigUint::from(51u32))
        );
        // phi = 3120 = 2^4 * 3 * 5 * 13
        assert!(matches!(
            RsaKeypair::from_primes(p.clone(), q.clone(), BigUint::from(13u32)),
            Err(RsaGenError::NoInverse(_))
        ));
        let kp = RsaKeypair::from_primes(p, q, e).unwrap();
        assert_eq!(kp.d(), &BigUint::from(2753u32));
    }

    #[test]
    fn textbook_vector() {
        let kp = RsaKeypair::from_primes(61u32.into(), 53u32.into(), 17u32.into()).unwrap();
        let c = kp.public().encrypt(&[65]).unwrap();
        assert_eq!(c, BigUint::from(2790u32));
        assert_eq!(kp.private().decrypt(&c), vec![65]);
    }

    #[test]
    fn small_message_round_trip() {
        let kp = generate_rsa_keypair(16).unwrap();
        // 8 bytes whose value stays below any 31-bit modulus
        let message = [0, 0, 0, 0, 0, 0, 0x12, 0x34];
        let c = encrypt(&message, kp.n(), kp.e()).unwrap();
        assert!(&c < kp.n());
        assert_eq!(decrypt(&c, kp.d(), kp.n()), vec![0x12, 0x34]);
    }

    #[test]
    fn message_too_large() {
        let kp = generate_rsa_keypair(16).unwrap();
        let message = b"Quantum?";
        let err = encrypt(message, kp.n(), kp.e()).unwrap_err();
        assert_eq!(
            err,
            RsaError::MessageTooLarge {
                message: int_from_bytes(message),
                modulus: kp.n().clone(),
            }
        );
        // the boundary itself is rejected too
        let n_bytes = kp.n().to_bytes_be();
        encrypt(&n_bytes, kp.n(), kp.e()).unwrap_err();
    }

    struct Capture;

    lazy_static::lazy_static! {
        static ref RECORDS: std::sync::Mutex<Vec<String>> = std::sync::Mutex::new(Vec::new());
    }

    impl log::Log for Capture {
        fn enabled(&self, _: &log::Metadata) -> bool {
            true
        }

        fn log(&self, record: &log::Record) {
            if record.target() == module_path!().trim_end_matches("::tests") {
                RECORDS
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    static CAPTURE: Capture = Capture;

    #[test]
    fn keygen_logs_only_public_values() {
        // another test may have installed the logger already
        let _ = log::set_logger(&CAPTURE);
        log::set_max_level(log::LevelFilter::Trace);

        let kp = generate_rsa_keypair(16).unwrap();
        let records = RECORDS.lock().unwrap();
        let keygen: Vec<_> = records.iter().filter(|r| r.starts_with("drew primes")).collect();
        assert!(!keygen.is_empty());
        assert!(keygen.iter().any(|r| r.contains(&kp.n().to_string())));
        for r in keygen {
            assert!(!r.contains("p=") && !r.contains("q="), "{}", r);
        }
    }

    #[test]
    fn largest_message_round_trips() {
        for _ in 0..20 {
            let kp = generate_rsa_keypair(16).unwrap();
            let m = kp.n() - 1u32;
            let c = encrypt(&int_to_bytes(&m), kp.n(), kp.e()).unwrap();
            assert_eq!(int_from_bytes(&decrypt(&c, kp.d(), kp.n())), m);
        }
    }

    #[test]
    fn zero_encodes_empty() {
        assert!(int_to_bytes(&BigUint::zero()).is_empty());
        assert_eq!(int_from_bytes(&[]), BigUint::zero());
        assert_eq!(int_to_bytes(&BigUint::from(0x0102u32)), vec![1, 2]);
    }

    quickcheck! {
        fn round_trip(m: u32) -> bool {
            let kp = generate_rsa_keypair(20).unwrap();
            // n > 2^38, so every u32 fits
            let m = BigUint::from(m);
            let c = encrypt(&int_to_bytes(&m), kp.n(), kp.e()).unwrap();
            int_from_bytes(&decrypt(&c, kp.d(), kp.n())) == m
        }
    }
}
