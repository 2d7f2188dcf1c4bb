//! Toy asymmetric cryptosystems together with the attacks that break them.
//!
//! Two pairs live here: textbook RSA over tiny primes, broken by factoring
//! the modulus, and a key encapsulation mechanism attacked by sampling random
//! secret keys. Parameters are kept small on purpose so the attacks finish
//! quickly. Nothing in this crate is fit for protecting real data.

/// Module dedicated to the modular arithmetic: gcd, inverse and exponentiation
pub mod algo;

/// Module dedicated to the random-sampling attack on KEM secrets
pub mod brute;

/// Module dedicated to the cell primitive - a wrapper around symmetric
/// encryption with an easy api
pub mod cell;

/// Module dedicated to the harness settings
pub mod config;

/// Module dedicated to the factoring attack on RSA
pub mod factor;

/// Module dedicated to the end-to-end demo runs
pub mod harness;

/// Module dedicated to key encapsulation backends
pub mod kem;

/// Module dedicated to the letter - a message encrypted for the holder of a
/// KEM key pair.
pub mod letter;

/// Module dedicated to the prime number generation and verification
pub mod prime;

/// Module dedicated to the rsa utils
pub mod rsa;
