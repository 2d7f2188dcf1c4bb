//! Letter
//! The Letter carries a message encrypted for the holder of a KEM key pair,
//! using hybrid cryptography.
//!
//! # Under the hood
//! 1) The sender encapsulates against the receiver's public key, obtaining a
//!    shared secret and a KEM ciphertext.
//! 2) The symmetric key is SHA-256 of the shared secret.
//! 3) The message is encrypted with the Cell under that key.
//!
//! The receiver decapsulates the KEM ciphertext and repeats steps 2 and 3.
//!
//! # Usage
//! ```
//! use toy_asym::{
//!     kem::{Kem, SimulatedKem},
//!     letter::Letter,
//! };
//!
//! let kem = SimulatedKem;
//! let bob = kem.generate_keypair().unwrap();
//!
//! let letter = Letter::seal(&kem, &bob.public, b"Quantum?").unwrap();
//! assert_eq!(letter.open(&kem, &bob.secret).unwrap(), b"Quantum?");
//! ```
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroize;

use crate::{
    cell::{Cell, CellError, CellKey, Sealed},
    kem::{Encapsulation, Kem, KemError},
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LetterError {
    #[error(transparent)]
    Kem(#[from] KemError),

    #[error(transparent)]
    Cell(#[from] CellError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Letter {
    /// KEM ciphertext the receiver decapsulates
    pub encapsulated: Vec<u8>,
    pub body: Sealed,
}

/// Derives the AES key from a KEM shared secret.
pub fn shared_to_key(shared: &[u8]) -> CellKey {
    let mut raw = Sha256::digest(shared);
    let key = CellKey::from_slice(&raw).expect("SHA-256 output is a valid key length");
    raw.as_mut_slice().zeroize();
    key
}

impl Letter {
    pub fn seal<K: Kem + ?Sized>(kem: &K, public: &[u8], msg: &[u8]) -> Result<Self, LetterError> {
        let enc = kem.encapsulate(public)?;
        Self::from_encapsulation(&enc, msg)
    }

    /// Encrypts `msg` under an encapsulation the sender already holds.
    pub fn from_encapsulation(enc: &Encapsulation, msg: &[u8]) -> Result<Self, LetterError> {
        let cell = Cell::new(&shared_to_key(&enc.shared));
        Ok(Self {
            encapsulated: enc.ciphertext.clone(),
            body: cell.encrypt(msg)?,
        })
    }

    pub fn open<K: Kem + ?Sized>(&self, kem: &K, secret: &[u8]) -> Result<Vec<u8>, LetterError> {
        let shared = kem.decapsulate(secret, &self.encapsulated)?;
        let cell = Cell::new(&shared_to_key(&shared));
        Ok(cell.decrypt(&self.body)?)
    }
}
