//! Cell
//! Symmetric authenticated encryption with AES-256-GCM. The nonce is drawn
//! fresh for every message and travels next to the ciphertext and tag.
//!
//! # Usage
//! ```
//! use toy_asym::cell::{Cell, CellKey};
//!
//! let key = CellKey::random();
//! let cell = Cell::new(&key);
//!
//! let sealed = cell.encrypt(b"Quantum?").unwrap();
//! assert_eq!(cell.decrypt(&sealed).unwrap(), b"Quantum?");
//! ```
use aes_gcm::{
    aead::{generic_array::GenericArray, AeadInPlace, NewAead},
    Aes256Gcm,
};
use rand::{rngs::OsRng, RngCore};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub const AES_KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CellError {
    #[error("encryption failed")]
    Encrypt,

    #[error("authentication failed")]
    Authentication,
}

/// AES-256 key, wiped on drop
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct CellKey([u8; AES_KEY_LEN]);

impl CellKey {
    pub fn random() -> Self {
        let mut key = [0u8; AES_KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    /// Returns `None` if `bytes` is not exactly [`AES_KEY_LEN`] long
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let mut key = [0u8; AES_KEY_LEN];
        if bytes.len() != AES_KEY_LEN {
            return None;
        }
        key.copy_from_slice(bytes);
        Some(Self(key))
    }
}

/// Nonce, ciphertext and tag of one message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: [u8; NONCE_LEN],
    pub ciphertext: Vec<u8>,
    pub tag: [u8; TAG_LEN],
}

pub struct Cell {
    cipher: Aes256Gcm,
}

impl Cell {
    pub fn new(key: &CellKey) -> Self {
        let cipher = Aes256Gcm::new(GenericArray::from_slice(&key.0));
        Self { cipher }
    }

    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Sealed, CellError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let mut ciphertext = plaintext.to_vec();
        let tag = self
            .cipher
            .encrypt_in_place_detached(GenericArray::from_slice(&nonce), b"", &mut ciphertext)
            .map_err(|_| CellError::Encrypt)?;

        let mut tag_bytes = [0u8; TAG_LEN];
        tag_bytes.copy_from_slice(&tag);
        Ok(Sealed {
            nonce,
            ciphertext,
            tag: tag_bytes,
        })
    }

    pub fn decrypt(&self, sealed: &Sealed) -> Result<Vec<u8>, CellError> {
        let mut plaintext = sealed.ciphertext.clone();
        self.cipher
            .decrypt_in_place_detached(
                GenericArray::from_slice(&sealed.nonce),
                b"",
                &mut plaintext,
                GenericArray::from_slice(&sealed.tag),
            )
            .map_err(|_| CellError::Authentication)?;
        Ok(plaintext)
    }
}
