//! Key encapsulation.
//!
//! The [`Kem`] trait is the three-operation interface every backend provides.
//! [`KemBackend`] holds the one chosen at start-up: a native implementation
//! when the caller's probe found one, [`SimulatedKem`] otherwise.
use log::{info, warn};
use thiserror::Error;
use zeroize::Zeroizing;

/// Hash-based stand-in for a real KEM
pub mod simulated;

pub use simulated::SimulatedKem;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum KemError {
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    #[error("encapsulation failed: {0}")]
    Encapsulation(String),

    #[error("decapsulation failed: {0}")]
    Decapsulation(String),
}

pub type KemResult<T> = Result<T, KemError>;

/// Public and secret key bytes
#[derive(Debug, Clone)]
pub struct KemKeypair {
    pub public: Vec<u8>,
    pub secret: Zeroizing<Vec<u8>>,
}

/// Output of [`Kem::encapsulate`]
#[derive(Debug, Clone)]
pub struct Encapsulation {
    pub ciphertext: Vec<u8>,
    pub shared: Zeroizing<Vec<u8>>,
}

pub trait Kem {
    fn name(&self) -> &'static str;

    fn is_post_quantum(&self) -> bool;

    fn generate_keypair(&self) -> KemResult<KemKeypair>;

    fn encapsulate(&self, public: &[u8]) -> KemResult<Encapsulation>;

    /// May fail with [`KemError::Decapsulation`] on malformed input instead of
    /// returning an unrelated secret.
    fn decapsulate(&self, secret: &[u8], ciphertext: &[u8]) -> KemResult<Zeroizing<Vec<u8>>>;
}

/// The KEM selected for this run
pub enum KemBackend {
    Native(Box<dyn Kem>),
    Simulated(SimulatedKem),
}

impl KemBackend {
    /// Picks the native backend returned by the caller's probe, if any.
    pub fn select(probe: Option<Box<dyn Kem>>) -> Self {
        match probe {
            Some(native) => {
                info!("using native KEM backend {}", native.name());
                KemBackend::Native(native)
            }
            None => {
                warn!("no native KEM backend available, falling back to simulation");
                KemBackend::Simulated(SimulatedKem)
            }
        }
    }

    pub fn is_simulated(&self) -> bool {
        matches!(self, KemBackend::Simulated(_))
    }

    fn inner(&self) -> &dyn Kem {
        match self {
            KemBackend::Native(kem) => kem.as_ref(),
            KemBackend::Simulated(kem) => kem as &dyn Kem,
        }
    }
}

impl Default for KemBackend {
    fn default() -> Self {
        KemBackend::Simulated(SimulatedKem)
    }
}

impl std::fmt::Debug for KemBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            KemBackend::Native(kem) => f.debug_tuple("Native").field(&kem.name()).finish(),
            KemBackend::Simulated(_) => f.debug_tuple("Simulated").finish(),
        }
    }
}

impl Kem for KemBackend {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn is_post_quantum(&self) -> bool {
        self.inner().is_post_quantum()
    }

    fn generate_keypair(&self) -> KemResult<KemKeypair> {
        self.inner().generate_keypair()
    }

    fn encapsulate(&self, public: &[u8]) -> KemResult<Encapsulation> {
        self.inner().encapsulate(public)
    }

    fn decapsulate(&self, secret: &[u8], ciphertext: &[u8]) -> KemResult<Zeroizing<Vec<u8>>> {
        self.inner().decapsulate(secret, ciphertext)
    }
}
