//! Not a real KEM. The "public" key is the secret key, so anyone who sees it
//! can decapsulate: it offers no confidentiality at all. It exists so the
//! brute force demonstration has something to run against when no native
//! backend is installed, and it always decapsulates correctly for the
//! legitimate holder.
//!
//! ```text
//! keygen:      pk = sk = random(32)
//! encapsulate: ct = random(32), shared = SHA-256(pk || ct)
//! decapsulate: shared = SHA-256(sk || ct)
//! ```
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{Encapsulation, Kem, KemKeypair, KemResult};

/// Length of keys and ciphertexts
pub const KEY_LEN: usize = 32;

#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedKem;

fn random_bytes() -> Vec<u8> {
    let mut bytes = vec![0u8; KEY_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

fn derive_shared(key: &[u8], ciphertext: &[u8]) -> Zeroizing<Vec<u8>> {
    let mut hasher = Sha256::new();
    hasher.update(key);
    hasher.update(ciphertext);
    Zeroizing::new(hasher.finalize().to_vec())
}

impl Kem for SimulatedKem {
    fn name(&self) -> &'static str {
        "Simulated (NOT SECURE)"
    }

    fn is_post_quantum(&self) -> bool {
        false
    }

    fn generate_keypair(&self) -> KemResult<KemKeypair> {
        let secret = Zeroizing::new(random_bytes());
        let public = secret.to_vec(); // simulation: pk = sk
        Ok(KemKeypair { public, secret })
    }

    fn encapsulate(&self, public: &[u8]) -> KemResult<Encapsulation> {
        // the ephemeral value doubles as the ciphertext
        let ephemeral = random_bytes();
        let shared = derive_shared(public, &ephemeral);
        Ok(Encapsulation {
            ciphertext: ephemeral,
            shared,
        })
    }

    fn decapsulate(&self, secret: &[u8], ciphertext: &[u8]) -> KemResult<Zeroizing<Vec<u8>>> {
        Ok(derive_shared(secret, ciphertext))
    }
}
