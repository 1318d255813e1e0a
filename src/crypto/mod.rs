//! Password key derivation and AES-256-GCM sealing of the secret envelope.
//!
//! The key is a single SHA-256 pass over the UTF-8 password: no salt, no
//! iteration count. This is a known weakness (fast offline guessing) kept on
//! purpose, because every existing stego image depends on this exact
//! derivation. Changing it breaks password compatibility.

use aes_gcm::{
    aead::{AeadInPlace, KeyInit},
    Aes256Gcm, Key, Nonce, Tag,
};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::config::{ENCRYPTION_OVERHEAD, KEY_LEN, NONCE_LEN, TAG_LEN};

#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("password is required")]
    EmptyPassword,
    #[error("encrypted payload is too short: need more than {min} bytes, have {have}")]
    TooShort { min: usize, have: usize },
    #[error("decryption failed: wrong password or tampered stego image")]
    AuthenticationFailed,
    #[error("encryption failed: {0}")]
    Encryption(String),
    #[error("random source unavailable: {0}")]
    Randomness(String),
}

/// A source of fresh 96-bit GCM nonces.
pub trait NonceSource {
    fn next_nonce(&mut self) -> Result<[u8; NONCE_LEN], CryptoError>;
}

/// Nonces drawn from the operating system CSPRNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsNonceSource;

impl NonceSource for OsNonceSource {
    fn next_nonce(&mut self) -> Result<[u8; NONCE_LEN], CryptoError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|e| CryptoError::Randomness(e.to_string()))?;
        Ok(nonce)
    }
}

/// Always yields the same nonce. Only for reproducing known vectors; reusing a
/// nonce under one key leaks plaintext.
#[derive(Debug, Clone, Copy)]
pub struct FixedNonce(pub [u8; NONCE_LEN]);

impl NonceSource for FixedNonce {
    fn next_nonce(&mut self) -> Result<[u8; NONCE_LEN], CryptoError> {
        Ok(self.0)
    }
}

/// Compute the SHA-256 digest of a byte slice.
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut digest = [0u8; 32];
    digest.copy_from_slice(&Sha256::digest(data));
    digest
}

/// Derive the 32-byte AES key from a password (single SHA-256 pass).
pub fn derive_key(password: &str) -> Result<Zeroizing<[u8; KEY_LEN]>, CryptoError> {
    if password.is_empty() {
        return Err(CryptoError::EmptyPassword);
    }
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    key.copy_from_slice(&Sha256::digest(password.as_bytes()));
    Ok(key)
}

/// Encrypt with a fresh OS-random nonce.
/// Returns: nonce(12) || tag(16) || ciphertext
pub fn encrypt(plaintext: &[u8], key: &[u8; KEY_LEN]) -> Result<Vec<u8>, CryptoError> {
    encrypt_with(&mut OsNonceSource, plaintext, key)
}

/// Encrypt drawing the nonce from `nonces`.
pub fn encrypt_with<N: NonceSource + ?Sized>(
    nonces: &mut N,
    plaintext: &[u8],
    key: &[u8; KEY_LEN],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let nonce = nonces.next_nonce()?;

    let mut ciphertext = plaintext.to_vec();
    let tag = cipher
        .encrypt_in_place_detached(Nonce::from_slice(&nonce), b"", &mut ciphertext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    let mut blob = Vec::with_capacity(ENCRYPTION_OVERHEAD + ciphertext.len());
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&tag);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// Decrypt nonce(12) || tag(16) || ciphertext.
pub fn decrypt(blob: &[u8], key: &[u8; KEY_LEN]) -> Result<Vec<u8>, CryptoError> {
    if blob.len() <= ENCRYPTION_OVERHEAD {
        return Err(CryptoError::TooShort {
            min: ENCRYPTION_OVERHEAD,
            have: blob.len(),
        });
    }

    let (nonce, rest) = blob.split_at(NONCE_LEN);
    let (tag, ciphertext) = rest.split_at(TAG_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key));
    let mut plaintext = ciphertext.to_vec();
    cipher
        .decrypt_in_place_detached(
            Nonce::from_slice(nonce),
            b"",
            &mut plaintext,
            Tag::from_slice(tag),
        )
        .map_err(|_| CryptoError::AuthenticationFailed)?;

    Ok(plaintext)
}
