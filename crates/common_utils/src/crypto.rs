//! Utilities for cryptographic algorithms

use masking::{PeekInterface, Secret};

use crate::errors::{self, CustomResult};

/// Trait for generating a digest for SHA
pub trait GenerateDigest {
    /// takes a message and creates a digest for it
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, errors::CryptoError>;
}

/// Secure Hash Algorithm 256
#[derive(Debug)]
pub struct Sha256;

impl GenerateDigest for Sha256 {
    fn generate_digest(&self, message: &[u8]) -> CustomResult<Vec<u8>, errors::CryptoError> {
        let digest = ring::digest::digest(&ring::digest::SHA256, message);
        Ok(digest.as_ref().to_vec())
    }
}

/// Hex encoded digest of a secret value, usable as a cache key without keeping the value itself.
pub fn hashed_key<D: GenerateDigest>(
    algorithm: &D,
    value: &Secret<String>,
) -> CustomResult<String, errors::CryptoError> {
    algorithm
        .generate_digest(value.peek().as_bytes())
        .map(hex::encode)
}
