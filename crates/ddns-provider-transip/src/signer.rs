//! Request signing for the TransIP auth endpoint
//!
//! The auth request body is signed with the account's RSA private key
//! (RSA PKCS#1 v1.5, SHA-512) and the base64 signature travels in the
//! `Signature` header.

use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use ddns_core::{Error, Result};
use ring::rand::SystemRandom;
use ring::signature::{RSA_PKCS1_SHA512, RsaKeyPair};
use rustls_pemfile::Item;
use std::path::{Path, PathBuf};

/// Default location of the private key, relative to the working directory
pub const DEFAULT_KEY_PATH: &str = "key";

/// Produces a base64 signature over arbitrary bytes
pub trait Signer: Send + Sync {
    /// Sign `message` and return the base64-encoded signature
    ///
    /// # Returns
    ///
    /// - `Err(Error::KeyLoad)`: The key is missing or unparsable
    /// - `Err(Error::Signing)`: The signing operation failed
    fn sign(&self, message: &[u8]) -> Result<String>;
}

/// Signer backed by a PEM-encoded RSA private key on disk
///
/// The file is read and parsed again on every call, so a replaced key is
/// picked up without a restart.
#[derive(Debug, Clone)]
pub struct PemKeySigner {
    key_path: PathBuf,
}

impl PemKeySigner {
    /// Create a signer for the key at `key_path`
    pub fn new(key_path: impl Into<PathBuf>) -> Self {
        Self {
            key_path: key_path.into(),
        }
    }

    /// Path of the key file
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }
}

impl Default for PemKeySigner {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PATH)
    }
}

impl Signer for PemKeySigner {
    fn sign(&self, message: &[u8]) -> Result<String> {
        let key_pair = load_key_pair(&self.key_path)?;

        let mut signature = vec![0; key_pair.public().modulus_len()];
        key_pair
            .sign(&RSA_PKCS1_SHA512, &SystemRandom::new(), message, &mut signature)
            .map_err(|_| Error::signing("RSA PKCS#1 SHA-512 signing failed"))?;

        Ok(BASE64.encode(signature))
    }
}

/// Read the first RSA private key (PKCS#8 or PKCS#1) from a PEM file
fn load_key_pair(path: &Path) -> Result<RsaKeyPair> {
    let pem = std::fs::read(path)
        .map_err(|e| Error::key_load(format!("{}: {}", path.display(), e)))?;

    let mut reader = pem.as_slice();
    loop {
        let item = rustls_pemfile::read_one(&mut reader)
            .map_err(|e| Error::key_load(format!("{}: invalid PEM: {}", path.display(), e)))?;

        let parsed = match item {
            Some(Item::Pkcs8Key(key)) => RsaKeyPair::from_pkcs8(key.secret_pkcs8_der()),
            Some(Item::Pkcs1Key(key)) => RsaKeyPair::from_der(key.secret_pkcs1_der()),
            Some(_) => continue,
            None => {
                return Err(Error::key_load(format!(
                    "{}: no RSA private key found",
                    path.display()
                )));
            }
        };

        return parsed.map_err(|e| {
            Error::key_load(format!("{}: key rejected: {}", path.display(), e))
        });
    }
}
