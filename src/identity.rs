//! Wallet identity derived from a secp256k1 private key.

use crate::{Error, Result};
use k256::ecdsa::SigningKey;
use std::fmt;
use tiny_keccak::{Hasher, Keccak};

/// A wallet identity: the checksummed address derived from a private key.
///
/// The raw key is dropped after derivation and never logged or persisted.
/// `Debug` and log output only ever show the masked address form.
pub struct Identity {
    address: String,
}

impl Identity {
    /// Derive an identity from a hex-encoded private key, with or without
    /// a `0x` prefix. The key must decode to exactly 32 bytes.
    pub fn derive(secret_hex: &str) -> Result<Self> {
        let trimmed = secret_hex.trim();
        let stripped = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let bytes = hex::decode(stripped)
            .map_err(|_| Error::InvalidKeyFormat("not valid hex".into()))?;
        if bytes.len() != 32 {
            return Err(Error::InvalidKeyFormat(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let key = SigningKey::from_slice(&bytes)
            .map_err(|_| Error::InvalidKeyFormat("not a valid secp256k1 scalar".into()))?;
        let address = checksum_address(&raw_address(&key));
        Ok(Self { address })
    }

    /// The EIP-55 checksummed address text, `0x`-prefixed.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// The address with interior characters elided, safe for logging.
    pub fn masked(&self) -> String {
        format!(
            "{}...{}",
            &self.address[..6],
            &self.address[self.address.len() - 4..]
        )
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Identity")
            .field("address", &self.masked())
            .finish_non_exhaustive()
    }
}

fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak::v256();
    hasher.update(data);
    let mut out = [0u8; 32];
    hasher.finalize(&mut out);
    out
}

/// Uncompressed public key (tag byte dropped), keccak'd, last 20 bytes.
fn raw_address(key: &SigningKey) -> [u8; 20] {
    let point = key.verifying_key().to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    let mut addr = [0u8; 20];
    addr.copy_from_slice(&digest[12..]);
    addr
}

/// EIP-55: uppercase each hex letter whose nibble in the keccak of the
/// lowercase address is >= 8.
fn checksum_address(addr: &[u8; 20]) -> String {
    let hex_addr = hex::encode(addr);
    let digest = keccak256(hex_addr.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in hex_addr.chars().enumerate() {
        let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
