//! Sealing of the enriched match list into an opaque blob.
//!
//! The blob is the serialized list, PKCS#7-padded, encrypted with
//! AES-256-CTR under a fixed all-zero IV, then base64-encoded. The fixed
//! IV makes sealing deterministic: the same list and key always produce
//! the same ciphertext, and equal plaintext prefixes stay visible to
//! anyone comparing blobs across runs. Downstream consumers decrypt with
//! exactly this scheme, so it is kept as-is; the key is the only secret
//! and must not be reused elsewhere.

use aes::cipher::{KeyIvInit, StreamCipher};
use aes::Aes256;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::error::SealError;
use crate::feed::types::EnrichedMatch;

type Aes256Ctr = ctr::Ctr128BE<Aes256>;

/// AES block size; the padding unit.
const BLOCK_SIZE: usize = 16;

const ZERO_IV: [u8; BLOCK_SIZE] = [0u8; BLOCK_SIZE];

/// The sealed, serialized enriched-match list, addressed for publishing.
#[derive(Debug, Clone)]
pub struct SealedBlob {
    /// Base64 ciphertext.
    pub content: String,
    /// Destination gist id.
    pub destination: String,
    /// Human-readable label stored alongside the blob.
    pub description: String,
}

/// Seals enriched match lists under a fixed 32-byte key.
#[derive(Clone)]
pub struct Sealer {
    key: [u8; 32],
}

impl std::fmt::Debug for Sealer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sealer").field("key", &"[REDACTED]").finish()
    }
}

impl Sealer {
    /// Create a sealer from a 32-byte key (AES-256).
    ///
    /// # Errors
    /// Returns an error if the key length is not exactly 32 bytes.
    pub fn new(key_bytes: &[u8]) -> Result<Self, SealError> {
        let key: [u8; 32] = key_bytes.try_into().map_err(|_| SealError::KeyLength {
            len: key_bytes.len(),
        })?;
        Ok(Self { key })
    }

    /// Serialize and seal the enriched list into base64 ciphertext.
    pub fn seal(&self, matches: &[EnrichedMatch]) -> Result<String, SealError> {
        let mut buf = serde_json::to_vec(matches)?;
        pad(&mut buf);
        self.apply_keystream(&mut buf);
        Ok(BASE64.encode(buf))
    }

    /// Invert `seal`: recover the serialized JSON text.
    pub fn open(&self, blob: &str) -> Result<String, SealError> {
        let mut buf = BASE64.decode(blob)?;
        self.apply_keystream(&mut buf);
        unpad(&mut buf)?;
        Ok(String::from_utf8(buf)?)
    }

    fn apply_keystream(&self, buf: &mut [u8]) {
        let mut cipher = Aes256Ctr::new(&self.key.into(), &ZERO_IV.into());
        cipher.apply_keystream(buf);
    }
}

/// PKCS#7: pad to a whole number of blocks, always at least one byte.
fn pad(buf: &mut Vec<u8>) {
    let pad_len = BLOCK_SIZE - buf.len() % BLOCK_SIZE;
    buf.resize(buf.len() + pad_len, pad_len as u8);
}

fn unpad(buf: &mut Vec<u8>) -> Result<(), SealError> {
    let pad_len = *buf.last().ok_or(SealError::Padding)? as usize;
    if pad_len == 0 || pad_len > BLOCK_SIZE || pad_len > buf.len() {
        return Err(SealError::Padding);
    }
    if !buf[buf.len() - pad_len..].iter().all(|&b| b == pad_len as u8) {
        return Err(SealError::Padding);
    }
    buf.truncate(buf.len() - pad_len);
    Ok(())
}
