use crate::stable_json::stable_json_bytes;
use serde_json::Value;
use sha2::{Digest, Sha256};

pub fn stable_hash_hex(value: &Value) -> serde_json::Result<String> {
    let bytes = stable_json_bytes(value)?;
    let digest = Sha256::digest(bytes);
    Ok(format!("{digest:x}"))
}

/// Leading `hex_len` hex characters of the SHA-256 digest of `text`.
pub fn short_hash_hex(text: &str, hex_len: usize) -> String {
    let digest = Sha256::digest(text.as_bytes());
    let mut hex = format!("{digest:x}");
    hex.truncate(hex_len);
    hex
}

#[cfg(test)]
#[path = "stable_hash_test.rs"]
mod tests;
