//! Cache key derivation

use crate::utils::error::{CacheError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use sha2::{Digest, Sha256};

static PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\w\s]").expect("Invalid punctuation regex"));

/// Words dropped by query normalization
pub const STOP_WORDS: &[&str] = &[
    "the", "is", "a", "an", "and", "or", "to", "of", "in", "for", "on", "how", "what",
];

/// Decimal places kept when keying on an embedding
pub const EMBEDDING_KEY_PRECISION: i32 = 6;

/// Hex SHA-256 digest of `text`
pub fn hash_key(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Lowercase, strip punctuation, collapse whitespace and drop stop words
pub fn normalize_query(query: &str) -> String {
    let lowered = query.trim().to_lowercase();
    let stripped = PUNCTUATION.replace_all(&lowered, "");
    stripped
        .split_whitespace()
        .filter(|token| !STOP_WORDS.contains(token))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Hash of the embedding rounded to [`EMBEDDING_KEY_PRECISION`] places
///
/// Rounding absorbs float noise between repeated embedding calls for the same input.
/// NaN and infinite components are rejected, as JSON would render them all as `null`.
pub fn embedding_key(embedding: &[f32]) -> Result<String> {
    if let Some(position) = embedding.iter().position(|v| !v.is_finite()) {
        return Err(CacheError::embedding(format!(
            "Embedding component {} is not finite",
            position
        )));
    }
    let scale = 10f64.powi(EMBEDDING_KEY_PRECISION);
    let rounded: Vec<f64> = embedding
        .iter()
        .map(|v| {
            let r = (f64::from(*v) * scale).round() / scale;
            // -0.0 and 0.0 must share a key
            if r == 0.0 { 0.0 } else { r }
        })
        .collect();
    Ok(hash_key(&serde_json::to_string(&rounded)?))
}

/// Prefix a digest with its layer namespace
pub(crate) fn namespaced(namespace: &str, digest: &str) -> String {
    format!("{}:{}", namespace, digest)
}
