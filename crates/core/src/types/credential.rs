//! Payment gateway credentials and secret strength checks.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::validation::ValidationError;

/// Minimum Shannon entropy, in bits per character, for a value to count as a
/// real key rather than something typed by hand.
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "your_",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Why a secret was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SecretStrengthError {
    /// The value contains a placeholder pattern.
    #[error("appears to be a placeholder (contains '{0}')")]
    Placeholder(&'static str),
    /// The value has too little entropy.
    #[error("entropy too low ({actual:.2} bits/char, need >= {required:.1})")]
    LowEntropy {
        /// Measured entropy.
        actual: f64,
        /// Required entropy.
        required: f64,
    },
}

/// Reject placeholders and low-entropy values.
///
/// # Errors
///
/// Returns [`SecretStrengthError`] describing the first failed check.
pub fn check_secret_strength(secret: &str) -> Result<(), SecretStrengthError> {
    let lower = secret.to_lowercase();

    if let Some(pattern) = PLACEHOLDER_PATTERNS
        .iter()
        .copied()
        .find(|p| lower.contains(p))
    {
        return Err(SecretStrengthError::Placeholder(pattern));
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(SecretStrengthError::LowEntropy {
            actual: entropy,
            required: MIN_ENTROPY_BITS_PER_CHAR,
        });
    }

    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// PayOS merchant credentials, as entered in the admin PayOS config form.
///
/// Implements `Debug` manually to redact the keys.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayOsCredentials {
    pub client_id: String,
    pub api_key: String,
    pub checksum_key: String,
}

impl PayOsCredentials {
    /// Validate that every field is present and both keys look real.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::Required`] for a blank field and
    /// [`ValidationError::WeakSecret`] for a key that fails
    /// [`check_secret_strength`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.client_id.trim().is_empty() {
            return Err(ValidationError::Required { field: "clientId" });
        }

        for (field, value) in [("apiKey", &self.api_key), ("checksumKey", &self.checksum_key)] {
            if value.trim().is_empty() {
                return Err(ValidationError::Required { field });
            }
            check_secret_strength(value).map_err(|e| ValidationError::WeakSecret {
                field,
                reason: e.to_string(),
            })?;
        }

        Ok(())
    }
}

impl std::fmt::Debug for PayOsCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayOsCredentials")
            .field("client_id", &self.client_id)
            .field("api_key", &"[REDACTED]")
            .field("checksum_key", &"[REDACTED]")
            .finish()
    }
}
