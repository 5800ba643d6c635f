//! PayOS merchant configuration.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumiere_core::PayOsConfigId;

/// A stored PayOS configuration.
///
/// The backend returns keys masked; they are still redacted from `Debug`
/// output in case an older backend returns them in full.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayOsConfig {
    pub id: PayOsConfigId,
    pub client_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub checksum_key: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl PayOsConfig {
    /// API key with all but the last four characters hidden.
    #[must_use]
    pub fn masked_api_key(&self) -> String {
        mask(&self.api_key)
    }
}

impl std::fmt::Debug for PayOsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PayOsConfig")
            .field("id", &self.id)
            .field("client_id", &self.client_id)
            .field("api_key", &"[REDACTED]")
            .field("checksum_key", &"[REDACTED]")
            .field("is_active", &self.is_active)
            .field("created_at", &self.created_at)
            .finish()
    }
}

fn mask(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;
    let tail: String = chars.iter().skip(hidden).collect();
    format!("{}{tail}", "*".repeat(hidden))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_keeps_last_four() {
        assert_eq!(mask("abcdef123456"), "********3456");
        assert_eq!(mask("abc"), "abc");
        assert_eq!(mask(""), "");
    }

    #[test]
    fn test_debug_redacts_keys() {
        let config: PayOsConfig = serde_json::from_str(
            r#"{"id": 1, "clientId": "client-1", "apiKey": "secret-api", "checksumKey": "secret-sum"}"#,
        )
        .unwrap();
        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("client-1"));
        assert!(!debug_output.contains("secret-api"));
        assert!(!debug_output.contains("secret-sum"));
    }
}
