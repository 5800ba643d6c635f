//! Customer discount tiers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumiere_core::{DiscountTierId, DiscountTierInput};

/// A discount tier as returned by `GET /discount-tiers`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountTier {
    pub id: DiscountTierId,
    #[serde(flatten)]
    pub tier: DiscountTierInput,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}
