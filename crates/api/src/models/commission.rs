//! Commission options.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use lumiere_core::{CommissionId, CommissionSplit};

/// A commission option configured by an admin.
///
/// Exactly one option is active at a time; the backend applies it to new
/// orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Commission {
    pub id: CommissionId,
    #[serde(default)]
    pub name: String,
    #[serde(flatten)]
    pub split: CommissionSplit,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Body of `POST /commissions` and `PATCH /commissions/:id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionInput {
    pub name: String,
    #[serde(flatten)]
    pub split: CommissionSplit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
