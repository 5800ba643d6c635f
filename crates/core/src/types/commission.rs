//! Referral commission split.
//!
//! Half of every order's value is distributed between the company and the
//! referral chain. An admin configures how that half is divided across five
//! recipients; the percentages are of the order value, so they must add up
//! to exactly [`COMMISSION_POOL_PERCENT`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::{Price, percent_of};
use super::validation::ValidationError;

/// Share of the order value that is split between the five recipients.
pub const COMMISSION_POOL_PERCENT: Decimal = Decimal::from_parts(50, 0, 0, false, 0);

/// A recipient of a commission share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommissionRole {
    /// The company itself.
    Company,
    /// VIP pool.
    Vip,
    /// The referrer one level up (F1 of the buyer's mentor chain).
    Mentor,
    /// The buyer, as a referred member.
    Mentee,
    /// Loyalty reward pool.
    Loyalty,
}

impl CommissionRole {
    /// All recipients in display order.
    pub const ALL: [Self; 5] = [
        Self::Company,
        Self::Vip,
        Self::Mentor,
        Self::Mentee,
        Self::Loyalty,
    ];

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Company => "Company",
            Self::Vip => "VIP",
            Self::Mentor => "Mentor",
            Self::Mentee => "Mentee",
            Self::Loyalty => "Loyalty",
        }
    }

    const fn field(self) -> &'static str {
        match self {
            Self::Company => "companyPercent",
            Self::Vip => "vipPercent",
            Self::Mentor => "mentorPercent",
            Self::Mentee => "menteePercent",
            Self::Loyalty => "loyaltyPercent",
        }
    }
}

/// The five percentages of a commission option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionSplit {
    #[serde(with = "rust_decimal::serde::float")]
    pub company_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub vip_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub mentor_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub mentee_percent: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub loyalty_percent: Decimal,
}

impl CommissionSplit {
    /// Build a split from whole-number percentages.
    #[must_use]
    pub fn from_whole(company: u32, vip: u32, mentor: u32, mentee: u32, loyalty: u32) -> Self {
        Self {
            company_percent: company.into(),
            vip_percent: vip.into(),
            mentor_percent: mentor.into(),
            mentee_percent: mentee.into(),
            loyalty_percent: loyalty.into(),
        }
    }

    /// Percentage assigned to `role`.
    #[must_use]
    pub const fn percent(&self, role: CommissionRole) -> Decimal {
        match role {
            CommissionRole::Company => self.company_percent,
            CommissionRole::Vip => self.vip_percent,
            CommissionRole::Mentor => self.mentor_percent,
            CommissionRole::Mentee => self.mentee_percent,
            CommissionRole::Loyalty => self.loyalty_percent,
        }
    }

    /// Sum of all five percentages.
    #[must_use]
    pub fn total(&self) -> Decimal {
        CommissionRole::ALL
            .into_iter()
            .map(|role| self.percent(role))
            .sum()
    }

    /// Whether the split uses exactly the whole pool.
    ///
    /// The commission editor only enables its submit button when this holds.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        self.total() == COMMISSION_POOL_PERCENT
    }

    /// Validate each percentage and the total.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] for a percentage outside
    /// `0..=50` and [`ValidationError::CommissionTotal`] when the total is
    /// not exactly 50.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for role in CommissionRole::ALL {
            let value = self.percent(role);
            if value < Decimal::ZERO || value > COMMISSION_POOL_PERCENT {
                return Err(ValidationError::OutOfRange {
                    field: role.field(),
                    min: "0".to_string(),
                    max: COMMISSION_POOL_PERCENT.to_string(),
                });
            }
        }

        if !self.is_balanced() {
            return Err(ValidationError::CommissionTotal {
                expected: COMMISSION_POOL_PERCENT.to_string(),
                actual: self.total().normalize().to_string(),
            });
        }

        Ok(())
    }

    /// Amount of `order_total` paid to `role`.
    #[must_use]
    pub fn share_of(&self, order_total: Price, role: CommissionRole) -> Price {
        percent_of(order_total, self.percent(role))
    }
}
