//! Customer discount tiers.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::price::{Price, percent_of};
use super::validation::ValidationError;

/// Editable fields of a discount tier.
///
/// A tier grants `discount_percent` off once a customer's spend reaches
/// `min_amount`. Which tier applies to an order is decided by the backend;
/// [`DiscountTierInput::discount_for`] is only used to preview the effect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscountTierInput {
    pub name: String,
    pub min_amount: Price,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount_percent: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DiscountTierInput {
    /// Validate the form fields.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field: a blank name, a negative minimum
    /// amount, or a percentage outside `0..=100`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::Required { field: "name" });
        }

        if self.min_amount.is_negative() {
            return Err(ValidationError::OutOfRange {
                field: "minAmount",
                min: "0".to_string(),
                max: "unbounded".to_string(),
            });
        }

        if self.discount_percent < Decimal::ZERO || self.discount_percent > Decimal::ONE_HUNDRED {
            return Err(ValidationError::OutOfRange {
                field: "discountPercent",
                min: "0".to_string(),
                max: "100".to_string(),
            });
        }

        Ok(())
    }

    /// Whether a customer who has spent `spend` qualifies for this tier.
    #[must_use]
    pub fn qualifies(&self, spend: Price) -> bool {
        spend >= self.min_amount
    }

    /// Discount on `subtotal` if `spend` qualifies, otherwise zero.
    #[must_use]
    pub fn discount_for(&self, spend: Price, subtotal: Price) -> Price {
        if self.qualifies(spend) {
            percent_of(subtotal, self.discount_percent)
        } else {
            Price::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gold() -> DiscountTierInput {
        DiscountTierInput {
            name: "Gold".to_string(),
            min_amount: Price::from_dong(5_000_000),
            discount_percent: Decimal::from(10),
            description: None,
        }
    }

    #[test]
    fn test_valid_tier() {
        assert!(gold().validate().is_ok());
    }

    #[test]
    fn test_blank_name_rejected() {
        let tier = DiscountTierInput {
            name: "   ".to_string(),
            ..gold()
        };
        assert_eq!(
            tier.validate(),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn test_percent_over_100_rejected() {
        let tier = DiscountTierInput {
            discount_percent: Decimal::from(101),
            ..gold()
        };
        assert!(matches!(
            tier.validate(),
            Err(ValidationError::OutOfRange {
                field: "discountPercent",
                ..
            })
        ));
    }

    #[test]
    fn test_negative_min_amount_rejected() {
        let tier = DiscountTierInput {
            min_amount: Price::from_dong(-1),
            ..gold()
        };
        assert!(tier.validate().is_err());
    }

    #[test]
    fn test_discount_preview() {
        let tier = gold();
        let subtotal = Price::from_dong(800_000);
        assert_eq!(
            tier.discount_for(Price::from_dong(5_000_000), subtotal),
            Price::from_dong(80_000)
        );
        assert_eq!(
            tier.discount_for(Price::from_dong(4_999_999), subtotal),
            Price::ZERO
        );
    }
}
