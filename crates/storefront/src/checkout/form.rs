//! Checkout form validation.
//!
//! Mirrors what the checkout page checks before enabling submit. The backend
//! validates again; these checks only catch obvious mistakes early and give
//! one message per field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid regex"));

const PHONE_MIN_DIGITS: usize = 8;
const PHONE_MAX_DIGITS: usize = 15;

/// Raw checkout form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub region: Option<String>,
    /// Referral code of the mentor to credit.
    #[serde(default)]
    pub mentor_code: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A checkout form that passed validation, with whitespace trimmed and
/// blank optional fields dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCheckout {
    pub name: String,
    pub email: String,
    /// Phone with spaces removed.
    pub phone: String,
    pub address: String,
    pub region: Option<String>,
    pub mentor_code: Option<String>,
    pub note: Option<String>,
}

/// Per-field validation messages, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Failed fields and their messages, in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

impl CheckoutForm {
    /// Validate every field and collect all failures.
    ///
    /// # Errors
    ///
    /// Returns [`FieldErrors`] with one message per failing field.
    pub fn validate(&self) -> Result<ValidCheckout, FieldErrors> {
        let mut errors = FieldErrors::default();

        let name = self.name.trim();
        if name.is_empty() {
            errors.insert("name", "Please enter your full name.");
        }

        let email = self.email.trim();
        if email.is_empty() {
            errors.insert("email", "Please enter your email address.");
        } else if !EMAIL_RE.is_match(email) {
            errors.insert("email", "Please enter a valid email address.");
        }

        let phone: String = self.phone.chars().filter(|c| !c.is_whitespace()).collect();
        if phone.is_empty() {
            errors.insert("phone", "Please enter your phone number.");
        } else if !is_valid_phone(&phone) {
            errors.insert("phone", "Please enter a valid phone number.");
        }

        let address = self.address.trim();
        if address.is_empty() {
            errors.insert("address", "Please enter a shipping address.");
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ValidCheckout {
            name: name.to_string(),
            email: email.to_string(),
            phone,
            address: address.to_string(),
            region: non_blank(self.region.as_deref()),
            mentor_code: non_blank(self.mentor_code.as_deref()),
            note: non_blank(self.note.as_deref()),
        })
    }
}

/// 8 to 15 digits with an optional leading `+`.
fn is_valid_phone(phone: &str) -> bool {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    (PHONE_MIN_DIGITS..=PHONE_MAX_DIGITS).contains(&digits.len())
        && digits.chars().all(|c| c.is_ascii_digit())
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: "Nguyen Thi Lan".to_string(),
            email: "lan@example.com".to_string(),
            phone: "0901 234 567".to_string(),
            address: "12 Le Loi, District 1, HCMC".to_string(),
            ..CheckoutForm::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let valid = form().validate().unwrap();
        assert_eq!(valid.phone, "0901234567");
        assert_eq!(valid.region, None);
    }

    #[test]
    fn test_all_required_fields_reported() {
        let errors = CheckoutForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        for field in ["name", "email", "phone", "address"] {
            assert!(errors.get(field).is_some(), "missing error for {field}");
        }
    }

    #[test]
    fn test_email_format() {
        for bad in ["lan", "lan@", "lan@example", "la n@example.com", "@example.com"] {
            let errors = CheckoutForm {
                email: bad.to_string(),
                ..form()
            }
            .validate()
            .unwrap_err();
            assert_eq!(
                errors.get("email"),
                Some("Please enter a valid email address."),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_phone_format() {
        for good in ["+84901234567", "09012345", "0901 234 567"] {
            assert!(
                CheckoutForm {
                    phone: good.to_string(),
                    ..form()
                }
                .validate()
                .is_ok(),
                "{good} should be accepted"
            );
        }
        for bad in ["1234567", "0901-234-567", "+", "1234567890123456", "09o1234567"] {
            let errors = CheckoutForm {
                phone: bad.to_string(),
                ..form()
            }
            .validate()
            .unwrap_err();
            assert!(errors.get("phone").is_some(), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_optional_fields_trimmed() {
        let valid = CheckoutForm {
            region: Some("  ".to_string()),
            mentor_code: Some(" MENTOR01 ".to_string()),
            note: Some("Leave at reception".to_string()),
            ..form()
        }
        .validate()
        .unwrap();
        assert_eq!(valid.region, None);
        assert_eq!(valid.mentor_code.as_deref(), Some("MENTOR01"));
        assert_eq!(valid.note.as_deref(), Some("Leave at reception"));
    }

    #[test]
    fn test_field_errors_display() {
        let errors = CheckoutForm {
            name: String::new(),
            address: String::new(),
            ..form()
        }
        .validate()
        .unwrap_err();
        assert_eq!(
            errors.to_string(),
            "address: Please enter a shipping address.; name: Please enter your full name."
        );
    }
}
