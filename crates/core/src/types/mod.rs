//! Core types for Lumiere.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod commission;
pub mod credential;
pub mod discount;
pub mod email;
pub mod id;
pub mod price;
pub mod status;
pub mod validation;

pub use commission::{COMMISSION_POOL_PERCENT, CommissionRole, CommissionSplit};
pub use credential::{PayOsCredentials, SecretStrengthError, check_secret_strength};
pub use discount::DiscountTierInput;
pub use email::{Email, EmailError};
pub use id::*;
pub use price::{Price, percent_of};
pub use status::*;
pub use validation::ValidationError;
