//! Lumiere Core - Shared types library.
//!
//! This crate provides common types used across all Lumiere components:
//! - `api` - REST client for the commerce backend
//! - `storefront` - Cart, checkout and the form glue server
//! - `cli` - Terminal front end for shoppers and admins
//!
//! # Architecture
//!
//! The core crate contains only types and validation rules - no I/O, no
//! storage, no HTTP clients. Business rules are enforced by the backend; the
//! checks here mirror them so forms can refuse obviously bad input early.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, prices, emails, statuses, commission splits,
//!   discount tiers and payment gateway credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
