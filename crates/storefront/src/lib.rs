//! Lumiere storefront library.
//!
//! Everything the shop front needs besides rendering:
//!
//! - [`cart`] - persisted cart with change notifications
//! - [`checkout`] - form validation, order submission and the PayOS handoff
//! - [`routes`] - the form glue server forwarding to Google Sheets and SMTP
//! - [`config`] - environment configuration for both

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
