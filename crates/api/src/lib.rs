//! Lumiere API - REST client for the commerce backend.
//!
//! The backend is the source of truth for every record and business rule.
//! This crate only maps its endpoints to typed methods and keeps the small
//! amount of client-side state (auth token, current user) the storefront
//! needs between requests.
//!
//! # Architecture
//!
//! - [`storage`] - key-value store standing in for browser local/session storage
//! - [`session`] - bearer token and current user kept in that store
//! - [`client`] - `ApiClient`, the shared base every service builds on
//! - [`services`] - one thin service per backend resource
//! - [`models`] - request and response shapes of the REST contract
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use lumiere_api::{ApiClient, ApiConfig, AuthSession, MemoryStore};
//! use lumiere_api::services::AuthService;
//!
//! let session = AuthSession::new(Arc::new(MemoryStore::new()));
//! let client = ApiClient::new(&ApiConfig::from_env()?, session)?;
//!
//! let auth = AuthService::new(client.clone());
//! let user = auth.login("admin@lumiere.vn", "hunter22").await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod retry;
pub mod services;
pub mod session;
pub mod storage;

pub use client::ApiClient;
pub use config::{ApiConfig, ConfigError};
pub use error::ApiError;
pub use retry::retry_with_backoff;
pub use session::AuthSession;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
