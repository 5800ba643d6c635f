//! Domain services, one per backend resource.
//!
//! Each service is a thin, cloneable wrapper over [`ApiClient`](crate::ApiClient)
//! that maps methods 1:1 onto REST endpoints. Business rules live on the
//! backend; the only client-side checks are the ones the admin forms need
//! before submitting (commission split balance, tier and credential shape).

pub mod auth;
pub mod commissions;
pub mod discount_tiers;
pub mod orders;
pub mod payments;
pub mod payos_config;
pub mod products;
pub mod reports;
pub mod users;

pub use auth::AuthService;
pub use commissions::CommissionService;
pub use discount_tiers::DiscountTierService;
pub use orders::OrderService;
pub use payments::PaymentService;
pub use payos_config::PayOsConfigService;
pub use products::ProductService;
pub use reports::ReportService;
pub use users::UserService;
