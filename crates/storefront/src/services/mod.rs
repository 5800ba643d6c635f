//! Outbound integrations used by the form glue routes.
//!
//! - [`sheets`] - Google Sheets web app receiving order and interest rows
//! - [`mailer`] - SMTP delivery of contact form mail

pub mod mailer;
pub mod sheets;

pub use mailer::{ContactMail, MailError, Mailer};
pub use sheets::{SheetsClient, SheetsError};
