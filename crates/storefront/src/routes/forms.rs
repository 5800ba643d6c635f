//! Form submission handlers.
//!
//! Each handler trims and validates its payload, forwards it to the
//! configured integration and answers `{"success": true}` or an
//! [`AppError`].

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use lumiere_core::{Email, Price};

use crate::error::{AppError, FormResponse, Result};
use crate::services::ContactMail;
use crate::services::sheets::Sheet;
use crate::state::AppState;

// =============================================================================
// Payloads
// =============================================================================

/// A line of a saved order.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedOrderLine {
    pub name: String,
    pub quantity: u32,
    pub price: Price,
}

/// Order summary posted by the success page.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveOrderForm {
    pub order_id: String,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<String>,
    pub total: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub items: Vec<SavedOrderLine>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// "Notify me" / product interest form.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterestForm {
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Contact form.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub message: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// Append an order summary to the orders sheet.
///
/// POST /api/save-order
#[instrument(skip(state, form), fields(order_id = %form.order_id))]
pub async fn save_order(
    State(state): State<AppState>,
    Json(form): Json<SaveOrderForm>,
) -> Result<Json<FormResponse>> {
    let form = SaveOrderForm {
        order_id: required(&form.order_id, "Order ID is required.")?,
        customer_name: required(&form.customer_name, "Name is required.")?,
        customer_email: valid_email(&form.customer_email)?,
        customer_phone: trimmed(form.customer_phone),
        shipping_address: trimmed(form.shipping_address),
        payment_method: trimmed(form.payment_method),
        note: trimmed(form.note),
        ..form
    };
    if form.total.is_negative() {
        return Err(AppError::BadRequest("Total cannot be negative.".to_string()));
    }

    let sheets = state.sheets().ok_or(AppError::Unavailable("sheets"))?;
    sheets.append(Sheet::Orders, &form).await?;

    tracing::info!(order_id = %form.order_id, "Order saved to sheet");
    Ok(Json(FormResponse::ok()))
}

/// Append an interest registration to the interest sheet.
///
/// POST /api/submit-interest
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn submit_interest(
    State(state): State<AppState>,
    Json(form): Json<InterestForm>,
) -> Result<Json<FormResponse>> {
    let form = InterestForm {
        name: required(&form.name, "Name is required.")?,
        email: valid_email(&form.email)?,
        phone: trimmed(form.phone),
        product: trimmed(form.product),
        message: trimmed(form.message),
    };

    let sheets = state.sheets().ok_or(AppError::Unavailable("sheets"))?;
    sheets.append(Sheet::Interest, &form).await?;

    tracing::info!(product = ?form.product, "Interest registered");
    Ok(Json(FormResponse::ok()))
}

/// Forward a contact form to the shop inbox.
///
/// POST /api/sendmail
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn send_mail(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<Json<FormResponse>> {
    let email = valid_email(&form.email)?;
    if form.name.trim().is_empty() || form.message.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Name and message are required.".to_string(),
        ));
    }

    let mailer = state.mailer().ok_or(AppError::Unavailable("mail"))?;
    mailer
        .send_contact(&ContactMail {
            name: form.name.trim(),
            email: &email,
            subject: form.subject.as_deref(),
            message: form.message.trim(),
        })
        .await?;

    Ok(Json(FormResponse::ok()))
}

// =============================================================================
// Helpers
// =============================================================================

fn required(value: &str, message: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(message.to_string()));
    }
    Ok(value.to_string())
}

fn valid_email(raw: &str) -> Result<String> {
    let email = raw.trim().to_lowercase();
    Email::parse(&email)
        .map(Email::into_inner)
        .map_err(|_| AppError::BadRequest("Please enter a valid email address.".to_string()))
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
