//! Checkout, payment return and order history.

use clap::{Args, Subcommand};

use lumiere_api::services::OrderService;
use lumiere_core::PaymentMethod;
use lumiere_storefront::checkout::{CheckoutError, CheckoutForm, CheckoutOutcome};

use crate::context::Context;

/// Shipping details and payment choice.
#[derive(Args)]
pub struct CheckoutArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub email: String,
    #[arg(long)]
    pub phone: String,
    #[arg(long)]
    pub address: String,
    #[arg(long)]
    pub region: Option<String>,
    /// Referral code of the mentor to credit
    #[arg(long)]
    pub mentor_code: Option<String>,
    #[arg(long)]
    pub note: Option<String>,
    /// Pay online through PayOS instead of cash on delivery
    #[arg(long)]
    pub online: bool,
}

#[derive(Subcommand)]
pub enum PaymentAction {
    /// Check the pending online payment
    Status,
    /// Cancel the pending online payment
    Cancel {
        #[arg(long)]
        reason: Option<String>,
    },
    /// Show the last cash-on-delivery order
    LastOrder,
}

#[derive(Subcommand)]
pub enum OrdersAction {
    /// Orders placed by the signed-in user
    Mine,
}

pub async fn checkout(ctx: &Context, args: CheckoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let method = if args.online {
        PaymentMethod::Online
    } else {
        PaymentMethod::Cod
    };
    let form = CheckoutForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        address: args.address,
        region: args.region,
        mentor_code: args.mentor_code,
        note: args.note,
    };

    let outcome = match ctx.checkout().submit(&form, method).await {
        Ok(outcome) => outcome,
        Err(CheckoutError::Invalid(errors)) => {
            for (field, message) in errors.iter() {
                complain!("  {field}: {message}");
            }
            return Err(CheckoutError::Invalid(errors).into());
        }
        Err(e) => {
            complain!("{}", e.user_message());
            return Err(e.into());
        }
    };

    for line in outcome_lines(&outcome) {
        say!("{line}");
    }
    Ok(())
}

/// What to tell the shopper once the order is placed.
fn outcome_lines(outcome: &CheckoutOutcome) -> Vec<String> {
    match outcome {
        CheckoutOutcome::Completed { order } => vec![format!(
            "Order {} placed: {} to pay on delivery",
            order.reference(),
            order.total_amount
        )],
        CheckoutOutcome::Redirect {
            checkout_url,
            order_code,
            order_id,
        } => vec![
            format!("Order {order_id} created, payment code {order_code}"),
            format!("Complete the payment at: {checkout_url}"),
            "Then run `lumiere payment status`".to_string(),
        ],
    }
}

pub async fn payment(ctx: &Context, action: PaymentAction) -> Result<(), Box<dyn std::error::Error>> {
    let payments = ctx.payment_return();
    match action {
        PaymentAction::Status => match payments.reconcile().await? {
            Some(info) => {
                say!(
                    "Payment {}: {} ({} of {} received)",
                    info.order_code,
                    info.status.label(),
                    info.amount_paid,
                    info.amount
                );
            }
            None => say!("No payment in progress"),
        },
        PaymentAction::Cancel { reason } => match payments.cancel(reason.as_deref()).await? {
            Some(info) => say!("Payment {} cancelled", info.order_code),
            None => say!("No payment in progress"),
        },
        PaymentAction::LastOrder => match payments.last_order() {
            Some(order) => {
                say!("Order {} placed {}", order.reference, order.placed_at.format("%Y-%m-%d %H:%M"));
                say!("  {} <{}>", order.customer_name, order.customer_email);
                say!("  {} items, {} ({})", order.item_count, order.total, order.payment_method.label());
            }
            None => say!("No recent order"),
        },
    }
    Ok(())
}

pub async fn orders(ctx: &Context, action: OrdersAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        OrdersAction::Mine => {
            ctx.require_login()?;
            let orders = OrderService::new(ctx.client().clone()).my_orders().await?;
            if orders.is_empty() {
                say!("No orders yet");
            }
            for order in &orders {
                say!(
                    "  {:<14} {:<10} {:>14}  {}",
                    order.reference(),
                    order.status.label(),
                    order.total_amount.to_string(),
                    order.payment_method.label()
                );
            }
        }
    }
    Ok(())
}
