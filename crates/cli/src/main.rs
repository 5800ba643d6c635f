//! Lumiere CLI - shop and administer the Lumiere storefront from a terminal.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (token is kept in $LUMIERE_DATA_DIR/local.json)
//! lumiere login -e lan@example.com
//!
//! # Fill the cart and check out with cash on delivery
//! lumiere cart add p1 --quantity 2
//! lumiere checkout --name "Nguyen Lan" --email lan@example.com \
//!     --phone 0901234567 --address "12 Le Loi, District 1"
//!
//! # Pay online instead, then check the payment
//! lumiere checkout ... --online
//! lumiere payment status
//!
//! # Admin: add a commission option (shares must add up to 50)
//! lumiere admin commissions create --name Launch \
//!     --company 12 --vip 20 --mentor 10 --mentee 6 --loyalty 2
//! ```
//!
//! # Environment Variables
//!
//! - `LUMIERE_API_URL` - backend base URL (required)
//! - `LUMIERE_STOREFRONT_URL` - public site URL used for payment return pages
//! - `LUMIERE_DATA_DIR` - where the local and session stores live

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use lumiere_api::services::auth::Registration;

#[macro_use]
mod output;

mod commands;
mod context;

use commands::admin::AdminCommand;
use commands::checkout::{CheckoutArgs, OrdersAction, PaymentAction};
use commands::reports::ReportsAction;
use commands::shop::{CartAction, ProductsAction};
use context::Context;

#[derive(Parser)]
#[command(name = "lumiere")]
#[command(author, version, about = "Lumiere storefront and admin CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in
    Login {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "LUMIERE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and sign in
    Register {
        #[arg(short, long)]
        email: String,
        #[arg(short, long, env = "LUMIERE_PASSWORD", hide_env_values = true)]
        password: String,
        #[arg(short, long)]
        name: String,
        #[arg(long)]
        phone: Option<String>,
        /// Referral code of the member who invited you
        #[arg(long)]
        referral_code: Option<String>,
    },
    /// Sign out and forget the stored token
    Logout,
    /// Show the signed-in user
    Whoami {
        /// Re-read the profile from the backend
        #[arg(long)]
        refresh: bool,
    },
    /// Browse the catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart
    Checkout(CheckoutArgs),
    /// Follow up on an online payment
    Payment {
        #[command(subcommand)]
        action: PaymentAction,
    },
    /// Order history
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Admin dashboard
    Admin {
        #[command(subcommand)]
        command: AdminCommand,
    },
    /// Admin reports
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::debug!(error = ?e, "Command failed");
        complain!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = Context::from_env()?;

    match cli.command {
        Commands::Login { email, password } => {
            commands::account::login(&ctx, &email, &password).await?;
        }
        Commands::Register {
            email,
            password,
            name,
            phone,
            referral_code,
        } => {
            let registration = Registration {
                email,
                password,
                full_name: name,
                phone,
                referral_code,
            };
            commands::account::register(&ctx, &registration).await?;
        }
        Commands::Logout => commands::account::logout(&ctx),
        Commands::Whoami { refresh } => commands::account::whoami(&ctx, refresh).await?,
        Commands::Products { action } => commands::shop::products(&ctx, action).await?,
        Commands::Cart { action } => commands::shop::cart(&ctx, action).await?,
        Commands::Checkout(args) => commands::checkout::checkout(&ctx, args).await?,
        Commands::Payment { action } => commands::checkout::payment(&ctx, action).await?,
        Commands::Orders { action } => commands::checkout::orders(&ctx, action).await?,
        Commands::Admin { command } => commands::admin::run(&ctx, command).await?,
        Commands::Reports { action } => commands::reports::run(&ctx, action).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_online_checkout() {
        let cli = Cli::try_parse_from([
            "lumiere", "checkout", "--name", "Lan", "--email", "lan@example.com", "--phone",
            "0901234567", "--address", "12 Le Loi", "--online",
        ])
        .unwrap_or_else(|e| panic!("{e}"));
        let Commands::Checkout(args) = cli.command else {
            panic!("expected checkout");
        };
        assert!(args.online);
        assert_eq!(args.mentor_code, None);
    }

    #[test]
    fn test_parse_commission_split() {
        let cli = Cli::try_parse_from([
            "lumiere", "admin", "commissions", "create", "--name", "Launch", "--company", "12",
            "--vip", "20", "--mentor", "10", "--mentee", "6", "--loyalty", "2",
        ]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_parse_rejects_unknown_order_status() {
        let cli = Cli::try_parse_from(["lumiere", "admin", "orders", "status", "o1", "lost"]);
        assert!(cli.is_err());
    }
}
