//! Admin dashboard commands.
//!
//! Every mutation follows load → mutate → reload: the command acts on the
//! backend, then lists the resource again so the output shows what the
//! backend now holds.

use clap::{Args, Subcommand};
use rust_decimal::Decimal;

use lumiere_api::models::{CommissionInput, OrderQuery, UpdateUserRequest};
use lumiere_api::services::{
    CommissionService, DiscountTierService, OrderService, PayOsConfigService, UserService,
};
use lumiere_core::{
    CommissionId, CommissionSplit, DiscountTierId, DiscountTierInput, OrderId, OrderStatus,
    PayOsConfigId, PayOsCredentials, Price, UserId, UserRole,
};

use crate::context::{CliError, Context};

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Manage orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Manage commission options
    Commissions {
        #[command(subcommand)]
        action: CommissionsAction,
    },
    /// Manage customer discount tiers
    Tiers {
        #[command(subcommand)]
        action: TiersAction,
    },
    /// Manage PayOS merchant configuration
    Payos {
        #[command(subcommand)]
        action: PayOsAction,
    },
    /// Manage user accounts
    Users {
        #[command(subcommand)]
        action: UsersAction,
    },
}

#[derive(Subcommand)]
pub enum OrdersAction {
    /// List orders
    List {
        #[arg(long)]
        status: Option<OrderStatus>,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Move an order to a new status
    Status { id: String, status: OrderStatus },
}

/// The five shares of a commission option, in percent. They must add up to 50.
#[derive(Args)]
pub struct SplitArgs {
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub company: Decimal,
    #[arg(long)]
    pub vip: Decimal,
    #[arg(long)]
    pub mentor: Decimal,
    #[arg(long)]
    pub mentee: Decimal,
    #[arg(long)]
    pub loyalty: Decimal,
    #[arg(long)]
    pub description: Option<String>,
}

impl SplitArgs {
    fn into_input(self) -> CommissionInput {
        CommissionInput {
            name: self.name,
            split: CommissionSplit {
                company_percent: self.company,
                vip_percent: self.vip,
                mentor_percent: self.mentor,
                mentee_percent: self.mentee,
                loyalty_percent: self.loyalty,
            },
            description: self.description,
        }
    }
}

#[derive(Subcommand)]
pub enum CommissionsAction {
    List,
    Create(SplitArgs),
    Update {
        id: String,
        #[command(flatten)]
        split: SplitArgs,
    },
    Delete { id: String },
    /// Make this option the one applied to new orders
    Activate { id: String },
}

#[derive(Args)]
pub struct TierArgs {
    #[arg(long)]
    pub name: String,
    /// Minimum spend in VND
    #[arg(long)]
    pub min_amount: i64,
    #[arg(long)]
    pub percent: Decimal,
    #[arg(long)]
    pub description: Option<String>,
}

impl TierArgs {
    fn into_input(self) -> DiscountTierInput {
        DiscountTierInput {
            name: self.name,
            min_amount: Price::from_dong(self.min_amount),
            discount_percent: self.percent,
            description: self.description,
        }
    }
}

#[derive(Subcommand)]
pub enum TiersAction {
    List,
    Create(TierArgs),
    Update {
        id: String,
        #[command(flatten)]
        tier: TierArgs,
    },
    Delete { id: String },
    Activate { id: String },
}

#[derive(Args)]
pub struct PayOsArgs {
    #[arg(long)]
    pub client_id: String,
    #[arg(long, env = "PAYOS_API_KEY", hide_env_values = true)]
    pub api_key: String,
    #[arg(long, env = "PAYOS_CHECKSUM_KEY", hide_env_values = true)]
    pub checksum_key: String,
}

impl PayOsArgs {
    fn into_credentials(self) -> PayOsCredentials {
        PayOsCredentials {
            client_id: self.client_id,
            api_key: self.api_key,
            checksum_key: self.checksum_key,
        }
    }
}

#[derive(Subcommand)]
pub enum PayOsAction {
    List,
    Create(PayOsArgs),
    Update {
        id: String,
        #[command(flatten)]
        credentials: PayOsArgs,
    },
    Delete { id: String },
    Activate { id: String },
}

#[derive(Subcommand)]
pub enum UsersAction {
    List,
    Show { id: String },
    Update {
        id: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        role: Option<UserRole>,
        #[arg(long)]
        active: Option<bool>,
    },
    Delete { id: String },
}

pub async fn run(ctx: &Context, command: AdminCommand) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_admin()?;
    match command {
        AdminCommand::Orders { action } => orders(ctx, action).await,
        AdminCommand::Commissions { action } => commissions(ctx, action).await,
        AdminCommand::Tiers { action } => tiers(ctx, action).await,
        AdminCommand::Payos { action } => payos(ctx, action).await,
        AdminCommand::Users { action } => users(ctx, action).await,
    }
}

// =============================================================================
// Orders
// =============================================================================

async fn orders(ctx: &Context, action: OrdersAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = OrderService::new(ctx.client().clone());
    match action {
        OrdersAction::List {
            status,
            page,
            limit,
        } => {
            let orders = service.list(&OrderQuery { status, page, limit }).await?;
            say!("{} orders", orders.len());
            for order in &orders {
                say!(
                    "  {:<14} {:<10} {:>14}  {} <{}>",
                    order.reference(),
                    order.status.label(),
                    order.total_amount.to_string(),
                    order.customer_name,
                    order.customer_email
                );
            }
        }
        OrdersAction::Status { id, status } => {
            let order = service.update_status(&OrderId::new(id), status).await?;
            let order = service.get(&order.id).await?;
            say!("Order {} is now {}", order.reference(), order.status.label());
        }
    }
    Ok(())
}

// =============================================================================
// Commissions
// =============================================================================

async fn commissions(ctx: &Context, action: CommissionsAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = CommissionService::new(ctx.client().clone());
    match action {
        CommissionsAction::List => {}
        CommissionsAction::Create(args) => {
            let created = service.create(&args.into_input()).await?;
            say!("Created commission option {}", created.id);
        }
        CommissionsAction::Update { id, split } => {
            service
                .update(&CommissionId::new(id), &split.into_input())
                .await?;
        }
        CommissionsAction::Delete { id } => service.delete(&CommissionId::new(id)).await?,
        CommissionsAction::Activate { id } => service.activate(&CommissionId::new(id)).await?,
    }

    for commission in service.list().await? {
        let s = &commission.split;
        say!(
            "{} {:<4} {:<20} company {}% vip {}% mentor {}% mentee {}% loyalty {}%",
            if commission.is_active { "*" } else { " " },
            commission.id,
            commission.name,
            s.company_percent,
            s.vip_percent,
            s.mentor_percent,
            s.mentee_percent,
            s.loyalty_percent
        );
    }
    Ok(())
}

// =============================================================================
// Discount tiers
// =============================================================================

async fn tiers(ctx: &Context, action: TiersAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = DiscountTierService::new(ctx.client().clone());
    match action {
        TiersAction::List => {}
        TiersAction::Create(args) => {
            let created = service.create(&args.into_input()).await?;
            say!("Created discount tier {}", created.id);
        }
        TiersAction::Update { id, tier } => {
            service
                .update(&DiscountTierId::new(id), &tier.into_input())
                .await?;
        }
        TiersAction::Delete { id } => service.delete(&DiscountTierId::new(id)).await?,
        TiersAction::Activate { id } => service.activate(&DiscountTierId::new(id)).await?,
    }

    for tier in service.list().await? {
        say!(
            "{} {:<4} {:<16} from {:>14}  {}% off",
            if tier.is_active { "*" } else { " " },
            tier.id,
            tier.tier.name,
            tier.tier.min_amount.to_string(),
            tier.tier.discount_percent
        );
    }
    Ok(())
}

// =============================================================================
// PayOS configuration
// =============================================================================

async fn payos(ctx: &Context, action: PayOsAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = PayOsConfigService::new(ctx.client().clone());
    match action {
        PayOsAction::List => {}
        PayOsAction::Create(args) => {
            let created = service.create(&args.into_credentials()).await?;
            say!("Created PayOS config {}", created.id);
        }
        PayOsAction::Update { id, credentials } => {
            service
                .update(&PayOsConfigId::new(id), &credentials.into_credentials())
                .await?;
        }
        PayOsAction::Delete { id } => service.delete(&PayOsConfigId::new(id)).await?,
        PayOsAction::Activate { id } => service.activate(&PayOsConfigId::new(id)).await?,
    }

    for config in service.list().await? {
        say!(
            "{} {:<4} client {}  key {}",
            if config.is_active { "*" } else { " " },
            config.id,
            config.client_id,
            config.masked_api_key()
        );
    }
    Ok(())
}

// =============================================================================
// Users
// =============================================================================

async fn users(ctx: &Context, action: UsersAction) -> Result<(), Box<dyn std::error::Error>> {
    let service = UserService::new(ctx.client().clone());
    match action {
        UsersAction::List => {}
        UsersAction::Show { id } => {
            let user = service.get(&UserId::new(id)).await?;
            say!("{} <{}> {}", user.display_name(), user.email, user.role.label());
            if let Some(code) = &user.referral_code {
                say!("  referral code: {code}");
            }
            if let Some(mentor) = &user.mentor_id {
                say!("  mentor:        {mentor}");
            }
            say!("  active:        {}", user.is_active);
            return Ok(());
        }
        UsersAction::Update {
            id,
            full_name,
            phone,
            role,
            active,
        } => {
            let update = UpdateUserRequest {
                full_name,
                phone,
                role,
                is_active: active,
            };
            if update.is_empty() {
                return Err(CliError::NothingToUpdate.into());
            }
            service.update(&UserId::new(id), &update).await?;
        }
        UsersAction::Delete { id } => service.delete(&UserId::new(id)).await?,
    }

    for user in service.list().await? {
        say!(
            "  {:<6} {:<28} {:<24} {}{}",
            user.id,
            user.email.as_str(),
            user.full_name,
            user.role,
            if user.is_active { "" } else { " (disabled)" }
        );
    }
    Ok(())
}
