//! Admin reports.

use chrono::NaiveDate;
use clap::Subcommand;

use lumiere_api::models::ReportRange;
use lumiere_api::services::ReportService;
use lumiere_core::{RevenuePeriod, UserId};

use crate::context::Context;

#[derive(Subcommand)]
pub enum ReportsAction {
    /// Headline numbers
    Dashboard,
    /// Revenue per day, week or month
    Revenue {
        /// First day, `YYYY-MM-DD`
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day, `YYYY-MM-DD`
        #[arg(long)]
        to: Option<NaiveDate>,
        /// `day`, `week` or `month`
        #[arg(long)]
        group_by: Option<RevenuePeriod>,
    },
    /// Sales and referral summary per user
    Users,
    /// One user's orders and referral tree
    User { id: String },
    /// Referral trees (F1 and F2)
    Referrals,
}

pub async fn run(ctx: &Context, action: ReportsAction) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_admin()?;
    let reports = ReportService::new(ctx.client().clone());

    match action {
        ReportsAction::Dashboard => {
            let stats = reports.dashboard().await?;
            say!("Revenue:          {}", stats.total_revenue);
            say!("Orders:           {} ({} pending)", stats.total_orders, stats.pending_orders);
            say!("Users:            {}", stats.total_users);
            say!("Commission paid:  {}", stats.total_commission);
        }
        ReportsAction::Revenue { from, to, group_by } => {
            let points = reports
                .revenue(&ReportRange {
                    start_date: from,
                    end_date: to,
                    period: group_by,
                })
                .await?;
            for point in &points {
                say!("  {:<12} {:>16} {:>5} orders", point.period, point.revenue.to_string(), point.orders);
            }
        }
        ReportsAction::Users => {
            for user in reports.users().await? {
                say!(
                    "  {:<6} {:<24} {:>4} orders {:>16}  F1 {:>3}  F2 {:>3}",
                    user.user_id,
                    user.full_name,
                    user.total_orders,
                    user.total_spent.to_string(),
                    user.f1_count,
                    user.f2_count
                );
            }
        }
        ReportsAction::User { id } => {
            let detail = reports.user_detail(&UserId::new(id)).await?;
            let s = &detail.summary;
            say!("{} <{}>", s.full_name, s.email);
            say!("  spent {} over {} orders, earned {}", s.total_spent, s.total_orders, s.commission_earned);
            for order in &detail.orders {
                say!("  order {} {} {}", order.reference(), order.status.label(), order.total_amount);
            }
            for member in &detail.f1 {
                say!("  F1 {} {}", member.full_name, member.total_spent);
            }
            for member in &detail.f2 {
                say!("  F2 {} {}", member.full_name, member.total_spent);
            }
        }
        ReportsAction::Referrals => {
            for tree in reports.referrals().await? {
                say!(
                    "  {:<24} {:<10} F1 {:>3}  F2 {:>3}  network spend {}",
                    tree.full_name,
                    tree.referral_code.as_deref().unwrap_or("-"),
                    tree.f1.len(),
                    tree.f2.len(),
                    tree.network_spend()
                );
            }
        }
    }
    Ok(())
}
