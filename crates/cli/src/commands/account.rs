//! Sign in, sign up and sign out.


use lumiere_api::services::AuthService;
use lumiere_api::services::auth::Registration;

use crate::context::{CliError, Context};

pub async fn login(ctx: &Context, email: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let user = AuthService::new(ctx.client().clone())
        .login(email, password)
        .await?;
    say!("Signed in as {} <{}> ({})", user.display_name(), user.email, user.role.label());
    Ok(())
}

pub async fn register(ctx: &Context, registration: &Registration) -> Result<(), Box<dyn std::error::Error>> {
    let user = AuthService::new(ctx.client().clone())
        .register(registration)
        .await?;
    say!("Account created for {} <{}>", user.display_name(), user.email);
    if let Some(code) = &user.referral_code {
        say!("Your referral code: {code}");
    }
    Ok(())
}

pub fn logout(ctx: &Context) {
    AuthService::new(ctx.client().clone()).logout();
    say!("Signed out");
}

/// Show the signed-in user; `refresh` re-reads the profile from the backend.
pub async fn whoami(ctx: &Context, refresh: bool) -> Result<(), Box<dyn std::error::Error>> {
    ctx.require_login()?;
    let auth = AuthService::new(ctx.client().clone());
    let user = if refresh {
        auth.profile().await?
    } else {
        auth.current_user().ok_or(CliError::NotSignedIn)?
    };

    say!("{} <{}>", user.display_name(), user.email);
    say!("  id:       {}", user.id);
    say!("  role:     {}", user.role.label());
    if let Some(phone) = &user.phone {
        say!("  phone:    {phone}");
    }
    if let Some(code) = &user.referral_code {
        say!("  referral: {code}");
    }
    Ok(())
}
