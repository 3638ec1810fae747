//! Session display and the overview (default landing view).

use anyhow::{Context, Result};
use frostkeep_core::api::auth::mask_token;
use frostkeep_core::api::items::ItemsClient;
use frostkeep_core::session::Session;

use crate::cli::{AppContext, render};

pub fn whoami(session: &Session) -> Result<()> {
    let user = session.user().context("not signed in")?;
    let token = session.token().context("not signed in")?;

    println!("Signed in as {} <{}>", user.username, user.email);
    println!("Roles: {}", user.roles.join(", "));
    println!("Token: {}", mask_token(token));
    Ok(())
}

/// Stats plus the items expiring within the configured window.
pub async fn overview(ctx: &AppContext) -> Result<()> {
    let items = ItemsClient::new(ctx.backend.clone(), ctx.token.as_str());

    let stats = items.stats().await?;
    println!(
        "Items: {}   Expiring soon: {}   Expired: {}",
        stats.total_items, stats.expiring_soon, stats.expired
    );

    let days = ctx.config.expiry_warning_days;
    let expiring = items.expiring(days).await?;
    if expiring.is_empty() {
        println!("Nothing expires within {days} days.");
    } else {
        println!();
        println!("Expiring within {days} days:");
        println!("{}", render::items_table(&expiring));
    }
    Ok(())
}
