//! Sign-in and sign-out.

use anyhow::Result;
use frostkeep_core::api::auth::AuthClient;
use frostkeep_core::api::types::Credentials;
use frostkeep_core::session::Session;
use frostkeep_core::validate::validate_credentials;

pub async fn sign_in(
    session: &mut Session,
    auth: &AuthClient,
    username: String,
    password: String,
) -> Result<()> {
    let credentials = Credentials { username, password };
    // Local check; empty fields never reach the backend.
    validate_credentials(&credentials)?;

    let user = session.login(auth, &credentials).await?;
    println!("Signed in as {} ({}).", user.username, user.roles.join(", "));
    Ok(())
}

pub fn sign_out(session: &mut Session) -> Result<()> {
    session.logout()?;
    println!("Signed out.");
    Ok(())
}
