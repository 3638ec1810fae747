//! Account administration.

use anyhow::Result;
use frostkeep_core::api::types::CreateUserRequest;
use frostkeep_core::api::users::UsersClient;

use crate::cli::{AppContext, UserCommands, render};

pub async fn run(command: UserCommands, ctx: &AppContext) -> Result<()> {
    let client = UsersClient::new(ctx.backend.clone(), ctx.token.as_str());

    match command {
        UserCommands::List => {
            let accounts = client.list().await?;
            if accounts.is_empty() {
                println!("No accounts.");
            } else {
                println!("{}", render::accounts_table(&accounts));
            }
            Ok(())
        }

        UserCommands::Get { id } => {
            let account = client.get(id).await?;
            println!("{}", render::accounts_table(std::slice::from_ref(&account)));
            Ok(())
        }

        UserCommands::Add {
            username,
            email,
            password,
            role,
        } => {
            let account = client
                .create(&CreateUserRequest {
                    username,
                    email,
                    password,
                    role,
                })
                .await?;
            println!("Added account {} (id {}).", account.username, account.id);
            Ok(())
        }

        UserCommands::Rm { id } => {
            client.delete(id).await?;
            println!("Deleted account {id}.");
            Ok(())
        }
    }
}
