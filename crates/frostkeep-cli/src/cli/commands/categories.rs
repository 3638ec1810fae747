//! Category listing and administration.

use anyhow::Result;
use frostkeep_core::api::categories::CategoriesClient;
use frostkeep_core::api::types::CategoryPayload;

use crate::cli::{AppContext, CategoryCommands, render};

pub async fn run(command: CategoryCommands, ctx: &AppContext) -> Result<()> {
    let client = CategoriesClient::new(ctx.backend.clone(), ctx.token.as_str());

    match command {
        CategoryCommands::List => {
            let categories = client.list().await?;
            if categories.is_empty() {
                println!("No categories.");
            } else {
                println!("{}", render::categories_table(&categories));
            }
            Ok(())
        }

        CategoryCommands::Get { id } => {
            let category = client.get(id).await?;
            println!("{}", render::categories_table(std::slice::from_ref(&category)));
            Ok(())
        }

        CategoryCommands::Add {
            name,
            icon,
            unit,
            step,
            min,
            max,
        } => {
            let payload = CategoryPayload {
                name,
                icon,
                default_unit: unit,
                unit_step: step,
                min_value: min,
                max_value: max,
            };
            let category = client.create(&payload).await?;
            println!("Added category {} (id {}).", category.name, category.id);
            Ok(())
        }

        CategoryCommands::Edit {
            id,
            name,
            icon,
            unit,
            step,
            min,
            max,
        } => {
            let current = client.get(id).await?;
            let payload = CategoryPayload {
                name: name.unwrap_or(current.name),
                icon: icon.or(current.icon),
                default_unit: unit.unwrap_or(current.default_unit),
                unit_step: step.unwrap_or(current.unit_step),
                min_value: min.unwrap_or(current.min_value),
                max_value: max.unwrap_or(current.max_value),
            };
            let category = client.update(id, &payload).await?;
            println!("Updated category {} (id {}).", category.name, category.id);
            Ok(())
        }

        CategoryCommands::Rm { id } => {
            client.delete(id).await?;
            println!("Deleted category {id}.");
            Ok(())
        }
    }
}
