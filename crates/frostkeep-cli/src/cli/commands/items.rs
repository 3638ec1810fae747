//! Item listing, editing, filtering, and CSV import.

use anyhow::{Context, Result};
use frostkeep_core::api::categories::CategoriesClient;
use frostkeep_core::api::files::FilesClient;
use frostkeep_core::api::items::ItemsClient;
use frostkeep_core::api::types::{CsvImportRequest, Item, ItemPayload};
use frostkeep_core::validate::{validate_expiry_days, validate_quantity};

use crate::cli::{AppContext, ItemCommands, render};

pub async fn run(command: ItemCommands, ctx: &AppContext) -> Result<()> {
    let client = ItemsClient::new(ctx.backend.clone(), ctx.token.as_str());

    match command {
        ItemCommands::List { category } => {
            let items = match category {
                Some(name) => {
                    let category = categories_client(ctx).by_name(&name).await?;
                    client.by_category(category.id).await?
                }
                None => client.list().await?,
            };
            print_items(&items);
            Ok(())
        }

        ItemCommands::Get { id } => {
            let item = client.get(id).await?;
            print_item(&item);
            Ok(())
        }

        ItemCommands::Add {
            name,
            category,
            quantity,
            unit,
            expiry,
            expiry_type,
            description,
            photo,
        } => {
            let category = categories_client(ctx).by_name(&category).await?;
            validate_quantity(quantity, &category)?;

            let photo_path = match photo {
                Some(path) => Some(upload_photo(ctx, &path).await?),
                None => None,
            };

            let payload = ItemPayload {
                name,
                category_id: category.id,
                quantity,
                unit: unit.unwrap_or_else(|| category.default_unit.clone()),
                expiry_date: expiry,
                expiry_type: expiry_type.into(),
                photo_path,
                description,
            };
            let item = client.create(&payload).await?;
            println!("Added {} (id {}).", item.name, item.id);
            Ok(())
        }

        ItemCommands::Edit {
            id,
            name,
            quantity,
            unit,
            expiry,
            expiry_type,
            description,
        } => {
            let current = client.get(id).await?;

            if let Some(quantity) = quantity {
                let category = categories_client(ctx).get(current.category_id).await?;
                validate_quantity(quantity, &category)?;
            }

            let payload = ItemPayload {
                name: name.unwrap_or(current.name),
                category_id: current.category_id,
                quantity: quantity.unwrap_or(current.quantity),
                unit: unit.unwrap_or(current.unit),
                expiry_date: expiry.or(current.expiry_date),
                expiry_type: expiry_type.map_or(current.expiry_type, Into::into),
                photo_path: current.photo_path,
                description: description.or(current.description),
            };
            let item = client.update(id, &payload).await?;
            println!("Updated {} (id {}).", item.name, item.id);
            Ok(())
        }

        ItemCommands::Rm { id } => {
            client.delete(id).await?;
            println!("Deleted item {id}.");
            Ok(())
        }

        ItemCommands::Search { query } => {
            print_items(&client.search(&query).await?);
            Ok(())
        }

        ItemCommands::Expiring { days } => {
            let days = days.unwrap_or(ctx.config.expiry_warning_days);
            validate_expiry_days(days)?;
            print_items(&client.expiring(days).await?);
            Ok(())
        }

        ItemCommands::Expired => {
            print_items(&client.expired().await?);
            Ok(())
        }

        ItemCommands::Stats => {
            let stats = client.stats().await?;
            println!(
                "Items: {}   Expiring soon: {}   Expired: {}",
                stats.total_items, stats.expiring_soon, stats.expired
            );
            Ok(())
        }

        ItemCommands::Import {
            file,
            keep_invalid,
            dry_run,
        } => {
            let files = FilesClient::new(ctx.backend.clone(), ctx.token.as_str());
            let upload = files.upload_csv(&file).await?;
            if !upload.success {
                anyhow::bail!(
                    "CSV upload failed: {}",
                    upload.error.as_deref().unwrap_or("unknown error")
                );
            }
            let preview = upload.data.context("CSV upload returned no preview")?;

            let valid = preview.items.iter().filter(|row| row.valid).count();
            let invalid = preview.items.len() - valid;
            println!("{}", render::csv_preview_table(&preview.items));
            println!("{valid} valid, {invalid} invalid rows.");

            if dry_run {
                return Ok(());
            }
            if valid == 0 && !keep_invalid {
                anyhow::bail!("Nothing to import.");
            }

            let report = client
                .import_csv(&CsvImportRequest {
                    items: preview.items,
                    skip_invalid_items: !keep_invalid,
                })
                .await?;
            println!(
                "Imported {}, skipped {}.",
                report.imported_count, report.skipped_count
            );
            for error in &report.errors {
                println!("  {error}");
            }
            Ok(())
        }
    }
}

fn categories_client(ctx: &AppContext) -> CategoriesClient {
    CategoriesClient::new(ctx.backend.clone(), ctx.token.as_str())
}

async fn upload_photo(ctx: &AppContext, path: &std::path::Path) -> Result<String> {
    let files = FilesClient::new(ctx.backend.clone(), ctx.token.as_str());
    let response = files.upload_image(path).await?;
    if !response.success {
        anyhow::bail!(
            "Photo upload failed: {}",
            response.error.as_deref().unwrap_or("unknown error")
        );
    }
    response.file_path.context("upload returned no file path")
}

fn print_items(items: &[Item]) {
    if items.is_empty() {
        println!("No items.");
    } else {
        println!("{}", render::items_table(items));
    }
}

fn print_item(item: &Item) {
    println!("{} (id {})", item.name, item.id);
    println!("Category: {}", item.category_name);
    println!("Quantity: {} {}", item.quantity, item.unit);
    match item.expiry_date {
        Some(date) => println!("Expiry: {} ({})", date, item.expiry_type),
        None => println!("Expiry: -"),
    }
    if let Some(description) = &item.description {
        println!("Description: {description}");
    }
    if let Some(photo) = &item.photo_path {
        println!("Photo: {photo}");
    }
}
