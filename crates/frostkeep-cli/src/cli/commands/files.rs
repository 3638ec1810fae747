//! Photo and CSV uploads.

use anyhow::{Context, Result};
use frostkeep_core::api::files::FilesClient;

use crate::cli::{AppContext, FileCommands, render};

pub async fn run(command: FileCommands, ctx: &AppContext) -> Result<()> {
    let client = FilesClient::new(ctx.backend.clone(), ctx.token.as_str());

    match command {
        FileCommands::UploadImage { file } => {
            let response = client.upload_image(&file).await?;
            if !response.success {
                anyhow::bail!(
                    "Upload failed: {}",
                    response.error.as_deref().unwrap_or("unknown error")
                );
            }
            let path = response.file_path.context("upload returned no file path")?;
            println!("Uploaded {path}");
            Ok(())
        }

        FileCommands::UploadCsv { file } => {
            let response = client.upload_csv(&file).await?;
            if !response.success {
                anyhow::bail!(
                    "Upload failed: {}",
                    response.error.as_deref().unwrap_or("unknown error")
                );
            }
            let preview = response.data.context("CSV upload returned no preview")?;
            println!("{}", render::csv_preview_table(&preview.items));
            let valid = preview.items.iter().filter(|row| row.valid).count();
            println!(
                "{valid} valid, {} invalid rows. Run 'frostkeep items import' to import.",
                preview.items.len() - valid
            );
            Ok(())
        }

        FileCommands::DeleteImage { path } => {
            let response = client.delete_image(&path).await?;
            if !response.success {
                anyhow::bail!(
                    "Delete failed: {}",
                    response.error.as_deref().unwrap_or("unknown error")
                );
            }
            println!("Deleted {path}");
            Ok(())
        }
    }
}
