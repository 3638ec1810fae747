//! Config management. Local only; no backend or session involved.

use anyhow::Result;
use frostkeep_core::config::{Config, paths};

use crate::cli::ConfigCommands;

pub fn run(command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            println!("{}", paths::config_path().display());
            Ok(())
        }

        ConfigCommands::Init => {
            let path = paths::config_path();
            Config::init(&path)?;
            println!("Created config at {}", path.display());
            Ok(())
        }

        ConfigCommands::SetUrl { url } => {
            Config::save_base_url(url)?;
            println!("Backend base URL set to {url}");
            Ok(())
        }
    }
}
