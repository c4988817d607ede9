use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use taskdeck_cloud::CloudConfig;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration (file plus environment)
    Show,
    /// Print the config file location
    Path,
    /// Validate the effective configuration
    Check,
    /// Write values to the config file
    Set {
        #[arg(long)]
        project_id: Option<String>,
        #[arg(long)]
        public_key: Option<String>,
        #[arg(long)]
        api_url: Option<String>,
        #[arg(long)]
        request_timeout: Option<u64>,
    },
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        "(not set)".dimmed().to_string()
    } else {
        let visible: String = secret.chars().take(4).collect();
        format!("{}…", visible)
    }
}

pub async fn handle_config_command(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let config = CloudConfig::load_default().await?;
            println!("{}", "Taskdeck configuration".blue().bold());
            println!("  Project ID:      {}", mask(&config.project_id));
            println!("  Public key:      {}", mask(&config.public_key));
            println!("  API URL:         {}", config.api_url);
            println!("  Request timeout: {}s", config.request_timeout_secs);
            println!("  Connect timeout: {}s", config.connect_timeout_secs);
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", CloudConfig::config_path().display());
            Ok(())
        }
        ConfigCommands::Check => {
            let config = CloudConfig::load_default().await?;
            config.validate()?;
            println!("{} Configuration is valid", "✓".green());
            Ok(())
        }
        ConfigCommands::Set {
            project_id,
            public_key,
            api_url,
            request_timeout,
        } => {
            let path = CloudConfig::config_path();
            let mut config = CloudConfig::load(&path).await?;
            if let Some(project_id) = project_id {
                config.project_id = project_id;
            }
            if let Some(public_key) = public_key {
                config.public_key = public_key;
            }
            if let Some(api_url) = api_url {
                config.api_url = api_url;
            }
            if let Some(secs) = request_timeout {
                config.request_timeout_secs = secs;
            }
            config
                .save(&path)
                .await
                .with_context(|| format!("Failed to save {}", path.display()))?;
            println!("{} Saved {}", "✓".green(), path.display());
            Ok(())
        }
    }
}
