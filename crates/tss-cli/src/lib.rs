//! Secret Server command-line interface.

pub mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;
use tss_client::Server;
use tss_core::env::vars;
use tss_core::Config;

/// tss - Secret Server client
#[derive(Parser)]
#[command(name = "tss")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Increase logging verbosity
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file
    #[arg(short, long, env = vars::TSS_CONFIG, global = true)]
    pub config: Option<PathBuf>,

    /// Secret Server URL, for on-premises servers
    #[arg(long, env = vars::TSS_SERVER_URL, global = true)]
    pub server_url: Option<String>,

    /// Tenant name, for Secret Server Cloud
    #[arg(long, env = vars::TSS_TENANT, global = true)]
    pub tenant: Option<String>,

    /// Top-level domain of the cloud tenant
    #[arg(long, env = vars::TSS_TLD, global = true)]
    pub tld: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Read, search and write secrets
    Secret(commands::secret::SecretArgs),

    /// Read templates and generate passwords
    Template(commands::template::TemplateArgs),

    /// Show version information
    Version,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "tss=info",
            1 => "tss=debug",
            _ => "tss=trace",
        }
    }

    /// Resolve the configuration: file, then environment, then flags.
    ///
    /// Prompts for the password when a username is set without one.
    pub fn load_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let mut config = Config::load(path)
                    .with_context(|| format!("Failed to load config from {}", path.display()))?;
                config.apply_env();
                config
            }
            None => Config::load_or_env().context("Failed to load config")?,
        };

        // Flags pick the server as a pair; giving both fails validation.
        if self.server_url.is_some() || self.tenant.is_some() {
            config.server_url = self.server_url.clone();
            config.tenant = self.tenant.clone();
        }
        if let Some(tld) = &self.tld {
            config.tld = tld.clone();
        }

        let credentials = &mut config.credentials;
        if credentials.token.is_empty()
            && !credentials.username.is_empty()
            && credentials.password.is_empty()
        {
            let prompt = format!("Password for '{}': ", credentials.username);
            let password = rpassword::prompt_password(prompt)
                .map_err(|e| anyhow::anyhow!("Failed to read password: {}", e))?;
            credentials.password = password.into();
        }

        config.validate()?;
        debug!("using Secret Server at {}", config.base_url());
        Ok(config)
    }

    /// Connect a client using the resolved configuration.
    pub fn server(&self) -> anyhow::Result<Server> {
        Ok(Server::new(self.load_config()?)?)
    }
}

/// Run the CLI with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Secret(args) => commands::secret::run(&cli, args).await,
        Commands::Template(args) => commands::template::run(&cli, args).await,
        Commands::Version => {
            println!("tss {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}
