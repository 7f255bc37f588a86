//! Template commands.

use super::print_json;
use crate::Cli;
use clap::Args;

/// Template command arguments.
#[derive(Args)]
pub struct TemplateArgs {
    #[command(subcommand)]
    pub command: TemplateCommand,
}

#[derive(clap::Subcommand)]
pub enum TemplateCommand {
    /// Print a secret template and its field definitions
    Get {
        /// Template ID
        id: i64,
    },

    /// Generate a password that meets a template field's requirements
    Password {
        /// Template ID
        template: i64,

        /// Field slug, e.g. `password`
        slug: String,
    },
}

/// Run the template command.
pub async fn run(cli: &Cli, args: &TemplateArgs) -> anyhow::Result<()> {
    let server = cli.server()?;

    match &args.command {
        TemplateCommand::Get { id } => {
            let template = server.secret_template(*id).await?;
            print_json(&template)?;
        }

        TemplateCommand::Password { template, slug } => {
            let template = server.secret_template(*template).await?;
            let password = server.generate_password(slug, &template).await?;
            println!("{}", password);
        }
    }

    Ok(())
}
