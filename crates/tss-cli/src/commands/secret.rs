//! Secret commands.
//!
//! Provides `tss secret get|search|create|update|delete`.

use super::{parse_key_value, print_json};
use crate::Cli;
use anyhow::Context;
use clap::Args;
use std::path::Path;
use tracing::debug;
use tss_client::{Secret, SecretField, SshKeyArgs};

/// Secret command arguments.
#[derive(Args)]
pub struct SecretArgs {
    #[command(subcommand)]
    pub command: SecretCommand,
}

/// Field values given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Field value as SLUG=VALUE (repeatable)
    #[arg(long = "field", value_name = "SLUG=VALUE", value_parser = parse_key_value)]
    pub fields: Vec<(String, String)>,

    /// File field content read from a path, as SLUG=PATH (repeatable)
    #[arg(long = "file", value_name = "SLUG=PATH", value_parser = parse_key_value)]
    pub files: Vec<(String, String)>,
}

#[derive(clap::Subcommand)]
pub enum SecretCommand {
    /// Print a secret, with file attachments inlined
    Get {
        /// Secret ID
        id: i64,

        /// Print only this field's value (slug or display name)
        #[arg(long)]
        field: Option<String>,
    },

    /// Search secrets and print every match
    Search {
        /// Text to search for
        text: String,

        /// Match this field exactly instead of the name and extended fields
        #[arg(long)]
        field: Option<String>,
    },

    /// Create a secret
    Create {
        /// Secret name
        #[arg(long)]
        name: String,

        /// Secret template ID
        #[arg(long)]
        template: i64,

        /// Folder ID
        #[arg(long)]
        folder: i64,

        /// Site ID
        #[arg(long, default_value_t = 1)]
        site: i64,

        #[command(flatten)]
        values: FieldArgs,

        /// Have the server generate an SSH key pair
        #[arg(long)]
        generate_ssh_keys: bool,

        /// Have the server generate a private key passphrase
        #[arg(long)]
        generate_passphrase: bool,
    },

    /// Change field values of an existing secret
    Update {
        /// Secret ID
        id: i64,

        #[command(flatten)]
        values: FieldArgs,
    },

    /// Delete a secret
    Delete {
        /// Secret ID
        id: i64,
    },
}

impl FieldArgs {
    /// Build secret fields, reading `--file` contents from disk.
    pub fn into_fields(self) -> anyhow::Result<Vec<SecretField>> {
        let mut fields: Vec<_> = self
            .fields
            .into_iter()
            .map(|(slug, value)| SecretField::with_slug(slug, value))
            .collect();

        for (slug, path) in self.files {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read file for field '{}': {}", slug, path))?;
            let filename = Path::new(&path)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            fields.push(SecretField::with_slug(slug, content).filename(filename));
        }

        Ok(fields)
    }
}

/// Drop the file fields of `secret` that are not in `keep`.
///
/// Attachments come back inlined as text, so writing one back unchanged
/// would re-upload it and mangle binary content.
fn retain_named_files(secret: &mut Secret, keep: &[&str]) {
    secret.fields.retain(|field| {
        let retained = !field.is_file || keep.contains(&field.slug.as_str());
        if !retained {
            debug!("leaving the '{}' attachment untouched", field.slug);
        }
        retained
    });
}

/// Overwrite matching fields of `secret` by slug, appending the rest.
fn merge_fields(secret: &mut Secret, updates: Vec<SecretField>) {
    for update in updates {
        match secret.fields.iter_mut().find(|f| f.slug == update.slug) {
            Some(existing) => {
                existing.item_value = update.item_value;
                if !update.filename.is_empty() {
                    existing.filename = update.filename;
                }
            }
            None => secret.fields.push(update),
        }
    }
}

/// Run the secret command.
pub async fn run(cli: &Cli, args: &SecretArgs) -> anyhow::Result<()> {
    let server = cli.server()?;

    match &args.command {
        SecretCommand::Get { id, field } => {
            let secret = server.secret(*id).await?;
            match field {
                Some(name) => match secret.field(name) {
                    Some(value) => println!("{}", value),
                    None => anyhow::bail!("Field '{}' not found on secret {}", name, id),
                },
                None => print_json(&secret)?,
            }
        }

        SecretCommand::Search { text, field } => {
            let secrets = server.secrets(text, field.as_deref()).await?;
            print_json(&secrets)?;
        }

        SecretCommand::Create {
            name,
            template,
            folder,
            site,
            values,
            generate_ssh_keys,
            generate_passphrase,
        } => {
            let ssh_key_args = (*generate_ssh_keys || *generate_passphrase).then_some(SshKeyArgs {
                generate_passphrase: *generate_passphrase,
                generate_ssh_keys: *generate_ssh_keys,
            });
            let secret = Secret {
                name: name.clone(),
                secret_template_id: *template,
                folder_id: *folder,
                site_id: *site,
                fields: values.clone().into_fields()?,
                ssh_key_args,
                ..Default::default()
            };

            let created = server.create_secret(secret).await?;
            print_json(&created)?;
        }

        SecretCommand::Update { id, values } => {
            let mut secret = server.secret(*id).await?;
            let named: Vec<&str> = values.files.iter().map(|(slug, _)| slug.as_str()).collect();
            retain_named_files(&mut secret, &named);
            merge_fields(&mut secret, values.clone().into_fields()?);

            let updated = server.update_secret(secret).await?;
            print_json(&updated)?;
        }

        SecretCommand::Delete { id } => {
            server.delete_secret(*id).await?;
            println!("Secret {} deleted.", id);
        }
    }

    Ok(())
}
