// SPDX-FileCopyrightText: 2025 Caspar Water Company
//
// SPDX-License-Identifier: Apache-2.0

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use cmd::commands::{self, GalleryAction, ImageSource, ServiceAction};
use cmd::common::{Credentials, Site};
use diagnostics::LogLevel;
use inbox::{ContactSubmission, LeadStatus};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "site")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Site configuration file (YAML)
    #[arg(short, long, global = true, env = "SITE_CONFIG")]
    config: Option<PathBuf>,

    /// Log at debug level regardless of SITE_LOG
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(flatten)]
    auth: AuthArgs,
}

#[derive(Args)]
struct AuthArgs {
    /// Admin account email; defaults to the configured admin email
    #[arg(long, global = true, env = "SITE_LOGIN_EMAIL")]
    email: Option<String>,

    /// Admin account password
    #[arg(long, global = true, env = "SITE_ADMIN_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the site content document as JSON
    Show,
    /// List every editable field with its current value
    Fields,
    /// Print one field, e.g. `hero.title` or `services.items.0.title`
    Get { field: String },
    /// Change one text field and commit it
    Set { field: String, value: String },
    /// Add, remove or change services
    Service {
        #[command(subcommand)]
        action: ServiceAction,
    },
    /// Add, remove or change gallery images
    Gallery {
        #[command(subcommand)]
        action: GalleryAction,
    },
    /// Replace an image field by URL or by uploading a local file
    Image {
        /// Image field, e.g. `hero.backgroundImage` or `about.image`
        field: String,
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Manage contact-form leads
    Leads {
        #[command(subcommand)]
        action: LeadsAction,
    },
}

#[derive(Subcommand)]
enum LeadsAction {
    /// List leads, newest first
    List {
        #[arg(long)]
        status: Option<LeadStatus>,
    },
    /// Count leads by status
    Summary,
    /// Move a lead to new, contacted or resolved
    Status { id: String, status: LeadStatus },
    /// Delete a lead
    Delete { id: String },
    /// Record a contact-form submission
    Submit {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        diagnostics::init_with_level(LogLevel::Debug);
    } else {
        diagnostics::init_diagnostics();
    }

    let site = Site::open(cli.config)?;
    let credentials = Credentials {
        email: cli.auth.email,
        password: cli.auth.password,
    };
    let mut out = std::io::stdout().lock();

    match cli.command {
        Commands::Show => commands::show_command(&site, &mut out).await,
        Commands::Fields => commands::fields_command(&site, &mut out).await,
        Commands::Get { field } => commands::get_command(&site, &field, &mut out).await,
        Commands::Set { field, value } => {
            commands::set_command(&site, &credentials, &field, &value, &mut out).await
        }
        Commands::Service { action } => {
            commands::service_command(&site, &credentials, action, &mut out).await
        }
        Commands::Gallery { action } => {
            commands::gallery_command(&site, &credentials, action, &mut out).await
        }
        Commands::Image { field, url, file } => {
            let source = match (url, file) {
                (Some(url), _) => ImageSource::Url(url),
                (None, Some(file)) => ImageSource::File(file),
                (None, None) => anyhow::bail!("Pass --url or --file"),
            };
            commands::image_command(&site, &credentials, &field, source, &mut out).await
        }
        Commands::Leads { action } => match action {
            LeadsAction::List { status } => {
                commands::leads_list_command(&site, &credentials, status, &mut out).await
            }
            LeadsAction::Summary => {
                commands::leads_summary_command(&site, &credentials, &mut out).await
            }
            LeadsAction::Status { id, status } => {
                commands::leads_status_command(&site, &credentials, &id, status, &mut out).await
            }
            LeadsAction::Delete { id } => {
                commands::leads_delete_command(&site, &credentials, &id, &mut out).await
            }
            LeadsAction::Submit {
                name,
                email,
                phone,
                message,
            } => {
                let submission = ContactSubmission {
                    name,
                    email,
                    phone,
                    message,
                };
                commands::leads_submit_command(&site, submission, &mut out).await
            }
        },
    }
}
