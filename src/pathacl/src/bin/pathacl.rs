//! # pathacl CLI
//!
//! Loads an ACL document and answers questions about it.
//!
//! ## Commands
//!
//! - `check --roles a,b [--only] PATH...` - prints `allow` or `deny`, exits 1 on deny
//! - `explain --roles a,b PATH` - per-polarity matches and the deciding rung
//! - `tree ROLE` - compiled polarity trees of a role as JSON
//! - `grants` - the `grants.all.*` / `grants.main.*` paths the document implies
//! - `grant-values --roles a,b --values-json '{...}' GRANT` - values a principal may act on
//!
//! ## Configuration
//!
//! Environment variables:
//! - `PATHACL_CONFIG` - ACL document path (TOML for `.toml`, JSON otherwise)
//! - `RUST_LOG` - Log filter (default: warn)

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use pathacl::{AclDocument, Authorizer, Check, EngineConfig, Principal};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::debug;

/// Hierarchical dotted-path access control
#[derive(Parser)]
#[command(name = "pathacl")]
#[command(about = "Evaluate dotted-path permissions against an ACL document")]
#[command(version)]
struct Cli {
    /// Path to the ACL document
    #[arg(short, long, env = "PATHACL_CONFIG")]
    config: PathBuf,

    /// Default role (overrides the document)
    #[arg(long)]
    default_role: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Check one or more paths
    Check {
        /// Roles held by the principal
        #[arg(short, long, value_delimiter = ',')]
        roles: Vec<String>,

        /// Require every path instead of any
        #[arg(long)]
        only: bool,

        /// Dotted permission paths
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Show how a single path is decided
    Explain {
        #[arg(short, long, value_delimiter = ',')]
        roles: Vec<String>,

        path: String,
    },

    /// Print a role's compiled trees
    Tree { role: String },

    /// List synthesized grant permission paths
    Grants,

    /// Print the values a principal may act on for a grant
    GrantValues {
        #[arg(short, long, value_delimiter = ',')]
        roles: Vec<String>,

        /// Principal grants as a JSON object of grant name to value list
        #[arg(long)]
        values_json: Option<String>,

        grant: String,
    },
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut document = AclDocument::from_path(&cli.config)
        .with_context(|| format!("Failed to load ACL document {:?}", cli.config))?;
    if let Some(default_role) = cli.default_role {
        document.default_role = Some(default_role);
    }
    debug!("Loaded ACL document from {:?}", cli.config);

    let authorizer = Authorizer::from_document(EngineConfig::default(), &document);

    match cli.command {
        Command::Check { roles, only, paths } => {
            let check = if only { Check::only(paths) } else { Check::any(paths) };
            let allowed = authorizer
                .has_access(check, &Principal::new(roles), false)
                .context("Access check failed")?;

            println!("{}", if allowed { "allow" } else { "deny" });
            return Ok(if allowed { ExitCode::SUCCESS } else { ExitCode::FAILURE });
        }
        Command::Explain { roles, path } => {
            let decision = authorizer
                .explain(&path, &Principal::new(roles))
                .context("Access check failed")?;
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
        Command::Tree { role } => {
            let snapshot = authorizer.snapshot();
            let Some(resolved) = snapshot.role_permissions(&role) else {
                bail!("Role '{}' is not defined", role);
            };
            println!("{}", serde_json::to_string_pretty(resolved)?);
        }
        Command::Grants => {
            for path in authorizer.snapshot().grant_permission_paths() {
                println!("{}", path);
            }
        }
        Command::GrantValues { roles, values_json, grant } => {
            let mut principal = Principal::new(roles);
            if let Some(raw) = values_json {
                let grants: HashMap<String, Vec<serde_json::Value>> =
                    serde_json::from_str(&raw).context("Invalid --values-json")?;
                principal.grants = Some(grants);
            }

            let values = authorizer
                .grant_values(grant.as_str(), &principal, false, None)
                .context("Grant lookup failed")?;
            println!("{}", serde_json::to_string(&values)?);
        }
    }

    Ok(ExitCode::SUCCESS)
}
