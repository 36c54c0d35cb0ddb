//! HAProxy Dataplane CLI
//!
//! Applies manifests and individual changes to a running HAProxy through its
//! Dataplane API. Structural changes (ACLs, frontends) go through versioned
//! transactions; runtime map entries are written directly.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI / manifest
//!        │
//!        ▼
//!   ┌───────────┐    ┌──────────────┐    ┌──────────────┐
//!   │ reconcile │───▶│  resources   │───▶│ orchestrator │
//!   └───────────┘    │ acl/frontend │    │ runner+guard │
//!                    │  map_entry   │    └──────┬───────┘
//!                    └──────┬───────┘           │
//!                           │ (maps direct)     ▼
//!                           │            ┌──────────────┐    ┌───────────┐
//!                           └───────────▶│   gateway    │───▶│ transport │───▶ Dataplane API
//!                                        └──────────────┘    └───────────┘
//! ```
//!
//! Output is JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use haproxy_dataplane::config::{load_config, load_from_env};
use haproxy_dataplane::manifest::load_manifest;
use haproxy_dataplane::models::{Acl, AclParent, Frontend, MapEntry, ParentType, ProxyMode};
use haproxy_dataplane::observability::logging;
use haproxy_dataplane::resources::{acl, frontend, map_entry};
use haproxy_dataplane::{DataplaneClient, Reconciler, RetryPolicy, TransactionRunner};

#[derive(Parser)]
#[command(name = "haproxy-dataplane")]
#[command(about = "Manage HAProxy through the Dataplane API", long_about = None)]
struct Cli {
    /// TOML config file. Without it, the HAPROXY_* environment variables are used.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check connectivity and print the configuration version
    Check,
    /// Converge HAProxy towards a manifest
    Apply {
        #[arg(short, long)]
        manifest: PathBuf,
    },
    /// ACL operations
    #[command(subcommand)]
    Acl(AclCommand),
    /// Frontend operations
    #[command(subcommand)]
    Frontend(FrontendCommand),
    /// Runtime map entry operations
    #[command(subcommand)]
    Map(MapCommand),
}

#[derive(clap::Args)]
struct ParentArgs {
    #[arg(long)]
    parent_name: String,
    #[arg(long, default_value = "frontend")]
    parent_type: ParentType,
}

impl ParentArgs {
    fn parent(&self) -> AclParent {
        AclParent::new(self.parent_name.clone(), self.parent_type)
    }
}

#[derive(Subcommand)]
enum AclCommand {
    List {
        #[command(flatten)]
        parent: ParentArgs,
    },
    Create {
        #[command(flatten)]
        parent: ParentArgs,
        #[arg(long)]
        name: String,
        #[arg(long)]
        criterion: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        index: Option<i64>,
    },
    Delete {
        #[command(flatten)]
        parent: ParentArgs,
        #[arg(long)]
        name: String,
        #[arg(long)]
        index: Option<i64>,
    },
}

#[derive(clap::Args)]
struct FrontendArgs {
    name: String,
    #[arg(long)]
    mode: Option<ProxyMode>,
    #[arg(long)]
    maxconn: Option<i64>,
    #[arg(long)]
    default_backend: Option<String>,
}

impl FrontendArgs {
    /// Overlay the flags that were given onto `base`.
    fn apply(self, base: Frontend) -> Frontend {
        Frontend {
            mode: self.mode.or(base.mode),
            maxconn: self.maxconn.or(base.maxconn),
            default_backend: self.default_backend.or(base.default_backend),
            ..base
        }
    }
}

#[derive(Subcommand)]
enum FrontendCommand {
    Get { name: String },
    List,
    Create(FrontendArgs),
    /// Change the given fields and keep the rest as they are on the server
    Update(FrontendArgs),
    Delete { name: String },
}

#[derive(Subcommand)]
enum MapCommand {
    Get {
        #[arg(long)]
        map: String,
        #[arg(long)]
        key: String,
    },
    List {
        #[arg(long)]
        map: String,
    },
    /// Create the entry, or update it when the key exists
    Set {
        #[arg(long)]
        map: String,
        #[arg(long)]
        key: String,
        #[arg(long, default_value = "defaultValue")]
        value: String,
        /// Skip writing the map file to disk
        #[arg(long)]
        no_force_sync: bool,
    },
    Delete {
        #[arg(long)]
        map: String,
        #[arg(long)]
        key: String,
        #[arg(long)]
        no_force_sync: bool,
    },
    /// Read an entry by id (`map/<map>/entry/<key>`)
    Import { id: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => load_from_env()?,
    };
    logging::init(&config.observability)?;

    tracing::info!(
        server = %config.server.address,
        request_timeout_secs = config.timeouts.request_secs,
        max_attempts = config.retries.max_attempts,
        "Configuration loaded"
    );

    let client = DataplaneClient::from_config(&config)?;
    let runner = TransactionRunner::new(&client, RetryPolicy::from(&config.retries));

    match cli.command {
        Commands::Check => {
            client.ping().await?;
            let version = client.configuration().version().await?;
            print_json(&json!({
                "server": client.base_url().as_str(),
                "version": version,
            }))?;
        }
        Commands::Apply { manifest } => {
            let manifest = load_manifest(&manifest)?;
            let report = Reconciler::new(runner).apply(&manifest).await?;
            print_json(&report)?;
        }
        Commands::Acl(command) => run_acl(&client, &runner, command).await?,
        Commands::Frontend(command) => run_frontend(&client, &runner, command).await?,
        Commands::Map(command) => run_map(&client, command).await?,
    }

    Ok(())
}

async fn run_acl(
    client: &DataplaneClient,
    runner: &TransactionRunner<'_>,
    command: AclCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        AclCommand::List { parent } => {
            print_json(&acl::list(client, &parent.parent()).await?)?;
        }
        AclCommand::Create {
            parent,
            name,
            criterion,
            value,
            index,
        } => {
            let rule = Acl {
                index,
                ..Acl::new(name, criterion, value)
            };
            print_json(&acl::create(runner, &parent.parent(), &rule).await?)?;
        }
        AclCommand::Delete { parent, name, index } => {
            let rule = Acl {
                index,
                ..Acl::new(name, "", "")
            };
            print_json(&acl::delete(runner, &parent.parent(), &rule).await?)?;
        }
    }
    Ok(())
}

async fn run_frontend(
    client: &DataplaneClient,
    runner: &TransactionRunner<'_>,
    command: FrontendCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        FrontendCommand::Get { name } => print_json(&frontend::read(client, &name).await?)?,
        FrontendCommand::List => print_json(&frontend::list(client).await?)?,
        FrontendCommand::Create(args) => {
            let desired = Frontend::new(args.name.clone());
            print_json(&frontend::create(runner, &args.apply(desired)).await?)?;
        }
        FrontendCommand::Update(args) => {
            let Some(current) = frontend::read(client, &args.name).await? else {
                return Err(format!("frontend {} not found", args.name).into());
            };
            print_json(&frontend::update(runner, &args.apply(current)).await?)?;
        }
        FrontendCommand::Delete { name } => print_json(&frontend::delete(runner, &name).await?)?,
    }
    Ok(())
}

async fn run_map(client: &DataplaneClient, command: MapCommand) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        MapCommand::Get { map, key } => print_json(&map_entry::read(client, &map, &key).await?)?,
        MapCommand::List { map } => print_json(&map_entry::list(client, &map).await?)?,
        MapCommand::Set {
            map,
            key,
            value,
            no_force_sync,
        } => {
            let entry = MapEntry::new(key, value);
            let stored = match map_entry::read(client, &map, &entry.key).await? {
                Some(_) => map_entry::update(client, &map, &entry, !no_force_sync).await?,
                None => map_entry::create(client, &map, &entry, !no_force_sync).await?,
            };
            print_json(&stored)?;
        }
        MapCommand::Delete {
            map,
            key,
            no_force_sync,
        } => {
            map_entry::delete(client, &map, &key, !no_force_sync).await?;
            print_json(&json!({ "map": map, "key": key, "deleted": true }))?;
        }
        MapCommand::Import { id } => {
            let (id, entry) = map_entry::import(client, &id).await?;
            print_json(&json!({ "id": id.to_string(), "entry": entry }))?;
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
