// Copyright (c) 2025 - Cowboy AI, Inc.
//! Offering catalog command line
//!
//! - `list-disk-offerings` answers a listing against a JSON seed catalog and
//!   prints the tagged response envelope
//! - `vm-detail` reads and writes VM details in the NATS key-value bucket
//!
//! Configuration: `--config <file>` (JSON [`CatalogConfig`]) overlaid with
//! `CATALOG_*` variables; NATS settings come from `NATS_URL`,
//! `NATS_CLIENT_NAME` and `NATS_DETAIL_BUCKET`.
//!
//! Run with: cargo run --bin offering-catalog -- list-disk-offerings --seed catalog.json --caller 4

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use cim_offering_catalog::api::{self, ListDiskOfferingsRequest};
use cim_offering_catalog::store::{CatalogSeed, NatsVmDetailStore};
use cim_offering_catalog::{CatalogConfig, CatalogServices, DomainId, NatsConfig, VmId, VmMetadataStore};

#[derive(Debug, Parser)]
#[command(name = "offering-catalog", about = "Disk offering visibility and VM metadata")]
struct Cli {
    /// JSON catalog configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List disk offerings visible to a caller domain
    ListDiskOfferings(ListArgs),

    /// Manage VM details stored in NATS
    #[command(subcommand)]
    VmDetail(DetailCommand),
}

#[derive(Debug, Args)]
struct ListArgs {
    /// JSON seed with domains and disk offerings
    #[arg(long, env = "CATALOG_SEED")]
    seed: PathBuf,

    /// Domain the request is made from
    #[arg(long)]
    caller: u64,

    #[arg(long)]
    id: Option<String>,

    #[arg(long = "domain-id")]
    domain_id: Option<String>,

    #[arg(long)]
    name: Option<String>,

    #[arg(long)]
    keyword: Option<String>,

    #[arg(long)]
    page: Option<String>,

    #[arg(long = "page-size")]
    page_size: Option<String>,

    /// id, -id, name, -name or created
    #[arg(long = "sort-by")]
    sort_by: Option<String>,
}

#[derive(Debug, Subcommand)]
enum DetailCommand {
    Set {
        #[arg(long)]
        vm: u64,
        #[arg(long)]
        name: String,
        #[arg(long)]
        value: String,
    },
    Get {
        #[arg(long)]
        vm: u64,
        #[arg(long)]
        name: String,
    },
    List {
        #[arg(long)]
        vm: u64,
    },
    Delete {
        #[arg(long)]
        vm: u64,
        #[arg(long)]
        name: String,
    },
    /// Remove every detail of a destroyed VM
    Purge {
        #[arg(long)]
        vm: u64,
    },
}

fn load_config(path: Option<&PathBuf>) -> Result<CatalogConfig> {
    let config = match path {
        Some(path) => CatalogConfig::from_json_file(path)?.with_env_overrides()?,
        None => CatalogConfig::from_env()?,
    };
    Ok(config)
}

async fn list_disk_offerings(config: CatalogConfig, args: ListArgs) -> Result<()> {
    let seed = CatalogSeed::from_json_file(&args.seed)
        .with_context(|| format!("Failed to load seed {}", args.seed.display()))?;
    let services = CatalogServices::in_memory(seed, config)?;

    let request = ListDiskOfferingsRequest {
        id: args.id,
        domain_id: args.domain_id,
        name: args.name,
        keyword: args.keyword,
        page: args.page,
        page_size: args.page_size,
        sort_by: args.sort_by,
    };

    let response = api::list_disk_offerings(
        services.query.as_ref(),
        &services.config,
        DomainId(args.caller),
        &request,
    )
    .await?;

    println!("{}", serde_json::to_string_pretty(&response.to_json()?)?);
    Ok(())
}

async fn vm_detail(command: DetailCommand) -> Result<()> {
    let nats = NatsConfig::from_env();
    info!("Connecting to NATS at {:?}", nats.servers);
    let backend = NatsVmDetailStore::connect(&nats)
        .await
        .context("Failed to open VM detail bucket")?;
    let metadata = VmMetadataStore::new(Arc::new(backend));

    match command {
        DetailCommand::Set { vm, name, value } => {
            let detail = metadata.set(VmId(vm), &name, &value).await?;
            println!("{}", serde_json::to_string_pretty(&detail)?);
        }
        DetailCommand::Get { vm, name } => {
            println!("{}", metadata.get(VmId(vm), &name).await?);
        }
        DetailCommand::List { vm } => {
            let details = metadata.list_for(VmId(vm)).await?;
            println!("{}", serde_json::to_string_pretty(&details)?);
        }
        DetailCommand::Delete { vm, name } => {
            metadata.delete(VmId(vm), &name).await?;
        }
        DetailCommand::Purge { vm } => {
            let count = metadata.remove_all(VmId(vm)).await?;
            println!("{count}");
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref())?;

    match cli.command {
        Command::ListDiskOfferings(args) => list_disk_offerings(config, args).await,
        Command::VmDetail(command) => vm_detail(command).await,
    }
}
