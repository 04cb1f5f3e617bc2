mod commands;

use clap::{Parser, Subcommand};
use landingzone::{DefinitionVersion, ResourcePurpose, SubnetResourcePurpose};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "lz")]
#[command(about = "Deterministic, tag-driven landing zones", long_about = None)]
struct Cli {
    /// Path to landingzone.kdl
    #[arg(long, global = true, env = "LZ_CONFIG_PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available landing zone factories
    Factories,
    /// Show the resources a deployment would create
    Plan {
        #[command(flatten)]
        target: Target,
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Deploy a landing zone
    Deploy {
        #[command(flatten)]
        target: Target,
    },
    /// Show deployed resources, reconstructed from their tags
    Show {
        /// Only resources of this landing zone
        #[arg(long)]
        id: Option<String>,
        /// Only resources with this purpose (e.g. SHARED_RESOURCE)
        #[arg(long, value_parser = parse_purpose, conflicts_with = "subnet_purpose")]
        purpose: Option<ResourcePurpose>,
        /// Virtual networks with a subnet of this purpose (e.g. WORKSPACE_COMPUTE_SUBNET)
        #[arg(long, value_parser = parse_subnet_purpose)]
        subnet_purpose: Option<SubnetResourcePurpose>,
    },
    /// Show version information
    Version,
}

/// Landing zone, factory and version to work on
#[derive(clap::Args)]
struct Target {
    /// Landing zone id
    #[arg(long)]
    id: String,
    /// Factory identifier (see `lz factories`)
    #[arg(long)]
    factory: String,
    /// Factory version
    #[arg(long, default_value = "v1")]
    version: String,
}

impl Target {
    fn version(&self) -> DefinitionVersion {
        DefinitionVersion::new(self.version.as_str())
    }
}

fn normalize(value: &str) -> String {
    value.trim().replace('-', "_").to_uppercase()
}

fn parse_purpose(value: &str) -> Result<ResourcePurpose, String> {
    normalize(value).parse()
}

fn parse_subnet_purpose(value: &str) -> Result<SubnetResourcePurpose, String> {
    normalize(value).parse()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries command output, logs go to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match cli.command {
        Commands::Version => {
            println!("landingzone {}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Factories => {
            commands::factories::handle();
        }
        Commands::Plan { target, json } => {
            let context = commands::Context::load(cli.config.as_deref())?;
            commands::plan::handle(&context, &target.id, &target.factory, &target.version(), json)?;
        }
        Commands::Deploy { target } => {
            let context = commands::Context::load(cli.config.as_deref())?;
            commands::deploy::handle(&context, &target.id, &target.factory, &target.version())
                .await?;
        }
        Commands::Show {
            id,
            purpose,
            subnet_purpose,
        } => {
            let context = commands::Context::load(cli.config.as_deref())?;
            commands::show::handle(&context, id.as_deref(), purpose, subnet_purpose).await?;
        }
    }

    Ok(())
}
