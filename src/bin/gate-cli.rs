use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use edge_gate::config::{loader::apply_overrides, validate_config, GateConfig};
use edge_gate::http::{canonical_path, GateRequest};
use edge_gate::lifecycle::startup;
use edge_gate::pipeline::Interceptor;
use edge_gate::session::{Identity, StaticIdentityProvider};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Offline inspection tool for the edge gate", long_about = None)]
struct Cli {
    /// Configuration file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a configuration file and print the effective configuration
    CheckConfig { path: PathBuf },
    /// Print the access category of a path
    Classify { path: String },
    /// Print the locale decision for a path
    Resolve { path: String },
    /// Run the full pipeline for a path without contacting the identity provider
    Explain {
        path: String,
        /// Pretend the request carries a valid session
        #[arg(long)]
        signed_in: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::CheckConfig { path } => {
            let config = startup::resolve_config(Some(&path))?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
        Commands::Classify { path } => {
            let config = offline_config(cli.config)?;
            let interceptor = Interceptor::new(&config, StaticIdentityProvider::anonymous());
            print_json(&interceptor.classifier().classify(&canonical_path(&path)))?;
        }
        Commands::Resolve { path } => {
            let config = offline_config(cli.config)?;
            let interceptor = Interceptor::new(&config, StaticIdentityProvider::anonymous());
            print_json(&interceptor.resolver().resolve(&canonical_path(&path)))?;
        }
        Commands::Explain { path, signed_in } => {
            let config = offline_config(cli.config)?;
            let provider = if signed_in {
                StaticIdentityProvider::signed_in(Identity::new("cli-user"))
            } else {
                StaticIdentityProvider::anonymous()
            };
            let interceptor = Interceptor::new(&config, provider);
            let request = match path.split_once('?') {
                Some((path, query)) => GateRequest::new(path).with_query(query),
                None => GateRequest::new(&path),
            };
            print_json(&interceptor.handle(&request).await)?;
        }
    }

    Ok(())
}

/// Offline commands never call the identity provider, so its endpoint may be absent.
fn offline_config(path: Option<PathBuf>) -> Result<GateConfig, Box<dyn std::error::Error>> {
    let mut config = match path {
        Some(path) => toml::from_str::<GateConfig>(&std::fs::read_to_string(path)?)?,
        None => apply_overrides(GateConfig::default(), |key| std::env::var(key).ok()),
    };
    if config.identity.endpoint.is_empty() {
        config.identity.endpoint = "http://localhost/offline".to_string();
    }
    if let Err(errors) = validate_config(&config) {
        for error in &errors {
            eprintln!("config error: {}", error);
        }
        return Err(format!("{} configuration error(s)", errors.len()).into());
    }
    Ok(config)
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
