use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use sigwall::config::ServiceConfig;
use sigwall::dispatch::http::HttpInvoker;
use sigwall::dispatch::{Dispatcher, QuantumInvoker};
use sigwall::engine::LocalEngine;
use sigwall::error::{Result, SigwallError};
use sigwall::model::KeyGenerationRequest;
use sigwall::quantum::devices::{self, DeviceFilter, DeviceKind};
use sigwall::server::{self, AppState};

#[derive(Parser)]
#[command(name = "sigwall")]
#[command(about = "Quantum-seeded lattice key and signature service")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    remote: RemoteArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RemoteArgs {
    /// Remote quantum service endpoint; omit to always compute locally
    #[arg(long, env = "SIGWALL_REMOTE_URL", global = true)]
    remote_url: Option<String>,

    /// Bearer token for the remote endpoint
    #[arg(long, env = "SIGWALL_REMOTE_API_KEY", global = true, hide_env_values = true)]
    remote_api_key: Option<String>,

    /// Hard timeout for one remote attempt, in seconds
    #[arg(long, env = "SIGWALL_REMOTE_TIMEOUT_SECS", default_value_t = 60, global = true)]
    remote_timeout_secs: u64,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve {
        /// Address to listen on
        #[arg(long, env = "SIGWALL_BIND", default_value = "0.0.0.0:8080")]
        bind: String,
    },
    /// Generate one key pair and signature, printing the result as JSON
    Generate {
        #[arg(long, default_value = devices::DEFAULT_DEVICE)]
        device: String,
        #[arg(long, default_value = "")]
        sentiment: String,
        #[arg(long, default_value = "")]
        timeframe: String,
        #[arg(long, default_value = "anonymous")]
        session_id: String,
        #[arg(long)]
        use_real_device: bool,
    },
    /// Print the device catalog as JSON
    Devices {
        /// Only devices of this type (simulator, managed_simulator, qpu)
        #[arg(long = "type")]
        kind: Option<DeviceKind>,
        /// Only devices reachable from this region (local devices always match)
        #[arg(long)]
        region: Option<String>,
        /// Only devices that can prepare Bell states
        #[arg(long)]
        bell_states: bool,
    },
}

fn build_dispatcher(config: &ServiceConfig) -> Dispatcher {
    let invoker = config
        .remote
        .clone()
        .map(|remote| Arc::new(HttpInvoker::new(remote)) as Arc<dyn QuantumInvoker>);
    Dispatcher::new(LocalEngine::default(), invoker, config.remote_timeout)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| SigwallError::Serialization(e.to_string()))?;
    println!("{text}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let bind = match &cli.command {
        Commands::Serve { bind } => bind.clone(),
        _ => ServiceConfig::default().bind_addr,
    };
    let config = ServiceConfig::from_parts(
        bind,
        cli.remote.remote_url,
        cli.remote.remote_api_key,
        cli.remote.remote_timeout_secs,
    )?;

    match cli.command {
        Commands::Serve { .. } => {
            tracing::info!(
                remote = config.remote.is_some(),
                timeout_secs = config.remote_timeout.as_secs(),
                "Starting sigwall"
            );
            let state = AppState {
                dispatcher: build_dispatcher(&config),
            };
            server::serve(state, &config.bind_addr).await
        }
        Commands::Generate {
            device,
            sentiment,
            timeframe,
            session_id,
            use_real_device,
        } => {
            let request = KeyGenerationRequest {
                device,
                sentiment,
                timeframe,
                session_id,
                use_real_device,
            };
            let result = build_dispatcher(&config).generate(&request).await?;
            print_json(&result)
        }
        Commands::Devices {
            kind,
            region,
            bell_states,
        } => print_json(&devices::filter(&DeviceFilter {
            kind,
            region,
            bell_states,
        })),
    }
}
