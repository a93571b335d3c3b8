//! CEP weather services.
//!
//! One binary, two hops:
//!
//! ```text
//!   client ──POST /cep──▶ gateway (A) ──POST /weather──▶ resolver (B)
//!                          │ strict shape check           │ ViaCEP: CEP → city
//!                          │ traceparent + x-request-id ─▶│ WeatherAPI: city → °C
//!                          ◀── status + body passed through ◀── {city, temp_C, temp_F, temp_K}
//! ```
//!
//! Both hops export spans to the same Zipkin collector, so one request shows
//! up as a single trace spanning the two services.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tokio::net::TcpListener;

use cep_weather::config::{load_config, Hop, ServiceConfig};
use cep_weather::http::HttpServer;
use cep_weather::lifecycle::{trigger_on_signal, Shutdown};
use cep_weather::observability;

#[derive(Parser)]
#[command(name = "cep-weather", version)]
#[command(about = "Postal code to temperature pipeline", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(short, long, env = "CEP_CONFIG", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the entry hop (service A): POST /cep
    Gateway,
    /// Run the resolution hop (service B): /weather
    Resolver,
}

impl Commands {
    fn hop(&self) -> Hop {
        match self {
            Commands::Gateway => Hop::Gateway,
            Commands::Resolver => Hop::Resolver,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: failed to load .env: {e}");
        }
    }

    let cli = Cli::parse();
    let hop = cli.command.hop();
    let config = load_config(cli.config.as_deref(), hop)?;

    // The span exporter owns a blocking HTTP client, so telemetry is set up
    // before the runtime exists and torn down after it is gone.
    let telemetry = observability::init(&config.observability, hop)?;

    tracing::info!(
        hop = %hop,
        version = env!("CARGO_PKG_VERSION"),
        bind_address = %config.listener.bind_address,
        request_timeout_secs = config.timeouts.request_secs,
        "cep-weather starting"
    );

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let result = runtime.block_on(serve(config, hop));
    drop(runtime);

    telemetry.shutdown();
    result?;
    tracing::info!("Shutdown complete");
    Ok(())
}

async fn serve(config: ServiceConfig, hop: Hop) -> Result<(), Box<dyn std::error::Error>> {
    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        observability::metrics::init_metrics(addr)?;
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    trigger_on_signal(&shutdown);

    let server = HttpServer::new(&config, hop)?;
    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
