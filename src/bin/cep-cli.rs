use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::Url;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "cep-cli")]
#[command(about = "Query client for the CEP weather services", long_about = None)]
struct Cli {
    /// Gateway (service A) base URL
    #[arg(short, long, env = "CEP_GATEWAY_URL", default_value = "http://localhost:8080")]
    url: String,

    /// Resolver (service B) base URL
    #[arg(short, long, env = "CEP_RESOLVER_URL", default_value = "http://localhost:8081")]
    resolver_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a postal code through the gateway (POST /cep)
    Lookup { cep: String },
    /// Query the resolver directly (GET /weather/{cep})
    Weather { cep: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let request_id = uuid::Uuid::new_v4().to_string();
    let mut headers = HeaderMap::new();
    headers.insert("x-request-id", HeaderValue::from_str(&request_id)?);
    eprintln!("x-request-id: {request_id}");

    match cli.command {
        Commands::Lookup { cep } => {
            let res = client
                .post(endpoint(&cli.url, &["cep"])?)
                .headers(headers)
                .json(&json!({ "cep": cep }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Weather { cep } => {
            let res = client
                .get(endpoint(&cli.resolver_url, &["weather", &cep])?)
                .headers(headers)
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

/// Append `segments` to the path of `base`, percent-encoding each one so
/// that `/` or `?` inside a segment stays part of it.
fn endpoint(base: &str, segments: &[&str]) -> Result<Url, Box<dyn std::error::Error>> {
    let mut url = Url::parse(base)?;
    url.path_segments_mut()
        .map_err(|_| format!("{base} cannot carry a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: service returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
