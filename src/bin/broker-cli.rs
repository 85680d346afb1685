use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue};
use serde_json::{json, Value};
use url::Url;

use route_service_broker::catalog::derive_id;
use route_service_broker::http::middleware::X_BROKER_API_VERSION;

#[derive(Parser)]
#[command(name = "broker-cli")]
#[command(about = "Management CLI for the Route Service Broker", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: Url,

    #[arg(long, default_value = "brokeruser")]
    username: String,

    #[arg(long, default_value = "password")]
    password: String,

    #[arg(long, default_value = "2.14")]
    api_version: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the catalog served by the broker
    Catalog,
    /// Bind a plan and print the resolved route service url
    Bind {
        #[arg(long)]
        service_id: String,
        #[arg(long)]
        plan_id: String,
        #[arg(long, default_value = "cli-instance")]
        instance_id: String,
        #[arg(long, default_value = "cli-binding")]
        binding_id: String,
    },
    /// Print the id derived for a service or plan name (offline)
    Id { name: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut headers = HeaderMap::new();
    headers.insert(X_BROKER_API_VERSION, HeaderValue::from_str(&cli.api_version)?);
    let client = reqwest::Client::builder().default_headers(headers).build()?;

    match cli.command {
        Commands::Catalog => {
            let res = client
                .get(cli.url.join("v2/catalog")?)
                .basic_auth(&cli.username, Some(&cli.password))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Bind {
            service_id,
            plan_id,
            instance_id,
            binding_id,
        } => {
            let path = format!("v2/service_instances/{instance_id}/service_bindings/{binding_id}");
            let res = client
                .put(cli.url.join(&path)?)
                .basic_auth(&cli.username, Some(&cli.password))
                .json(&json!({ "service_id": service_id, "plan_id": plan_id }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Id { name } => {
            println!("{}", derive_id(&name));
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: broker returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
