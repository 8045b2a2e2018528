use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE, ORIGIN};
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "hop-cli")]
#[command(about = "Drive and inspect a hop relay chain", long_about = None)]
struct Cli {
    /// Entry hop URL (the originator).
    #[arg(short, long, global = true, default_value = "http://localhost:8080/api/hop")]
    url: String,

    /// Per-request timeout in seconds.
    #[arg(long, global = true, default_value_t = 60)]
    timeout_secs: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a seed around the chain and print the summary
    Send {
        /// Seed text
        #[arg(short, long, conflicts_with = "file")]
        text: Option<String>,

        /// Read the seed from a file
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Feed each assistant reply back in as the next seed
        #[arg(short, long, default_value_t = 1)]
        iterations: u32,
    },
    /// Check the CORS preflight contract
    Preflight {
        /// Origin to present
        #[arg(long, default_value = "http://localhost")]
        origin: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(cli.timeout_secs))
        .build()?;

    match cli.command {
        Commands::Send { text, file, iterations } => {
            let mut seed = match (text, file) {
                (Some(text), _) => text,
                (None, Some(path)) => std::fs::read_to_string(path)?,
                (None, None) => "(empty seed)".to_string(),
            };

            for iteration in 1..=iterations.max(1) {
                let summary = send_once(&client, &cli.url, &seed).await?;
                eprintln!("--- iteration {} ---", iteration);
                println!("{}", serde_json::to_string_pretty(&summary)?);

                seed = summary
                    .get("assistant_text")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
            }
        }
        Commands::Preflight { origin } => {
            let res = client
                .request(reqwest::Method::OPTIONS, &cli.url)
                .header(ORIGIN, origin)
                .send()
                .await?;
            println!("status: {}", res.status());
            for (name, value) in res.headers() {
                if name.as_str().starts_with("access-control-") {
                    println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
                }
            }
        }
    }

    Ok(())
}

async fn send_once(
    client: &reqwest::Client,
    url: &str,
    seed: &str,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    headers.insert("x-direction", HeaderValue::from_static("forward"));

    let res = client
        .post(url)
        .headers(headers)
        .body(seed.to_string())
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        let chain = res
            .headers()
            .get("x-hop-chain")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let text = res.text().await.unwrap_or_default();
        return Err(format!("hop returned {} (chain: {}): {}", status, chain, text).into());
    }

    Ok(res.json().await?)
}
