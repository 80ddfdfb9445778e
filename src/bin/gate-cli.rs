use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, Subcommand};
use reqwest::header::COOKIE;
use serde_json::Value;
use url::Url;

use pricing_gate::config::{pricing_cookie_secret, PRICING_COOKIE_NAME};
use pricing_gate::pricing::{issue_token, session_cookie};

#[derive(Parser)]
#[command(name = "gate-cli")]
#[command(about = "Management CLI for the pricing gate", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: Url,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check pricing access, optionally presenting a session token
    Status {
        #[arg(short, long)]
        session: Option<String>,
    },
    /// Fetch global content
    Global {
        #[arg(short, long)]
        locale: Option<String>,
    },
    /// Replace global content from a JSON file of attributes
    Sync {
        #[arg(short, long)]
        locale: Option<String>,
        #[arg(short, long)]
        file: PathBuf,
    },
    /// Mint a pricing session cookie (reads PRICING_COOKIE_SECRET)
    MintToken,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Status { session } => {
            let mut req = client.get(cli.url.join("/api/pricing/status")?);
            if let Some(token) = session {
                req = req.header(COOKIE, format!("{PRICING_COOKIE_NAME}={token}"));
            }
            print_response(req.send().await?).await?;
        }
        Commands::Global { locale } => {
            let mut url = cli.url.join("/global")?;
            if let Some(locale) = locale {
                url.query_pairs_mut().append_pair("locale", &locale);
            }
            print_response(client.get(url).send().await?).await?;
        }
        Commands::Sync { locale, file } => {
            let attributes: Value = serde_json::from_str(&std::fs::read_to_string(&file)?)?;
            let body = serde_json::json!({ "locale": locale, "attributes": attributes });
            let res = client
                .post(cli.url.join("/global/sync")?)
                .json(&body)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::MintToken => {
            let secret = pricing_cookie_secret()?;
            let token = issue_token(&secret, Utc::now())?;
            println!("{}", session_cookie(&token));
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gate returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
