//! # Flowsheet - Curriculum Browser
//!
//! The binary for the Flowsheet slot resolution engine.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                apps/flowsheet (THE BINARY)            │
//! │                                                       │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │    CLI      │   │  HTTP API   │   │   Loader    │  │
//! │  │   (clap)    │   │   (axum)    │   │ (toml/json) │  │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬──────┘  │
//! │         └─────────────────┼─────────────────┘         │
//! │                           ▼                           │
//! │                  ┌────────────────┐                   │
//! │                  │ flowsheet-core │                   │
//! │                  │  (THE LOGIC)   │                   │
//! │                  └────────────────┘                   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! flowsheet programs
//! flowsheet open btech-ce
//! flowsheet choose pe1 R5CO2012T
//! flowsheet show --focus R5CO2002T
//! flowsheet server --port 8080
//! ```

use clap::Parser;
use flowsheet::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // FLOWSHEET_LOG_FORMAT=json switches to machine-parseable output.
    let log_format = std::env::var("FLOWSHEET_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "flowsheet=info,flowsheet_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_banner() {
    println!(
        r#"
  ╔═╗╦  ╔═╗╦ ╦╔═╗╦ ╦╔═╗╔═╗╔╦╗
  ╠╣ ║  ║ ║║║║╚═╗╠═╣║╣ ║╣  ║
  ╚  ╩═╝╚═╝╚╩╝╚═╝╩ ╩╚═╝╚═╝ ╩

  Curriculum Browser v{}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
