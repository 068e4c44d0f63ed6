mod config;
mod dates;
mod http;
mod mailer;
mod models;
mod report;
mod service;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::service::{ReportError, WipReport, WipService};
use crate::store::AirtableStore;

#[derive(Parser)]
#[command(name = "dot-wip", about = "Work-in-progress email reports for clients")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Port to listen on, overriding PORT
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render a client's report to stdout or a file
    Render {
        client_code: String,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Render a client's report and email it
    Send {
        client_code: String,
        /// Recipient address
        #[arg(long)]
        to: String,
        #[arg(long)]
        subject: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Set up logging, RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    // Load configuration
    let config = config::init()?;

    // Build the record store and the report service on top of it
    let store = AirtableStore::new(&config)?;
    let service = Arc::new(WipService::new(&config, Arc::new(store)));

    // Run the requested command, serving HTTP when none is given
    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => serve(&config, service, port).await,
        Command::Render {
            client_code,
            output,
        } => {
            let report = report_for(&service, &client_code).await?;
            match output {
                Some(path) => {
                    std::fs::write(&path, &report.html)?;
                    println!("Report written to {}", path.display());
                }
                None => println!("{}", report.html),
            }
            Ok(())
        }
        Command::Send {
            client_code,
            to,
            subject,
        } => {
            // Check SMTP settings before doing any fetching
            let settings = mailer::MailSettings::from_config(&config)?;
            let report = report_for(&service, &client_code).await?;
            let subject = subject.unwrap_or_else(|| mailer::default_subject(&report));

            let message = mailer::build_message(&settings, &to, &subject, &report)?;
            mailer::send(&settings, message).await?;

            tracing::info!(client_code = %report.client_code, to = %to, "report emailed");
            Ok(())
        }
    }
}

async fn serve(config: &Config, service: Arc<WipService>, port: Option<u16>) -> Result<()> {
    if config.airtable_api_key.is_none() {
        tracing::warn!("AIRTABLE_API_KEY is not set; every report will come back empty");
    }

    // Bind to all interfaces, as the hosting platform expects
    let app = http::router(service);
    let addr = format!("0.0.0.0:{}", port.unwrap_or(config.port));
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(addr = %listener.local_addr()?, service = http::SERVICE_NAME, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn report_for(service: &WipService, client_code: &str) -> Result<WipReport> {
    match service.build_report(client_code).await {
        Ok(report) => Ok(report),
        Err(ReportError::NotFound { client_code }) => {
            bail!("No active projects found for client code {client_code}")
        }
        Err(ReportError::Internal(err)) => Err(err),
    }
}
