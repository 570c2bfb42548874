pub mod commands;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;

#[derive(Parser)]
#[command(name = "payment-api")]
#[command(about = "Payment API - customers, payment methods, payments and categories behind JWT auth")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Bind address, overrides HOST")]
        host: Option<String>,
        #[arg(long, help = "Listen port, overrides PAYMENT_API_PORT / PORT")]
        port: Option<u16>,
    },

    #[command(about = "Apply the bundled schema to DATABASE_URL and exit")]
    Migrate,
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => commands::serve::handle(config, host, port).await,
        Commands::Migrate => commands::migrate::handle(config).await,
    }
}
