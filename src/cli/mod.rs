//! CLI module for ScanWitch
//!
//! Provides subcommands for running the server in different modes:
//! - `serve`: web page + JSON API (default)
//! - `api`: JSON API only

pub mod api;
pub mod serve;

use clap::{Args, Parser, Subcommand};

/// ScanWitch - scam text and malicious URL detection
#[derive(Parser)]
#[command(name = "scanwitch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the web page and JSON API together (default mode)
    Serve(ServeArgs),

    /// Run the JSON API only
    Api(ServeArgs),
}

/// Listen address overrides for either mode
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Host to bind, overrides `server.host`
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind, overrides `server.port`
    #[arg(long, short)]
    pub port: Option<u16>,
}
