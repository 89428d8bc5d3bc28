//! launch-dashboard - Launch Records Dashboard
//!
//! Loads the launch records CSV and serves the interactive dashboard.
//!
//! Usage:
//!   launch-dashboard [OPTIONS]

use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;

use launch_dashboard::{
    LaunchDataset, load_config, load_config_file,
    web::{ServerConfig, start_server},
};

/// launch-dashboard - Explore launch outcomes by site and payload
#[derive(Parser, Debug)]
#[command(name = "launch-dashboard")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// CSV file with launch records (default: spacex_launch_dash.csv)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Address to bind (default: 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Port for the web server (default: 8050)
    #[arg(short, long)]
    port: Option<u16>,

    /// Open the dashboard in the default browser
    #[arg(long)]
    open: bool,

    /// Config file path (default: search for .dashboard.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => load_config_file(path)?,
        None => load_config(&std::env::current_dir()?)?,
    };
    if let Some(data) = args.data {
        config.data.path = data;
    }
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let dataset = LaunchDataset::load(&config.data.path)
        .map_err(|e| format!("{}: {}", config.data.path.display(), e))?;
    info!(
        "Loaded {}\n{}",
        config.data.path.display(),
        dataset.summary()
    );

    let server_config = ServerConfig {
        host: config.server.host_addr()?,
        port: config.server.port,
        open_browser: args.open || config.server.open_browser,
        api_endpoint: config.server.api_endpoint.clone(),
    };

    // Run the web server using tokio runtime
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(start_server(dataset, server_config))
        .map_err(|e| -> Box<dyn std::error::Error> { e })?;

    Ok(())
}
