use anyhow::Result;
use clap::Parser;
use env_logger::Env;
use log::info;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use wifi_conf::{
    config::Settings,
    format::FormatKind,
    server::{self, ServerConfig},
    store::ProfileStore,
};

#[derive(Parser)]
#[command(name = "wifi-conf")]
#[command(about = "Serve a web form for editing the WiFi profiles in a directory")]
#[command(version)]
struct Cli {
    /// Directory holding one file per profile
    dir: PathBuf,

    /// Profile file syntax (overrides the config file)
    #[arg(short, long, value_enum)]
    format: Option<FormatKind>,

    /// Port to listen on (overrides the config file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Address to bind to (overrides the config file)
    #[arg(short, long)]
    bind: Option<String>,

    /// Settings file (defaults to <config dir>/wifi-conf/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(format) = cli.format {
        settings.format = format;
    }
    if let Some(port) = cli.port {
        settings.port = port;
    }
    if let Some(bind) = cli.bind {
        settings.bind = bind;
    }

    info!("Serving profiles from {}", cli.dir.display());
    let store = ProfileStore::open(cli.dir, settings.format.build());

    let config = ServerConfig {
        bind: settings.bind,
        port: settings.port,
    };
    server::run_server(config, Arc::new(Mutex::new(store))).await
}
