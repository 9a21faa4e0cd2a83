mod app;
mod config;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Decode and compare bonding-curve pool configs")]
struct Args {
    /// Path to config file (optional)
    #[arg(long)]
    config: Option<String>,

    /// RPC endpoint URL
    #[arg(long)]
    rpc_url: Option<String>,

    /// Per-call RPC timeout in milliseconds
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Address to bind the HTTP server to
    #[arg(long)]
    host: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(long)]
    port: Option<u16>,

    /// Default first pool address
    #[arg(long)]
    pool1: Option<String>,

    /// Default second pool address
    #[arg(long)]
    pool2: Option<String>,

    /// Print one comparison report and exit instead of serving
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
    let args = Args::parse();

    // Priority: CLI args > Config file > Defaults
    let base_config = match &args.config {
        Some(path) => config::Config::from_file(path)?,
        None => config::Config::default(),
    };

    let app_cfg = app::AppCfg::from_config(base_config).with_overrides(app::CliOverrides {
        rpc_url: args.rpc_url,
        timeout_ms: args.timeout_ms,
        host: args.host,
        port: args.port,
        pool1: args.pool1,
        pool2: args.pool2,
        once: args.once,
    });

    app::run(app_cfg).await
}
