// src/app.rs
use anyhow::Result;
use std::sync::Arc;
use tracing::{error, info};

use poolscope::application::PoolComparisonService;
use poolscope::infrastructure::blockchain::RpcAccountFetcher;
use poolscope::report::ComparisonReport;
use poolscope::shared::errors::AppError;
use poolscope::shared::utils::validate_pool_address;
use poolscope::webserver::{self, AppState};

use crate::config::Config;

#[derive(Debug, Clone, PartialEq)]
pub struct AppCfg {
    pub rpc_url: Option<String>,
    pub timeout_ms: u64,
    pub host: String,
    pub port: u16,
    pub pool1: String,
    pub pool2: String,
    pub once: bool,
}

/// Command-line values that take priority over the config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub rpc_url: Option<String>,
    pub timeout_ms: Option<u64>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub pool1: Option<String>,
    pub pool2: Option<String>,
    pub once: bool,
}

impl AppCfg {
    pub fn from_config(cfg: Config) -> Self {
        Self {
            rpc_url: cfg.rpc.url.filter(|url| !url.trim().is_empty()),
            timeout_ms: cfg.rpc.timeout_ms,
            host: cfg.server.host,
            port: cfg.server.port,
            pool1: cfg.pools.pool1,
            pool2: cfg.pools.pool2,
            once: false,
        }
    }

    pub fn with_overrides(mut self, cli: CliOverrides) -> Self {
        if let Some(rpc_url) = cli.rpc_url.filter(|url| !url.trim().is_empty()) {
            self.rpc_url = Some(rpc_url);
        }
        if let Some(timeout_ms) = cli.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(host) = cli.host {
            self.host = host;
        }
        if let Some(port) = cli.port {
            self.port = port;
        }
        if let Some(pool1) = cli.pool1 {
            self.pool1 = pool1;
        }
        if let Some(pool2) = cli.pool2 {
            self.pool2 = pool2;
        }
        self.once = cli.once;
        self
    }

    /// Validated pool addresses in canonical base58 form
    pub fn pool_pair(&self) -> Result<(String, String), AppError> {
        let canonical = |index: usize, pool: &str| {
            validate_pool_address(pool)
                .map(|pubkey| pubkey.to_string())
                .map_err(|e| {
                    error!("Pool {} address is invalid: {}", index, e);
                    e
                })
        };
        Ok((canonical(1, self.pool1.as_str())?, canonical(2, self.pool2.as_str())?))
    }

    /// Build the comparison service, or `None` when no RPC URL is set
    fn comparison_service(&self) -> Result<Option<PoolComparisonService>> {
        let Some(url) = &self.rpc_url else {
            return Ok(None);
        };
        let fetcher = RpcAccountFetcher::new(url.clone(), self.timeout_ms)?;
        Ok(Some(PoolComparisonService::new(Arc::new(fetcher))))
    }
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    info!("Starting poolscope");
    info!("Configuration: {:?}", app_cfg);

    let service = app_cfg.comparison_service()?;

    if app_cfg.once {
        return run_once(service, &app_cfg).await;
    }

    let state = AppState::new(service, app_cfg.pool1.clone(), app_cfg.pool2.clone());
    webserver::start_server(state, &app_cfg.host, app_cfg.port).await?;
    Ok(())
}

/// Compare the configured pools once and print the report
async fn run_once(service: Option<PoolComparisonService>, app_cfg: &AppCfg) -> Result<()> {
    let service = service.ok_or_else(|| {
        AppError::ConfigError("--once needs an RPC endpoint (--rpc-url or [rpc] url)".to_string())
    })?;

    let report = compare_once(&service, app_cfg).await?;
    println!("{}", report.to_json()?);
    Ok(())
}

async fn compare_once(service: &PoolComparisonService, app_cfg: &AppCfg) -> Result<ComparisonReport> {
    let (pool1, pool2) = app_cfg.pool_pair()?;
    Ok(service.compare(&pool1, &pool2).await?)
}
