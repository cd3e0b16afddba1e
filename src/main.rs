use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use stemout_site::{catalog, init_tracing, AppConfig, GeminiGateway, Result, SiteError, SiteServer};

#[tokio::main]
async fn main() -> Result<()> {
    let config_path = env::var("STEMOUT_CONFIG").ok().map(PathBuf::from);
    let cfg = AppConfig::from_env_or_file(config_path.as_deref())?;
    init_tracing(&cfg.logging);

    let gateway = GeminiGateway::from_config(&cfg.model)?;
    tracing::info!(model = %cfg.model.model, "gateway ready");

    let addr: SocketAddr = cfg
        .server
        .bind_address()
        .parse()
        .map_err(|err| SiteError::Config(format!("invalid bind address: {err}")))?;

    SiteServer::new(Arc::new(catalog::stem_out()), Arc::new(gateway))?
        .serve(addr)
        .await
}
