use std::sync::Arc;

use keeper_core::{catalog::port::CatalogPort, config::Config};
use keeper_plex::PlexCatalog;

#[tokio::main]
async fn main() -> Result<(), keeper_core::Error> {
    keeper_core::logging::init("keeper");

    let cfg = Arc::new(Config::load()?);

    let catalog: Arc<dyn CatalogPort> = Arc::new(PlexCatalog::new(
        cfg.plex_base_url.clone(),
        cfg.plex_token.clone(),
        cfg.plex_request_timeout,
    ));

    keeper_telegram::router::run_polling(cfg, catalog)
        .await
        .map_err(|e| keeper_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
