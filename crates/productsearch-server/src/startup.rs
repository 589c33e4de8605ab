//! Server startup utilities.

use productsearch_config::AppConfig;
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    ____                 __           __     _____                      __
   / __ \_________  ____/ /_  _______/ /_   / ___/___  ____ ___________/ /_
  / /_/ / ___/ __ \/ __  / / / / ___/ __/   \__ \/ _ \/ __ `/ ___/ ___/ __ \
 / ____/ /  / /_/ / /_/ / /_/ / /__/ /_    ___/ /  __/ /_/ / /  / /__/ / / /
/_/   /_/   \____/\__,_/\__,_/\___/\__/   /____/\___/\__,_/_/   \___/_/ /_/
    "#
    );
}

/// Prints where the server can be reached.
pub fn print_startup_info(config: &AppConfig) {
    let base = format!("http://{}", config.server.rest_addr());
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Stage:     {}", config.app.stage);
    info!("REST API:  {}/productSearch", base);
    info!("Health:    {}/health", base);
    info!("API Docs:  {}/swagger-ui", base);
    info!("{}", separator);
}
