//! Server startup utilities.

use roster_config::AppConfig;
use roster_rest::{DOCS_PATH, OPENAPI_PATH};
use tracing::info;

/// Prints the startup banner.
pub fn print_banner() {
    info!(r"
    ____            __
   / __ \____  _____/ /____  _____
  / /_/ / __ \/ ___/ __/ _ \/ ___/
 / _, _/ /_/ (__  ) /_/  __/ /
/_/ |_|\____/____/\__/\___/_/
    ");
}

/// Base URL the server is reachable at, for log output.
#[must_use]
pub fn base_url(config: &AppConfig) -> String {
    format!("http://{}", config.server.addr())
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let base = base_url(config);
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("REST API:    {}/api/users", base);
    info!("Health:      {}/health", base);
    info!("API Docs:    {}{}", base, DOCS_PATH);
    info!("OpenAPI:     {}{}", base, OPENAPI_PATH);
    info!("{}", separator);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_uses_server_addr() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".to_string();
        config.server.port = 3000;
        assert_eq!(base_url(&config), "http://127.0.0.1:3000");
    }

    #[test]
    fn test_print_startup_info_does_not_panic() {
        let _ = tracing_subscriber::fmt::try_init();
        print_banner();
        print_startup_info(&AppConfig::default());
    }
}
