// Configuration module entry point
// Loads file/environment configuration and derives per-request settings

mod types;

use crate::http::Zone;
use std::net::SocketAddr;

// Re-export public types
pub use types::{Config, LoggingConfig, ServeSettings};

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Default config file is "config.toml" when no path specified
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.root_dir", ".")?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("http.server_name", "MyWebServer")?
            .set_default("http.time_zone", "EST")?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Resolve the settings used while handling each request
    pub fn serve_settings(&self) -> Result<ServeSettings, String> {
        let zone = Zone::from_label(&self.http.time_zone)
            .ok_or_else(|| format!("Unknown time zone: {}", self.http.time_zone))?;

        Ok(ServeSettings {
            root_dir: self.server.root_dir.clone(),
            server_name: self.http.server_name.clone(),
            zone,
        })
    }
}
