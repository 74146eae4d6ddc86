use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub alerts: AlertsConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// When unset the API runs on the in-memory store.
    pub url: Option<String>,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub enabled: bool,
    /// HS512 key shared with the token issuer.
    pub jwt_secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AlertsConfig {
    /// Prefix of the `X-<app>-alert` family of headers.
    pub application_name: String,
    /// Emit i18n keys instead of English messages.
    pub translate: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PaginationConfig {
    pub default_size: u32,
    pub max_size: u32,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Self::defaults()?
            .add_source(config::File::with_name("config/default").required(false))
            // Environment specific overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `TUSK__SERVER__PORT=9000` would set `server.port`
            .add_source(config::Environment::with_prefix("TUSK").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.port", 8080)?
            .set_default("database.max_connections", 5)?
            .set_default("auth.enabled", false)?
            .set_default("auth.jwt_secret", "change-me")?
            .set_default("alerts.application_name", "tuskApp")?
            .set_default("alerts.translate", true)?
            .set_default("pagination.default_size", 20)?
            .set_default("pagination.max_size", 2000)
    }
}
