use config::{Config, ConfigError, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct Settings {
    pub database: DatabaseSettings,
    pub server: ServerSettings,
}

#[derive(Deserialize)]
pub struct DatabaseSettings {
    // may carry credentials once the store is not a local file
    pub url: SecretString,
    pub max_connections: u32,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Settings {
    /// Reads `trivia.toml` (optional) and then `TRIVIA__*` environment
    /// variables, e.g. `TRIVIA__SERVER__PORT=3000`. A `.env` file is honored.
    pub fn load() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::builder()?
            .add_source(File::with_name("trivia").required(false))
            .add_source(Environment::with_prefix("TRIVIA").separator("__"))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("database.url", "sqlite:trivia.db?mode=rwc")?
            .set_default("database.max_connections", 5)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn defaults_describe_a_local_sqlite_file() {
        let settings: Settings = Settings::builder()
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.database.url.expose_secret(), "sqlite:trivia.db?mode=rwc");
        assert_eq!(settings.database.max_connections, 5);
        assert_eq!(settings.server.address(), "0.0.0.0:8080");
    }
}
