use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub swagger_enabled: bool,
    pub app_name: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite://db.sqlite".into(),
            host: "127.0.0.1".into(),
            port: 5000,
            swagger_enabled: true,
            app_name: "Roster".into(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v
                .parse::<u16>()
                .with_context(|| format!("APP_PORT must be a port number, got {v:?}"))?,
            Err(_) => defaults.port,
        };
        let swagger_enabled = match std::env::var("SWAGGER_ENABLED") {
            Ok(v) => parse_flag(&v)
                .with_context(|| format!("SWAGGER_ENABLED must be a boolean, got {v:?}"))?,
            Err(_) => defaults.swagger_enabled,
        };

        Ok(Self {
            database_url: std::env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            host: std::env::var("APP_HOST").unwrap_or(defaults.host),
            port,
            swagger_enabled,
            app_name: std::env::var("APP_NAME").unwrap_or(defaults.app_name),
        })
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flag_accepts_common_spellings() {
        assert_eq!(parse_flag("true"), Some(true));
        assert_eq!(parse_flag(" ON "), Some(true));
        assert_eq!(parse_flag("0"), Some(false));
        assert_eq!(parse_flag("No"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }

    #[test]
    fn defaults_match_development_setup() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.port, 5000);
        assert!(cfg.swagger_enabled);
        assert!(cfg.database_url.starts_with("sqlite:"));
    }
}
