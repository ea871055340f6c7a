use config::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;

const ENV_PREFIX: &str = "PLAZA_";

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub security: SecuritySettings,
    pub limits: LimitSettings,
}

#[derive(Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub cors_origins: String,
}

#[derive(Deserialize, Clone)]
pub struct DatabaseSettings {
    pub url: String,
}

#[derive(Deserialize, Clone)]
pub struct SecuritySettings {
    // HMAC key for the cooldown tokens handed back after each write
    pub token_secret: String,
    pub admin_token: String,
}

#[derive(Deserialize, Clone)]
pub struct LimitSettings {
    pub post_cooldown_seconds: i64,
    pub comment_cooldown_seconds: i64,
    pub max_links: usize,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::load("config")
    }

    /// Defaults, then `{base}.toml`, `{base}.{RUN_MODE}.toml` and `PLAZA_` env vars.
    pub fn load(base: &str) -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        let env_map = collect_env_vars();

        let s = config::Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .set_default("server.cors_origins", "*")?
            .set_default("database.url", "sqlite://data/plaza.db")?
            .set_default("security.token_secret", "dev")?
            .set_default("security.admin_token", "change-me")?
            .set_default("limits.post_cooldown_seconds", 60)?
            .set_default("limits.comment_cooldown_seconds", 30)?
            .set_default("limits.max_links", 5)?
            .add_source(config::File::with_name(base).required(false))
            .add_source(config::File::with_name(&format!("{}.{}", base, run_mode)).required(false))
            .add_source(config::File::from_str(
                &serde_json::to_string(&env_map)
                    .expect("Environment variables should serialize to JSON"),
                config::FileFormat::Json,
            ))
            .build()?;

        s.try_deserialize()
    }
}

/// `PLAZA_LIMITS__MAX_LINKS=3` becomes `limits.max_links = "3"`.
fn collect_env_vars() -> HashMap<String, String> {
    std::env::vars()
        .filter(|(k, _)| k.starts_with(ENV_PREFIX))
        .map(|(k, v)| {
            let new_key = k
                .trim_start_matches(ENV_PREFIX)
                .replace("__", ".")
                .to_lowercase();
            (new_key, v)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::fs;

    #[test]
    fn missing_files_fall_back_to_defaults() {
        let settings = Settings::load("/nonexistent/plaza-config").unwrap();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.limits.post_cooldown_seconds, 60);
        assert_eq!(settings.limits.comment_cooldown_seconds, 30);
        assert_eq!(settings.limits.max_links, 5);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let base = std::env::temp_dir().join(format!("plaza-config-{}", std::process::id()));
        let path = base.with_extension("toml");
        fs::write(
            &path,
            "[database]\nurl = \"sqlite://elsewhere/board.db\"\n\n[limits]\nmax_links = 2\n",
        )
        .unwrap();

        let settings = Settings::load(base.to_str().unwrap());
        fs::remove_file(&path).unwrap();

        let settings = settings.unwrap();
        assert_eq!(settings.database.url, "sqlite://elsewhere/board.db");
        assert_eq!(settings.limits.max_links, 2);
        assert_eq!(settings.server.port, 8080);
    }
}
