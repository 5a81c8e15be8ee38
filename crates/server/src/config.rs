use std::path::Path;

use anyhow::Context;
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server_bind: String,
    pub database_url: String,
    /// Seed the default items when the collection is empty.
    pub seed_defaults: bool,
    pub cors_allowed_origins: Vec<String>,
    pub cors_permissive: bool,
    pub max_body_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:3001".into(),
            database_url: "sqlite://./data/items.db".into(),
            seed_defaults: true,
            cors_allowed_origins: vec!["http://localhost:3000".into()],
            cors_permissive: false,
            max_body_bytes: 16 * 1024,
        }
    }
}

/// Defaults, then `server.toml` in the working directory, then `APP__*`
/// environment variables.
pub fn load_settings() -> anyhow::Result<Settings> {
    settings_from(Path::new(SETTINGS_FILE), std::env::vars().collect())
}

pub(crate) fn settings_from(
    file: &Path,
    env: config::Map<String, String>,
) -> anyhow::Result<Settings> {
    let defaults = Settings::default();
    let max_body_bytes = i64::try_from(defaults.max_body_bytes)?;

    let mut settings: Settings = Config::builder()
        .set_default("server_bind", defaults.server_bind)?
        .set_default("database_url", defaults.database_url)?
        .set_default("seed_defaults", defaults.seed_defaults)?
        .set_default("cors_allowed_origins", defaults.cors_allowed_origins)?
        .set_default("cors_permissive", defaults.cors_permissive)?
        .set_default("max_body_bytes", max_body_bytes)?
        .add_source(File::from(file).format(FileFormat::Toml).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("cors_allowed_origins")
                .source(Some(env.clone())),
        )
        .build()
        .with_context(|| format!("failed to read settings from '{}'", file.display()))?
        .try_deserialize()
        .context("invalid server settings")?;

    if !env.contains_key("APP__SERVER_BIND") {
        if let Some(v) = env.get("SERVER_BIND") {
            settings.server_bind = v.clone();
        }
    }
    if !env.contains_key("APP__DATABASE_URL") {
        if let Some(v) = env.get("DATABASE_URL") {
            settings.database_url = v.clone();
        }
    }

    Ok(settings)
}

pub fn prepare_database_url(raw_database_url: &str) -> anyhow::Result<String> {
    let database_url = normalize_database_url(raw_database_url);
    storage::ensure_sqlite_parent_dir_exists(&database_url)?;
    Ok(database_url)
}

fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.starts_with("sqlite::memory:") {
        return raw_database_url.to_string();
    }

    let path = if let Some(path) = raw_database_url.strip_prefix("sqlite://") {
        path
    } else if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        path
    } else if raw_database_url.contains("://") {
        return raw_database_url.to_string();
    } else {
        raw_database_url
    };

    let path = path.replace('\\', "/");
    if is_windows_drive_path(&path) {
        format!("sqlite:{path}")
    } else {
        format!("sqlite://{path}")
    }
}

fn is_windows_drive_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
