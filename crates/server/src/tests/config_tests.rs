use super::{normalize_database_url, prepare_database_url, settings_from, Settings};

use std::{fs, path::Path};

fn env(vars: &[(&str, &str)]) -> config::Map<String, String> {
    vars.iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/test.db"),
        "sqlite://./data/test.db"
    );
}

#[test]
fn keeps_memory_and_foreign_urls() {
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
    assert_eq!(
        normalize_database_url("postgres://localhost/items"),
        "postgres://localhost/items"
    );
}

#[test]
fn empty_url_falls_back_to_default() {
    assert_eq!(
        normalize_database_url("   "),
        Settings::default().database_url
    );
}

#[test]
fn keeps_windows_absolute_path_with_single_sqlite_colon() {
    assert_eq!(
        normalize_database_url("sqlite:C:\\Users\\alice\\test.db"),
        "sqlite:C:/Users/alice/test.db"
    );
}

#[test]
fn normalizes_windows_plain_path_with_single_sqlite_colon() {
    assert_eq!(
        normalize_database_url("C:\\Users\\alice\\test.db"),
        "sqlite:C:/Users/alice/test.db"
    );
}

#[test]
fn converts_sqlite_double_slash_windows_path() {
    assert_eq!(
        normalize_database_url("sqlite://C:/Users/alice/test.db"),
        "sqlite:C:/Users/alice/test.db"
    );
}

#[test]
fn creates_parent_dir_for_sqlite_url() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("data").join("test.db");

    prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare db url");
    assert!(temp_root.path().join("data").exists());
}

#[tokio::test]
async fn prepared_database_url_creates_openable_sqlite_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let db_path = temp_root.path().join("nested").join("server.db");

    let prepared = prepare_database_url(db_path.to_string_lossy().as_ref()).expect("prepare");
    let storage = storage::Storage::new(&prepared).await.expect("open sqlite");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should be created: {}",
        db_path.display()
    );
}

#[test]
fn defaults_apply_without_file_or_env() {
    let settings =
        settings_from(Path::new("/nonexistent/server.toml"), env(&[])).expect("settings");
    assert_eq!(settings.server_bind, "127.0.0.1:3001");
    assert!(settings.seed_defaults);
    assert_eq!(settings.cors_allowed_origins, ["http://localhost:3000"]);
    assert_eq!(settings.max_body_bytes, 16 * 1024);
}

#[test]
fn file_values_override_defaults_and_env_overrides_file() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let file = temp_root.path().join("server.toml");
    fs::write(
        &file,
        "server_bind = \"0.0.0.0:8080\"\nseed_defaults = false\ndatabase_url = \"./file.db\"\n",
    )
    .expect("write settings");

    let settings = settings_from(
        &file,
        env(&[
            ("APP__DATABASE_URL", "./env.db"),
            (
                "APP__CORS_ALLOWED_ORIGINS",
                "http://localhost:3000,http://127.0.0.1:5173",
            ),
            ("APP__MAX_BODY_BYTES", "2048"),
        ]),
    )
    .expect("settings");

    assert_eq!(settings.server_bind, "0.0.0.0:8080");
    assert!(!settings.seed_defaults);
    assert_eq!(settings.database_url, "./env.db");
    assert_eq!(
        settings.cors_allowed_origins,
        ["http://localhost:3000", "http://127.0.0.1:5173"]
    );
    assert_eq!(settings.max_body_bytes, 2048);
}

#[test]
fn legacy_env_names_apply_unless_prefixed_name_is_set() {
    let settings = settings_from(
        Path::new("/nonexistent/server.toml"),
        env(&[("SERVER_BIND", "127.0.0.1:9000"), ("DATABASE_URL", "./legacy.db")]),
    )
    .expect("settings");
    assert_eq!(settings.server_bind, "127.0.0.1:9000");
    assert_eq!(settings.database_url, "./legacy.db");

    let settings = settings_from(
        Path::new("/nonexistent/server.toml"),
        env(&[
            ("SERVER_BIND", "127.0.0.1:9000"),
            ("APP__SERVER_BIND", "127.0.0.1:9100"),
        ]),
    )
    .expect("settings");
    assert_eq!(settings.server_bind, "127.0.0.1:9100");
}
