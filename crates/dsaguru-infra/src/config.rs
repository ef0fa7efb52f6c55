//! Configuration loading for DSA Guru.
//!
//! Reads `config.toml` from the data directory (`~/.dsaguru/` in production)
//! and deserializes it into [`GuruConfig`]. Falls back to defaults when the
//! file is missing or malformed. Also resolves the data directory, the
//! database URL, and the LLM API key.

use std::path::{Path, PathBuf};

use secrecy::SecretString;

use dsaguru_types::config::GuruConfig;

/// Environment variable that overrides the data directory.
pub const DATA_DIR_ENV: &str = "DSAGURU_DATA_DIR";

/// Database file name inside the data directory.
pub const DATABASE_FILE: &str = "dsaguru.db";

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`GuruConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
pub async fn load_guru_config(data_dir: &Path) -> GuruConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return GuruConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return GuruConfig::default();
        }
    };

    match toml::from_str::<GuruConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            GuruConfig::default()
        }
    }
}

/// Resolve the data directory.
///
/// Priority: `DSAGURU_DATA_DIR`, then `~/.dsaguru`, then `./.dsaguru`.
pub fn resolve_data_dir() -> PathBuf {
    data_dir_from(std::env::var(DATA_DIR_ENV).ok(), dirs::home_dir())
}

fn data_dir_from(env_override: Option<String>, home: Option<PathBuf>) -> PathBuf {
    match env_override.filter(|v| !v.trim().is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => home
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dsaguru"),
    }
}

/// SQLite URL for the quota database inside `data_dir`.
pub fn database_url(data_dir: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_dir.join(DATABASE_FILE).display())
}

/// Read the LLM API key from the environment variable named in config.
///
/// Returns `None` when the variable is unset or blank.
pub fn read_api_key(env_name: &str) -> Option<SecretString> {
    std::env::var(env_name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_guru_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_guru_config(tmp.path()).await;
        assert_eq!(config.quota.max_daily_queries, 5);
        assert_eq!(config.llm.model, "gemini-1.5-flash");
    }

    #[tokio::test]
    async fn load_guru_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[quota]
max_daily_queries = 3

[llm]
model = "gemini-2.0-flash"
timeout_secs = 15
"#,
        )
        .await
        .unwrap();

        let config = load_guru_config(tmp.path()).await;
        assert_eq!(config.quota.max_daily_queries, 3);
        assert_eq!(config.llm.model, "gemini-2.0-flash");
        assert_eq!(config.llm.timeout_secs, 15);
    }

    #[tokio::test]
    async fn load_guru_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_guru_config(tmp.path()).await;
        assert_eq!(config.quota.max_daily_queries, 5);
    }

    #[test]
    fn data_dir_prefers_env_override() {
        let dir = data_dir_from(Some("/srv/guru".to_string()), Some(PathBuf::from("/home/a")));
        assert_eq!(dir, PathBuf::from("/srv/guru"));
    }

    #[test]
    fn data_dir_falls_back_to_home_then_cwd() {
        let dir = data_dir_from(Some("  ".to_string()), Some(PathBuf::from("/home/a")));
        assert_eq!(dir, PathBuf::from("/home/a/.dsaguru"));

        let dir = data_dir_from(None, None);
        assert_eq!(dir, PathBuf::from("./.dsaguru"));
    }

    #[test]
    fn database_url_points_into_data_dir() {
        let url = database_url(Path::new("/tmp/guru"));
        assert_eq!(url, "sqlite:///tmp/guru/dsaguru.db?mode=rwc");
    }

    #[test]
    fn read_api_key_missing_var_is_none() {
        assert!(read_api_key("DSAGURU_TEST_KEY_THAT_IS_NEVER_SET").is_none());
    }
}
