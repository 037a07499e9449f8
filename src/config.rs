use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub listen: String,
    pub database_path: String,
    pub media_dir: String,
    /// Prefix for the public URL of every stored blob.
    pub fs_base_url: String,
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub max_upload_size: usize,
    pub db_connect_attempts: u32,
    pub db_connect_backoff_secs: u64,
    pub hash_memory_kib: u32,
    pub hash_iterations: u32,
    pub hash_parallelism: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: "0.0.0.0:8080".to_string(),
            database_path: "./medialocker.sqlite3".to_string(),
            media_dir: "./media".to_string(),
            fs_base_url: "http://localhost:8080/files".to_string(),
            jwt_secret: None,
            token_ttl_hours: 24,
            max_upload_size: 10 * 1024 * 1024,
            db_connect_attempts: 10,
            db_connect_backoff_secs: 2,
            hash_memory_kib: argon2::Params::DEFAULT_M_COST,
            hash_iterations: argon2::Params::DEFAULT_T_COST,
            hash_parallelism: argon2::Params::DEFAULT_P_COST,
        }
    }
}

impl Config {
    /// Reads `path`, or writes the defaults there when it does not exist yet.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str(&contents).with_context(|| format!("failed to parse {}", path.display()))
        } else {
            let default_config = Config::default();
            let toml_string = toml::to_string_pretty(&default_config)
                .context("failed to serialize default config")?;
            std::fs::write(path, toml_string)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(default_config)
        }
    }

    /// File config, then environment overrides, then a generated secret if none was given.
    pub fn from_env_config(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let mut final_cfg = Self::load(path)?;
        final_cfg.apply_env(|key| std::env::var(key).ok());

        if final_cfg.jwt_secret.is_none() {
            log::warn!("JWT_SECRET not set, generating an ephemeral signing secret");
            final_cfg.jwt_secret = Some(format!(
                "{}{}",
                uuid::Uuid::new_v4().simple(),
                uuid::Uuid::new_v4().simple()
            ));
        }
        std::fs::create_dir_all(&final_cfg.media_dir)
            .with_context(|| format!("failed to create {}", final_cfg.media_dir))?;
        Ok(final_cfg)
    }

    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("LISTEN") {
            self.listen = v;
        }
        if let Some(v) = var("DATABASE_PATH") {
            self.database_path = v;
        }
        if let Some(v) = var("MEDIA_DIR") {
            self.media_dir = v;
        }
        if let Some(v) = var("FS_BASE_URL") {
            self.fs_base_url = v;
        }
        if let Some(v) = var("JWT_SECRET").filter(|s| !s.is_empty()) {
            self.jwt_secret = Some(v);
        }
    }

    pub fn signing_secret(&self) -> anyhow::Result<&[u8]> {
        self.jwt_secret
            .as_deref()
            .map(str::as_bytes)
            .context("jwt_secret must be set")
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }

    pub fn db_connect_backoff(&self) -> Duration {
        Duration::from_secs(self.db_connect_backoff_secs)
    }
}
