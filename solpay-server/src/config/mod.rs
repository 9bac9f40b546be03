//! Configuration loading for solpay-server.
//!
//! Reads the TOML file, applies CLI overrides, and hashes a plaintext admin
//! secret in place.

pub mod file;

use crate::config::file::FileConfig;
pub use solpay_core::config::{AdminConfig, ServerConfig, SharedConfig, TokensConfig};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("password hashing error: {0}")]
    HashError(String),

    #[error("DATABASE_URL environment variable not set")]
    MissingDatabaseUrl,
}

pub struct LoadedConfig {
    pub server: ServerConfig,
    pub admin: AdminConfig,
    pub tokens: TokensConfig,
}

impl LoadedConfig {
    pub fn into_shared(self) -> SharedConfig {
        SharedConfig {
            server: Arc::new(RwLock::new(self.server)),
            admin: Arc::new(RwLock::new(self.admin)),
            tokens: Arc::new(RwLock::new(self.tokens)),
        }
    }
}

pub struct ConfigLoader {
    config_path: PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Read, override, validate, and hash the admin secret if it is still
    /// plaintext (rewriting the file).
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        validate(&file_config)?;

        let secret_hash = if file_config.is_admin_secret_hashed() {
            file_config.admin.secret.clone()
        } else {
            let hash = hash_secret(&file_config.admin.secret)?;
            file_config.admin.secret = hash.clone();
            self.rewrite_config(&file_config)?;
            tracing::info!("Admin secret hashed and config file updated");
            hash
        };

        Ok(LoadedConfig {
            server: ServerConfig {
                listen: file_config.server.listen,
                public_base_url: file_config.server.public_base_url,
            },
            admin: AdminConfig::new(secret_hash),
            tokens: TokensConfig {
                list_url: file_config.tokens.list_url,
            },
        })
    }

    /// Used on SIGHUP.
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }

    fn rewrite_config(&self, config: &FileConfig) -> Result<(), ConfigError> {
        let toml_string = toml::to_string_pretty(config)?;

        // temp file + rename keeps the rewrite atomic
        let temp_path = self.config_path.with_extension("toml.tmp");
        std::fs::write(&temp_path, toml_string)?;
        std::fs::rename(&temp_path, &self.config_path)?;

        Ok(())
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    if config.admin.secret.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "admin.secret must not be empty".to_string(),
        ));
    }
    if config.server.public_base_url.cannot_be_a_base() {
        return Err(ConfigError::ValidationError(format!(
            "server.public_base_url {} is not a base URL",
            config.server.public_base_url
        )));
    }
    Ok(())
}

fn hash_secret(plaintext: &str) -> Result<String, ConfigError> {
    use argon2::{
        Argon2, PasswordHasher,
        password_hash::{SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ConfigError::HashError(e.to_string()))
}

pub fn get_database_url() -> Result<String, ConfigError> {
    std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_config(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "solpay-config-{name}-{}.toml",
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn plaintext_secret_is_hashed_and_persisted() {
        let path = temp_config(
            "hash",
            r#"
[server]
listen = "127.0.0.1:3000"
public_base_url = "https://pay.example.com"

[admin]
secret = "hunter2"
"#,
        );

        let loaded = ConfigLoader::new(&path, None).load().unwrap();
        assert!(loaded.admin.secret_hash.starts_with("$argon2"));
        assert!(loaded.admin.verify_secret("hunter2"));

        let rewritten: FileConfig =
            toml::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(rewritten.admin.secret, loaded.admin.secret_hash);

        // a second load keeps the existing hash
        let again = ConfigLoader::new(&path, None).reload().unwrap();
        assert_eq!(again.admin.secret_hash, loaded.admin.secret_hash);

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn listen_override_wins() {
        let path = temp_config(
            "listen",
            r#"
[server]
listen = "127.0.0.1:3000"
public_base_url = "https://pay.example.com"

[admin]
secret = "$argon2id$v=19$m=19456,t=2,p=1$abc123"
"#,
        );
        let listen: SocketAddr = "0.0.0.0:9999".parse().unwrap();
        let loaded = ConfigLoader::new(&path, Some(listen)).load().unwrap();
        assert_eq!(loaded.server.listen, listen);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn empty_secret_is_rejected() {
        let path = temp_config(
            "empty",
            r#"
[server]
public_base_url = "https://pay.example.com"

[admin]
secret = "  "
"#,
        );
        let err = ConfigLoader::new(&path, None).load().err().unwrap();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        std::fs::remove_file(&path).unwrap();
    }
}
