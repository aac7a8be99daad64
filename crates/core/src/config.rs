//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum request body size in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
    /// Enable the /metrics endpoint for Prometheus scraping (default: true).
    /// SECURITY: When enabled, ensure this endpoint is network-restricted
    /// to authorized Prometheus scraper IPs only at the infrastructure level.
    #[serde(default = "default_metrics_enabled")]
    pub metrics_enabled: bool,
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_body_bytes() -> usize {
    crate::DEFAULT_MAX_BODY_BYTES
}

fn default_metrics_enabled() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
            metrics_enabled: default_metrics_enabled(),
        }
    }
}

/// Upload configuration: where signed uploads land and how they are exposed.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Base URL under which uploaded objects are publicly reachable
    /// (e.g., "https://cdn.myamen.app"). Required.
    pub public_base_url: String,
    /// Lifetime of signed PUT URLs in seconds.
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,
}

fn default_signed_url_ttl_secs() -> u64 {
    crate::DEFAULT_SIGNED_URL_TTL_SECS
}

impl UploadConfig {
    /// Deterministic public URL for a key: configured base + "/" + key.
    /// Independent of store state.
    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base_url.trim_end_matches('/'), key)
    }

    /// Signed URL lifetime as a Duration.
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }
}

/// Proxy configuration for the passthrough endpoints.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Upstream base URL for card background images. Required.
    pub card_background_base: String,
}

impl ProxyConfig {
    /// Upstream URL for a validated card background file name.
    pub fn card_background_url(&self, file: &str) -> String {
        format!("{}/{}", self.card_background_base.trim_end_matches('/'), file)
    }
}

/// Storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage (development and tests).
    Filesystem {
        /// Root directory for storage.
        path: PathBuf,
    },
    /// S3-compatible storage.
    S3 {
        /// Bucket name.
        bucket: String,
        /// Optional endpoint URL (for MinIO, Supabase storage, etc.).
        endpoint: Option<String>,
        /// AWS region.
        region: Option<String>,
        /// Optional key prefix.
        prefix: Option<String>,
        /// Access key ID. Falls back to the ambient AWS credential chain if not set.
        /// WARNING: Prefer env vars or IAM roles over storing secrets in config files.
        access_key_id: Option<String>,
        /// Secret access key. Falls back to the ambient AWS credential chain if not set.
        secret_access_key: Option<String>,
        /// Force path-style URLs (`endpoint/bucket/key`). Required for MinIO
        /// and most S3-compatible services; AWS S3 wants virtual-hosted style.
        #[serde(default)]
        force_path_style: bool,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/storage"),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StorageConfig::S3 {
                bucket,
                access_key_id,
                secret_access_key,
                ..
            } => {
                if bucket.is_empty() {
                    return Err("s3 config requires a non-empty bucket".to_string());
                }
                match (access_key_id.as_ref(), secret_access_key.as_ref()) {
                    (Some(_), Some(_)) | (None, None) => Ok(()),
                    _ => Err(
                        "s3 config requires both access_key_id and secret_access_key when either is set"
                            .to_string(),
                    ),
                }
            }
            _ => Ok(()),
        }
    }
}

/// PostgreSQL SSL mode configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PgSslMode {
    /// Disable SSL/TLS entirely.
    Disable,
    /// Prefer SSL/TLS but allow unencrypted connections (default).
    #[default]
    Prefer,
    /// Require SSL/TLS for all connections.
    Require,
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database (tests and single-node deployments).
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// PostgreSQL database (production; the managed Supabase backend speaks this).
    Postgres {
        /// Connection URL (optional if using individual fields).
        /// Takes precedence over individual fields if both are provided.
        url: Option<String>,
        /// Database host.
        host: Option<String>,
        /// Database port (default: 5432).
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        /// WARNING: Prefer the AMEN_METADATA__PASSWORD env var over storing in config.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// SSL mode for connections.
        ssl_mode: Option<PgSslMode>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
    },
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

fn default_max_connections() -> u32 {
    10
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/metadata.db"),
        }
    }
}

impl MetadataConfig {
    /// Validate metadata configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            MetadataConfig::Sqlite { .. } => Ok(()),
            MetadataConfig::Postgres {
                url,
                host,
                database,
                ..
            } => match (url.as_ref(), host.as_ref(), database.as_ref()) {
                (Some(_), _, _) => Ok(()),
                (None, Some(_), Some(_)) => Ok(()),
                (None, None, _) => Err(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ),
                (None, Some(_), None) => Err(
                    "postgres config requires 'database' when using individual fields".to_string(),
                ),
            },
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Upload configuration (required).
    pub upload: UploadConfig,
    /// Proxy configuration (required).
    pub proxy: ProxyConfig,
}

impl AppConfig {
    /// Validate the whole configuration before any handler runs.
    ///
    /// Missing required configuration is a startup failure, not a per-request
    /// 500. Returns the first problem found.
    pub fn validate(&self) -> Result<(), String> {
        self.storage.validate()?;
        self.metadata.validate()?;

        if self.upload.public_base_url.is_empty() {
            return Err("upload.public_base_url must not be empty".to_string());
        }
        if !has_http_scheme(&self.upload.public_base_url) {
            return Err(format!(
                "upload.public_base_url must be an http(s) URL: {}",
                self.upload.public_base_url
            ));
        }
        if self.upload.signed_url_ttl_secs == 0 {
            return Err("upload.signed_url_ttl_secs must be greater than zero".to_string());
        }

        if !has_http_scheme(&self.proxy.card_background_base) {
            return Err(format!(
                "proxy.card_background_base must be an http(s) URL: {}",
                self.proxy.card_background_base
            ));
        }

        if self.server.max_body_bytes == 0 {
            return Err("server.max_body_bytes must be greater than zero".to_string());
        }

        Ok(())
    }

    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses filesystem storage and SQLite metadata.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            metadata: MetadataConfig::default(),
            upload: UploadConfig {
                public_base_url: "https://cdn.test.invalid".to_string(),
                signed_url_ttl_secs: default_signed_url_ttl_secs(),
            },
            proxy: ProxyConfig {
                card_background_base: "https://cards.test.invalid".to_string(),
            },
        }
    }
}

fn has_http_scheme(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_url_joins_without_double_slash() {
        let upload = UploadConfig {
            public_base_url: "https://cdn.example.com/".to_string(),
            signed_url_ttl_secs: 3600,
        };
        assert_eq!(
            upload.public_url("audio/1.mp3"),
            "https://cdn.example.com/audio/1.mp3"
        );
    }

    #[test]
    fn for_testing_config_validates() {
        AppConfig::for_testing().validate().unwrap();
    }

    #[test]
    fn validate_rejects_empty_public_base() {
        let mut config = AppConfig::for_testing();
        config.upload.public_base_url = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_non_http_bases() {
        let mut config = AppConfig::for_testing();
        config.upload.public_base_url = "ftp://cdn".to_string();
        assert!(config.validate().is_err());

        let mut config = AppConfig::for_testing();
        config.proxy.card_background_base = "cards.example.com".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_ttl() {
        let mut config = AppConfig::for_testing();
        config.upload.signed_url_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn storage_config_s3_validate_partial_credentials() {
        let invalid = StorageConfig::S3 {
            bucket: "bucket".to_string(),
            endpoint: None,
            region: None,
            prefix: None,
            access_key_id: Some("access-key".to_string()),
            secret_access_key: None,
            force_path_style: false,
        };
        assert!(invalid.validate().is_err());

        let valid = StorageConfig::S3 {
            bucket: "bucket".to_string(),
            endpoint: None,
            region: None,
            prefix: None,
            access_key_id: Some("access-key".to_string()),
            secret_access_key: Some("secret-key".to_string()),
            force_path_style: false,
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn metadata_config_postgres_requires_url_or_host() {
        let invalid = MetadataConfig::Postgres {
            url: None,
            host: None,
            port: default_pg_port(),
            username: None,
            password: None,
            database: None,
            ssl_mode: None,
            max_connections: 10,
        };
        assert!(invalid.validate().is_err());

        let valid = MetadataConfig::Postgres {
            url: Some("postgres://localhost/amen".to_string()),
            host: None,
            port: default_pg_port(),
            username: None,
            password: None,
            database: None,
            ssl_mode: None,
            max_connections: 10,
        };
        assert!(valid.validate().is_ok());
    }

    #[test]
    fn storage_config_s3_force_path_style_defaults_to_false() {
        let json = r#"{"type":"s3","bucket":"test","endpoint":"https://s3.amazonaws.com"}"#;
        let config: StorageConfig = serde_json::from_str(json).unwrap();

        match config {
            StorageConfig::S3 {
                force_path_style, ..
            } => assert!(!force_path_style),
            _ => panic!("expected S3 config"),
        }
    }
}
