use serde::Deserialize;
use std::path::PathBuf;

/// Default per-file upload limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Directory uploaded documents are streamed into.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: u64,
    pub rate_limit_per_minute: u32,
    /// Serve sample payloads for empty listings and a missing company.
    pub demo_fallbacks: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DB_URL")
                .or_else(|_| std::env::var("DATABASE_URL"))
                .map_err(|_| {
                    anyhow::anyhow!("DB_URL or DATABASE_URL environment variable required")
                })
                .and_then(|url| {
                    if url.trim().is_empty() {
                        anyhow::bail!("DB_URL cannot be empty");
                    }
                    if !url.starts_with("postgresql://") && !url.starts_with("postgres://") {
                        anyhow::bail!("DB_URL must start with postgresql:// or postgres://");
                    }
                    Ok(url)
                })?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            upload_dir: std::env::var("UPLOAD_DIR")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("uploads")),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .map(|raw| {
                    raw.trim()
                        .parse::<u64>()
                        .map_err(|_| anyhow::anyhow!("MAX_UPLOAD_BYTES must be a positive integer"))
                        .and_then(|bytes| {
                            if bytes == 0 {
                                anyhow::bail!("MAX_UPLOAD_BYTES must be greater than zero");
                            }
                            Ok(bytes)
                        })
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            rate_limit_per_minute: std::env::var("RATE_LIMIT_PER_MINUTE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("RATE_LIMIT_PER_MINUTE must be a positive integer"))
                .and_then(|limit: u32| {
                    if limit == 0 {
                        anyhow::bail!("RATE_LIMIT_PER_MINUTE must be greater than zero");
                    }
                    Ok(limit)
                })?,
            demo_fallbacks: std::env::var("DEMO_FALLBACKS")
                .ok()
                .map(|v| parse_flag(&v))
                .transpose()?
                .unwrap_or(false),
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!(
            "Database URL: {}...",
            &config.database_url[..20.min(config.database_url.len())]
        );
        tracing::debug!("Upload dir: {}", config.upload_dir.display());
        tracing::debug!("Max upload bytes: {}", config.max_upload_bytes);
        tracing::debug!("Rate limit: {} req/min", config.rate_limit_per_minute);
        if config.demo_fallbacks {
            tracing::info!("Demo fallbacks enabled: empty listings return sample data");
        }
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn parse_flag(raw: &str) -> anyhow::Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("DEMO_FALLBACKS must be a boolean, got '{}'", other),
    }
}
