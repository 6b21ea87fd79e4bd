//! Configuration module for json-echo.
//!
//! Loads configuration from built-in defaults, YAML/TOML/JSON files,
//! environment variables and command-line flags.

use std::path::PathBuf;

use clap::Parser;
use config::{Config as ConfigLoader, ConfigError, Environment, File};
use serde::Deserialize;

/// Default request body limit (2 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Command-line arguments. Every flag overrides the matching config key.
#[derive(Debug, Default, Parser)]
#[command(name = "json-echo")]
#[command(version)]
#[command(about = "HTTP echo service for JSON request bodies", long_about = None)]
pub struct CliArgs {
    /// Path to an additional configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Interface to bind to (e.g., 127.0.0.1)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Maximum accepted request body size in bytes
    #[arg(long)]
    pub max_body_bytes: Option<usize>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub limits: LimitsConfig,
    pub logging: LoggingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Reported as `server_name` in request metadata.
    pub name: String,
}

/// Request limits.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    pub max_body_bytes: usize,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line.
    Json,
    /// Human-readable lines, for local runs.
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub format: LogFormat,
    /// `EnvFilter` directives, used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Config {
    /// Load configuration from files, environment and CLI flags.
    ///
    /// Priority (highest to lowest):
    /// 1. CLI flags
    /// 2. Environment variables (ECHO_*, `__` between sections)
    /// 3. File given with `--config`
    /// 4. config/local.* (if exists)
    /// 5. config/default.* (if exists)
    /// 6. Built-in defaults
    pub fn load(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut builder = ConfigLoader::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3222_i64)?
            .set_default("server.name", "localhost")?
            .set_default("limits.max_body_bytes", DEFAULT_MAX_BODY_BYTES as i64)?
            .set_default("logging.format", "json")?
            .set_default("logging.filter", "json_echo=info,tower_http=info")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false));

        if let Some(path) = &args.config {
            builder = builder.add_source(File::from(path.as_path()).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix("ECHO")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.host", args.host.clone())?
            .set_override_option("server.port", args.port.map(i64::from))?
            .set_override_option(
                "limits.max_body_bytes",
                args.max_body_bytes.map(|n| n as i64),
            )?
            .build()?;

        config.try_deserialize()
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
