//! Storefront configuration
//!
//! Settings are read from CLI arguments, falling back to the environment
//! (and a `.env` file when present).

use std::path::PathBuf;

use clap::Args;

/// Where the catalog and the cart snapshot live.
#[derive(Debug, Args)]
pub struct StorefrontConfig {
    /// Path to the YAML product catalog
    #[arg(
        long,
        env = "STOREFRONT_CATALOG",
        default_value = "fixtures/catalog/demo.yml"
    )]
    pub catalog: PathBuf,

    /// Directory the cart snapshot is stored in
    #[arg(long, env = "STOREFRONT_CART_DIR", default_value = ".storefront")]
    pub cart_dir: PathBuf,
}

/// Log output format.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LogFormat {
    /// Compact, human-readable logs.
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    /// Log format (compact, json)
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}
