//! Command-line interface definitions using clap derive macros.
//!
//! Contains the top-level [`Cli`] parser, the [`Commands`] enum for
//! subcommands (run, health), and their argument structs. Every `run`
//! flag has an environment variable equivalent for container
//! deployments.

use clap::{Args, Parser, Subcommand, ValueEnum};

pub const DEFAULT_PREFERENCE_URL: &str = "http://preference:8080";

#[derive(Parser)]
#[command(
    name = "customer-service",
    version,
    about = "Customer service node of a microservices call chain",
    propagate_version = true,
    after_help = "\x1b[1mQuick start:\x1b[0m\n  \
        customer-service run                                   Listen on :8080\n  \
        customer-service run --preference-url http://pref:80   Custom downstream\n  \
        customer-service health http://localhost:8080          Check a running instance"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the customer service
    Run(Box<RunArgs>),

    /// Check readiness and liveness of a running instance
    Health(HealthArgs),
}

#[derive(Args)]
#[command(after_help = "\x1b[1mExamples:\x1b[0m\n  \
        customer-service run                                          Defaults\n  \
        customer-service run -p 9090 --pretty                         Local dev mode\n  \
        PREFERENCES_API_URL=http://localhost:8081 customer-service run")]
pub struct RunArgs {
    /// Base URL of the downstream preference service
    #[arg(
        long,
        env = "PREFERENCES_API_URL",
        default_value = DEFAULT_PREFERENCE_URL,
        value_parser = parse_url
    )]
    pub preference_url: url::Url,

    /// Listen port
    #[arg(short, long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    /// Listen address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Service name reported on request spans
    #[arg(long, env = "SERVICE_NAME", default_value = "customer")]
    pub service_name: String,

    // -- Logging --
    /// Log level
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: LogLevel,

    /// Force pretty (human-readable) log output
    #[arg(long)]
    pub pretty: bool,

    /// Force JSON log output (overrides TTY detection)
    #[arg(long, conflicts_with = "pretty")]
    pub json: bool,

    // -- Tuning --
    /// Max request body size in bytes (unlimited when unset)
    #[arg(long, env = "MAX_BODY_SIZE", help_heading = "Tuning")]
    pub max_body: Option<usize>,
}

#[derive(Args)]
pub struct HealthArgs {
    /// URL of the running instance
    #[arg(default_value = "http://localhost:8080")]
    pub url: String,
}

fn parse_url(value: &str) -> Result<url::Url, String> {
    let url = url::Url::parse(value).map_err(|e| format!("invalid URL '{value}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!("unsupported scheme '{other}', expected http or https")),
    }
}

#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}
