use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    pub log_level: String,
    pub json: bool,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var("RUST_LOG").ok(),
            std::env::var("LOG_FORMAT").ok(),
        )
    }

    fn from_values(log_level: Option<String>, format: Option<String>) -> Self {
        Self {
            log_level: log_level
                .filter(|level| !level.trim().is_empty())
                .unwrap_or_else(|| "info".to_string()),
            json: format.is_some_and(|f| f.eq_ignore_ascii_case("json")),
        }
    }
}

/// Installs the global subscriber. Logs go to stderr so CLI output on stdout stays parseable.
pub fn init_logging(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_new(&config.log_level)?;
    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }
    Ok(())
}
