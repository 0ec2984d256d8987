//! Global `tracing` subscriber.
//!
//! `RUST_LOG`, when set, replaces the configured directives entirely.

use tracing_subscriber::{fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Environment;

/// Our crates at the given level, chatty dependencies held at `warn`
fn directives_for(level: &str) -> String {
    format!("{level},sqlx=warn,tower_http=info,hyper=warn,tower_governor=warn")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Compact,
    Json,
}

#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub directives: String,
    pub format: LogFormat,
    /// Log span close events with their busy/idle timings
    pub span_timings: bool,
}

impl TracingConfig {
    #[must_use]
    pub fn for_environment(env: Environment) -> Self {
        match env {
            Environment::Development => Self {
                directives: directives_for("debug"),
                format: LogFormat::Pretty,
                span_timings: true,
            },
            Environment::Staging => Self {
                directives: directives_for("info"),
                format: LogFormat::Compact,
                span_timings: false,
            },
            Environment::Production => Self {
                directives: directives_for("info"),
                format: LogFormat::Json,
                span_timings: false,
            },
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.directives))
    }
}

/// Install the global subscriber
///
/// # Errors
/// `TracingError::AlreadyInitialized` if another subscriber won the race
pub fn init_tracing(config: &TracingConfig) -> Result<(), TracingError> {
    let spans = if config.span_timings {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };
    let registry = tracing_subscriber::registry().with(config.filter());
    let layer = tracing_subscriber::fmt::layer().with_span_events(spans);

    let result = match config.format {
        LogFormat::Pretty => registry.with(layer.pretty()).try_init(),
        LogFormat::Compact => registry.with(layer.compact().with_target(false)).try_init(),
        LogFormat::Json => registry
            .with(layer.json().flatten_event(true).with_current_span(true))
            .try_init(),
    };
    result.map_err(|_| TracingError::AlreadyInitialized)
}

#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formats_follow_environment() {
        assert_eq!(
            TracingConfig::for_environment(Environment::Development).format,
            LogFormat::Pretty
        );
        assert_eq!(
            TracingConfig::for_environment(Environment::Staging).format,
            LogFormat::Compact
        );
        assert_eq!(
            TracingConfig::for_environment(Environment::Production).format,
            LogFormat::Json
        );
    }

    #[test]
    fn test_dependencies_stay_quiet() {
        let dev = TracingConfig::for_environment(Environment::Development);
        assert!(dev.directives.starts_with("debug,"));
        assert!(dev.directives.contains("sqlx=warn"));
        assert!(dev.span_timings);
        assert!(!TracingConfig::for_environment(Environment::Production).span_timings);
    }

    #[test]
    fn test_second_install_is_reported() {
        let config = TracingConfig::for_environment(Environment::Staging);
        let _ = init_tracing(&config);
        assert!(matches!(init_tracing(&config), Err(TracingError::AlreadyInitialized)));
    }
}
