//! Tracing subscriber setup

use lazycache_domain::constants::DEFAULT_LOG_FILTER;
use lazycache_domain::LoggingConfig;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins over `config.filter`; an unparsable filter falls back to
/// the default level. Returns `false` when a global subscriber was already
/// installed, which leaves the existing one in place.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = resolve_filter(config);

    let installed = if config.json {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).json().try_init()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init()
    };

    installed.is_ok()
}

fn resolve_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let config = LoggingConfig::default();
        init_tracing(&config);

        assert!(!init_tracing(&config));
        assert!(!init_tracing(&LoggingConfig { json: true, ..config }));
    }

    #[test]
    fn test_bad_filter_falls_back() {
        let config = LoggingConfig { filter: "lazycache=[".to_string(), json: false };
        let filter = resolve_filter(&config);
        assert!(!filter.to_string().is_empty());
    }
}
