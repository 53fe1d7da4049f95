//! Tracing/logging initialization.

use tracing_subscriber::EnvFilter;

use crate::LogConfig;

/// `RUST_LOG` wins over the configured level.
pub(crate) fn filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize tracing/logging for the process.
///
/// Safe to call multiple times (subsequent calls are no-ops). Logs go to
/// stderr so stdout stays free for command output.
pub fn init(config: &LogConfig) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter(config))
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = if config.json {
        builder
            .json()
            .with_timer(tracing_subscriber::fmt::time::SystemTime)
            .try_init()
    } else {
        builder.try_init()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_twice_is_a_no_op() {
        init(&LogConfig::default());
        init(&LogConfig {
            level: "debug".to_string(),
            json: false,
        });
    }

    #[test]
    fn invalid_level_falls_back_to_info() {
        let config = LogConfig {
            level: "not a [valid filter".to_string(),
            json: true,
        };
        // Only meaningful when RUST_LOG is unset; must never panic either way.
        let _ = filter(&config);
    }
}
