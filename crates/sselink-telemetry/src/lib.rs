use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Configuration for log output.
#[derive(Clone, Debug)]
pub struct TelemetryConfig {
    /// Default log level. Overridden by the RUST_LOG env var.
    pub log_level: Level,
    /// Per-module level overrides (e.g. "sselink_client" => DEBUG).
    pub module_levels: Vec<(String, Level)>,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: Level::INFO,
            module_levels: Vec::new(),
        }
    }
}

impl TelemetryConfig {
    /// Config for a subscription running with `debug: true`: everything under
    /// the sselink crates logs at debug level.
    pub fn debug() -> Self {
        Self {
            log_level: Level::INFO,
            module_levels: vec![
                ("sselink_core".into(), Level::DEBUG),
                ("sselink_client".into(), Level::DEBUG),
            ],
        }
    }
}

/// Initialize the tracing subscriber. Call once at startup.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_string(config)));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .init();
}

fn filter_string(config: &TelemetryConfig) -> String {
    let mut filter = config.log_level.to_string().to_lowercase();
    for (module, level) in &config.module_levels {
        filter.push_str(&format!(",{}={}", module, level.to_string().to_lowercase()));
    }
    filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_is_info() {
        assert_eq!(filter_string(&TelemetryConfig::default()), "info");
    }

    #[test]
    fn module_overrides_appended() {
        let config = TelemetryConfig {
            log_level: Level::WARN,
            module_levels: vec![
                ("sselink_client".into(), Level::DEBUG),
                ("reqwest".into(), Level::INFO),
            ],
        };
        assert_eq!(
            filter_string(&config),
            "warn,sselink_client=debug,reqwest=info"
        );
    }

    #[test]
    fn debug_config_targets_sselink_crates() {
        let filter = filter_string(&TelemetryConfig::debug());
        assert!(filter.contains("sselink_core=debug"));
        assert!(filter.contains("sselink_client=debug"));
    }
}
