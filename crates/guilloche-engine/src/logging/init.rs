use std::sync::Once;

/// Default filter: the canvas at info, the GPU stack quieted down. wgpu and
/// naga log large amounts of per-frame detail at info level.
const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

/// Logger configuration.
///
/// `env_filter` follows the `env_logger` syntax (e.g. "debug",
/// "guilloche_engine=trace"). When unset, `RUST_LOG` applies, and failing
/// that the guilloche default above.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

fn filter_spec(configured: Option<String>) -> String {
    configured
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

static INIT: Once = Once::new();

/// Initializes the global logger once; later calls are no-ops.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        env_logger::Builder::new()
            .parse_filters(&filter_spec(config.env_filter))
            .write_style(config.write_style)
            .init();

        log::debug!("logging initialized");
    });
}
