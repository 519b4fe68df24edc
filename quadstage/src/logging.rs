//! `env_logger` setup for quadstage binaries.
//!
//! Library code only emits through `log`; the demo calls [`init_logging`]
//! before opening the window.

use std::sync::Once;

/// Used when neither the engine config nor `RUST_LOG` names a filter. Keeps
/// scene transitions and asset failures visible while muting the GPU stack.
pub const DEFAULT_FILTER: &str = "info,wgpu_core=warn,wgpu_hal=warn,naga=warn";

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Filter directives such as `"quadstage::scene=debug"`. Wins over
    /// `RUST_LOG`.
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

impl LoggingConfig {
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }
}

/// Config filter, then `RUST_LOG`, then [`DEFAULT_FILTER`].
fn effective_filter(configured: Option<String>, from_env: Option<String>) -> String {
    configured
        .or(from_env)
        .unwrap_or_else(|| DEFAULT_FILTER.to_string())
}

static INIT: Once = Once::new();

/// Installs `env_logger` as the `log` backend. Only the first call has any
/// effect.
pub fn init_logging(config: LoggingConfig) {
    INIT.call_once(|| {
        let filter = effective_filter(config.env_filter, std::env::var("RUST_LOG").ok());

        env_logger::Builder::new()
            .parse_filters(&filter)
            .write_style(config.write_style)
            .init();

        log::debug!("logger installed with filter `{filter}`");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configured_filter_beats_environment() {
        let filter = effective_filter(Some("debug".into()), Some("warn".into()));
        assert_eq!(filter, "debug");
    }

    #[test]
    fn environment_used_when_config_is_silent() {
        assert_eq!(effective_filter(None, Some("trace".into())), "trace");
    }

    #[test]
    fn default_filter_mutes_gpu_crates() {
        let filter = effective_filter(None, None);
        assert_eq!(filter, DEFAULT_FILTER);
        assert!(filter.starts_with("info"));
        assert!(filter.contains("wgpu_core=warn"));
    }

    #[test]
    fn with_filter_sets_directive() {
        let config = LoggingConfig::default().with_filter("quadstage=debug");
        assert_eq!(config.env_filter.as_deref(), Some("quadstage=debug"));
    }
}
