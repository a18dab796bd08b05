//! Tracing subscriber bootstrap for binaries embedding the service.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "brewlog_service=debug,brewlog_db=info";

/// Install the global subscriber.
///
/// Honors `RUST_LOG`, falling back to `default_filter`. Set `LOG_FORMAT=json`
/// for one JSON object per event. Calling this more than once is harmless;
/// only the first subscriber is kept.
pub fn init_tracing(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let result = if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        registry.with(tracing_subscriber::fmt::layer()).try_init()
    };

    if result.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_harmless() {
        init_tracing(DEFAULT_FILTER);
        init_tracing("warn");
        tracing::info!("still logging");
    }
}
