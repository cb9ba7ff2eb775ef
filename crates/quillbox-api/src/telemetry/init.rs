use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_FILTER: &str = "quillbox=debug,tower_http=debug";

/// Initialize console tracing.
///
/// `RUST_LOG` overrides the default filter. Calling this more than once is harmless;
/// the first subscriber wins.
pub fn init_telemetry(environment: &str) {
    // Console: compact format, no timestamps.
    let console_fmt = tracing_subscriber::fmt::layer().event_format(
        Format::default()
            .compact()
            .with_target(false)
            .without_time(),
    );

    let installed = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(console_fmt)
        .try_init()
        .is_ok();

    if installed {
        tracing::info!(environment = %environment, "Tracing initialized");
    }
}
