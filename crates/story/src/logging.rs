use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _};

/// Install the console subscriber. Filtering follows `RUST_LOG`, e.g.
/// `RUST_LOG=gpui_mtree=trace` to follow hover and auto-scroll decisions.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,gpui_mtree=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_line_number(true))
        .with(filter)
        .init();
}
