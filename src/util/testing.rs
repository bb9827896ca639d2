use std::sync::Once;
use tracing::{debug, info, Level};
use tracing_subscriber::{
    filter::filter_fn,
    fmt::{self, format::FmtSpan},
    prelude::*,
    EnvFilter,
};

static TEST_SETUP: Once = Once::new();

/// Targets that trace every node creation and every event delivery.
const NOISY_TRACE_TARGETS: [&str; 1] = ["spatial_tree::arena"];

pub fn init_test_setup() {
    TEST_SETUP.call_once(|| {
        // global logging subscriber, used by all tracing log macros
        setup_test_logging();
        info!("Test Setup complete");
    });
}

/// Trace output of the arena drowns everything else under `RUST_LOG=trace`.
fn is_noisy(target: &str, level: &Level) -> bool {
    *level == Level::TRACE
        && NOISY_TRACE_TARGETS
            .iter()
            .any(|name| target.starts_with(name))
}

fn setup_test_logging() {
    debug!("INIT: Attempting logger init from testing.rs");

    let module_filter = filter_fn(|metadata| !is_noisy(metadata.target(), metadata.level()));

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let subscriber = tracing_subscriber::registry().with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_names(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(module_filter)
            .with_filter(env_filter),
    );

    // Only set if we haven't already set a global subscriber
    if tracing::dispatcher::has_been_set() {
        debug!("Tracing subscriber already set");
    } else {
        subscriber.try_init().unwrap_or_else(|e| {
            eprintln!("Error: Failed to set up logging: {}", e);
        });
    }
}
