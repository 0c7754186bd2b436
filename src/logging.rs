// 📝 Logging - tracing subscriber setup
// Human logs on stderr; stdout stays free for command output

use std::io;
use std::sync::Once;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, Registry};

/// Env var selecting verbosity (0..3)
pub const VERBOSE_ENV: &str = "VERBOSE";

static INIT: Once = Once::new();

/// Map a VERBOSE value to a level; unset or unparsable means INFO
pub fn level_from_verbose(value: Option<&str>) -> LevelFilter {
    match value.and_then(|s| s.trim().parse::<u8>().ok()) {
        Some(0) => LevelFilter::ERROR,
        Some(1) => LevelFilter::INFO,
        Some(2) => LevelFilter::DEBUG,
        Some(3) => LevelFilter::TRACE,
        _ => LevelFilter::INFO,
    }
}

/// Install the global subscriber once. Later calls are no-ops.
pub fn init_logging() {
    INIT.call_once(|| {
        let level = level_from_verbose(std::env::var(VERBOSE_ENV).ok().as_deref());

        let human_layer = fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_level(true)
            .with_timer(ChronoLocal::rfc_3339())
            .with_filter(level);

        // Another subscriber may already be installed (tests, embedding apps)
        let _ = Registry::default().with(human_layer).try_init();
    });
}
