pub mod build_info;

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "subtrack=info";

/// Initializes the global tracing subscriber. `RUST_LOG` wins when set.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = filter_from(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref());

        // stdout carries command output only.
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init();
    });
}

/// Builds the filter from a `RUST_LOG` value, falling back to `subtrack=info`
/// when it is unset, blank, or unparsable.
fn filter_from(raw: Option<&str>) -> EnvFilter {
    raw.map(str::trim)
        .filter(|spec| !spec.is_empty())
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}
