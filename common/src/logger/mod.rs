//! Process-wide tracing setup and span helpers.
//!
//! Logs go to stderr: stdout belongs to the rendered dashboard frame.

mod trace_id;

pub use trace_id::TraceId;

use once_cell::sync::OnceCell;
use tracing::{Span, field};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Install the global subscriber. Safe to call more than once; only the
/// first call has any effect.
pub fn init_tracing(service_name: &'static str, json: bool) {
    LOGGER_INIT.get_or_init(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let base = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(true)
            .with_line_number(true)
            .with_file(true)
            .with_span_events(fmt::format::FmtSpan::CLOSE);

        if json {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(base.json())
                .init();
        } else {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(base.compact())
                .init();
        }

        tracing::info!(service = service_name, json, "logger initialized");
    });
}

/// Root span for one dashboard session.
pub fn root_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::info_span!(
        "root",
        name = %name,
        trace_id = %trace_id.as_str(),
        asset_id = field::Empty
    )
}

/// Child span for a timer or sub-task; inherits the root's trace id.
pub fn child_span(name: &'static str) -> Span {
    tracing::info_span!("child", name = %name, asset_id = field::Empty)
}

/// Attach an asset id to the current span.
pub fn annotate_span(asset_id: &str) {
    Span::current().record("asset_id", field::display(asset_id));
}
