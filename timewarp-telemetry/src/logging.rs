//! ## timewarp-telemetry::logging
//! **Structured logging with tracing**
//!
//! Session lifecycle transitions (start, finish, stop) are emitted as
//! structured events carrying OpenTelemetry key/value metadata, so a
//! collector downstream can correlate them with the per-frame debug output.

use opentelemetry::KeyValue;
use tracing::info_span;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global fmt subscriber. `RUST_LOG` wins over `default_level`.
    ///
    /// Safe to call more than once; later calls are ignored.
    pub fn init(default_level: &str) {
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new(default_level)),
            )
            .with_thread_names(true)
            .with_span_events(FmtSpan::NONE)
            .try_init();
    }

    #[inline]
    pub fn log_event(event_type: &str, metadata: Vec<KeyValue>) {
        let span = info_span!("warp_event", event_type = event_type, otel.kind = "INTERNAL");
        let _entered = span.enter();
        tracing::info!(metadata = ?metadata, "Warp lifecycle event");
    }
}
