//! ## timewarp-telemetry::metrics
//! **Prometheus exporter for warp sessions**

use prometheus::{Counter, Encoder, Histogram, HistogramOpts, Registry, TextEncoder};

pub use prometheus::Error as PrometheusError;

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub sessions_started: Counter,
    pub sessions_finished: Counter,
    pub sessions_stopped: Counter,
    pub frames: Counter,
    pub frame_multiplier: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let sessions_started =
            Counter::new("timewarp_sessions_started_total", "Warp sessions started")?;
        let sessions_finished = Counter::new(
            "timewarp_sessions_finished_total",
            "Warp sessions that reached their target duration",
        )?;
        let sessions_stopped =
            Counter::new("timewarp_sessions_stopped_total", "Explicit warp stops")?;
        let frames = Counter::new("timewarp_frames_total", "Integrated warp frames")?;

        let frame_multiplier = Histogram::with_opts(
            HistogramOpts::new(
                "timewarp_frame_multiplier",
                "Speed multiplier applied per integrated frame",
            )
            .buckets(vec![1.0, 10.0, 100.0, 1_000.0, 10_000.0, 86_400.0]),
        )?;

        registry.register(Box::new(sessions_started.clone()))?;
        registry.register(Box::new(sessions_finished.clone()))?;
        registry.register(Box::new(sessions_stopped.clone()))?;
        registry.register(Box::new(frames.clone()))?;
        registry.register(Box::new(frame_multiplier.clone()))?;

        Ok(Self {
            registry,
            sessions_started,
            sessions_finished,
            sessions_stopped,
            frames,
            frame_multiplier,
        })
    }

    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn record_frame(&self, multiplier: f64) {
        self.frames.inc();
        self.frame_multiplier.observe(multiplier);
    }
}
