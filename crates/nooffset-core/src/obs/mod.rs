//! Observability: the sink handle readers report through.

pub mod sink;

pub use sink::{
    ReaderEvent, ReaderMetrics, ReaderMetricsSnapshot, ReaderSink, SinkHandle, TracingSink,
    default_sink,
};
