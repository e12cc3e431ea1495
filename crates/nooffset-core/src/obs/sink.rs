//! Reader sink boundary.
//!
//! Paging components never log or count directly; every notable step is
//! reported as a `ReaderEvent` to the sink handle the component was built
//! with.

use crate::value::Value;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};
use tracing::{debug, trace};

///
/// ReaderEvent
///

#[derive(Clone, Copy, Debug)]
pub enum ReaderEvent<'a> {
    Opened {
        reader: &'a str,
    },
    CursorSeeded {
        field: &'a str,
        key: Option<&'a Value>,
    },
    BoundsSeeded {
        field: &'a str,
        lower: &'a Value,
        upper: &'a Value,
    },
    PageFetched {
        reader: &'a str,
        page: u32,
        rows: usize,
        isolated: bool,
    },
    CursorAdvanced {
        field: &'a str,
        key: &'a Value,
    },
    Exhausted {
        reader: &'a str,
        page: u32,
        items: u64,
    },
    Closed {
        reader: &'a str,
        items: u64,
    },
}

///
/// ReaderSink
///

pub trait ReaderSink: Send + Sync {
    fn record(&self, event: ReaderEvent<'_>);
}

/// Shared handle type threaded through readers and options.
pub type SinkHandle = Arc<dyn ReaderSink>;

/// Default handle: forward everything to `tracing`.
#[must_use]
pub fn default_sink() -> SinkHandle {
    Arc::new(TracingSink)
}

///
/// TracingSink
///
/// Emits one structured `tracing` event per reader event.
///

#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl ReaderSink for TracingSink {
    fn record(&self, event: ReaderEvent<'_>) {
        match event {
            ReaderEvent::Opened { reader } => debug!(reader, "reader opened"),
            ReaderEvent::CursorSeeded { field, key } => match key {
                Some(key) => debug!(field, %key, "first cursor key"),
                None => debug!(field, "no cursor key; filtered set is empty"),
            },
            ReaderEvent::BoundsSeeded {
                field,
                lower,
                upper,
            } => debug!(field, %lower, %upper, "group bounds"),
            ReaderEvent::PageFetched {
                reader,
                page,
                rows,
                isolated,
            } => debug!(reader, page, rows, isolated, "page fetched"),
            ReaderEvent::CursorAdvanced { field, key } => trace!(field, %key, "current cursor key"),
            ReaderEvent::Exhausted {
                reader,
                page,
                items,
            } => debug!(reader, page, items, "end of data"),
            ReaderEvent::Closed { reader, items } => debug!(reader, items, "reader closed"),
        }
    }
}

///
/// ReaderMetrics
///
/// Counting sink. Cheap to share across readers; counters only grow until
/// [`ReaderMetrics::reset`].
///

#[derive(Debug, Default)]
pub struct ReaderMetrics {
    opens: AtomicU64,
    pages: AtomicU64,
    rows: AtomicU64,
    cursor_seeds: AtomicU64,
    cursor_advances: AtomicU64,
    exhaustions: AtomicU64,
    closes: AtomicU64,
}

///
/// ReaderMetricsSnapshot
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct ReaderMetricsSnapshot {
    pub opens: u64,
    pub pages: u64,
    pub rows: u64,
    pub cursor_seeds: u64,
    pub cursor_advances: u64,
    pub exhaustions: u64,
    pub closes: u64,
}

impl ReaderMetrics {
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    #[must_use]
    pub fn snapshot(&self) -> ReaderMetricsSnapshot {
        ReaderMetricsSnapshot {
            opens: self.opens.load(Ordering::Relaxed),
            pages: self.pages.load(Ordering::Relaxed),
            rows: self.rows.load(Ordering::Relaxed),
            cursor_seeds: self.cursor_seeds.load(Ordering::Relaxed),
            cursor_advances: self.cursor_advances.load(Ordering::Relaxed),
            exhaustions: self.exhaustions.load(Ordering::Relaxed),
            closes: self.closes.load(Ordering::Relaxed),
        }
    }

    pub fn reset(&self) {
        for counter in [
            &self.opens,
            &self.pages,
            &self.rows,
            &self.cursor_seeds,
            &self.cursor_advances,
            &self.exhaustions,
            &self.closes,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }
}

impl ReaderSink for ReaderMetrics {
    fn record(&self, event: ReaderEvent<'_>) {
        match event {
            ReaderEvent::Opened { .. } => {
                self.opens.fetch_add(1, Ordering::Relaxed);
            }
            ReaderEvent::CursorSeeded { .. } => {
                self.cursor_seeds.fetch_add(1, Ordering::Relaxed);
            }
            ReaderEvent::BoundsSeeded { .. } => {}
            ReaderEvent::PageFetched { rows, .. } => {
                self.pages.fetch_add(1, Ordering::Relaxed);
                self.rows.fetch_add(rows as u64, Ordering::Relaxed);
            }
            ReaderEvent::CursorAdvanced { .. } => {
                self.cursor_advances.fetch_add(1, Ordering::Relaxed);
            }
            ReaderEvent::Exhausted { .. } => {
                self.exhaustions.fetch_add(1, Ordering::Relaxed);
            }
            ReaderEvent::Closed { .. } => {
                self.closes.fetch_add(1, Ordering::Relaxed);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metrics_count_pages_and_rows() {
        let metrics = ReaderMetrics::new();

        metrics.record(ReaderEvent::Opened { reader: "r" });
        metrics.record(ReaderEvent::PageFetched {
            reader: "r",
            page: 0,
            rows: 3,
            isolated: true,
        });
        metrics.record(ReaderEvent::PageFetched {
            reader: "r",
            page: 1,
            rows: 2,
            isolated: true,
        });

        let snap = metrics.snapshot();
        assert_eq!(snap.opens, 1);
        assert_eq!(snap.pages, 2);
        assert_eq!(snap.rows, 5);

        metrics.reset();
        assert_eq!(metrics.snapshot(), ReaderMetricsSnapshot::default());
    }

    #[test]
    fn tracing_sink_accepts_every_event() {
        let key = Value::Int(1);
        let sink = TracingSink;

        sink.record(ReaderEvent::CursorSeeded {
            field: "id",
            key: Some(&key),
        });
        sink.record(ReaderEvent::CursorSeeded {
            field: "id",
            key: None,
        });
        sink.record(ReaderEvent::CursorAdvanced {
            field: "id",
            key: &key,
        });
    }
}
