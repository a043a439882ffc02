//! Fixed-interval polling of every registered exchange

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use scraper_store::BatchWriter;

use crate::pipeline::{canonical_batch, QuotePipeline};

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(15),
        }
    }
}

/// Counters updated by the loop and by the write tasks it spawns
#[derive(Debug, Default)]
pub struct SchedulerStats {
    ticks: AtomicU64,
    quotes_dropped: AtomicU64,
    batches_written: AtomicU64,
    batches_failed: AtomicU64,
    rows_written: AtomicU64,
    last_tick_at: RwLock<Option<DateTime<Utc>>>,
}

impl SchedulerStats {
    pub fn snapshot(&self) -> SchedulerSnapshot {
        SchedulerSnapshot {
            ticks: self.ticks.load(Ordering::Relaxed),
            quotes_dropped: self.quotes_dropped.load(Ordering::Relaxed),
            batches_written: self.batches_written.load(Ordering::Relaxed),
            batches_failed: self.batches_failed.load(Ordering::Relaxed),
            rows_written: self.rows_written.load(Ordering::Relaxed),
            last_tick_at: *self.last_tick_at.read(),
        }
    }
}

/// Point-in-time copy of `SchedulerStats`
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerSnapshot {
    pub ticks: u64,
    pub quotes_dropped: u64,
    pub batches_written: u64,
    pub batches_failed: u64,
    pub rows_written: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
}

/// Sleeps, then polls every exchange and hands each batch to a write task.
///
/// Exchanges are processed one after another. Writes are spawned and not
/// awaited, so the next sleep starts while they may still be in flight.
pub struct PollingScheduler {
    config: SchedulerConfig,
    pipeline: QuotePipeline,
    writer: BatchWriter,
    stats: Arc<SchedulerStats>,
}

impl PollingScheduler {
    pub fn new(config: SchedulerConfig, pipeline: QuotePipeline, writer: BatchWriter) -> Self {
        Self {
            config,
            pipeline,
            writer,
            stats: Arc::new(SchedulerStats::default()),
        }
    }

    pub fn stats(&self) -> SchedulerSnapshot {
        self.stats.snapshot()
    }

    /// Run on the current runtime until the process exits
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(async move { self.run().await })
    }

    /// Idle → Active, forever
    pub async fn run(&self) {
        info!(
            interval = ?self.config.interval,
            exchanges = self.pipeline.registry().len(),
            "Starting polling scheduler"
        );

        loop {
            tokio::time::sleep(self.config.interval).await;
            self.tick().await;
        }
    }

    /// One Active phase. Returns the spawned write tasks.
    pub async fn tick(&self) -> Vec<JoinHandle<()>> {
        let start = Instant::now();
        let mut handles = Vec::new();

        for exchange in self.pipeline.registry().iter() {
            let raw = self.pipeline.raw_quotes(exchange).await;
            let (batch, dropped) = canonical_batch(&exchange.id, &raw);
            self.stats
                .quotes_dropped
                .fetch_add(dropped as u64, Ordering::Relaxed);

            if batch.is_empty() {
                debug!(exchange = %exchange.id, "No quotes this tick");
                continue;
            }

            let writer = self.writer.clone();
            let stats = Arc::clone(&self.stats);
            let exchange_id = exchange.id.clone();

            handles.push(tokio::spawn(async move {
                match writer.write(&exchange_id, &batch).await {
                    Ok(rows) => {
                        stats.batches_written.fetch_add(1, Ordering::Relaxed);
                        stats.rows_written.fetch_add(rows as u64, Ordering::Relaxed);
                    }
                    Err(_) => {
                        stats.batches_failed.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }));
        }

        self.stats.ticks.fetch_add(1, Ordering::Relaxed);
        *self.stats.last_tick_at.write() = Some(Utc::now());

        debug!(
            batches = handles.len(),
            elapsed = ?start.elapsed(),
            "Tick dispatched"
        );

        handles
    }
}
