//! Live report state channel
//!
//! Holds the most recently projected chart data and republishes it to
//! subscribers whenever the host supplies a new stats snapshot. The held
//! value is replaced atomically; broadcast is best-effort and independent
//! per subscriber, so one slow or disconnected viewer never affects the
//! others or the producer.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use log::{debug, warn};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;

use crate::analyzer::{BundleAnalyzer, BundleParser, ChartItem, FlatBundleParser, RawStats};
use crate::error::BundlemapError;

/// Event name carried by every chart-data update message
pub const CHART_DATA_UPDATED: &str = "chartDataUpdated";

/// Update message sent to every subscriber after a successful recompute
#[derive(Debug, Clone, Serialize)]
pub struct ChartUpdate {
    /// Always [`CHART_DATA_UPDATED`]
    pub event: &'static str,
    /// The freshly computed chart data
    pub data: Arc<Vec<ChartItem>>,
}

/// Handle identifying one subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriberToken(u64);

struct Subscriber {
    token: u64,
    sender: Sender<ChartUpdate>,
}

/// Holds the latest chart data and broadcasts recomputed reports
pub struct ReportStateChannel<P: BundleParser = FlatBundleParser> {
    analyzer: BundleAnalyzer<P>,
    state: RwLock<Option<Arc<Vec<ChartItem>>>>,
    subscribers: Mutex<Vec<Subscriber>>,
    next_token: AtomicU64,
}

impl<P: BundleParser + Sync> ReportStateChannel<P> {
    /// Create a channel running the given analyzer on each recompute
    pub fn new(analyzer: BundleAnalyzer<P>) -> Self {
        ReportStateChannel {
            analyzer,
            state: RwLock::new(None),
            subscribers: Mutex::new(Vec::new()),
            next_token: AtomicU64::new(0),
        }
    }

    /// The most recently computed chart data, if any
    pub fn current(&self) -> Option<Arc<Vec<ChartItem>>> {
        self.state.read().clone()
    }

    /// Register a new subscriber; updates arrive on the returned receiver
    pub fn subscribe(&self) -> (SubscriberToken, Receiver<ChartUpdate>) {
        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::channel();
        self.subscribers.lock().push(Subscriber { token, sender });
        (SubscriberToken(token), receiver)
    }

    /// Remove a subscriber; in-flight messages are unaffected
    pub fn unsubscribe(&self, token: SubscriberToken) {
        self.subscribers.lock().retain(|s| s.token != token.0);
    }

    /// Number of currently registered subscribers
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }

    /// Run the pipeline against a new stats snapshot.
    ///
    /// An empty result discards the update and keeps the previous state;
    /// otherwise the held state is replaced atomically and every subscriber
    /// is notified. Returns whether the state was replaced.
    pub fn recompute(&self, stats: RawStats) -> Result<bool, BundlemapError> {
        let Some(items) = self.analyzer.analyze(stats)? else {
            debug!("Recompute produced no chart data; keeping previous report");
            return Ok(false);
        };

        let data = Arc::new(items);
        *self.state.write() = Some(Arc::clone(&data));
        self.broadcast(data);
        Ok(true)
    }

    /// Send the update to every subscriber, dropping unreachable ones.
    /// Delivery is at-most-once with no retries.
    fn broadcast(&self, data: Arc<Vec<ChartItem>>) {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|subscriber| {
            let update = ChartUpdate {
                event: CHART_DATA_UPDATED,
                data: Arc::clone(&data),
            };
            match subscriber.sender.send(update) {
                Ok(()) => true,
                Err(_) => {
                    warn!("Dropping unreachable report subscriber {}", subscriber.token);
                    false
                }
            }
        });
    }
}
