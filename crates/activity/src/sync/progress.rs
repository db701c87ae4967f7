//! Progress signal for in-flight syncs
//!
//! Values are percentages in [0, 100]. Within one invocation they never go
//! down, and the last value of a successful sync is exactly 100.

use chrono::{DateTime, Utc};
use log::debug;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, SyncSender, TryRecvError};
use std::time::Duration;

/// Value reported once a sync reaches Done
pub const PROGRESS_COMPLETE: f64 = 100.0;

/// How far the submission walk has gone back, as a percentage
///
/// `now` is the invocation time, `anchor` the timestamp of the oldest record
/// seen so far. A threshold at or after `now` counts as complete.
pub fn threshold_progress(
    now: DateTime<Utc>,
    anchor: DateTime<Utc>,
    threshold: DateTime<Utc>,
) -> f64 {
    let span = (now - threshold).num_milliseconds();
    if span <= 0 {
        return PROGRESS_COMPLETE;
    }
    let walked = (now - anchor).num_milliseconds();
    (walked as f64 / span as f64 * 100.0).clamp(0.0, PROGRESS_COMPLETE)
}

/// Keeps the reported sequence clamped and non-decreasing
pub struct ProgressTracker<'a> {
    sink: &'a mut dyn FnMut(f64),
    last: f64,
}

impl<'a> ProgressTracker<'a> {
    pub fn new(sink: &'a mut dyn FnMut(f64)) -> Self {
        Self { sink, last: 0.0 }
    }

    /// Report a new value; values below the last report are raised to it
    pub fn report(&mut self, value: f64) {
        let value = if value.is_nan() {
            self.last
        } else {
            value.clamp(0.0, PROGRESS_COMPLETE).max(self.last)
        };
        self.last = value;
        (self.sink)(value);
    }

    /// Report completion
    pub fn complete(&mut self) {
        self.report(PROGRESS_COMPLETE);
    }

    pub fn last(&self) -> f64 {
        self.last
    }
}

/// Create a rendezvous progress channel
///
/// Each send blocks until the consumer takes the value. Dropping the
/// receiver closes the channel and unblocks the sender for good.
pub fn progress_channel() -> (ProgressSender, ProgressReceiver) {
    let (tx, rx) = mpsc::sync_channel(0);
    (
        ProgressSender {
            tx: Some(tx),
        },
        ProgressReceiver { rx },
    )
}

/// Producer half, owned by the sync thread
pub struct ProgressSender {
    tx: Option<SyncSender<f64>>,
}

impl ProgressSender {
    /// Hand a value to the consumer, blocking until it is received
    ///
    /// Once the consumer has gone away, further sends are dropped.
    pub fn send(&mut self, value: f64) {
        let Some(tx) = &self.tx else {
            return;
        };
        if tx.send(value).is_err() {
            debug!("Progress consumer disconnected; no further progress will be sent");
            self.tx = None;
        }
    }

    /// Whether the consumer is still listening
    pub fn is_connected(&self) -> bool {
        self.tx.is_some()
    }
}

/// Consumer half, owned by the caller
pub struct ProgressReceiver {
    rx: Receiver<f64>,
}

impl ProgressReceiver {
    /// Block until the next value; `None` once the sync has finished
    pub fn recv(&self) -> Option<f64> {
        self.rx.recv().ok()
    }

    /// Block for at most `timeout`
    ///
    /// `Ok(None)` means the sync has finished and no more values will come.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<f64>, RecvTimeoutError> {
        match self.rx.recv_timeout(timeout) {
            Ok(value) => Ok(Some(value)),
            Err(RecvTimeoutError::Disconnected) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Take a value only if the sender is blocked offering one
    pub fn try_recv(&self) -> Option<f64> {
        match self.rx.try_recv() {
            Ok(value) => Some(value),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocking iterator over all remaining values
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.rx.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as ChronoDuration;

    #[test]
    fn test_threshold_progress() {
        let now = Utc::now();
        let threshold = now - ChronoDuration::days(10);

        assert_eq!(threshold_progress(now, now, threshold), 0.0);
        assert_eq!(
            threshold_progress(now, now - ChronoDuration::days(5), threshold),
            50.0
        );
        assert_eq!(threshold_progress(now, threshold, threshold), 100.0);
        // Walked past the threshold
        assert_eq!(
            threshold_progress(now, now - ChronoDuration::days(30), threshold),
            100.0
        );
        // Anchor newer than now clamps to zero
        assert_eq!(
            threshold_progress(now, now + ChronoDuration::hours(1), threshold),
            0.0
        );
    }

    #[test]
    fn test_threshold_at_now_is_complete() {
        let now = Utc::now();
        assert_eq!(threshold_progress(now, now, now), 100.0);
    }

    #[test]
    fn test_tracker_is_monotone_and_clamped() {
        let mut seen = Vec::new();
        {
            let mut sink = |v: f64| seen.push(v);
            let mut tracker = ProgressTracker::new(&mut sink);
            tracker.report(10.0);
            tracker.report(5.0);
            tracker.report(-3.0);
            tracker.report(40.0);
            tracker.report(f64::NAN);
            tracker.report(250.0);
            assert_eq!(tracker.last(), 100.0);
        }
        assert_eq!(seen, vec![10.0, 10.0, 10.0, 40.0, 40.0, 100.0]);
    }

    #[test]
    fn test_tracker_complete() {
        let mut seen = Vec::new();
        {
            let mut sink = |v: f64| seen.push(v);
            let mut tracker = ProgressTracker::new(&mut sink);
            tracker.report(33.0);
            tracker.complete();
        }
        assert_eq!(seen, vec![33.0, 100.0]);
    }

    #[test]
    fn test_channel_handoff() {
        let (mut tx, rx) = progress_channel();
        let producer = std::thread::spawn(move || {
            tx.send(25.0);
            tx.send(100.0);
        });

        assert_eq!(rx.recv(), Some(25.0));
        assert_eq!(rx.recv(), Some(100.0));
        producer.join().unwrap();
        assert_eq!(rx.recv(), None);
    }

    #[test]
    fn test_sender_survives_dropped_receiver() {
        let (mut tx, rx) = progress_channel();
        drop(rx);

        // Must not block or panic
        tx.send(10.0);
        assert!(!tx.is_connected());
        tx.send(20.0);
    }

    #[test]
    fn test_recv_timeout_reports_finish() {
        let (tx, rx) = progress_channel();
        assert_eq!(
            rx.recv_timeout(Duration::from_millis(10)),
            Err(RecvTimeoutError::Timeout)
        );
        drop(tx);
        assert_eq!(rx.recv_timeout(Duration::from_millis(10)), Ok(None));
        assert_eq!(rx.try_recv(), None);
    }
}
