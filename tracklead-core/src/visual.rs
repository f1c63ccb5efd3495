//! Prediction notifications for an optional overlay.

use tokio::sync::mpsc;

/// Receives each predicted target position. Fire-and-forget.
pub trait PredictionSink: Send {
    fn notify_prediction(&self, x: f64, y: f64);
}

/// Discards every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl PredictionSink for NoopSink {
    fn notify_prediction(&self, _x: f64, _y: f64) {}
}

/// Forwards predictions over a bounded channel, dropping them when the
/// consumer falls behind.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<(f64, f64)>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<(f64, f64)>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }
}

impl PredictionSink for ChannelSink {
    fn notify_prediction(&self, x: f64, y: f64) {
        let _ = self.tx.try_send((x, y));
    }
}
