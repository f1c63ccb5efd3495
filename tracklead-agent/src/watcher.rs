//! Config file polling.
//!
//! Checks the file's modification time on an interval and publishes a
//! fresh [`TrackingConfig`] whenever it changes. Parse errors keep the
//! previous snapshot.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, SystemTime};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use tracklead_core::TrackingConfig;

use crate::config::AgentConfig;

pub struct ConfigWatcher {
    path: PathBuf,
    interval: Duration,
    last_modified: Option<SystemTime>,
    tx: watch::Sender<TrackingConfig>,
}

impl ConfigWatcher {
    /// Watch `path`, publishing on `tx`. The current modification time
    /// is taken as already applied.
    pub fn new(path: PathBuf, interval: Duration, tx: watch::Sender<TrackingConfig>) -> Self {
        let last_modified = Self::modified(&path);
        Self {
            path,
            interval,
            last_modified,
            tx,
        }
    }

    fn modified(path: &Path) -> Option<SystemTime> {
        std::fs::metadata(path).and_then(|m| m.modified()).ok()
    }

    /// Check once. Returns `true` if a new snapshot was published.
    pub fn poll(&mut self) -> bool {
        let modified = Self::modified(&self.path);
        if modified.is_none() || modified == self.last_modified {
            return false;
        }
        self.last_modified = modified;

        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) => {
                warn!("cannot read {}: {e}", self.path.display());
                return false;
            }
        };
        match AgentConfig::parse(&text) {
            Ok(cfg) => {
                info!("reloaded {}", self.path.display());
                self.tx.send_replace(cfg.to_tracking_config());
                true
            }
            Err(e) => {
                warn!("invalid config {}: {e}; keeping previous settings", self.path.display());
                false
            }
        }
    }

    /// Poll until `running` clears or every receiver is gone.
    pub async fn run(mut self, running: Arc<AtomicBool>) {
        debug!("watching {} every {:?}", self.path.display(), self.interval);
        let mut ticker = tokio::time::interval(self.interval);
        while running.load(Ordering::SeqCst) && !self.tx.is_closed() {
            ticker.tick().await;
            self.poll();
        }
    }
}
