//! Agent service wiring.
//!
//! Opens the movement model and the actuation backend, starts the
//! tracking worker, the config watcher and the prediction log, then
//! serves detection producers until stopped.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, error, info};

use tracklead_core::{ChannelSink, MovementModel, TrackError, TrackingLoop, latest_slot, open_backend};

use crate::config::AgentConfig;
use crate::ingest::DetectionServer;
use crate::watcher::ConfigWatcher;

/// Prediction notifications buffered for the log task.
const PREDICTION_BUFFER: usize = 64;

// ── AgentService ─────────────────────────────────────────────────

pub struct AgentService {
    config: AgentConfig,
    config_path: PathBuf,
    running: Arc<AtomicBool>,
}

impl AgentService {
    /// Create a service; `config_path` is watched for changes.
    pub fn new(config: AgentConfig, config_path: PathBuf) -> Self {
        Self {
            config,
            config_path,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Obtain a handle that can be used to stop the service from
    /// another task.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    /// Signal the service to stop.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Whether the service has not been stopped. True from creation,
    /// so a stop issued before [`run`](Self::run) is not lost.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Run until stopped.
    ///
    /// Fails before serving anything if the movement model, the
    /// backend or the ingest listener cannot be opened.
    pub async fn run(&self) -> Result<(), TrackError> {
        let result = self.serve().await;
        self.running.store(false, Ordering::SeqCst);
        info!("agent stopped");
        result
    }

    async fn serve(&self) -> Result<(), TrackError> {
        let model = MovementModel::open(self.config.movement.model, &self.config.movement.artifact)?;
        let actuator = open_backend(&self.config.to_backend_settings())?;

        let (slot_tx, slot_rx) = latest_slot();
        let server = match DetectionServer::bind(&self.config.network.listen, slot_tx).await {
            Ok(server) => server,
            Err(e) => {
                error!("cannot listen on {}: {e}", self.config.network.listen);
                return Err(e);
            }
        };

        let snapshot = self.config.to_tracking_config();
        let (cfg_tx, cfg_rx) = watch::channel(snapshot.clone());
        let (sink, mut predictions) = ChannelSink::new(PREDICTION_BUFFER);

        let mut worker = TrackingLoop::new(snapshot, model, actuator, slot_rx)
            .with_sink(Box::new(sink))
            .with_reload(cfg_rx);
        let worker_stop = worker.stop_handle();
        let worker_handle = tokio::spawn(async move {
            worker.run().await;
            worker.stats()
        });

        tokio::spawn(async move {
            while let Some((x, y)) = predictions.recv().await {
                debug!(x, y, "predicted target position");
            }
        });

        if self.config.reload.enabled {
            let watcher = ConfigWatcher::new(
                self.config_path.clone(),
                Duration::from_millis(self.config.reload.interval_ms.max(50)),
                cfg_tx,
            );
            tokio::spawn(watcher.run(Arc::clone(&self.running)));
        }

        server.run(Arc::clone(&self.running)).await;

        worker_stop.store(false, Ordering::SeqCst);
        match worker_handle.await {
            Ok(stats) => info!(
                "tracking worker finished: {} samples, {} detections, {} actuation errors, {} reloads",
                stats.samples, stats.detections, stats.actuation_errors, stats.reloads
            ),
            Err(e) => error!("tracking worker panicked: {e}"),
        }
        Ok(())
    }
}

// ── Tests ────────────────────────────────────────────────────────
