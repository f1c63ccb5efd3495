//! Integration tests: a real `TrackingLoop` task fed through the
//! latest-wins slot, with a recording backend.

use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::watch;
use tracklead_core::movement::AnalyticModel;
use tracklead_core::{
    Actuator, Detection, Hotkeys, KeyboardState, ModeFlags, MouseButton, MovementModel,
    ScreenGeometry, TrackError, TrackingConfig, TrackingLoop, Tunables, VirtualKey, latest_slot,
};

// ── Helpers ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
enum Call {
    Move(i32, i32),
    Press,
    Release,
}

#[derive(Clone, Default)]
struct Recorder(Arc<Mutex<Vec<Call>>>);

impl Recorder {
    fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }
}

impl Actuator for Recorder {
    fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), TrackError> {
        self.0.lock().unwrap().push(Call::Move(dx, dy));
        Ok(())
    }
    fn press(&mut self, _button: MouseButton) -> Result<(), TrackError> {
        self.0.lock().unwrap().push(Call::Press);
        Ok(())
    }
    fn release(&mut self, _button: MouseButton) -> Result<(), TrackError> {
        self.0.lock().unwrap().push(Call::Release);
        Ok(())
    }
    fn name(&self) -> &'static str {
        "recorder"
    }
}

struct NothingPressed;

impl KeyboardState for NothingPressed {
    fn is_down(&self, _key: VirtualKey) -> bool {
        false
    }
}

fn auto_aim_config() -> TrackingConfig {
    TrackingConfig {
        geometry: ScreenGeometry::new(1920.0, 1080.0),
        tunables: Tunables {
            dpi: 800.0,
            sensitivity: 1.0,
            fov_x: 90.0,
            fov_y: 60.0,
        },
        modes: ModeFlags {
            auto_aim: true,
            ..ModeFlags::default()
        },
        hotkeys: Hotkeys::new(vec![VirtualKey::RIGHT_MOUSE], false),
    }
}

/// Poll `cond` until it holds or five seconds pass.
async fn wait_until(cond: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while !cond() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("timeout");
}

// ── Latest-wins delivery ─────────────────────────────────────────

#[tokio::test]
async fn test_only_latest_detection_is_processed() {
    let recorder = Recorder::default();
    let (tx, rx) = latest_slot();

    // Both land before the worker exists; the first is discarded.
    tx.submit(Some(Detection::new(1152.0, 540.0, 10.0, 10.0)));
    tx.submit(Some(Detection::new(1344.0, 540.0, 10.0, 10.0)));
    assert_eq!(tx.dropped(), 1);

    let mut lp = TrackingLoop::new(
        auto_aim_config(),
        MovementModel::Analytic(AnalyticModel::new()),
        Box::new(recorder.clone()),
        rx,
    )
    .with_keyboard(Box::new(NothingPressed));
    let stop = lp.stop_handle();

    let handle = tokio::spawn(async move {
        lp.run().await;
        lp
    });

    wait_until(|| !recorder.calls().is_empty()).await;
    // Give the worker a chance to (wrongly) process a second item.
    tokio::time::sleep(Duration::from_millis(50)).await;
    stop.store(false, Ordering::SeqCst);

    let lp = tokio::time::timeout(Duration::from_secs(5), handle)
        .await
        .expect("timeout")
        .unwrap();

    // Prediction from the origin: (2 * 1344, 2 * 540) → 81° / 30° off centre.
    assert_eq!(recorder.calls(), vec![Call::Move(180, 66)]);
    assert_eq!(lp.stats().detections, 1);
}

#[tokio::test]
async fn test_null_detections_keep_loop_alive() {
    let recorder = Recorder::default();
    let (tx, rx) = latest_slot();

    let mut lp = TrackingLoop::new(
        auto_aim_config(),
        MovementModel::Analytic(AnalyticModel::new()),
        Box::new(recorder.clone()),
        rx,
    )
    .with_keyboard(Box::new(NothingPressed));
    let stop = lp.stop_handle();
    let handle = tokio::spawn(async move {
        lp.run().await;
        lp
    });

    tx.submit(None);
    tokio::time::sleep(Duration::from_millis(20)).await;
    tx.submit(Some(Detection::new(960.0, 540.0, 10.0, 10.0)));
    wait_until(|| !recorder.calls().is_empty()).await;

    stop.store(false, Ordering::SeqCst);
    let lp = handle.await.unwrap();

    assert_eq!(lp.stats().detections, 1);
    assert!(lp.stats().samples >= 1);
}

// ── Stopping ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_stop_before_run_is_honoured() {
    let recorder = Recorder::default();
    let (tx, rx) = latest_slot();
    tx.submit(Some(Detection::new(1152.0, 540.0, 10.0, 10.0)));

    let mut lp = TrackingLoop::new(
        auto_aim_config(),
        MovementModel::Analytic(AnalyticModel::new()),
        Box::new(recorder.clone()),
        rx,
    )
    .with_keyboard(Box::new(NothingPressed));
    lp.stop_handle().store(false, Ordering::SeqCst);

    tokio::time::timeout(Duration::from_secs(1), lp.run())
        .await
        .expect("run ignored a stop issued before it started");

    assert_eq!(lp.stats().samples, 0);
    assert!(recorder.calls().is_empty());
}

// ── Reload ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_reloaded_snapshot_reaches_running_loop() {
    let recorder = Recorder::default();
    let (tx, rx) = latest_slot();
    let (cfg_tx, cfg_rx) = watch::channel(auto_aim_config());

    let mut lp = TrackingLoop::new(
        auto_aim_config(),
        MovementModel::Analytic(AnalyticModel::new()),
        Box::new(recorder.clone()),
        rx,
    )
    .with_keyboard(Box::new(NothingPressed))
    .with_reload(cfg_rx);
    let stop = lp.stop_handle();
    let handle = tokio::spawn(async move {
        lp.run().await;
        lp
    });

    // Switch to trigger mode: no motion, fire on scope.
    let mut next = auto_aim_config();
    next.modes = ModeFlags {
        auto_shoot: true,
        triggerbot: true,
        ..ModeFlags::default()
    };
    cfg_tx.send(next).unwrap();

    tx.submit(Some(Detection::new(960.0, 540.0, 10.0, 10.0)));
    wait_until(|| !recorder.calls().is_empty()).await;

    stop.store(false, Ordering::SeqCst);
    let lp = handle.await.unwrap();

    assert_eq!(recorder.calls(), vec![Call::Press]);
    assert_eq!(lp.stats().reloads, 1);
    assert!(lp.config().modes.triggerbot);
}
