//! The tracking worker.
//!
//! Each cycle pulls the freshest sample from the slot and, for a real
//! detection, runs:
//!
//! 1. scope test (only when a shooting mode needs it)
//! 2. [`TrackingFilter::predict`]
//! 3. [`MovementModel::convert`]
//! 4. gated `move_by`
//! 5. gated press / release
//!
//! Arrow-key tuning and configuration reloads are applied before the
//! detection is processed, including for "no target" samples.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::watch;
use tracing::{debug, info, trace, warn};

use crate::actuator::Actuator;
use crate::config::TrackingConfig;
use crate::error::TrackError;
use crate::filter::TrackingFilter;
use crate::input::{KeyboardState, SystemKeyboard};
use crate::movement::MovementModel;
use crate::scope::detection_in_scope;
use crate::settings::{SettingsTuner, Tunables};
use crate::tracking::gate::{ShootAction, plan_shots, scope_override, should_move};
use crate::tracking::slot::{Sample, SlotReceiver};
use crate::types::{Detection, MouseButton};
use crate::visual::{NoopSink, PredictionSink};

/// Actuation failures after the first are logged at this interval.
const ERROR_LOG_EVERY: u64 = 500;

/// Counters kept by the worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleStats {
    /// Samples taken from the slot.
    pub samples: u64,
    /// Samples that carried a detection.
    pub detections: u64,
    /// Backend calls that returned an error.
    pub actuation_errors: u64,
    /// Configuration snapshots applied after construction.
    pub reloads: u64,
}

// ── TrackingLoop ─────────────────────────────────────────────────

pub struct TrackingLoop {
    config: TrackingConfig,
    filter: TrackingFilter,
    model: MovementModel,
    actuator: Box<dyn Actuator>,
    keyboard: Box<dyn KeyboardState>,
    sink: Box<dyn PredictionSink>,
    tuner: SettingsTuner,
    slot: SlotReceiver,
    reload: Option<watch::Receiver<TrackingConfig>>,
    running: Arc<AtomicBool>,
    stats: CycleStats,
}

impl TrackingLoop {
    /// Create a worker reading the OS keyboard and discarding predictions.
    pub fn new(
        config: TrackingConfig,
        model: MovementModel,
        actuator: Box<dyn Actuator>,
        slot: SlotReceiver,
    ) -> Self {
        Self {
            config,
            filter: TrackingFilter::new(),
            model,
            actuator,
            keyboard: Box::new(SystemKeyboard::new()),
            sink: Box::new(NoopSink),
            tuner: SettingsTuner::new(),
            slot,
            reload: None,
            running: Arc::new(AtomicBool::new(true)),
            stats: CycleStats::default(),
        }
    }

    /// Replace the key-state source.
    pub fn with_keyboard(mut self, keyboard: Box<dyn KeyboardState>) -> Self {
        self.keyboard = keyboard;
        self
    }

    /// Replace the prediction sink.
    pub fn with_sink(mut self, sink: Box<dyn PredictionSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Apply snapshots published on `rx` at the start of each cycle.
    pub fn with_reload(mut self, rx: watch::Receiver<TrackingConfig>) -> Self {
        self.reload = Some(rx);
        self
    }

    /// A cloneable handle that stops [`run`](Self::run) when cleared.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn stats(&self) -> CycleStats {
        self.stats
    }

    pub fn tunables(&self) -> &Tunables {
        &self.config.tunables
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// Replace the configuration snapshot. Filter state is kept.
    pub fn update_settings(&mut self, config: TrackingConfig) {
        debug!(
            "settings updated: {}x{} dpi={} sensitivity={} fov={}x{}",
            config.geometry.width,
            config.geometry.height,
            config.tunables.dpi,
            config.tunables.sensitivity,
            config.tunables.fov_x,
            config.tunables.fov_y
        );
        self.config = config;
    }

    /// Process samples until the stop handle is cleared. Returns at
    /// once if it was cleared before the call.
    pub async fn run(&mut self) {
        info!(
            "tracking loop started (backend: {}, model: {:?})",
            self.actuator.name(),
            self.model.kind()
        );

        while self.running.load(Ordering::SeqCst) {
            let sample = tokio::select! {
                sample = self.slot.recv() => sample,
                _ = Self::wait_for_stop(&self.running) => break,
            };
            self.process(sample);
        }

        self.running.store(false, Ordering::SeqCst);
        info!(
            "tracking loop stopped after {} samples ({} dropped)",
            self.stats.samples,
            self.slot.dropped()
        );
    }

    /// Run one cycle for `sample`.
    pub fn process(&mut self, sample: Sample) {
        self.stats.samples += 1;

        if self.config.modes.arrow_tuning {
            self.tuner.poll(&*self.keyboard, &mut self.config.tunables);
        }
        self.apply_pending_reload();

        if let Some(detection) = sample {
            self.stats.detections += 1;
            self.cycle(&detection);
        }
    }

    // ── Internal ─────────────────────────────────────────────────

    fn apply_pending_reload(&mut self) {
        let Some(rx) = self.reload.as_mut() else {
            return;
        };
        if !rx.has_changed().unwrap_or(false) {
            return;
        }
        let snapshot = rx.borrow_and_update().clone();
        self.stats.reloads += 1;
        self.update_settings(snapshot);
    }

    fn cycle(&mut self, detection: &Detection) {
        let modes = self.config.modes;

        let in_scope = scope_override(&modes)
            .unwrap_or_else(|| detection_in_scope(&self.config.geometry, detection));

        let (x, y) = self.filter.predict(detection.x, detection.y);
        if modes.show_prediction {
            self.sink.notify_prediction(x, y);
        }

        let motion = self
            .model
            .convert(x, y, &self.config.tunables, &self.config.geometry);
        let hotkey = self.config.hotkeys.is_active(&*self.keyboard);

        if should_move(&modes, hotkey) {
            if let Some((dx, dy)) = motion.to_device_units() {
                trace!("move ({dx}, {dy}) toward ({x:.1}, {y:.1})");
                let result = self.actuator.move_by(dx, dy);
                self.check("move", result);
            }
        }

        for action in plan_shots(&modes, hotkey, in_scope).actions() {
            let result = match action {
                ShootAction::Press => self.actuator.press(MouseButton::Left),
                ShootAction::Release => self.actuator.release(MouseButton::Left),
            };
            self.check("shoot", result);
        }
    }

    fn check(&mut self, op: &str, result: Result<(), TrackError>) {
        if let Err(e) = result {
            self.stats.actuation_errors += 1;
            let n = self.stats.actuation_errors;
            if n == 1 || n % ERROR_LOG_EVERY == 0 {
                warn!("{op} via {} failed ({n} failures so far): {e}", self.actuator.name());
            } else {
                trace!("{op} failed: {e}");
            }
        }
    }

    /// Resolves when `running` becomes false.
    async fn wait_for_stop(running: &Arc<AtomicBool>) {
        loop {
            if !running.load(Ordering::SeqCst) {
                return;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModeFlags;
    use crate::input::{Hotkeys, VirtualKey};
    use crate::movement::AnalyticModel;
    use crate::tracking::slot::latest_slot;
    use crate::types::ScreenGeometry;
    use std::sync::Mutex;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Call {
        Move(i32, i32),
        Press,
        Release,
    }

    #[derive(Clone, Default)]
    struct Recorder {
        calls: Arc<Mutex<Vec<Call>>>,
        fail: bool,
    }

    impl Recorder {
        fn take(&self) -> Vec<Call> {
            std::mem::take(&mut *self.calls.lock().unwrap())
        }

        fn result(&self) -> Result<(), TrackError> {
            if self.fail {
                Err(TrackError::Backend("unplugged".into()))
            } else {
                Ok(())
            }
        }
    }

    impl Actuator for Recorder {
        fn move_by(&mut self, dx: i32, dy: i32) -> Result<(), TrackError> {
            self.calls.lock().unwrap().push(Call::Move(dx, dy));
            self.result()
        }
        fn press(&mut self, _button: MouseButton) -> Result<(), TrackError> {
            self.calls.lock().unwrap().push(Call::Press);
            self.result()
        }
        fn release(&mut self, _button: MouseButton) -> Result<(), TrackError> {
            self.calls.lock().unwrap().push(Call::Release);
            self.result()
        }
        fn name(&self) -> &'static str {
            "recorder"
        }
    }

    /// Hotkey permanently held or released.
    struct Hotkey(Arc<AtomicBool>);

    impl KeyboardState for Hotkey {
        fn is_down(&self, key: VirtualKey) -> bool {
            key == VirtualKey::RIGHT_MOUSE && self.0.load(Ordering::SeqCst)
        }
    }

    fn config(modes: ModeFlags) -> TrackingConfig {
        TrackingConfig {
            geometry: ScreenGeometry::new(1920.0, 1080.0),
            tunables: Tunables {
                dpi: 800.0,
                sensitivity: 1.0,
                fov_x: 90.0,
                fov_y: 60.0,
            },
            modes,
            hotkeys: Hotkeys::new(vec![VirtualKey::RIGHT_MOUSE], false),
        }
    }

    fn worker(modes: ModeFlags, held: bool) -> (TrackingLoop, Recorder, Arc<AtomicBool>) {
        let recorder = Recorder::default();
        let key = Arc::new(AtomicBool::new(held));
        let (_tx, rx) = latest_slot();
        let lp = TrackingLoop::new(
            config(modes),
            MovementModel::Analytic(AnalyticModel::new()),
            Box::new(recorder.clone()),
            rx,
        )
        .with_keyboard(Box::new(Hotkey(Arc::clone(&key))));
        (lp, recorder, key)
    }

    /// A target that stays put, so predictions equal observations
    /// from the second sample on.
    fn still(x: f64, y: f64) -> Sample {
        Some(Detection::new(x, y, 20.0, 40.0))
    }

    #[test]
    fn hotkey_released_means_no_motion() {
        let (mut lp, rec, _) = worker(ModeFlags::default(), false);
        lp.process(still(1152.0, 540.0));
        assert!(rec.take().is_empty());
    }

    #[test]
    fn hotkey_held_moves_toward_prediction() {
        let (mut lp, rec, _) = worker(ModeFlags::default(), true);
        lp.process(still(1152.0, 540.0));
        rec.take();
        lp.process(still(1152.0, 540.0));
        assert_eq!(rec.take(), vec![Call::Move(20, 0)]);
    }

    #[test]
    fn null_sample_skips_actuation() {
        let modes = ModeFlags {
            auto_aim: true,
            ..ModeFlags::default()
        };
        let (mut lp, rec, _) = worker(modes, true);
        lp.process(None);
        assert!(rec.take().is_empty());
        assert_eq!(lp.stats().samples, 1);
        assert_eq!(lp.stats().detections, 0);
    }

    #[test]
    fn auto_shoot_released_hotkey_releases_every_cycle() {
        let modes = ModeFlags {
            auto_shoot: true,
            ..ModeFlags::default()
        };
        let (mut lp, rec, _) = worker(modes, false);
        for _ in 0..3 {
            lp.process(still(960.0, 540.0));
        }
        assert_eq!(rec.take(), vec![Call::Release; 3]);
    }

    #[test]
    fn auto_shoot_held_on_target_moves_and_presses() {
        let modes = ModeFlags {
            auto_shoot: true,
            ..ModeFlags::default()
        };
        let (mut lp, rec, _) = worker(modes, true);
        lp.process(still(960.0, 540.0));
        rec.take();
        lp.process(still(960.0, 540.0));
        assert_eq!(rec.take(), vec![Call::Move(0, 0), Call::Press]);
    }

    #[test]
    fn triggerbot_fires_without_moving() {
        let modes = ModeFlags {
            auto_shoot: true,
            triggerbot: true,
            ..ModeFlags::default()
        };
        let (mut lp, rec, _) = worker(modes, true);
        lp.process(still(960.0, 540.0));
        assert_eq!(rec.take(), vec![Call::Press]);

        lp.process(still(100.0, 100.0));
        assert_eq!(rec.take(), vec![Call::Release]);
    }

    #[test]
    fn force_fire_overrides_scope() {
        let modes = ModeFlags {
            auto_shoot: true,
            triggerbot: true,
            force_fire: true,
            ..ModeFlags::default()
        };
        let (mut lp, rec, _) = worker(modes, false);
        lp.process(still(10.0, 10.0));
        assert_eq!(rec.take(), vec![Call::Press]);
    }

    #[test]
    fn arrow_tuning_changes_next_conversion() {
        struct UpArrow;
        impl KeyboardState for UpArrow {
            fn is_down(&self, key: VirtualKey) -> bool {
                key == VirtualKey::UP || key == VirtualKey::RIGHT_MOUSE
            }
        }

        let modes = ModeFlags {
            arrow_tuning: true,
            ..ModeFlags::default()
        };
        let (lp, _rec, _) = worker(modes, true);
        let mut lp = lp.with_keyboard(Box::new(UpArrow));
        lp.process(None);
        lp.process(None);
        assert_eq!(lp.tunables().dpi, 802.0);
    }

    #[test]
    fn tuning_disabled_leaves_settings_alone() {
        let (mut lp, _rec, _) = worker(ModeFlags::default(), true);
        lp.process(None);
        assert_eq!(lp.tunables().dpi, 800.0);
    }

    #[test]
    fn actuation_failure_does_not_stop_cycles() {
        let recorder = Recorder {
            fail: true,
            ..Recorder::default()
        };
        let (_tx, rx) = latest_slot();
        let mut lp = TrackingLoop::new(
            config(ModeFlags {
                auto_aim: true,
                ..ModeFlags::default()
            }),
            MovementModel::Analytic(AnalyticModel::new()),
            Box::new(recorder.clone()),
            rx,
        );
        lp.process(still(1000.0, 500.0));
        lp.process(still(1000.0, 500.0));
        assert_eq!(recorder.take().len(), 2);
        assert_eq!(lp.stats().actuation_errors, 2);
    }

    #[test]
    fn reload_applies_before_detection() {
        let (tx, rx) = watch::channel(config(ModeFlags::default()));
        let (mut lp, rec, _) = worker(ModeFlags::default(), true);
        lp = lp.with_reload(rx);

        let mut next = config(ModeFlags::default());
        next.tunables.sensitivity = 2.0;
        tx.send(next).unwrap();

        lp.process(still(1152.0, 540.0));
        rec.take();
        lp.process(still(1152.0, 540.0));
        assert_eq!(rec.take(), vec![Call::Move(10, 0)]);
        assert_eq!(lp.stats().reloads, 1);
    }

    #[test]
    fn prediction_sink_sees_predicted_position() {
        let (sink, mut rx) = crate::visual::ChannelSink::new(4);
        let modes = ModeFlags {
            show_prediction: true,
            ..ModeFlags::default()
        };
        let (lp, _rec, _) = worker(modes, false);
        let mut lp = lp.with_sink(Box::new(sink));
        lp.process(still(100.0, 50.0));
        lp.process(still(110.0, 50.0));
        assert_eq!(rx.try_recv().unwrap(), (200.0, 100.0));
        assert_eq!(rx.try_recv().unwrap(), (120.0, 50.0));
    }
}
