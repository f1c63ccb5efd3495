//! The tracking pipeline: latest-wins input slot, decision gates, and
//! the worker that drives filter → model → backend each cycle.
//!
//! ```text
//! producer ──submit──► [slot: 1] ──recv──► TrackingLoop
//!                                            │ TrackingFilter::predict
//!                                            │ MovementModel::convert
//!                                            │ gate::should_move ──► Actuator::move_by
//!                                            └ gate::plan_shots ───► Actuator::press / release
//! ```

pub mod gate;
pub mod slot;
pub mod worker;

pub use gate::{ShootAction, ShootPlan};
pub use slot::{Sample, SlotReceiver, SlotSender, latest_slot};
pub use worker::{CycleStats, TrackingLoop};
