//! Per-cycle move and fire decisions.
//!
//! Pure functions of the mode flags, the hotkey level and the scope
//! test, so every combination can be checked without a backend.

use crate::config::ModeFlags;

/// A button transition to dispatch this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShootAction {
    Press,
    Release,
}

/// Ordered button transitions for one cycle (at most four).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShootPlan {
    actions: [Option<ShootAction>; 4],
    len: usize,
}

impl ShootPlan {
    fn push(&mut self, action: ShootAction) {
        self.actions[self.len] = Some(action);
        self.len += 1;
    }

    pub fn actions(&self) -> impl Iterator<Item = ShootAction> + '_ {
        self.actions[..self.len].iter().flatten().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Whether the scope test should run, and its forced outcome.
///
/// Returns `None` when the test must be evaluated, otherwise the value
/// to use directly.
pub fn scope_override(modes: &ModeFlags) -> Option<bool> {
    if modes.force_fire {
        Some(true)
    } else if !(modes.auto_shoot || modes.triggerbot) {
        Some(false)
    } else {
        None
    }
}

/// Pointer motion is allowed with the hotkey held in plain aim mode, or
/// unconditionally in auto-aim mode.
pub fn should_move(modes: &ModeFlags, hotkey: bool) -> bool {
    (hotkey && !modes.auto_aim && !modes.triggerbot) || modes.auto_aim
}

/// Button transitions for this cycle.
///
/// The auto-shoot path is level driven: it presses while armed and in
/// scope, and releases as soon as either condition drops. The trigger
/// path presses on scope and releases when scope is lost. Both are
/// evaluated every cycle, auto-shoot first.
pub fn plan_shots(modes: &ModeFlags, hotkey: bool, in_scope: bool) -> ShootPlan {
    let mut plan = ShootPlan::default();

    if modes.auto_shoot && !modes.triggerbot {
        if (hotkey && in_scope) || (modes.auto_aim && in_scope) {
            plan.push(ShootAction::Press);
        }
        if !hotkey || !in_scope {
            plan.push(ShootAction::Release);
        }
    }

    let trigger_armed = modes.auto_shoot && modes.triggerbot;
    if (trigger_armed && in_scope) || (modes.auto_aim && in_scope) {
        plan.push(ShootAction::Press);
    }
    if trigger_armed && !in_scope {
        plan.push(ShootAction::Release);
    }

    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use ShootAction::{Press, Release};

    fn modes(auto_shoot: bool, triggerbot: bool, auto_aim: bool) -> ModeFlags {
        ModeFlags {
            auto_shoot,
            triggerbot,
            auto_aim,
            ..ModeFlags::default()
        }
    }

    fn shots(m: &ModeFlags, hotkey: bool, scope: bool) -> Vec<ShootAction> {
        plan_shots(m, hotkey, scope).actions().collect()
    }

    #[test]
    fn scope_test_only_when_shooting_modes_on() {
        assert_eq!(scope_override(&modes(false, false, true)), Some(false));
        assert_eq!(scope_override(&modes(true, false, false)), None);
        assert_eq!(scope_override(&modes(false, true, false)), None);

        let forced = ModeFlags {
            force_fire: true,
            ..ModeFlags::default()
        };
        assert_eq!(scope_override(&forced), Some(true));
    }

    #[test]
    fn move_gating() {
        let plain = ModeFlags::default();
        assert!(should_move(&plain, true));
        assert!(!should_move(&plain, false));

        // Trigger-only mode never moves on the hotkey.
        assert!(!should_move(&modes(false, true, false), true));

        // Auto-aim ignores the hotkey.
        assert!(should_move(&modes(false, false, true), false));
        assert!(should_move(&modes(false, true, true), false));
    }

    #[test]
    fn auto_shoot_released_hotkey_only_releases() {
        let m = modes(true, false, false);
        assert_eq!(shots(&m, false, true), vec![Release]);
        assert_eq!(shots(&m, false, false), vec![Release]);
    }

    #[test]
    fn auto_shoot_armed_in_scope_presses() {
        let m = modes(true, false, false);
        assert_eq!(shots(&m, true, true), vec![Press]);
        assert_eq!(shots(&m, true, false), vec![Release]);
    }

    #[test]
    fn auto_shoot_with_auto_aim() {
        let m = modes(true, false, true);
        // Auto-shoot presses then releases (hotkey up); trigger path presses.
        assert_eq!(shots(&m, false, true), vec![Press, Release, Press]);
        assert_eq!(shots(&m, true, true), vec![Press, Press]);
    }

    #[test]
    fn triggerbot_follows_scope() {
        let m = modes(true, true, false);
        assert_eq!(shots(&m, false, true), vec![Press]);
        assert_eq!(shots(&m, false, false), vec![Release]);
        assert_eq!(shots(&m, true, false), vec![Release]);
    }

    #[test]
    fn triggerbot_alone_never_fires() {
        let m = modes(false, true, false);
        assert!(plan_shots(&m, true, true).is_empty());
    }

    #[test]
    fn nothing_enabled_does_nothing() {
        assert!(plan_shots(&ModeFlags::default(), true, true).is_empty());
    }
}
