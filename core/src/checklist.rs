//! Per-week checklist transitions. Every function takes the current
//! `WeekState` by reference and returns the next snapshot.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::models::{Ingredient, WeekState};
use crate::shopping::{checked_all, unchecked_all, week_ingredients};
use crate::week::{cycle_index, iso_week_of, should_reset_checklist};

/// How long a bulk check/uncheck can be reverted.
pub const UNDO_WINDOW_SECS: i64 = 5;

/// Flip one id. An id that was never tracked becomes checked.
#[must_use]
pub fn toggle(state: &WeekState, item_id: &str) -> WeekState {
    let mut next = state.clone();
    let entry = next.checklist.entry(item_id.to_string()).or_insert(false);
    *entry = !*entry;
    debug!(item = item_id, checked = *entry, "toggled checklist item");
    next
}

/// Mark every item of the current list as bought.
#[must_use]
pub fn check_all(state: &WeekState, items: &[Ingredient]) -> WeekState {
    WeekState {
        checklist: checked_all(items),
        ..state.clone()
    }
}

/// Unmark every item of the current list and stamp the reset time.
#[must_use]
pub fn reset_all(state: &WeekState, items: &[Ingredient], now: DateTime<Utc>) -> WeekState {
    WeekState {
        week_index: state.week_index,
        checklist: unchecked_all(items),
        last_reset_at: Some(now),
    }
}

/// Start a fresh checklist when the cycle has moved on since the last reset,
/// or when the stored week index no longer matches the calendar.
///
/// Returns `None` when nothing changes, so a second call at the same instant
/// is a no-op.
#[must_use]
pub fn check_and_reset_on_rollover(
    state: &WeekState,
    catalog: &Catalog,
    now: DateTime<Utc>,
    base_week: i32,
) -> Option<WeekState> {
    let current = cycle_index(iso_week_of(now), base_week);
    if !should_reset_checklist(state.last_reset_at, now, base_week) && state.week_index == current
    {
        return None;
    }

    let items = week_ingredients(catalog, catalog.menu(current));
    info!(
        from = %state.week_index,
        to = %current,
        items = items.len(),
        "week rolled over, checklist reset"
    );
    Some(WeekState {
        week_index: current,
        checklist: unchecked_all(&items),
        last_reset_at: Some(now),
    })
}

// --- Undo ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    CheckAll,
    ResetAll,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingUndo {
    pub action: BulkAction,
    pub previous: WeekState,
    pub expires_at: DateTime<Utc>,
}

/// Holds at most one revertible bulk action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoSlot {
    pending: Option<PendingUndo>,
}

impl UndoSlot {
    #[must_use]
    pub fn window() -> Duration {
        Duration::seconds(UNDO_WINDOW_SECS)
    }

    /// Remember `previous` as the state to restore; replaces anything pending.
    pub fn arm(&mut self, action: BulkAction, previous: WeekState, now: DateTime<Utc>) {
        self.pending = Some(PendingUndo {
            action,
            previous,
            expires_at: now + Self::window(),
        });
    }

    /// Pop the pending entry if its window is still open. An expired entry is
    /// dropped either way.
    pub fn take(&mut self, now: DateTime<Utc>) -> Option<PendingUndo> {
        let pending = self.pending.take()?;
        if now < pending.expires_at {
            Some(pending)
        } else {
            debug!(action = ?pending.action, "undo window expired");
            None
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub fn remaining(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.expires_at - now)
            .filter(|left| *left > Duration::zero())
    }

    #[must_use]
    pub fn pending_action(&self, now: DateTime<Utc>) -> Option<BulkAction> {
        self.remaining(now)?;
        self.pending.as_ref().map(|p| p.action)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::{Checklist, WeekIndex};

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    fn week_one_items(catalog: &Catalog) -> Vec<Ingredient> {
        week_ingredients(catalog, catalog.menu(WeekIndex::new(0).unwrap()))
    }

    #[test]
    fn test_toggle_flips_and_creates() {
        let state = WeekState::default();
        let once = toggle(&state, "rice");
        assert!(once.is_checked("rice"));
        let twice = toggle(&once, "rice");
        assert!(!twice.is_checked("rice"));
        assert_eq!(twice.checklist.get("rice"), Some(&false));
        // input snapshot untouched
        assert!(state.checklist.is_empty());
    }

    #[test]
    fn test_toggle_unknown_id_tracked() {
        let state = toggle(&WeekState::default(), "dragon-fruit");
        assert_eq!(state.checklist.get("dragon-fruit"), Some(&true));
    }

    #[test]
    fn test_check_all_covers_derived_list() {
        let catalog = Catalog::builtin();
        let items = week_one_items(&catalog);
        let state = check_all(&WeekState::default(), &items);
        assert_eq!(state.checklist.len(), items.len());
        assert!(items.iter().all(|i| state.is_checked(&i.id)));
    }

    #[test]
    fn test_reset_all_stamps_time() {
        let catalog = Catalog::builtin();
        let items = week_one_items(&catalog);
        let now = utc(2024, 9, 25, 12);
        let checked = check_all(&WeekState::default(), &items);
        let reset = reset_all(&checked, &items, now);
        assert!(items.iter().all(|i| !reset.is_checked(&i.id)));
        assert_eq!(reset.last_reset_at, Some(now));
    }

    #[test]
    fn test_rollover_first_run() {
        let catalog = Catalog::builtin();
        let now = utc(2024, 10, 2, 12); // week 40
        let next = check_and_reset_on_rollover(&WeekState::default(), &catalog, now, 39).unwrap();
        assert_eq!(next.week_index.get(), 1);
        assert_eq!(next.last_reset_at, Some(now));
        let expected = week_ingredients(&catalog, catalog.menu(next.week_index));
        assert_eq!(next.checklist.len(), expected.len());
        assert!(next.checklist.values().all(|v| !v));
    }

    #[test]
    fn test_rollover_idempotent() {
        let catalog = Catalog::builtin();
        let now = utc(2024, 10, 2, 12);
        let first = check_and_reset_on_rollover(&WeekState::default(), &catalog, now, 39).unwrap();
        assert!(check_and_reset_on_rollover(&first, &catalog, now, 39).is_none());
    }

    #[test]
    fn test_rollover_keeps_marks_within_week() {
        let catalog = Catalog::builtin();
        let monday = utc(2024, 9, 23, 8);
        let state = check_and_reset_on_rollover(&WeekState::default(), &catalog, monday, 39)
            .unwrap();
        let state = toggle(&state, "buckwheat");
        let friday = utc(2024, 9, 27, 8);
        assert!(check_and_reset_on_rollover(&state, &catalog, friday, 39).is_none());
    }

    #[test]
    fn test_rollover_on_new_week() {
        let catalog = Catalog::builtin();
        let mut checklist = Checklist::new();
        checklist.insert("buckwheat".to_string(), true);
        let state = WeekState {
            week_index: WeekIndex::new(0).unwrap(),
            checklist,
            last_reset_at: Some(utc(2024, 9, 23, 8)),
        };
        let next = check_and_reset_on_rollover(&state, &catalog, utc(2024, 9, 30, 8), 39).unwrap();
        assert_eq!(next.week_index.get(), 1);
        assert!(!next.is_checked("buckwheat"));
    }

    #[test]
    fn test_rollover_on_stale_week_index() {
        let catalog = Catalog::builtin();
        let now = utc(2024, 9, 25, 8);
        let state = WeekState {
            week_index: WeekIndex::new(2).unwrap(),
            checklist: Checklist::new(),
            last_reset_at: Some(now),
        };
        let next = check_and_reset_on_rollover(&state, &catalog, now, 39).unwrap();
        assert_eq!(next.week_index.get(), 0);
    }

    #[test]
    fn test_undo_within_window() {
        let now = utc(2024, 9, 25, 12);
        let previous = toggle(&WeekState::default(), "rice");
        let mut slot = UndoSlot::default();
        slot.arm(BulkAction::CheckAll, previous.clone(), now);
        assert_eq!(slot.pending_action(now), Some(BulkAction::CheckAll));
        let taken = slot.take(now + Duration::seconds(4)).unwrap();
        assert_eq!(taken.previous, previous);
        assert!(slot.is_empty());
    }

    #[test]
    fn test_undo_after_window() {
        let now = utc(2024, 9, 25, 12);
        let mut slot = UndoSlot::default();
        slot.arm(BulkAction::ResetAll, WeekState::default(), now);
        assert!(slot.remaining(now + Duration::seconds(5)).is_none());
        assert!(slot.take(now + Duration::seconds(5)).is_none());
        assert!(slot.is_empty());
    }

    #[test]
    fn test_undo_rearm_replaces() {
        let now = utc(2024, 9, 25, 12);
        let mut slot = UndoSlot::default();
        slot.arm(BulkAction::CheckAll, WeekState::default(), now);
        let second = toggle(&WeekState::default(), "rice");
        slot.arm(BulkAction::ResetAll, second.clone(), now + Duration::seconds(1));
        let taken = slot.take(now + Duration::seconds(2)).unwrap();
        assert_eq!(taken.action, BulkAction::ResetAll);
        assert_eq!(taken.previous, second);
        assert!(slot.take(now + Duration::seconds(2)).is_none());
    }

    #[test]
    fn test_undo_clear() {
        let now = utc(2024, 9, 25, 12);
        let mut slot = UndoSlot::default();
        slot.arm(BulkAction::CheckAll, WeekState::default(), now);
        slot.clear();
        assert!(slot.take(now).is_none());
    }
}
