use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use crate::bridge::{self, HostBridge, MainAction, MainButtonIntent};
use crate::catalog::Catalog;
use crate::checklist::{self, BulkAction, UndoSlot};
use crate::clock::{Clock, SystemClock};
use crate::models::{
    CategoryGroup, DayId, Ingredient, Settings, SettingsUpdate, ShoppingProgress, Tab, WeekIndex,
    WeekInfo, WeekMenu, WeekState,
};
use crate::shopping;
use crate::store::{
    self, APP_STATE_KEY, KeyValueStore, MemoryStore, PersistedRecord, PersistedState, UNDO_KEY,
    storage_key,
};
use crate::week;

/// Application state container. Owns settings, the week checklist, the
/// current tab and the selected week; every action persists the result
/// through the injected store. Storage failures are logged and never fatal.
pub struct MenuService {
    store: Box<dyn KeyValueStore>,
    clock: Box<dyn Clock>,
    catalog: Catalog,
    household_id: String,
    state: PersistedState,
    undo: UndoSlot,
}

impl MenuService {
    /// Load the household's record, falling back to defaults when it is
    /// missing, unreadable or the store is down.
    pub fn open(store: Box<dyn KeyValueStore>, clock: Box<dyn Clock>, household_id: &str) -> Self {
        let state = load_state(store.as_ref(), household_id);
        let undo = match store::load_json::<UndoSlot>(
            store.as_ref(),
            &storage_key(household_id, UNDO_KEY),
        ) {
            Ok(slot) => slot.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "could not load pending undo, dropping it");
                UndoSlot::default()
            }
        };

        Self {
            store,
            clock,
            catalog: Catalog::builtin(),
            household_id: household_id.to_string(),
            state,
            undo,
        }
    }

    /// Volatile service on the system clock; nothing survives the process.
    #[must_use]
    pub fn in_memory(household_id: &str) -> Self {
        Self::open(
            Box::new(MemoryStore::new()),
            Box::new(SystemClock),
            household_id,
        )
    }

    #[must_use]
    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    // --- Lifecycle ---

    /// Run at start-up. Returns whether the checklist was reset.
    pub fn initialize(&mut self) -> bool {
        self.check_and_reset_week()
    }

    pub fn check_and_reset_week(&mut self) -> bool {
        let now = self.clock.now();
        let Some(next) = checklist::check_and_reset_on_rollover(
            &self.state.week_state,
            &self.catalog,
            now,
            self.state.settings.base_week,
        ) else {
            return false;
        };
        self.state.week_state = next;
        self.undo.clear();
        self.persist();
        true
    }

    // --- Actions ---

    pub fn set_current_tab(&mut self, tab: Tab) {
        if self.state.current_tab != tab {
            debug!(tab = tab.as_str(), "switching tab");
            self.state.current_tab = tab;
            self.persist();
        }
    }

    /// Apply a partial update. Invalid values leave settings untouched.
    pub fn update_settings(&mut self, update: &SettingsUpdate) -> anyhow::Result<()> {
        let mut next = self.state.settings.clone();
        next.apply(update)?;
        if next != self.state.settings {
            info!(base_week = next.base_week, language = next.language.as_str(), "settings updated");
            self.state.settings = next;
            self.persist();
        }
        Ok(())
    }

    /// Pin the shopping list to a cycle week; `None` follows the tracked week.
    pub fn select_week(&mut self, index: Option<WeekIndex>) {
        self.state.selected_week_index = index;
        self.persist();
    }

    /// Flip one item and return its new state.
    pub fn toggle_item(&mut self, item_id: &str) -> bool {
        self.state.week_state = checklist::toggle(&self.state.week_state, item_id);
        self.persist();
        self.state.week_state.is_checked(item_id)
    }

    pub fn check_all(&mut self) {
        let items = self.current_shopping_items();
        let next = checklist::check_all(&self.state.week_state, &items);
        self.apply_bulk(BulkAction::CheckAll, next);
    }

    pub fn reset_all(&mut self) {
        let items = self.current_shopping_items();
        let next = checklist::reset_all(&self.state.week_state, &items, self.clock.now());
        self.apply_bulk(BulkAction::ResetAll, next);
    }

    fn apply_bulk(&mut self, action: BulkAction, next: WeekState) {
        let previous = std::mem::replace(&mut self.state.week_state, next);
        self.undo.arm(action, previous, self.clock.now());
        debug!(?action, "bulk checklist change, undo armed");
        self.persist();
    }

    /// Revert the last bulk action if its window is still open.
    pub fn undo_last(&mut self) -> Option<BulkAction> {
        let now = self.clock.now();
        let taken = self.undo.take(now);
        if let Some(ref pending) = taken {
            self.state.week_state = pending.previous.clone();
            debug!(action = ?pending.action, "bulk change undone");
        }
        self.persist();
        taken.map(|p| p.action)
    }

    #[must_use]
    pub fn undo_remaining(&self) -> Option<Duration> {
        self.undo.remaining(self.clock.now())
    }

    #[must_use]
    pub fn pending_undo(&self) -> Option<BulkAction> {
        self.undo.pending_action(self.clock.now())
    }

    /// Press the primary button: fire its haptic, then run its action.
    pub fn activate_main_button(&mut self, host: &mut dyn HostBridge) -> MainAction {
        let intent = self.main_button_intent();
        host.haptic(intent.haptic);
        match intent.action {
            MainAction::OpenShoppingList => self.set_current_tab(Tab::Shopping),
            MainAction::CheckAll => self.check_all(),
            MainAction::ResetAll => self.reset_all(),
        }
        bridge::show_intent(host, &self.main_button_intent());
        intent.action
    }

    // --- Computed views ---

    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    #[must_use]
    pub fn current_week(&self) -> WeekInfo {
        week::current_week_info_localized(
            self.clock.now(),
            self.state.settings.base_week,
            self.state.settings.language,
        )
    }

    #[must_use]
    pub fn week_info(&self, index: WeekIndex) -> WeekInfo {
        week::week_info_by_index_localized(
            index,
            self.clock.now(),
            self.state.settings.base_week,
            self.state.settings.language,
        )
    }

    /// Suggested shopping week: next week once it is Sunday.
    #[must_use]
    pub fn initial_week_index(&self) -> WeekIndex {
        week::initial_week_index(self.clock.now(), self.state.settings.base_week)
    }

    #[must_use]
    pub fn today(&self) -> DayId {
        week::current_day_of_week(self.clock.now())
    }

    #[must_use]
    pub fn shopping_week_index(&self) -> WeekIndex {
        self.state
            .selected_week_index
            .unwrap_or(self.state.week_state.week_index)
    }

    #[must_use]
    pub fn current_week_menu(&self) -> &WeekMenu {
        self.catalog.menu(self.state.week_state.week_index)
    }

    #[must_use]
    pub fn menu_for(&self, index: WeekIndex) -> &WeekMenu {
        self.catalog.menu(index)
    }

    #[must_use]
    pub fn current_shopping_items(&self) -> Vec<Ingredient> {
        self.shopping_items_for(self.shopping_week_index())
    }

    #[must_use]
    pub fn shopping_items_for(&self, index: WeekIndex) -> Vec<Ingredient> {
        shopping::week_ingredients(&self.catalog, self.catalog.menu(index))
    }

    #[must_use]
    pub fn grouped_items(&self) -> Vec<CategoryGroup> {
        self.grouped_items_for(self.shopping_week_index())
    }

    #[must_use]
    pub fn grouped_items_for(&self, index: WeekIndex) -> Vec<CategoryGroup> {
        shopping::group_by_category(
            &self.shopping_items_for(index),
            &self.state.week_state.checklist,
            self.state.settings.language,
        )
    }

    #[must_use]
    pub fn progress(&self) -> ShoppingProgress {
        self.progress_for(self.shopping_week_index())
    }

    #[must_use]
    pub fn progress_for(&self, index: WeekIndex) -> ShoppingProgress {
        shopping::progress(
            &self.shopping_items_for(index),
            &self.state.week_state.checklist,
        )
    }

    #[must_use]
    pub fn main_button_intent(&self) -> MainButtonIntent {
        bridge::main_button_intent(
            self.state.current_tab,
            &self.progress(),
            self.state.settings.language,
        )
    }

    // --- Accessors ---

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn household_id(&self) -> &str {
        &self.household_id
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    #[must_use]
    pub fn week_state(&self) -> &WeekState {
        &self.state.week_state
    }

    #[must_use]
    pub fn current_tab(&self) -> Tab {
        self.state.current_tab
    }

    #[must_use]
    pub fn selected_week_index(&self) -> Option<WeekIndex> {
        self.state.selected_week_index
    }

    // --- Persistence ---

    fn persist(&self) {
        let key = storage_key(&self.household_id, APP_STATE_KEY);
        let saved = PersistedRecord::new(self.state.clone())
            .encode()
            .and_then(|bytes| self.store.save(&key, &bytes));
        if let Err(e) = saved {
            warn!(error = %e, key = %key, "failed to save state, keeping it in memory");
        }

        let undo_key = storage_key(&self.household_id, UNDO_KEY);
        let saved = if self.undo.is_empty() {
            self.store.remove(&undo_key)
        } else {
            store::save_json(self.store.as_ref(), &undo_key, &self.undo)
        };
        if let Err(e) = saved {
            warn!(error = %e, key = %undo_key, "failed to save pending undo");
        }
    }
}

fn load_state(store: &dyn KeyValueStore, household_id: &str) -> PersistedState {
    let key = storage_key(household_id, APP_STATE_KEY);
    match store.load(&key) {
        Ok(Some(bytes)) => match PersistedRecord::decode(&bytes) {
            Ok(record) => record.state,
            Err(e) => {
                warn!(error = %e, key = %key, "stored state is unreadable, starting fresh");
                PersistedState::default()
            }
        },
        Ok(None) => {
            debug!(key = %key, "no stored state, starting fresh");
            PersistedState::default()
        }
        Err(e) => {
            warn!(error = %e, key = %key, "could not load state, starting fresh");
            PersistedState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use chrono::TimeZone;

    use crate::bridge::{BridgeEvent, HapticKind, HeadlessBridge};
    use crate::clock::FixedClock;
    use crate::models::{DEFAULT_HOUSEHOLD_ID, Language};
    use crate::store::testing::FailingStore;

    // Wednesday of ISO week 39, 2024; default base week 38 gives cycle index 1.
    fn wednesday() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 9, 25, 12, 0, 0).unwrap()
    }

    struct Harness {
        store: Rc<MemoryStore>,
        clock: Rc<FixedClock>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                store: Rc::new(MemoryStore::new()),
                clock: Rc::new(FixedClock::new(wednesday())),
            }
        }

        fn open(&self) -> MenuService {
            let mut service = MenuService::open(
                Box::new(Rc::clone(&self.store)),
                Box::new(Rc::clone(&self.clock)),
                DEFAULT_HOUSEHOLD_ID,
            );
            service.initialize();
            service
        }
    }

    #[test]
    fn test_first_start_resets_to_current_week() {
        let h = Harness::new();
        let service = h.open();
        assert_eq!(service.week_state().week_index.get(), 1);
        assert_eq!(service.week_state().last_reset_at, Some(wednesday()));
        let items = service.current_shopping_items();
        assert_eq!(service.week_state().checklist.len(), items.len());
        assert_eq!(service.progress().completed, 0);
        assert!(
            h.store
                .load("famenu:default-household:appState")
                .unwrap()
                .is_some()
        );
    }

    #[test]
    fn test_initialize_idempotent() {
        let h = Harness::new();
        let mut service = h.open();
        let before = service.week_state().clone();
        assert!(!service.initialize());
        assert_eq!(service.week_state(), &before);
    }

    #[test]
    fn test_toggle_survives_reopen() {
        let h = Harness::new();
        let mut service = h.open();
        let id = service.current_shopping_items()[0].id.clone();
        assert!(service.toggle_item(&id));

        let reopened = h.open();
        assert!(reopened.week_state().is_checked(&id));
        assert_eq!(reopened.progress().completed, 1);
    }

    #[test]
    fn test_rollover_next_week() {
        let h = Harness::new();
        let mut service = h.open();
        service.check_all();
        assert!(service.progress().is_complete());

        h.clock.advance(Duration::weeks(1));
        assert!(service.check_and_reset_week());
        assert_eq!(service.week_state().week_index.get(), 2);
        assert_eq!(service.progress().completed, 0);
        assert!(service.pending_undo().is_none());
    }

    #[test]
    fn test_check_all_then_undo() {
        let h = Harness::new();
        let mut service = h.open();
        let before = service.week_state().clone();

        service.check_all();
        assert!(service.progress().is_complete());
        assert_eq!(service.pending_undo(), Some(BulkAction::CheckAll));

        h.clock.advance(Duration::seconds(3));
        assert_eq!(service.undo_last(), Some(BulkAction::CheckAll));
        assert_eq!(service.week_state(), &before);
        assert!(service.undo_last().is_none());
    }

    #[test]
    fn test_undo_expires() {
        let h = Harness::new();
        let mut service = h.open();
        service.check_all();
        h.clock.advance(Duration::seconds(6));
        assert!(service.undo_remaining().is_none());
        assert!(service.undo_last().is_none());
        assert!(service.progress().is_complete());
    }

    #[test]
    fn test_undo_survives_reopen_within_window() {
        let h = Harness::new();
        let mut service = h.open();
        service.check_all();
        drop(service);

        h.clock.advance(Duration::seconds(2));
        let mut reopened = h.open();
        assert_eq!(reopened.undo_last(), Some(BulkAction::CheckAll));
        assert_eq!(reopened.progress().completed, 0);
        assert!(h.store.load("famenu:default-household:undo").unwrap().is_none());
    }

    #[test]
    fn test_reset_all_stamps_and_unchecks() {
        let h = Harness::new();
        let mut service = h.open();
        service.check_all();
        h.clock.advance(Duration::hours(1));
        service.reset_all();
        assert_eq!(service.progress().completed, 0);
        assert_eq!(
            service.week_state().last_reset_at,
            Some(wednesday() + Duration::hours(1))
        );
        assert_eq!(service.pending_undo(), Some(BulkAction::ResetAll));
    }

    #[test]
    fn test_selected_week_drives_shopping_list() {
        let h = Harness::new();
        let mut service = h.open();
        let tracked = service.current_shopping_items();

        let other = WeekIndex::new(3).unwrap();
        service.select_week(Some(other));
        assert_eq!(service.shopping_week_index(), other);
        assert_eq!(
            service.current_shopping_items(),
            service.shopping_items_for(other)
        );
        assert_ne!(service.current_shopping_items(), tracked);

        service.select_week(None);
        assert_eq!(service.current_shopping_items(), tracked);
    }

    #[test]
    fn test_settings_update_persisted_and_validated() {
        let h = Harness::new();
        let mut service = h.open();
        service
            .update_settings(&SettingsUpdate {
                language: Some(Language::En),
                base_week: Some(39),
                ..SettingsUpdate::default()
            })
            .unwrap();
        assert!(
            service
                .update_settings(&SettingsUpdate {
                    base_week: Some(0),
                    ..SettingsUpdate::default()
                })
                .is_err()
        );

        let reopened = h.open();
        assert_eq!(reopened.settings().language, Language::En);
        assert_eq!(reopened.settings().base_week, 39);
        // base week moved, so the reopened service reset to the new index
        assert_eq!(reopened.week_state().week_index.get(), 0);
        assert!(reopened.current_week().title.starts_with("Week 1"));
    }

    #[test]
    fn test_tab_persisted() {
        let h = Harness::new();
        let mut service = h.open();
        assert_eq!(service.current_tab(), Tab::Menu);
        service.set_current_tab(Tab::Shopping);
        assert_eq!(h.open().current_tab(), Tab::Shopping);
    }

    #[test]
    fn test_corrupt_state_falls_back_to_defaults() {
        let h = Harness::new();
        h.store
            .save("famenu:default-household:appState", b"{broken")
            .unwrap();
        let service = h.open();
        assert_eq!(service.settings(), &Settings::default());
        assert_eq!(service.week_state().week_index.get(), 1);
    }

    #[test]
    fn test_failing_store_keeps_memory_state() {
        let clock = Rc::new(FixedClock::new(wednesday()));
        let mut service = MenuService::open(
            Box::new(FailingStore),
            Box::new(Rc::clone(&clock)),
            DEFAULT_HOUSEHOLD_ID,
        );
        assert!(service.initialize());
        assert!(service.toggle_item("rice"));
        service.check_all();
        assert!(service.progress().is_complete());
    }

    #[test]
    fn test_households_are_isolated() {
        let h = Harness::new();
        let mut a = h.open();
        a.set_current_tab(Tab::Shopping);

        let b = MenuService::open(
            Box::new(Rc::clone(&h.store)),
            Box::new(Rc::clone(&h.clock)),
            "other-household",
        );
        assert_eq!(b.current_tab(), Tab::Menu);
    }

    #[test]
    fn test_sunday_suggests_next_week() {
        let h = Harness::new();
        h.clock
            .set(Utc.with_ymd_and_hms(2024, 9, 29, 12, 0, 0).unwrap());
        let service = h.open();
        assert_eq!(service.today(), DayId::SUNDAY);
        assert_eq!(service.initial_week_index(), service.week_state().week_index.next());
    }

    #[test]
    fn test_main_button_flow() {
        let h = Harness::new();
        let mut service = h.open();
        let mut host = HeadlessBridge::default();

        assert_eq!(
            service.activate_main_button(&mut host),
            MainAction::OpenShoppingList
        );
        assert_eq!(service.current_tab(), Tab::Shopping);

        assert_eq!(service.activate_main_button(&mut host), MainAction::CheckAll);
        assert!(service.progress().is_complete());
        assert_eq!(service.main_button_intent().action, MainAction::ResetAll);

        assert_eq!(service.activate_main_button(&mut host), MainAction::ResetAll);
        assert_eq!(service.progress().completed, 0);

        let haptics: Vec<HapticKind> = host
            .events()
            .iter()
            .filter_map(|e| match e {
                BridgeEvent::Haptic(kind) => Some(*kind),
                _ => None,
            })
            .collect();
        assert_eq!(
            haptics,
            vec![HapticKind::Light, HapticKind::Success, HapticKind::Medium]
        );
    }

    #[test]
    fn test_grouped_items_match_progress() {
        let h = Harness::new();
        let mut service = h.open();
        let id = service.current_shopping_items()[0].id.clone();
        service.toggle_item(&id);
        service.toggle_item("not-on-the-list");

        let groups = service.grouped_items();
        let checked: usize = groups.iter().map(|g| g.checked).sum();
        assert_eq!(checked, 1);
        assert_eq!(service.progress().completed, 1);
    }
}
