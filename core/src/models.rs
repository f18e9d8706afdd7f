use std::collections::BTreeMap;
use std::fmt;

use anyhow::{Result, bail};
use chrono::{DateTime, FixedOffset, Utc, Weekday};
use serde::{Deserialize, Serialize};

/// Ingredient id → bought flag.
pub type Checklist = BTreeMap<String, bool>;

pub const DEFAULT_HOUSEHOLD_ID: &str = "default-household";

// --- Reference data ---

/// Shopping categories in display order. The derived `Ord` is the order the
/// shopping list is sorted and grouped in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Meat,
    Fish,
    Grains,
    Vegetables,
    Fruits,
    DairyEggs,
    Canned,
    Sauces,
    Spices,
    Other,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Meat,
        Category::Fish,
        Category::Grains,
        Category::Vegetables,
        Category::Fruits,
        Category::DairyEggs,
        Category::Canned,
        Category::Sauces,
        Category::Spices,
        Category::Other,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Meat => "meat",
            Category::Fish => "fish",
            Category::Grains => "grains",
            Category::Vegetables => "vegetables",
            Category::Fruits => "fruits",
            Category::DairyEggs => "dairy_eggs",
            Category::Canned => "canned",
            Category::Sauces => "sauces",
            Category::Spices => "spices",
            Category::Other => "other",
        }
    }

    /// 1-based position in the display order.
    #[must_use]
    pub fn display_order(self) -> u8 {
        self as u8 + 1
    }

    pub fn parse(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == lower)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Invalid category '{s}'. Must be one of: {}",
                    Category::ALL.map(Category::as_str).join(", ")
                )
            })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub quantity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DishPart {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dish {
    pub garnish: DishPart,
    pub protein: DishPart,
    pub veggies: DishPart,
}

impl Dish {
    /// The three slots in display order: garnish, protein, veggies.
    #[must_use]
    pub fn parts(&self) -> [&DishPart; 3] {
        [&self.garnish, &self.protein, &self.veggies]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekMenu {
    pub id: String,
    pub title: String,
    /// Monday first.
    pub days: [Dish; 7],
}

impl WeekMenu {
    #[must_use]
    pub fn day(&self, day: DayId) -> &Dish {
        &self.days[day.as_index()]
    }

    pub fn iter_days(&self) -> impl Iterator<Item = (DayId, &Dish)> {
        DayId::all().zip(self.days.iter())
    }
}

// --- Bounded indices ---

/// Position in the four-week cycle, always 0..=3.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct WeekIndex(u8);

impl WeekIndex {
    pub const CYCLE_LEN: u8 = 4;

    pub fn new(value: u8) -> Result<Self> {
        if value >= Self::CYCLE_LEN {
            bail!(
                "Invalid week index {value}. Must be between 0 and {}",
                Self::CYCLE_LEN - 1
            );
        }
        Ok(Self(value))
    }

    /// Normalizes any signed week offset into the cycle.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn from_offset(offset: i64) -> Self {
        Self(offset.rem_euclid(i64::from(Self::CYCLE_LEN)) as u8)
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_index(self) -> usize {
        usize::from(self.0)
    }

    /// Human week number, 1..=4.
    #[must_use]
    pub fn ordinal(self) -> u8 {
        self.0 + 1
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self::from_offset(i64::from(self.0) + 1)
    }

    pub fn all() -> impl Iterator<Item = WeekIndex> {
        (0..Self::CYCLE_LEN).map(WeekIndex)
    }
}

impl TryFrom<u8> for WeekIndex {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<WeekIndex> for u8 {
    fn from(value: WeekIndex) -> Self {
        value.0
    }
}

impl fmt::Display for WeekIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// ISO day of week, Monday = 1 … Sunday = 7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct DayId(u8);

impl DayId {
    pub const MONDAY: DayId = DayId(1);
    pub const SUNDAY: DayId = DayId(7);

    pub fn new(value: u8) -> Result<Self> {
        if !(1..=7).contains(&value) {
            bail!("Invalid day {value}. Must be between 1 (Monday) and 7 (Sunday)");
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn get(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn as_index(self) -> usize {
        usize::from(self.0 - 1)
    }

    #[must_use]
    pub fn from_weekday(weekday: Weekday) -> Self {
        Self(weekday.number_from_monday() as u8)
    }

    pub fn all() -> impl Iterator<Item = DayId> {
        (1..=7).map(DayId)
    }
}

impl TryFrom<u8> for DayId {
    type Error = anyhow::Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<DayId> for u8 {
    fn from(value: DayId) -> Self {
        value.0
    }
}

// --- Application state ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Ru,
    En,
}

impl Language {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Ru => "ru",
            Language::En => "en",
        }
    }

    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "ru" => Ok(Language::Ru),
            "en" => Ok(Language::En),
            _ => bail!("Invalid language '{s}'. Must be one of: ru, en"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Menu,
    Shopping,
}

impl Tab {
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "menu" => Ok(Tab::Menu),
            "shopping" | "shop" => Ok(Tab::Shopping),
            _ => bail!("Invalid tab '{s}'. Must be one of: menu, shopping"),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Tab::Menu => "menu",
            Tab::Shopping => "shopping",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// ISO week number the cycle starts on.
    pub base_week: i32,
    pub show_navigation: bool,
    pub enable_sync: bool,
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub household_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_week: crate::week::DEFAULT_BASE_WEEK,
            show_navigation: false,
            enable_sync: false,
            language: Language::Ru,
            household_id: Some(DEFAULT_HOUSEHOLD_ID.to_string()),
        }
    }
}

/// Partial settings update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct SettingsUpdate {
    pub base_week: Option<i32>,
    pub show_navigation: Option<bool>,
    pub enable_sync: Option<bool>,
    pub language: Option<Language>,
    pub household_id: Option<String>,
}

impl SettingsUpdate {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.base_week.is_none()
            && self.show_navigation.is_none()
            && self.enable_sync.is_none()
            && self.language.is_none()
            && self.household_id.is_none()
    }
}

impl Settings {
    pub fn apply(&mut self, update: &SettingsUpdate) -> Result<()> {
        if let Some(week) = update.base_week {
            self.base_week = validate_base_week(week)?;
        }
        if let Some(v) = update.show_navigation {
            self.show_navigation = v;
        }
        if let Some(v) = update.enable_sync {
            self.enable_sync = v;
        }
        if let Some(lang) = update.language {
            self.language = lang;
        }
        if let Some(ref id) = update.household_id {
            let id = id.trim();
            if id.is_empty() {
                bail!("Household id must not be empty");
            }
            self.household_id = Some(id.to_string());
        }
        Ok(())
    }
}

pub fn validate_base_week(week: i32) -> Result<i32> {
    if !(1..=53).contains(&week) {
        bail!("Invalid base week {week}. Must be an ISO week number between 1 and 53");
    }
    Ok(week)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekState {
    pub week_index: WeekIndex,
    #[serde(default)]
    pub checklist: Checklist,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_reset_at: Option<DateTime<Utc>>,
}

impl WeekState {
    #[must_use]
    pub fn is_checked(&self, item_id: &str) -> bool {
        self.checklist.get(item_id).copied().unwrap_or(false)
    }
}

// --- Derived views ---

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekInfo {
    pub week_index: WeekIndex,
    pub iso_week: u32,
    pub start_date: DateTime<FixedOffset>,
    pub end_date: DateTime<FixedOffset>,
    pub title: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShoppingProgress {
    pub total: usize,
    pub completed: usize,
    pub percentage: u8,
}

impl ShoppingProgress {
    #[must_use]
    pub fn new(total: usize, completed: usize) -> Self {
        Self {
            total,
            completed,
            percentage: rounded_percentage(completed, total),
        }
    }

    #[must_use]
    pub fn remaining(&self) -> usize {
        self.total.saturating_sub(self.completed)
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// `round(100 * part / total)`, half away from zero, 0 for an empty total.
#[must_use]
pub fn rounded_percentage(part: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let pct = (part * 200 + total) / (total * 2);
    u8::try_from(pct).unwrap_or(u8::MAX)
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryGroup {
    pub category: Category,
    pub name: String,
    pub items: Vec<Ingredient>,
    pub checked: usize,
    pub total: usize,
}

impl CategoryGroup {
    #[must_use]
    pub fn percentage(&self) -> u8 {
        rounded_percentage(self.checked, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_week_index_range() {
        assert!(WeekIndex::new(0).is_ok());
        assert!(WeekIndex::new(3).is_ok());
        assert!(WeekIndex::new(4).is_err());
    }

    #[test]
    fn test_week_index_from_negative_offset() {
        assert_eq!(WeekIndex::from_offset(-1).get(), 3);
        assert_eq!(WeekIndex::from_offset(-4).get(), 0);
        assert_eq!(WeekIndex::from_offset(-37).get(), 3);
        assert_eq!(WeekIndex::from_offset(7).get(), 3);
    }

    #[test]
    fn test_week_index_next_wraps() {
        assert_eq!(WeekIndex::new(3).unwrap().next().get(), 0);
        assert_eq!(WeekIndex::new(1).unwrap().next().get(), 2);
    }

    #[test]
    fn test_week_index_serde_rejects_out_of_range() {
        assert!(serde_json::from_str::<WeekIndex>("2").is_ok());
        assert!(serde_json::from_str::<WeekIndex>("9").is_err());
    }

    #[test]
    fn test_day_id_bounds() {
        assert!(DayId::new(0).is_err());
        assert!(DayId::new(8).is_err());
        assert_eq!(DayId::new(7).unwrap().as_index(), 6);
        assert_eq!(DayId::all().count(), 7);
        assert_eq!(DayId::from_weekday(Weekday::Sun), DayId::SUNDAY);
    }

    #[test]
    fn test_category_order_matches_display_order() {
        let mut sorted = Category::ALL;
        sorted.sort();
        assert_eq!(sorted, Category::ALL);
        assert_eq!(Category::Meat.display_order(), 1);
        assert_eq!(Category::Other.display_order(), 10);
    }

    #[test]
    fn test_category_parse() {
        assert_eq!(Category::parse("dairy_eggs").unwrap(), Category::DairyEggs);
        assert_eq!(Category::parse(" Meat ").unwrap(), Category::Meat);
        assert!(Category::parse("candy").is_err());
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&Category::DairyEggs).unwrap();
        assert_eq!(json, "\"dairy_eggs\"");
    }

    #[test]
    fn test_settings_defaults() {
        let s = Settings::default();
        assert_eq!(s.base_week, 38);
        assert!(!s.show_navigation);
        assert!(!s.enable_sync);
        assert_eq!(s.language, Language::Ru);
        assert_eq!(s.household_id.as_deref(), Some(DEFAULT_HOUSEHOLD_ID));
    }

    #[test]
    fn test_settings_apply_partial() {
        let mut s = Settings::default();
        s.apply(&SettingsUpdate {
            base_week: Some(39),
            language: Some(Language::En),
            ..SettingsUpdate::default()
        })
        .unwrap();
        assert_eq!(s.base_week, 39);
        assert_eq!(s.language, Language::En);
        assert!(!s.enable_sync);
    }

    #[test]
    fn test_settings_apply_rejects_bad_week() {
        let mut s = Settings::default();
        assert!(
            s.apply(&SettingsUpdate {
                base_week: Some(54),
                ..SettingsUpdate::default()
            })
            .is_err()
        );
        assert_eq!(s.base_week, 38);
    }

    #[test]
    fn test_settings_apply_rejects_blank_household() {
        let mut s = Settings::default();
        let update = SettingsUpdate {
            household_id: Some("   ".to_string()),
            ..SettingsUpdate::default()
        };
        assert!(s.apply(&update).is_err());
    }

    #[test]
    fn test_language_and_tab_parse() {
        assert_eq!(Language::parse("EN").unwrap(), Language::En);
        assert!(Language::parse("de").is_err());
        assert_eq!(Tab::parse("shop").unwrap(), Tab::Shopping);
        assert!(Tab::parse("settings").is_err());
    }

    #[test]
    fn test_rounded_percentage() {
        assert_eq!(rounded_percentage(0, 0), 0);
        assert_eq!(rounded_percentage(0, 5), 0);
        assert_eq!(rounded_percentage(5, 5), 100);
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(1, 8), 13);
    }

    #[test]
    fn test_week_state_json_shape() {
        let mut state = WeekState::default();
        state.checklist.insert("rice".to_string(), true);
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["weekIndex"], 0);
        assert_eq!(json["checklist"]["rice"], true);
        assert!(json.get("lastResetAt").is_none());
    }
}
