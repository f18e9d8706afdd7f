//! Seam to the host shell that displays the menu: primary and back buttons,
//! haptics, theming and confirm prompts. Core logic never calls into it; the
//! presentation layer does.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::locale::{Label, label};
use crate::models::{Language, ShoppingProgress, Tab};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HapticKind {
    Light,
    Medium,
    Heavy,
    Selection,
    Success,
    Error,
    Warning,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

/// The seven theme colors the host pushes on start and on every theme change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePalette {
    pub bg_color: String,
    pub text_color: String,
    pub hint_color: String,
    pub link_color: String,
    pub button_color: String,
    pub button_text_color: String,
    pub secondary_bg_color: String,
}

impl Default for ThemePalette {
    fn default() -> Self {
        Self {
            bg_color: "#ffffff".to_string(),
            text_color: "#000000".to_string(),
            hint_color: "#999999".to_string(),
            link_color: "#168dcd".to_string(),
            button_color: "#40a7e3".to_string(),
            button_text_color: "#ffffff".to_string(),
            secondary_bg_color: "#f1f1f1".to_string(),
        }
    }
}

impl ThemePalette {
    /// `--tg-*` custom properties in a fixed order.
    #[must_use]
    pub fn css_variables(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("--tg-bg-color", self.bg_color.as_str()),
            ("--tg-text-color", self.text_color.as_str()),
            ("--tg-hint-color", self.hint_color.as_str()),
            ("--tg-link-color", self.link_color.as_str()),
            ("--tg-button-color", self.button_color.as_str()),
            ("--tg-button-text-color", self.button_text_color.as_str()),
            ("--tg-secondary-bg-color", self.secondary_bg_color.as_str()),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PopupChoice {
    Ok,
    Cancel,
}

/// Host shell operations. Haptics and button updates are fire-and-forget.
pub trait HostBridge {
    fn ready(&mut self);
    fn expand(&mut self);
    fn close(&mut self);

    fn show_main_button(&mut self, label: &str);
    fn hide_main_button(&mut self);
    fn update_main_button(&mut self, label: &str, enabled: bool);

    fn show_back_button(&mut self);
    fn hide_back_button(&mut self);

    fn haptic(&mut self, kind: HapticKind);
    fn theme(&self) -> ThemePalette;
    fn color_scheme(&self) -> ColorScheme {
        ColorScheme::Light
    }

    fn confirm(&mut self, title: Option<&str>, message: &str) -> PopupChoice;
}

// --- Main button ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MainAction {
    OpenShoppingList,
    CheckAll,
    ResetAll,
}

/// What the primary button shows and does for the current screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MainButtonIntent {
    pub label: String,
    pub haptic: HapticKind,
    pub action: MainAction,
    pub enabled: bool,
}

#[must_use]
pub fn main_button_intent(
    tab: Tab,
    progress: &ShoppingProgress,
    lang: Language,
) -> MainButtonIntent {
    let (text, haptic, action) = match tab {
        Tab::Menu => (
            Label::OpenShoppingList,
            HapticKind::Light,
            MainAction::OpenShoppingList,
        ),
        Tab::Shopping if progress.is_complete() => {
            (Label::ResetMarks, HapticKind::Medium, MainAction::ResetAll)
        }
        Tab::Shopping => (Label::MarkAllBought, HapticKind::Success, MainAction::CheckAll),
    };
    MainButtonIntent {
        label: label(text, lang).to_string(),
        haptic,
        action,
        enabled: tab == Tab::Menu || progress.total > 0,
    }
}

/// Push an intent to the host's primary button.
pub fn show_intent(bridge: &mut dyn HostBridge, intent: &MainButtonIntent) {
    bridge.show_main_button(&intent.label);
    if !intent.enabled {
        bridge.update_main_button(&intent.label, false);
    }
}

// --- Headless ---

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeEvent {
    Ready,
    Expand,
    Close,
    MainButtonShown(String),
    MainButtonHidden,
    MainButtonUpdated(String, bool),
    BackButtonShown,
    BackButtonHidden,
    Haptic(HapticKind),
    Confirm(String),
}

/// Bridge with no host behind it. Records every call and answers confirm
/// prompts with a preset choice.
#[derive(Debug)]
pub struct HeadlessBridge {
    answer: PopupChoice,
    theme: ThemePalette,
    events: Vec<BridgeEvent>,
}

impl HeadlessBridge {
    #[must_use]
    pub fn new(answer: PopupChoice) -> Self {
        Self {
            answer,
            theme: ThemePalette::default(),
            events: Vec::new(),
        }
    }

    #[must_use]
    pub fn events(&self) -> &[BridgeEvent] {
        &self.events
    }

    fn record(&mut self, event: BridgeEvent) {
        debug!(?event, "host bridge");
        self.events.push(event);
    }
}

impl Default for HeadlessBridge {
    fn default() -> Self {
        Self::new(PopupChoice::Ok)
    }
}

impl HostBridge for HeadlessBridge {
    fn ready(&mut self) {
        self.record(BridgeEvent::Ready);
    }

    fn expand(&mut self) {
        self.record(BridgeEvent::Expand);
    }

    fn close(&mut self) {
        self.record(BridgeEvent::Close);
    }

    fn show_main_button(&mut self, label: &str) {
        self.record(BridgeEvent::MainButtonShown(label.to_string()));
    }

    fn hide_main_button(&mut self) {
        self.record(BridgeEvent::MainButtonHidden);
    }

    fn update_main_button(&mut self, label: &str, enabled: bool) {
        self.record(BridgeEvent::MainButtonUpdated(label.to_string(), enabled));
    }

    fn show_back_button(&mut self) {
        self.record(BridgeEvent::BackButtonShown);
    }

    fn hide_back_button(&mut self) {
        self.record(BridgeEvent::BackButtonHidden);
    }

    fn haptic(&mut self, kind: HapticKind) {
        self.record(BridgeEvent::Haptic(kind));
    }

    fn theme(&self) -> ThemePalette {
        self.theme.clone()
    }

    fn confirm(&mut self, _title: Option<&str>, message: &str) -> PopupChoice {
        self.record(BridgeEvent::Confirm(message.to_string()));
        self.answer
    }
}
