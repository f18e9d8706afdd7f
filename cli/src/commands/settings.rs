use anyhow::{Result, bail};
use tabled::{Table, Tabled, settings::Style};

use famenu_core::models::{Language, SettingsUpdate, Tab};
use famenu_core::service::MenuService;

pub(crate) fn cmd_settings_show(service: &MenuService, json: bool) -> Result<()> {
    let settings = service.settings();
    if json {
        println!(
            "{}",
            serde_json::json!({
                "settings": settings,
                "storageHousehold": service.household_id(),
                "currentTab": service.current_tab(),
                "selectedWeekIndex": service.selected_week_index(),
            })
        );
        return Ok(());
    }

    #[derive(Tabled)]
    struct SettingRow {
        #[tabled(rename = "Setting")]
        name: &'static str,
        #[tabled(rename = "Value")]
        value: String,
    }

    let rows = vec![
        SettingRow {
            name: "base-week",
            value: settings.base_week.to_string(),
        },
        SettingRow {
            name: "language",
            value: settings.language.as_str().to_string(),
        },
        SettingRow {
            name: "navigation",
            value: settings.show_navigation.to_string(),
        },
        SettingRow {
            name: "sync",
            value: settings.enable_sync.to_string(),
        },
        SettingRow {
            name: "household",
            value: settings.household_id.clone().unwrap_or_default(),
        },
        SettingRow {
            name: "tab",
            value: service.current_tab().as_str().to_string(),
        },
        SettingRow {
            name: "selected-week",
            value: service
                .selected_week_index()
                .map_or_else(|| "current".to_string(), |w| w.ordinal().to_string()),
        },
    ];

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
    Ok(())
}

pub(crate) struct SettingsArgs {
    pub base_week: Option<i32>,
    pub language: Option<String>,
    pub navigation: Option<bool>,
    pub sync: Option<bool>,
    pub household: Option<String>,
}

pub(crate) fn cmd_settings_set(
    service: &mut MenuService,
    args: SettingsArgs,
    json: bool,
) -> Result<()> {
    let update = SettingsUpdate {
        base_week: args.base_week,
        show_navigation: args.navigation,
        enable_sync: args.sync,
        language: args.language.as_deref().map(Language::parse).transpose()?,
        household_id: args.household,
    };
    if update.is_empty() {
        bail!(
            "Nothing to update. Provide at least one of --base-week, --language, --navigation, --sync, or --household"
        );
    }

    service.update_settings(&update)?;

    if json {
        println!("{}", serde_json::to_string_pretty(service.settings())?);
    } else {
        println!("Settings updated");
        if update.base_week.is_some() {
            // the checklist follows the new cycle immediately
            if service.check_and_reset_week() {
                println!("Week changed, shopping marks were reset");
            }
            println!("{}", service.current_week().title);
        }
    }
    Ok(())
}

pub(crate) fn cmd_tab(service: &mut MenuService, tab: &str) -> Result<()> {
    let tab = Tab::parse(tab)?;
    service.set_current_tab(tab);
    println!("Current tab: {}", tab.as_str());
    Ok(())
}
