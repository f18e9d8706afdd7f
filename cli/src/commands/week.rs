use anyhow::Result;
use serde::Serialize;

use famenu_core::locale::day_name;
use famenu_core::models::{WeekIndex, WeekInfo};
use famenu_core::service::MenuService;
use famenu_core::week::format_date;

use super::helpers::parse_week_number;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WeekOutput {
    #[serde(flatten)]
    info: WeekInfo,
    is_current: bool,
    today: u8,
    tracked_week_index: WeekIndex,
    suggested_shopping_week_index: WeekIndex,
}

pub(crate) fn cmd_week(service: &MenuService, index: Option<u8>, json: bool) -> Result<()> {
    let current = service.current_week();
    let info = match index {
        Some(n) => service.week_info(parse_week_number(n)?),
        None => current.clone(),
    };
    let output = WeekOutput {
        is_current: info.iso_week == current.iso_week,
        info,
        today: service.today().get(),
        tracked_week_index: service.week_state().week_index,
        suggested_shopping_week_index: service.initial_week_index(),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let lang = service.settings().language;
    let info = &output.info;
    println!("{}", info.title);
    println!(
        "  ISO week {} · {} – {}",
        info.iso_week,
        format_date(info.start_date.to_utc(), "%Y-%m-%d"),
        format_date(info.end_date.to_utc(), "%Y-%m-%d")
    );
    if output.is_current {
        println!("  Today: {}", day_name(service.today(), lang));
    }
    let suggested = output.suggested_shopping_week_index;
    if suggested != current.week_index {
        println!("  Shopping for next week: {}", suggested.ordinal());
    }
    println!("  Base week: {}", service.settings().base_week);

    Ok(())
}
