use anyhow::Result;
use serde::Serialize;
use std::io;
use std::process;

use famenu_core::bridge::{HostBridge, PopupChoice};
use famenu_core::checklist::UNDO_WINDOW_SECS;
use famenu_core::locale::{Label, category_icon, label};
use famenu_core::models::{CategoryGroup, Checklist, ShoppingProgress, WeekIndex, WeekInfo};
use famenu_core::service::MenuService;
use famenu_core::shopping::write_csv;

use super::helpers::{
    check_mark, json_error, parse_week_number, parse_week_selection, progress_bar,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ShoppingListOutput<'a> {
    week: WeekInfo,
    progress: ShoppingProgress,
    groups: Vec<CategoryGroup>,
    checklist: &'a Checklist,
}

fn resolve_week(service: &MenuService, week: Option<u8>) -> Result<WeekIndex> {
    match week {
        Some(n) => parse_week_number(n),
        None => Ok(service.shopping_week_index()),
    }
}

pub(crate) fn cmd_shop_list(
    service: &MenuService,
    week: Option<u8>,
    pending: bool,
    json: bool,
) -> Result<()> {
    let index = resolve_week(service, week)?;
    let lang = service.settings().language;
    let progress = service.progress_for(index);
    let checklist = &service.week_state().checklist;

    if progress.total == 0 {
        if json {
            println!("{}", json_error(label(Label::EmptyList, lang)));
        } else {
            eprintln!("{}", label(Label::EmptyList, lang));
            eprintln!("{}", label(Label::EmptyListHint, lang));
        }
        process::exit(2);
    }

    let mut groups = service.grouped_items_for(index);
    if pending {
        for group in &mut groups {
            group
                .items
                .retain(|item| !checklist.get(&item.id).copied().unwrap_or(false));
        }
        groups.retain(|group| !group.items.is_empty());
    }

    if json {
        let output = ShoppingListOutput {
            week: service.week_info(index),
            progress,
            groups,
            checklist,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} · {}",
        label(Label::ShoppingList, lang),
        service.week_info(index).title
    );
    println!(
        "{}: {}/{} ({}%) {}",
        label(Label::Progress, lang),
        progress.completed,
        progress.total,
        progress.percentage,
        progress_bar(&progress, 20)
    );

    if progress.is_complete() {
        println!("\n{}", label(Label::AllBought, lang));
        return Ok(());
    }

    for group in &groups {
        println!(
            "\n{} {} {}/{}",
            category_icon(group.category),
            group.name,
            group.checked,
            group.total
        );
        for item in &group.items {
            let checked = checklist.get(&item.id).copied().unwrap_or(false);
            println!("  {} {:<32} {}", check_mark(checked), item.name, item.id);
        }
    }
    println!(
        "\n{}: {}",
        label(Label::Remaining, lang),
        progress.remaining()
    );

    Ok(())
}

pub(crate) fn cmd_shop_toggle(service: &mut MenuService, item_id: &str, json: bool) -> Result<()> {
    let on_list = service
        .current_shopping_items()
        .iter()
        .any(|item| item.id == item_id);
    if !on_list && !json {
        eprintln!("Note: '{item_id}' is not on this week's shopping list");
    }

    let checked = service.toggle_item(item_id);

    if json {
        println!(
            "{}",
            serde_json::json!({ "id": item_id, "checked": checked, "progress": service.progress() })
        );
        return Ok(());
    }

    let name = service
        .catalog()
        .ingredient(item_id)
        .map_or(item_id, |item| item.name.as_str());
    println!("{} {name}", check_mark(checked));
    Ok(())
}

pub(crate) fn cmd_shop_check_all(service: &mut MenuService, json: bool) -> Result<()> {
    service.check_all();
    print_bulk_result(service, json)
}

pub(crate) fn cmd_shop_reset(
    service: &mut MenuService,
    host: &mut dyn HostBridge,
    json: bool,
) -> Result<()> {
    let lang = service.settings().language;
    if host.confirm(None, label(Label::ConfirmReset, lang)) == PopupChoice::Cancel {
        if json {
            println!("{}", json_error("Cancelled"));
        } else {
            eprintln!("Cancelled");
        }
        return Ok(());
    }

    service.reset_all();
    print_bulk_result(service, json)
}

fn print_bulk_result(service: &MenuService, json: bool) -> Result<()> {
    let progress = service.progress();
    if json {
        println!(
            "{}",
            serde_json::json!({ "progress": progress, "undoWindowSecs": UNDO_WINDOW_SECS })
        );
        return Ok(());
    }

    println!(
        "{}: {}/{} ({}%)",
        label(Label::Progress, service.settings().language),
        progress.completed,
        progress.total,
        progress.percentage
    );
    eprintln!("Undo within {UNDO_WINDOW_SECS}s: famenu shop undo");
    Ok(())
}

pub(crate) fn cmd_shop_undo(service: &mut MenuService, json: bool) -> Result<()> {
    let Some(action) = service.undo_last() else {
        if json {
            println!("{}", json_error("Nothing to undo"));
        } else {
            eprintln!("Nothing to undo");
        }
        process::exit(2);
    };

    if json {
        println!(
            "{}",
            serde_json::json!({ "undone": action, "progress": service.progress() })
        );
    } else {
        println!("{}", label(Label::Undone, service.settings().language));
    }
    Ok(())
}

pub(crate) fn cmd_shop_select(service: &mut MenuService, week: &str, json: bool) -> Result<()> {
    let selection = parse_week_selection(week)?;
    service.select_week(selection);

    if json {
        println!(
            "{}",
            serde_json::json!({
                "selectedWeekIndex": selection,
                "shoppingWeekIndex": service.shopping_week_index(),
            })
        );
        return Ok(());
    }

    match selection {
        Some(index) => println!("Shopping list pinned to week {}", index.ordinal()),
        None => println!(
            "Shopping list follows the current week ({})",
            service.shopping_week_index().ordinal()
        ),
    }
    Ok(())
}

pub(crate) fn cmd_shop_export(service: &MenuService, week: Option<u8>) -> Result<()> {
    let index = resolve_week(service, week)?;
    let items = service.shopping_items_for(index);
    write_csv(
        &items,
        &service.week_state().checklist,
        service.settings().language,
        io::stdout().lock(),
    )
}
