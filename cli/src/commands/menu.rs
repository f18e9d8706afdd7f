use anyhow::Result;
use tabled::{Table, Tabled, settings::Style};

use famenu_core::locale::{Label, day_name, label, short_day_name};
use famenu_core::models::Dish;
use famenu_core::service::MenuService;
use famenu_core::shopping::day_ingredients;

use super::helpers::{parse_day, parse_week_number, truncate};

pub(crate) fn cmd_menu(
    service: &MenuService,
    week: Option<u8>,
    day: Option<&str>,
    json: bool,
) -> Result<()> {
    let index = match week {
        Some(n) => parse_week_number(n)?,
        None => service.week_state().week_index,
    };
    let menu = service.menu_for(index);
    let lang = service.settings().language;
    let today = service.today();

    if let Some(day) = day {
        let day = parse_day(day, today)?;
        let dish = menu.day(day);
        if json {
            println!("{}", serde_json::to_string_pretty(dish)?);
            return Ok(());
        }
        println!("{} · {}\n", menu.title, day_name(day, lang));
        print_dish(service, dish);
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(menu)?);
        return Ok(());
    }

    #[derive(Tabled)]
    struct DayRow {
        #[tabled(rename = "")]
        marker: &'static str,
        #[tabled(rename = "Day")]
        day: String,
        #[tabled(rename = "Garnish")]
        garnish: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Veggies")]
        veggies: String,
    }

    let is_this_week = index == service.current_week().week_index;
    let rows: Vec<DayRow> = menu
        .iter_days()
        .map(|(day, dish)| DayRow {
            marker: if is_this_week && day == today { "•" } else { "" },
            day: short_day_name(day, lang).to_string(),
            garnish: truncate(&dish.garnish.name, 28),
            protein: truncate(&dish.protein.name, 28),
            veggies: truncate(&dish.veggies.name, 28),
        })
        .collect();

    println!("{} ({} {})", menu.title, label(Label::Week, lang), index.ordinal());
    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

fn print_dish(service: &MenuService, dish: &Dish) {
    let lang = service.settings().language;
    let slots = [
        (Label::Garnish, &dish.garnish),
        (Label::Protein, &dish.protein),
        (Label::Veggies, &dish.veggies),
    ];
    for (slot, part) in slots {
        match &part.note {
            Some(note) => println!("  {:<8} {} ({note})", label(slot, lang), part.name),
            None => println!("  {:<8} {}", label(slot, lang), part.name),
        }
    }

    let items = day_ingredients(service.catalog(), dish);
    if !items.is_empty() {
        println!();
        for item in &items {
            println!("  - {}", item.name);
        }
    }
}
