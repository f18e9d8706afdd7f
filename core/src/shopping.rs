use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::io;

use anyhow::Result;
use serde::Serialize;
use tracing::debug;

use crate::catalog::Catalog;
use crate::locale::category_name;
use crate::models::{
    CategoryGroup, Checklist, Dish, Ingredient, Language, ShoppingProgress, WeekMenu,
};

/// Everything needed to cook `menu`: the union of all 21 dish slots, one entry
/// per ingredient id, sorted by category then by name.
#[must_use]
pub fn week_ingredients(catalog: &Catalog, menu: &WeekMenu) -> Vec<Ingredient> {
    collect_ingredients(catalog, menu.days.iter())
}

/// The same derivation for a single day's dish.
#[must_use]
pub fn day_ingredients(catalog: &Catalog, dish: &Dish) -> Vec<Ingredient> {
    collect_ingredients(catalog, std::iter::once(dish))
}

fn collect_ingredients<'a>(
    catalog: &Catalog,
    dishes: impl Iterator<Item = &'a Dish>,
) -> Vec<Ingredient> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut items = Vec::new();

    for dish in dishes {
        for part in dish.parts() {
            let Some(ids) = catalog.dish_ingredients(&part.id) else {
                debug!(dish = %part.id, "no ingredient mapping for dish");
                continue;
            };
            for id in ids {
                if !seen.insert(id.as_str()) {
                    continue;
                }
                match catalog.ingredient(id) {
                    Some(ingredient) => items.push(ingredient.clone()),
                    None => debug!(ingredient = %id, dish = %part.id, "ingredient not in catalog"),
                }
            }
        }
    }

    sort_items(&mut items);
    items
}

pub fn sort_items(items: &mut [Ingredient]) {
    items.sort_by(|a, b| {
        a.category
            .cmp(&b.category)
            .then_with(|| compare_names(&a.name, &b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Russian alphabetical order: case-insensitive, `ё` directly after `е`.
#[must_use]
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

fn collation_key(name: &str) -> Vec<u32> {
    name.chars()
        .flat_map(char::to_lowercase)
        .map(|c| match c {
            'ё' => u32::from('е') * 2 + 1,
            c => u32::from(c) * 2,
        })
        .collect()
}

/// Partition `items` by category in display order, counting checked entries.
/// Checklist ids that are not in `items` never show up.
#[must_use]
pub fn group_by_category(
    items: &[Ingredient],
    checklist: &Checklist,
    lang: Language,
) -> Vec<CategoryGroup> {
    let mut groups: BTreeMap<_, CategoryGroup> = BTreeMap::new();
    for item in items {
        let group = groups
            .entry(item.category)
            .or_insert_with(|| CategoryGroup {
                category: item.category,
                name: category_name(item.category, lang).to_string(),
                items: Vec::new(),
                checked: 0,
                total: 0,
            });
        group.items.push(item.clone());
        group.total += 1;
        if is_checked(checklist, &item.id) {
            group.checked += 1;
        }
    }
    groups.into_values().collect()
}

#[must_use]
pub fn progress(items: &[Ingredient], checklist: &Checklist) -> ShoppingProgress {
    let completed = items
        .iter()
        .filter(|item| is_checked(checklist, &item.id))
        .count();
    ShoppingProgress::new(items.len(), completed)
}

#[must_use]
pub fn checked_all(items: &[Ingredient]) -> Checklist {
    items.iter().map(|item| (item.id.clone(), true)).collect()
}

#[must_use]
pub fn unchecked_all(items: &[Ingredient]) -> Checklist {
    items.iter().map(|item| (item.id.clone(), false)).collect()
}

fn is_checked(checklist: &Checklist, id: &str) -> bool {
    checklist.get(id).copied().unwrap_or(false)
}

/// Write the list as CSV with a `category,id,name,quantity,checked` header.
pub fn write_csv<W: io::Write>(
    items: &[Ingredient],
    checklist: &Checklist,
    lang: Language,
    writer: W,
) -> Result<()> {
    #[derive(Serialize)]
    struct CsvRow<'a> {
        category: &'a str,
        id: &'a str,
        name: &'a str,
        quantity: &'a str,
        checked: bool,
    }

    let mut wtr = csv::Writer::from_writer(writer);
    for item in items {
        wtr.serialize(CsvRow {
            category: category_name(item.category, lang),
            id: &item.id,
            name: &item.name,
            quantity: item.quantity.as_deref().unwrap_or(""),
            checked: is_checked(checklist, &item.id),
        })?;
    }
    wtr.flush()?;
    Ok(())
}
