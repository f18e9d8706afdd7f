//! Built-in reference data: ingredient catalog, dish → ingredient mapping, and
//! the four menus of the cycle. Read-only at runtime.

use std::collections::{BTreeSet, HashMap, HashSet};

use anyhow::{Result, bail};
use serde::Serialize;

use crate::models::{Category, Dish, DishPart, Ingredient, WeekIndex, WeekMenu};

type IngredientSeed = (&'static str, &'static str, Category);
type DishSeed = (&'static str, &'static [&'static str]);
type PartSeed = (&'static str, &'static str);
type MenuSeed = (&'static str, &'static str, [[PartSeed; 3]; 7]);

const INGREDIENTS: &[IngredientSeed] = &[
    ("chicken-breast", "Куриная грудка", Category::Meat),
    ("chicken-thighs", "Куриные бёдра", Category::Meat),
    ("chicken-wings", "Куриные крылья", Category::Meat),
    ("chicken-whole", "Курица", Category::Meat),
    ("beef-mince", "Говяжий фарш", Category::Meat),
    ("beef-steak", "Стейк говядины", Category::Meat),
    ("beef-pieces", "Говядина кусочками", Category::Meat),
    ("pork-pieces", "Свинина кусочками", Category::Meat),
    ("pork-schnitzel", "Свинина для шницеля", Category::Meat),
    ("ham", "Ветчина", Category::Meat),
    ("salmon-fillet", "Филе лосося", Category::Fish),
    ("salmon-trout", "Лосось/форель", Category::Fish),
    ("cod-fillet", "Филе трески", Category::Fish),
    ("mackerel", "Скумбрия", Category::Fish),
    ("white-fish", "Белая рыба", Category::Fish),
    ("fish-for-batter", "Рыба для кляра", Category::Fish),
    ("buckwheat", "Гречка", Category::Grains),
    ("rice", "Рис", Category::Grains),
    ("bulgur", "Булгур", Category::Grains),
    ("pasta", "Паста", Category::Grains),
    ("noodles", "Лапша", Category::Grains),
    ("potatoes", "Картофель", Category::Vegetables),
    ("cucumbers", "Огурцы", Category::Vegetables),
    ("tomatoes", "Помидоры", Category::Vegetables),
    ("bell-peppers", "Болгарский перец", Category::Vegetables),
    ("broccoli", "Брокколи", Category::Vegetables),
    ("zucchini", "Кабачки", Category::Vegetables),
    ("eggplant", "Баклажаны", Category::Vegetables),
    ("cabbage", "Капуста", Category::Vegetables),
    ("carrots", "Морковь", Category::Vegetables),
    ("onions", "Лук", Category::Vegetables),
    ("mushrooms", "Грибы", Category::Vegetables),
    ("lettuce", "Салатные листья", Category::Vegetables),
    ("spinach", "Шпинат", Category::Vegetables),
    ("greens", "Зелень", Category::Vegetables),
    ("eggs", "Яйца", Category::DairyEggs),
    ("cream", "Сливки", Category::DairyEggs),
    ("milk", "Молоко", Category::DairyEggs),
    ("butter", "Сливочное масло", Category::DairyEggs),
    ("canned-beans", "Фасоль консервированная", Category::Canned),
    ("canned-tomatoes", "Томаты в собственном соку", Category::Canned),
    ("tomato-sauce", "Томатный соус", Category::Sauces),
    ("soy-sauce", "Соевый соус", Category::Sauces),
    ("teriyaki-sauce", "Соус терияки", Category::Sauces),
    ("cream-sauce", "Сливочный соус", Category::Sauces),
    ("lemon-juice", "Лимонный сок", Category::Sauces),
    ("mustard", "Горчица", Category::Sauces),
    ("paprika", "Паприка", Category::Spices),
    ("vegetable-oil", "Растительное масло", Category::Spices),
    ("olive-oil", "Оливковое масло", Category::Spices),
    ("spices-mix", "Специи", Category::Spices),
    ("salt", "Соль", Category::Spices),
    ("pepper", "Перец", Category::Spices),
    ("flour", "Мука", Category::Other),
    ("breadcrumbs", "Панировочные сухари", Category::Other),
];

const DISH_INGREDIENTS: &[DishSeed] = &[
    // week 1
    ("chicken-breast", &["chicken-breast", "vegetable-oil", "spices-mix"]),
    ("buckwheat", &["buckwheat"]),
    ("cucumber-tomato-salad", &["cucumbers", "tomatoes", "vegetable-oil"]),
    ("chicken-thighs", &["chicken-thighs", "spices-mix"]),
    ("mashed-potatoes", &["potatoes", "milk", "butter"]),
    ("cabbage-salad", &["cabbage", "vegetable-oil"]),
    ("chicken-teriyaki", &["chicken-whole", "teriyaki-sauce"]),
    ("rice", &["rice"]),
    ("pepper-broccoli", &["bell-peppers", "broccoli", "vegetable-oil"]),
    ("beef-mince", &["beef-mince", "onions", "tomato-sauce"]),
    ("pasta", &["pasta"]),
    ("fresh-salad", &["lettuce", "cucumbers", "tomatoes", "vegetable-oil"]),
    ("beef-steak", &["beef-steak", "spices-mix", "vegetable-oil"]),
    ("bulgur", &["bulgur"]),
    ("baked-zucchini-peppers", &["zucchini", "bell-peppers", "olive-oil"]),
    ("salmon-fillet", &["salmon-fillet", "lemon-juice"]),
    ("baked-potatoes", &["potatoes", "olive-oil"]),
    ("pork-pieces", &["pork-pieces", "onions", "vegetable-oil"]),
    // week 2
    ("pasta-noodles", &["pasta"]),
    ("pork-soy-sauce", &["pork-pieces", "soy-sauce", "vegetable-oil"]),
    (
        "carrot-cabbage-pepper",
        &["carrots", "cabbage", "bell-peppers", "vegetable-oil"],
    ),
    ("pork-schnitzel", &["pork-schnitzel", "flour", "breadcrumbs", "eggs"]),
    ("fried-mackerel", &["mackerel", "vegetable-oil", "spices-mix"]),
    ("fish-batter", &["fish-for-batter", "flour", "eggs", "vegetable-oil"]),
    ("steamed-broccoli-carrot", &["broccoli", "carrots"]),
    (
        "chili-con-carne",
        &["beef-mince", "canned-beans", "canned-tomatoes", "onions", "spices-mix"],
    ),
    ("greens", &["greens"]),
    ("chicken-paprika", &["chicken-whole", "paprika", "vegetable-oil"]),
    ("cucumber-greens", &["cucumbers", "greens", "vegetable-oil"]),
    (
        "chicken-vegetables",
        &["chicken-whole", "bell-peppers", "broccoli", "cream", "tomato-sauce"],
    ),
    ("leaf-salad", &["lettuce", "vegetable-oil"]),
    // week 3
    ("cod-fillet", &["cod-fillet", "lemon-juice", "spices-mix"]),
    ("beef-pieces", &["beef-pieces", "vegetable-oil", "spices-mix"]),
    (
        "baked-eggplant-pepper-zucchini",
        &["eggplant", "bell-peppers", "zucchini", "olive-oil"],
    ),
    ("chicken-wings", &["chicken-wings", "spices-mix", "vegetable-oil"]),
    ("pork-onion", &["pork-pieces", "onions", "vegetable-oil"]),
    ("carrot-cabbage-salad", &["carrots", "cabbage", "vegetable-oil"]),
    ("white-fish-pan", &["white-fish", "vegetable-oil", "spices-mix"]),
    (
        "pasta-beef-vegetables",
        &["pasta", "beef-pieces", "bell-peppers", "tomato-sauce"],
    ),
    (
        "vegetable-stew-chicken",
        &["chicken-whole", "potatoes", "carrots", "onions", "bell-peppers"],
    ),
    // week 4
    ("salmon-trout", &["salmon-trout", "vegetable-oil", "lemon-juice"]),
    (
        "beef-meatballs-tomato",
        &["beef-mince", "eggs", "breadcrumbs", "tomato-sauce"],
    ),
    (
        "pork-stewed-vegetables",
        &["pork-pieces", "potatoes", "carrots", "onions", "bell-peppers"],
    ),
    (
        "chicken-cream-sauce",
        &["chicken-whole", "cream", "mushrooms", "vegetable-oil"],
    ),
    ("baked-fish", &["mackerel", "vegetable-oil", "spices-mix"]),
    ("steamed-vegetables", &["broccoli", "carrots"]),
    (
        "omelet-vegetables-ham",
        &["eggs", "ham", "bell-peppers", "onions", "butter"],
    ),
    (
        "vegetable-stew-beef",
        &["beef-pieces", "potatoes", "carrots", "onions", "bell-peppers", "tomato-sauce"],
    ),
];

// Each day is [garnish, protein, veggies].
const MENUS: [MenuSeed; 4] = [
    (
        "week-1",
        "Неделя 1",
        [
            [
                ("buckwheat", "Гречка"),
                ("chicken-breast", "Куриная грудка"),
                ("cucumber-tomato-salad", "Салат огурцы+помидоры"),
            ],
            [
                ("mashed-potatoes", "Картофельное пюре"),
                ("chicken-thighs", "Куриные бёдра"),
                ("cabbage-salad", "Салат из капусты"),
            ],
            [
                ("rice", "Рис"),
                ("chicken-teriyaki", "Курица терияки"),
                ("pepper-broccoli", "Перец+брокколи"),
            ],
            [
                ("pasta", "Паста"),
                ("beef-mince", "Говяжий фарш"),
                ("fresh-salad", "Салат свежий"),
            ],
            [
                ("bulgur", "Булгур"),
                ("beef-steak", "Стейк говядины"),
                ("baked-zucchini-peppers", "Запеч. кабачки+перцы"),
            ],
            [
                ("mashed-potatoes", "Пюре"),
                ("salmon-fillet", "Лосось филе"),
                ("cucumbers", "Огурцы"),
            ],
            [
                ("baked-potatoes", "Запеч. картофель"),
                ("pork-pieces", "Свинина кусочками"),
                ("cucumber-salad", "Салат огурцы"),
            ],
        ],
    ),
    (
        "week-2",
        "Неделя 2",
        [
            [
                ("pasta-noodles", "Паста/лапша"),
                ("pork-soy-sauce", "Свинина в соевом соусе"),
                ("carrot-cabbage-pepper", "Морковь+капуста+перец"),
            ],
            [
                ("bulgur", "Булгур"),
                ("pork-schnitzel", "Шницель свиной"),
                ("cabbage-salad", "Салат из капусты"),
            ],
            [
                ("bulgur", "Булгур"),
                ("fried-mackerel", "Скумбрия жареная"),
                ("cabbage-salad", "Салат из капусты"),
            ],
            [
                ("pasta", "Паста"),
                ("fish-batter", "Рыба в кляре"),
                ("steamed-broccoli-carrot", "Овощи на пару: брокколи+морковь"),
            ],
            [
                ("rice", "Рис"),
                ("chili-con-carne", "Чили кон карне"),
                ("greens", "Зелень"),
            ],
            [
                ("bulgur", "Булгур"),
                ("chicken-paprika", "Курица с паприкой"),
                ("cucumber-greens", "Огурцы+зелень"),
            ],
            [
                ("pasta-creamy-tomato", "Паста с курицей и овощами"),
                ("chicken-vegetables", "Сливочно-томатный"),
                ("leaf-salad", "Салат из листьев"),
            ],
        ],
    ),
    (
        "week-3",
        "Неделя 3",
        [
            [
                ("mashed-potatoes", "Пюре"),
                ("cod-fillet", "Треска филе"),
                ("cucumbers", "Огурцы"),
            ],
            [
                ("bulgur", "Булгур"),
                ("beef-pieces", "Говядина кусочками"),
                ("baked-eggplant-pepper-zucchini", "Запеч. баклажан+перец+кабачок"),
            ],
            [
                ("buckwheat", "Гречка"),
                ("chicken-wings", "Куриные крылья"),
                ("fresh-salad", "Салат свежий"),
            ],
            [
                ("rice", "Рис"),
                ("pork-onion", "Свинина с луком"),
                ("carrot-cabbage-salad", "Салат морковь+капуста"),
            ],
            [
                ("buckwheat", "Гречка"),
                ("white-fish-pan", "Белая рыба на сковороде"),
                ("cucumber-greens", "Огурцы+зелень"),
            ],
            [
                ("pasta-beef-vegetables", "Паста с говядиной и овощами"),
                ("tomato-sauce", "Томатный"),
                ("mixed-vegetables", "Овощи"),
            ],
            [
                ("bulgur", "Булгур"),
                ("vegetable-stew-chicken", "Овощное рагу с курицей"),
                ("mixed-vegetables", "Овощи"),
            ],
        ],
    ),
    (
        "week-4",
        "Неделя 4",
        [
            [
                ("bulgur", "Булгур"),
                ("salmon-trout", "Лосось/форель"),
                ("leaf-salad", "Салат листовой"),
            ],
            [
                ("mashed-potatoes", "Пюре"),
                ("beef-meatballs-tomato", "Говяжьи тефтели в томатном"),
                ("cucumber-salad", "Салат огурцы"),
            ],
            [
                ("buckwheat", "Гречка"),
                ("pork-stewed-vegetables", "Свинина тушёная с овощами"),
                ("mixed-vegetables", "Овощи"),
            ],
            [
                ("pasta", "Паста"),
                ("chicken-cream-sauce", "Курица в сливочном"),
                ("fresh-salad", "Салат свежий"),
            ],
            [
                ("rice", "Рис"),
                ("baked-fish", "Хек/скумбрия в духовке"),
                ("steamed-vegetables", "Овощи на пару"),
            ],
            [
                ("potatoes", "Картофель"),
                ("omelet-vegetables-ham", "Омлет с овощами и ветчиной/курицей"),
                ("mixed-vegetables", "Овощи"),
            ],
            [
                ("bulgur", "Булгур"),
                ("vegetable-stew-beef", "Овощное рагу с говядиной"),
                ("mixed-vegetables", "Овощи"),
            ],
        ],
    ),
];

/// Dish ids and ingredient ids that the derivation cannot resolve.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogAudit {
    /// Dish ids used by a menu with no dish → ingredient entry.
    pub unmapped_dishes: Vec<String>,
    /// Ingredient ids referenced by a dish but absent from the catalog.
    pub dangling_ingredients: Vec<String>,
}

impl CatalogAudit {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.unmapped_dishes.is_empty() && self.dangling_ingredients.is_empty()
    }
}

pub struct Catalog {
    ingredients: Vec<Ingredient>,
    by_id: HashMap<String, usize>,
    dish_ingredients: HashMap<String, Vec<String>>,
    menus: [WeekMenu; 4],
}

impl Catalog {
    /// The built-in four-week cycle.
    #[must_use]
    pub fn builtin() -> Self {
        let ingredients = INGREDIENTS
            .iter()
            .map(|&(id, name, category)| Ingredient {
                id: id.to_string(),
                name: name.to_string(),
                category,
                quantity: None,
            })
            .collect::<Vec<_>>();
        let dish_ingredients = DISH_INGREDIENTS
            .iter()
            .map(|&(dish, ids)| {
                (
                    dish.to_string(),
                    ids.iter().map(|id| (*id).to_string()).collect(),
                )
            })
            .collect();
        let menus = MENUS.map(menu_from_seed);
        Self::index(ingredients, dish_ingredients, menus)
    }

    /// Build a catalog from custom tables. Ingredient ids must be unique.
    pub fn from_parts(
        ingredients: Vec<Ingredient>,
        dish_ingredients: HashMap<String, Vec<String>>,
        menus: [WeekMenu; 4],
    ) -> Result<Self> {
        let mut seen = HashSet::new();
        for ingredient in &ingredients {
            if !seen.insert(ingredient.id.as_str()) {
                bail!("Duplicate ingredient id '{}'", ingredient.id);
            }
        }
        Ok(Self::index(ingredients, dish_ingredients, menus))
    }

    fn index(
        ingredients: Vec<Ingredient>,
        dish_ingredients: HashMap<String, Vec<String>>,
        menus: [WeekMenu; 4],
    ) -> Self {
        let by_id = ingredients
            .iter()
            .enumerate()
            .map(|(i, ing)| (ing.id.clone(), i))
            .collect();
        Self {
            ingredients,
            by_id,
            dish_ingredients,
            menus,
        }
    }

    #[must_use]
    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.by_id.get(id).map(|&i| &self.ingredients[i])
    }

    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }

    #[must_use]
    pub fn dish_ingredients(&self, dish_id: &str) -> Option<&[String]> {
        self.dish_ingredients.get(dish_id).map(Vec::as_slice)
    }

    #[must_use]
    pub fn menu(&self, index: WeekIndex) -> &WeekMenu {
        &self.menus[index.as_index()]
    }

    #[must_use]
    pub fn menus(&self) -> &[WeekMenu; 4] {
        &self.menus
    }

    /// Walk every menu slot and report ids the shopping derivation would skip.
    #[must_use]
    pub fn audit(&self) -> CatalogAudit {
        let mut unmapped = BTreeSet::new();
        let mut dangling = BTreeSet::new();
        for menu in &self.menus {
            for dish in &menu.days {
                for part in dish.parts() {
                    match self.dish_ingredients(&part.id) {
                        None => {
                            unmapped.insert(part.id.clone());
                        }
                        Some(ids) => {
                            for id in ids {
                                if self.ingredient(id).is_none() {
                                    dangling.insert(id.clone());
                                }
                            }
                        }
                    }
                }
            }
        }
        CatalogAudit {
            unmapped_dishes: unmapped.into_iter().collect(),
            dangling_ingredients: dangling.into_iter().collect(),
        }
    }
}

fn part_from_seed((id, name): PartSeed) -> DishPart {
    DishPart {
        id: id.to_string(),
        name: name.to_string(),
        note: None,
    }
}

fn menu_from_seed((id, title, days): MenuSeed) -> WeekMenu {
    WeekMenu {
        id: id.to_string(),
        title: title.to_string(),
        days: days.map(|[garnish, protein, veggies]| Dish {
            garnish: part_from_seed(garnish),
            protein: part_from_seed(protein),
            veggies: part_from_seed(veggies),
        }),
    }
}
