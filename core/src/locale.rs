use crate::models::{Category, DayId, Language};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Label {
    Week,
    Menu,
    Shopping,
    ShoppingList,
    Progress,
    OpenShoppingList,
    MarkAllBought,
    ResetMarks,
    EmptyList,
    EmptyListHint,
    AllBought,
    Remaining,
    Garnish,
    Protein,
    Veggies,
    Ok,
    Cancel,
    ConfirmReset,
    Undone,
}

#[must_use]
pub fn label(label: Label, lang: Language) -> &'static str {
    match lang {
        Language::Ru => match label {
            Label::Week => "Неделя",
            Label::Menu => "Меню",
            Label::Shopping => "Покупки",
            Label::ShoppingList => "Список покупок",
            Label::Progress => "Прогресс",
            Label::OpenShoppingList => "Открыть список покупок",
            Label::MarkAllBought => "Отметить всё купленным",
            Label::ResetMarks => "Сбросить отметки",
            Label::EmptyList => "Список покупок пуст",
            Label::EmptyListHint => "Не удалось загрузить ингредиенты для текущей недели",
            Label::AllBought => "Все покупки сделаны!",
            Label::Remaining => "Осталось купить",
            Label::Garnish => "Гарнир",
            Label::Protein => "Белок",
            Label::Veggies => "Овощи",
            Label::Ok => "OK",
            Label::Cancel => "Отмена",
            Label::ConfirmReset => "Сбросить все отметки?",
            Label::Undone => "Действие отменено",
        },
        Language::En => match label {
            Label::Week => "Week",
            Label::Menu => "Menu",
            Label::Shopping => "Shopping",
            Label::ShoppingList => "Shopping list",
            Label::Progress => "Progress",
            Label::OpenShoppingList => "Open shopping list",
            Label::MarkAllBought => "Mark all as bought",
            Label::ResetMarks => "Reset marks",
            Label::EmptyList => "Shopping list is empty",
            Label::EmptyListHint => "Could not load ingredients for the current week",
            Label::AllBought => "Everything is bought!",
            Label::Remaining => "Left to buy",
            Label::Garnish => "Side",
            Label::Protein => "Protein",
            Label::Veggies => "Veggies",
            Label::Ok => "OK",
            Label::Cancel => "Cancel",
            Label::ConfirmReset => "Reset all marks?",
            Label::Undone => "Action undone",
        },
    }
}

#[must_use]
pub fn category_name(category: Category, lang: Language) -> &'static str {
    match (lang, category) {
        (Language::Ru, Category::Meat) => "Мясо",
        (Language::Ru, Category::Fish) => "Рыба",
        (Language::Ru, Category::Grains) => "Крупы",
        (Language::Ru, Category::Vegetables) => "Овощи",
        (Language::Ru, Category::Fruits) => "Фрукты",
        (Language::Ru, Category::DairyEggs) => "Молочка/яйца",
        (Language::Ru, Category::Canned) => "Консервы",
        (Language::Ru, Category::Sauces) => "Соусы",
        (Language::Ru, Category::Spices) => "Специи",
        (Language::Ru, Category::Other) => "Прочее",
        (Language::En, Category::Meat) => "Meat",
        (Language::En, Category::Fish) => "Fish",
        (Language::En, Category::Grains) => "Grains",
        (Language::En, Category::Vegetables) => "Vegetables",
        (Language::En, Category::Fruits) => "Fruits",
        (Language::En, Category::DairyEggs) => "Dairy/eggs",
        (Language::En, Category::Canned) => "Canned",
        (Language::En, Category::Sauces) => "Sauces",
        (Language::En, Category::Spices) => "Spices",
        (Language::En, Category::Other) => "Other",
    }
}

#[must_use]
pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Meat => "🥩",
        Category::Fish => "🐟",
        Category::Grains => "🌾",
        Category::Vegetables => "🥬",
        Category::Fruits => "🍎",
        Category::DairyEggs => "🥛",
        Category::Canned => "🥫",
        Category::Sauces => "🍯",
        Category::Spices => "🧂",
        Category::Other => "📦",
    }
}

const DAY_NAMES_RU: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];
const DAY_NAMES_EN: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
const SHORT_DAY_NAMES_RU: [&str; 7] = ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"];
const SHORT_DAY_NAMES_EN: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const MONTHS_RU: [&str; 12] = [
    "янв", "фев", "мар", "апр", "мая", "июн", "июл", "авг", "сен", "окт", "ноя", "дек",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[must_use]
pub fn day_name(day: DayId, lang: Language) -> &'static str {
    match lang {
        Language::Ru => DAY_NAMES_RU[day.as_index()],
        Language::En => DAY_NAMES_EN[day.as_index()],
    }
}

#[must_use]
pub fn short_day_name(day: DayId, lang: Language) -> &'static str {
    match lang {
        Language::Ru => SHORT_DAY_NAMES_RU[day.as_index()],
        Language::En => SHORT_DAY_NAMES_EN[day.as_index()],
    }
}

/// Abbreviated month name for a 1-based month number.
#[must_use]
pub fn month_abbrev(month: u32, lang: Language) -> &'static str {
    let idx = (month.clamp(1, 12) - 1) as usize;
    match lang {
        Language::Ru => MONTHS_RU[idx],
        Language::En => MONTHS_EN[idx],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_names_ru() {
        assert_eq!(category_name(Category::DairyEggs, Language::Ru), "Молочка/яйца");
        assert_eq!(category_name(Category::Other, Language::Ru), "Прочее");
    }

    #[test]
    fn test_category_names_distinct_per_language() {
        for lang in [Language::Ru, Language::En] {
            let names: std::collections::HashSet<_> = Category::ALL
                .iter()
                .map(|c| category_name(*c, lang))
                .collect();
            assert_eq!(names.len(), Category::ALL.len());
        }
    }

    #[test]
    fn test_day_names() {
        assert_eq!(day_name(DayId::MONDAY, Language::Ru), "Понедельник");
        assert_eq!(day_name(DayId::SUNDAY, Language::En), "Sunday");
        assert_eq!(short_day_name(DayId::SUNDAY, Language::Ru), "Вс");
    }

    #[test]
    fn test_month_abbrev_clamps() {
        assert_eq!(month_abbrev(1, Language::En), "Jan");
        assert_eq!(month_abbrev(9, Language::Ru), "сен");
        assert_eq!(month_abbrev(13, Language::En), "Dec");
    }
}
