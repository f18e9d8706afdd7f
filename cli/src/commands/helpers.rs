use anyhow::{Context, Result, bail};
use serde::Serialize;

use famenu_core::models::{DayId, ShoppingProgress, WeekIndex};

/// Human week number (1-4) to a cycle index.
pub(crate) fn parse_week_number(n: u8) -> Result<WeekIndex> {
    if !(1..=WeekIndex::CYCLE_LEN).contains(&n) {
        bail!(
            "Invalid week {n}. Must be between 1 and {}",
            WeekIndex::CYCLE_LEN
        );
    }
    WeekIndex::new(n - 1)
}

/// `current` (or `none`) clears the selection; otherwise a week number.
pub(crate) fn parse_week_selection(s: &str) -> Result<Option<WeekIndex>> {
    match s.trim().to_lowercase().as_str() {
        "current" | "none" => Ok(None),
        other => {
            let n: u8 = other
                .parse()
                .with_context(|| format!("Invalid week '{s}'. Use 1-4 or 'current'"))?;
            parse_week_number(n).map(Some)
        }
    }
}

/// Accepts `today`, 1-7 (Monday = 1), or an English/Russian day name.
pub(crate) fn parse_day(s: &str, today: DayId) -> Result<DayId> {
    let lower = s.trim().to_lowercase();
    if lower == "today" || lower == "сегодня" {
        return Ok(today);
    }
    if let Ok(n) = lower.parse::<u8>() {
        return DayId::new(n);
    }
    let n = match lower.as_str() {
        "mon" | "monday" | "пн" | "понедельник" => 1,
        "tue" | "tuesday" | "вт" | "вторник" => 2,
        "wed" | "wednesday" | "ср" | "среда" => 3,
        "thu" | "thursday" | "чт" | "четверг" => 4,
        "fri" | "friday" | "пт" | "пятница" => 5,
        "sat" | "saturday" | "сб" | "суббота" => 6,
        "sun" | "sunday" | "вс" | "воскресенье" => 7,
        _ => bail!("Invalid day '{s}'. Use 1-7, a day name, or 'today'"),
    };
    DayId::new(n)
}

pub(crate) fn check_mark(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

pub(crate) fn progress_bar(progress: &ShoppingProgress, width: usize) -> String {
    let filled = (usize::from(progress.percentage) * width + 50) / 100;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_week_number() {
        assert_eq!(parse_week_number(1).unwrap().get(), 0);
        assert_eq!(parse_week_number(4).unwrap().get(), 3);
        assert!(parse_week_number(0).is_err());
        assert!(parse_week_number(5).is_err());
    }

    #[test]
    fn test_parse_week_selection() {
        assert_eq!(parse_week_selection("current").unwrap(), None);
        assert_eq!(parse_week_selection(" None ").unwrap(), None);
        assert_eq!(parse_week_selection("2").unwrap().map(WeekIndex::get), Some(1));
        assert!(parse_week_selection("nine").is_err());
        assert!(parse_week_selection("9").is_err());
    }

    #[test]
    fn test_parse_day() {
        let today = DayId::new(3).unwrap();
        assert_eq!(parse_day("today", today).unwrap(), today);
        assert_eq!(parse_day("1", today).unwrap(), DayId::MONDAY);
        assert_eq!(parse_day("Sun", today).unwrap(), DayId::SUNDAY);
        assert_eq!(parse_day("пятница", today).unwrap().get(), 5);
        assert!(parse_day("8", today).is_err());
        assert!(parse_day("someday", today).is_err());
    }

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(&ShoppingProgress::new(0, 0), 4), "░░░░");
        assert_eq!(progress_bar(&ShoppingProgress::new(2, 1), 4), "██░░");
        assert_eq!(progress_bar(&ShoppingProgress::new(3, 3), 4), "████");
    }

    #[test]
    fn test_json_error() {
        assert_eq!(json_error("Nothing to undo"), r#"{"error":"Nothing to undo"}"#);
    }

    #[test]
    fn test_truncate_utf8() {
        assert_eq!(truncate("Рис", 10), "Рис");
        assert_eq!(truncate("Куриная грудка на пару", 10), "Куриная...");
    }
}
