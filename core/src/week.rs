//! Week-cycle arithmetic. All calendar math happens in one fixed reference
//! timezone so every household member sees the same current week.

use chrono::{
    DateTime, Datelike, Duration, NaiveDate, NaiveTime, SecondsFormat, TimeZone, Utc, Weekday,
};
use chrono_tz::Tz;

use crate::locale::{Label, label, month_abbrev};
use crate::models::{DayId, Language, WeekIndex, WeekInfo};

pub const REFERENCE_TZ: Tz = chrono_tz::Europe::Moscow;

/// ISO week the cycle starts on when no setting overrides it.
pub const DEFAULT_BASE_WEEK: i32 = 38;

/// `((iso_week - base_week) mod 4 + 4) mod 4`
#[must_use]
pub fn cycle_index(iso_week: u32, base_week: i32) -> WeekIndex {
    WeekIndex::from_offset(i64::from(iso_week) - i64::from(base_week))
}

#[must_use]
pub fn local_time(instant: DateTime<Utc>) -> DateTime<Tz> {
    instant.with_timezone(&REFERENCE_TZ)
}

/// ISO week number of `instant` in the reference timezone.
#[must_use]
pub fn iso_week_of(instant: DateTime<Utc>) -> u32 {
    local_time(instant).iso_week().week()
}

#[must_use]
pub fn current_day_of_week(now: DateTime<Utc>) -> DayId {
    DayId::from_weekday(local_time(now).weekday())
}

#[must_use]
pub fn current_week_info(now: DateTime<Utc>, base_week: i32) -> WeekInfo {
    current_week_info_localized(now, base_week, Language::default())
}

#[must_use]
pub fn current_week_info_localized(now: DateTime<Utc>, base_week: i32, lang: Language) -> WeekInfo {
    let index = cycle_index(iso_week_of(now), base_week);
    build_info(index, now, lang)
}

/// Week whose cycle index is `target`, reached by shifting `now` by
/// `target - current` whole weeks (range -3..=3, not the shortest path).
#[must_use]
pub fn week_info_by_index(target: WeekIndex, now: DateTime<Utc>, base_week: i32) -> WeekInfo {
    week_info_by_index_localized(target, now, base_week, Language::default())
}

#[must_use]
pub fn week_info_by_index_localized(
    target: WeekIndex,
    now: DateTime<Utc>,
    base_week: i32,
    lang: Language,
) -> WeekInfo {
    let current = cycle_index(iso_week_of(now), base_week);
    let diff = i64::from(target.get()) - i64::from(current.get());
    build_info(target, now + Duration::weeks(diff), lang)
}

/// On Sunday the shopping list looks ahead to next week.
#[must_use]
pub fn initial_week_index(now: DateTime<Utc>, base_week: i32) -> WeekIndex {
    let at = if local_time(now).weekday() == Weekday::Sun {
        now + Duration::weeks(1)
    } else {
        now
    };
    cycle_index(iso_week_of(at), base_week)
}

#[must_use]
pub fn should_reset_checklist(
    last_reset_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    base_week: i32,
) -> bool {
    let Some(last) = last_reset_at else {
        return true;
    };
    cycle_index(iso_week_of(last), base_week) != cycle_index(iso_week_of(now), base_week)
}

/// Format an instant in the reference timezone with a strftime pattern.
#[must_use]
pub fn format_date(instant: DateTime<Utc>, pattern: &str) -> String {
    local_time(instant).format(pattern).to_string()
}

#[must_use]
pub fn iso_string(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[must_use]
pub fn week_title(
    index: WeekIndex,
    start: &DateTime<Tz>,
    end: &DateTime<Tz>,
    lang: Language,
) -> String {
    format!(
        "{} {} · {} — {}",
        label(Label::Week, lang),
        index.ordinal(),
        day_month(start, lang),
        day_month(end, lang)
    )
}

fn day_month(date: &DateTime<Tz>, lang: Language) -> String {
    format!("{:02} {}", date.day(), month_abbrev(date.month(), lang))
}

fn build_info(index: WeekIndex, at: DateTime<Utc>, lang: Language) -> WeekInfo {
    let local = local_time(at);
    let (start, end) = week_bounds(&local);
    WeekInfo {
        week_index: index,
        iso_week: local.iso_week().week(),
        title: week_title(index, &start, &end, lang),
        start_date: start.fixed_offset(),
        end_date: end.fixed_offset(),
    }
}

// Monday 00:00:00.000 through Sunday 23:59:59.999 local time.
fn week_bounds(local: &DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let monday =
        local.date_naive() - Duration::days(i64::from(local.weekday().num_days_from_monday()));
    let start = local_midnight(monday);
    let end = local_midnight(monday + Duration::days(7)) - Duration::milliseconds(1);
    (start, end)
}

fn local_midnight(date: NaiveDate) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    REFERENCE_TZ
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| REFERENCE_TZ.from_utc_datetime(&naive))
}
