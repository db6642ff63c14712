use crate::model::ClockTime;
use chrono::NaiveDate;
use regex::Regex;
use std::sync::OnceLock;

pub(crate) const REST_DAY: &str = "RD";
pub(crate) const ANNUAL_LEAVE: &str = "AL";
pub(crate) const ANNUAL_LEAVE_SLASHED: &str = "A/L";
pub(crate) const STUDY_DAY: &str = "STUD";

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // ex. "27/03 Th27/03/2025 Th"
    PATTERN.get_or_init(|| {
        Regex::new(r"(\d{2}/\d{2}).*?(\d{2}/\d{2}/\d{4})").expect("static date pattern")
    })
}

/// Extrait la date DD/MM/YYYY d'une cellule TRACS composite.
pub fn extract_date(label: &str) -> Option<NaiveDate> {
    let caps = date_pattern().captures(label)?;
    let full = caps.get(2)?.as_str();
    NaiveDate::parse_from_str(full, "%d/%m/%Y").ok()
}

pub(super) fn next_day(date: NaiveDate) -> Option<NaiveDate> {
    date.succ_opt()
}

/// Heures début/fin d'un service, si les deux cellules sont bien formées.
pub(super) fn shift_times(start: &str, end: &str) -> Option<(ClockTime, ClockTime)> {
    Some((start.parse().ok()?, end.parse().ok()?))
}

pub(super) fn crosses_midnight(start: ClockTime, end: ClockTime) -> bool {
    end.minutes() < start.minutes()
}
