use crate::model::CalendarEvent;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sous-ensemble d'événements à exporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    #[default]
    All,
    /// Services et jours de formation
    Workdays,
    /// Repos et congés annuels
    #[value(name = "daysoff")]
    DaysOff,
}

impl FilterMode {
    pub fn keeps(self, event: &CalendarEvent) -> bool {
        match self {
            FilterMode::All => true,
            FilterMode::Workdays => !event.kind.is_day_off(),
            FilterMode::DaysOff => event.kind.is_day_off(),
        }
    }

    /// Libellé utilisé dans les messages ("12 work shifts and STUD days").
    pub fn event_noun(self) -> &'static str {
        match self {
            FilterMode::All => "events",
            FilterMode::Workdays => "work shifts and STUD days",
            FilterMode::DaysOff => "rest days and annual leave",
        }
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FilterMode::All => "all",
            FilterMode::Workdays => "workdays",
            FilterMode::DaysOff => "daysoff",
        })
    }
}

impl FromStr for FilterMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(FilterMode::All),
            "workdays" => Ok(FilterMode::Workdays),
            "daysoff" => Ok(FilterMode::DaysOff),
            other => Err(format!("unknown filter: {other}")),
        }
    }
}

/// Filtre en conservant l'ordre d'origine.
pub fn apply_filter(events: &[CalendarEvent], mode: FilterMode) -> Vec<CalendarEvent> {
    events.iter().filter(|ev| mode.keeps(ev)).cloned().collect()
}
