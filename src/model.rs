use crate::classifier::ConvertError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Nature d'un événement issu du roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    RestDay,
    AnnualLeave,
    StudyDay,
    WorkShift,
}

impl EventKind {
    /// Jours "off" : repos et congés annuels.
    pub fn is_day_off(self) -> bool {
        matches!(self, EventKind::RestDay | EventKind::AnnualLeave)
    }
}

/// Heure d'horloge HH:MM (00–23 / 00–59).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ClockTime {
    hour: u8,
    minute: u8,
}

impl ClockTime {
    pub const fn new(hour: u8, minute: u8) -> Option<Self> {
        if hour < 24 && minute < 60 {
            Some(Self { hour, minute })
        } else {
            None
        }
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn minute(self) -> u8 {
        self.minute
    }

    /// Minutes depuis minuit.
    pub fn minutes(self) -> u16 {
        u16::from(self.hour) * 60 + u16::from(self.minute)
    }

    /// Une minute plus tard. 23:59 revient à 00:00 sans changer de jour.
    pub fn one_minute_after(self) -> Self {
        let mut hour = self.hour;
        let mut minute = self.minute + 1;
        if minute >= 60 {
            minute = 0;
            hour = (hour + 1) % 24;
        }
        Self { hour, minute }
    }
}

impl FromStr for ClockTime {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConvertError::InvalidTime(s.to_string());
        let mut parts = s.trim().split(':');
        let (Some(h), Some(m), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        let hour: u8 = h.trim().parse().map_err(|_| invalid())?;
        let minute: u8 = m.trim().parse().map_err(|_| invalid())?;
        ClockTime::new(hour, minute).ok_or_else(invalid)
    }
}

impl TryFrom<String> for ClockTime {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ClockTime> for String {
    fn from(value: ClockTime) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

/// Ligne brute de l'export TRACS (après l'en-tête).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterRow {
    pub date_label: String,
    pub start: String,
    pub end: String,
    pub code: String,
}

impl RosterRow {
    /// Construit une ligne à partir des cellules CSV ; les cellules manquantes sont vides.
    pub fn from_fields(fields: &[String]) -> Self {
        let cell = |i: usize| fields.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        Self {
            date_label: fields.first().cloned().unwrap_or_default(),
            start: cell(1),
            end: cell(2),
            code: cell(3),
        }
    }
}

/// Événement calendrier produit par la classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub kind: EventKind,
    pub subject: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_time: Option<ClockTime>,
    pub end_time: Option<ClockTime>,
    pub all_day: bool,
    pub description: String,
    #[serde(default)]
    pub location: String,
}

impl CalendarEvent {
    /// Événement "journée entière" sur `[start_date, end_date]`.
    pub fn all_day(
        kind: EventKind,
        subject: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        description: impl Into<String>,
    ) -> Result<Self, ConvertError> {
        if end_date < start_date {
            return Err(ConvertError::InvalidEvent("end date before start date"));
        }
        Ok(Self {
            kind,
            subject: subject.into(),
            start_date,
            end_date,
            start_time: None,
            end_time: None,
            all_day: true,
            description: description.into(),
            location: String::new(),
        })
    }

    /// Événement horodaté ; `end_date` peut être le lendemain pour un service de nuit.
    pub fn timed(
        kind: EventKind,
        subject: impl Into<String>,
        (start_date, start_time): (NaiveDate, ClockTime),
        (end_date, end_time): (NaiveDate, ClockTime),
        description: impl Into<String>,
    ) -> Result<Self, ConvertError> {
        if end_date < start_date {
            return Err(ConvertError::InvalidEvent("end date before start date"));
        }
        Ok(Self {
            kind,
            subject: subject.into(),
            start_date,
            end_date,
            start_time: Some(start_time),
            end_time: Some(end_time),
            all_day: false,
            description: description.into(),
            location: String::new(),
        })
    }

    /// Vérifie les invariants de dates/heures (utile après désérialisation).
    pub fn validate(&self) -> Result<(), ConvertError> {
        if self.end_date < self.start_date {
            return Err(ConvertError::InvalidEvent("end date before start date"));
        }
        match (self.all_day, self.start_time, self.end_time) {
            (true, None, None) | (false, Some(_), Some(_)) => Ok(()),
            (true, _, _) => Err(ConvertError::InvalidEvent("all-day event carries times")),
            (false, _, _) => Err(ConvertError::InvalidEvent("timed event without times")),
        }
    }
}

/// Date au format canonique MM/DD/YYYY.
pub fn display_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}
