use crate::model::CalendarEvent;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("not a CSV file: {0}")]
    NotCsv(String),
    #[error(
        "could not find header row in CSV; please ensure this is a valid TRACS Enterprise export file"
    )]
    HeaderNotFound,
    #[error("no events to export")]
    EmptyResult,
    #[error("invalid event: {0}")]
    InvalidEvent(&'static str),
    #[error("invalid time: {0:?}")]
    InvalidTime(String),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Raison pour laquelle une ligne de données a été ignorée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowIssue {
    /// Pas de jeton DD/MM/YYYY exploitable dans la cellule de date.
    BadDate,
    /// Heures début/fin absentes ou mal formées pour un service.
    BadTime { start: String, end: String },
    /// Événement refusé par les invariants de `CalendarEvent`.
    InvalidEvent(String),
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::BadDate => write!(f, "unrecognised date"),
            RowIssue::BadTime { start, end } => write!(f, "invalid time format: {start} - {end}"),
            RowIssue::InvalidEvent(reason) => f.write_str(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub date_label: String,
    pub issue: RowIssue,
}

/// Résultat d'une conversion : événements dans l'ordre des lignes + lignes ignorées.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    pub events: Vec<CalendarEvent>,
    pub skipped: Vec<SkippedRow>,
}

impl From<ConvertError> for RowIssue {
    fn from(err: ConvertError) -> Self {
        RowIssue::InvalidEvent(err.to_string())
    }
}

impl Classification {
    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}
