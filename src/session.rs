//! État explicite d'une session de conversion, piloté par un reducer.
//!
//! Les fonctions de conversion restent pures ; la session ne fait que
//! les enchaîner et garder le résultat courant (fichier, filtre, statut).

use crate::classifier::{self, ConvertError};
use crate::filter::{apply_filter, FilterMode};
use crate::ical::{self, IcalOptions, DEFAULT_FILENAME};
use crate::io;
use crate::model::CalendarEvent;
use tracing::{debug, info};

/// Nombre d'événements affichés en aperçu.
pub const PREVIEW_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    Upload,
    Instructions,
    Options,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub title: String,
    pub message: String,
}

impl Status {
    fn error(title: &str, message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            title: title.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    /// Fichier choisi par l'utilisateur (nom + contenu texte).
    Load { file_name: String, contents: String },
    SelectFilter(FilterMode),
    Navigate(Section),
    Generate,
    Reset,
}

/// Fichier prêt à être téléchargé.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub file_name: String,
    pub content: String,
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    file_name: Option<String>,
    all_events: Vec<CalendarEvent>,
    filtered: Vec<CalendarEvent>,
    filter: FilterMode,
    skipped: usize,
    section: Section,
    status: Option<Status>,
    ical: IcalOptions,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_ical_options(ical: IcalOptions) -> Self {
        Self {
            ical,
            ..Self::default()
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }
    pub fn events(&self) -> &[CalendarEvent] {
        &self.all_events
    }
    pub fn filtered(&self) -> &[CalendarEvent] {
        &self.filtered
    }
    pub fn filter(&self) -> FilterMode {
        self.filter
    }
    pub fn skipped(&self) -> usize {
        self.skipped
    }
    pub fn section(&self) -> Section {
        self.section
    }
    pub fn status(&self) -> Option<&Status> {
        self.status.as_ref()
    }

    /// Premiers événements filtrés.
    pub fn preview(&self, n: usize) -> &[CalendarEvent] {
        &self.filtered[..n.min(self.filtered.len())]
    }

    pub fn dispatch(&mut self, action: Action) -> Option<Download> {
        match action {
            Action::Load {
                file_name,
                contents,
            } => {
                self.load(file_name, &contents);
                None
            }
            Action::SelectFilter(mode) => {
                if !self.all_events.is_empty() {
                    self.filter = mode;
                    self.filtered = apply_filter(&self.all_events, mode);
                }
                None
            }
            Action::Navigate(section) => {
                if section != Section::Options || !self.all_events.is_empty() {
                    self.section = section;
                }
                None
            }
            Action::Generate => self.generate(),
            Action::Reset => {
                *self = Self::with_ical_options(self.ical.clone());
                None
            }
        }
    }

    fn load(&mut self, file_name: String, contents: &str) {
        // une nouvelle sélection remplace l'état précédent
        *self = Self::with_ical_options(self.ical.clone());

        if io::check_csv_path(&file_name).is_err() {
            self.status = Some(Status::error(
                "Please select a valid CSV file",
                "The file you selected is not a CSV file. Please try again with a TRACS Enterprise CSV export.",
            ));
            return;
        }

        let classification = match classifier::convert(contents) {
            Ok(c) => c,
            Err(ConvertError::Csv(err)) => {
                debug!(%err, "CSV parse failure");
                self.status = Some(Status::error(
                    "Error Parsing CSV",
                    "There was a problem parsing your file. Please ensure it is a valid CSV file.",
                ));
                return;
            }
            Err(err) => {
                self.status = Some(Status::error(
                    "Error Processing CSV",
                    format!("There was a problem processing your file: {err}"),
                ));
                return;
            }
        };

        info!(
            file = %file_name,
            events = classification.events.len(),
            skipped = classification.skipped_count(),
            "roster loaded"
        );
        self.file_name = Some(file_name);
        self.skipped = classification.skipped_count();
        self.all_events = classification.events;
        self.filter = FilterMode::All;
        self.filtered = self.all_events.clone();
        self.section = Section::Options;
    }

    fn generate(&mut self) -> Option<Download> {
        let content = match ical::to_ical(&self.filtered, &self.ical) {
            Ok(content) => content,
            Err(err) => {
                debug!(%err, filter = %self.filter, "nothing to export");
                let message = if self.all_events.is_empty() {
                    "Please upload a file first.".to_string()
                } else {
                    format!(
                        "The \"{}\" filter keeps no {} from this file. Please choose another filter.",
                        self.filter,
                        self.filter.event_noun()
                    )
                };
                self.status = Some(Status::error("No Data Available", message));
                return None;
            }
        };

        let mut message = format!(
            "Your iCal file with {} {} is ready to download.",
            self.filtered.len(),
            self.filter.event_noun()
        );
        if self.skipped > 0 {
            message.push_str(&format!(
                " {} row(s) could not be read and were skipped.",
                self.skipped
            ));
        }
        self.status = Some(Status {
            kind: StatusKind::Success,
            title: "Calendar File Ready!".to_string(),
            message,
        });
        Some(Download {
            file_name: DEFAULT_FILENAME.to_string(),
            content,
        })
    }
}
