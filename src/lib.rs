#![forbid(unsafe_code)]
//! Rostercal — conversion d'exports TRACS (CSV) en calendrier iCalendar.
//!
//! - Lecture CSV et repérage de la ligne d'en-tête.
//! - Classification en deux passages (services de nuit, repos, congés, formation).
//! - Filtrage (tout / services / jours off) puis sérialisation `.ics`.
//! - Pipeline pur ; l'état d'interface vit dans [`session::Session`].

pub mod classifier;
pub mod filter;
pub mod ical;
pub mod io;
pub mod model;
pub mod session;
pub mod storage;

pub use classifier::{
    classify, convert, Classification, ConvertError, OvernightIndex, RowIssue, SkippedRow,
};
pub use filter::{apply_filter, FilterMode};
pub use ical::{serialize_calendar, to_ical, IcalOptions, RandomUid, UidSource, DEFAULT_FILENAME};
pub use model::{CalendarEvent, ClockTime, EventKind, RosterRow};
pub use session::{Action, Download, Section, Session, Status, StatusKind};
pub use storage::{CalendarSink, FileSink};
