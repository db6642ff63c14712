use crate::classifier::ConvertError;
use crate::model::{CalendarEvent, ClockTime};
use chrono::{DateTime, NaiveDate, Utc};
use tracing::debug;
use uuid::Uuid;

/// Nom du fichier proposé au téléchargement.
pub const DEFAULT_FILENAME: &str = "tracs_schedule.ics";
pub const DEFAULT_PROD_ID: &str = "-//TRACS Converter//EN";

const CRLF: &str = "\r\n";

/// Fournit l'identifiant unique de chaque VEVENT.
pub trait UidSource {
    fn next_uid(&mut self) -> String;
}

/// UUID v4 aléatoires.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomUid;

impl UidSource for RandomUid {
    fn next_uid(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct IcalOptions {
    pub prod_id: String,
}

impl Default for IcalOptions {
    fn default() -> Self {
        Self {
            prod_id: DEFAULT_PROD_ID.to_string(),
        }
    }
}

/// Sérialise avec l'heure courante et des UID aléatoires ; refuse une liste vide.
pub fn to_ical(events: &[CalendarEvent], opts: &IcalOptions) -> Result<String, ConvertError> {
    if events.is_empty() {
        return Err(ConvertError::EmptyResult);
    }
    Ok(serialize_calendar(events, opts, Utc::now(), &mut RandomUid))
}

/// Produit un VCALENDAR complet (lignes séparées par CRLF).
pub fn serialize_calendar(
    events: &[CalendarEvent],
    opts: &IcalOptions,
    stamp: DateTime<Utc>,
    uids: &mut dyn UidSource,
) -> String {
    let mut lines = vec![
        "BEGIN:VCALENDAR".to_string(),
        "VERSION:2.0".to_string(),
        format!("PRODID:{}", opts.prod_id),
        "CALSCALE:GREGORIAN".to_string(),
        "METHOD:PUBLISH".to_string(),
    ];
    let dtstamp = stamp.format("%Y%m%dT%H%M%SZ").to_string();

    for ev in events {
        if ev.subject.is_empty() {
            debug!(date = %ev.start_date, "event without subject skipped");
            continue;
        }
        let Some((dtstart, dtend)) = render_bounds(ev) else {
            debug!(date = %ev.start_date, "event end out of range, skipped");
            continue;
        };

        lines.push("BEGIN:VEVENT".to_string());
        lines.push(format!("UID:{}", uids.next_uid()));
        lines.push(dtstart);
        lines.push(dtend);
        lines.push(format!("SUMMARY:{}", escape_text(&ev.subject)));
        if !ev.description.is_empty() {
            lines.push(format!("DESCRIPTION:{}", escape_text(&ev.description)));
        }
        if !ev.location.is_empty() {
            lines.push(format!("LOCATION:{}", escape_text(&ev.location)));
        }
        lines.push(format!("DTSTAMP:{dtstamp}"));
        lines.push("END:VEVENT".to_string());
    }

    lines.push("END:VCALENDAR".to_string());
    lines.join(CRLF)
}

/// Lignes DTSTART/DTEND. La fin d'un événement journée entière est exclusive (lendemain).
fn render_bounds(ev: &CalendarEvent) -> Option<(String, String)> {
    if ev.all_day {
        let end = ev.end_date.succ_opt()?;
        return Some((
            format!("DTSTART;VALUE=DATE:{}", ical_date(ev.start_date)),
            format!("DTEND;VALUE=DATE:{}", ical_date(end)),
        ));
    }
    let start = ev.start_time.or(ClockTime::new(0, 0))?;
    let end = ev.end_time.or(ClockTime::new(23, 59))?;
    Some((
        format!("DTSTART:{}", ical_datetime(ev.start_date, start)),
        format!("DTEND:{}", ical_datetime(ev.end_date, end)),
    ))
}

fn ical_date(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

fn ical_datetime(date: NaiveDate, time: ClockTime) -> String {
    format!(
        "{}T{:02}{:02}00",
        ical_date(date),
        time.hour(),
        time.minute()
    )
}

/// Échappement TEXT : l'antislash d'abord, puis `;`, `,` et les retours à la ligne.
pub fn escape_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace(';', "\\;")
        .replace(',', "\\,")
        .replace('\n', "\\n")
}
