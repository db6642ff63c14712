use crate::classifier::ConvertError;
use crate::model::{display_date, CalendarEvent, RosterRow};
use anyhow::Context;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;
use tracing::debug;

const HEADER_LABELS: [&str; 3] = ["Date", "On", "Off"];

/// Découpe un texte CSV en lignes de cellules ; les lignes vides sont ignorées.
pub fn parse_rows(text: &str) -> Result<Vec<Vec<String>>, ConvertError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        if rec.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        out.push(rec.iter().map(str::to_string).collect());
    }
    Ok(out)
}

/// Index de la première ligne contenant à la fois "Date", "On" et "Off".
pub fn find_header(rows: &[Vec<String>]) -> Result<usize, ConvertError> {
    rows.iter()
        .position(|row| {
            HEADER_LABELS
                .iter()
                .all(|label| row.iter().any(|cell| cell.trim() == *label))
        })
        .ok_or(ConvertError::HeaderNotFound)
}

/// Lignes de données d'un export TRACS (tout ce qui suit l'en-tête).
pub fn roster_rows(text: &str) -> Result<Vec<RosterRow>, ConvertError> {
    let rows = parse_rows(text)?;
    let header = find_header(&rows)?;
    debug!(header_row = header, total_rows = rows.len(), "TRACS header located");
    Ok(rows[header + 1..]
        .iter()
        .map(|fields| RosterRow::from_fields(fields))
        .filter(|row| row.date_label.contains('/'))
        .collect())
}

/// Refuse tout fichier dont l'extension n'est pas `.csv`.
pub fn check_csv_path<P: AsRef<Path>>(path: P) -> Result<(), ConvertError> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(ConvertError::NotCsv(path.display().to_string()))
    }
}

/// Lit un export TRACS depuis le disque.
pub fn read_roster_file<P: AsRef<Path>>(path: P) -> anyhow::Result<String> {
    let path = path.as_ref();
    check_csv_path(path)?;
    fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

/// Export CSV des événements : header `Subject,Start Date,Start Time,End Date,End Time,All Day,Description,Location`
pub fn export_events_csv<P: AsRef<Path>>(path: P, events: &[CalendarEvent]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record([
        "Subject",
        "Start Date",
        "Start Time",
        "End Date",
        "End Time",
        "All Day",
        "Description",
        "Location",
    ])?;
    for ev in events {
        let start_time = ev.start_time.map(|t| t.to_string()).unwrap_or_default();
        let end_time = ev.end_time.map(|t| t.to_string()).unwrap_or_default();
        w.write_record([
            ev.subject.as_str(),
            display_date(ev.start_date).as_str(),
            start_time.as_str(),
            display_date(ev.end_date).as_str(),
            end_time.as_str(),
            if ev.all_day { "TRUE" } else { "FALSE" },
            ev.description.as_str(),
            ev.location.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
