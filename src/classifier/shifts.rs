use super::overnight::OvernightIndex;
use super::types::{Classification, ConvertError, RowIssue, SkippedRow};
use super::util::{self, ANNUAL_LEAVE, ANNUAL_LEAVE_SLASHED, REST_DAY, STUDY_DAY};
use crate::model::{CalendarEvent, ClockTime, EventKind, RosterRow};
use chrono::NaiveDate;
use tracing::{debug, warn};

const MIDNIGHT_WARNING: &str = "WARNING: FINISHED AFTER MIDNIGHT ASK BEFORE PLANNING ANYTHING EARLY";
const STUDY_START: ClockTime = clock(9, 0);
const STUDY_END: ClockTime = clock(17, 0);
const END_OF_DAY: ClockTime = clock(23, 59);

const fn clock(hour: u8, minute: u8) -> ClockTime {
    match ClockTime::new(hour, minute) {
        Some(t) => t,
        None => panic!("invalid clock constant"),
    }
}

pub(super) fn classify(rows: &[RosterRow]) -> Classification {
    let index = OvernightIndex::build(rows);
    let mut out = Classification::default();

    for row in rows {
        match classify_row(row, &index) {
            Ok(event) => out.events.push(event),
            Err(issue) => {
                warn!(date = %row.date_label, %issue, "row skipped");
                out.skipped.push(SkippedRow {
                    date_label: row.date_label.clone(),
                    issue,
                });
            }
        }
    }

    debug!(
        events = out.events.len(),
        skipped = out.skipped.len(),
        overnight = index.len(),
        "roster classified"
    );
    out
}

fn classify_row(row: &RosterRow, index: &OvernightIndex) -> Result<CalendarEvent, RowIssue> {
    let date = util::extract_date(&row.date_label).ok_or(RowIssue::BadDate)?;
    let finished_at = index.get(date);
    let label = &row.date_label;

    let event = match row.start.as_str() {
        "" | REST_DAY => day_off(
            EventKind::RestDay,
            "RD",
            format!("Rest Day ({label})"),
            date,
            finished_at,
        ),
        ANNUAL_LEAVE | ANNUAL_LEAVE_SLASHED => day_off(
            EventKind::AnnualLeave,
            "A/L",
            format!("Annual Leave ({label})"),
            date,
            finished_at,
        ),
        STUDY_DAY => {
            let start = finished_at
                .map(ClockTime::one_minute_after)
                .filter(|t| t.minutes() > STUDY_START.minutes())
                .unwrap_or(STUDY_START);
            CalendarEvent::timed(
                EventKind::StudyDay,
                "STUD Day",
                (date, start),
                (date, STUDY_END),
                format!("Study Day ({label})"),
            )
        }
        _ => return work_shift(row, date),
    };

    event.map_err(RowIssue::from)
}

/// Repos ou congé : journée entière, sauf si un service de nuit s'est terminé ce jour-là.
fn day_off(
    kind: EventKind,
    subject: &str,
    description: String,
    date: NaiveDate,
    finished_at: Option<ClockTime>,
) -> Result<CalendarEvent, ConvertError> {
    match finished_at {
        // 23:59 donne 00:00 le même jour (pas de report de date).
        Some(end) => CalendarEvent::timed(
            kind,
            subject,
            (date, end.one_minute_after()),
            (date, END_OF_DAY),
            format!("{description} - {MIDNIGHT_WARNING}"),
        ),
        None => CalendarEvent::all_day(kind, subject, date, date, description),
    }
}

fn work_shift(row: &RosterRow, date: NaiveDate) -> Result<CalendarEvent, RowIssue> {
    let bad_time = || RowIssue::BadTime {
        start: row.start.clone(),
        end: row.end.clone(),
    };
    let (start, end) = util::shift_times(&row.start, &row.end).ok_or_else(bad_time)?;

    let end_date = if util::crosses_midnight(start, end) {
        util::next_day(date).ok_or(RowIssue::BadDate)?
    } else {
        date
    };

    let subject = if row.code.is_empty() {
        "Work Shift"
    } else {
        row.code.as_str()
    };

    CalendarEvent::timed(
        EventKind::WorkShift,
        subject,
        (date, start),
        (end_date, end),
        format!("Work Shift ({})", row.date_label),
    )
    .map_err(RowIssue::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(label: &str, start: &str, end: &str, code: &str) -> RosterRow {
        RosterRow {
            date_label: label.into(),
            start: start.into(),
            end: end.into(),
            code: code.into(),
        }
    }

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn t(h: u8, m: u8) -> Option<ClockTime> {
        ClockTime::new(h, m)
    }

    #[test]
    fn night_shift_then_rest_day() {
        let rows = [
            row("27/03 Th27/03/2025 Th", "22:00", "06:00", "N1"),
            row("28/03 Fr28/03/2025 Fr", "RD", "", ""),
        ];
        let out = classify(&rows);
        assert!(out.skipped.is_empty());
        let shift = &out.events[0];
        assert_eq!(shift.kind, EventKind::WorkShift);
        assert_eq!(shift.subject, "N1");
        assert_eq!(shift.start_date, ymd(2025, 3, 27));
        assert_eq!(shift.end_date, ymd(2025, 3, 28));
        assert_eq!(shift.start_time, t(22, 0));
        assert_eq!(shift.end_time, t(6, 0));

        let rest = &out.events[1];
        assert_eq!(rest.kind, EventKind::RestDay);
        assert!(!rest.all_day);
        assert_eq!(rest.start_time, t(6, 1));
        assert_eq!(rest.end_time, t(23, 59));
        assert!(rest.description.contains("FINISHED AFTER MIDNIGHT"));
    }

    #[test]
    fn day_shift_keeps_single_date_and_default_subject() {
        let out = classify(&[row("01/04 Tu01/04/2025 Tu", "07:00", "15:00", "")]);
        let ev = &out.events[0];
        assert_eq!(ev.subject, "Work Shift");
        assert_eq!(ev.start_date, ev.end_date);
        assert_eq!(ev.description, "Work Shift (01/04 Tu01/04/2025 Tu)");
    }

    #[test]
    fn plain_rest_and_leave_are_all_day() {
        let out = classify(&[
            row("01/04 Tu01/04/2025 Tu", "", "", ""),
            row("02/04 We02/04/2025 We", "AL", "", ""),
            row("03/04 Th03/04/2025 Th", "A/L", "", ""),
        ]);
        assert_eq!(out.events.len(), 3);
        assert!(out.events.iter().all(|e| e.all_day && e.start_time.is_none()));
        assert_eq!(out.events[0].subject, "RD");
        assert_eq!(out.events[1].kind, EventKind::AnnualLeave);
        assert_eq!(out.events[2].subject, "A/L");
    }

    #[test]
    fn annual_leave_after_night_shift_is_timed() {
        let out = classify(&[
            row("01/04 Tu01/04/2025 Tu", "23:00", "07:30", "N2"),
            row("02/04 We02/04/2025 We", "AL", "", ""),
        ]);
        let leave = &out.events[1];
        assert!(!leave.all_day);
        assert_eq!(leave.start_time, t(7, 31));
        assert_eq!(leave.end_time, t(23, 59));
        assert!(leave.description.starts_with("Annual Leave (02/04"));
    }

    #[test]
    fn study_day_defaults_and_late_finish() {
        let out = classify(&[
            row("01/04 Tu01/04/2025 Tu", "STUD", "", ""),
            row("02/04 We02/04/2025 We", "21:00", "06:00", "N"),
            row("03/04 Th03/04/2025 Th", "STUD", "", ""),
            row("03/04 Th03/04/2025 Th", "23:00", "09:30", "N"),
            row("04/04 Fr04/04/2025 Fr", "STUD", "", ""),
        ]);
        let studs: Vec<_> = out
            .events
            .iter()
            .filter(|e| e.kind == EventKind::StudyDay)
            .collect();
        assert_eq!(studs.len(), 3);
        assert_eq!(studs[0].start_time, t(9, 0));
        // fin à 06:00 : 06:01 n'est pas après 09:00
        assert_eq!(studs[1].start_time, t(9, 0));
        assert_eq!(studs[2].start_time, t(9, 31));
        assert!(studs.iter().all(|e| e.end_time == t(17, 0) && !e.all_day));
    }

    #[test]
    fn study_day_start_moves_only_after_nine() {
        let out = classify(&[
            row("01/04 Tu01/04/2025 Tu", "22:00", "08:58", "N"),
            row("02/04 We02/04/2025 We", "STUD", "", ""),
            row("02/04 We02/04/2025 We", "22:00", "08:59", "N"),
            row("03/04 Th03/04/2025 Th", "STUD", "", ""),
            row("03/04 Th03/04/2025 Th", "22:00", "09:00", "N"),
            row("04/04 Fr04/04/2025 Fr", "STUD", "", ""),
        ]);
        let starts: Vec<_> = out
            .events
            .iter()
            .filter(|e| e.kind == EventKind::StudyDay)
            .map(|e| e.start_time)
            .collect();
        // fin 08:58 ou 08:59 : 09:00 ; fin 09:00 : 09:01
        assert_eq!(starts, vec![t(9, 0), t(9, 0), t(9, 1)]);
    }

    #[test]
    fn latest_possible_overnight_finish() {
        let out = classify(&[
            row("01/04 Tu01/04/2025 Tu", "23:59", "23:58", "X"),
            row("02/04 We02/04/2025 We", "RD", "", ""),
        ]);
        let rest = &out.events[1];
        assert_eq!(rest.start_date, ymd(2025, 4, 2));
        assert_eq!(rest.start_time, t(23, 59));
        assert_eq!(rest.end_time, t(23, 59));
    }

    #[test]
    fn malformed_rows_are_skipped_without_side_effects() {
        let out = classify(&[
            row("01/04 Tu01/04/2025 Tu", "22:00", "06:00", "N1"),
            row("02/04 We02/04/2025 We", "2200", "0600", "N1"),
            row("no date here", "07:00", "15:00", "E"),
            row("03/04 Th03/04/2025 Th", "07:00", "15:00", "E"),
        ]);
        assert_eq!(out.events.len(), 2);
        assert_eq!(out.skipped.len(), 2);
        assert_eq!(out.skipped[1].issue, RowIssue::BadDate);
        assert!(matches!(out.skipped[0].issue, RowIssue::BadTime { .. }));
        assert_eq!(out.events[1].subject, "E");
        assert_eq!(out.events[1].start_date, out.events[1].end_date);
    }

    #[test]
    fn unknown_code_without_times_is_skipped() {
        let out = classify(&[row("01/04 Tu01/04/2025 Tu", "SICK", "", "")]);
        assert!(out.events.is_empty());
        assert_eq!(out.skipped_count(), 1);
    }
}
