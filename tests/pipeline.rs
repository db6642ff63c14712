#![forbid(unsafe_code)]
use chrono::{NaiveDate, TimeZone, Utc};
use rostercal::{
    apply_filter, convert, serialize_calendar, ClockTime, ConvertError, EventKind, FilterMode,
    IcalOptions, UidSource,
};

const EXPORT: &str = "\
TRACS Enterprise Roster,,,,
Name,J. Smith,,,

Date,On,Off,Code,Hours
27/03 Th27/03/2025 Th,22:00,06:00,N1,8:00
28/03 Fr28/03/2025 Fr,RD,,,
29/03 Sa29/03/2025 Sa,06:00,14:00,E4,8:00
30/03 Su30/03/2025 Su,06:00,,E4,
31/03 Mo31/03/2025 Mo,STUD,,,
01/04 Tu01/04/2025 Tu,AL,,,
Totals,,,,32:00
";

struct Fixed(u32);

impl UidSource for Fixed {
    fn next_uid(&mut self) -> String {
        self.0 += 1;
        format!("event-{}@rostercal", self.0)
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn converts_tracs_export() {
    let out = convert(EXPORT).unwrap();
    assert_eq!(out.events.len(), 5);
    assert_eq!(out.skipped_count(), 1);

    let night = &out.events[0];
    assert_eq!(night.kind, EventKind::WorkShift);
    assert_eq!(night.subject, "N1");
    assert_eq!(night.start_date, ymd(2025, 3, 27));
    assert_eq!(night.end_date, ymd(2025, 3, 28));

    let rest = &out.events[1];
    assert_eq!(rest.kind, EventKind::RestDay);
    assert!(!rest.all_day);
    assert_eq!(rest.start_time, ClockTime::new(6, 1));
    assert_eq!(rest.end_time, ClockTime::new(23, 59));

    let early = &out.events[2];
    assert_eq!(early.start_date, early.end_date);

    assert_eq!(out.events[3].kind, EventKind::StudyDay);
    assert_eq!(out.events[4].kind, EventKind::AnnualLeave);
    assert!(out.events[4].all_day);
}

#[test]
fn every_event_respects_date_and_time_invariants() {
    let out = convert(EXPORT).unwrap();
    for ev in &out.events {
        ev.validate().unwrap();
        assert!(ev.start_date <= ev.end_date);
        assert!(ev.location.is_empty());
    }
}

#[test]
fn filters_partition_the_events() {
    let events = convert(EXPORT).unwrap().events;
    let work = apply_filter(&events, FilterMode::Workdays);
    let off = apply_filter(&events, FilterMode::DaysOff);
    assert_eq!(work.len(), 3);
    assert_eq!(off.len(), 2);
    assert!(off.iter().all(|e| !work.contains(e)));
    assert_eq!(work.len() + off.len(), apply_filter(&events, FilterMode::All).len());
}

#[test]
fn header_missing_is_reported() {
    let err = convert("Name,J. Smith\n27/03 Th27/03/2025 Th,RD,,\n").unwrap_err();
    assert!(matches!(err, ConvertError::HeaderNotFound));
}

#[test]
fn calendar_snapshot() {
    let events = convert(EXPORT).unwrap().events;
    let days_off = apply_filter(&events, FilterMode::DaysOff);
    let stamp = Utc.with_ymd_and_hms(2025, 3, 20, 8, 15, 0).unwrap();
    let ics = serialize_calendar(&days_off, &IcalOptions::default(), stamp, &mut Fixed(0));
    assert!(ics.contains("\r\n"));
    insta::assert_snapshot!(ics.replace("\r\n", "\n"), @r"
    BEGIN:VCALENDAR
    VERSION:2.0
    PRODID:-//TRACS Converter//EN
    CALSCALE:GREGORIAN
    METHOD:PUBLISH
    BEGIN:VEVENT
    UID:event-1@rostercal
    DTSTART:20250328T060100
    DTEND:20250328T235900
    SUMMARY:RD
    DESCRIPTION:Rest Day (28/03 Fr28/03/2025 Fr) - WARNING: FINISHED AFTER MIDNIGHT ASK BEFORE PLANNING ANYTHING EARLY
    DTSTAMP:20250320T081500Z
    END:VEVENT
    BEGIN:VEVENT
    UID:event-2@rostercal
    DTSTART;VALUE=DATE:20250401
    DTEND;VALUE=DATE:20250402
    SUMMARY:A/L
    DESCRIPTION:Annual Leave (01/04 Tu01/04/2025 Tu)
    DTSTAMP:20250320T081500Z
    END:VEVENT
    END:VCALENDAR
    ");
}

#[test]
fn text_fields_are_escaped() {
    let text = "Date,On,Off,Code\n\"01/04 Tu01/04/2025 Tu\",07:00,15:00,\"E1;a,b\"\n";
    let events = convert(text).unwrap().events;
    let stamp = Utc.with_ymd_and_hms(2025, 3, 20, 8, 15, 0).unwrap();
    let ics = serialize_calendar(&events, &IcalOptions::default(), stamp, &mut Fixed(0));
    assert!(ics.contains(r"SUMMARY:E1\;a\,b"));
}
