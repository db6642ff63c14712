use super::util::{self, ANNUAL_LEAVE, REST_DAY, STUDY_DAY};
use crate::model::{ClockTime, RosterRow};
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

/// Date → heure de fin d'un service de nuit commencé la veille.
#[derive(Debug, Clone, Default)]
pub struct OvernightIndex {
    ends: HashMap<NaiveDate, ClockTime>,
}

impl OvernightIndex {
    /// Premier passage : repère les services qui franchissent minuit.
    pub fn build(rows: &[RosterRow]) -> Self {
        let mut index = Self::default();
        for row in rows {
            let Some(date) = util::extract_date(&row.date_label) else {
                continue;
            };
            if row.start.is_empty() || row.end.is_empty() {
                continue;
            }
            if [REST_DAY, ANNUAL_LEAVE, STUDY_DAY].contains(&row.start.as_str()) {
                continue;
            }
            let Some((start, end)) = util::shift_times(&row.start, &row.end) else {
                debug!(
                    date = %date,
                    start = %row.start,
                    end = %row.end,
                    "invalid time format, ignored for overnight detection"
                );
                continue;
            };
            if !util::crosses_midnight(start, end) {
                continue;
            }
            if let Some(next) = util::next_day(date) {
                debug!(date = %next, end = %end, "overnight shift finishes after midnight");
                index.ends.insert(next, end);
            }
        }
        index
    }

    pub fn get(&self, date: NaiveDate) -> Option<ClockTime> {
        self.ends.get(&date).copied()
    }

    pub fn len(&self) -> usize {
        self.ends.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ends.is_empty()
    }
}
