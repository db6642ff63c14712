//! Classification des lignes TRACS en événements calendrier (deux passages).

mod overnight;
mod shifts;
mod types;
mod util;

pub use overnight::OvernightIndex;
pub use types::{Classification, ConvertError, RowIssue, SkippedRow};
pub use util::extract_date;

use crate::io;
use crate::model::RosterRow;

/// Classe les lignes de données : repos, congés, formation ou service.
pub fn classify(rows: &[RosterRow]) -> Classification {
    shifts::classify(rows)
}

/// Texte CSV brut → événements classés.
pub fn convert(text: &str) -> Result<Classification, ConvertError> {
    let rows = io::roster_rows(text)?;
    Ok(classify(&rows))
}
