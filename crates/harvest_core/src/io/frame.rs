use serde::Serialize;

use crate::cause::Entry;
use crate::driver::DayOutcome;
use crate::ledger::{DailyClimateRecord, FoodLedgerEntry, PopulationLedgerEntry};

/// One simulated day as streamed to hosts.
#[derive(Clone, Debug, Serialize)]
pub struct Frame {
    pub t: u64,
    pub climate: DailyClimateRecord,
    pub food: [FoodLedgerEntry; 2],
    pub population: PopulationLedgerEntry,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub chronicle: Vec<Entry>,
    /// Set on the last day of a simulated year.
    pub year_end: bool,
}

pub fn make_frame(outcome: DayOutcome) -> Frame {
    let DayOutcome {
        climate,
        food,
        population,
        chronicle,
    } = outcome;
    Frame {
        t: climate.day_index,
        year_end: climate.day_of_year + 1 == crate::season::DAYS_PER_YEAR,
        climate,
        food,
        population,
        chronicle,
    }
}

impl Frame {
    pub fn to_ndjson(&self) -> serde_json::Result<String> {
        let mut json = serde_json::to_string(self)?;
        json.push('\n');
        Ok(json)
    }
}
