use std::fmt;

use serde::Serialize;

/// Kind of notable moment recorded in a run's chronicle.
#[derive(Clone, Copy, Debug, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    ExtremeHeat,
    ExtremeCold,
    FamineOnset,
    FamineRelief,
    Extinction,
}

impl Code {
    pub fn as_str(&self) -> &'static str {
        match self {
            Code::ExtremeHeat => "extreme_heat",
            Code::ExtremeCold => "extreme_cold",
            Code::FamineOnset => "famine_onset",
            Code::FamineRelief => "famine_relief",
            Code::Extinction => "extinction",
        }
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured chronicle entry used for diagnostics and auditing.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct Entry {
    pub day_index: u64,
    pub code: Code,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Entry {
    pub fn new(day_index: u64, code: Code, note: Option<String>) -> Self {
        Self {
            day_index,
            code,
            note,
        }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.note {
            Some(note) => write!(f, "day {}: {} ({})", self.day_index, self.code, note),
            None => write!(f, "day {}: {}", self.day_index, self.code),
        }
    }
}
