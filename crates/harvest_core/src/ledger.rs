//! Output ledgers produced by a generation pass.
//!
//! Temperatures and food amounts are rounded to one decimal here, at the output boundary;
//! the driver keeps full precision in its running state.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::fixed::{clamp_stock, round_tenths};
use crate::kernels::population::PopulationStep;
use crate::kernels::temperature::ExtremeEvent;
use crate::season::Season;

#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyClimateRecord {
    pub day_index: u64,
    pub year: u32,
    pub day_of_year: u32,
    pub season: Season,
    pub temperature: f64,
    #[serde(default)]
    pub event: Option<ExtremeEvent>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPhase {
    Growth,
    Consumption,
}

/// Stock level after one half of a day.
///
/// Growth entries sit at `x = day_index` and carry `production`; consumption entries sit at
/// `x = day_index + 0.5` and carry `consumption`.
#[skip_serializing_none]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FoodLedgerEntry {
    pub x: f64,
    pub stock: f64,
    pub phase: FoodPhase,
    #[serde(default)]
    pub production: Option<f64>,
    #[serde(default)]
    pub consumption: Option<f64>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationLedgerEntry {
    pub day_index: u64,
    pub population: u64,
    pub births: u64,
    pub deaths: u64,
    pub food_ratio: f64,
}

impl PopulationLedgerEntry {
    pub fn from_step(day_index: u64, step: &PopulationStep) -> Self {
        Self {
            day_index,
            population: step.new_population,
            births: step.births,
            deaths: step.deaths,
            food_ratio: step.food_ratio,
        }
    }
}

/// Food bookkeeping for a single day.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FoodDay {
    pub day_index: u64,
    pub production: f64,
    pub consumption: f64,
    /// Stock after the harvest is added.
    pub after_growth: f64,
    /// Stock after the day's requirement is removed, never negative.
    pub after_consumption: f64,
}

impl FoodDay {
    pub fn settle(day_index: u64, stock: f64, production: f64, food_needed: f64) -> Self {
        let after_growth = clamp_stock(stock + production);
        Self {
            day_index,
            production,
            consumption: food_needed,
            after_growth,
            after_consumption: clamp_stock(after_growth - food_needed),
        }
    }

    /// The growth and consumption ledger entries, rounded for output.
    pub fn entries(&self) -> [FoodLedgerEntry; 2] {
        let x = self.day_index as f64;
        [
            FoodLedgerEntry {
                x,
                stock: round_tenths(self.after_growth),
                phase: FoodPhase::Growth,
                production: Some(round_tenths(self.production)),
                consumption: None,
            },
            FoodLedgerEntry {
                x: x + 0.5,
                stock: round_tenths(self.after_consumption),
                phase: FoodPhase::Consumption,
                production: None,
                consumption: Some(round_tenths(self.consumption)),
            },
        ]
    }
}

/// The three time series of one run, each ordered by day.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Ledgers {
    pub climate: Vec<DailyClimateRecord>,
    pub food: Vec<FoodLedgerEntry>,
    pub population: Vec<PopulationLedgerEntry>,
}

impl Ledgers {
    pub fn with_capacity(days: usize) -> Self {
        Self {
            climate: Vec::with_capacity(days),
            food: Vec::with_capacity(days * 2),
            population: Vec::with_capacity(days),
        }
    }

    pub fn days(&self) -> usize {
        self.climate.len()
    }
}
