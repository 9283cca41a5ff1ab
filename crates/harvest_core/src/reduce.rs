//! Fold generated ledgers into headline statistics.

use serde::Serialize;
use serde_with::skip_serializing_none;

use crate::cause::Code;
use crate::driver::Generation;
use crate::ledger::{FoodPhase, Ledgers};
use crate::season::DAYS_PER_YEAR;

#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub days: u64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub mean_temperature: f64,
    pub extreme_events: u64,
    /// Days that ended with an empty store.
    pub famine_days: u64,
    pub peak_population: u64,
    pub final_population: u64,
    pub total_births: u64,
    pub total_deaths: u64,
    pub final_food_stock: f64,
    pub extinct_on_day: Option<u64>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct YearSummary {
    pub year: u32,
    pub mean_temperature: f64,
    pub total_production: f64,
    pub famine_days: u64,
    pub births: u64,
    pub deaths: u64,
    pub end_population: u64,
    pub end_food_stock: f64,
}

pub fn summarize(generation: &Generation) -> RunSummary {
    let ledgers = &generation.ledgers;
    let days = ledgers.climate.len() as u64;
    if days == 0 {
        return RunSummary::default();
    }

    let mut min_temperature = f64::INFINITY;
    let mut max_temperature = f64::NEG_INFINITY;
    let mut temperature_sum = 0.0;
    let mut extreme_events = 0;
    for record in &ledgers.climate {
        min_temperature = min_temperature.min(record.temperature);
        max_temperature = max_temperature.max(record.temperature);
        temperature_sum += record.temperature;
        if record.event.is_some() {
            extreme_events += 1;
        }
    }

    let famine_days = ledgers
        .food
        .iter()
        .filter(|entry| entry.phase == FoodPhase::Consumption && entry.stock <= 0.0)
        .count() as u64;

    let peak_population = ledgers
        .population
        .iter()
        .map(|entry| entry.population)
        .max()
        .unwrap_or(0);

    RunSummary {
        days,
        min_temperature,
        max_temperature,
        mean_temperature: temperature_sum / days as f64,
        extreme_events,
        famine_days,
        peak_population,
        final_population: ledgers.population.last().map_or(0, |entry| entry.population),
        total_births: ledgers.population.iter().map(|entry| entry.births).sum(),
        total_deaths: ledgers.population.iter().map(|entry| entry.deaths).sum(),
        final_food_stock: ledgers.food.last().map_or(0.0, |entry| entry.stock),
        extinct_on_day: generation
            .chronicle
            .iter()
            .find(|entry| entry.code == Code::Extinction)
            .map(|entry| entry.day_index),
    }
}

/// Per-year rollup of the ledgers, in year order.
pub fn yearly(ledgers: &Ledgers) -> Vec<YearSummary> {
    let year_length = DAYS_PER_YEAR as usize;
    ledgers
        .climate
        .chunks(year_length)
        .zip(ledgers.population.chunks(year_length))
        .zip(ledgers.food.chunks(year_length * 2))
        .enumerate()
        .map(|(year, ((climate, population), food))| {
            let mean_temperature = if climate.is_empty() {
                0.0
            } else {
                climate.iter().map(|record| record.temperature).sum::<f64>() / climate.len() as f64
            };
            YearSummary {
                year: year as u32,
                mean_temperature,
                total_production: food.iter().filter_map(|entry| entry.production).sum(),
                famine_days: food
                    .iter()
                    .filter(|entry| entry.phase == FoodPhase::Consumption && entry.stock <= 0.0)
                    .count() as u64,
                births: population.iter().map(|entry| entry.births).sum(),
                deaths: population.iter().map(|entry| entry.deaths).sum(),
                end_population: population.last().map_or(0, |entry| entry.population),
                end_food_stock: food.last().map_or(0.0, |entry| entry.stock),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::driver::Driver;

    #[test]
    fn empty_generation_summarizes_to_defaults() {
        assert_eq!(summarize(&Generation::default()), RunSummary::default());
        assert!(yearly(&Ledgers::default()).is_empty());
    }

    #[test]
    fn summary_agrees_with_ledgers() {
        let config = SimulationConfig {
            year_count: 2,
            ..SimulationConfig::default()
        };
        let generation = Driver::new(config).run();
        let summary = summarize(&generation);
        let ledgers = &generation.ledgers;

        assert_eq!(summary.days, 730);
        assert!(summary.min_temperature <= summary.mean_temperature);
        assert!(summary.mean_temperature <= summary.max_temperature);
        assert_eq!(
            summary.final_population,
            ledgers.population[729].population
        );
        assert!(summary.peak_population >= summary.final_population);
        assert_eq!(
            summary.extreme_events as usize,
            ledgers.climate.iter().filter(|r| r.event.is_some()).count()
        );

        let years = yearly(ledgers);
        assert_eq!(years.len(), 2);
        assert_eq!(years[1].end_population, summary.final_population);
        assert_eq!(
            years.iter().map(|year| year.births).sum::<u64>(),
            summary.total_births
        );
        assert_eq!(
            years.iter().map(|year| year.famine_days).sum::<u64>(),
            summary.famine_days
        );
    }

    #[test]
    fn missing_extinction_day_is_omitted() {
        let value = serde_json::to_value(RunSummary::default()).expect("summary serializes");
        assert!(value.get("extinct_on_day").is_none());
        assert_eq!(value["days"], 0);
    }
}
