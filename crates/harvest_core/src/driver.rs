//! Day-by-day fold over climate, harvest, and population.

use serde::Serialize;

use crate::cause::{Code, Entry};
use crate::config::{SimulationConfig, MAX_YEARS};
use crate::fixed::clamp_stock;
use crate::kernels::temperature::{EventKind, TemperatureSynthesizer};
use crate::kernels::{crop, population};
use crate::ledger::{DailyClimateRecord, FoodDay, FoodLedgerEntry, Ledgers, PopulationLedgerEntry};
use crate::season::{SeasonCalendar, DAYS_PER_YEAR};

/// Ledger rows and chronicle entries produced for one simulated day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DayOutcome {
    pub climate: DailyClimateRecord,
    pub food: [FoodLedgerEntry; 2],
    pub population: PopulationLedgerEntry,
    pub chronicle: Vec<Entry>,
}

/// Result of a complete generation pass.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Generation {
    pub ledgers: Ledgers,
    pub chronicle: Vec<Entry>,
}

/// Runs one scenario forward a day at a time.
///
/// Temperature for a day depends only on the day index, the seed and the calendar; food stock
/// and population are carried from one day to the next.
#[derive(Debug)]
pub struct Driver {
    config: SimulationConfig,
    calendar: SeasonCalendar,
    synthesizer: TemperatureSynthesizer,
    day: u64,
    total_days: u64,
    food: f64,
    population: u64,
    famine: bool,
}

impl Driver {
    pub fn new(config: SimulationConfig) -> Self {
        let calendar = SeasonCalendar::new(&config.season_table, config.starting_season);
        let total_days = config.total_days();
        let food = clamp_stock(config.starting_food_stock);
        let population = config.starting_population;
        Self {
            config,
            calendar,
            synthesizer: TemperatureSynthesizer::standard(),
            day: 0,
            total_days,
            food,
            population,
            famine: false,
        }
    }

    /// Replace the temperature layers used for every day of the run.
    pub fn with_synthesizer(mut self, synthesizer: TemperatureSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Index of the next day to simulate.
    pub fn day(&self) -> u64 {
        self.day
    }

    pub fn total_days(&self) -> u64 {
        self.total_days
    }

    pub fn food_stock(&self) -> f64 {
        self.food
    }

    pub fn population(&self) -> u64 {
        self.population
    }

    pub fn is_finished(&self) -> bool {
        self.day >= self.total_days
    }

    /// Season and temperature for any day of the run. Independent of the running state.
    pub fn climate_record(&self, day_index: u64) -> DailyClimateRecord {
        let sample = self.synthesizer.sample(
            day_index,
            self.config.seed,
            &self.calendar,
            &self.config.season_table.profiles,
        );
        let year_length = u64::from(DAYS_PER_YEAR);
        DailyClimateRecord {
            day_index,
            year: (day_index / year_length) as u32,
            day_of_year: (day_index % year_length) as u32,
            season: sample.position.season,
            temperature: sample.temperature,
            event: sample.event,
        }
    }

    /// Climate records for the whole horizon, computed without touching the running state.
    pub fn climate_series(&self) -> Vec<DailyClimateRecord> {
        (0..self.total_days)
            .map(|day_index| self.climate_record(day_index))
            .collect()
    }

    /// Simulate the next day, or return `None` once the horizon is reached.
    pub fn next_day(&mut self) -> Option<DayOutcome> {
        if self.is_finished() {
            return None;
        }
        let day_index = self.day;
        let mut chronicle = Vec::new();

        let climate = self.climate_record(day_index);
        if let Some(event) = climate.event {
            let code = match event.kind {
                EventKind::Heat => Code::ExtremeHeat,
                EventKind::Cold => Code::ExtremeCold,
            };
            chronicle.push(Entry::new(
                day_index,
                code,
                Some(format!("{:+.1}F in {}", event.delta(), climate.season)),
            ));
        }

        let production = crop::growth(
            climate.temperature,
            &self.config.crop,
            self.population,
            &self.config.farmland,
        );
        let food_needed = self.population as f64 * self.config.population.food_per_capita;
        let food_day = FoodDay::settle(day_index, self.food, production, food_needed);

        let step = population::step(
            self.population,
            food_day.after_growth,
            food_needed,
            &self.config.population,
        );
        if self.population > 0 && step.new_population == 0 {
            chronicle.push(Entry::new(
                day_index,
                Code::Extinction,
                Some(format!("{} deaths", step.deaths)),
            ));
        }
        self.population = step.new_population;

        self.food = food_day.after_consumption;
        if !self.famine && food_needed > 0.0 && self.food <= 0.0 {
            self.famine = true;
            chronicle.push(Entry::new(
                day_index,
                Code::FamineOnset,
                Some(format!("population {}", self.population)),
            ));
        } else if self.famine && self.food > 0.0 {
            self.famine = false;
            chronicle.push(Entry::new(
                day_index,
                Code::FamineRelief,
                Some(format!("stock {:.1}", self.food)),
            ));
        }

        self.day += 1;
        Some(DayOutcome {
            climate,
            food: food_day.entries(),
            population: PopulationLedgerEntry::from_step(day_index, &step),
            chronicle,
        })
    }

    /// Simulate every remaining day and collect the ledgers.
    pub fn run(mut self) -> Generation {
        let remaining = self.total_days.saturating_sub(self.day);
        let reserve = remaining.min(u64::from(MAX_YEARS) * u64::from(DAYS_PER_YEAR)) as usize;
        let mut generation = Generation {
            ledgers: Ledgers::with_capacity(reserve),
            chronicle: Vec::new(),
        };
        while let Some(outcome) = self.next_day() {
            let DayOutcome {
                climate,
                food,
                population,
                mut chronicle,
            } = outcome;
            generation.ledgers.climate.push(climate);
            generation.ledgers.food.extend(food);
            generation.ledgers.population.push(population);
            generation.chronicle.append(&mut chronicle);
        }
        generation
    }
}

impl Iterator for Driver {
    type Item = DayOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_day()
    }
}
