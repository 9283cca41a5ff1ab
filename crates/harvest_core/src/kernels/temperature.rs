//! Daily temperature synthesis.
//!
//! A day's temperature is the sum of independent layers evaluated from the day index, the
//! scenario seed and the season calendar. Nothing is carried between days, so any day can be
//! sampled in isolation and in any order.

use std::f64::consts::{PI, TAU};

use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::fixed::{cosine_ease, finite_or_zero, round_tenths};
use crate::season::{Season, SeasonCalendar, SeasonPosition, SeasonProfiles, DAYS_PER_YEAR};

/// Share of a season's amplitude applied as the intra-season wiggle.
const WIGGLE_SCALE: f64 = 0.3;
const WEEKLY_AMPLITUDE_F: f64 = 2.0;
const WEEKLY_PERIOD_DAYS: f64 = 7.0;
const SLOW_NOISE_AMPLITUDE_F: f64 = 3.0;
const SLOW_NOISE_PERIOD: f64 = 20.0;
const SLOW_NOISE_SEED_SCALE: f64 = 10.0;
const FAST_NOISE_AMPLITUDE_F: f64 = 2.0;
const FAST_NOISE_PERIOD: f64 = 10.0;
const FAST_NOISE_SEED_SCALE: f64 = 20.0;
const EVENT_TRIGGER_RATE: f64 = 0.7453;
const EVENT_TRIGGER_SEED_SCALE: f64 = 100.0;
pub const EVENT_THRESHOLD: f64 = 0.97;
const EVENT_MAGNITUDE_RATE: f64 = 0.3119;
const EVENT_MAGNITUDE_SEED_SCALE: f64 = 50.0;
pub const EVENT_MAGNITUDE_MIN_F: f64 = 8.0;
pub const EVENT_MAGNITUDE_SPAN_F: f64 = 6.0;
const EVENT_DIRECTION_RATE: f64 = 0.5381;
const EVENT_DIRECTION_SEED_SCALE: f64 = 30.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Heat,
    Cold,
}

/// A rare temperature spike or dip layered onto the smooth climate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExtremeEvent {
    pub kind: EventKind,
    /// Unsigned size of the excursion in °F.
    pub magnitude: f64,
}

impl ExtremeEvent {
    pub fn delta(&self) -> f64 {
        match self.kind {
            EventKind::Heat => self.magnitude,
            EventKind::Cold => -self.magnitude,
        }
    }
}

/// Everything a layer may read about the day being sampled.
#[derive(Clone, Copy, Debug)]
pub struct DayContext<'a> {
    /// Absolute, 0-based day across all simulated years.
    pub day_index: u64,
    pub day_of_year: u32,
    pub seed: f64,
    pub position: SeasonPosition,
    pub calendar: &'a SeasonCalendar,
    pub profiles: &'a SeasonProfiles,
}

impl DayContext<'_> {
    fn t(&self) -> f64 {
        self.day_index as f64
    }
}

/// A layer's additive share of the day's temperature.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Contribution {
    pub delta: f64,
    pub event: Option<ExtremeEvent>,
}

impl Contribution {
    pub fn delta(delta: f64) -> Self {
        Self { delta, event: None }
    }
}

/// One additive term of the daily temperature.
///
/// Layers must be pure functions of the [`DayContext`] so that runs stay reproducible.
pub trait TemperatureLayer: Send + Sync {
    fn name(&self) -> &'static str;
    fn contribution(&self, day: &DayContext<'_>) -> Contribution;
}

/// Cosine-eased blend between neighbouring season means plus a small intra-season wiggle.
#[derive(Clone, Copy, Debug, Default)]
pub struct SeasonalBaseline;

impl TemperatureLayer for SeasonalBaseline {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn contribution(&self, day: &DayContext<'_>) -> Contribution {
        let Some(bracket) = day.calendar.bracket(f64::from(day.day_of_year)) else {
            return Contribution::default();
        };
        let previous = day.profiles.get(bracket.previous).mean;
        let next = day.profiles.get(bracket.next).mean;
        let base = previous + (next - previous) * cosine_ease(bracket.fraction);

        let amplitude = day.profiles.get(bracket.nearest()).amplitude;
        let wiggle = amplitude * (day.position.progress * PI).sin() * WIGGLE_SCALE;
        Contribution::delta(base + wiggle)
    }
}

/// Seed-independent weather fronts with a seven day period.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeeklyOscillation;

impl TemperatureLayer for WeeklyOscillation {
    fn name(&self) -> &'static str {
        "weekly"
    }

    fn contribution(&self, day: &DayContext<'_>) -> Contribution {
        Contribution::delta(WEEKLY_AMPLITUDE_F * (TAU * day.t() / WEEKLY_PERIOD_DAYS).sin())
    }
}

/// Two seed-phased sine waves giving repeatable day-to-day texture.
#[derive(Clone, Copy, Debug, Default)]
pub struct WeatherNoise;

impl TemperatureLayer for WeatherNoise {
    fn name(&self) -> &'static str {
        "noise"
    }

    fn contribution(&self, day: &DayContext<'_>) -> Contribution {
        let t = day.t();
        let slow = SLOW_NOISE_AMPLITUDE_F
            * (t / SLOW_NOISE_PERIOD + day.seed * SLOW_NOISE_SEED_SCALE).sin();
        let fast = FAST_NOISE_AMPLITUDE_F
            * (t / FAST_NOISE_PERIOD + day.seed * FAST_NOISE_SEED_SCALE).sin();
        Contribution::delta(slow + fast)
    }
}

/// Rare heat waves and cold snaps biased by season.
#[derive(Clone, Copy, Debug)]
pub struct ExtremeEvents {
    pub threshold: f64,
}

impl Default for ExtremeEvents {
    fn default() -> Self {
        Self {
            threshold: EVENT_THRESHOLD,
        }
    }
}

impl ExtremeEvents {
    pub fn detect(&self, day: &DayContext<'_>) -> Option<ExtremeEvent> {
        let t = day.t();
        let trigger =
            ((t * EVENT_TRIGGER_RATE + day.seed * EVENT_TRIGGER_SEED_SCALE).sin() + 1.0) / 2.0;
        if trigger.is_nan() || trigger <= self.threshold {
            return None;
        }

        let draw =
            ((t * EVENT_MAGNITUDE_RATE + day.seed * EVENT_MAGNITUDE_SEED_SCALE).sin() + 1.0) / 2.0;
        let magnitude = EVENT_MAGNITUDE_MIN_F + EVENT_MAGNITUDE_SPAN_F * draw;
        let kind = match day.position.season {
            Season::Summer => EventKind::Heat,
            Season::Winter => EventKind::Cold,
            Season::Spring | Season::Fall => {
                let direction =
                    (t * EVENT_DIRECTION_RATE + day.seed * EVENT_DIRECTION_SEED_SCALE).sin();
                if direction >= 0.0 {
                    EventKind::Heat
                } else {
                    EventKind::Cold
                }
            }
        };
        Some(ExtremeEvent { kind, magnitude })
    }
}

impl TemperatureLayer for ExtremeEvents {
    fn name(&self) -> &'static str {
        "extreme"
    }

    fn contribution(&self, day: &DayContext<'_>) -> Contribution {
        match self.detect(day) {
            Some(event) => Contribution {
                delta: event.delta(),
                event: Some(event),
            },
            None => Contribution::default(),
        }
    }
}

/// A day's temperature together with the share of each layer.
#[derive(Clone, Debug, PartialEq)]
pub struct TemperatureSample {
    pub day_index: u64,
    pub position: SeasonPosition,
    /// Rounded to one decimal; 0 °F when the layer sum is not finite.
    pub temperature: f64,
    pub layers: Vec<(&'static str, f64)>,
    pub event: Option<ExtremeEvent>,
}

/// Ordered set of temperature layers.
pub struct TemperatureSynthesizer {
    layers: Vec<Box<dyn TemperatureLayer>>,
}

impl Default for TemperatureSynthesizer {
    fn default() -> Self {
        Self::standard()
    }
}

impl std::fmt::Debug for TemperatureSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.layers.iter().map(|layer| layer.name()))
            .finish()
    }
}

impl TemperatureSynthesizer {
    /// Baseline, weekly oscillation, noise, and extreme events.
    pub fn standard() -> Self {
        Self::empty()
            .with_layer(SeasonalBaseline)
            .with_layer(WeeklyOscillation)
            .with_layer(WeatherNoise)
            .with_layer(ExtremeEvents::default())
    }

    pub fn empty() -> Self {
        Self { layers: Vec::new() }
    }

    /// Append a layer; it is summed after the existing ones.
    pub fn with_layer(mut self, layer: impl TemperatureLayer + 'static) -> Self {
        self.layers.push(Box::new(layer));
        self
    }

    pub fn layer_names(&self) -> Vec<&'static str> {
        self.layers.iter().map(|layer| layer.name()).collect()
    }

    pub fn sample(
        &self,
        day_index: u64,
        seed: f64,
        calendar: &SeasonCalendar,
        profiles: &SeasonProfiles,
    ) -> TemperatureSample {
        let day_of_year = (day_index % u64::from(DAYS_PER_YEAR)) as u32;
        let position = calendar.resolve(day_of_year);
        let context = DayContext {
            day_index,
            day_of_year,
            seed,
            position,
            calendar,
            profiles,
        };

        let mut total = 0.0;
        let mut event = None;
        let mut layers = Vec::with_capacity(self.layers.len());
        for layer in &self.layers {
            let contribution = layer.contribution(&context);
            total += contribution.delta;
            event = event.or(contribution.event);
            layers.push((layer.name(), contribution.delta));
        }

        TemperatureSample {
            day_index,
            position,
            temperature: round_tenths(finite_or_zero(total)),
            layers,
            event,
        }
    }
}

/// Temperature in °F for a single day using the standard layers.
pub fn temperature(day_index: u64, seed: f64, config: &SimulationConfig) -> f64 {
    let calendar = SeasonCalendar::new(&config.season_table, config.starting_season);
    TemperatureSynthesizer::standard()
        .sample(day_index, seed, &calendar, &config.season_table.profiles)
        .temperature
}
