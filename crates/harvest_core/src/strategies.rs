//! Proptest strategies for generating small but varied scenarios.

use proptest::prelude::*;

use crate::config::{PopulationParameters, SimulationConfig};
use crate::presets::{ClimatePreset, CropPreset};
use crate::season::Season;

pub fn arb_season() -> impl Strategy<Value = Season> {
    prop::sample::select(Season::ALL.to_vec())
}

pub fn arb_population_parameters() -> impl Strategy<Value = PopulationParameters> {
    (0.0f64..0.05, 0.0f64..0.05, 0.0f64..5.0).prop_map(|(birth, death, per_capita)| {
        PopulationParameters {
            base_birth_rate: birth,
            base_death_rate: death,
            food_per_capita: per_capita,
        }
    })
}

/// One-year scenarios drawn from the preset catalogs with randomised demographics.
pub fn arb_config() -> impl Strategy<Value = SimulationConfig> {
    (
        prop::sample::select(ClimatePreset::ALL.to_vec()),
        prop::sample::select(CropPreset::ALL.to_vec()),
        arb_season(),
        arb_population_parameters(),
        0.0f64..20_000.0,
        0u64..20_000,
        -500.0f64..500.0,
    )
        .prop_map(
            |(climate, crop, starting_season, population, food, people, seed)| SimulationConfig {
                year_count: 1,
                starting_season,
                population,
                starting_food_stock: food,
                starting_population: people,
                seed,
                ..SimulationConfig::default()
            }
            .with_climate(climate)
            .with_crop(crop),
        )
}
