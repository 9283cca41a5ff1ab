use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::config::{CropParameters, FarmlandScaling, PopulationParameters, SimulationConfig};
use crate::presets::{ClimatePreset, CropPreset};
use crate::season::{Season, SeasonProfiles, SeasonTable};

/// Parsed scenario document.
///
/// Presets are applied first, then every field present in the document overrides the result.
#[skip_serializing_none]
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    pub name: String,
    pub climate: Option<ClimatePreset>,
    pub crop_preset: Option<CropPreset>,
    pub year_count: Option<u32>,
    pub starting_season: Option<Season>,
    pub season_table: Option<SeasonTable>,
    pub profiles: Option<SeasonProfiles>,
    pub crop: Option<CropParameters>,
    pub population: Option<PopulationParameters>,
    pub farmland: Option<FarmlandScaling>,
    pub starting_food_stock: Option<f64>,
    pub starting_population: Option<u64>,
    pub seed: Option<f64>,
}

impl Scenario {
    /// Load a scenario JSON document from disk.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let file =
            File::open(path).with_context(|| format!("failed to open scenario file {:?}", path))?;
        Self::from_reader(BufReader::new(file))
    }

    /// Deserialize a scenario document from an arbitrary reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        serde_json::from_reader(reader).context("invalid scenario json")
    }

    /// Realise the simulation configuration described by this scenario.
    pub fn build_config(&self) -> SimulationConfig {
        let mut config = SimulationConfig::default();
        if let Some(preset) = self.climate {
            config = config.with_climate(preset);
        }
        if let Some(preset) = self.crop_preset {
            config = config.with_crop(preset);
        }

        if let Some(table) = &self.season_table {
            config.season_table = table.clone();
        }
        if let Some(profiles) = self.profiles {
            config.season_table.profiles = profiles;
        }
        if let Some(year_count) = self.year_count {
            config.year_count = year_count;
        }
        if let Some(season) = self.starting_season {
            config.starting_season = season;
        }
        if let Some(crop) = self.crop {
            config.crop = crop;
        }
        if let Some(population) = self.population {
            config.population = population;
        }
        if let Some(farmland) = self.farmland {
            config.farmland = farmland;
        }
        if let Some(stock) = self.starting_food_stock {
            config.starting_food_stock = stock;
        }
        if let Some(people) = self.starting_population {
            config.starting_population = people;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        config
    }
}
