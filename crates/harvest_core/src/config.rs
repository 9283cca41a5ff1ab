//! Simulation configuration and boundary validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::presets::{ClimatePreset, CropPreset};
use crate::season::{Season, SeasonTable, DAYS_PER_YEAR};

/// Longest run `validate` accepts.
pub const MAX_YEARS: u32 = 1_000;

/// Temperature response of the simulated crop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropParameters {
    /// Temperature (°F) at which growth peaks.
    pub optimal_temp: f64,
    /// Standard deviation (°F) of the response curve.
    pub tolerance: f64,
    /// Production per day regardless of temperature.
    pub min_growth: f64,
    /// Additional production per day at the optimum with a farmland factor of 1.
    pub max_growth: f64,
}

/// Demographic rates applied per day.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PopulationParameters {
    pub base_birth_rate: f64,
    pub base_death_rate: f64,
    pub food_per_capita: f64,
}

impl Default for PopulationParameters {
    fn default() -> Self {
        Self {
            base_birth_rate: 0.004,
            base_death_rate: 0.003,
            food_per_capita: 0.5,
        }
    }
}

/// Piecewise farmland expansion constants used to scale crop output with population.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FarmlandScaling {
    /// Populations below this keep a factor of 1.
    pub threshold: u64,
    /// Population per farmland step.
    pub step_population: u64,
    /// Factor gained per step.
    pub step_gain: f64,
    pub max_factor: f64,
}

impl Default for FarmlandScaling {
    fn default() -> Self {
        Self {
            threshold: 1_000,
            step_population: 50,
            step_gain: 0.1,
            max_factor: 20.0,
        }
    }
}

/// Complete input for one generation pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub year_count: u32,
    pub starting_season: Season,
    pub season_table: SeasonTable,
    pub crop: CropParameters,
    pub population: PopulationParameters,
    pub farmland: FarmlandScaling,
    pub starting_food_stock: f64,
    pub starting_population: u64,
    pub seed: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            year_count: 5,
            starting_season: Season::Spring,
            season_table: ClimatePreset::Temperate.season_table(),
            crop: CropPreset::Wheat.parameters(),
            population: PopulationParameters::default(),
            farmland: FarmlandScaling::default(),
            starting_food_stock: 1_000.0,
            starting_population: 800,
            seed: 0.5,
        }
    }
}

/// Structural faults that make the model undefined.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("year_count must be at least 1")]
    NoYears,
    #[error("year_count {requested} exceeds the limit of {max}")]
    TooManyYears { requested: u32, max: u32 },
    #[error("season table must define at least one season")]
    NoSeasons,
    #[error("season {0} has zero length")]
    EmptySeason(Season),
    #[error("season {0} is defined more than once")]
    DuplicateSeason(Season),
    #[error("crop tolerance must be positive and finite, got {0}")]
    InvalidTolerance(f64),
    #[error("{field} must be finite and non-negative, got {value}")]
    NegativeOrNonFinite { field: &'static str, value: f64 },
    #[error("farmland step population must be at least 1")]
    ZeroFarmlandStep,
}

/// Non-fatal findings reported to the caller alongside a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationWarning {
    /// Season lengths do not sum to a full year; boundaries drift year over year.
    SeasonLengthDrift { total_days: u32 },
    /// The starting season is not part of the season table, so no rotation is applied.
    StartingSeasonMissing { season: Season },
}

impl std::fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationWarning::SeasonLengthDrift { total_days } => write!(
                f,
                "season lengths sum to {total_days} days instead of {DAYS_PER_YEAR}; season boundaries will drift"
            ),
            ValidationWarning::StartingSeasonMissing { season } => {
                write!(f, "starting season {season} is not in the season table")
            }
        }
    }
}

impl SimulationConfig {
    /// Total number of simulated days.
    pub fn total_days(&self) -> u64 {
        u64::from(self.year_count) * u64::from(DAYS_PER_YEAR)
    }

    /// Apply a climate preset's season lengths and profiles.
    pub fn with_climate(mut self, preset: ClimatePreset) -> Self {
        self.season_table = preset.season_table();
        self
    }

    /// Apply a crop preset's parameters.
    pub fn with_crop(mut self, preset: CropPreset) -> Self {
        self.crop = preset.parameters();
        self
    }

    pub fn with_seed(mut self, seed: f64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the configuration at the caller boundary.
    ///
    /// Returns the warnings for a usable configuration, or the first structural fault.
    pub fn validate(&self) -> Result<Vec<ValidationWarning>, ConfigError> {
        if self.year_count == 0 {
            return Err(ConfigError::NoYears);
        }
        if self.year_count > MAX_YEARS {
            return Err(ConfigError::TooManyYears {
                requested: self.year_count,
                max: MAX_YEARS,
            });
        }
        let seasons = &self.season_table.seasons;
        if seasons.is_empty() {
            return Err(ConfigError::NoSeasons);
        }
        for (index, season) in seasons.iter().enumerate() {
            if season.length == 0 {
                return Err(ConfigError::EmptySeason(season.name));
            }
            if seasons[..index].iter().any(|prior| prior.name == season.name) {
                return Err(ConfigError::DuplicateSeason(season.name));
            }
        }

        let tolerance = self.crop.tolerance;
        if !tolerance.is_finite() || tolerance <= 0.0 {
            return Err(ConfigError::InvalidTolerance(tolerance));
        }
        for (field, value) in [
            ("crop.min_growth", self.crop.min_growth),
            ("crop.max_growth", self.crop.max_growth),
            ("population.base_birth_rate", self.population.base_birth_rate),
            ("population.base_death_rate", self.population.base_death_rate),
            ("population.food_per_capita", self.population.food_per_capita),
            ("starting_food_stock", self.starting_food_stock),
            ("farmland.step_gain", self.farmland.step_gain),
            ("farmland.max_factor", self.farmland.max_factor),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::NegativeOrNonFinite { field, value });
            }
        }
        if !self.crop.optimal_temp.is_finite() {
            return Err(ConfigError::NegativeOrNonFinite {
                field: "crop.optimal_temp",
                value: self.crop.optimal_temp,
            });
        }
        if self.farmland.step_population == 0 {
            return Err(ConfigError::ZeroFarmlandStep);
        }

        let mut warnings = Vec::new();
        let total_days = self.season_table.total_length();
        if total_days != DAYS_PER_YEAR {
            warnings.push(ValidationWarning::SeasonLengthDrift { total_days });
        }
        if !seasons.iter().any(|season| season.name == self.starting_season) {
            warnings.push(ValidationWarning::StartingSeasonMissing {
                season: self.starting_season,
            });
        }
        Ok(warnings)
    }
}
