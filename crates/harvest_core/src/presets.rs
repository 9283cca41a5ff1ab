//! Static preset catalogs for climates and crops.
//!
//! A preset only fills in configuration fields; it carries no behaviour of its own.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CropParameters;
use crate::season::{Season, SeasonDefinition, SeasonProfile, SeasonProfiles, SeasonTable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PresetError {
    #[error("unknown climate preset {0:?}")]
    UnknownClimate(String),
    #[error("unknown crop preset {0:?}")]
    UnknownCrop(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClimatePreset {
    Temperate,
    Desert,
    Tropical,
    Arctic,
    Mediterranean,
}

struct ClimateRow {
    /// Winter, Spring, Summer, Fall.
    lengths: [u32; 4],
    /// `(mean, amplitude)` in the same order.
    profiles: [(f64, f64); 4],
}

impl ClimatePreset {
    pub const ALL: [ClimatePreset; 5] = [
        ClimatePreset::Temperate,
        ClimatePreset::Desert,
        ClimatePreset::Tropical,
        ClimatePreset::Arctic,
        ClimatePreset::Mediterranean,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ClimatePreset::Temperate => "temperate",
            ClimatePreset::Desert => "desert",
            ClimatePreset::Tropical => "tropical",
            ClimatePreset::Arctic => "arctic",
            ClimatePreset::Mediterranean => "mediterranean",
        }
    }

    fn row(&self) -> ClimateRow {
        match self {
            ClimatePreset::Temperate => ClimateRow {
                lengths: [90, 92, 92, 91],
                profiles: [(30.0, 8.0), (55.0, 10.0), (78.0, 6.0), (55.0, 10.0)],
            },
            ClimatePreset::Desert => ClimateRow {
                lengths: [75, 80, 130, 80],
                profiles: [(55.0, 10.0), (80.0, 12.0), (105.0, 8.0), (82.0, 12.0)],
            },
            ClimatePreset::Tropical => ClimateRow {
                lengths: [80, 90, 105, 90],
                profiles: [(75.0, 3.0), (82.0, 4.0), (88.0, 4.0), (83.0, 4.0)],
            },
            ClimatePreset::Arctic => ClimateRow {
                lengths: [150, 60, 75, 80],
                profiles: [(-10.0, 12.0), (20.0, 10.0), (45.0, 8.0), (15.0, 10.0)],
            },
            ClimatePreset::Mediterranean => ClimateRow {
                lengths: [85, 95, 100, 85],
                profiles: [(50.0, 6.0), (63.0, 8.0), (82.0, 6.0), (66.0, 8.0)],
            },
        }
    }

    /// Season lengths and profiles in calendar order.
    pub fn season_table(&self) -> SeasonTable {
        let row = self.row();
        let seasons = Season::ALL
            .iter()
            .zip(row.lengths)
            .map(|(&name, length)| SeasonDefinition::new(name, length))
            .collect();
        let [winter, spring, summer, fall] = row
            .profiles
            .map(|(mean, amplitude)| SeasonProfile::new(mean, amplitude));
        SeasonTable {
            seasons,
            profiles: SeasonProfiles {
                winter,
                spring,
                summer,
                fall,
            },
        }
    }
}

impl fmt::Display for ClimatePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ClimatePreset {
    type Err = PresetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.key() == key)
            .ok_or_else(|| PresetError::UnknownClimate(value.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CropPreset {
    Wheat,
    Rice,
    Maize,
    Barley,
    Potato,
    Soybean,
    Sorghum,
    Millet,
    Cassava,
    Rye,
}

impl CropPreset {
    pub const ALL: [CropPreset; 10] = [
        CropPreset::Wheat,
        CropPreset::Rice,
        CropPreset::Maize,
        CropPreset::Barley,
        CropPreset::Potato,
        CropPreset::Soybean,
        CropPreset::Sorghum,
        CropPreset::Millet,
        CropPreset::Cassava,
        CropPreset::Rye,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CropPreset::Wheat => "wheat",
            CropPreset::Rice => "rice",
            CropPreset::Maize => "maize",
            CropPreset::Barley => "barley",
            CropPreset::Potato => "potato",
            CropPreset::Soybean => "soybean",
            CropPreset::Sorghum => "sorghum",
            CropPreset::Millet => "millet",
            CropPreset::Cassava => "cassava",
            CropPreset::Rye => "rye",
        }
    }

    pub fn parameters(&self) -> CropParameters {
        let (optimal_temp, tolerance, min_growth, max_growth) = match self {
            CropPreset::Wheat => (68.0, 12.0, 5.0, 300.0),
            CropPreset::Rice => (82.0, 8.0, 3.0, 380.0),
            CropPreset::Maize => (77.0, 10.0, 4.0, 360.0),
            CropPreset::Barley => (60.0, 14.0, 6.0, 260.0),
            CropPreset::Potato => (62.0, 9.0, 5.0, 320.0),
            CropPreset::Soybean => (78.0, 10.0, 4.0, 280.0),
            CropPreset::Sorghum => (88.0, 12.0, 5.0, 300.0),
            CropPreset::Millet => (86.0, 14.0, 6.0, 240.0),
            CropPreset::Cassava => (84.0, 11.0, 5.0, 340.0),
            CropPreset::Rye => (55.0, 15.0, 7.0, 220.0),
        };
        CropParameters {
            optimal_temp,
            tolerance,
            min_growth,
            max_growth,
        }
    }
}

impl fmt::Display for CropPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for CropPreset {
    type Err = PresetError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let key = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|preset| preset.key() == key)
            .ok_or_else(|| PresetError::UnknownCrop(value.to_string()))
    }
}

/// Serializable listing of every preset, for hosts that render preset pickers.
#[derive(Clone, Debug, Serialize)]
pub struct Catalog {
    pub climates: Vec<ClimateEntry>,
    pub crops: Vec<CropEntry>,
}

#[derive(Clone, Debug, Serialize)]
pub struct ClimateEntry {
    pub key: ClimatePreset,
    pub season_table: SeasonTable,
}

#[derive(Clone, Debug, Serialize)]
pub struct CropEntry {
    pub key: CropPreset,
    pub parameters: CropParameters,
}

pub fn catalog() -> Catalog {
    Catalog {
        climates: ClimatePreset::ALL
            .into_iter()
            .map(|key| ClimateEntry {
                key,
                season_table: key.season_table(),
            })
            .collect(),
        crops: CropPreset::ALL
            .into_iter()
            .map(|key| CropEntry {
                key,
                parameters: key.parameters(),
            })
            .collect(),
    }
}
