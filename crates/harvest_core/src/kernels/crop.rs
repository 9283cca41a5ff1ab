//! Temperature-driven crop growth.

use crate::config::{CropParameters, FarmlandScaling};

/// Gaussian response of the crop to temperature, peaking at 1.0 on the optimum.
pub fn bell_curve(temperature: f64, crop: &CropParameters) -> f64 {
    let deviation = temperature - crop.optimal_temp;
    if crop.tolerance <= 0.0 {
        return if deviation == 0.0 { 1.0 } else { 0.0 };
    }
    let response = (-(deviation * deviation) / (2.0 * crop.tolerance * crop.tolerance)).exp();
    if response.is_finite() {
        response
    } else {
        0.0
    }
}

/// Farmland expansion multiplier for a population.
///
/// Populations under the threshold farm at a factor of 1; above it the factor grows by
/// `step_gain` for every `step_population` people, capped at `max_factor` and never below 1.
pub fn population_factor(population: u64, farmland: &FarmlandScaling) -> f64 {
    if population < farmland.threshold {
        return 1.0;
    }
    let steps = population / farmland.step_population.max(1);
    (steps as f64 * farmland.step_gain)
        .min(farmland.max_factor)
        .max(1.0)
}

/// Daily food production for the given temperature and population. Never below `min_growth`.
pub fn growth(
    temperature: f64,
    crop: &CropParameters,
    population: u64,
    farmland: &FarmlandScaling,
) -> f64 {
    scaled_growth(
        temperature,
        crop,
        population_factor(population, farmland),
    )
}

/// Production with a farmland factor of 1; used to chart the raw temperature response.
pub fn basic_growth(temperature: f64, crop: &CropParameters) -> f64 {
    scaled_growth(temperature, crop, 1.0)
}

fn scaled_growth(temperature: f64, crop: &CropParameters, factor: f64) -> f64 {
    let variable = crop.max_growth * factor * bell_curve(temperature, crop);
    if variable.is_finite() && variable > 0.0 {
        crop.min_growth + variable
    } else {
        crop.min_growth
    }
}
