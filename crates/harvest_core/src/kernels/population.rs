//! Food-driven births and deaths.

use serde::Serialize;

use crate::config::PopulationParameters;

/// Birth rate kept at total food exhaustion, as a share of the base rate.
pub const STARVATION_BIRTH_FLOOR: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PopulationStep {
    pub births: u64,
    pub deaths: u64,
    pub new_population: u64,
    pub food_ratio: f64,
}

/// Share of the required food that is available, saturating at 1.
///
/// A population that needs nothing is fully fed.
pub fn food_ratio(food_stock: f64, food_needed: f64) -> f64 {
    if food_needed.is_nan() || food_needed <= 0.0 {
        return 1.0;
    }
    let ratio = food_stock / food_needed;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    }
}

/// Advance the population one day given the food on hand.
pub fn step(
    population: u64,
    food_stock: f64,
    food_needed: f64,
    params: &PopulationParameters,
) -> PopulationStep {
    let ratio = food_ratio(food_stock, food_needed);
    let birth_rate = (params.base_birth_rate * ratio)
        .max(params.base_birth_rate * STARVATION_BIRTH_FLOOR);
    let death_rate = params.base_death_rate * (2.0 - ratio);

    let current = population as f64;
    // Float to int casts saturate, and map NaN to 0.
    let births = (current * birth_rate).floor() as u64;
    let deaths = (current * death_rate).floor() as u64;
    let new_population = population.saturating_add(births).saturating_sub(deaths);

    PopulationStep {
        births,
        deaths,
        new_population,
        food_ratio: ratio,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn params(birth: f64, death: f64) -> PopulationParameters {
        PopulationParameters {
            base_birth_rate: birth,
            base_death_rate: death,
            food_per_capita: 1.0,
        }
    }

    #[test]
    fn half_fed_population_shrinks() {
        let outcome = step(1_000, 500.0, 1_000.0, &params(0.01, 0.008));
        assert_eq!(outcome.food_ratio, 0.5);
        assert_eq!(outcome.births, 5);
        assert_eq!(outcome.deaths, 12);
        assert_eq!(outcome.new_population, 993);
    }

    #[test]
    fn surplus_does_not_boost_rates() {
        let fed = step(1_000, 1_000.0, 1_000.0, &params(0.01, 0.008));
        let feast = step(1_000, 50_000.0, 1_000.0, &params(0.01, 0.008));
        assert_eq!(fed, feast);
        assert_eq!(feast.births, 10);
        assert_eq!(feast.deaths, 8);
    }

    #[test]
    fn starvation_keeps_a_birth_floor_and_doubles_deaths() {
        let outcome = step(10_000, 0.0, 5_000.0, &params(0.01, 0.008));
        assert_eq!(outcome.food_ratio, 0.0);
        assert_eq!(outcome.births, 10);
        assert_eq!(outcome.deaths, 160);
    }

    #[test]
    fn nothing_needed_means_fully_fed() {
        assert_eq!(food_ratio(0.0, 0.0), 1.0);
        assert_eq!(food_ratio(-3.0, 10.0), 0.0);
    }

    #[test]
    fn deaths_cannot_push_population_negative() {
        let outcome = step(3, 0.0, 3.0, &params(0.0, 0.9));
        assert_eq!(outcome.deaths, 5);
        assert_eq!(outcome.new_population, 0);
    }

    proptest! {
        #[test]
        fn empty_population_stays_empty(
            stock in 0.0f64..1.0e6,
            needed in 0.0f64..1.0e6,
            birth in 0.0f64..1.0,
            death in 0.0f64..1.0,
        ) {
            let outcome = step(0, stock, needed, &params(birth, death));
            prop_assert_eq!(outcome.births, 0);
            prop_assert_eq!(outcome.new_population, 0);
        }

        #[test]
        fn ratio_stays_in_unit_interval(stock in -1.0e6f64..1.0e6, needed in -10.0f64..1.0e6) {
            let ratio = food_ratio(stock, needed);
            prop_assert!((0.0..=1.0).contains(&ratio));
        }
    }
}
