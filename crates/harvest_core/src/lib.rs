pub mod cause;
pub mod config;
pub mod driver;
pub mod fixed;
pub mod io;
pub mod kernels;
pub mod ledger;
pub mod presets;
pub mod reduce;
pub mod rng;
pub mod season;
#[cfg(any(test, feature = "proptest-support"))]
pub mod strategies;

use config::{ConfigError, SimulationConfig, ValidationWarning};
use driver::{Driver, Generation};

/// Run a complete deterministic generation pass.
///
/// The same configuration always produces identical ledgers. Malformed season tables are
/// tolerated; use [`generate_checked`] to surface validation findings first.
pub fn generate(config: &SimulationConfig) -> Generation {
    Driver::new(config.clone()).run()
}

/// Validate `config` at the caller boundary, then run it.
///
/// Structural faults are returned as [`ConfigError`]; non-fatal findings such as season
/// lengths that do not cover a full year accompany the generated ledgers.
pub fn generate_checked(
    config: &SimulationConfig,
) -> Result<(Generation, Vec<ValidationWarning>), ConfigError> {
    let warnings = config.validate()?;
    Ok((generate(config), warnings))
}
