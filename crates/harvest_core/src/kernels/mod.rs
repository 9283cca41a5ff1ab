pub mod crop;
pub mod population;
pub mod temperature;
