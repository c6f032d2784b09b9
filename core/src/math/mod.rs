pub mod stats;

pub use stats::{SlidingEnergy, StatsHelper};
