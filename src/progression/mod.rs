//! Day and phase progression

pub mod controller;

pub use controller::{CumulativeStats, DayStats, Phase, PhaseTransition, ProgressionController};
