//! Reputation axes, household mood and ending selection

pub mod tracker;

pub use tracker::{
    civil_cooperation, ending_for, mood_for, Axis, FairnessCounters, ReputationChange,
    ReputationTracker,
};
