//! Replaying adapters that serve recorded interactions.

pub mod describer;

pub use describer::ReplayingDescriber;
