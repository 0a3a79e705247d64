//! Keyword tagging and shared-tag propagation.

pub mod propagation;

pub use propagation::TagPropagator;
