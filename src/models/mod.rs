//! Stochastic price dynamics.

pub mod gbm;

pub use gbm::Gbm;
