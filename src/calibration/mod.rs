//! Model parameters estimated from historical prices.

pub mod historical;

pub use historical::{
    GbmEstimate, estimate_from_closes, estimate_from_closes_annualized, estimate_gbm_parameters,
    estimate_gbm_parameters_annualized,
};
