//! Statistics over simulated terminal prices.

pub mod terminal;

pub use terminal::{LogReturnMoments, TerminalDistributionSummary, percentile, summarize};
