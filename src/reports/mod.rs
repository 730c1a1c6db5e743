//! Reports module for Fiscally
//!
//! Plain-text and CSV renderings of the spending dashboard and the goal
//! allocation matrix.

pub mod allocation;
pub mod spending;

pub use allocation::{AllocationReport, BudgetAnalysisReport};
pub use spending::{SpendingByCategory, SpendingReport};
