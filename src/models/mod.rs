//! Core data models for Fiscally
//!
//! Snapshot records supplied by the external collaborator (transactions,
//! goals, profile) plus the value types the engine computes with.

pub mod category;
pub mod goal;
pub mod ids;
pub mod money;
pub mod period;
pub mod profile;
pub mod transaction;

pub use category::Category;
pub use goal::{Goal, DEFAULT_PRIORITY};
pub use ids::{CategoryId, GoalId, TransactionId};
pub use money::Money;
pub use period::{DateRange, Month};
pub use profile::{BudgetRange, Profile, SalaryRange};
pub use transaction::{CaptureChannel, Transaction};
