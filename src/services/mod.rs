//! Service layer for Fiscally
//!
//! Services pull snapshots from the storage seams, hand them to the
//! analytics engine and return fresh view-models. Collaborator failures on
//! the read path are logged and replaced by empty snapshots.

pub mod dashboard;
pub mod goals;
pub mod refresh;

pub use dashboard::{Dashboard, DashboardService};
pub use goals::{GoalPlan, GoalService};
pub use refresh::{RecomputeTrigger, RefreshTopic};
