//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod category;
pub mod export;
pub mod goal;
pub mod report;

pub use category::handle_categories;
pub use export::{handle_export, ExportFormat};
pub use goal::{handle_goal_command, GoalCommands};
pub use report::{handle_insights, handle_spending_report};
