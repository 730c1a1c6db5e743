//! Fiscally - spending analytics and savings goal allocation
//!
//! This library turns a snapshot of transactions, savings goals and an
//! income/budget profile into a monthly spending dashboard and a goal
//! allocation plan. The analytics core is pure: it never touches storage and
//! never fails on well-formed snapshots.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `analytics`: Category taxonomy, aggregation, budget status, trends,
//!   insights and goal allocation
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (money, transactions, goals, profile)
//! - `storage`: Snapshot traits and the JSON file store
//! - `services`: Dashboard recompute and goal orchestration
//! - `reports`: Terminal and CSV renderings
//! - `export`: JSON and YAML analytics exports
//! - `cli`: Command handlers for the `fiscally` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use fiscally::analytics::GoalAllocationEngine;
//! use fiscally::models::Money;
//!
//! let engine = GoalAllocationEngine::default();
//! let matrix = engine.allocate(Money::from_major(80_000), Money::from_major(50_000), &goals, today);
//! ```

pub mod analytics;
pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;

pub use error::{FiscallyError, FiscallyResult};
