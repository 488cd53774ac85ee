// src/config/mod.rs

//! Plan loading and validation for capflow.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a plan file from disk (`loader.rs`).
//! - Validate basic invariants and warn about unsatisfiable
//!   dependencies (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_and_validate, load_from_path};
pub use model::{PlanFile, SchedulerSection, TaskSection};
pub use validate::{capability_cycle, validate_plan};
