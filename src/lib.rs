//! Weekly life planner for the U-Engine ecosystem.
//!
//! Converts a weighted set of weekly life categories (school, sleep, work,
//! social, self-care, exercise, leisure, custom) into a concrete 7-day
//! schedule at 15-minute resolution.
//!
//! # Modules
//!
//! - **`models`**: Input types (`Category`, `ObligationChild`, `Meeting`),
//!   runtime types (`Task`, `Grid`, `FixedMask`) and the output `Schedule`
//! - **`scheduler`**: Pipeline stages (apportionment, seeding, greedy fill,
//!   scoring, post-processing) and plan KPIs
//! - **`anneal`**: Generic simulated annealing runner and configuration
//! - **`engine`**: `Engine`, `EngineConfig` and the `generate` entry point
//! - **`validation`**: Structural checks on category input
//!
//! # Example
//!
//! ```
//! use u_weekplan::generate;
//! use u_weekplan::models::{Category, ObligationChild, Weekday};
//!
//! let week = generate(&[Category::new("ex", "Exercise")
//!     .with_priority(0.04)
//!     .with_child(ObligationChild::new("gym", "Gym").with_relative_priority(1.0))]);
//! assert!(week.days().all(|(_, slots)| slots.len() == 96));
//! assert!(week.count_label("Gym") > 0);
//! assert_eq!(week.day(Weekday::Monday).len(), 96);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"

pub mod anneal;
pub mod engine;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

pub use engine::{generate, Engine, EngineConfig, EngineResult, TaskDeficit};
pub use error::ConfigError;
pub use models::{Category, Schedule};
