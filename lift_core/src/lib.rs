#![forbid(unsafe_code)]

//! Core domain model and business logic for the Lift workout tracker.
//!
//! This crate provides:
//! - Domain types (exercises, workouts, sets, templates)
//! - Bodyweight-aware weight resolution and input parsing
//! - Exercise catalog
//! - Workout lifecycle use cases
//! - Persistence (repository contract, SQLite store, settings)
//! - History analytics and CSV export

pub mod types;
pub mod error;
pub mod weight;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod repository;
pub mod store;
pub mod usecases;
pub mod settings;
pub mod context;
pub mod analytics;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::default_exercises;
pub use config::Config;
pub use repository::{MemoryRepository, WorkoutRepository};
pub use store::SqliteRepository;
pub use settings::AppSettings;
pub use context::AppContext;
pub use usecases::{CustomExerciseDraft, SetUpdate};
pub use weight::{display_weight, effective_weight, format_weight, parse_weight_input, WeightDisplay};
