//! State module
//!
//! This module provides the tracked data model:
//! - Model definitions and request types
//! - The root state aggregate
//! - Repository layer for all mutations

pub mod models;
pub mod repository;
pub mod state;

pub use models::*;
pub use repository::Repository;
pub use state::{AppState, DailyChecklist};
