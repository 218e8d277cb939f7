//! Storage module
//!
//! Snapshot persistence for the application state.

pub mod state_store;

pub use state_store::StateStore;
