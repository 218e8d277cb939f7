//! lifetrack library
//!
//! Core of the personal life tracker: item collections, daily
//! habit/prayer/Ramadan checklists, weight and note logs, and the
//! reminder scheduler, persisted as one local snapshot. A UI layer is
//! expected to drive the services; none is included here.

pub mod app;
pub mod config;
pub mod error;
pub mod services;
pub mod storage;
pub mod store;
