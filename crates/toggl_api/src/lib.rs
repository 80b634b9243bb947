//! Typed Toggl Track client crate used to pull time entries.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::TogglClient;
pub use config::TogglConfig;
pub use error::{Result, TogglError};
pub use models::TimeEntry;
