//! # StudyBuddy Common Library
//!
//! Shared code for the StudyBuddy crates including:
//! - Error and result types
//! - Event types (StudyEvent enum) and the broadcast EventBus
//! - Notification value types
//! - Configuration loading and resolution

pub mod config;
pub mod error;
pub mod events;

pub use error::{Error, Result};
