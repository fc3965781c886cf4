//! Shared types, errors, and configuration for Schoolbook.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for notes and classes
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, PermissionModel};
pub use error::{AppError, AppResult};
