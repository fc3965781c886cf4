//! Core logic for Schoolbook.
//!
//! This crate contains the attachment retrieval workflow with ZERO HTTP or
//! platform dependencies. Every collaborator is reached through a capability
//! trait implemented by the `client` crate.
//!
//! # Modules
//!
//! - `attachment` - View/download workflow, naming rules, capabilities
//! - `notes` - Note records and subject filtering

pub mod attachment;
pub mod notes;
