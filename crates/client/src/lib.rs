//! Concrete capabilities for the Schoolbook attachment workflow.
//!
//! # Modules
//!
//! - `api` - Notes API client (listing, view/download telemetry)
//! - `transfer` - Authenticated streaming file transfer
//! - `session` - Session token store
//! - `platform` - Desktop directories, permission gate, intent dispatch

pub mod api;
mod http;
pub mod platform;
pub mod session;
pub mod transfer;

#[cfg(test)]
mod test_server;

pub use api::{NoteRole, NotesApi};
pub use http::{build_http_client, build_transfer_client};
pub use platform::{DesktopIntents, DesktopPaths, StoragePermissionGate};
pub use session::{Session, SessionError, SessionStore};
pub use transfer::HttpTransferClient;
