//! Attachment retrieval workflow.
//!
//! This module provides the logic for getting a note's attached file onto
//! the device:
//! - Viewing through a transient cached copy and the native view intent
//! - Downloading a durable copy to the user's downloads location
//! - Local filename and extension derivation
//! - Capability traits for the platform and backend collaborators
//! - In-flight and partial-file guards
//! - User-facing notices for every outcome

mod capability;
mod error;
mod guard;
pub mod naming;
mod notice;
mod service;
mod types;

#[cfg(test)]
mod naming_props;

pub use capability::{
    Capabilities, CredentialProvider, IntentDispatcher, PathResolver, PermissionGate,
    Presenter, ProgressCallback, TelemetrySink, TransferClient,
};
pub use error::{OpenFailure, RetrievalError, TelemetryError, TransferFailure};
pub use guard::{InFlightGuard, InFlightRegistry, PartialFile};
pub use naming::{derive_extension, sanitize_title};
pub use notice::{Notice, NoticeAction};
pub use service::{AttachmentRetrieval, RetrievalSettings};
pub use types::{
    AccessPurpose, AttachmentRef, DeclaredType, DownloadNotification, DownloadOutcome,
    Retrieved, TransferProgress, TransferReceipt, TransferRequest, ViewOutcome,
};
