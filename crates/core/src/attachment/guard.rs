//! Scoped guards around a retrieval.
//!
//! - [`InFlightRegistry`] admits one view or download per note at a time.
//! - [`PartialFile`] owns the `.part` file a transfer writes to and removes
//!   it on every exit path except a successful [`PartialFile::commit`].

use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use schoolbook_shared::types::NoteId;

use super::types::AccessPurpose;

/// Registry of notes with a retrieval in progress.
#[derive(Debug, Clone, Default)]
pub struct InFlightRegistry {
    active: Arc<DashMap<NoteId, AccessPurpose>>,
}

impl InFlightRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `id` for `purpose`.
    ///
    /// Returns `None` if a retrieval of the same note is already running.
    #[must_use]
    pub fn try_acquire(&self, id: &NoteId, purpose: AccessPurpose) -> Option<InFlightGuard> {
        match self.active.entry(id.clone()) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(purpose);
                Some(InFlightGuard {
                    active: Arc::clone(&self.active),
                    id: id.clone(),
                })
            }
        }
    }

    /// Purpose of the running retrieval for `id`, if any.
    #[must_use]
    pub fn active_purpose(&self, id: &NoteId) -> Option<AccessPurpose> {
        self.active.get(id).map(|entry| *entry.value())
    }
}

/// Releases the note when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    active: Arc<DashMap<NoteId, AccessPurpose>>,
    id: NoteId,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.active.remove(&self.id);
    }
}

/// A destination being written.
///
/// Bytes go to `<destination>.part`; the final name only appears once the
/// transfer is committed, so a failed download never clobbers an earlier
/// copy at the same path.
#[derive(Debug)]
pub struct PartialFile {
    partial: PathBuf,
    destination: PathBuf,
    committed: bool,
}

impl PartialFile {
    /// Allocate the partial path for `destination`.
    #[must_use]
    pub fn for_destination(destination: &Path) -> Self {
        let mut name = destination
            .file_name()
            .map_or_else(|| OsString::from("download"), |n| n.to_os_string());
        name.push(".part");
        Self {
            partial: destination.with_file_name(name),
            destination: destination.to_path_buf(),
            committed: false,
        }
    }

    /// Path the transfer should write to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.partial
    }

    /// Final path after commit.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Move the partial file to its final name, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns the rename error; the partial file is removed in that case.
    pub fn commit(mut self) -> std::io::Result<PathBuf> {
        std::fs::rename(&self.partial, &self.destination)?;
        self.committed = true;
        Ok(self.destination.clone())
    }
}

impl Drop for PartialFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        match std::fs::remove_file(&self.partial) {
            Ok(()) => tracing::debug!(path = %self.partial.display(), "Removed partial file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.partial.display(),
                error = %e,
                "Failed to remove partial file"
            ),
        }
    }
}
