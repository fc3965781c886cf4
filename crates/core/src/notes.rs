//! Notes as returned by the school API.
//!
//! A note is the record an [`AttachmentRef`] is built from. Teacher and
//! student listings share this shape; student listings always send the file
//! fields, teacher listings may omit them.

use schoolbook_shared::types::NoteId;
use serde::{Deserialize, Serialize};

use crate::attachment::{AttachmentRef, DeclaredType};

/// Subject filter value meaning "every subject".
pub const ALL_SUBJECTS: &str = "all";

/// A note with an optional attached file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Note identifier.
    pub id: NoteId,
    /// Title, also used for the local filename.
    pub title: String,
    /// Subject the note belongs to.
    #[serde(default)]
    pub subject: String,
    /// Free-text description.
    #[serde(default)]
    pub description: String,
    /// Declared type of the attachment.
    #[serde(default)]
    pub file_type: DeclaredType,
    /// Original filename.
    #[serde(default)]
    pub file_name: Option<String>,
    /// Display size ("2.4 MB").
    #[serde(default)]
    pub file_size: Option<String>,
    /// Remote location of the file.
    #[serde(default)]
    pub file_url: Option<String>,
    /// Uploader display name.
    #[serde(default)]
    pub uploaded_by: String,
    /// Upload date as sent by the API.
    #[serde(default)]
    pub upload_date: String,
    /// Download counter.
    #[serde(default)]
    pub downloads: u64,
    /// View counter.
    #[serde(default)]
    pub views: u64,
    /// Class name (teacher listings only).
    #[serde(default)]
    pub class_name: Option<String>,
}

impl Note {
    /// Whether the note has a file to view or download.
    #[must_use]
    pub fn has_file(&self) -> bool {
        self.file_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }

    /// Build the retrieval reference. A missing URL becomes an empty one.
    #[must_use]
    pub fn attachment(&self) -> AttachmentRef {
        AttachmentRef {
            id: self.id.clone(),
            title: self.title.clone(),
            declared_type: self.file_type,
            source_file_name: self.file_name.clone(),
            remote_url: self.file_url.clone().unwrap_or_default(),
            size_hint: self.file_size.clone(),
        }
    }
}

/// Notes of `subject`, or all of them for [`ALL_SUBJECTS`].
#[must_use]
pub fn filter_by_subject<'a>(notes: &'a [Note], subject: &str) -> Vec<&'a Note> {
    notes
        .iter()
        .filter(|note| subject == ALL_SUBJECTS || note.subject == subject)
        .collect()
}

/// Distinct subjects in first-seen order.
#[must_use]
pub fn distinct_subjects(notes: &[Note]) -> Vec<&str> {
    let mut subjects: Vec<&str> = Vec::new();
    for note in notes {
        if !subjects.contains(&note.subject.as_str()) {
            subjects.push(&note.subject);
        }
    }
    subjects
}
