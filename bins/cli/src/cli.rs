//! Command-line arguments.

use clap::{Args, Parser, Subcommand, ValueEnum};
use schoolbook_client::NoteRole;
use schoolbook_core::attachment::{AttachmentRef, DeclaredType};
use schoolbook_shared::types::ClassId;

#[derive(Debug, Parser)]
#[command(name = "schoolbook", version, about = "View and download Schoolbook note attachments")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Browse notes
    Notes {
        #[command(subcommand)]
        command: NotesCommand,
    },
    /// Open a note's attachment in the default application
    View(TargetArgs),
    /// Save a note's attachment to the downloads folder
    Download(TargetArgs),
    /// Manage the stored session token
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Manage cached view copies
    Cache {
        #[command(subcommand)]
        command: CacheCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum NotesCommand {
    /// List the notes of a class
    List {
        /// Class identifier
        #[arg(long = "class", value_name = "ID")]
        class_id: String,
        /// Only notes of this subject ("all" for every subject)
        #[arg(long)]
        subject: Option<String>,
        /// Which dashboard's listing to use
        #[arg(long, value_enum, default_value_t = RoleArg::Teacher)]
        role: RoleArg,
    },
    /// Pick an action for a note's attachment
    Open {
        /// Note identifier
        note_id: String,
        /// Class the note belongs to
        #[arg(long = "class", value_name = "ID")]
        class_id: String,
        /// Which dashboard's listing to use
        #[arg(long, value_enum, default_value_t = RoleArg::Teacher)]
        role: RoleArg,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Store a bearer token
    SetToken {
        /// Token issued by the API at sign-in
        token: String,
    },
    /// Sign out
    Clear,
    /// Show whether a token is available
    Status,
}

#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Remove every cached view copy
    Clear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RoleArg {
    Teacher,
    Student,
}

impl From<RoleArg> for NoteRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Teacher => Self::Teacher,
            RoleArg::Student => Self::Student,
        }
    }
}

/// Which attachment a view or download targets.
///
/// Either looked up through the notes listing of `--class`, or described
/// directly with `--url`, `--title` and `--type`.
#[derive(Debug, Args)]
pub struct TargetArgs {
    /// Note identifier
    pub note_id: String,

    /// Look the note up in this class
    #[arg(long = "class", value_name = "ID", conflicts_with = "url", required_unless_present = "url")]
    pub class_id: Option<String>,

    /// Which dashboard's listing to use with --class
    #[arg(long, value_enum, default_value_t = RoleArg::Teacher)]
    pub role: RoleArg,

    /// Remote location of the file
    #[arg(long, requires_all = ["title", "file_type"])]
    pub url: Option<String>,

    /// Note title, used for the local filename
    #[arg(long)]
    pub title: Option<String>,

    /// Declared type: pdf, doc, ppt, img or link
    #[arg(long = "type", value_name = "TYPE")]
    pub file_type: Option<String>,

    /// Original filename, used for the extension
    #[arg(long)]
    pub file_name: Option<String>,
}

/// A resolved [`TargetArgs`].
#[derive(Debug, PartialEq, Eq)]
pub enum Target {
    /// Look the note up in a class listing.
    Listed {
        role: NoteRole,
        class_id: ClassId,
        note_id: String,
    },
    /// Fully described on the command line.
    Direct(AttachmentRef),
}

impl TargetArgs {
    pub fn into_target(self) -> Target {
        if let (Some(url), Some(title), Some(file_type)) = (self.url, self.title, self.file_type) {
            let mut attachment = AttachmentRef::new(
                self.note_id,
                title,
                DeclaredType::parse(&file_type.to_ascii_lowercase()),
                url,
            );
            if let Some(file_name) = self.file_name {
                attachment = attachment.with_source_file_name(file_name);
            }
            return Target::Direct(attachment);
        }
        Target::Listed {
            role: self.role.into(),
            class_id: ClassId::new(self.class_id.unwrap_or_default()),
            note_id: self.note_id,
        }
    }
}
