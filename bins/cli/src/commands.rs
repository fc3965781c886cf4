//! Command handlers.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use console::style;
use schoolbook_client::{
    DesktopIntents, DesktopPaths, HttpTransferClient, NoteRole, NotesApi, SessionStore,
    StoragePermissionGate, build_http_client, build_transfer_client,
};
use schoolbook_core::attachment::{
    AttachmentRef, AttachmentRetrieval, Capabilities, CredentialProvider, RetrievalSettings,
};
use schoolbook_core::notes::{self, ALL_SUBJECTS, Note};
use schoolbook_shared::AppConfig;
use schoolbook_shared::types::{ClassId, NoteId};
use tracing::info;

use crate::cli::{CacheCommand, Command, NotesCommand, SessionCommand, Target, TargetArgs};
use crate::presenter::TerminalPresenter;

/// Everything built from configuration.
pub struct App {
    config: AppConfig,
    session: Arc<SessionStore>,
    paths: Arc<DesktopPaths>,
    notes: NotesApi,
    transfer: HttpTransferClient,
}

impl App {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let http = build_http_client(&config.api)?;
        let session =
            Arc::new(SessionStore::from_config(&config).context("Failed to locate session file")?);
        let paths = Arc::new(DesktopPaths::from_config(&config.storage));
        let notes = NotesApi::new(http, &config.api, session.clone());

        Ok(Self {
            transfer: HttpTransferClient::new(build_transfer_client(&config.api)?),
            config,
            session,
            paths,
            notes,
        })
    }

    fn retrieval(&self) -> AttachmentRetrieval {
        let caps = Capabilities {
            permissions: Arc::new(StoragePermissionGate::new(
                self.config.platform.permission_model,
            )),
            paths: self.paths.clone(),
            transfer: Arc::new(self.transfer.clone()),
            intents: Arc::new(DesktopIntents),
            credentials: self.session.clone(),
            telemetry: Arc::new(self.notes.clone()),
            presenter: Arc::new(TerminalPresenter::new()),
        };
        let settings = RetrievalSettings {
            telemetry_timeout: self.config.telemetry_timeout(),
            notify_downloads: self.config.platform.notify_downloads,
        };
        AttachmentRetrieval::new(caps, settings)
    }

    pub async fn run(&self, command: Command) -> anyhow::Result<ExitCode> {
        match command {
            Command::Notes {
                command:
                    NotesCommand::List {
                        class_id,
                        subject,
                        role,
                    },
            } => {
                self.list_notes(role.into(), &ClassId::new(class_id), subject.as_deref())
                    .await
            }
            Command::Notes {
                command:
                    NotesCommand::Open {
                        note_id,
                        class_id,
                        role,
                    },
            } => {
                let note = self
                    .notes
                    .find_note(role.into(), &ClassId::new(class_id), &NoteId::new(note_id))
                    .await?;
                Ok(exit_code(self.retrieval().select_note(&note).await.transpose().is_ok()))
            }
            Command::View(target) => {
                let attachment = self.resolve(target).await?;
                Ok(exit_code(self.retrieval().view_file(&attachment).await.is_ok()))
            }
            Command::Download(target) => {
                let attachment = self.resolve(target).await?;
                let result = self.retrieval().download_file(&attachment).await;
                if let Ok(outcome) = &result {
                    println!("{}", outcome.path.display());
                }
                Ok(exit_code(result.is_ok()))
            }
            Command::Session { command } => self.session(command).await,
            Command::Cache {
                command: CacheCommand::Clear,
            } => {
                let removed = self
                    .paths
                    .clear_cache()
                    .context("Failed to clear attachment cache")?;
                println!("Removed {removed} cached file(s)");
                Ok(ExitCode::SUCCESS)
            }
        }
    }

    async fn resolve(&self, target: TargetArgs) -> anyhow::Result<AttachmentRef> {
        match target.into_target() {
            Target::Direct(attachment) => Ok(attachment),
            Target::Listed {
                role,
                class_id,
                note_id,
            } => {
                let note = self
                    .notes
                    .find_note(role, &class_id, &NoteId::new(note_id))
                    .await?;
                Ok(note.attachment())
            }
        }
    }

    async fn list_notes(
        &self,
        role: NoteRole,
        class_id: &ClassId,
        subject: Option<&str>,
    ) -> anyhow::Result<ExitCode> {
        let subject = subject.filter(|s| *s != ALL_SUBJECTS);
        let all = self.notes.list_notes(role, Some(class_id), subject).await?;
        let shown = notes::filter_by_subject(&all, subject.unwrap_or(ALL_SUBJECTS));

        if shown.is_empty() {
            println!("No notes found");
            return Ok(ExitCode::SUCCESS);
        }
        for note in &shown {
            println!("{}", format_note(note));
        }
        println!(
            "\n{} note(s) | subjects: {}",
            shown.len(),
            notes::distinct_subjects(&all).join(", ")
        );
        Ok(ExitCode::SUCCESS)
    }

    async fn session(&self, command: SessionCommand) -> anyhow::Result<ExitCode> {
        match command {
            SessionCommand::SetToken { token } => {
                if token.trim().is_empty() {
                    anyhow::bail!("Token must not be empty");
                }
                self.session.save_token(&token).await?;
                info!(path = %self.session.path().display(), "Session token stored");
                println!("Signed in");
            }
            SessionCommand::Clear => {
                self.session.clear().await?;
                println!("Signed out");
            }
            SessionCommand::Status => {
                let source = if self.session.is_overridden() {
                    "configuration".to_string()
                } else {
                    self.session.path().display().to_string()
                };
                if self.session.auth_token().await.is_some() {
                    println!("Signed in (token from {source})");
                } else {
                    println!("Not signed in");
                    return Ok(ExitCode::FAILURE);
                }
            }
        }
        Ok(ExitCode::SUCCESS)
    }
}

fn exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn format_note(note: &Note) -> String {
    let file = if note.has_file() {
        style(note.file_type.as_str()).cyan().to_string()
    } else {
        style("-").dim().to_string()
    };
    format!(
        "{:<12} {:<14} {:<6} {} {}  ({} views, {} downloads)",
        note.id.as_str(),
        note.subject,
        file,
        style(&note.title).bold(),
        note.file_size.as_deref().unwrap_or(""),
        note.views,
        note.downloads
    )
}
