//! Notes API client.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use schoolbook_core::attachment::{CredentialProvider, TelemetryError, TelemetrySink};
use schoolbook_core::notes::Note;
use schoolbook_shared::config::ApiConfig;
use schoolbook_shared::types::{ClassId, NoteId};
use schoolbook_shared::{AppError, AppResult};
use serde::Deserialize;
use tracing::debug;

/// Which dashboard's listing to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoteRole {
    /// `GET /teacher/notes`.
    #[default]
    Teacher,
    /// `GET /student/notes`.
    Student,
}

impl NoteRole {
    fn route(self) -> &'static str {
        match self {
            Self::Teacher => "teacher/notes",
            Self::Student => "student/notes",
        }
    }
}

impl fmt::Display for NoteRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Teacher => write!(f, "teacher"),
            Self::Student => write!(f, "student"),
        }
    }
}

/// Response envelope used by every API endpoint.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

/// Client for the notes endpoints.
///
/// Requests carry the session token when one is available.
#[derive(Clone)]
pub struct NotesApi {
    http: reqwest::Client,
    base_url: String,
    telemetry_route: String,
    credentials: Arc<dyn CredentialProvider>,
}

impl NotesApi {
    /// Create a client from the API configuration.
    #[must_use]
    pub fn new(
        http: reqwest::Client,
        config: &ApiConfig,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            telemetry_route: config.notes_route.trim_matches('/').to_string(),
            credentials,
        }
    }

    /// List the notes of a class, optionally restricted to one subject.
    pub async fn list_notes(
        &self,
        role: NoteRole,
        class_id: Option<&ClassId>,
        subject: Option<&str>,
    ) -> AppResult<Vec<Note>> {
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(class_id) = class_id {
            params.push(("classId", class_id.as_str()));
        }
        if let Some(subject) = subject {
            params.push(("subject", subject));
        }

        let url = format!("{}/{}", self.base_url, role.route());
        let request = self.authorized(self.http.get(&url).query(&params)).await;
        let response = send(request).await?;
        let envelope: Envelope<Vec<Note>> = response
            .json()
            .await
            .map_err(|e| AppError::ExternalService(format!("invalid notes response: {e}")))?;

        debug!(%role, count = envelope.data.len(), "Fetched notes");
        Ok(envelope.data)
    }

    /// Find a single note of a class by id.
    pub async fn find_note(
        &self,
        role: NoteRole,
        class_id: &ClassId,
        id: &NoteId,
    ) -> AppResult<Note> {
        self.list_notes(role, Some(class_id), None)
            .await?
            .into_iter()
            .find(|note| &note.id == id)
            .ok_or_else(|| AppError::NotFound(format!("note {id} in class {class_id}")))
    }

    async fn record(&self, id: &NoteId, event: &str) -> AppResult<()> {
        let url = format!(
            "{}/{}/{}/{event}",
            self.base_url, self.telemetry_route, id
        );
        let request = self.authorized(self.http.post(&url)).await;
        send(request).await.map(drop)
    }

    async fn authorized(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.credentials.auth_token().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl TelemetrySink for NotesApi {
    async fn record_view(&self, id: &NoteId) -> Result<(), TelemetryError> {
        self.record(id, "view")
            .await
            .map_err(|e| TelemetryError(e.to_string()))
    }

    async fn record_download(&self, id: &NoteId) -> Result<(), TelemetryError> {
        self.record(id, "download")
            .await
            .map_err(|e| TelemetryError(e.to_string()))
    }
}

async fn send(request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
    let response = request
        .send()
        .await
        .map_err(|e| AppError::ExternalService(e.to_string()))?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .ok()
        .filter(|body| !body.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
    Err(AppError::from_status(status.as_u16(), message))
}
