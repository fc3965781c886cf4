//! Authenticated streaming file transfer.

use async_trait::async_trait;
use schoolbook_core::attachment::{
    ProgressCallback, TransferClient, TransferFailure, TransferProgress, TransferReceipt,
    TransferRequest,
};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// [`TransferClient`] backed by `reqwest`.
///
/// The body is streamed chunk by chunk to the request destination; nothing
/// is buffered in memory beyond a single chunk.
#[derive(Debug, Clone)]
pub struct HttpTransferClient {
    http: reqwest::Client,
}

impl HttpTransferClient {
    /// Wrap a configured client (see [`crate::build_http_client`]).
    #[must_use]
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl TransferClient for HttpTransferClient {
    async fn fetch(
        &self,
        request: &TransferRequest,
        progress: ProgressCallback<'_>,
    ) -> Result<TransferReceipt, TransferFailure> {
        let mut response = self
            .http
            .get(&request.url)
            .bearer_auth(&request.bearer_token)
            .send()
            .await
            .map_err(|e| TransferFailure::request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferFailure::Status(status.as_u16()));
        }

        if let Some(notification) = &request.notification {
            info!(
                title = %notification.title,
                mime_type = %notification.mime_type,
                "{}",
                notification.description
            );
        }

        let total = response.content_length();
        let destination = &request.destination;
        let mut file = tokio::fs::File::create(destination)
            .await
            .map_err(|e| TransferFailure::write(destination, e))?;

        let mut received = 0u64;
        progress(TransferProgress { received, total });
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| TransferFailure::request(e.to_string()))?
        {
            file.write_all(&chunk)
                .await
                .map_err(|e| TransferFailure::write(destination, e))?;
            received += chunk.len() as u64;
            progress(TransferProgress { received, total });
        }
        file.flush()
            .await
            .map_err(|e| TransferFailure::write(destination, e))?;

        debug!(url = %request.url, bytes = received, "Body written");
        Ok(TransferReceipt {
            path: destination.clone(),
            bytes_written: received,
        })
    }
}
