//! HTTP object-store transport.
//!
//! Talks to any bucket-style store that accepts `PUT`, `GET`, `HEAD` and
//! `DELETE` on `{endpoint}/{key}` (S3-compatible gateways with pre-authorised
//! paths, WebDAV shares, internal blob services).

use crate::{Transport, join_url};
use atelier_core::BlobKey;
use atelier_error::{AtelierResult, TransportError, TransportErrorKind};
use futures_util::StreamExt;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Object store reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    endpoint: String,
    public_url: Option<String>,
    bearer_token: Option<String>,
}

impl HttpTransport {
    /// Create a transport for the store at `endpoint`.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Base URL blobs are written to and read from
    /// * `public_url` - Base URL handed out by `url()`; defaults to `endpoint`
    /// * `bearer_token` - Sent as `Authorization: Bearer ...` when set
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the endpoint is not an http(s) URL or the
    /// client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        public_url: Option<String>,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> AtelierResult<Self> {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&endpoint).map_err(|e| {
            TransportError::new(TransportErrorKind::InvalidConfig(format!(
                "endpoint {}: {}",
                endpoint, e
            )))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TransportError::new(TransportErrorKind::InvalidConfig(format!(
                "endpoint {} must be http or https",
                endpoint
            )))
            .into());
        }

        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            TransportError::new(TransportErrorKind::InvalidConfig(format!(
                "http client: {}",
                e
            )))
        })?;

        tracing::info!(endpoint = %endpoint, "Created HTTP transport");
        Ok(Self {
            client,
            endpoint,
            public_url,
            bearer_token,
        })
    }

    fn object_url(&self, key: &BlobKey) -> String {
        join_url(&self.endpoint, key)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.bearer_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn send(&self, op: &str, key: &BlobKey, request: RequestBuilder) -> AtelierResult<Response> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| TransportError::failure(format!("{} {}: {}", op, key, e)))?;

        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(TransportError::not_found(key.as_str()).into()),
            status => Err(TransportError::failure(format!(
                "{} {} returned {}",
                op, key, status
            ))
            .into()),
        }
    }
}

#[async_trait::async_trait]
impl Transport for HttpTransport {
    fn backend(&self) -> &'static str {
        "http"
    }

    #[tracing::instrument(skip(self, key, local), fields(key = %key, local = %local.display()))]
    async fn push(&self, key: &BlobKey, local: &Path) -> AtelierResult<()> {
        let body = tokio::fs::read(local).await.map_err(|e| {
            TransportError::failure(format!("read {}: {}", local.display(), e))
        })?;
        let size = body.len();

        let request = self.client.put(self.object_url(key)).body(body);
        self.send("PUT", key, request).await?;

        tracing::info!(key = %key, size, "Pushed blob");
        Ok(())
    }

    #[tracing::instrument(skip(self, key, dest), fields(key = %key, dest = %dest.display()))]
    async fn pull(&self, key: &BlobKey, dest: &Path) -> AtelierResult<()> {
        let response = self.send("GET", key, self.client.get(self.object_url(key))).await?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                TransportError::failure(format!("create {}: {}", parent.display(), e))
            })?;
        }

        let write_err =
            |e: std::io::Error| TransportError::failure(format!("write {}: {}", dest.display(), e));
        let mut file = tokio::fs::File::create(dest).await.map_err(write_err)?;
        let mut stream = response.bytes_stream();
        let mut size = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    drop(file);
                    let _ = tokio::fs::remove_file(dest).await;
                    return Err(TransportError::failure(format!("GET {}: {}", key, e)).into());
                }
            };
            size += chunk.len();
            file.write_all(&chunk).await.map_err(write_err)?;
        }
        file.flush().await.map_err(write_err)?;

        tracing::debug!(key = %key, size, "Pulled blob");
        Ok(())
    }

    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn remove(&self, key: &BlobKey) -> AtelierResult<()> {
        self.send("DELETE", key, self.client.delete(self.object_url(key)))
            .await?;
        tracing::info!(key = %key, "Removed blob");
        Ok(())
    }

    async fn url(&self, key: &BlobKey) -> AtelierResult<String> {
        let base = self.public_url.as_deref().unwrap_or(&self.endpoint);
        Ok(join_url(base, key))
    }

    async fn exists(&self, key: &BlobKey) -> AtelierResult<bool> {
        match self.send("HEAD", key, self.client.head(self.object_url(key))).await {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }
}
