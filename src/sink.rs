//! Destinations for the finished FeatureCollection.
//!
//! A run calls [`Sink::submit`] exactly once, after every pipeline stage has
//! succeeded.

use anyhow::{Context, Result};
use async_trait::async_trait;
use geojson::FeatureCollection;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Url};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::fetch::HttpClient;

#[async_trait]
pub trait Sink: Send + Sync {
    async fn submit(&self, collection: &FeatureCollection) -> Result<()>;
}

/// Logs the collection as a single JSON line.
pub struct LogSink;

#[async_trait]
impl Sink for LogSink {
    async fn submit(&self, collection: &FeatureCollection) -> Result<()> {
        info!(
            features = collection.features.len(),
            "{}",
            serde_json::to_string(collection)?
        );
        Ok(())
    }
}

/// Writes the collection as pretty-printed JSON to a file, or to stdout when
/// the path is `-`.
pub struct FileSink {
    pub path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Sink for FileSink {
    async fn submit(&self, collection: &FeatureCollection) -> Result<()> {
        let body = serde_json::to_string_pretty(collection)?;

        if self.path.as_os_str() == "-" {
            println!("{body}");
            return Ok(());
        }

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, body)
            .await
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            features = collection.features.len(),
            "FeatureCollection written"
        );
        Ok(())
    }
}

/// POSTs the collection as JSON to a submission endpoint.
///
/// Authentication is left to the client, typically an
/// [`ApiKey`](crate::fetch::auth::ApiKey) bearer wrapper.
pub struct HttpSink<C> {
    client: C,
    url: Url,
}

impl<C: HttpClient> HttpSink<C> {
    pub fn new(client: C, url: Url) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl<C: HttpClient> Sink for HttpSink<C> {
    async fn submit(&self, collection: &FeatureCollection) -> Result<()> {
        let body = serde_json::to_vec(collection)?;
        debug!(url = %self.url, bytes = body.len(), "Submitting FeatureCollection");

        let mut req = Request::new(Method::POST, self.url.clone());
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        *req.body_mut() = Some(body.into());

        let resp = self
            .client
            .execute(req)
            .await
            .with_context(|| format!("submission to {} failed", self.url))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("submission returned status {}: {}", status, body);
        }

        info!(features = collection.features.len(), "FeatureCollection submitted");
        Ok(())
    }
}
