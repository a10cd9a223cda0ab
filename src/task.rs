//! One scheduled run: fetch, normalize, split, filter, submit.

use std::sync::Arc;

use anyhow::Result;
use geojson::{FeatureCollection, JsonValue};
use reqwest::Url;
use serde::Deserialize;
use tracing::info;

use crate::config::Environment;
use crate::fetch::HttpClient;
use crate::fetch::auth::UrlParam;
use crate::geometry::{GeometryFilter, split_multi};
use crate::normalize::Normalizer;
use crate::paginate::fetch_all;
use crate::schema::SchemaType;
use crate::sink::Sink;
use crate::source::Source;
use crate::types::RawRecord;

/// Runs the record-to-collection stages over already fetched records.
///
/// Pure: identical input yields an identical collection.
pub fn transform(
    records: Vec<RawRecord>,
    normalizer: Normalizer,
    filter: &GeometryFilter,
) -> FeatureCollection {
    let features = normalizer.normalize_all(records);
    let features = filter.apply(split_multi(features));

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

pub struct Task<C, S> {
    pub source: Source,
    pub env: Environment,
    pub api: Url,
    client: Arc<C>,
    sink: S,
}

impl<C: HttpClient, S: Sink> Task<C, S> {
    pub fn new(source: Source, env: Environment, api: Url, client: C, sink: S) -> Self {
        Self {
            source,
            env,
            api,
            client: Arc::new(client),
            sink,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Executes the run and hands the filtered collection to the sink.
    ///
    /// Fails before any request if no token is configured. Any fetch error
    /// aborts the run without calling the sink.
    #[tracing::instrument(skip(self), fields(source = self.source.label()))]
    pub async fn control(&self) -> Result<()> {
        let token = self.env.token()?.to_string();
        let client = UrlParam::api_key(Arc::clone(&self.client), token);

        let records = fetch_all(&client, &self.api, self.source.path()).await?;
        info!(count = records.len(), "Fetched {}", self.source.label());

        let filter = self.source.geometry_filter(&self.env);
        let collection = transform(records, self.source.normalizer(&self.env), &filter);
        info!(
            features = collection.features.len(),
            allowed = ?filter.allowed(),
            "Features ready for submission"
        );

        if self.env.debug {
            for feature in &collection.features {
                info!("{}", serde_json::to_string(feature)?);
            }
        }

        self.sink.submit(&collection).await
    }
}

/// Invocation event from the host, e.g. `{"type": "schema:input"}`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    #[serde(rename = "schema:input")]
    SchemaInput,
    #[serde(rename = "schema:output")]
    SchemaOutput,
    #[default]
    #[serde(other)]
    Run,
}

impl Event {
    /// Schema descriptor requested by this event, `None` for a run.
    pub fn schema_type(&self) -> Option<SchemaType> {
        match self {
            Self::SchemaInput => Some(SchemaType::Input),
            Self::SchemaOutput => Some(SchemaType::Output),
            Self::Run => None,
        }
    }

    /// Parses a raw event; an empty object or unknown type means a run.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(raw)?;
        if value.get("type").is_none() {
            return Ok(Self::Run);
        }
        Ok(serde_json::from_value(value)?)
    }
}
