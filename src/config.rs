//! Connector settings supplied by the host for a single run.
//!
//! The host hands over one settings object per invocation. It can come from a
//! JSON file whose keys match the input schema:
//! ```json
//! {
//!   "COTRIP_TOKEN": "...",
//!   "Point Geometries": true,
//!   "LineString Geometries": false,
//!   "Polygon Geometries": true,
//!   "DEBUG": false
//! }
//! ```
//! or from process environment variables via [`Environment::from_env`].

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::geometry::GeometryKind;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Environment {
    #[serde(rename = "COTRIP_TOKEN", alias = "API_TOKEN", default)]
    pub token: Option<String>,
    #[serde(rename = "Point Geometries", default)]
    pub point_geometries: Option<bool>,
    #[serde(rename = "LineString Geometries", default)]
    pub linestring_geometries: Option<bool>,
    #[serde(rename = "Polygon Geometries", default)]
    pub polygon_geometries: Option<bool>,
    #[serde(rename = "DEBUG", default)]
    pub debug: bool,
    /// Keep the declared sign fields instead of emitting an empty bag.
    #[serde(rename = "Sign Properties", default)]
    pub sign_properties: bool,
}

impl Environment {
    /// Loads the settings object from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings file '{path}'"))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse settings file '{path}'"))
    }

    /// Builds the settings object from process environment variables.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var("COTRIP_TOKEN")
            .or_else(|_| std::env::var("API_TOKEN"))
            .ok();

        Ok(Self {
            token,
            point_geometries: env_flag("POINT_GEOMETRIES")?,
            linestring_geometries: env_flag("LINESTRING_GEOMETRIES")?,
            polygon_geometries: env_flag("POLYGON_GEOMETRIES")?,
            debug: env_flag("DEBUG")?.unwrap_or(false),
            sign_properties: env_flag("SIGN_PROPERTIES")?.unwrap_or(false),
        })
    }

    /// Returns the API token, failing if it is missing or blank.
    pub fn token(&self) -> Result<&str> {
        match self.token.as_deref() {
            Some(token) if !token.trim().is_empty() => Ok(token),
            _ => bail!("No COTrip API Token Provided"),
        }
    }

    /// Returns the toggle for `kind`, if the operator set one.
    pub fn geometry_toggle(&self, kind: GeometryKind) -> Option<bool> {
        match kind {
            GeometryKind::Point => self.point_geometries,
            GeometryKind::LineString => self.linestring_geometries,
            GeometryKind::Polygon => self.polygon_geometries,
        }
    }
}

fn env_flag(name: &str) -> Result<Option<bool>> {
    match std::env::var(name) {
        Ok(value) => parse_flag(&value)
            .map(Some)
            .with_context(|| format!("{name} must be a boolean, got '{value}'")),
        Err(_) => Ok(None),
    }
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => bail!("not a boolean"),
    }
}
