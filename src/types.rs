//! Wire types for the COtrip listing endpoints.

use geojson::{Geometry, JsonObject};
use serde::Deserialize;

/// One page of a listing response: a FeatureCollection-shaped document.
///
/// Only `features` is read; anything else on the envelope is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RawPage {
    #[serde(default)]
    pub features: Vec<RawRecord>,
}

/// A single incident or sign record as the API returns it.
///
/// Both members are lenient: a missing or `null` bag becomes empty and a
/// missing or `null` geometry becomes `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub properties: JsonObject,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<JsonObject, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<JsonObject>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_with_extra_envelope_members() {
        let page: RawPage = serde_json::from_str(
            r#"{
                "type": "FeatureCollection",
                "features": [
                    {
                        "type": "Feature",
                        "properties": {"id": "A1", "type": "closure"},
                        "geometry": {"type": "Point", "coordinates": [-105.0, 39.7]}
                    }
                ]
            }"#,
        )
        .unwrap();

        assert_eq!(page.features.len(), 1);
        assert_eq!(page.features[0].properties["id"], "A1");
        assert!(page.features[0].geometry.is_some());
    }

    #[test]
    fn test_null_members_degrade_to_empty() {
        let record: RawRecord =
            serde_json::from_str(r#"{"type": "Feature", "properties": null, "geometry": null}"#)
                .unwrap();
        assert!(record.properties.is_empty());
        assert!(record.geometry.is_none());

        let page: RawPage = serde_json::from_str("{}").unwrap();
        assert!(page.features.is_empty());
    }
}
