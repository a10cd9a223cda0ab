//! Static JSON Schema descriptors the hosting framework reads to render and
//! validate a layer's settings and outputs.

use clap::ValueEnum;
use serde_json::{Map, Value, json};

use crate::normalize::SIGN_OUTPUT_FIELDS;
use crate::source::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaType {
    Input,
    Output,
}

pub fn schema(source: Source, kind: SchemaType) -> Value {
    match kind {
        SchemaType::Input => input_schema(source),
        SchemaType::Output => output_schema(source),
    }
}

fn toggle(description: &str, default: Option<bool>) -> Value {
    let mut prop = json!({"type": "boolean", "description": description});
    if let Some(default) = default {
        prop["default"] = json!(default);
    }
    prop
}

fn input_schema(source: Source) -> Value {
    let geometry_default = match source {
        Source::Signs => Some(true),
        Source::Incidents => None,
    };

    let mut properties = Map::new();
    properties.insert(
        "COTRIP_TOKEN".into(),
        json!({"type": "string", "description": "API Token for CoTrip"}),
    );
    properties.insert(
        "Point Geometries".into(),
        toggle("Allow point geometries", geometry_default),
    );
    properties.insert(
        "LineString Geometries".into(),
        toggle("Allow LineString geometries", geometry_default),
    );
    properties.insert(
        "Polygon Geometries".into(),
        toggle("Allow Polygon Geometries", geometry_default),
    );
    properties.insert(
        "DEBUG".into(),
        toggle("Print GeoJSON Features in logs", Some(false)),
    );
    if source == Source::Signs {
        properties.insert(
            "Sign Properties".into(),
            toggle("Include the declared sign fields in each feature", Some(false)),
        );
    }

    json!({
        "type": "object",
        "required": ["COTRIP_TOKEN"],
        "properties": properties,
    })
}

fn output_schema(source: Source) -> Value {
    let fields: &[(&str, &str)] = match source {
        Source::Incidents => &[
            ("incident_type", "string"),
            ("callsign", "string"),
            ("remarks", "string"),
            ("lastUpdated", "string"),
            ("travelerInformationMessage", "string"),
        ],
        Source::Signs => SIGN_OUTPUT_FIELDS,
    };

    let properties: Map<String, Value> = fields
        .iter()
        .map(|(name, ty)| (name.to_string(), json!({"type": ty})))
        .collect();

    json!({
        "type": "object",
        "required": [],
        "properties": properties,
    })
}
