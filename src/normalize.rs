//! Maps raw API records onto the Feature shape submitted downstream.
//!
//! Each record type has its own declared key table; the normalizer never
//! mutates fields outside that table.

use geojson::feature::Id;
use geojson::{Feature, Geometry, JsonObject, JsonValue};
use tracing::debug;

use crate::types::RawRecord;

/// Incident property remaps: source key, then every key that receives a copy
/// of its value. The source keys listed in [`INCIDENT_DROPPED`] are removed
/// afterwards.
pub const INCIDENT_RENAMES: &[(&str, &[&str])] = &[
    ("travelerInformationMessage", &["remarks"]),
    ("type", &["callsign", "incident_type"]),
];

pub const INCIDENT_DROPPED: &[&str] = &["type"];

/// Sign fields declared in the sign output schema, with their JSON types.
pub const SIGN_OUTPUT_FIELDS: &[(&str, &str)] = &[
    ("communicationStatus", "string"),
    ("marker", "number"),
    ("messageText", "string"),
    ("direction", "string"),
    ("lastUpdated", "string"),
    ("messagePreview", "string"),
    ("displayStatus", "string"),
    ("name", "string"),
    ("id", "string"),
    ("speed", "number"),
    ("routeName", "string"),
    ("messageMarkup", "string"),
    ("publicName", "string"),
    ("submittedBy", "string"),
    ("nativeId", "string"),
    ("activationTime", "string"),
];

/// Record-type specific normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalizer {
    Incident,
    /// `keep_declared` retains the [`SIGN_OUTPUT_FIELDS`] present on the
    /// record; otherwise the property bag is left empty.
    Sign { keep_declared: bool },
}

impl Normalizer {
    pub fn normalize(&self, record: RawRecord) -> Feature {
        match self {
            Self::Incident => incident(record),
            Self::Sign { keep_declared } => sign(record, *keep_declared),
        }
    }

    pub fn normalize_all(&self, records: Vec<RawRecord>) -> Vec<Feature> {
        records.into_iter().map(|r| self.normalize(r)).collect()
    }
}

/// Reads the feature id from `properties.id`. Numbers are rendered as
/// strings; anything else leaves the feature without an id.
fn feature_id(properties: &JsonObject) -> Option<Id> {
    match properties.get("id")? {
        JsonValue::String(s) => Some(Id::String(s.clone())),
        JsonValue::Number(n) => Some(Id::String(n.to_string())),
        _ => None,
    }
}

fn feature(id: Option<Id>, properties: JsonObject, geometry: Option<Geometry>) -> Feature {
    Feature {
        bbox: None,
        geometry,
        id,
        properties: Some(properties),
        foreign_members: None,
    }
}

fn incident(record: RawRecord) -> Feature {
    let RawRecord {
        mut properties,
        geometry,
    } = record;
    let id = feature_id(&properties);

    for (source, targets) in INCIDENT_RENAMES {
        let value = properties.get(*source).cloned();
        for target in *targets {
            match &value {
                Some(v) => properties.insert(target.to_string(), v.clone()),
                None => properties.remove(*target),
            };
        }
    }
    for key in INCIDENT_DROPPED {
        properties.remove(*key);
    }

    feature(id, properties, geometry)
}

/// Moves the [`SIGN_OUTPUT_FIELDS`] present in `properties` into a new bag.
/// Whatever stays behind in `properties` is undeclared.
fn take_declared(properties: &mut JsonObject) -> JsonObject {
    SIGN_OUTPUT_FIELDS
        .iter()
        .filter_map(|(name, _)| properties.remove(*name).map(|v| (name.to_string(), v)))
        .collect()
}

fn sign(record: RawRecord, keep_declared: bool) -> Feature {
    let RawRecord {
        mut properties,
        geometry,
    } = record;
    let id = feature_id(&properties);

    let kept = if keep_declared {
        take_declared(&mut properties)
    } else {
        JsonObject::new()
    };

    if !properties.is_empty() {
        debug!(
            id = ?id,
            dropped = ?properties.keys().collect::<Vec<_>>(),
            "Sign fields left out of the feature"
        );
    }

    feature(id, kept, geometry)
}
