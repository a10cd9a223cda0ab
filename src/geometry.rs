//! Multi-geometry decomposition and geometry-type filtering.

use geojson::feature::Id;
use geojson::{Feature, Geometry, Value};

use crate::config::Environment;

/// The single-part geometry types an operator can allow through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GeometryKind {
    Point,
    LineString,
    Polygon,
}

impl GeometryKind {
    pub const ALL: [GeometryKind; 3] = [Self::Point, Self::LineString, Self::Polygon];

    /// Returns the kind of a single-part geometry, `None` for anything else.
    pub fn of(value: &Value) -> Option<Self> {
        match value {
            Value::Point(_) => Some(Self::Point),
            Value::LineString(_) => Some(Self::LineString),
            Value::Polygon(_) => Some(Self::Polygon),
            _ => None,
        }
    }
}

/// Breaks a Multi* value into its single-part values, in coordinate order.
/// Any other value is handed back untouched.
fn into_parts(value: Value) -> Result<Vec<Value>, Value> {
    match value {
        Value::MultiPoint(points) => Ok(points.into_iter().map(Value::Point).collect()),
        Value::MultiLineString(lines) => Ok(lines.into_iter().map(Value::LineString).collect()),
        Value::MultiPolygon(polygons) => Ok(polygons.into_iter().map(Value::Polygon).collect()),
        other => Err(other),
    }
}

fn part_id(id: &Id, index: usize) -> Id {
    match id {
        Id::String(s) => Id::String(format!("{s}-{index}")),
        Id::Number(n) => Id::String(format!("{n}-{index}")),
    }
}

/// Replaces every multi-part feature with one feature per part.
///
/// Each part is a copy of the parent (properties included) carrying the
/// singular geometry and the id `"<parent>-<index>"`. Single-part features
/// and features without geometry pass through unchanged. Output order follows
/// input order, with parts expanded in place.
pub fn split_multi(features: Vec<Feature>) -> Vec<Feature> {
    let mut out = Vec::with_capacity(features.len());
    for feature in features {
        split_feature(feature, &mut out);
    }
    out
}

fn split_feature(mut feature: Feature, out: &mut Vec<Feature>) {
    let Some(geometry) = feature.geometry.take() else {
        out.push(feature);
        return;
    };

    match into_parts(geometry.value) {
        Err(value) => {
            feature.geometry = Some(Geometry { value, ..geometry });
            out.push(feature);
        }
        Ok(parts) => {
            for (index, part) in parts.into_iter().enumerate() {
                let mut piece = feature.clone();
                piece.geometry = Some(Geometry::new(part));
                piece.id = feature.id.as_ref().map(|id| part_id(id, index));
                out.push(piece);
            }
        }
    }
}

/// Allow-set of geometry types that survive into the submitted collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeometryFilter {
    allowed: Vec<GeometryKind>,
}

impl GeometryFilter {
    pub fn new(allowed: impl IntoIterator<Item = GeometryKind>) -> Self {
        let mut allowed: Vec<_> = allowed.into_iter().collect();
        allowed.sort();
        allowed.dedup();
        Self { allowed }
    }

    /// Builds the allow-set from the operator toggles, using `default` for
    /// any toggle left unset.
    pub fn from_env(env: &Environment, default: bool) -> Self {
        Self::new(
            GeometryKind::ALL
                .into_iter()
                .filter(|kind| env.geometry_toggle(*kind).unwrap_or(default)),
        )
    }

    pub fn allowed(&self) -> &[GeometryKind] {
        &self.allowed
    }

    pub fn allows(&self, feature: &Feature) -> bool {
        feature
            .geometry
            .as_ref()
            .and_then(|g| GeometryKind::of(&g.value))
            .is_some_and(|kind| self.allowed.contains(&kind))
    }

    pub fn apply(&self, features: Vec<Feature>) -> Vec<Feature> {
        features.into_iter().filter(|f| self.allows(f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(id: &str, value: Value) -> Feature {
        let mut properties = geojson::JsonObject::new();
        properties.insert("remarks".to_string(), "lane closed".into());
        Feature {
            bbox: None,
            geometry: Some(Geometry::new(value)),
            id: Some(Id::String(id.to_string())),
            properties: Some(properties),
            foreign_members: None,
        }
    }

    fn id_of(feature: &Feature) -> String {
        match feature.id.as_ref().unwrap() {
            Id::String(s) => s.clone(),
            Id::Number(n) => n.to_string(),
        }
    }

    fn kind_name(feature: &Feature) -> &'static str {
        feature.geometry.as_ref().unwrap().value.type_name()
    }

    #[test]
    fn test_multipoint_splits_into_points() {
        let points = vec![vec![-105.0, 39.7], vec![-105.1, 39.8], vec![-105.2, 39.9]];
        let out = split_multi(vec![feature("A1", Value::MultiPoint(points.clone()))]);

        assert_eq!(out.len(), 3);
        for (i, f) in out.iter().enumerate() {
            assert_eq!(kind_name(f), "Point");
            assert_eq!(id_of(f), format!("A1-{i}"));
            assert_eq!(f.geometry.as_ref().unwrap().value, Value::Point(points[i].clone()));
            assert_eq!(f.property("remarks").unwrap(), "lane closed");
        }
    }

    #[test]
    fn test_multilinestring_and_multipolygon_split() {
        let lines = vec![
            vec![vec![0.0, 0.0], vec![1.0, 1.0]],
            vec![vec![2.0, 2.0], vec![3.0, 3.0]],
        ];
        let square = vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![1.0, 1.0],
            vec![0.0, 0.0],
        ]];
        let out = split_multi(vec![
            feature("L", Value::MultiLineString(lines)),
            feature("P", Value::MultiPolygon(vec![square])),
        ]);

        let summary: Vec<_> = out.iter().map(|f| (id_of(f), kind_name(f))).collect();
        assert_eq!(
            summary,
            vec![
                ("L-0".to_string(), "LineString"),
                ("L-1".to_string(), "LineString"),
                ("P-0".to_string(), "Polygon"),
            ]
        );
    }

    #[test]
    fn test_single_part_passes_through() {
        let polygon = Value::Polygon(vec![vec![
            vec![0.0, 0.0],
            vec![1.0, 0.0],
            vec![0.0, 1.0],
            vec![0.0, 0.0],
        ]]);
        let original = feature("Z9", polygon);
        let out = split_multi(vec![original.clone()]);

        assert_eq!(out, vec![original]);
    }

    #[test]
    fn test_empty_multi_yields_nothing_and_missing_geometry_passes() {
        let mut bare = feature("B", Value::Point(vec![0.0, 0.0]));
        bare.geometry = None;

        let out = split_multi(vec![feature("E", Value::MultiPoint(vec![])), bare.clone()]);
        assert_eq!(out, vec![bare]);
    }

    #[test]
    fn test_parts_of_feature_without_id_have_no_id() {
        let mut f = feature("X", Value::MultiPoint(vec![vec![0.0, 0.0], vec![1.0, 1.0]]));
        f.id = None;

        let out = split_multi(vec![f]);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|f| f.id.is_none()));
    }

    #[test]
    fn test_filter_keeps_only_allowed_types() {
        let features = vec![
            feature("p", Value::Point(vec![0.0, 0.0])),
            feature("l", Value::LineString(vec![vec![0.0, 0.0], vec![1.0, 1.0]])),
            feature(
                "g",
                Value::Polygon(vec![vec![
                    vec![0.0, 0.0],
                    vec![1.0, 0.0],
                    vec![0.0, 1.0],
                    vec![0.0, 0.0],
                ]]),
            ),
        ];

        let out = GeometryFilter::new([GeometryKind::Point]).apply(features);
        assert_eq!(out.len(), 1);
        assert_eq!(id_of(&out[0]), "p");
    }

    #[test]
    fn test_empty_allow_set_drops_everything() {
        let features = vec![feature("p", Value::Point(vec![0.0, 0.0]))];
        assert!(GeometryFilter::default().apply(features).is_empty());
    }

    #[test]
    fn test_filter_rejects_multi_and_collections() {
        let filter = GeometryFilter::new(GeometryKind::ALL);
        assert!(!filter.allows(&feature("m", Value::MultiPoint(vec![vec![0.0, 0.0]]))));
        assert!(!filter.allows(&feature("c", Value::GeometryCollection(vec![]))));
    }

    #[test]
    fn test_from_env_uses_default_for_unset_toggles() {
        let env = Environment {
            linestring_geometries: Some(false),
            ..Default::default()
        };

        assert_eq!(
            GeometryFilter::from_env(&env, true).allowed(),
            &[GeometryKind::Point, GeometryKind::Polygon]
        );
        assert!(GeometryFilter::from_env(&env, false).allowed().is_empty());
    }
}
