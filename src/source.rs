//! The two COtrip listings this connector can pull from.

use clap::ValueEnum;

use crate::config::Environment;
use crate::geometry::GeometryFilter;
use crate::normalize::Normalizer;

pub const DEFAULT_API: &str = "https://data.cotrip.org/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Source {
    Incidents,
    Signs,
}

impl Source {
    pub fn path(self) -> &'static str {
        match self {
            Self::Incidents => "/api/v1/incidents",
            Self::Signs => "/api/v1/signs",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Incidents => "incidents",
            Self::Signs => "signs",
        }
    }

    /// Value used for any geometry toggle the operator left unset.
    pub fn geometry_default(self) -> bool {
        matches!(self, Self::Signs)
    }

    pub fn normalizer(self, env: &Environment) -> Normalizer {
        match self {
            Self::Incidents => Normalizer::Incident,
            Self::Signs => Normalizer::Sign {
                keep_declared: env.sign_properties,
            },
        }
    }

    pub fn geometry_filter(self, env: &Environment) -> GeometryFilter {
        GeometryFilter::from_env(env, self.geometry_default())
    }
}
