use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two estimated contributors dominates a ward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DominantSource {
    Traffic,
    Industrial,
}

impl DominantSource {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Traffic => "Traffic",
            Self::Industrial => "Industrial",
        }
    }
}

impl fmt::Display for DominantSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strictly greater vehicular share means traffic; a tie goes to industrial.
pub fn dominant_source(vehicular_pct: f64, industrial_pct: f64) -> DominantSource {
    if vehicular_pct > industrial_pct {
        DominantSource::Traffic
    } else {
        DominantSource::Industrial
    }
}

/// Source categories the feed uses in ward risk rankings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceCategory {
    Traffic,
    Industrial,
    Construction,
    Mixed,
}

impl SourceCategory {
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Traffic" => Some(Self::Traffic),
            "Industrial" => Some(Self::Industrial),
            "Construction" => Some(Self::Construction),
            "Mixed" => Some(Self::Mixed),
            _ => None,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Traffic => "🚗",
            Self::Industrial => "🏭",
            Self::Construction => "🚧",
            Self::Mixed => "🔀",
        }
    }
}

impl From<DominantSource> for SourceCategory {
    fn from(source: DominantSource) -> Self {
        match source {
            DominantSource::Traffic => Self::Traffic,
            DominantSource::Industrial => Self::Industrial,
        }
    }
}

/// Glyph for a source label; unknown labels render as `Mixed`.
pub fn source_glyph(label: &str) -> &'static str {
    SourceCategory::from_label(label)
        .unwrap_or(SourceCategory::Mixed)
        .glyph()
}
