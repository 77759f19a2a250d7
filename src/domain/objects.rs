//! Classified geometric objects
//!
//! Shapes drawn over imagery or blueprint pages, tagged with the site feature
//! they represent and the measurements the geometry service produced for them.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::trades::QuantitySource;

/// Site feature a shape has been classified as
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Pavement,
    Concrete,
    Sidewalk,
    Curb,
    Gutter,
    ParkingStall,
    AdaStall,
    StripingLine,
    Crosswalk,
    StopBar,
    Arrow,
    AdaSymbol,
    Island,
    Building,
    Crack,
    Drain,
    WheelStop,
    Sign,
}

/// Where a classification came from
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ObjectSource {
    #[default]
    Manual,
    AiSuggested,
    AiDetected,
    Imported,
}

/// Planar coordinate in feet, relative to the drawing origin
pub type Coordinate = [f64; 2];

/// Shape geometry as handed over by the drawing layer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geometry {
    Polygon {
        exterior: Vec<Coordinate>,
        #[serde(default)]
        holes: Vec<Vec<Coordinate>>,
    },
    LineString {
        points: Vec<Coordinate>,
    },
    Point {
        position: Coordinate,
    },
    MultiPoint {
        positions: Vec<Coordinate>,
    },
}

/// Which measurement fields a geometry can meaningfully produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeometryKind {
    Area,
    Linear,
    Count,
}

impl Geometry {
    pub fn kind(&self) -> GeometryKind {
        match self {
            Self::Polygon { .. } => GeometryKind::Area,
            Self::LineString { .. } => GeometryKind::Linear,
            Self::Point { .. } | Self::MultiPoint { .. } => GeometryKind::Count,
        }
    }
}

/// Measurements derived from an object's current geometry
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Measurements {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub perimeter: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<Decimal>,
}

impl Measurements {
    /// Read the field named by a consumption rule. Missing values read as zero.
    pub fn quantity(&self, source: QuantitySource) -> Decimal {
        let value = match source {
            QuantitySource::Area => self.area,
            QuantitySource::Perimeter => self.perimeter,
            QuantitySource::Length => self.length,
            QuantitySource::Count => self.count,
        };
        value.unwrap_or(Decimal::ZERO)
    }
}

/// Classified geometric object
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeometricObject {
    pub id: String,
    pub object_type: ObjectType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    pub geometry: Geometry,
    #[serde(default)]
    pub measurements: Measurements,
    #[serde(default)]
    pub source: ObjectSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}
