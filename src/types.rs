//! Core value types shared by providers and the aggregation session.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// A point on the globe in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&lat) {
            return Err(ValidationError::InvalidLatitude(lat));
        }
        if !lon.is_finite() || !(MIN_LON..=MAX_LON).contains(&lon) {
            return Err(ValidationError::InvalidLongitude(lon));
        }
        Ok(Self { lat, lon })
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.5},{:.5}", self.lat, self.lon)
    }
}

/// Immutable lookup request: a validated center and a search radius.
///
/// Fields are private so a `GeoQuery` can only exist in a valid state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoQuery {
    center: Coordinate,
    radius_km: f64,
}

impl GeoQuery {
    pub fn new(center: Coordinate, radius_km: f64) -> Result<Self, ValidationError> {
        // Re-check the center: Coordinate fields are public and may have been built directly.
        let center = Coordinate::new(center.lat, center.lon)?;
        if !radius_km.is_finite() || radius_km <= 0.0 {
            return Err(ValidationError::InvalidRadius(radius_km));
        }
        Ok(Self { center, radius_km })
    }

    pub fn from_degrees(lat: f64, lon: f64, radius_km: f64) -> Result<Self, ValidationError> {
        Self::new(Coordinate::new(lat, lon)?, radius_km)
    }

    pub fn center(&self) -> Coordinate {
        self.center
    }

    pub fn radius_km(&self) -> f64 {
        self.radius_km
    }
}

/// Well-known provider kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Infrastructure,
    AirspaceRestrictions,
    Urban,
    Environmental,
    Notams,
}

impl SourceKind {
    pub const ALL: [SourceKind; 5] = [
        SourceKind::Infrastructure,
        SourceKind::AirspaceRestrictions,
        SourceKind::Urban,
        SourceKind::Environmental,
        SourceKind::Notams,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Infrastructure => "infrastructure",
            SourceKind::AirspaceRestrictions => "airspace-restrictions",
            SourceKind::Urban => "urban",
            SourceKind::Environmental => "environmental",
            SourceKind::Notams => "notams",
        }
    }
}

/// Opaque key identifying one provider within a registry
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceName(String);

impl SourceName {
    pub fn new(name: impl Into<String>) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptySourceName);
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<SourceKind> for SourceName {
    fn from(kind: SourceKind) -> Self {
        Self(kind.as_str().to_string())
    }
}

impl fmt::Display for SourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One item returned by a provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextRecord {
    pub id: String,
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub attributes: Map<String, Value>,
}

impl ContextRecord {
    pub fn new(id: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind: kind.into(),
            name: None,
            location: None,
            distance_km: None,
            attributes: Map::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_location(mut self, location: Coordinate) -> Self {
        self.location = Some(location);
        self
    }
}
