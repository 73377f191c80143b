//! Facility records and their identity, type and attribute types.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display};

use crate::geometry::Position;

/// Stable identifier of a facility record.
///
/// Ingestion assigns ids from whatever the source keys records by: OSM node
/// ids are numeric, other sources use strings. Ids order numerics first
/// (ascending), then text (lexicographic); this order breaks distance ties
/// in radius queries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacilityId {
    Numeric(i64),
    Text(String),
}

impl Ord for FacilityId {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FacilityId::Numeric(a), FacilityId::Numeric(b)) => a.cmp(b),
            (FacilityId::Text(a), FacilityId::Text(b)) => a.cmp(b),
            (FacilityId::Numeric(_), FacilityId::Text(_)) => Ordering::Less,
            (FacilityId::Text(_), FacilityId::Numeric(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for FacilityId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Display for FacilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FacilityId::Numeric(id) => write!(f, "{}", id),
            FacilityId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for FacilityId {
    fn from(value: i64) -> Self {
        FacilityId::Numeric(value)
    }
}

impl From<i32> for FacilityId {
    fn from(value: i32) -> Self {
        FacilityId::Numeric(value as i64)
    }
}

impl From<&str> for FacilityId {
    fn from(value: &str) -> Self {
        FacilityId::Text(value.to_string())
    }
}

impl From<String> for FacilityId {
    fn from(value: String) -> Self {
        FacilityId::Text(value)
    }
}

/// Display grouping for a facility type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacilityCategory {
    Hospital,
    Clinic,
    Pharmacy,
    Doctor,
    Dentist,
    Laboratory,
    Other,
}

impl Display for FacilityCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FacilityCategory::Hospital => "hospital",
            FacilityCategory::Clinic => "clinic",
            FacilityCategory::Pharmacy => "pharmacy",
            FacilityCategory::Doctor => "doctor",
            FacilityCategory::Dentist => "dentist",
            FacilityCategory::Laboratory => "laboratory",
            FacilityCategory::Other => "other",
        };
        f.write_str(name)
    }
}

/// The facility's type tag as supplied by ingestion (an OSM `amenity`
/// value such as `hospital` or `doctors`).
///
/// The index treats the tag as an opaque key: type filters compare it
/// verbatim. [`FacilityType::category`] is for presentation only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FacilityType(String);

impl FacilityType {
    pub fn new(tag: impl Into<String>) -> Self {
        FacilityType(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether the tag is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Maps the tag onto a display category; unknown tags become
    /// [`FacilityCategory::Other`].
    pub fn category(&self) -> FacilityCategory {
        match self.0.trim().to_ascii_lowercase().as_str() {
            "hospital" => FacilityCategory::Hospital,
            "clinic" => FacilityCategory::Clinic,
            "pharmacy" => FacilityCategory::Pharmacy,
            "doctor" | "doctors" => FacilityCategory::Doctor,
            "dentist" => FacilityCategory::Dentist,
            "laboratory" => FacilityCategory::Laboratory,
            _ => FacilityCategory::Other,
        }
    }
}

impl Display for FacilityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FacilityType {
    fn from(value: &str) -> Self {
        FacilityType::new(value)
    }
}

impl From<String> for FacilityType {
    fn from(value: String) -> Self {
        FacilityType(value)
    }
}

impl From<FacilityCategory> for FacilityType {
    fn from(value: FacilityCategory) -> Self {
        FacilityType(value.to_string())
    }
}

/// Descriptive fields carried with a record. The index stores and returns
/// them untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FacilityAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    /// Number of beds or places
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u32>,
    /// Whether the facility runs an emergency department
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Data provenance, e.g. `OSM`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

/// A point-located facility.
///
/// # Examples
///
/// ```rust
/// use facility_index::{FacilityRecord, Position};
///
/// let record = FacilityRecord::new(1, Position::new(48.221, 16.345), "hospital")
///     .with_name("AKH Wien")
///     .with_emergency(true);
/// assert_eq!(record.attributes.name.as_deref(), Some("AKH Wien"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub id: FacilityId,
    pub position: Position,
    pub facility_type: FacilityType,
    #[serde(flatten)]
    pub attributes: FacilityAttributes,
}

impl FacilityRecord {
    /// Creates a record with empty attributes.
    pub fn new(
        id: impl Into<FacilityId>,
        position: Position,
        facility_type: impl Into<FacilityType>,
    ) -> Self {
        FacilityRecord {
            id: id.into(),
            position,
            facility_type: facility_type.into(),
            attributes: FacilityAttributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: FacilityAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.attributes.name = Some(name.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.attributes.address = Some(address.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.attributes.city = Some(city.into());
        self
    }

    pub fn with_capacity(mut self, capacity: u32) -> Self {
        self.attributes.capacity = Some(capacity);
        self
    }

    pub fn with_emergency(mut self, emergency: bool) -> Self {
        self.attributes.emergency = Some(emergency);
        self
    }

    /// Display category of this record's type.
    pub fn category(&self) -> FacilityCategory {
        self.facility_type.category()
    }
}
