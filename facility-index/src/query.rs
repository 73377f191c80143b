//! Radius query parameters and results.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt::{self, Display};

use crate::errors::{IndexError, IndexResult};
use crate::geometry::Position;
use crate::record::{FacilityRecord, FacilityType};

/// A request for every facility within `radius_m` meters of `center`,
/// optionally restricted to some facility types and to the nearest `limit`
/// hits.
///
/// ## Example
///
/// ```rust
/// use facility_index::{Position, RadiusQuery};
///
/// let query = RadiusQuery::new(Position::new(48.215, 16.330), 2_000.0)
///     .with_types(["hospital", "clinic"])
///     .with_limit(10);
/// assert_eq!(query.limit(), Some(10));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RadiusQuery {
    center: Position,
    radius_m: f64,
    types: Option<BTreeSet<FacilityType>>,
    limit: Option<usize>,
}

impl RadiusQuery {
    pub fn new(center: Position, radius_m: f64) -> Self {
        RadiusQuery {
            center,
            radius_m,
            types: None,
            limit: None,
        }
    }

    /// Restricts results to the given facility types.
    pub fn with_types<I, T>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<FacilityType>,
    {
        self.types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    /// Sets or clears the type filter.
    pub fn with_type_filter(mut self, types: Option<BTreeSet<FacilityType>>) -> Self {
        self.types = types;
        self
    }

    /// Keeps only the `limit` nearest hits.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn center(&self) -> &Position {
        &self.center
    }

    pub fn radius_m(&self) -> f64 {
        self.radius_m
    }

    pub fn types(&self) -> Option<&BTreeSet<FacilityType>> {
        self.types.as_ref()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Checks the query arguments.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] if the radius is not a finite
    /// number above zero, the center is out of range, the type filter is
    /// empty or holds a blank type, or the limit is zero.
    pub fn validate(&self) -> IndexResult<()> {
        if !self.radius_m.is_finite() || self.radius_m <= 0.0 {
            return Err(IndexError::invalid_argument(format!(
                "Radius must be a finite number of meters greater than 0, got: {}",
                self.radius_m
            )));
        }
        if let Err(e) = self.center.validate() {
            return Err(IndexError::invalid_argument(format!(
                "Invalid query center: {}",
                e.message()
            )));
        }
        if let Some(types) = &self.types {
            if types.is_empty() {
                return Err(IndexError::invalid_argument(
                    "Type filter must name at least one facility type",
                ));
            }
            if types.iter().any(FacilityType::is_blank) {
                return Err(IndexError::invalid_argument(
                    "Type filter must not contain blank facility types",
                ));
            }
        }
        if self.limit == Some(0) {
            return Err(IndexError::invalid_argument("Limit must be greater than 0"));
        }
        Ok(())
    }

    pub(crate) fn matches_type(&self, facility_type: &FacilityType) -> bool {
        match &self.types {
            Some(types) => types.contains(facility_type),
            None => true,
        }
    }
}

impl Display for RadiusQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(within {} m of {}", self.radius_m, self.center)?;
        if let Some(types) = &self.types {
            let names: Vec<&str> = types.iter().map(FacilityType::as_str).collect();
            write!(f, " types [{}]", names.join(", "))?;
        }
        if let Some(limit) = self.limit {
            write!(f, " limit {}", limit)?;
        }
        write!(f, ")")
    }
}

/// A record matched by a radius query with its distance from the center.
///
/// Serializes flat: every record field plus `distance_m`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadiusHit {
    #[serde(flatten)]
    pub record: FacilityRecord,
    pub distance_m: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn center() -> Position {
        Position::new(48.215, 16.330)
    }

    #[test]
    fn test_valid_query() {
        let query = RadiusQuery::new(center(), 5_000.0);
        assert!(query.validate().is_ok());
        assert!(query.types().is_none());
        assert!(query.limit().is_none());
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        for radius in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = RadiusQuery::new(center(), radius).validate().unwrap_err();
            assert!(matches!(err, IndexError::InvalidArgument(_)), "radius {}", radius);
        }
    }

    #[test]
    fn test_rejects_invalid_center() {
        let err = RadiusQuery::new(Position::new(100.0, 0.0), 10.0)
            .validate()
            .unwrap_err();
        assert!(matches!(err, IndexError::InvalidArgument(_)));
        assert!(err.message().contains("Latitude"));
    }

    #[test]
    fn test_rejects_empty_type_filter() {
        let query = RadiusQuery::new(center(), 10.0).with_types(Vec::<&str>::new());
        assert!(matches!(query.validate(), Err(IndexError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_blank_type() {
        let query = RadiusQuery::new(center(), 10.0).with_types(["hospital", " "]);
        assert!(matches!(query.validate(), Err(IndexError::InvalidArgument(_))));
    }

    #[test]
    fn test_rejects_zero_limit() {
        let query = RadiusQuery::new(center(), 10.0).with_limit(0);
        assert!(matches!(query.validate(), Err(IndexError::InvalidArgument(_))));
    }

    #[test]
    fn test_matches_type() {
        let query = RadiusQuery::new(center(), 10.0).with_types(["pharmacy"]);
        assert!(query.matches_type(&FacilityType::from("pharmacy")));
        assert!(!query.matches_type(&FacilityType::from("Pharmacy")));
        let unfiltered = RadiusQuery::new(center(), 10.0);
        assert!(unfiltered.matches_type(&FacilityType::from("anything")));
    }

    #[test]
    fn test_with_type_filter_clears() {
        let query = RadiusQuery::new(center(), 10.0)
            .with_types(["clinic"])
            .with_type_filter(None);
        assert!(query.types().is_none());
    }

    #[test]
    fn test_display() {
        let query = RadiusQuery::new(Position::new(1.0, 2.0), 500.0)
            .with_types(["dentist", "clinic"])
            .with_limit(3);
        assert_eq!(
            query.to_string(),
            "(within 500 m of (lat=1.000000, lon=2.000000) types [clinic, dentist] limit 3)"
        );
    }

    #[test]
    fn test_hit_serializes_flat() {
        let hit = RadiusHit {
            record: FacilityRecord::new(1, Position::new(48.0, 16.0), "hospital").with_name("A"),
            distance_m: 12.5,
        };
        let json = serde_json::to_value(&hit).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "A");
        assert_eq!(json["distance_m"], 12.5);
    }
}
