//! Configuration for a facility index.

use serde::{Deserialize, Serialize};

use crate::errors::{IndexError, IndexResult};

/// Default grid cell size in degrees of latitude (about 1.1 km).
pub const DEFAULT_CELL_SIZE_DEGREES: f64 = 0.01;

/// How radius queries select candidate records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStrategy {
    /// Scan only records in grid cells touching the query's bounding box.
    #[default]
    Grid,
    /// Compute the distance to every record. O(n) per query; the reference
    /// the grid must agree with.
    Scan,
}

/// Index tuning parameters.
///
/// Cell size trades memory for pruning: smaller cells hold fewer records
/// each but a large radius touches more of them. The default suits
/// country-sized OSM extracts queried at city-scale radii.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexConfig {
    pub cell_size_degrees: f64,
    pub strategy: QueryStrategy,
}

impl Default for IndexConfig {
    fn default() -> Self {
        IndexConfig {
            cell_size_degrees: DEFAULT_CELL_SIZE_DEGREES,
            strategy: QueryStrategy::default(),
        }
    }
}

impl IndexConfig {
    /// Checks that the configuration can build a grid.
    ///
    /// # Errors
    ///
    /// Returns [`IndexError::InvalidArgument`] if the cell size is not a
    /// finite number in `(0, 90]`.
    pub fn validate(&self) -> IndexResult<()> {
        let size = self.cell_size_degrees;
        if !size.is_finite() || size <= 0.0 || size > 90.0 {
            return Err(IndexError::invalid_argument(format!(
                "Cell size must be a finite number of degrees in (0, 90], got: {}",
                size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = IndexConfig::default();
        assert_eq!(config.cell_size_degrees, 0.01);
        assert_eq!(config.strategy, QueryStrategy::Grid);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_cell_sizes() {
        for size in [0.0, -1.0, 91.0, f64::NAN, f64::INFINITY] {
            let config = IndexConfig {
                cell_size_degrees: size,
                ..IndexConfig::default()
            };
            let err = config.validate().unwrap_err();
            assert!(matches!(err, IndexError::InvalidArgument(_)), "size {}", size);
        }
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: IndexConfig = serde_json::from_str(r#"{"strategy": "scan"}"#).unwrap();
        assert_eq!(config.strategy, QueryStrategy::Scan);
        assert_eq!(config.cell_size_degrees, DEFAULT_CELL_SIZE_DEGREES);
    }
}
