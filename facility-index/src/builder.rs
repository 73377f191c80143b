use crate::config::{IndexConfig, QueryStrategy};
use crate::errors::IndexResult;
use crate::index::FacilityIndex;

/// Builder for a [`FacilityIndex`].
///
/// # Examples
///
/// ```rust
/// use facility_index::{FacilityIndex, QueryStrategy};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let index = FacilityIndex::builder()
///     .cell_size_degrees(0.05)
///     .strategy(QueryStrategy::Grid)
///     .build()?;
/// assert_eq!(index.config().cell_size_degrees, 0.05);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct FacilityIndexBuilder {
    config: IndexConfig,
}

impl FacilityIndexBuilder {
    pub fn new() -> Self {
        FacilityIndexBuilder {
            config: IndexConfig::default(),
        }
    }

    /// Starts from an existing configuration, e.g. one read from the
    /// serving layer's config file.
    pub fn from_config(config: IndexConfig) -> Self {
        FacilityIndexBuilder { config }
    }

    /// Sets the grid cell size in degrees of latitude.
    pub fn cell_size_degrees(mut self, degrees: f64) -> Self {
        self.config.cell_size_degrees = degrees;
        self
    }

    /// Sets how radius queries pick candidates.
    pub fn strategy(mut self, strategy: QueryStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Creates the index.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IndexError::InvalidArgument`] if the cell size is
    /// not a finite number of degrees in `(0, 90]`.
    pub fn build(self) -> IndexResult<FacilityIndex> {
        FacilityIndex::with_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::IndexError;

    #[test]
    fn test_builder_defaults() {
        let index = FacilityIndexBuilder::new().build().unwrap();
        assert_eq!(index.config(), &IndexConfig::default());
    }

    #[test]
    fn test_builder_settings() {
        let index = FacilityIndex::builder()
            .cell_size_degrees(0.5)
            .strategy(QueryStrategy::Scan)
            .build()
            .unwrap();
        assert_eq!(index.config().cell_size_degrees, 0.5);
        assert_eq!(index.config().strategy, QueryStrategy::Scan);
    }

    #[test]
    fn test_builder_from_config() {
        let config = IndexConfig {
            cell_size_degrees: 0.2,
            strategy: QueryStrategy::Scan,
        };
        let index = FacilityIndexBuilder::from_config(config.clone()).build().unwrap();
        assert_eq!(index.config(), &config);
    }

    #[test]
    fn test_builder_rejects_bad_cell_size() {
        let result = FacilityIndex::builder().cell_size_degrees(-0.1).build();
        assert!(matches!(result, Err(IndexError::InvalidArgument(_))));
    }
}
