use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::Arc;

use crate::builder::FacilityIndexBuilder;
use crate::config::IndexConfig;
use crate::errors::IndexResult;
use crate::geometry::Position;
use crate::query::{RadiusHit, RadiusQuery};
use crate::record::{FacilityId, FacilityRecord, FacilityType};
use crate::snapshot::{IndexSnapshot, IndexStats};

/// A shared, thread-safe spatial index of facility records.
/// Uses Pimpl pattern for cheap cloning and encapsulation: clones share the
/// same record set.
///
/// Reads work on an immutable [`IndexSnapshot`] and never wait for each
/// other or for a write in progress. Writes are serialized and publish a
/// new snapshot in a single pointer swap, so a reader sees the index either
/// before or after a write, never in between.
///
/// ## Example
///
/// ```rust
/// use facility_index::{FacilityIndex, FacilityRecord, Position};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let index = FacilityIndex::new();
/// index.load(vec![
///     FacilityRecord::new(1, Position::new(48.221, 16.345), "hospital"),
///     FacilityRecord::new(2, Position::new(48.210, 16.306), "pharmacy"),
///     FacilityRecord::new(3, Position::new(48.250, 16.450), "hospital"),
/// ])?;
///
/// let hits = index.query_radius(Position::new(48.215, 16.330), 5_000.0, None)?;
/// assert_eq!(hits.len(), 2);
/// assert!(hits[0].distance_m <= hits[1].distance_m);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FacilityIndex {
    inner: Arc<FacilityIndexInner>,
}

/// Private implementation details of FacilityIndex.
struct FacilityIndexInner {
    config: IndexConfig,
    current: RwLock<Arc<IndexSnapshot>>,
    /// Serializes writers; readers never touch it.
    writer: Mutex<()>,
}

impl Default for FacilityIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl FacilityIndex {
    /// Creates an empty index with the default configuration.
    pub fn new() -> Self {
        Self::from_valid_config(IndexConfig::default())
    }

    /// Creates an empty index with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(config: IndexConfig) -> IndexResult<Self> {
        config.validate()?;
        Ok(Self::from_valid_config(config))
    }

    /// Returns a builder for configuring a new index.
    pub fn builder() -> FacilityIndexBuilder {
        FacilityIndexBuilder::new()
    }

    fn from_valid_config(config: IndexConfig) -> Self {
        let snapshot = IndexSnapshot::empty(&config);
        FacilityIndex {
            inner: Arc::new(FacilityIndexInner {
                config,
                current: RwLock::new(Arc::new(snapshot)),
                writer: Mutex::new(()),
            }),
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.inner.config
    }

    /// Returns the current snapshot. Reads against it are unaffected by
    /// later writes.
    pub fn snapshot(&self) -> Arc<IndexSnapshot> {
        self.inner.current.read().clone()
    }

    fn publish(&self, snapshot: IndexSnapshot) {
        let previous = std::mem::replace(&mut *self.inner.current.write(), Arc::new(snapshot));
        // freeing a large snapshot is slow; do it after the write lock is released
        drop(previous);
    }

    /// Replaces the entire content of the index.
    ///
    /// The batch is validated as a whole before anything becomes visible.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IndexError::Validation`] if any record has an
    /// out-of-range position or two records share an id. The index is left
    /// unchanged.
    pub fn load<I>(&self, records: I) -> IndexResult<()>
    where
        I: IntoIterator<Item = FacilityRecord>,
    {
        let _guard = self.inner.writer.lock();
        let generation = self.snapshot().generation() + 1;

        let next = IndexSnapshot::build(&self.inner.config, records, generation)
            .map_err(|e| {
                log::warn!("Rejected facility load: {}", e);
                e
            })?;

        let stats = next.stats();
        self.publish(next);
        log::info!(
            "Loaded {} facilities into {} grid cells (generation {})",
            stats.records,
            stats.occupied_cells,
            stats.generation
        );
        Ok(())
    }

    /// Inserts a record, or replaces the record with the same id.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IndexError::Validation`] if the position is out of
    /// range. The index is left unchanged.
    pub fn upsert(&self, record: FacilityRecord) -> IndexResult<()> {
        let _guard = self.inner.writer.lock();
        let id = record.id.clone();

        let next = self
            .snapshot()
            .with_upsert(record)
            .map_err(|e| {
                log::warn!("Rejected facility upsert {}: {}", id, e);
                e
            })?;

        self.publish(next);
        log::debug!("Upserted facility {}", id);
        Ok(())
    }

    /// Removes a record. Returns whether a record was removed.
    pub fn delete(&self, id: &FacilityId) -> bool {
        let _guard = self.inner.writer.lock();

        match self.snapshot().with_delete(id) {
            Some(next) => {
                self.publish(next);
                log::debug!("Deleted facility {}", id);
                true
            }
            None => false,
        }
    }

    /// Removes every record.
    pub fn clear(&self) {
        let _guard = self.inner.writer.lock();
        let next = self.snapshot().cleared(&self.inner.config);
        let generation = next.generation();
        self.publish(next);
        log::info!("Cleared facility index (generation {})", generation);
    }

    /// Every live record, in insertion order.
    pub fn list_all(&self) -> Vec<FacilityRecord> {
        self.snapshot().list_all()
    }

    /// Finds every record within `radius_m` meters of `center`, nearest
    /// first, optionally restricted to the given facility types.
    ///
    /// # Errors
    ///
    /// Returns [`crate::IndexError::InvalidArgument`] if `radius_m` is not a
    /// finite number above zero, `center` is out of range, or `type_filter`
    /// is empty or contains a blank type.
    pub fn query_radius(
        &self,
        center: Position,
        radius_m: f64,
        type_filter: Option<&BTreeSet<FacilityType>>,
    ) -> IndexResult<Vec<RadiusHit>> {
        self.snapshot().query_radius(center, radius_m, type_filter)
    }

    /// Runs a radius query with the full set of options.
    pub fn query(&self, query: &RadiusQuery) -> IndexResult<Vec<RadiusHit>> {
        self.snapshot().query(query)
    }

    pub fn get(&self, id: &FacilityId) -> Option<FacilityRecord> {
        self.snapshot().get(id)
    }

    pub fn contains(&self, id: &FacilityId) -> bool {
        self.snapshot().contains(id)
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        self.snapshot().stats()
    }
}
