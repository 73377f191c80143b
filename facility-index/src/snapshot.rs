use im::OrdMap;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use crate::bounding_box::GeoBounds;
use crate::config::{IndexConfig, QueryStrategy};
use crate::errors::{IndexError, IndexResult};
use crate::geometry::{distance, Position};
use crate::grid::SpatialGrid;
use crate::query::{RadiusHit, RadiusQuery};
use crate::record::{FacilityId, FacilityRecord, FacilityType};

#[derive(Clone, Debug)]
struct Slot {
    /// Insertion sequence; fixes the record's place in `list_all` order.
    seq: u64,
    record: Arc<FacilityRecord>,
}

/// Statistics about an index snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStats {
    pub records: usize,
    pub occupied_cells: usize,
    pub max_cell_occupancy: usize,
    pub generation: u64,
}

/// An immutable view of the full record set at one point in time.
///
/// Obtained from [`crate::FacilityIndex::snapshot`]. Any number of reads
/// against the same snapshot see identical content, whatever writes happen
/// to the index meanwhile. Cloning is O(1).
#[derive(Clone, Debug)]
pub struct IndexSnapshot {
    records: OrdMap<FacilityId, Slot>,
    order: OrdMap<u64, FacilityId>,
    grid: SpatialGrid,
    next_seq: u64,
    generation: u64,
    strategy: QueryStrategy,
}

impl IndexSnapshot {
    pub(crate) fn empty(config: &IndexConfig) -> Self {
        IndexSnapshot {
            records: OrdMap::new(),
            order: OrdMap::new(),
            grid: SpatialGrid::new(config.cell_size_degrees),
            next_seq: 0,
            generation: 0,
            strategy: config.strategy,
        }
    }

    /// Builds a snapshot holding exactly `records`, validating the whole
    /// batch first. Nothing is returned on failure, so the caller's current
    /// snapshot stays in place.
    pub(crate) fn build<I>(config: &IndexConfig, records: I, generation: u64) -> IndexResult<Self>
    where
        I: IntoIterator<Item = FacilityRecord>,
    {
        let records: Vec<FacilityRecord> = records.into_iter().collect();

        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            validate_record(record)?;
            if !seen.insert(&record.id) {
                return Err(IndexError::validation(format!(
                    "Duplicate facility id {} in load batch",
                    record.id
                )));
            }
        }

        let mut snapshot = IndexSnapshot::empty(config);
        snapshot.generation = generation;
        for record in records {
            snapshot.insert_new(record);
        }
        Ok(snapshot)
    }

    fn insert_new(&mut self, record: FacilityRecord) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.grid.insert(record.id.clone(), &record.position);
        self.order.insert(seq, record.id.clone());
        self.records.insert(
            record.id.clone(),
            Slot {
                seq,
                record: Arc::new(record),
            },
        );
    }

    /// Returns a copy of this snapshot with `record` inserted or replaced.
    pub(crate) fn with_upsert(&self, record: FacilityRecord) -> IndexResult<Self> {
        validate_record(&record)?;

        let mut next = self.clone();
        next.generation += 1;
        match self.records.get(&record.id) {
            Some(existing) => {
                next.grid
                    .relocate(&record.id, &existing.record.position, &record.position);
                next.records.insert(
                    record.id.clone(),
                    Slot {
                        seq: existing.seq,
                        record: Arc::new(record),
                    },
                );
            }
            None => next.insert_new(record),
        }
        Ok(next)
    }

    /// Returns a copy of this snapshot without `id`, or `None` if the
    /// record is not present.
    pub(crate) fn with_delete(&self, id: &FacilityId) -> Option<Self> {
        let slot = self.records.get(id)?;

        let mut next = self.clone();
        next.generation += 1;
        next.grid.remove(id, &slot.record.position);
        next.order.remove(&slot.seq);
        next.records.remove(id);
        Some(next)
    }

    /// Returns a copy of this snapshot with no records.
    pub(crate) fn cleared(&self, config: &IndexConfig) -> Self {
        let mut next = IndexSnapshot::empty(config);
        next.generation = self.generation + 1;
        next
    }

    /// Every live record in insertion order. A replaced record keeps the
    /// position of its first insertion.
    pub fn list_all(&self) -> Vec<FacilityRecord> {
        self.order
            .values()
            .filter_map(|id| self.records.get(id))
            .map(|slot| slot.record.as_ref().clone())
            .collect()
    }

    pub fn get(&self, id: &FacilityId) -> Option<FacilityRecord> {
        self.records.get(id).map(|slot| slot.record.as_ref().clone())
    }

    pub fn contains(&self, id: &FacilityId) -> bool {
        self.records.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of successful writes that led to this snapshot.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            records: self.records.len(),
            occupied_cells: self.grid.cell_count(),
            max_cell_occupancy: self.grid.max_cell_occupancy(),
            generation: self.generation,
        }
    }

    /// Finds every record within `radius_m` meters of `center`, nearest
    /// first, optionally restricted to `type_filter`.
    ///
    /// # Errors
    ///
    /// See [`RadiusQuery::validate`].
    pub fn query_radius(
        &self,
        center: Position,
        radius_m: f64,
        type_filter: Option<&BTreeSet<FacilityType>>,
    ) -> IndexResult<Vec<RadiusHit>> {
        let query = RadiusQuery::new(center, radius_m).with_type_filter(type_filter.cloned());
        self.query(&query)
    }

    /// Runs a radius query.
    ///
    /// Hits are ordered by ascending distance; equal distances are ordered
    /// by ascending id. With a limit, only the nearest hits are kept.
    pub fn query(&self, query: &RadiusQuery) -> IndexResult<Vec<RadiusHit>> {
        query.validate()?;

        let center = query.center();
        let radius = query.radius_m();
        let mut hits: Vec<(f64, &Arc<FacilityRecord>)> = Vec::new();
        let mut examined = 0usize;

        let mut consider = |record: &Arc<FacilityRecord>| {
            examined += 1;
            if !query.matches_type(&record.facility_type) {
                return None;
            }
            let d = distance(&record.position, center);
            (d <= radius).then_some(d)
        };

        match self.strategy {
            QueryStrategy::Scan => {
                for slot in self.records.values() {
                    if let Some(d) = consider(&slot.record) {
                        hits.push((d, &slot.record));
                    }
                }
            }
            QueryStrategy::Grid => {
                let bounds = GeoBounds::around(center, radius);
                for id in self.grid.candidates(&bounds) {
                    if let Some(slot) = self.records.get(id) {
                        if let Some(d) = consider(&slot.record) {
                            hits.push((d, &slot.record));
                        }
                    }
                }
            }
        }

        hits.sort_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.id.cmp(&b.1.id)));
        if let Some(limit) = query.limit() {
            hits.truncate(limit);
        }

        log::debug!(
            "Query {} examined {} records, matched {}",
            query,
            examined,
            hits.len()
        );

        Ok(hits
            .into_iter()
            .map(|(distance_m, record)| RadiusHit {
                record: record.as_ref().clone(),
                distance_m,
            })
            .collect())
    }
}

fn validate_record(record: &FacilityRecord) -> IndexResult<()> {
    record.position.validate().map_err(|e| {
        IndexError::validation(format!("Facility {}: {}", record.id, e.message()))
    })
}
