//! Two-level spatial grid over latitude bands and longitude cells.
//!
//! Level one splits the globe into latitude bands of `cell_size` degrees.
//! Level two splits each band into longitude cells whose count shrinks with
//! `cos(latitude)`, so cells cover roughly the same ground distance at any
//! latitude. Cell widths always divide 360° evenly.
//!
//! The grid only answers "which ids live in cells touching this box". The
//! caller applies the exact distance predicate to each candidate.
//!
//! Storage uses persistent maps so a snapshot can be cloned in O(1) and
//! modified without disturbing readers of the original.

use im::{OrdMap, OrdSet};

use crate::bounding_box::GeoBounds;
use crate::geometry::Position;
use crate::record::FacilityId;

type Cells = OrdMap<u32, OrdSet<FacilityId>>;

#[derive(Clone, Debug)]
pub(crate) struct SpatialGrid {
    cell_size: f64,
    band_count: u32,
    max_columns: u32,
    bands: OrdMap<u32, Cells>,
}

impl SpatialGrid {
    /// Creates an empty grid. `cell_size` must be a validated, positive
    /// number of degrees.
    pub(crate) fn new(cell_size: f64) -> Self {
        let band_count = ((180.0 / cell_size).ceil() as u32).max(1);
        let max_columns = ((360.0 / cell_size).floor() as u32).max(1);
        SpatialGrid {
            cell_size,
            band_count,
            max_columns,
            bands: OrdMap::new(),
        }
    }

    fn band_of(&self, latitude: f64) -> u32 {
        let band = ((latitude + 90.0) / self.cell_size).floor() as u32;
        band.min(self.band_count - 1)
    }

    fn columns_in(&self, band: u32) -> u32 {
        let south = -90.0 + band as f64 * self.cell_size;
        let north = (south + self.cell_size).min(90.0);
        // the band's poleward edge has the narrowest degrees
        let edge = south.abs().max(north.abs());
        let cos = edge.to_radians().cos().max(0.0);
        let columns = (360.0 * cos / self.cell_size).floor() as u32;
        columns.clamp(1, self.max_columns)
    }

    fn column_of(columns: u32, longitude: f64) -> u32 {
        let width = 360.0 / columns as f64;
        let column = ((longitude + 180.0) / width).floor() as u32;
        column.min(columns - 1)
    }

    fn cell_of(&self, position: &Position) -> (u32, u32) {
        let band = self.band_of(position.latitude);
        let column = Self::column_of(self.columns_in(band), position.longitude);
        (band, column)
    }

    pub(crate) fn insert(&mut self, id: FacilityId, position: &Position) {
        let (band, column) = self.cell_of(position);
        self.bands
            .entry(band)
            .or_default()
            .entry(column)
            .or_default()
            .insert(id);
    }

    /// Removes `id` from the cell of `position`. Returns whether it was there.
    pub(crate) fn remove(&mut self, id: &FacilityId, position: &Position) -> bool {
        let (band, column) = self.cell_of(position);
        let Some(mut cells) = self.bands.get(&band).cloned() else {
            return false;
        };
        let Some(mut ids) = cells.get(&column).cloned() else {
            return false;
        };
        if ids.remove(id).is_none() {
            return false;
        }

        if ids.is_empty() {
            cells.remove(&column);
        } else {
            cells.insert(column, ids);
        }
        if cells.is_empty() {
            self.bands.remove(&band);
        } else {
            self.bands.insert(band, cells);
        }
        true
    }

    /// Moves `id` between cells when its position changed.
    pub(crate) fn relocate(&mut self, id: &FacilityId, from: &Position, to: &Position) {
        if self.cell_of(from) == self.cell_of(to) {
            return;
        }
        self.remove(id, from);
        self.insert(id.clone(), to);
    }

    /// All ids stored in cells that intersect `bounds`.
    pub(crate) fn candidates(&self, bounds: &GeoBounds) -> Vec<&FacilityId> {
        let first = self.band_of(bounds.min_lat);
        let last = self.band_of(bounds.max_lat);
        let spans = bounds.longitude_spans();

        let mut out = Vec::new();
        for (band, cells) in self.bands.range(first..=last) {
            let columns = self.columns_in(*band);
            for (west, east) in column_ranges(columns, &spans) {
                for (_, ids) in cells.range(west..=east) {
                    out.extend(ids.iter());
                }
            }
        }
        out
    }

    /// Number of non-empty cells.
    pub(crate) fn cell_count(&self) -> usize {
        self.bands.values().map(|cells| cells.len()).sum()
    }

    /// Largest number of ids held by a single cell.
    pub(crate) fn max_cell_occupancy(&self) -> usize {
        self.bands
            .values()
            .flat_map(|cells| cells.values().map(|ids| ids.len()))
            .max()
            .unwrap_or(0)
    }
}

/// Converts longitude spans to merged, non-overlapping column ranges so a
/// cell is never visited twice.
fn column_ranges(columns: u32, spans: &[(f64, f64)]) -> Vec<(u32, u32)> {
    let mut ranges: Vec<(u32, u32)> = spans
        .iter()
        .map(|(west, east)| {
            (
                SpatialGrid::column_of(columns, *west),
                SpatialGrid::column_of(columns, *east),
            )
        })
        .collect();
    ranges.sort_unstable();

    let mut merged: Vec<(u32, u32)> = Vec::with_capacity(ranges.len());
    for (lo, hi) in ranges {
        match merged.last_mut() {
            Some(last) if lo <= last.1.saturating_add(1) => last.1 = last.1.max(hi),
            _ => merged.push((lo, hi)),
        }
    }
    merged
}
