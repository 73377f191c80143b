//! # Facility Index - Spatial Indexing for Point-Located Facilities
//!
//! This crate provides an embeddable, in-memory index of facility records
//! (hospitals, clinics, pharmacies, ...) that answers exact great-circle
//! radius queries with distance-sorted results.
//!
//! ## Features
//!
//! - **Haversine Distance**: One distance model for filtering, sorting and
//!   reporting `distance_m`
//! - **Two-Level Grid**: Latitude bands split into longitude cells sized for
//!   their latitude; cells prefilter, exact distance decides
//! - **Snapshot Reads**: Readers work on immutable snapshots and never block
//!   each other or wait for a rebuild
//! - **Atomic Writes**: `load` is all-or-nothing; `upsert` and `delete`
//!   publish a new snapshot in one swap
//! - **Typed Records**: Explicit optional attributes, opaque type tags
//!
//! ## Quick Start
//!
//! ```rust
//! use facility_index::{FacilityIndex, FacilityRecord, Position, RadiusQuery};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let index = FacilityIndex::new();
//! index.load(vec![
//!     FacilityRecord::new(1, Position::new(48.221, 16.345), "hospital").with_name("A"),
//!     FacilityRecord::new(2, Position::new(48.210, 16.306), "pharmacy").with_name("B"),
//!     FacilityRecord::new(3, Position::new(48.250, 16.450), "hospital").with_name("C"),
//! ])?;
//!
//! // The nearest hospital within 10 km
//! let query = RadiusQuery::new(Position::new(48.215, 16.330), 10_000.0)
//!     .with_types(["hospital"])
//!     .with_limit(1);
//! let hits = index.query(&query)?;
//! assert_eq!(hits[0].record.attributes.name.as_deref(), Some("A"));
//! # Ok(())
//! # }
//! ```

pub mod bounding_box;
pub mod builder;
pub mod config;
pub mod errors;
pub mod geometry;
mod grid;
pub mod index;
pub mod query;
pub mod record;
pub mod snapshot;

pub use bounding_box::GeoBounds;
pub use builder::FacilityIndexBuilder;
pub use config::{IndexConfig, QueryStrategy, DEFAULT_CELL_SIZE_DEGREES};
pub use errors::{ErrorKind, IndexError, IndexResult};
pub use geometry::{distance, Position, EARTH_RADIUS_METERS};
pub use index::FacilityIndex;
pub use query::{RadiusHit, RadiusQuery};
pub use record::{FacilityAttributes, FacilityCategory, FacilityId, FacilityRecord, FacilityType};
pub use snapshot::{IndexSnapshot, IndexStats};
