//! # Boot Memory Map Consolidation
//!
//! Reconciles two independent descriptions of physical memory — coarse
//! *region descriptors* (contiguous ranges with a resource kind and a
//! capability mask) and fine-grained *allocation records* (sub-ranges already
//! claimed for a specific use) — into one canonical, non-overlapping,
//! address-sorted memory map.
//!
//! ## Data Flow
//!
//! ```text
//! RegionSource ─┐
//!               ├─► CatalogSnapshot ─► build_memory_map ─► MemoryMapTable
//! AllocationSource ─┘                      (two-pass)            │
//!                                                               ▼
//!                         (regions, allocations) ◄── materialize_from_memory_map
//! ```
//!
//! Each region's `(kind, capabilities)` is the *default fill* for every byte
//! the region covers; allocation records are higher-priority overlays that
//! replace the default for their own sub-range. The merge walks allocation
//! records in ascending address order behind a cursor, fills gaps with the
//! default, and coalesces adjacent entries with identical
//! `(usage, attributes)` — within a region and across region boundaries
//! alike.
//!
//! ## Two-Pass Construction
//!
//! [`build_memory_map`] runs the full merge twice: pass 1 against a counting
//! sink to size the output, pass 2 into a buffer reserved at exactly that
//! size. The discipline is inherited from the boot environment this models,
//! where the output table is carved out of the very memory being described
//! and no further reservation may happen once filling starts. Both passes
//! must be bit-for-bit deterministic; a count divergence is a programming
//! error and panics.
//!
//! ## Invariants
//!
//! - Output entries are strictly ascending, non-overlapping, and gap-free
//!   over the union of the consolidated regions.
//! - No two adjacent entries share identical `(usage, attributes)`.
//! - Input catalogs are never mutated; the table is built fresh per call.
//!
//! Malformed input (unaligned or zero-length regions, overlapping regions,
//! allocation records contained by no region) is reported via
//! [`MemoryMapError`]; there is no partially-correct output. Overlapping
//! allocation *records* are tolerated — upstream discovery is known to
//! produce them — but logged, and the overlap is trimmed from the earlier
//! entry without ever dropping bytes.

#![cfg_attr(not(any(test, doctest)), no_std)]

extern crate alloc;

mod allocation;
mod assemble;
mod attributes;
mod catalog;
mod error;
mod materialize;
mod merge;
mod region;
mod table;
mod translate;

pub use allocation::{AllocationRecord, MemoryUsage};
pub use assemble::{build_and_publish, build_memory_map};
pub use attributes::{MemoryAttributes, RegionCapabilities};
pub use catalog::{AllocationSource, CatalogSnapshot, MemoryMapSink, RegionSource};
pub use error::{MaterializeError, MemoryMapError};
pub use materialize::materialize_from_memory_map;
pub use region::{RegionDescriptor, ResourceKind};
pub use table::{MemoryMapEntry, MemoryMapTable};
pub use translate::{
    attributes_to_capabilities, capabilities_to_attributes, resource_kind_to_usage,
    usage_to_resource_kind,
};
