//! The memory map assembler: validates the catalogs, drives the interval
//! merge over every consolidated region in ascending address order, and
//! builds the output table with the count-then-fill discipline.

use crate::catalog::{AllocationSource, CatalogSnapshot, MemoryMapSink, RegionSource};
use crate::merge::{Coalescer, merge_region};
use crate::{AllocationRecord, MemoryMapError, MemoryMapTable, RegionDescriptor};
use alloc::vec::Vec;
use payload_memory_addresses::PageSize;

/// Consolidate the snapshot's catalogs into one memory map table.
///
/// Regions are stable-sorted by start address; only system-memory and
/// reserved regions are consolidated, every other kind is filtered out
/// before the merge. Coalescing applies across region boundaries exactly as
/// within a region.
///
/// ### Two-pass contract
///
/// The merge runs twice: pass 1 counts the entries, pass 2 fills a buffer
/// reserved at exactly that count. The discipline mirrors the boot
/// environment where the table is carved out of the memory being described,
/// so no reservation may happen once filling starts — and it keeps the
/// algorithm deterministic: the snapshot must not change between passes.
///
/// # Errors
///
/// Any malformed catalog input ([`MemoryMapError`]) aborts the build; there
/// is no partially correct output.
///
/// # Panics
///
/// Panics if the two passes disagree on the entry count. That would mean the
/// walk is not deterministic — a programming error, not an input error.
pub fn build_memory_map<S, R, A>(
    snapshot: &CatalogSnapshot<'_, R, A>,
) -> Result<MemoryMapTable<S>, MemoryMapError>
where
    S: PageSize,
    R: RegionSource + ?Sized,
    A: AllocationSource + ?Sized,
{
    // Validate the whole region catalog before touching any of it.
    let mut regions: Vec<&RegionDescriptor> = Vec::with_capacity(snapshot.regions().len());
    for region in snapshot.regions() {
        let range = region.range();
        if range.is_empty() {
            return Err(MemoryMapError::EmptyRegion {
                start: range.start().as_u64(),
            });
        }
        if !range.is_aligned::<S>() {
            return Err(MemoryMapError::UnalignedRange {
                start: range.start().as_u64(),
                length: range.length(),
            });
        }
        regions.push(region);
    }

    // The catalog must form a disjoint set. Sort is stable, so equal starts
    // keep their discovery order (and are then rejected as overlapping).
    regions.sort_by_key(|region| region.range().start());
    for pair in regions.windows(2) {
        if pair[0].range().end() > pair[1].range().start() {
            return Err(MemoryMapError::OverlappingRegions {
                first: pair[0].range().start().as_u64(),
                second: pair[1].range().start().as_u64(),
            });
        }
    }

    let consolidated: Vec<&RegionDescriptor> = regions
        .iter()
        .copied()
        .filter(|region| region.kind().is_consolidated())
        .collect();

    // Claim each allocation record for the single region containing it.
    // A separate claim list per region, never a mark on the inputs.
    let mut claims: Vec<Vec<AllocationRecord>> =
        consolidated.iter().map(|_| Vec::new()).collect();
    for record in snapshot.allocation_records() {
        let range = record.range();
        if range.is_empty() {
            // Degenerate record, treated as absent.
            continue;
        }
        if !range.is_aligned::<S>() {
            return Err(MemoryMapError::UnalignedRange {
                start: range.start().as_u64(),
                length: range.length(),
            });
        }

        let slot = consolidated
            .partition_point(|region| region.range().start() <= range.start());
        if slot > 0 && consolidated[slot - 1].range().contains_range(&range) {
            claims[slot - 1].push(record);
            continue;
        }

        // Records inside regions the core does not consolidate are resolved
        // but carry no map entry; the kind's own driver owns that space.
        if regions
            .iter()
            .any(|region| !region.kind().is_consolidated() && region.range().contains_range(&range))
        {
            log::debug!("allocation record {range} lies in a non-consolidated region, skipping");
            continue;
        }

        return Err(MemoryMapError::UnresolvedAllocation {
            start: range.start().as_u64(),
        });
    }
    for records in &mut claims {
        records.sort_by_key(|record| record.range().start());
    }

    // Pass 1: count entries against the null sink.
    let mut sizing = Coalescer::<S>::new(None);
    for (region, records) in consolidated.iter().zip(&claims) {
        merge_region(region, records, &mut sizing);
    }
    let expected = sizing.count();

    // Pass 2: the identical walk into a buffer reserved at exactly that
    // size. No other reservation happens between here and the return.
    let mut entries = Vec::with_capacity(expected);
    let mut filling = Coalescer::new(Some(&mut entries));
    for (region, records) in consolidated.iter().zip(&claims) {
        merge_region(region, records, &mut filling);
    }
    assert_eq!(
        filling.count(),
        expected,
        "memory map entry count diverged between passes"
    );

    let table = MemoryMapTable::new(entries);
    table.dump();
    Ok(table)
}

/// Build the memory map and hand it to a consumer-defined sink.
///
/// # Errors
///
/// Propagates [`build_memory_map`] errors; nothing is published on failure.
pub fn build_and_publish<S, R, A, P>(
    snapshot: &CatalogSnapshot<'_, R, A>,
    sink: &mut P,
) -> Result<(), MemoryMapError>
where
    S: PageSize,
    R: RegionSource + ?Sized,
    A: AllocationSource + ?Sized,
    P: MemoryMapSink<S>,
{
    let table = build_memory_map(snapshot)?;
    sink.publish(table);
    Ok(())
}
