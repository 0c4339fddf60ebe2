//! The inverse transform: given a memory map table, re-derive the region
//! descriptors and allocation records that would have produced it. Used when
//! the table itself is the transport format rather than the catalogs.

use crate::translate::{attributes_to_capabilities, usage_to_resource_kind};
use crate::{AllocationRecord, MaterializeError, MemoryMapTable, RegionDescriptor};
use alloc::vec::Vec;
use payload_memory_addresses::{PageSize, PhysicalRange};

/// Regenerate `(regions, allocations)` from a memory map table.
///
/// Walks entries in order. An entry extends the region being built when its
/// mapped resource kind and re-derived capabilities match and it is
/// contiguous; otherwise it starts a new region. Every entry whose usage is
/// neither conventional nor reserved additionally emits an allocation
/// record for exactly its range.
///
/// Together with [`crate::build_memory_map`] this round-trips: catalogs that
/// already satisfy the model's invariants are reproduced
/// attribute-for-attribute and range-for-range, modulo the synthetic
/// metadata-area record and capability bits outside the translation table.
///
/// # Errors
///
/// The table is expected to satisfy the output invariants of
/// [`crate::build_memory_map`]; violations are reported as
/// [`MaterializeError`].
pub fn materialize_from_memory_map<S: PageSize>(
    table: &MemoryMapTable<S>,
) -> Result<(Vec<RegionDescriptor>, Vec<AllocationRecord>), MaterializeError> {
    if table.is_empty() {
        return Err(MaterializeError::EmptyTable);
    }

    let mut regions: Vec<RegionDescriptor> = Vec::new();
    let mut allocations: Vec<AllocationRecord> = Vec::new();
    let mut cursor = 0u64;

    for (index, entry) in table.entries().iter().enumerate() {
        if entry.pages() == 0 {
            return Err(MaterializeError::ZeroSizedEntry { index });
        }
        let start = entry.start().base();
        let length = entry
            .byte_length()
            .ok_or(MaterializeError::EntryOverflow { index })?;
        let range = PhysicalRange::new(start, length)
            .ok_or(MaterializeError::EntryOverflow { index })?;
        if index > 0 && start.as_u64() < cursor {
            return Err(MaterializeError::UnorderedEntries { index });
        }
        cursor = range.end().as_u64();

        let kind = usage_to_resource_kind(entry.usage());
        let capabilities = attributes_to_capabilities(entry.attributes());

        match regions.last_mut() {
            Some(last)
                if last.kind() == kind
                    && last.capabilities() == capabilities
                    && last.range().end() == range.start() =>
            {
                let grown = last.grow(length);
                debug_assert!(grown, "contiguous entries cannot overflow");
            }
            _ => regions.push(RegionDescriptor::new(range, kind, capabilities)),
        }

        if entry.usage().is_allocation() {
            allocations.push(AllocationRecord::new(range, entry.usage()));
        }
    }

    Ok((regions, allocations))
}
