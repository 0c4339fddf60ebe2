/// Malformed catalog input.
///
/// The boot path this models has no recovery: its caller is expected to halt
/// rather than continue with a silently wrong map. Unknown resource or usage
/// *kinds* are deliberately not errors — they pass through as sentinel
/// values so new kinds keep their boundaries intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MemoryMapError {
    /// A region or allocation range is not page aligned.
    #[error("range {start:#x}+{length:#x} is not page aligned")]
    UnalignedRange { start: u64, length: u64 },
    /// A region descriptor covers no bytes.
    #[error("region at {start:#x} has zero length")]
    EmptyRegion { start: u64 },
    /// Two regions in the catalog overlap each other.
    #[error("region catalog overlaps: region at {first:#x} reaches into region at {second:#x}")]
    OverlappingRegions { first: u64, second: u64 },
    /// An allocation record lies fully inside no single region.
    #[error("allocation record at {start:#x} is not contained in any region")]
    UnresolvedAllocation { start: u64 },
}

/// Invalid memory map table handed to the reverse transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MaterializeError {
    /// The table contains no entries.
    #[error("memory map table is empty")]
    EmptyTable,
    /// Entries are not sorted ascending and non-overlapping.
    #[error("memory map entries are not sorted and disjoint at index {index}")]
    UnorderedEntries { index: usize },
    /// An entry covers no pages.
    #[error("memory map entry at index {index} has zero pages")]
    ZeroSizedEntry { index: usize },
    /// An entry's end does not fit the address space.
    #[error("memory map entry at index {index} overflows the address space")]
    EntryOverflow { index: usize },
}
