use crate::{MemoryAttributes, MemoryUsage};
use alloc::vec::Vec;
use core::fmt;
use payload_memory_addresses::{PageSize, PhysicalAddress, PhysicalPage};

/// One page-granular entry of the consolidated memory map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryMapEntry<S: PageSize> {
    start: PhysicalPage<S>,
    pages: u64,
    usage: MemoryUsage,
    attributes: MemoryAttributes,
}

impl<S: PageSize> MemoryMapEntry<S> {
    #[inline]
    #[must_use]
    pub const fn new(
        start: PhysicalPage<S>,
        pages: u64,
        usage: MemoryUsage,
        attributes: MemoryAttributes,
    ) -> Self {
        Self {
            start,
            pages,
            usage,
            attributes,
        }
    }

    #[inline]
    #[must_use]
    pub const fn start(&self) -> PhysicalPage<S> {
        self.start
    }

    #[inline]
    #[must_use]
    pub const fn pages(&self) -> u64 {
        self.pages
    }

    #[inline]
    #[must_use]
    pub const fn usage(&self) -> MemoryUsage {
        self.usage
    }

    #[inline]
    #[must_use]
    pub const fn attributes(&self) -> MemoryAttributes {
        self.attributes
    }

    /// Byte length of the entry, or `None` on overflow.
    #[inline]
    #[must_use]
    pub fn byte_length(&self) -> Option<u64> {
        S::pages_in_bytes(self.pages)
    }

    /// Exclusive end address, or `None` on overflow.
    #[inline]
    #[must_use]
    pub fn end(&self) -> Option<PhysicalAddress> {
        self.start.base().checked_add(self.byte_length()?)
    }

    pub(crate) fn grow(&mut self, pages: u64) {
        self.pages += pages;
    }

    pub(crate) fn shrink(&mut self, pages: u64) {
        debug_assert!(pages <= self.pages);
        self.pages -= pages;
    }
}

impl<S: PageSize> fmt::Display for MemoryMapEntry<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:#x}, {} pages, {}, attributes {:#x}]",
            self.start.base().as_u64(),
            self.pages,
            self.usage,
            self.attributes.into_bits()
        )
    }
}

/// The consolidated memory map: an ordered sequence of entries plus the
/// entry-size tag consumers use to walk a serialized copy.
///
/// ### Invariants (established by [`crate::build_memory_map`])
/// - Entries are strictly ascending, non-overlapping, and gap-free over the
///   union of the consolidated input regions.
/// - No two adjacent entries share identical `(usage, attributes)`.
/// - No entry has zero pages.
///
/// The table is created fresh on every build and never mutated afterwards;
/// ownership is exclusive to the caller that receives it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryMapTable<S: PageSize> {
    entries: Vec<MemoryMapEntry<S>>,
}

impl<S: PageSize> MemoryMapTable<S> {
    /// Size in bytes of one serialized entry.
    pub const ENTRY_SIZE: usize = size_of::<MemoryMapEntry<S>>();

    /// Wrap an externally produced entry sequence, e.g. when the table
    /// arrives as the transport format instead of the catalogs. The
    /// invariants above are the *caller's* promise here;
    /// [`crate::materialize_from_memory_map`] re-checks them.
    #[inline]
    #[must_use]
    pub const fn new(entries: Vec<MemoryMapEntry<S>>) -> Self {
        Self { entries }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn entries(&self) -> &[MemoryMapEntry<S>] {
        &self.entries
    }

    /// Total number of pages described by the table.
    #[inline]
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        self.entries.iter().map(MemoryMapEntry::pages).sum()
    }

    /// Log the table at debug level, one line per entry.
    pub fn dump(&self) {
        for (index, entry) in self.entries.iter().enumerate() {
            log::debug!("memmap[{index}] {entry}");
        }
    }
}
