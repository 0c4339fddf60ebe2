//! The interval merge: overlays one region's allocation records on top of
//! the region's default fill, emitting a minimal ordered run of coalesced
//! entries that covers the region exactly once.

use crate::translate::{capabilities_to_attributes, resource_kind_to_usage};
use crate::{AllocationRecord, MemoryAttributes, MemoryMapEntry, MemoryUsage, RegionDescriptor};
use alloc::vec::Vec;
use payload_memory_addresses::{PageSize, PhysicalAddress, PhysicalPage};

/// Append cursor for memory map entries.
///
/// Carries the state needed to coalesce adjacent entries with identical
/// `(usage, attributes)` and to account for overlap trims. With `out` set to
/// `None` the coalescer only counts — that is the sizing pass; the fill pass
/// re-runs the identical walk against a pre-sized buffer. Every operation
/// here must behave bit-for-bit the same in both modes, otherwise the two
/// passes disagree on the entry count.
pub(crate) struct Coalescer<'a, S: PageSize> {
    out: Option<&'a mut Vec<MemoryMapEntry<S>>>,
    count: usize,
    /// Start of the run the last emitted entry covers.
    current_start: u64,
    /// Exclusive end of the last emitted entry.
    current_end: u64,
    usage: MemoryUsage,
    attributes: MemoryAttributes,
    /// The next append must open a new entry even if it looks contiguous.
    fresh: bool,
}

impl<'a, S: PageSize> Coalescer<'a, S> {
    pub(crate) fn new(out: Option<&'a mut Vec<MemoryMapEntry<S>>>) -> Self {
        Self {
            out,
            count: 0,
            current_start: 0,
            current_end: 0,
            usage: MemoryUsage::SENTINEL,
            attributes: MemoryAttributes::new(),
            fresh: true,
        }
    }

    pub(crate) const fn count(&self) -> usize {
        self.count
    }

    pub(crate) const fn current_end(&self) -> u64 {
        self.current_end
    }

    /// Move the cursor to `at` across a gap in the address space.
    ///
    /// Entries on either side of a gap never coalesce, even when their kind
    /// matches. Contiguous region boundaries do not break the run.
    pub(crate) fn break_run(&mut self, at: u64) {
        if self.current_end != at {
            self.current_end = at;
            self.fresh = true;
        }
    }

    /// Emit `pages` pages at `start`, extending the previous entry when the
    /// run is contiguous and the kind matches.
    pub(crate) fn append(
        &mut self,
        start: u64,
        pages: u64,
        usage: MemoryUsage,
        attributes: MemoryAttributes,
    ) {
        debug_assert!(pages > 0, "zero-page appends must be filtered by the caller");
        let bytes = pages * S::SIZE;

        if self.current_end == start
            && self.usage == usage
            && self.attributes == attributes
            && !self.fresh
        {
            debug_assert!(self.count > 0);
            self.current_end += bytes;
            if let Some(out) = self.out.as_deref_mut() {
                out[self.count - 1].grow(pages);
            }
        } else {
            if let Some(out) = self.out.as_deref_mut() {
                debug_assert_eq!(out.len(), self.count);
                out.push(MemoryMapEntry::new(
                    PhysicalPage::containing(PhysicalAddress::new(start)),
                    pages,
                    usage,
                    attributes,
                ));
            }
            self.count += 1;
            self.current_start = start;
            self.usage = usage;
            self.attributes = attributes;
            self.current_end = start + bytes;
        }
        self.fresh = false;
    }

    /// Shrink the last emitted entry so the run ends at `new_end`.
    ///
    /// Used when an allocation record reaches back into bytes already
    /// emitted: the overlap is taken away from the *earlier* entry, the
    /// later record keeps its full range. When the trim swallows the whole
    /// last entry the entry is dropped instead of being kept at zero pages.
    pub(crate) fn trim_to(&mut self, new_end: u64) {
        debug_assert!(new_end <= self.current_end);
        debug_assert!(new_end >= self.current_start);
        let bytes = self.current_end - new_end;
        if bytes == 0 {
            return;
        }

        if new_end == self.current_start {
            if let Some(out) = self.out.as_deref_mut() {
                out.pop();
            }
            self.count -= 1;
            self.current_end = new_end;
            // The kind of the entry before the dropped one is not tracked,
            // so the run cannot be resumed.
            self.fresh = true;
        } else {
            if let Some(out) = self.out.as_deref_mut() {
                out[self.count - 1].shrink(S::size_in_pages(bytes));
            }
            self.current_end = new_end;
        }
    }
}

/// Overlay `records` on `region`, appending the resulting entries.
///
/// `records` must be sorted ascending by start and lie fully inside the
/// region; the assembler establishes both. The region's
/// `(kind, capabilities)` fill every byte no record claims; each record's
/// entry carries the record's usage and the region's translated attributes.
pub(crate) fn merge_region<S: PageSize>(
    region: &RegionDescriptor,
    records: &[AllocationRecord],
    coalescer: &mut Coalescer<'_, S>,
) {
    let default_usage = resource_kind_to_usage(region.kind());
    let attributes = capabilities_to_attributes(region.capabilities());
    let region_end = region.range().end().as_u64();

    log::trace!(
        "merging region {} ({} allocation records)",
        region.range(),
        records.len()
    );
    coalescer.break_run(region.range().start().as_u64());

    for record in records {
        let start = record.range().start().as_u64();
        let end = record.range().end().as_u64();

        if coalescer.current_end() > start {
            // Upstream discovery occasionally reports overlapping records;
            // tolerated, but worth surfacing.
            if coalescer.current_end() >= end {
                log::warn!(
                    "allocation record {} fully covered by earlier records, skipping",
                    record.range()
                );
                continue;
            }
            log::warn!(
                "allocation record {} overlaps earlier records by {:#x} bytes, trimming",
                record.range(),
                coalescer.current_end() - start
            );
            coalescer.trim_to(start);
        }

        if coalescer.current_end() < start {
            let pages = S::size_in_pages(start - coalescer.current_end());
            coalescer.append(coalescer.current_end(), pages, default_usage, attributes);
        }

        coalescer.append(start, record.range().page_count::<S>(), record.usage(), attributes);
    }

    if coalescer.current_end() < region_end {
        let pages = S::size_in_pages(region_end - coalescer.current_end());
        coalescer.append(coalescer.current_end(), pages, default_usage, attributes);
    }
}
