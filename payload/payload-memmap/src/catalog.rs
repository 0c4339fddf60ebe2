use crate::{AllocationRecord, MemoryMapTable, MemoryUsage, RegionDescriptor};
use alloc::vec::Vec;
use payload_memory_addresses::{PageSize, PhysicalRange};

/// Read access to the ordered set of region descriptors currently known.
///
/// Implemented by the platform bring-up code that discovered the regions;
/// the consolidation core only ever reads through this trait.
pub trait RegionSource {
    fn regions(&self) -> &[RegionDescriptor];
}

/// Read access to the ordered set of allocation records currently known.
pub trait AllocationSource {
    fn allocations(&self) -> &[AllocationRecord];
}

impl RegionSource for [RegionDescriptor] {
    fn regions(&self) -> &[RegionDescriptor] {
        self
    }
}

impl RegionSource for Vec<RegionDescriptor> {
    fn regions(&self) -> &[RegionDescriptor] {
        self
    }
}

impl AllocationSource for [AllocationRecord] {
    fn allocations(&self) -> &[AllocationRecord] {
        self
    }
}

impl AllocationSource for Vec<AllocationRecord> {
    fn allocations(&self) -> &[AllocationRecord] {
        self
    }
}

/// Consumer-defined storage slot for a finished memory map.
///
/// The consumer decides retention and serialization; the core only hands the
/// table over (see [`crate::build_and_publish`]).
pub trait MemoryMapSink<S: PageSize> {
    fn publish(&mut self, table: MemoryMapTable<S>);
}

/// An immutable snapshot of both catalogs for the duration of one build.
///
/// This is the explicit context object every core call receives; nothing may
/// append to the underlying catalogs while a build is in progress, and the
/// core never mutates them.
///
/// The snapshot can carry one synthetic allocation record describing the
/// metadata area that holds the catalogs themselves — memory that is claimed
/// (the consumer must not clobber it) but that no upstream record covers.
#[derive(Debug, Clone, Copy)]
pub struct CatalogSnapshot<'a, R, A>
where
    R: RegionSource + ?Sized,
    A: AllocationSource + ?Sized,
{
    regions: &'a R,
    allocations: &'a A,
    metadata_area: Option<AllocationRecord>,
}

impl<'a, R, A> CatalogSnapshot<'a, R, A>
where
    R: RegionSource + ?Sized,
    A: AllocationSource + ?Sized,
{
    #[inline]
    #[must_use]
    pub const fn new(regions: &'a R, allocations: &'a A) -> Self {
        Self {
            regions,
            allocations,
            metadata_area: None,
        }
    }

    /// Attach the synthetic record for the catalog metadata area.
    ///
    /// The area is claimed as boot-services data, matching how the metadata
    /// store announces itself to later consumers.
    #[inline]
    #[must_use]
    pub const fn with_metadata_area(mut self, range: PhysicalRange) -> Self {
        self.metadata_area = Some(AllocationRecord::new(range, MemoryUsage::BootServicesData));
        self
    }

    #[inline]
    #[must_use]
    pub fn regions(&self) -> &[RegionDescriptor] {
        self.regions.regions()
    }

    /// All allocation records in the snapshot, the synthetic metadata-area
    /// record included.
    pub fn allocation_records(&self) -> impl Iterator<Item = AllocationRecord> + '_ {
        self.allocations
            .allocations()
            .iter()
            .copied()
            .chain(self.metadata_area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payload_memory_addresses::PhysicalAddress;

    #[test]
    fn snapshot_chains_the_metadata_record() {
        let regions: Vec<RegionDescriptor> = Vec::new();
        let allocations: Vec<AllocationRecord> = Vec::new();
        let metadata = PhysicalRange::new(PhysicalAddress::new(0x8000), 0x2000).unwrap();

        let snapshot = CatalogSnapshot::new(&regions, &allocations);
        assert_eq!(snapshot.allocation_records().count(), 0);

        let snapshot = snapshot.with_metadata_area(metadata);
        let records: Vec<_> = snapshot.allocation_records().collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].range(), metadata);
        assert_eq!(records[0].usage(), MemoryUsage::BootServicesData);
    }
}
