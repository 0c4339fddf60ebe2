//! Behavioural tests for the consolidation engine: catalogs in, canonical
//! memory map out, and the reverse transform back.

use payload_memmap::{
    AllocationRecord, CatalogSnapshot, MemoryMapEntry, MemoryMapError, MemoryMapSink,
    MemoryMapTable, MemoryUsage, RegionCapabilities, RegionDescriptor, ResourceKind,
    build_and_publish, build_memory_map, capabilities_to_attributes,
    materialize_from_memory_map,
};
use payload_memory_addresses::{PhysicalAddress, PhysicalRange, Size4K};

fn range(start: u64, length: u64) -> PhysicalRange {
    PhysicalRange::new(PhysicalAddress::new(start), length).unwrap()
}

fn caps() -> RegionCapabilities {
    RegionCapabilities::new()
        .with_present(true)
        .with_initialized(true)
        .with_tested(true)
        .with_uncacheable(true)
        .with_write_back_cacheable(true)
}

fn system(start: u64, length: u64) -> RegionDescriptor {
    RegionDescriptor::new(range(start, length), ResourceKind::SystemMemory, caps())
}

fn reserved(start: u64, length: u64) -> RegionDescriptor {
    RegionDescriptor::new(range(start, length), ResourceKind::Reserved, caps())
}

fn record(start: u64, length: u64, usage: MemoryUsage) -> AllocationRecord {
    AllocationRecord::new(range(start, length), usage)
}

fn build(
    regions: &[RegionDescriptor],
    allocations: &[AllocationRecord],
) -> Result<MemoryMapTable<Size4K>, MemoryMapError> {
    build_memory_map(&CatalogSnapshot::new(regions, allocations))
}

fn entry_tuple(entry: &MemoryMapEntry<Size4K>) -> (u64, u64, MemoryUsage) {
    (entry.start().base().as_u64(), entry.pages(), entry.usage())
}

#[test]
fn bare_system_region() {
    let table = build(&[system(0x1000, 0x4000)], &[]).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(
        entry_tuple(&table.entries()[0]),
        (0x1000, 4, MemoryUsage::Conventional)
    );
    assert_eq!(
        table.entries()[0].attributes(),
        capabilities_to_attributes(caps())
    );
}

#[test]
fn one_record_splits_the_region() {
    let table = build(
        &[system(0x1000, 0x4000)],
        &[record(0x2000, 0x1000, MemoryUsage::BootServicesData)],
    )
    .unwrap();

    let entries: Vec<_> = table.entries().iter().map(entry_tuple).collect();
    assert_eq!(
        entries,
        [
            (0x1000, 1, MemoryUsage::Conventional),
            (0x2000, 1, MemoryUsage::BootServicesData),
            (0x3000, 2, MemoryUsage::Conventional),
        ]
    );
}

#[test]
fn adjacent_regions_coalesce_across_the_boundary() {
    let table = build(&[system(0x1000, 0x3000), system(0x4000, 0x4000)], &[]).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(
        entry_tuple(&table.entries()[0]),
        (0x1000, 7, MemoryUsage::Conventional)
    );
}

#[test]
fn discontiguous_regions_do_not_coalesce() {
    let table = build(&[system(0x1000, 0x2000), system(0x8000, 0x2000)], &[]).unwrap();
    let entries: Vec<_> = table.entries().iter().map(entry_tuple).collect();
    assert_eq!(
        entries,
        [
            (0x1000, 2, MemoryUsage::Conventional),
            (0x8000, 2, MemoryUsage::Conventional),
        ]
    );
}

#[test]
fn region_catalog_order_does_not_matter() {
    let sorted = build(&[system(0x1000, 0x2000), system(0x8000, 0x2000)], &[]).unwrap();
    let shuffled = build(&[system(0x8000, 0x2000), system(0x1000, 0x2000)], &[]).unwrap();
    assert_eq!(sorted, shuffled);
}

#[test]
fn overlapping_records_are_trimmed_never_dropped() {
    let table = build(
        &[system(0x1000, 0x7000)],
        &[
            record(0x2000, 0x2000, MemoryUsage::BootServicesData),
            record(0x3000, 0x2000, MemoryUsage::LoaderData),
        ],
    )
    .unwrap();

    let entries: Vec<_> = table.entries().iter().map(entry_tuple).collect();
    assert_eq!(
        entries,
        [
            (0x1000, 1, MemoryUsage::Conventional),
            (0x2000, 1, MemoryUsage::BootServicesData),
            (0x3000, 2, MemoryUsage::LoaderData),
            (0x5000, 3, MemoryUsage::Conventional),
        ]
    );
    // The overlapped page is counted exactly once.
    assert_eq!(table.total_pages(), 7);
}

#[test]
fn priority_records_always_beat_the_region_default() {
    let usages = [
        MemoryUsage::LoaderCode,
        MemoryUsage::RuntimeServicesData,
        MemoryUsage::AcpiNvs,
        MemoryUsage::Unknown(0x42),
    ];
    let records: Vec<_> = usages
        .iter()
        .enumerate()
        .map(|(i, &usage)| record(0x2000 + (i as u64) * 0x2000, 0x1000, usage))
        .collect();

    let table = build(&[system(0x1000, 0x10000)], &records).unwrap();

    for allocation in &records {
        let inside = table
            .entries()
            .iter()
            .find(|entry| entry.start().base() == allocation.range().start())
            .unwrap();
        assert_eq!(inside.usage(), allocation.usage());
        assert_eq!(inside.pages(), 1);
        // The entry carries the enclosing region's attributes.
        assert_eq!(inside.attributes(), capabilities_to_attributes(caps()));
    }
}

#[test]
fn coverage_has_no_gaps_and_no_overlaps() {
    let regions = [
        system(0x1000, 0x5000),
        system(0x6000, 0x2000),
        reserved(0x8000, 0x2000),
        system(0x20000, 0x10000),
    ];
    let records = [
        record(0x2000, 0x1000, MemoryUsage::LoaderCode),
        record(0x6000, 0x1000, MemoryUsage::BootServicesData),
        record(0x24000, 0x4000, MemoryUsage::RuntimeServicesCode),
    ];
    let table = build(&regions, &records).unwrap();

    let total_region_pages: u64 = regions.iter().map(|r| r.range().page_count::<Size4K>()).sum();
    assert_eq!(table.total_pages(), total_region_pages);

    // Entries ascend without overlapping, and adjacent contiguous entries
    // never share identical (usage, attributes) — coalescing left nothing
    // behind.
    for pair in table.entries().windows(2) {
        let end = pair[0].end().unwrap();
        assert!(end.as_u64() <= pair[1].start().base().as_u64());
        if end == pair[1].start().base() {
            assert!(
                (pair[0].usage(), pair[0].attributes())
                    != (pair[1].usage(), pair[1].attributes())
            );
        }
    }
}

#[test]
fn builds_are_deterministic() {
    let regions = [
        system(0x1000, 0x5000),
        reserved(0x8000, 0x2000),
        system(0x20000, 0x10000),
    ];
    let records = [
        record(0x2000, 0x1000, MemoryUsage::LoaderCode),
        record(0x24000, 0x4000, MemoryUsage::RuntimeServicesCode),
    ];
    let first = build(&regions, &records).unwrap();
    let second = build(&regions, &records).unwrap();
    assert_eq!(first, second);
}

#[test]
fn round_trip_reproduces_the_catalogs() {
    let regions = [system(0x1000, 0x5000), reserved(0x10000, 0x2000)];
    let records = [record(0x2000, 0x1000, MemoryUsage::LoaderCode)];

    let table = build(&regions, &records).unwrap();
    let (rebuilt_regions, rebuilt_records) = materialize_from_memory_map(&table).unwrap();

    assert_eq!(rebuilt_regions, regions);
    assert_eq!(rebuilt_records, records);

    // And the rebuilt catalogs consolidate to the identical table.
    let again = build(&rebuilt_regions, &rebuilt_records).unwrap();
    assert_eq!(again, table);
}

#[test]
fn round_trip_modulo_the_metadata_record() {
    let regions = [system(0x1000, 0x10000)];
    let records = [record(0x2000, 0x1000, MemoryUsage::LoaderData)];
    let metadata = range(0x8000, 0x2000);

    let snapshot = CatalogSnapshot::new(&regions[..], &records[..]).with_metadata_area(metadata);
    let table = build_memory_map::<Size4K, _, _>(&snapshot).unwrap();

    let (rebuilt_regions, rebuilt_records) = materialize_from_memory_map(&table).unwrap();
    assert_eq!(rebuilt_regions, regions);
    // The synthetic record comes back as a regular boot-services-data
    // allocation; net of it, the catalogs match.
    assert_eq!(
        rebuilt_records,
        [
            records[0],
            AllocationRecord::new(metadata, MemoryUsage::BootServicesData),
        ]
    );
}

#[test]
fn non_memory_regions_are_filtered_out() {
    let regions = [
        system(0x1000, 0x2000),
        RegionDescriptor::new(range(0xF000_0000, 0x10000), ResourceKind::MemoryMappedIo, caps()),
        RegionDescriptor::new(range(0xE000_0000, 0x1000), ResourceKind::Unknown(9), caps()),
    ];
    // A record claimed by a filtered region is resolved but not mapped.
    let records = [record(0xF000_1000, 0x1000, MemoryUsage::Mmio)];

    let table = build(&regions, &records).unwrap();
    assert_eq!(table.len(), 1);
    assert_eq!(
        entry_tuple(&table.entries()[0]),
        (0x1000, 2, MemoryUsage::Conventional)
    );
}

#[test]
fn unknown_usage_kinds_pass_through() {
    let table = build(
        &[system(0x1000, 0x3000)],
        &[record(0x2000, 0x1000, MemoryUsage::Unknown(0x7F))],
    )
    .unwrap();
    assert!(
        table
            .entries()
            .iter()
            .any(|entry| entry.usage() == MemoryUsage::Unknown(0x7F))
    );
}

#[test]
fn zero_length_records_are_absent() {
    let with_degenerate = build(
        &[system(0x1000, 0x4000)],
        &[record(0x2000, 0, MemoryUsage::BootServicesData)],
    )
    .unwrap();
    let without = build(&[system(0x1000, 0x4000)], &[]).unwrap();
    assert_eq!(with_degenerate, without);
}

#[test]
fn empty_catalogs_build_an_empty_table() {
    let table = build(&[], &[]).unwrap();
    assert!(table.is_empty());
}

#[test]
fn unaligned_region_base_is_rejected() {
    let result = build(&[system(0x1200, 0x3000)], &[]);
    assert_eq!(
        result.unwrap_err(),
        MemoryMapError::UnalignedRange {
            start: 0x1200,
            length: 0x3000
        }
    );
}

#[test]
fn unaligned_region_length_is_rejected() {
    let result = build(&[system(0x1000, 0x3300)], &[]);
    assert_eq!(
        result.unwrap_err(),
        MemoryMapError::UnalignedRange {
            start: 0x1000,
            length: 0x3300
        }
    );
}

#[test]
fn unaligned_record_is_rejected() {
    let result = build(
        &[system(0x1000, 0x4000)],
        &[record(0x2100, 0x1000, MemoryUsage::BootServicesData)],
    );
    assert_eq!(
        result.unwrap_err(),
        MemoryMapError::UnalignedRange {
            start: 0x2100,
            length: 0x1000
        }
    );
}

#[test]
fn zero_length_region_is_rejected() {
    let result = build(&[system(0x1000, 0)], &[]);
    assert_eq!(result.unwrap_err(), MemoryMapError::EmptyRegion { start: 0x1000 });
}

#[test]
fn overlapping_regions_are_rejected() {
    let result = build(&[system(0x1000, 0x4000), system(0x3000, 0x4000)], &[]);
    assert_eq!(
        result.unwrap_err(),
        MemoryMapError::OverlappingRegions {
            first: 0x1000,
            second: 0x3000
        }
    );
}

#[test]
fn record_outside_every_region_is_rejected() {
    let result = build(
        &[system(0x1000, 0x4000)],
        &[record(0x100000, 0x1000, MemoryUsage::BootServicesData)],
    );
    assert_eq!(
        result.unwrap_err(),
        MemoryMapError::UnresolvedAllocation { start: 0x100000 }
    );
}

#[test]
fn record_straddling_a_region_boundary_is_rejected() {
    // Fully inside the union of both regions, but inside neither alone.
    let result = build(
        &[system(0x1000, 0x2000), system(0x3000, 0x2000)],
        &[record(0x2000, 0x2000, MemoryUsage::BootServicesData)],
    );
    assert_eq!(
        result.unwrap_err(),
        MemoryMapError::UnresolvedAllocation { start: 0x2000 }
    );
}

#[derive(Default)]
struct StoredMap {
    table: Option<MemoryMapTable<Size4K>>,
}

impl MemoryMapSink<Size4K> for StoredMap {
    fn publish(&mut self, table: MemoryMapTable<Size4K>) {
        self.table = Some(table);
    }
}

#[test]
fn publishing_hands_the_table_to_the_sink() {
    let regions = [system(0x1000, 0x4000)];
    let records = [record(0x2000, 0x1000, MemoryUsage::BootServicesData)];
    let snapshot = CatalogSnapshot::new(&regions[..], &records[..]);

    let mut sink = StoredMap::default();
    build_and_publish(&snapshot, &mut sink).unwrap();

    let table = sink.table.expect("table was published");
    assert_eq!(table.len(), 3);

    // Nothing is published when the input is malformed.
    let bad_regions = [system(0x1200, 0x3000)];
    let bad = CatalogSnapshot::new(&bad_regions[..], &records[..]);
    let mut sink = StoredMap::default();
    assert!(build_and_publish(&bad, &mut sink).is_err());
    assert!(sink.table.is_none());
}
