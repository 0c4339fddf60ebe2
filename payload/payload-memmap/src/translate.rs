//! Bidirectional translation between the two parallel bit-encodings of
//! cacheability and protection properties, and between region resource kinds
//! and memory usage kinds.

use crate::{MemoryAttributes, MemoryUsage, RegionCapabilities, ResourceKind};

/// Fixed ordered table of `(attribute bit, capability bit)` pairs.
///
/// Translation in either direction is an OR-reduction over this table; bits
/// with no pair here are silently dropped. Because every bit appears in at
/// most one pair, translation restricted to the table's bit positions is a
/// bijection.
const ATTRIBUTE_CONVERSION_TABLE: [(u64, u64); 14] = [
    (
        MemoryAttributes::new().with_uncacheable(true).into_bits(),
        RegionCapabilities::new().with_uncacheable(true).into_bits(),
    ),
    (
        MemoryAttributes::new()
            .with_uncacheable_exported(true)
            .into_bits(),
        RegionCapabilities::new()
            .with_uncached_exported(true)
            .into_bits(),
    ),
    (
        MemoryAttributes::new().with_write_combining(true).into_bits(),
        RegionCapabilities::new()
            .with_write_combineable(true)
            .into_bits(),
    ),
    (
        MemoryAttributes::new().with_write_through(true).into_bits(),
        RegionCapabilities::new()
            .with_write_through_cacheable(true)
            .into_bits(),
    ),
    (
        MemoryAttributes::new().with_write_back(true).into_bits(),
        RegionCapabilities::new()
            .with_write_back_cacheable(true)
            .into_bits(),
    ),
    (
        MemoryAttributes::new().with_read_protect(true).into_bits(),
        RegionCapabilities::new()
            .with_read_protectable(true)
            .into_bits(),
    ),
    (
        MemoryAttributes::new().with_write_protect(true).into_bits(),
        RegionCapabilities::new()
            .with_write_protectable(true)
            .into_bits(),
    ),
    (
        MemoryAttributes::new().with_execute_protect(true).into_bits(),
        RegionCapabilities::new()
            .with_execution_protectable(true)
            .into_bits(),
    ),
    (
        MemoryAttributes::new().with_read_only(true).into_bits(),
        RegionCapabilities::new()
            .with_read_only_protectable(true)
            .into_bits(),
    ),
    (
        MemoryAttributes::new().with_present(true).into_bits(),
        RegionCapabilities::new().with_present(true).into_bits(),
    ),
    (
        MemoryAttributes::new().with_initialized(true).into_bits(),
        RegionCapabilities::new().with_initialized(true).into_bits(),
    ),
    (
        MemoryAttributes::new().with_tested(true).into_bits(),
        RegionCapabilities::new().with_tested(true).into_bits(),
    ),
    (
        MemoryAttributes::new().with_non_volatile(true).into_bits(),
        RegionCapabilities::new().with_persistable(true).into_bits(),
    ),
    (
        MemoryAttributes::new().with_more_reliable(true).into_bits(),
        RegionCapabilities::new().with_more_reliable(true).into_bits(),
    ),
];

/// Translate a region's capability mask into a memory map attribute mask.
///
/// Capability bits without a table pair are dropped.
#[must_use]
pub fn capabilities_to_attributes(capabilities: RegionCapabilities) -> MemoryAttributes {
    let source = capabilities.into_bits();
    let mut result = 0;
    for (attribute, capability) in ATTRIBUTE_CONVERSION_TABLE {
        if source & capability != 0 {
            result |= attribute;
        }
    }
    MemoryAttributes::from_bits(result)
}

/// Translate a memory map attribute mask back into a capability mask.
///
/// Attribute bits without a table pair are dropped.
#[must_use]
pub fn attributes_to_capabilities(attributes: MemoryAttributes) -> RegionCapabilities {
    let source = attributes.into_bits();
    let mut result = 0;
    for (attribute, capability) in ATTRIBUTE_CONVERSION_TABLE {
        if source & attribute != 0 {
            result |= capability;
        }
    }
    RegionCapabilities::from_bits(result)
}

/// The usage kind describing bytes a region claims by default.
///
/// Kinds the consolidation core does not accept map to the
/// [`MemoryUsage::SENTINEL`]; they never reach the merge because the
/// assembler filters such regions out first.
#[must_use]
pub const fn resource_kind_to_usage(kind: ResourceKind) -> MemoryUsage {
    match kind {
        ResourceKind::SystemMemory => MemoryUsage::Conventional,
        ResourceKind::MemoryMappedIo | ResourceKind::FirmwareDevice => MemoryUsage::Mmio,
        ResourceKind::MemoryMappedIoPort | ResourceKind::Reserved => MemoryUsage::Reserved,
        _ => MemoryUsage::SENTINEL,
    }
}

/// The region resource kind a memory map entry's usage re-derives.
///
/// Conventional and reserved entries name their region kind directly; every
/// other usage marks an allocation carved out of system memory.
#[must_use]
pub const fn usage_to_resource_kind(usage: MemoryUsage) -> ResourceKind {
    match usage {
        MemoryUsage::Conventional => ResourceKind::SystemMemory,
        MemoryUsage::Reserved => ResourceKind::Reserved,
        _ => ResourceKind::SystemMemory,
    }
}
