use crate::RegionCapabilities;
use num_enum::{FromPrimitive, IntoPrimitive};
use payload_memory_addresses::PhysicalRange;

/// Coarse resource type of a region descriptor, as reported by platform
/// memory discovery.
///
/// Raw values outside the known set are preserved verbatim in
/// [`ResourceKind::Unknown`]; consolidation does not need to interpret new
/// kinds, only to carry them through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum ResourceKind {
    SystemMemory = 0,
    MemoryMappedIo = 1,
    Io = 2,
    FirmwareDevice = 3,
    MemoryMappedIoPort = 4,
    Reserved = 5,
    IoReserved = 6,
    #[num_enum(catch_all)]
    Unknown(u32),
}

impl ResourceKind {
    /// Whether regions of this kind are consolidated into the memory map.
    ///
    /// Only system memory and reserved memory describe address space the
    /// later-stage consumer owns; every other kind is left to its dedicated
    /// driver and filtered out before the merge.
    #[inline]
    #[must_use]
    pub const fn is_consolidated(self) -> bool {
        matches!(self, Self::SystemMemory | Self::Reserved)
    }
}

/// A contiguous physical range with a resource kind and capability mask.
///
/// Produced once by upstream discovery and read-only to the consolidation
/// core. Regions in a catalog must not overlap each other; the assembler
/// verifies this before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegionDescriptor {
    range: PhysicalRange,
    kind: ResourceKind,
    capabilities: RegionCapabilities,
}

impl RegionDescriptor {
    #[inline]
    #[must_use]
    pub const fn new(
        range: PhysicalRange,
        kind: ResourceKind,
        capabilities: RegionCapabilities,
    ) -> Self {
        Self {
            range,
            kind,
            capabilities,
        }
    }

    #[inline]
    #[must_use]
    pub const fn range(&self) -> PhysicalRange {
        self.range
    }

    #[inline]
    #[must_use]
    pub const fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[inline]
    #[must_use]
    pub const fn capabilities(&self) -> RegionCapabilities {
        self.capabilities
    }

    /// Grow the region by `extra` bytes; used when re-deriving regions from
    /// a memory map table. Returns `false` if the result would overflow.
    #[inline]
    pub(crate) fn grow(&mut self, extra: u64) -> bool {
        match self.range.extended(extra) {
            Some(range) => {
                self.range = range;
                true
            }
            None => false,
        }
    }
}
