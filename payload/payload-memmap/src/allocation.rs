use core::fmt;
use num_enum::{FromPrimitive, IntoPrimitive};
use payload_memory_addresses::PhysicalRange;

/// Usage type of an allocation record and of a memory map entry.
///
/// Numbering follows the memory-type encoding the later-stage consumer
/// expects. Values outside the known set are preserved verbatim in
/// [`MemoryUsage::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum MemoryUsage {
    Reserved = 0,
    LoaderCode = 1,
    LoaderData = 2,
    BootServicesCode = 3,
    BootServicesData = 4,
    RuntimeServicesCode = 5,
    RuntimeServicesData = 6,
    Conventional = 7,
    Unusable = 8,
    AcpiReclaim = 9,
    AcpiNvs = 10,
    Mmio = 11,
    MmioPortSpace = 12,
    PalCode = 13,
    Persistent = 14,
    #[num_enum(catch_all)]
    Unknown(u32),
}

impl MemoryUsage {
    /// The "no meaningful usage" sentinel (one past the last known kind).
    pub const SENTINEL: Self = Self::Unknown(15);

    /// Whether entries of this usage re-derive an allocation record in the
    /// reverse transform. Conventional and reserved memory are region
    /// default fill, everything else marks a claimed sub-range.
    #[inline]
    #[must_use]
    pub const fn is_allocation(self) -> bool {
        !matches!(self, Self::Conventional | Self::Reserved)
    }
}

impl fmt::Display for MemoryUsage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reserved => f.write_str("reserved"),
            Self::LoaderCode => f.write_str("loader-code"),
            Self::LoaderData => f.write_str("loader-data"),
            Self::BootServicesCode => f.write_str("boot-services-code"),
            Self::BootServicesData => f.write_str("boot-services-data"),
            Self::RuntimeServicesCode => f.write_str("runtime-services-code"),
            Self::RuntimeServicesData => f.write_str("runtime-services-data"),
            Self::Conventional => f.write_str("conventional"),
            Self::Unusable => f.write_str("unusable"),
            Self::AcpiReclaim => f.write_str("acpi-reclaim"),
            Self::AcpiNvs => f.write_str("acpi-nvs"),
            Self::Mmio => f.write_str("mmio"),
            Self::MmioPortSpace => f.write_str("mmio-port-space"),
            Self::PalCode => f.write_str("pal-code"),
            Self::Persistent => f.write_str("persistent"),
            Self::Unknown(v) => write!(f, "unknown({v:#x})"),
        }
    }
}

/// A sub-range within a region already claimed for a specific purpose.
///
/// Produced by upstream discovery (plus one synthetic record describing the
/// catalog metadata area itself, see
/// [`CatalogSnapshot::with_metadata_area`](crate::CatalogSnapshot::with_metadata_area)).
/// Read-only to the consolidation core. Each record is expected to lie fully
/// inside exactly one region; zero-length records are degenerate and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AllocationRecord {
    range: PhysicalRange,
    usage: MemoryUsage,
}

impl AllocationRecord {
    #[inline]
    #[must_use]
    pub const fn new(range: PhysicalRange, usage: MemoryUsage) -> Self {
        Self { range, usage }
    }

    #[inline]
    #[must_use]
    pub const fn range(&self) -> PhysicalRange {
        self.range
    }

    #[inline]
    #[must_use]
    pub const fn usage(&self) -> MemoryUsage {
        self.usage
    }
}
