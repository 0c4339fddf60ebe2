use bitfield_struct::bitfield;

/// Capability mask of a region descriptor.
///
/// Bit positions follow the resource-attribute encoding used by platform
/// memory discovery. "Protected" bits describe the region's current state,
/// "protectable" bits describe what the hardware could be configured to do;
/// only the latter participate in attribute translation (see
/// [`crate::capabilities_to_attributes`]).
#[bitfield(u64)]
#[derive(PartialEq, Eq, Hash)]
pub struct RegionCapabilities {
    /// Memory is physically present (bit 0).
    pub present: bool,
    /// Memory has been initialized (bit 1).
    pub initialized: bool,
    /// Memory has passed testing (bit 2).
    pub tested: bool,
    /// Single-bit ECC (bit 3).
    pub single_bit_ecc: bool,
    /// Multiple-bit ECC (bit 4).
    pub multiple_bit_ecc: bool,
    /// ECC reserved encoding 1 (bit 5).
    pub ecc_reserved_1: bool,
    /// ECC reserved encoding 2 (bit 6).
    pub ecc_reserved_2: bool,
    /// Reads are currently blocked (bit 7).
    pub read_protected: bool,
    /// Writes are currently blocked (bit 8).
    pub write_protected: bool,
    /// Execution is currently blocked (bit 9).
    pub execution_protected: bool,
    /// Supports uncacheable access (bit 10).
    pub uncacheable: bool,
    /// Supports write-combining access (bit 11).
    pub write_combineable: bool,
    /// Supports write-through caching (bit 12).
    pub write_through_cacheable: bool,
    /// Supports write-back caching (bit 13).
    pub write_back_cacheable: bool,
    /// 16-bit I/O decode (bit 14).
    pub io_16_bit: bool,
    /// 32-bit I/O decode (bit 15).
    pub io_32_bit: bool,
    /// 64-bit I/O decode (bit 16).
    pub io_64_bit: bool,
    /// Supports exported uncached access (bit 17).
    pub uncached_exported: bool,
    /// Currently read-only (bit 18).
    pub read_only_protected: bool,
    /// Can be made read-only (bit 19).
    pub read_only_protectable: bool,
    /// Can be read-protected (bit 20).
    pub read_protectable: bool,
    /// Can be write-protected (bit 21).
    pub write_protectable: bool,
    /// Can be execution-protected (bit 22).
    pub execution_protectable: bool,
    /// Currently persistent (bit 23).
    pub persistent: bool,
    /// Can be made persistent (bit 24).
    pub persistable: bool,
    /// Higher-reliability memory (bit 25).
    pub more_reliable: bool,
    #[bits(38)]
    _reserved: u64,
}

/// Attribute mask of a memory map entry.
///
/// Bit positions follow the memory-descriptor attribute encoding handed to
/// the later-stage consumer: cacheability in the low bits, protection
/// capabilities in bits 12–19, and the present/initialized/tested triple in
/// bits 56–58.
#[bitfield(u64)]
#[derive(PartialEq, Eq, Hash)]
pub struct MemoryAttributes {
    /// Uncacheable (bit 0).
    pub uncacheable: bool,
    /// Write-combining (bit 1).
    pub write_combining: bool,
    /// Write-through (bit 2).
    pub write_through: bool,
    /// Write-back (bit 3).
    pub write_back: bool,
    /// Uncacheable, exported, "fetch and add" capable (bit 4).
    pub uncacheable_exported: bool,
    #[bits(7)]
    _reserved_low: u8,
    /// Write-protectable (bit 12).
    pub write_protect: bool,
    /// Read-protectable (bit 13).
    pub read_protect: bool,
    /// Execution-protectable (bit 14).
    pub execute_protect: bool,
    /// Non-volatile (bit 15).
    pub non_volatile: bool,
    /// Higher-reliability memory (bit 16).
    pub more_reliable: bool,
    /// Read-only-protectable (bit 17).
    pub read_only: bool,
    /// Specific-purpose memory (bit 18).
    pub specific_purpose: bool,
    /// Protectable with CPU crypto (bit 19).
    pub cpu_crypto: bool,
    #[bits(36)]
    _reserved_mid: u64,
    /// Memory is physically present (bit 56).
    pub present: bool,
    /// Memory has been initialized (bit 57).
    pub initialized: bool,
    /// Memory has passed testing (bit 58).
    pub tested: bool,
    #[bits(4)]
    _reserved_high: u8,
    /// Needs a runtime virtual mapping (bit 63).
    pub runtime: bool,
}
