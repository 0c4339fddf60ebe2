//! # Physical Memory Address Types
//!
//! Strongly typed wrappers for physical addresses, page bases, and
//! page-granular address ranges used by boot-stage memory map code.
//!
//! ## Overview
//!
//! The crate builds everything from a handful of principal types:
//!
//! | Type | Description |
//! |------|-------------|
//! | [`PhysicalAddress`] | A raw 64-bit physical address. |
//! | [`PhysicalPage<S>`] | The page-aligned base of a physical page of size `S`. |
//! | [`PhysicalRange`] | A half-open byte range `[start, start + length)`. |
//!
//! Page sizes are marker types implementing [`PageSize`]; [`Size4K`] is the
//! base granularity, [`Size2M`] exists for platforms that hand out large
//! pages. Code that must not hard-code a page size takes `S: PageSize` and
//! uses [`PageSize::SIZE`] / [`PageSize::SHIFT`].
//!
//! ## Typical Usage
//!
//! ```rust
//! # use payload_memory_addresses::*;
//! let pa = PhysicalAddress::new(0x0000_0010_2000_0042);
//!
//! // Derive the containing 4 KiB page.
//! let page = PhysicalPage::<Size4K>::containing(pa);
//! assert_eq!(page.base().as_u64(), 0x0000_0010_2000_0000);
//!
//! // Ranges carry the no-overflow invariant at construction time.
//! let range = PhysicalRange::new(PhysicalAddress::new(0x1000), 0x4000).unwrap();
//! assert_eq!(range.end().as_u64(), 0x5000);
//! assert_eq!(range.page_count::<Size4K>(), 4);
//! ```
//!
//! ## Design Notes
//!
//! - All types are `#[repr(transparent)]` over `u64` (or zero-sized markers),
//!   `Copy`, `Eq`, `Ord`, and `Hash`.
//! - A [`PhysicalRange`] whose end would overflow the address space cannot be
//!   constructed; a zero-length range is representable but degenerate and
//!   reports [`PhysicalRange::is_empty`].
//! - Alignment and page math are `const fn` where the language allows it.

#![cfg_attr(not(any(test, doctest)), no_std)]

mod page_size;
mod physical_address;
mod physical_page;
mod physical_range;

pub use page_size::{PageSize, Size2M, Size4K};
pub use physical_address::PhysicalAddress;
pub use physical_page::PhysicalPage;
pub use physical_range::PhysicalRange;
