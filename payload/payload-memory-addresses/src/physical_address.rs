use crate::{PageSize, PhysicalPage};
use core::fmt;
use core::ops::{Add, AddAssign};

/// Physical memory address.
///
/// A thin wrapper around `u64` that denotes **physical** addresses (host RAM
/// or MMIO). The type carries intent and prevents accidentally treating a page
/// count or byte length as an address.
///
/// ### Semantics
/// - Use [`PhysicalAddress::page`] to derive the containing page base for a
///   concrete [`PageSize`].
/// - Arithmetic that can wrap goes through [`PhysicalAddress::checked_add`];
///   the plain `+` operator is reserved for offsets the caller already knows
///   to be in range.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct PhysicalAddress(u64);

impl PhysicalAddress {
    #[inline]
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0)
    }

    #[inline]
    #[must_use]
    pub const fn new(v: u64) -> Self {
        Self(v)
    }

    #[inline]
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Add a byte offset, or `None` if the result leaves the address space.
    #[inline]
    #[must_use]
    pub const fn checked_add(self, offset: u64) -> Option<Self> {
        match self.0.checked_add(offset) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Whether this address sits on an `S` page boundary.
    #[inline]
    #[must_use]
    pub fn is_aligned<S: PageSize>(self) -> bool {
        S::is_aligned(self.0)
    }

    /// Round down to the containing `S` page boundary.
    #[inline]
    #[must_use]
    pub fn align_down<S: PageSize>(self) -> Self {
        Self(S::align_down(self.0))
    }

    /// The page containing this address.
    #[inline]
    #[must_use]
    pub fn page<S: PageSize>(self) -> PhysicalPage<S> {
        PhysicalPage::containing(self)
    }
}

impl fmt::Debug for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PA(0x{:016X})", self.as_u64())
    }
}

impl fmt::Display for PhysicalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.as_u64())
    }
}

impl From<u64> for PhysicalAddress {
    #[inline]
    fn from(v: u64) -> Self {
        Self::new(v)
    }
}

impl Add<u64> for PhysicalAddress {
    type Output = Self;
    #[inline]
    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0 + rhs)
    }
}

impl AddAssign<u64> for PhysicalAddress {
    #[inline]
    fn add_assign(&mut self, rhs: u64) {
        self.0 += rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size4K;

    #[test]
    fn checked_add_detects_overflow() {
        let a = PhysicalAddress::new(u64::MAX - 0xFFF);
        assert_eq!(a.checked_add(0xFFF), Some(PhysicalAddress::new(u64::MAX)));
        assert_eq!(a.checked_add(0x1000), None);
    }

    #[test]
    fn page_derivation() {
        let a = PhysicalAddress::new(0x12345);
        assert_eq!(a.align_down::<Size4K>().as_u64(), 0x12000);
        assert_eq!(a.page::<Size4K>().base().as_u64(), 0x12000);
        assert!(!a.is_aligned::<Size4K>());
        assert!(a.align_down::<Size4K>().is_aligned::<Size4K>());
    }
}
