//! # Segment selectors
//!
//! A selector is the 16-bit value loaded into a segment register (or `tr` and
//! `ldtr`). It encodes:
//!
//! ```text
//!  15            3 2  1  0
//! +----------------+--+----+
//! |   Index[12:0]  |TI| RPL|
//! +----------------+--+----+  (TI=0 → GDT, TI=1 → LDT; RPL=0..3)
//! ```
//!
//! Descriptor probes accept any raw 16-bit value, so [`Selector`] never
//! rejects a bit pattern; it only offers typed views of the three fields.

use crate::privilege::Ring;
use bitfield_struct::bitfield;
use core::fmt;

/// Which descriptor table a selector addresses.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum Table {
    /// Global Descriptor Table
    Gdt = 0,
    /// Local Descriptor Table
    Ldt = 1,
}

impl Table {
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        if bits == 0 { Self::Gdt } else { Self::Ldt }
    }

    #[inline]
    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }
}

/// Raw 16-bit selector (index/TI/RPL).
#[bitfield(u16)]
#[derive(Eq, PartialEq, Hash)]
pub struct Selector {
    /// Requested Privilege Level (bits 0..1).
    #[bits(2)]
    pub rpl: Ring,
    /// Table Indicator (bit 2).
    #[bits(1)]
    pub ti: Table,
    /// Descriptor index (bits 3..15).
    #[bits(13)]
    pub index: u16,
}

impl Selector {
    /// Build a selector from its fields.
    #[inline]
    #[must_use]
    pub const fn new_with(index: u16, table: Table, rpl: Ring) -> Self {
        Self::new().with_index(index).with_ti(table).with_rpl(rpl)
    }

    /// Reinterpret a raw value.
    #[inline]
    #[must_use]
    pub const fn from_u16(raw: u16) -> Self {
        Self::from_bits(raw)
    }

    #[inline]
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        self.into_bits()
    }
}

impl fmt::LowerHex for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.into_bits(), f)
    }
}
