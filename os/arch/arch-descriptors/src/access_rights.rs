//! # Access rights as returned by `lar`
//!
//! `lar r32, sel` copies the second doubleword of the descriptor masked with
//! `0x00FxFF00`: the type/S/DPL/P byte in bits 8–15 and the flag nibble in
//! bits 20–23. Bits 16–19 (limit[19:16]) are undefined.
//!
//! ```text
//!  31    24 23 22 21 20 19  16 15 14 13 12 11   8 7      0
//! +--------+--+--+--+--+------+--+-----+--+------+--------+
//! |  0     |G |DB|L |AV| ???? |P | DPL |S | TYPE |   0    |
//! +--------+--+--+--+--+------+--+-----+--+------+--------+
//! ```
//!
//! The 4-bit type field means different things for system descriptors (S=0)
//! and code/data descriptors (S=1); both interpretations are total enums.

use arch_registers::Ring;
use bitfield_struct::bitfield;

#[bitfield(u32)]
#[derive(Eq, PartialEq, Hash)]
pub struct AccessRights {
    #[bits(8)]
    _rsvd_0_7: u8,
    /// Descriptor type (bits 8..11), interpreted according to `s`.
    #[bits(4)]
    pub typ: u8,
    /// Descriptor class (bit 12): 0 = system, 1 = code/data.
    pub s: bool,
    /// Descriptor privilege level (bits 13..14).
    #[bits(2)]
    pub dpl: Ring,
    /// Present (bit 15).
    pub p: bool,
    #[bits(4)]
    _limit_19_16: u8,
    /// Available for system software (bit 20). Reported, never interpreted.
    pub avl: bool,
    /// 64-bit code segment (bit 21).
    pub l: bool,
    /// Default operation size (bit 22): 0 = 16-bit, 1 = 32-bit.
    pub db: bool,
    /// Granularity (bit 23): 0 = byte, 1 = 4 KiB page.
    pub g: bool,
    #[bits(8)]
    _rsvd_24_31: u8,
}

impl AccessRights {
    /// The type field, interpreted according to the S flag.
    #[must_use]
    pub const fn kind(self) -> DescriptorKind {
        if self.s() {
            DescriptorKind::CodeData(CodeDataType::from_bits(self.typ()))
        } else {
            DescriptorKind::System(SystemType::from_bits(self.typ()))
        }
    }

    #[must_use]
    pub const fn granularity(self) -> Granularity {
        if self.g() { Granularity::Page } else { Granularity::Byte }
    }

    /// Operand width of a code segment, `None` for data and system descriptors.
    #[must_use]
    pub const fn code_width(self) -> Option<CodeWidth> {
        match self.kind() {
            DescriptorKind::CodeData(t) if t.is_code() => Some(if self.l() {
                CodeWidth::Bits64
            } else if self.db() {
                CodeWidth::Bits32
            } else {
                CodeWidth::Bits16
            }),
            _ => None,
        }
    }
}

/// A descriptor type field together with the class that gives it meaning.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum DescriptorKind {
    System(SystemType),
    CodeData(CodeDataType),
}

impl DescriptorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System(t) => t.as_str(),
            Self::CodeData(t) => t.as_str(),
        }
    }
}

/// System descriptor types (S = 0), legacy/compatibility-mode encoding.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum SystemType {
    Reserved0 = 0x0,
    AvailableTss16 = 0x1,
    Ldt = 0x2,
    BusyTss16 = 0x3,
    CallGate16 = 0x4,
    TaskGate = 0x5,
    InterruptGate16 = 0x6,
    TrapGate16 = 0x7,
    Reserved8 = 0x8,
    AvailableTss32 = 0x9,
    ReservedA = 0xA,
    BusyTss32 = 0xB,
    CallGate32 = 0xC,
    ReservedD = 0xD,
    InterruptGate32 = 0xE,
    TrapGate32 = 0xF,
}

impl SystemType {
    /// Decode the low four bits.
    #[must_use]
    pub const fn from_bits(v: u8) -> Self {
        match v & 0xF {
            0x0 => Self::Reserved0,
            0x1 => Self::AvailableTss16,
            0x2 => Self::Ldt,
            0x3 => Self::BusyTss16,
            0x4 => Self::CallGate16,
            0x5 => Self::TaskGate,
            0x6 => Self::InterruptGate16,
            0x7 => Self::TrapGate16,
            0x8 => Self::Reserved8,
            0x9 => Self::AvailableTss32,
            0xA => Self::ReservedA,
            0xB => Self::BusyTss32,
            0xC => Self::CallGate32,
            0xD => Self::ReservedD,
            0xE => Self::InterruptGate32,
            _ => Self::TrapGate32,
        }
    }

    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reserved0 => "Reserved-0",
            Self::AvailableTss16 => "Available 16-bit TSS",
            Self::Ldt => "LDT",
            Self::BusyTss16 => "Busy 16-bit TSS",
            Self::CallGate16 => "16-bit call gate",
            Self::TaskGate => "16-bit/32-bit task gate",
            Self::InterruptGate16 => "16-bit interrupt gate",
            Self::TrapGate16 => "16-bit trap gate",
            Self::Reserved8 => "Reserved-8",
            Self::AvailableTss32 => "Available 32-bit TSS",
            Self::ReservedA => "Reserved-A",
            Self::BusyTss32 => "Busy 32-bit TSS",
            Self::CallGate32 => "32-bit call gate",
            Self::ReservedD => "Reserved-D",
            Self::InterruptGate32 => "32-bit interrupt gate",
            Self::TrapGate32 => "32-bit trap gate",
        }
    }
}

/// Code/data descriptor types (S = 1).
///
/// Bit 3 selects code, bit 2 is expand-down (data) or conforming (code),
/// bit 1 is writable (data) or readable (code), bit 0 is accessed.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
#[repr(u8)]
pub enum CodeDataType {
    ReadOnly = 0x0,
    ReadOnlyAccessed = 0x1,
    ReadWrite = 0x2,
    ReadWriteAccessed = 0x3,
    ReadOnlyExpandDown = 0x4,
    ReadOnlyExpandDownAccessed = 0x5,
    ReadWriteExpandDown = 0x6,
    ReadWriteExpandDownAccessed = 0x7,
    ExecOnly = 0x8,
    ExecOnlyAccessed = 0x9,
    ExecRead = 0xA,
    ExecReadAccessed = 0xB,
    ExecOnlyConforming = 0xC,
    ExecOnlyConformingAccessed = 0xD,
    ExecReadConforming = 0xE,
    ExecReadConformingAccessed = 0xF,
}

impl CodeDataType {
    /// Decode the low four bits.
    #[must_use]
    pub const fn from_bits(v: u8) -> Self {
        match v & 0xF {
            0x0 => Self::ReadOnly,
            0x1 => Self::ReadOnlyAccessed,
            0x2 => Self::ReadWrite,
            0x3 => Self::ReadWriteAccessed,
            0x4 => Self::ReadOnlyExpandDown,
            0x5 => Self::ReadOnlyExpandDownAccessed,
            0x6 => Self::ReadWriteExpandDown,
            0x7 => Self::ReadWriteExpandDownAccessed,
            0x8 => Self::ExecOnly,
            0x9 => Self::ExecOnlyAccessed,
            0xA => Self::ExecRead,
            0xB => Self::ExecReadAccessed,
            0xC => Self::ExecOnlyConforming,
            0xD => Self::ExecOnlyConformingAccessed,
            0xE => Self::ExecReadConforming,
            _ => Self::ExecReadConformingAccessed,
        }
    }

    #[must_use]
    pub const fn into_bits(self) -> u8 {
        self as u8
    }

    /// Code types occupy the upper half of the table.
    #[must_use]
    pub const fn is_code(self) -> bool {
        self.into_bits() >= 0x8
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::ReadOnlyAccessed => "read-only,accessed",
            Self::ReadWrite => "read/write",
            Self::ReadWriteAccessed => "read/write,accessed",
            Self::ReadOnlyExpandDown => "read-only,expand-down",
            Self::ReadOnlyExpandDownAccessed => "read-only,expand-down,accessed",
            Self::ReadWriteExpandDown => "read/write,expand-down",
            Self::ReadWriteExpandDownAccessed => "read/write,expand-down,accessed",
            Self::ExecOnly => "exec-only",
            Self::ExecOnlyAccessed => "exec-only,accessed",
            Self::ExecRead => "exec/read",
            Self::ExecReadAccessed => "exec/read,accessed",
            Self::ExecOnlyConforming => "exec-only,conforming",
            Self::ExecOnlyConformingAccessed => "exec-only,conforming,accessed",
            Self::ExecReadConforming => "exec/read,conforming",
            Self::ExecReadConformingAccessed => "exec/read,conforming,accessed",
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Granularity {
    Byte,
    Page,
}

impl Granularity {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Byte => "byte",
            Self::Page => "page",
        }
    }
}

/// Default operand width of a code segment.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CodeWidth {
    Bits16,
    Bits32,
    Bits64,
}

impl CodeWidth {
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::Bits16 => 16,
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }
}
