use crate::{LoadRegister, StoreRegister};
use bitfield_struct::bitfield;

/// The flags register (`RFLAGS`) as observed from user mode.
///
/// Only the architecturally defined low 22 bits are named; everything above
/// bit 21 is carried through unchanged so that a read/modify/write cycle
/// restores the register bit for bit.
#[bitfield(u64, order = Lsb)]
#[derive(Eq, PartialEq)]
pub struct Rflags {
    pub carry: bool, // 0
    /// Always reads as 1.
    #[bits(access = RO)]
    pub fixed1: bool, // 1
    pub parity: bool, // 2
    _rsvd3: bool,     // 3
    pub adjust: bool, // 4
    _rsvd5: bool,     // 5
    pub zero: bool,   // 6
    pub sign: bool,   // 7
    pub trap: bool,   // 8
    pub interrupt_enable: bool, // 9
    pub direction: bool,        // 10
    pub overflow: bool,         // 11
    /// I/O privilege level.
    #[bits(2)]
    pub iopl: u8, // 12–13
    pub nested_task: bool, // 14
    _rsvd15: bool,         // 15
    pub resume: bool,      // 16
    pub virtual_8086: bool,      // 17
    pub alignment_check: bool,   // 18
    pub virtual_interrupt: bool, // 19
    pub virtual_interrupt_pending: bool, // 20
    /// ID flag. Software that can flip this bit may execute `cpuid`.
    pub id: bool, // 21
    #[bits(42)]
    _upper: u64, // 22–63
}

impl Rflags {
    /// Bit mask of [`Rflags::id`].
    pub const ID_MASK: u64 = 1 << 21;

    /// A copy of `self` with the ID flag inverted.
    #[inline]
    #[must_use]
    pub const fn with_id_toggled(self) -> Self {
        Self::from_bits(self.into_bits() ^ Self::ID_MASK)
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegister for Rflags {
    #[inline]
    fn load() -> Self {
        let flags: u64;
        unsafe {
            core::arch::asm!("pushfq", "pop {}", out(reg) flags, options(nomem, preserves_flags));
        }
        Self::from_bits(flags)
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl StoreRegister for Rflags {
    #[inline]
    fn store(self) {
        let flags = self.into_bits();
        unsafe {
            core::arch::asm!("push {}", "popfq", in(reg) flags, options(nomem));
        }
    }
}
