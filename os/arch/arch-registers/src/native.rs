//! Register access on the executing CPU.
//!
//! All instructions used here are available at CPL3 unless the operating
//! system enables UMIP, in which case `sgdt`/`sidt`/`sldt`/`smsw`/`str` are
//! emulated or faulted by the kernel.

use crate::dtr::RawPseudoDescriptor;
use crate::{
    DescriptorTablePointer, LoadRegister, MachineStatusWord, RegisterAccess, Rflags,
    SegmentRegisters, Selector, StoreRegister,
};

/// [`RegisterAccess`] backed by inline assembly.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeRegisters;

impl NativeRegisters {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RegisterAccess for NativeRegisters {
    fn segment_registers(&self) -> SegmentRegisters {
        SegmentRegisters::load()
    }

    fn task_register(&self) -> Selector {
        let tr: u16;
        unsafe {
            core::arch::asm!("str {:x}", out(reg) tr, options(nomem, nostack, preserves_flags));
        }
        Selector::from_u16(tr)
    }

    fn ldt_register(&self) -> Selector {
        let ldtr: u16;
        unsafe {
            core::arch::asm!("sldt {:x}", out(reg) ldtr, options(nomem, nostack, preserves_flags));
        }
        Selector::from_u16(ldtr)
    }

    fn machine_status_word(&self) -> MachineStatusWord {
        MachineStatusWord::load()
    }

    fn gdtr(&self) -> DescriptorTablePointer {
        let mut dtr = RawPseudoDescriptor::default();
        unsafe {
            core::arch::asm!(
                "sgdt [{}]",
                in(reg) &raw mut dtr,
                options(nostack, preserves_flags)
            );
        }
        dtr.into()
    }

    fn idtr(&self) -> DescriptorTablePointer {
        let mut dtr = RawPseudoDescriptor::default();
        unsafe {
            core::arch::asm!(
                "sidt [{}]",
                in(reg) &raw mut dtr,
                options(nostack, preserves_flags)
            );
        }
        dtr.into()
    }

    fn flags(&self) -> Rflags {
        Rflags::load()
    }

    fn set_flags(&self, flags: Rflags) {
        flags.store();
    }
}
