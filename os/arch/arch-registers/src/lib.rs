//! # Typed x86 Protection-Mode Registers
//!
//! Register models for the state a user-mode diagnostic can observe without
//! changing anything: the segment selectors, the task and LDT registers, the
//! machine status word, the descriptor-table registers and the flags register.
//!
//! Every query is reachable through the [`RegisterAccess`] capability so that
//! consumers can be driven by canned values in tests. [`NativeRegisters`]
//! executes the real instructions (feature `asm`, `x86_64` only).

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod dtr;
mod msw;
mod privilege;
mod rflags;
mod segments;
mod selector;

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
mod native;

pub use dtr::DescriptorTablePointer;
pub use msw::MachineStatusWord;
pub use privilege::Ring;
pub use rflags::Rflags;
pub use segments::{SegmentRegister, SegmentRegisters};
pub use selector::{Selector, Table};

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
pub use native::NativeRegisters;

pub trait LoadRegister {
    /// Read the register of the executing CPU.
    ///
    /// # Safety
    /// It is generally safe to load this register even from user mode.
    fn load() -> Self;
}

pub trait StoreRegister {
    /// Write the register of the executing CPU.
    ///
    /// # Safety
    /// It is generally safe to store this register even from user mode.
    fn store(self);
}

/// Read access to the protection-mode registers of the executing processor.
///
/// Implementations must not change processor state, with the single exception
/// of [`RegisterAccess::set_flags`], which callers use to probe whether a flag
/// bit is writable and then restore it.
pub trait RegisterAccess {
    /// Selectors currently loaded into CS, DS, ES, FS, GS and SS.
    fn segment_registers(&self) -> SegmentRegisters;

    /// Task register selector (`str`).
    fn task_register(&self) -> Selector;

    /// LDT register selector (`sldt`).
    fn ldt_register(&self) -> Selector;

    /// Machine status word (`smsw`).
    fn machine_status_word(&self) -> MachineStatusWord;

    /// Global descriptor table register (`sgdt`).
    fn gdtr(&self) -> DescriptorTablePointer;

    /// Interrupt descriptor table register (`sidt`).
    fn idtr(&self) -> DescriptorTablePointer;

    /// Current flags register.
    fn flags(&self) -> Rflags;

    /// Overwrite the flags register.
    fn set_flags(&self, flags: Rflags);
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &T {
    #[inline]
    fn segment_registers(&self) -> SegmentRegisters {
        (**self).segment_registers()
    }

    #[inline]
    fn task_register(&self) -> Selector {
        (**self).task_register()
    }

    #[inline]
    fn ldt_register(&self) -> Selector {
        (**self).ldt_register()
    }

    #[inline]
    fn machine_status_word(&self) -> MachineStatusWord {
        (**self).machine_status_word()
    }

    #[inline]
    fn gdtr(&self) -> DescriptorTablePointer {
        (**self).gdtr()
    }

    #[inline]
    fn idtr(&self) -> DescriptorTablePointer {
        (**self).idtr()
    }

    #[inline]
    fn flags(&self) -> Rflags {
        (**self).flags()
    }

    #[inline]
    fn set_flags(&self, flags: Rflags) {
        (**self).set_flags(flags);
    }
}
