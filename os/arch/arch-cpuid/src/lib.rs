//! # CPUID enumeration
//!
//! [`CpuidEnumerator`] walks every leaf a processor advertises, in three
//! ranges:
//!
//! | Range | Base leaf | Maximum from | Gate |
//! |-------|-----------|--------------|------|
//! | basic      | `0x0000_0000` | `cpuid(0).eax` | none |
//! | hypervisor | `0x4000_0000` | `cpuid(0x4000_0000).eax` | `cpuid(1).ecx[31]` |
//! | extended   | `0x8000_0000` | `cpuid(0x8000_0000).eax` | max within `0x8000_xxxx` |
//!
//! Each walk deliberately runs one leaf past the advertised maximum.
//! Sub-leaves are not enumerated; every report carries sub-leaf 0.
//!
//! Whether `cpuid` exists at all is decided by [`detect_support`], which
//! checks that the ID flag in the flags register can be toggled.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod enumerator;
mod leaves;
mod ranges;
mod support;

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
mod native;

pub use enumerator::{CPUID_HEADER, CpuIdentity, CpuidEnumerator, CpuidLeaves, CpuidReport};
pub use leaves::{
    HypervisorInfo, LEAF_00H, LEAF_01H, LEAF_HYPERVISOR, Leaf00h, Leaf01h, Leaf1Eax, Leaf1Ecx,
};
pub use ranges::{CpuVendor, LEAF_EXTENDED, LeafRange};
pub use support::detect_support;

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
pub use native::NativeCpuid;

/// The four output registers of one `cpuid` invocation.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
#[repr(C)]
pub struct CpuidResult {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl CpuidResult {
    #[must_use]
    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }
}

/// Access to the `cpuid` instruction.
pub trait CpuidProbe {
    /// Whether the processor implements `cpuid`.
    fn is_supported(&self) -> bool;

    /// Execute `cpuid` with `eax = leaf`, `ecx = subleaf`.
    ///
    /// Only called after [`CpuidProbe::is_supported`] returned `true`.
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidResult;
}

impl<T: CpuidProbe + ?Sized> CpuidProbe for &T {
    #[inline]
    fn is_supported(&self) -> bool {
        (**self).is_supported()
    }

    #[inline]
    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidResult {
        (**self).cpuid(leaf, subleaf)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum CpuidError {
    #[error("cpuid not supported")]
    Unsupported,
}
