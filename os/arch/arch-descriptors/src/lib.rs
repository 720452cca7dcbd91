//! # Segment descriptor probing and decoding
//!
//! User-mode code cannot read the GDT or LDT, but it can ask the CPU about
//! any selector:
//!
//! | Instruction | Answer |
//! |-------------|--------|
//! | `lsl`  | valid? and the scaled segment limit |
//! | `lar`  | the [`AccessRights`] word |
//! | `verr` | readable at the current CPL? |
//! | `verw` | writable at the current CPL? |
//!
//! [`DescriptorProbe`] abstracts those four queries, [`decode`] turns an
//! access-rights word into a [`DecodedDescriptor`], and [`TableScanner`]
//! walks a [`ScanRange`] of candidate selectors yielding a
//! [`DescriptorReport`] for every valid one.

#![cfg_attr(not(any(test, doctest)), no_std)]
#![allow(unsafe_code)]

mod access_rights;
mod decoder;
mod probe;
mod scanner;

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
mod native;

pub use access_rights::{
    AccessRights, CodeDataType, CodeWidth, DescriptorKind, Granularity, SystemType,
};
pub use decoder::{DecodedDescriptor, decode};
pub use probe::{DescriptorError, DescriptorProbe};
pub use scanner::{
    DESCRIPTOR_STRIDE, DescriptorReport, SELECTOR_SPACE_END, ScanRange, TableScanner,
    probe_selector, scan,
};

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
pub use native::NativeDescriptors;
