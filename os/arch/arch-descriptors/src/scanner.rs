//! # Descriptor table scanning
//!
//! The tables themselves are not readable from user mode, so the scan walks
//! the selector space and asks the CPU about every candidate. Most of the
//! 16-bit space is unpopulated; candidates that fail the validity probe are
//! dropped without output.

use crate::access_rights::AccessRights;
use crate::decoder::{DecodedDescriptor, decode};
use crate::probe::{DescriptorError, DescriptorProbe};
use arch_registers::Selector;
use core::fmt;
use core::iter::StepBy;
use core::ops::Range;
use log::trace;

/// One past the largest 16-bit selector.
pub const SELECTOR_SPACE_END: u32 = 0x1_0000;

/// Size of one descriptor slot in bytes.
pub const DESCRIPTOR_STRIDE: u32 = 8;

/// A half-open selector range walked with a fixed stride.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ScanRange {
    pub start: u32,
    pub end: u32,
    pub step: u32,
}

impl ScanRange {
    /// Every GDT slot: selectors `0, 8, 16, ..`.
    pub const GDT: Self = Self::new(0, SELECTOR_SPACE_END, DESCRIPTOR_STRIDE);

    /// LDT candidates: selectors `4, 12, 20, ..`.
    ///
    /// The start offset of 4 is a raw numeric offset that happens to set the
    /// table-indicator bit; RPL stays 0.
    pub const LDT: Self = Self::new(4, SELECTOR_SPACE_END, DESCRIPTOR_STRIDE);

    /// `end` is clamped to the selector space and `step` to at least 1.
    #[must_use]
    pub const fn new(start: u32, end: u32, step: u32) -> Self {
        let end = if end > SELECTOR_SPACE_END {
            SELECTOR_SPACE_END
        } else {
            end
        };
        let step = if step == 0 { 1 } else { step };
        Self { start, end, step }
    }

    /// Number of candidate selectors.
    #[must_use]
    pub const fn len(&self) -> u32 {
        if self.end <= self.start {
            0
        } else {
            (self.end - self.start).div_ceil(self.step)
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn candidates(self) -> StepBy<Range<u32>> {
        (self.start..self.end).step_by(self.step as usize)
    }
}

/// Everything the CPU reports about one valid selector.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DescriptorReport {
    pub selector: Selector,
    pub access_rights: AccessRights,
    pub limit: u32,
    pub readable: bool,
    pub writable: bool,
    pub decoded: DecodedDescriptor,
}

impl DescriptorReport {
    /// Table slot, i.e. the selector shifted right by three.
    #[must_use]
    pub const fn index(&self) -> u16 {
        self.selector.to_u16() >> 3
    }
}

/// Two lines: the raw probe results, then the indented description.
impl fmt::Display for DescriptorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<2} 0x{:03x}: LAR=0x{:08x} LSL=0x{:08x}",
            self.index(),
            self.selector,
            self.access_rights.into_bits(),
            self.limit
        )?;
        if self.readable || self.writable {
            f.write_str(" ")?;
        }
        if self.readable {
            f.write_str("r")?;
        }
        if self.writable {
            f.write_str("w")?;
        }
        write!(f, "\n   {}", self.decoded)
    }
}

/// Query and decode a single selector.
///
/// # Errors
/// [`DescriptorError::InvalidSelector`] if the validity probe fails; no other
/// query is issued in that case.
pub fn probe_selector<P>(probe: &P, selector: Selector) -> Result<DescriptorReport, DescriptorError>
where
    P: DescriptorProbe + ?Sized,
{
    if !probe.is_valid(selector) {
        return Err(DescriptorError::InvalidSelector(selector));
    }

    let access_rights = probe.access_rights(selector);
    Ok(DescriptorReport {
        selector,
        access_rights,
        limit: probe.segment_limit(selector),
        readable: probe.is_readable(selector),
        writable: probe.is_writable(selector),
        decoded: decode(access_rights),
    })
}

/// Lazy walk over a [`ScanRange`], yielding a report per valid selector.
///
/// Cloning a scanner (or calling [`scan`] again) restarts the walk.
#[derive(Clone, Debug)]
pub struct TableScanner<P> {
    probe: P,
    candidates: StepBy<Range<u32>>,
}

impl<P: DescriptorProbe> TableScanner<P> {
    #[must_use]
    pub fn new(probe: P, range: ScanRange) -> Self {
        Self {
            probe,
            candidates: range.candidates(),
        }
    }
}

/// Scan `range` using `probe`.
#[must_use]
pub fn scan<P: DescriptorProbe>(probe: P, range: ScanRange) -> TableScanner<P> {
    TableScanner::new(probe, range)
}

impl<P: DescriptorProbe> Iterator for TableScanner<P> {
    type Item = DescriptorReport;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let raw = u16::try_from(self.candidates.next()?).ok()?;
            match probe_selector(&self.probe, Selector::from_u16(raw)) {
                Ok(report) => return Some(report),
                Err(e) => trace!("{e}"),
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.candidates.size_hint().1)
    }
}

impl<P: DescriptorProbe> core::iter::FusedIterator for TableScanner<P> {}
