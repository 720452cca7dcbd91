use crate::leaves::{HypervisorInfo, LEAF_00H, LEAF_01H, LEAF_HYPERVISOR, Leaf00h, Leaf01h};
use crate::ranges::{CpuVendor, LEAF_EXTENDED, LeafRange};
use crate::{CpuidError, CpuidProbe, CpuidResult};
use core::fmt;
use core::ops::RangeInclusive;
use log::{debug, warn};

/// Column header matching the [`CpuidReport`] row layout.
pub const CPUID_HEADER: &str = "    LEAF: SUBLEAF      EAX      EBX      ECX      EDX";

/// One row of the CPUID table.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct CpuidReport {
    pub leaf: u32,
    /// Always 0; sub-leaf enumeration is not implemented.
    pub subleaf: u32,
    pub result: CpuidResult,
}

impl CpuidReport {
    #[must_use]
    pub const fn new(leaf: u32, result: CpuidResult) -> Self {
        Self {
            leaf,
            subleaf: 0,
            result,
        }
    }
}

/// `LEAF:SUBLEAF EAX EBX ECX EDX`, all as 8 hex digits.
impl fmt::Display for CpuidReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:08x}:{:08x} {:08x} {:08x} {:08x} {:08x}",
            self.leaf,
            self.subleaf,
            self.result.eax,
            self.result.ebx,
            self.result.ecx,
            self.result.edx
        )
    }
}

/// Vendor, signature and hypervisor identity derived from the gating leaves.
#[derive(Copy, Clone, Debug)]
pub struct CpuIdentity {
    pub leaf0: Leaf00h,
    /// `None` when the highest basic leaf is 0.
    pub leaf1: Option<Leaf01h>,
    /// `None` unless CPUID.01H:ECX[31] is set.
    pub hypervisor: Option<HypervisorInfo>,
    /// `None` when leaf `0x8000_0000` reports no extended range.
    pub max_extended: Option<u32>,
}

impl CpuIdentity {
    /// Rebuild the identity from the rows of a completed walk, without
    /// touching the processor again.
    ///
    /// Returns `None` if leaf 0 is missing. Rows that only exist because of
    /// the one-past-max probe are ignored.
    #[must_use]
    pub fn from_reports<'r, I>(reports: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'r CpuidReport>,
    {
        let (mut leaf0, mut leaf1, mut hypervisor, mut ext) = (None, None, None, None);
        for report in reports {
            match report.leaf {
                LEAF_00H => leaf0 = Some(Leaf00h::from(report.result)),
                LEAF_01H => leaf1 = Some(Leaf01h::from(report.result)),
                LEAF_HYPERVISOR => hypervisor = Some(HypervisorInfo::from(report.result)),
                LEAF_EXTENDED => ext = Some(report.result.eax),
                _ => {}
            }
        }

        let leaf0 = leaf0?;
        let leaf1 = leaf1.filter(|_| leaf0.has_basic(LEAF_01H));
        let hypervisor =
            hypervisor.filter(|_| leaf1.as_ref().is_some_and(Leaf01h::hypervisor_present));
        let max_extended = ext.filter(|max| LeafRange::EXTENDED.contains(*max));

        Some(Self {
            leaf0,
            leaf1,
            hypervisor,
            max_extended,
        })
    }

    #[must_use]
    pub fn vendor(&self) -> CpuVendor {
        self.leaf0.vendor()
    }
}

/// Drives leaf discovery over a [`CpuidProbe`].
#[derive(Copy, Clone, Debug)]
pub struct CpuidEnumerator<P> {
    probe: P,
}

impl<P: CpuidProbe> CpuidEnumerator<P> {
    #[must_use]
    pub const fn new(probe: P) -> Self {
        Self { probe }
    }

    /// Start a fresh walk over all leaves.
    ///
    /// Leaf 0 is queried eagerly to learn the basic range; everything else is
    /// queried as the iterator advances.
    ///
    /// # Errors
    /// [`CpuidError::Unsupported`] if the processor has no `cpuid`; no leaf is
    /// queried in that case.
    pub fn enumerate(&self) -> Result<CpuidLeaves<'_, P>, CpuidError> {
        if !self.probe.is_supported() {
            return Err(CpuidError::Unsupported);
        }

        let leaf0 = self.probe.cpuid(LEAF_00H, 0);
        if LeafRange::BASIC.contains(leaf0.eax) {
            debug!("highest basic leaf {:#x}", leaf0.eax);
        } else {
            warn!(
                "highest basic leaf {:#x} lies outside {:#x}..={:#x}; the basic walk will cross into other ranges",
                leaf0.eax,
                LeafRange::BASIC.base,
                LeafRange::BASIC.last()
            );
        }
        Ok(CpuidLeaves {
            probe: &self.probe,
            max_basic: leaf0.eax,
            phase: Phase::Leaf0(leaf0),
        })
    }

    /// Query the gating leaves and summarize them.
    ///
    /// Runs support detection and the gating queries again; after a walk,
    /// prefer [`CpuIdentity::from_reports`].
    ///
    /// # Errors
    /// [`CpuidError::Unsupported`] if the processor has no `cpuid`.
    pub fn identify(&self) -> Result<CpuIdentity, CpuidError> {
        if !self.probe.is_supported() {
            return Err(CpuidError::Unsupported);
        }

        let leaf0 = Leaf00h::from(self.probe.cpuid(LEAF_00H, 0));
        let leaf1 = leaf0
            .has_basic(LEAF_01H)
            .then(|| Leaf01h::from(self.probe.cpuid(LEAF_01H, 0)));
        let hypervisor = leaf1
            .filter(Leaf01h::hypervisor_present)
            .map(|_| HypervisorInfo::from(self.probe.cpuid(LEAF_HYPERVISOR, 0)));
        let ext = self.probe.cpuid(LEAF_EXTENDED, 0).eax;
        let max_extended = LeafRange::EXTENDED.contains(ext).then_some(ext);

        Ok(CpuIdentity {
            leaf0,
            leaf1,
            hypervisor,
            max_extended,
        })
    }
}

/// Inclusive walk from `first` up to one past `max`.
fn past_max(first: u32, max: u32) -> RangeInclusive<u32> {
    first..=max.saturating_add(1)
}

#[derive(Clone, Debug)]
enum Phase {
    Leaf0(CpuidResult),
    Basic(RangeInclusive<u32>),
    HypervisorBase,
    Hypervisor(RangeInclusive<u32>),
    ExtendedBase,
    Extended(RangeInclusive<u32>),
    Done,
}

/// Lazy walk over the basic, hypervisor and extended leaves.
///
/// Emission order:
/// 1. leaf 0, then `1..=max_basic + 1`;
/// 2. if `max_basic >= 1`: leaf `0x4000_0000` once, then
///    `0x4000_0001..=max_hv + 1` when a hypervisor is present and `max_hv`
///    lies in `[0x4000_0001, 0x4000_FFFF]`;
/// 3. leaf `0x8000_0000`, then `0x8000_0001..=max_ext + 1` when `max_ext`
///    lies in `[0x8000_0000, 0x8000_FFFF]`.
#[derive(Clone, Debug)]
pub struct CpuidLeaves<'a, P> {
    probe: &'a P,
    max_basic: u32,
    phase: Phase,
}

impl<P: CpuidProbe> CpuidLeaves<'_, P> {
    fn query(&self, leaf: u32) -> CpuidReport {
        CpuidReport::new(leaf, self.probe.cpuid(leaf, 0))
    }

    fn enter_hypervisor(&mut self) -> CpuidReport {
        let features = Leaf01h::from(self.probe.cpuid(LEAF_01H, 0));
        let base = self.probe.cpuid(LEAF_HYPERVISOR, 0);

        self.phase = if features.hypervisor_present()
            && LeafRange::HYPERVISOR.has_leaves_above_base(base.eax)
        {
            debug!("hypervisor leaves up to {:#x}", base.eax);
            Phase::Hypervisor(past_max(LEAF_HYPERVISOR + 1, base.eax))
        } else {
            Phase::ExtendedBase
        };
        CpuidReport::new(LEAF_HYPERVISOR, base)
    }

    fn enter_extended(&mut self) -> CpuidReport {
        let base = self.probe.cpuid(LEAF_EXTENDED, 0);
        self.phase = if LeafRange::EXTENDED.contains(base.eax) {
            debug!("extended leaves up to {:#x}", base.eax);
            Phase::Extended(past_max(LEAF_EXTENDED + 1, base.eax))
        } else {
            debug!("no extended leaves (max {:#x})", base.eax);
            Phase::Done
        };
        CpuidReport::new(LEAF_EXTENDED, base)
    }
}

impl<P: CpuidProbe> Iterator for CpuidLeaves<'_, P> {
    type Item = CpuidReport;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match core::mem::replace(&mut self.phase, Phase::Done) {
                Phase::Leaf0(result) => {
                    self.phase = Phase::Basic(past_max(LEAF_01H, self.max_basic));
                    return Some(CpuidReport::new(LEAF_00H, result));
                }
                Phase::Basic(mut leaves) => {
                    if let Some(leaf) = leaves.next() {
                        self.phase = Phase::Basic(leaves);
                        return Some(self.query(leaf));
                    }
                    self.phase = if self.max_basic >= LEAF_01H {
                        Phase::HypervisorBase
                    } else {
                        Phase::ExtendedBase
                    };
                }
                Phase::HypervisorBase => return Some(self.enter_hypervisor()),
                Phase::Hypervisor(mut leaves) => {
                    if let Some(leaf) = leaves.next() {
                        self.phase = Phase::Hypervisor(leaves);
                        return Some(self.query(leaf));
                    }
                    self.phase = Phase::ExtendedBase;
                }
                Phase::ExtendedBase => return Some(self.enter_extended()),
                Phase::Extended(mut leaves) => {
                    if let Some(leaf) = leaves.next() {
                        self.phase = Phase::Extended(leaves);
                        return Some(self.query(leaf));
                    }
                }
                Phase::Done => return None,
            }
        }
    }
}

impl<P: CpuidProbe> core::iter::FusedIterator for CpuidLeaves<'_, P> {}
