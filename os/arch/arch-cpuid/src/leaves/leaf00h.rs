use crate::CpuidResult;
use crate::leaves::{signature, signature_str};
use crate::ranges::CpuVendor;

pub const LEAF_00H: u32 = 0x00;

/// CPUID.00H: highest basic leaf and vendor identification.
///
/// The vendor string is stored in EBX, EDX, ECX (in that order).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Leaf00h {
    pub max_basic: u32,
    pub vendor_id: [u8; 12],
}

impl Leaf00h {
    #[must_use]
    pub const fn from(r: CpuidResult) -> Self {
        Self {
            max_basic: r.eax,
            vendor_id: signature(r.ebx, r.edx, r.ecx),
        }
    }

    #[must_use]
    pub fn vendor(&self) -> CpuVendor {
        CpuVendor::from_id(&self.vendor_id)
    }

    #[must_use]
    pub fn vendor_str(&self) -> &str {
        signature_str(&self.vendor_id)
    }

    #[inline]
    #[must_use]
    pub const fn has_basic(&self, leaf: u32) -> bool {
        leaf <= self.max_basic
    }
}
