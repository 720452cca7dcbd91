use crate::CpuidResult;
use crate::leaves::{signature, signature_str};

pub const LEAF_HYPERVISOR: u32 = 0x4000_0000;

/// CPUID.40000000H: hypervisor maximum leaf and vendor signature.
///
/// Only meaningful when CPUID.01H:ECX[31] is set; bare metal returns
/// whatever the highest basic leaf holds.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct HypervisorInfo {
    pub max_leaf: u32,
    /// EBX, ECX, EDX, e.g. `KVMKVMKVM\0\0\0` or `Microsoft Hv`.
    pub signature: [u8; 12],
}

impl HypervisorInfo {
    #[must_use]
    pub const fn from(r: CpuidResult) -> Self {
        Self {
            max_leaf: r.eax,
            signature: signature(r.ebx, r.ecx, r.edx),
        }
    }

    #[must_use]
    pub fn signature_str(&self) -> &str {
        signature_str(&self.signature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kvm_signature() {
        // "KVMK" "VMKV" "M\0\0\0"
        let r = CpuidResult::new(0x4000_0001, 0x4b4d_564b, 0x564b_4d56, 0x0000_004d);
        let hv = HypervisorInfo::from(r);
        assert_eq!(hv.max_leaf, 0x4000_0001);
        assert_eq!(hv.signature_str(), "KVMKVMKVM");
    }
}
