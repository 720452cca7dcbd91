use crate::CpuidResult;
use bitfield_struct::bitfield;

pub const LEAF_01H: u32 = 0x01;

/// CPUID.01H: version information and feature flags.
///
/// Only the fields the enumerator and the identification summary use are
/// modelled; EBX and EDX are kept raw.
#[derive(Copy, Clone, Debug)]
pub struct Leaf01h {
    pub eax: Leaf1Eax,
    pub ebx: u32,
    pub ecx: Leaf1Ecx,
    pub edx: u32,
}

impl Leaf01h {
    #[must_use]
    pub const fn from(r: CpuidResult) -> Self {
        Self {
            eax: Leaf1Eax::from_bits(r.eax),
            ebx: r.ebx,
            ecx: Leaf1Ecx::from_bits(r.ecx),
            edx: r.edx,
        }
    }

    /// ECX bit 31: running under a hypervisor.
    #[inline]
    #[must_use]
    pub const fn hypervisor_present(&self) -> bool {
        self.ecx.hypervisor()
    }
}

/// CPUID.01H:EAX: processor signature.
#[bitfield(u32)]
pub struct Leaf1Eax {
    #[bits(4)]
    pub stepping: u8,
    #[bits(4)]
    pub model: u8,
    #[bits(4)]
    pub family: u8,
    #[bits(2)]
    pub cpu_type: u8,
    #[bits(2)]
    _rsv14_15: u8,
    #[bits(4)]
    pub ext_model: u8,
    #[bits(8)]
    pub ext_family: u16,
    #[bits(4)]
    _rsv28_31: u8,
}

impl Leaf1Eax {
    /// Family, adding the extended family when the base family is 0x0F.
    #[must_use]
    pub fn effective_family(self) -> u16 {
        let fam = u16::from(self.family());
        if fam == 0x0F { fam + self.ext_family() } else { fam }
    }

    /// Model, prefixed with the extended model for families 0x06 and 0x0F.
    #[must_use]
    pub const fn effective_model(self) -> u8 {
        let fam = self.family();
        if fam == 0x06 || fam == 0x0F {
            self.model() | (self.ext_model() << 4)
        } else {
            self.model()
        }
    }
}

/// CPUID.01H:ECX: feature flags; only the hypervisor bit is named.
#[bitfield(u32)]
pub struct Leaf1Ecx {
    #[bits(31)]
    _features: u32,
    /// Bit 31: hypervisor present.
    pub hypervisor: bool,
}
