use core::fmt;

/// Base/limit pair stored by `sgdt` and `sidt`.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct DescriptorTablePointer {
    /// Linear address of the table.
    pub base: u64,
    /// Size of the table in bytes, minus one.
    pub limit: u16,
}

impl DescriptorTablePointer {
    #[must_use]
    pub const fn new(base: u64, limit: u16) -> Self {
        Self { base, limit }
    }

    /// Number of 8-byte slots covered by `limit`.
    #[must_use]
    pub const fn entries(&self) -> usize {
        (self.limit as usize + 1) / 8
    }
}

/// `base=0x... limit=0x...`
impl fmt::Display for DescriptorTablePointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "base=0x{:x} limit=0x{:x}", self.base, self.limit)
    }
}

/// In-memory image written by `sgdt`/`sidt` in 64-bit mode.
#[cfg(all(feature = "asm", target_arch = "x86_64"))]
#[repr(C, packed)]
#[derive(Default)]
pub(crate) struct RawPseudoDescriptor {
    pub limit: u16,
    pub base: u64,
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl From<RawPseudoDescriptor> for DescriptorTablePointer {
    fn from(raw: RawPseudoDescriptor) -> Self {
        Self {
            base: raw.base,
            limit: raw.limit,
        }
    }
}
