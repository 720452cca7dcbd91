use core::fmt;

/// First leaf of the extended range.
pub const LEAF_EXTENDED: u32 = 0x8000_0000;

/// A 64 Ki-leaf CPUID range `[base, base + 0xFFFF]`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct LeafRange {
    pub base: u32,
}

impl LeafRange {
    pub const BASIC: Self = Self { base: 0 };
    pub const HYPERVISOR: Self = Self { base: 0x4000_0000 };
    pub const EXTENDED: Self = Self {
        base: LEAF_EXTENDED,
    };

    /// Last leaf of the range.
    #[must_use]
    pub const fn last(self) -> u32 {
        self.base + 0xFFFF
    }

    #[must_use]
    pub const fn contains(self, leaf: u32) -> bool {
        leaf >= self.base && leaf <= self.last()
    }

    /// Whether `max` (the EAX value of the base leaf) names at least one leaf
    /// above the base leaf while staying inside the range.
    #[must_use]
    pub const fn has_leaves_above_base(self, max: u32) -> bool {
        max > self.base && max <= self.last()
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CpuVendor {
    Intel,
    Amd,
    Other,
}

impl CpuVendor {
    /// Classify the 12-byte vendor identification string of leaf 0.
    #[must_use]
    pub fn from_id(id: &[u8; 12]) -> Self {
        match id {
            b"GenuineIntel" => Self::Intel,
            b"AuthenticAMD" => Self::Amd,
            _ => Self::Other,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Intel => "Intel",
            Self::Amd => "AMD",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for CpuVendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
