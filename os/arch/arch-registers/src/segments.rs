use crate::LoadRegister;
use crate::selector::Selector;
use core::fmt;

/// The six segment registers.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum SegmentRegister {
    Cs,
    Ds,
    Es,
    Fs,
    Gs,
    Ss,
}

impl SegmentRegister {
    /// Report order.
    pub const ALL: [Self; 6] = [Self::Cs, Self::Ds, Self::Es, Self::Fs, Self::Gs, Self::Ss];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cs => "CS",
            Self::Ds => "DS",
            Self::Es => "ES",
            Self::Fs => "FS",
            Self::Gs => "GS",
            Self::Ss => "SS",
        }
    }
}

/// Snapshot of the selectors loaded into all six segment registers.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SegmentRegisters {
    pub cs: Selector,
    pub ds: Selector,
    pub es: Selector,
    pub fs: Selector,
    pub gs: Selector,
    pub ss: Selector,
}

impl SegmentRegisters {
    #[must_use]
    pub const fn get(&self, reg: SegmentRegister) -> Selector {
        match reg {
            SegmentRegister::Cs => self.cs,
            SegmentRegister::Ds => self.ds,
            SegmentRegister::Es => self.es,
            SegmentRegister::Fs => self.fs,
            SegmentRegister::Gs => self.gs,
            SegmentRegister::Ss => self.ss,
        }
    }

    /// `(register, selector)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (SegmentRegister, Selector)> + '_ {
        SegmentRegister::ALL.into_iter().map(|r| (r, self.get(r)))
    }
}

/// `CS=0x0033 DS=0x0000 ...`, space separated.
impl fmt::Display for SegmentRegisters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (reg, sel)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}=0x{:04x}", reg.as_str(), sel)?;
        }
        Ok(())
    }
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
macro_rules! read_sreg {
    ($name:literal) => {{
        let v: u16;
        unsafe {
            core::arch::asm!(
                concat!("mov {:x}, ", $name),
                out(reg) v,
                options(nomem, nostack, preserves_flags)
            );
        }
        Selector::from_u16(v)
    }};
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegister for SegmentRegisters {
    fn load() -> Self {
        Self {
            cs: read_sreg!("cs"),
            ds: read_sreg!("ds"),
            es: read_sreg!("es"),
            fs: read_sreg!("fs"),
            gs: read_sreg!("gs"),
            ss: read_sreg!("ss"),
        }
    }
}
