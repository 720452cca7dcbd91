use crate::support::detect_support;
use crate::{CpuidProbe, CpuidResult};
use arch_registers::{NativeRegisters, RegisterAccess};

/// [`CpuidProbe`] executing `cpuid` on the current CPU.
///
/// Support detection goes through `R`, so the flag toggling can be observed
/// or replaced independently of the `cpuid` instruction itself.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeCpuid<R = NativeRegisters> {
    regs: R,
}

impl NativeCpuid {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            regs: NativeRegisters::new(),
        }
    }
}

impl<R: RegisterAccess> NativeCpuid<R> {
    #[must_use]
    pub const fn with_registers(regs: R) -> Self {
        Self { regs }
    }
}

impl<R: RegisterAccess> CpuidProbe for NativeCpuid<R> {
    fn is_supported(&self) -> bool {
        detect_support(&self.regs)
    }

    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidResult {
        let (mut eax, mut ecx) = (leaf, subleaf);
        let (rbx, edx): (u64, u32);
        unsafe {
            // RBX is reserved by LLVM; swap it through a scratch register.
            core::arch::asm!(
                "mov {tmp}, rbx",
                "cpuid",
                "xchg {tmp}, rbx",
                tmp = out(reg) rbx,
                inlateout("eax") eax,
                inlateout("ecx") ecx,
                lateout("edx") edx,
                options(nomem, nostack, preserves_flags),
            );
        }
        #[allow(clippy::cast_possible_truncation)]
        let ebx = rbx as u32;
        CpuidResult::new(eax, ebx, ecx, edx)
    }
}
