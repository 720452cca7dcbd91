use crate::LoadRegister;
use bitfield_struct::bitfield;

/// Machine status word as stored by `smsw r32`.
///
/// The low 16 bits mirror CR0[15:0]; with a 32-bit destination the processor
/// fills the upper half from CR0 as well, so the raw value is kept intact.
#[bitfield(u32)]
#[derive(Eq, PartialEq)]
pub struct MachineStatusWord {
    /// PE (bit 0): protected mode enabled.
    pub protection_enable: bool,
    /// MP (bit 1): monitor coprocessor.
    pub monitor_coprocessor: bool,
    /// EM (bit 2): x87 emulation.
    pub emulation: bool,
    /// TS (bit 3): task switched.
    pub task_switched: bool,
    /// ET (bit 4): extension type.
    pub extension_type: bool,
    /// NE (bit 5): native x87 error reporting.
    pub numeric_error: bool,
    #[bits(26)]
    _cr0_rest: u32,
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
impl LoadRegister for MachineStatusWord {
    #[inline]
    fn load() -> Self {
        let msw: u32;
        unsafe {
            core::arch::asm!("smsw {:e}", out(reg) msw, options(nomem, nostack, preserves_flags));
        }
        Self::from_bits(msw)
    }
}
