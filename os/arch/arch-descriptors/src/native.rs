use crate::access_rights::AccessRights;
use crate::probe::DescriptorProbe;
use arch_registers::Selector;

/// [`DescriptorProbe`] executing `lar`, `lsl`, `verr` and `verw`.
///
/// None of these instructions fault on an invalid selector; they clear ZF
/// instead, which is what the validity and read/write checks report.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeDescriptors;

impl NativeDescriptors {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DescriptorProbe for NativeDescriptors {
    fn is_valid(&self, selector: Selector) -> bool {
        let ok: u8;
        unsafe {
            core::arch::asm!(
                "lsl {tmp:e}, {sel:e}",
                "setz {ok}",
                sel = in(reg) u32::from(selector.to_u16()),
                tmp = out(reg) _,
                ok = out(reg_byte) ok,
                options(nomem, nostack)
            );
        }
        ok != 0
    }

    fn access_rights(&self, selector: Selector) -> AccessRights {
        let mut rights = 0u32;
        unsafe {
            core::arch::asm!(
                "lar {ar:e}, {sel:e}",
                sel = in(reg) u32::from(selector.to_u16()),
                ar = inout(reg) rights,
                options(nomem, nostack)
            );
        }
        AccessRights::from_bits(rights)
    }

    fn segment_limit(&self, selector: Selector) -> u32 {
        let mut limit = 0u32;
        unsafe {
            core::arch::asm!(
                "lsl {lim:e}, {sel:e}",
                sel = in(reg) u32::from(selector.to_u16()),
                lim = inout(reg) limit,
                options(nomem, nostack)
            );
        }
        limit
    }

    fn is_readable(&self, selector: Selector) -> bool {
        let ok: u8;
        unsafe {
            core::arch::asm!(
                "verr {sel:x}",
                "setz {ok}",
                sel = in(reg) selector.to_u16(),
                ok = out(reg_byte) ok,
                options(nomem, nostack)
            );
        }
        ok != 0
    }

    fn is_writable(&self, selector: Selector) -> bool {
        let ok: u8;
        unsafe {
            core::arch::asm!(
                "verw {sel:x}",
                "setz {ok}",
                sel = in(reg) selector.to_u16(),
                ok = out(reg_byte) ok,
                options(nomem, nostack)
            );
        }
        ok != 0
    }
}
