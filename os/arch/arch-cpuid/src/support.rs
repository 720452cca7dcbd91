use arch_registers::{RegisterAccess, Rflags};
use log::debug;

/// Decide whether `cpuid` is available by toggling the ID flag.
///
/// Reads the flags (`f1`), writes them back with ID inverted and reads again
/// (`f2`), restores `f1` and reads a third time (`f3`). Processors without
/// `cpuid` ignore writes to the ID bit. Support is reported iff the ID bit is
/// set in `f1 ^ f2 ^ f3`.
///
/// The flags register is left as it was found.
#[must_use]
pub fn detect_support<R: RegisterAccess + ?Sized>(regs: &R) -> bool {
    let f1 = regs.flags();
    regs.set_flags(f1.with_id_toggled());
    let f2 = regs.flags();
    regs.set_flags(f1);
    let f3 = regs.flags();

    let diff = f1.into_bits() ^ f2.into_bits() ^ f3.into_bits();
    debug!(
        "ID flag probe: f1={:#x} f2={:#x} f3={:#x}",
        f1.into_bits(),
        f2.into_bits(),
        f3.into_bits()
    );
    diff & Rflags::ID_MASK != 0
}
