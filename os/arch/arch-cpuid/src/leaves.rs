//! Typed views of the leaves the enumerator itself depends on.

mod hypervisor;
mod leaf00h;
mod leaf01h;

pub use hypervisor::{HypervisorInfo, LEAF_HYPERVISOR};
pub use leaf00h::{LEAF_00H, Leaf00h};
pub use leaf01h::{LEAF_01H, Leaf01h, Leaf1Eax, Leaf1Ecx};

/// Concatenate three registers into a 12-byte ASCII signature.
pub(crate) const fn signature(a: u32, b: u32, c: u32) -> [u8; 12] {
    let (a, b, c) = (a.to_le_bytes(), b.to_le_bytes(), c.to_le_bytes());
    [
        a[0], a[1], a[2], a[3], b[0], b[1], b[2], b[3], c[0], c[1], c[2], c[3],
    ]
}

/// Printable form of a signature; NUL padding is dropped.
pub(crate) fn signature_str(sig: &[u8; 12]) -> &str {
    core::str::from_utf8(sig)
        .unwrap_or("")
        .trim_end_matches('\0')
}
