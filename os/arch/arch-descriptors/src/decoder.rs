use crate::access_rights::{AccessRights, CodeWidth, DescriptorKind, Granularity};
use arch_registers::Ring;
use core::fmt;

/// Semantic view of an [`AccessRights`] value.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct DecodedDescriptor {
    pub kind: DescriptorKind,
    pub dpl: Ring,
    pub granularity: Granularity,
    pub present: bool,
    /// Code segment width; `None` unless S=1 and the type is executable.
    pub width: Option<CodeWidth>,
    /// The AVL bit.
    pub reserved: bool,
}

/// Decode the access rights of a loadable selector.
///
/// The caller is responsible for only passing values that belong to a
/// selector whose validity probe succeeded.
#[must_use]
pub const fn decode(rights: AccessRights) -> DecodedDescriptor {
    DecodedDescriptor {
        kind: rights.kind(),
        dpl: rights.dpl(),
        granularity: rights.granularity(),
        present: rights.p(),
        width: rights.code_width(),
        reserved: rights.avl(),
    }
}

impl From<AccessRights> for DecodedDescriptor {
    #[inline]
    fn from(rights: AccessRights) -> Self {
        decode(rights)
    }
}

/// `<type> dpl=<n> granularity=<g> [not-]present[ <w>-bit,code] reserved-bit=<set|clear>`
impl fmt::Display for DecodedDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} dpl={} granularity={} {}present",
            self.kind.as_str(),
            self.dpl,
            self.granularity.as_str(),
            if self.present { "" } else { "not-" }
        )?;
        if let Some(width) = self.width {
            write!(f, " {}-bit,code", width.bits())?;
        }
        write!(
            f,
            " reserved-bit={}",
            if self.reserved { "set" } else { "clear" }
        )
    }
}
