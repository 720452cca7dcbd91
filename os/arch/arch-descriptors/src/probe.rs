use crate::access_rights::AccessRights;
use arch_registers::Selector;

/// The four selector queries the CPU answers without touching the tables
/// directly: `lsl` (validity and limit), `lar`, `verr` and `verw`.
///
/// Each method corresponds to exactly one instruction; implementations do not
/// cache. Results of [`DescriptorProbe::access_rights`] and
/// [`DescriptorProbe::segment_limit`] are only meaningful when
/// [`DescriptorProbe::is_valid`] returned `true` for the same selector.
pub trait DescriptorProbe {
    /// Whether `lsl` succeeds (ZF=1) for `selector`.
    fn is_valid(&self, selector: Selector) -> bool;

    /// Raw `lar` result.
    fn access_rights(&self, selector: Selector) -> AccessRights;

    /// Raw, granularity-scaled `lsl` result.
    fn segment_limit(&self, selector: Selector) -> u32;

    /// Whether `verr` reports the segment readable at the current CPL.
    fn is_readable(&self, selector: Selector) -> bool;

    /// Whether `verw` reports the segment writable at the current CPL.
    fn is_writable(&self, selector: Selector) -> bool;
}

impl<T: DescriptorProbe + ?Sized> DescriptorProbe for &T {
    #[inline]
    fn is_valid(&self, selector: Selector) -> bool {
        (**self).is_valid(selector)
    }

    #[inline]
    fn access_rights(&self, selector: Selector) -> AccessRights {
        (**self).access_rights(selector)
    }

    #[inline]
    fn segment_limit(&self, selector: Selector) -> u32 {
        (**self).segment_limit(selector)
    }

    #[inline]
    fn is_readable(&self, selector: Selector) -> bool {
        (**self).is_readable(selector)
    }

    #[inline]
    fn is_writable(&self, selector: Selector) -> bool {
        (**self).is_writable(selector)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, thiserror::Error)]
pub enum DescriptorError {
    /// The selector does not name a loadable descriptor.
    #[error("selector 0x{:04x} is not valid", .0.to_u16())]
    InvalidSelector(Selector),
}
