//! # seginfo
//!
//! Renders the protection-mode state of the executing processor as text:
//! segment and system registers, every loadable GDT and LDT descriptor, and
//! all advertised CPUID leaves.
//!
//! The [`Report`] is generic over the three capabilities it reads from, so
//! the same renderer runs on the native accessors and on canned test values.

mod logger;
mod report;

pub use logger::StderrLogger;
pub use report::{Report, ReportError};
