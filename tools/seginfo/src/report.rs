use arch_cpuid::{
    CPUID_HEADER, CpuIdentity, CpuidEnumerator, CpuidError, CpuidProbe, CpuidReport,
};
use arch_descriptors::{DescriptorProbe, ScanRange, scan};
use arch_registers::RegisterAccess;
use log::{Level, debug, info, log_enabled};
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

/// The full diagnostic report over three capabilities.
#[derive(Copy, Clone, Debug)]
pub struct Report<R, D, C> {
    registers: R,
    descriptors: D,
    cpuid: C,
}

impl<R, D, C> Report<R, D, C>
where
    R: RegisterAccess,
    D: DescriptorProbe,
    C: CpuidProbe,
{
    #[must_use]
    pub const fn new(registers: R, descriptors: D, cpuid: C) -> Self {
        Self {
            registers,
            descriptors,
            cpuid,
        }
    }

    /// Render every section, in order, into `out`.
    ///
    /// # Errors
    /// Only write failures on `out`. A processor without `cpuid` is reported
    /// in-band.
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        self.write_registers(out)?;
        self.write_table(out, "GLOBAL DESCRIPTOR TABLE", ScanRange::GDT)?;
        self.write_table(out, "LOCAL DESCRIPTOR TABLE", ScanRange::LDT)?;
        self.write_cpuid(out)?;
        Ok(())
    }

    fn write_registers<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        let regs = &self.registers;
        writeln!(
            out,
            "{} TR=0x{:04x}",
            regs.segment_registers(),
            regs.task_register()
        )?;

        let msw = regs.machine_status_word();
        debug!("{msw:?}");
        writeln!(out, "MSW={:08x}", msw.into_bits())?;

        let (gdtr, idtr) = (regs.gdtr(), regs.idtr());
        debug!("GDT spans {} slots, IDT {} bytes", gdtr.entries(), idtr.limit as usize + 1);
        writeln!(out, "GDT {gdtr}")?;
        writeln!(out, "IDT {idtr}")?;
        writeln!(out, "LDT=0x{:04x}", regs.ldt_register())?;
        Ok(())
    }

    fn write_table<W: Write>(
        &self,
        out: &mut W,
        title: &str,
        range: ScanRange,
    ) -> Result<(), ReportError> {
        writeln!(out, "{title}")?;

        let mut found = 0usize;
        for report in scan(&self.descriptors, range) {
            writeln!(out, "{report}")?;
            found += 1;
        }
        info!("{title}: {found} of {} selectors valid", range.len());
        Ok(())
    }

    fn write_cpuid<W: Write>(&self, out: &mut W) -> Result<(), ReportError> {
        let enumerator = CpuidEnumerator::new(&self.cpuid);
        let leaves = match enumerator.enumerate() {
            Ok(leaves) => leaves,
            Err(err @ CpuidError::Unsupported) => {
                writeln!(out, "{err}")?;
                return Ok(());
            }
        };

        let leaves: Vec<CpuidReport> = leaves.collect();
        if log_enabled!(Level::Info)
            && let Some(identity) = CpuIdentity::from_reports(&leaves)
        {
            log_identity(&identity);
        }

        writeln!(out, "{CPUID_HEADER}")?;
        for leaf in &leaves {
            writeln!(out, "{leaf}")?;
        }
        Ok(())
    }
}

fn log_identity(id: &CpuIdentity) {
    info!(
        "vendor {} ({}), max basic leaf {:#x}",
        id.leaf0.vendor_str(),
        id.vendor(),
        id.leaf0.max_basic
    );
    if let Some(leaf1) = id.leaf1 {
        info!(
            "family {:#x} model {:#x} stepping {:#x}",
            leaf1.eax.effective_family(),
            leaf1.eax.effective_model(),
            leaf1.eax.stepping()
        );
    }
    if let Some(hv) = &id.hypervisor {
        info!(
            "hypervisor {:?}, max leaf {:#x}",
            hv.signature_str(),
            hv.max_leaf
        );
    }
    match id.max_extended {
        Some(max) => debug!("max extended leaf {max:#x}"),
        None => debug!("no extended leaves"),
    }
}
