use log::error;
use seginfo::StderrLogger;

fn main() {
    if let Err(err) = StderrLogger::from_features().init() {
        eprintln!("logger unavailable: {err}");
    }

    run();
}

#[cfg(all(feature = "asm", target_arch = "x86_64"))]
fn run() {
    use arch_cpuid::NativeCpuid;
    use arch_descriptors::NativeDescriptors;
    use arch_registers::NativeRegisters;
    use seginfo::{Report, ReportError};
    use std::io::{BufWriter, Write};

    let report = Report::new(
        NativeRegisters::new(),
        NativeDescriptors::new(),
        NativeCpuid::new(),
    );

    let mut out = BufWriter::new(std::io::stdout().lock());
    let written = report
        .write_to(&mut out)
        .and_then(|()| out.flush().map_err(ReportError::from));
    if let Err(err) = written {
        error!("{err}");
    }
}

#[cfg(not(all(feature = "asm", target_arch = "x86_64")))]
fn run() {
    error!("seginfo needs an x86_64 build with the `asm` feature");
}
