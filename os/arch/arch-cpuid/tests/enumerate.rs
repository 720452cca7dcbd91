use arch_cpuid::{
    CpuIdentity, CpuVendor, CpuidEnumerator, CpuidError, CpuidProbe, CpuidReport, CpuidResult,
    LEAF_HYPERVISOR,
};
use std::cell::RefCell;
use std::collections::BTreeMap;

const HV_BIT: u32 = 1 << 31;

/// Canned leaf table; unknown leaves answer with zeros.
#[derive(Default)]
struct FakeCpuid {
    supported: bool,
    leaves: BTreeMap<u32, CpuidResult>,
    queried: RefCell<Vec<u32>>,
}

impl FakeCpuid {
    fn new() -> Self {
        Self {
            supported: true,
            ..Self::default()
        }
    }

    fn leaf(mut self, leaf: u32, eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        self.leaves.insert(leaf, CpuidResult::new(eax, ebx, ecx, edx));
        self
    }

    /// Intel part with `mx = 0x16` and extended leaves up to `0x8000_0008`.
    fn intel(leaf1_ecx: u32) -> Self {
        Self::new()
            .leaf(0, 0x16, 0x756e_6547, 0x6c65_746e, 0x4965_6e69)
            .leaf(1, 0x0009_06EA, 0x0010_0800, leaf1_ecx, 0xbfeb_fbff)
            .leaf(0x16, 0x0000_0bb8, 0x0000_1194, 0x64, 0)
            .leaf(0x8000_0000, 0x8000_0008, 0, 0, 0)
    }

    fn queried(&self) -> Vec<u32> {
        self.queried.borrow().clone()
    }
}

impl CpuidProbe for FakeCpuid {
    fn is_supported(&self) -> bool {
        self.supported
    }

    fn cpuid(&self, leaf: u32, subleaf: u32) -> CpuidResult {
        assert_eq!(subleaf, 0);
        self.queried.borrow_mut().push(leaf);
        self.leaves.get(&leaf).copied().unwrap_or_default()
    }
}

fn leaves(reports: &[CpuidReport]) -> Vec<u32> {
    reports.iter().map(|r| r.leaf).collect()
}

#[test]
fn basic_walk_runs_one_past_max() {
    let cpu = FakeCpuid::intel(0);
    let reports: Vec<_> = CpuidEnumerator::new(&cpu).enumerate().unwrap().collect();
    let basic: Vec<u32> = leaves(&reports)
        .into_iter()
        .take_while(|l| *l < LEAF_HYPERVISOR)
        .collect();

    assert_eq!(basic, (0..=0x17).collect::<Vec<_>>());
    assert_eq!(basic.len(), 24);
    assert_eq!(reports[0x16].result.eax, 0x0bb8);
    assert!(reports.iter().all(|r| r.subleaf == 0));
}

#[test]
fn bare_metal_emits_hypervisor_base_once() {
    let cpu = FakeCpuid::intel(0x7ffa_fbff);
    let reports: Vec<_> = CpuidEnumerator::new(&cpu).enumerate().unwrap().collect();
    let emitted = leaves(&reports);

    assert_eq!(emitted.iter().filter(|l| **l == LEAF_HYPERVISOR).count(), 1);
    assert!(
        !cpu.queried()
            .iter()
            .any(|l| (0x4000_0001..=0x4000_FFFF).contains(l))
    );
}

#[test]
fn hypervisor_range_is_walked() {
    let cpu = FakeCpuid::intel(HV_BIT)
        // "KVMKVMKVM\0\0\0"
        .leaf(LEAF_HYPERVISOR, 0x4000_0001, 0x4b4d_564b, 0x564b_4d56, 0x4d)
        .leaf(0x4000_0001, 0x0100_7afb, 0, 0, 0);
    let emitted = leaves(
        &CpuidEnumerator::new(&cpu)
            .enumerate()
            .unwrap()
            .collect::<Vec<_>>(),
    );

    let hv: Vec<u32> = emitted
        .iter()
        .copied()
        .filter(|l| (LEAF_HYPERVISOR..0x8000_0000).contains(l))
        .collect();
    assert_eq!(hv, vec![0x4000_0000, 0x4000_0001, 0x4000_0002]);
}

#[test]
fn hypervisor_max_outside_range_is_ignored() {
    let cpu = FakeCpuid::intel(HV_BIT).leaf(LEAF_HYPERVISOR, 0x16, 0, 0, 0);
    let emitted: Vec<u32> = CpuidEnumerator::new(&cpu)
        .enumerate()
        .unwrap()
        .map(|r| r.leaf)
        .collect();

    assert_eq!(
        emitted.iter().filter(|l| (0x4000_0000..0x8000_0000).contains(*l)).count(),
        1
    );
}

#[test]
fn extended_walk_runs_one_past_max() {
    let cpu = FakeCpuid::intel(0);
    let emitted: Vec<u32> = CpuidEnumerator::new(&cpu)
        .enumerate()
        .unwrap()
        .map(|r| r.leaf)
        .filter(|l| *l >= 0x8000_0000)
        .collect();

    assert_eq!(emitted, (0x8000_0000..=0x8000_0009).collect::<Vec<_>>());
}

#[test]
fn absent_extended_range_still_shows_base_leaf() {
    // Some processors echo the highest basic leaf for out-of-range queries.
    let cpu = FakeCpuid::intel(0).leaf(0x8000_0000, 0x0000_0016, 0, 0, 0);
    let reports: Vec<_> = CpuidEnumerator::new(&cpu).enumerate().unwrap().collect();

    let last = reports.last().unwrap();
    assert_eq!(last.leaf, 0x8000_0000);
    assert_eq!(last.result.eax, 0x16);
    assert_eq!(
        reports.iter().filter(|r| r.leaf >= 0x8000_0000).count(),
        1
    );
}

#[test]
fn max_basic_zero_skips_hypervisor_leaf() {
    let cpu = FakeCpuid::new().leaf(0, 0, 0, 0, 0);
    let emitted: Vec<u32> = CpuidEnumerator::new(&cpu)
        .enumerate()
        .unwrap()
        .map(|r| r.leaf)
        .collect();

    assert_eq!(emitted, vec![0, 1, 0x8000_0000]);
}

#[test]
fn unsupported_cpu_is_never_queried() {
    let cpu = FakeCpuid::default();
    let enumerator = CpuidEnumerator::new(&cpu);

    assert_eq!(enumerator.enumerate().err(), Some(CpuidError::Unsupported));
    assert_eq!(enumerator.identify().err(), Some(CpuidError::Unsupported));
    assert!(cpu.queried().is_empty());
    assert_eq!(CpuidError::Unsupported.to_string(), "cpuid not supported");
}

#[test]
fn emitted_leaves_stay_within_discovered_ranges() {
    let cpu = FakeCpuid::intel(HV_BIT)
        .leaf(LEAF_HYPERVISOR, 0x4000_000a, 0, 0, 0)
        .leaf(0x8000_0000, 0x8000_0021, 0, 0, 0);
    let (mx, vmm_max, ext_max) = (0x16, 0x4000_000a, 0x8000_0021);

    for r in CpuidEnumerator::new(&cpu).enumerate().unwrap() {
        let l = r.leaf;
        assert!(
            l <= mx + 1
                || l == LEAF_HYPERVISOR
                || (0x4000_0001..=vmm_max + 1).contains(&l)
                || (0x8000_0000..=ext_max + 1).contains(&l),
            "unexpected leaf {l:#x}"
        );
    }
}

#[test]
fn enumeration_is_restartable() {
    let cpu = FakeCpuid::intel(HV_BIT).leaf(LEAF_HYPERVISOR, 0x4000_0003, 0, 0, 0);
    let enumerator = CpuidEnumerator::new(&cpu);

    let walk = enumerator.enumerate().unwrap();
    let copy = walk.clone();
    let first: Vec<_> = walk.collect();
    let second: Vec<_> = enumerator.enumerate().unwrap().collect();

    assert_eq!(first, second);
    assert_eq!(copy.count(), first.len());
}

#[test]
fn identify_reads_vendor_and_hypervisor() {
    let cpu = FakeCpuid::intel(HV_BIT)
        .leaf(LEAF_HYPERVISOR, 0x4000_0001, 0x4b4d_564b, 0x564b_4d56, 0x4d);
    let id = CpuidEnumerator::new(&cpu).identify().unwrap();

    assert_eq!(id.vendor(), CpuVendor::Intel);
    assert_eq!(id.leaf0.vendor_str(), "GenuineIntel");
    assert_eq!(id.leaf1.map(|l| l.eax.effective_model()), Some(0x9E));
    assert_eq!(
        id.hypervisor.as_ref().map(|h| h.signature_str()),
        Some("KVMKVMKVM")
    );
    assert_eq!(id.max_extended, Some(0x8000_0008));
}

#[test]
fn identify_without_hypervisor() {
    let cpu = FakeCpuid::intel(0);
    let id = CpuidEnumerator::new(&cpu).identify().unwrap();

    assert!(id.hypervisor.is_none());
    assert!(!cpu.queried().contains(&LEAF_HYPERVISOR));
}

#[test]
fn identity_from_walk_needs_no_extra_queries() {
    let cpu = FakeCpuid::intel(HV_BIT)
        .leaf(LEAF_HYPERVISOR, 0x4000_0001, 0x4b4d_564b, 0x564b_4d56, 0x4d);
    let reports: Vec<_> = CpuidEnumerator::new(&cpu).enumerate().unwrap().collect();
    let walked = cpu.queried().len();

    let id = CpuIdentity::from_reports(&reports).unwrap();
    assert_eq!(cpu.queried().len(), walked);

    let fresh = CpuidEnumerator::new(&cpu).identify().unwrap();
    assert_eq!(id.leaf0, fresh.leaf0);
    assert_eq!(id.hypervisor, fresh.hypervisor);
    assert_eq!(id.max_extended, fresh.max_extended);
    assert_eq!(id.leaf1.map(|l| l.ecx.into_bits()), fresh.leaf1.map(|l| l.ecx.into_bits()));
}

#[test]
fn identity_from_walk_ignores_rows_past_max() {
    // mx = 0: leaf 1 is only walked as the one-past-max row.
    let cpu = FakeCpuid::new()
        .leaf(0, 0, 0, 0, 0)
        .leaf(1, 0x0009_06EA, 0, HV_BIT, 0)
        .leaf(LEAF_HYPERVISOR, 0x4000_0001, 0, 0, 0);
    let reports: Vec<_> = CpuidEnumerator::new(&cpu).enumerate().unwrap().collect();

    let id = CpuIdentity::from_reports(&reports).unwrap();
    assert!(id.leaf1.is_none());
    assert!(id.hypervisor.is_none());
    assert_eq!(id.max_extended, None);
    assert!(CpuIdentity::from_reports(&reports[1..]).is_none());
}

#[test]
fn oversized_basic_max_is_still_walked_lazily() {
    // A leaf 0 EAX beyond the basic range is reported but not trusted to be small.
    let cpu = FakeCpuid::new().leaf(0, 0x8000_0008, 0, 0, 0);
    let first: Vec<u32> = CpuidEnumerator::new(&cpu)
        .enumerate()
        .unwrap()
        .take(3)
        .map(|r| r.leaf)
        .collect();

    assert_eq!(first, vec![0, 1, 2]);
    assert_eq!(cpu.queried(), vec![0, 1, 2]);
}
