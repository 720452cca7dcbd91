use arch_descriptors::{
    AccessRights, CodeWidth, DescriptorError, DescriptorProbe, ScanRange, probe_selector, scan,
};
use arch_registers::Selector;
use std::cell::RefCell;
use std::collections::BTreeMap;

#[derive(Copy, Clone)]
struct Slot {
    rights: u32,
    limit: u32,
    readable: bool,
    writable: bool,
}

/// Canned descriptor tables keyed by raw selector value.
#[derive(Default)]
struct FakeDescriptors {
    slots: BTreeMap<u16, Slot>,
    /// Selectors for which anything other than the validity check was asked.
    detail_queries: RefCell<Vec<u16>>,
    validity_queries: RefCell<usize>,
}

impl FakeDescriptors {
    fn with(mut self, selector: u16, rights: u32, limit: u32, rw: (bool, bool)) -> Self {
        self.slots.insert(
            selector,
            Slot {
                rights,
                limit,
                readable: rw.0,
                writable: rw.1,
            },
        );
        self
    }

    fn slot(&self, selector: Selector) -> Slot {
        self.detail_queries.borrow_mut().push(selector.to_u16());
        self.slots[&selector.to_u16()]
    }

    /// A typical Linux `x86_64` GDT.
    fn linux_gdt() -> Self {
        Self::default()
            .with(0x08, 0x00AF_9B00, 0xFFFF_FFFF, (true, false)) // kernel CS32
            .with(0x10, 0x00AF_9B00, 0xFFFF_FFFF, (true, false)) // kernel CS
            .with(0x18, 0x00CF_9300, 0xFFFF_FFFF, (true, true)) // kernel DS
            .with(0x23, 0x00CF_FB00, 0xFFFF_FFFF, (true, false)) // user CS32
            .with(0x2b, 0x00CF_F300, 0xFFFF_FFFF, (true, true)) // user DS
            .with(0x33, 0x00AF_FB00, 0xFFFF_FFFF, (true, false)) // user CS
            .with(0x40, 0x0000_8B00, 0x0000_206F, (false, false)) // TSS
            .with(0x78, 0x0040_F500, 0x0000_0001, (true, false)) // per-cpu
    }
}

impl DescriptorProbe for FakeDescriptors {
    fn is_valid(&self, selector: Selector) -> bool {
        *self.validity_queries.borrow_mut() += 1;
        self.slots.contains_key(&selector.to_u16())
    }

    fn access_rights(&self, selector: Selector) -> AccessRights {
        AccessRights::from_bits(self.slot(selector).rights)
    }

    fn segment_limit(&self, selector: Selector) -> u32 {
        self.slot(selector).limit
    }

    fn is_readable(&self, selector: Selector) -> bool {
        self.slot(selector).readable
    }

    fn is_writable(&self, selector: Selector) -> bool {
        self.slot(selector).writable
    }
}

#[test]
fn gdt_scan_reports_only_valid_selectors() {
    let probe = FakeDescriptors::linux_gdt();
    let selectors: Vec<u16> = scan(&probe, ScanRange::GDT)
        .map(|r| r.selector.to_u16())
        .collect();

    // RPL-carrying selectors (0x23, 0x2b, 0x33) are never candidates in the
    // stride-8 walk.
    assert_eq!(selectors, vec![0x08, 0x10, 0x18, 0x40, 0x78]);
    assert_eq!(*probe.validity_queries.borrow(), 8192);
}

#[test]
fn invalid_selectors_are_never_probed_further() {
    let probe = FakeDescriptors::linux_gdt();
    let _ = scan(&probe, ScanRange::GDT).count();

    let detail = probe.detail_queries.borrow();
    assert!(detail.iter().all(|s| probe.slots.contains_key(s)));
    // lar, lsl, verr, verw per valid selector.
    assert_eq!(detail.len(), 5 * 4);
}

#[test]
fn ldt_scan_starts_at_four() {
    let probe = FakeDescriptors::default()
        .with(0x04, 0x0040_F300, 0x0000_FFFF, (true, true))
        .with(0x0c, 0x0040_FB00, 0x0000_FFFF, (true, false))
        .with(0x08, 0x00AF_9B00, 0xFFFF_FFFF, (true, false));

    let reports: Vec<_> = scan(&probe, ScanRange::LDT).collect();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].selector.to_u16(), 0x04);
    assert_eq!(reports[0].index(), 0);
    assert_eq!(reports[1].selector.to_u16(), 0x0c);
    assert_eq!(reports[1].index(), 1);
    assert_eq!(reports[1].decoded.width, Some(CodeWidth::Bits32));
    assert_eq!(*probe.validity_queries.borrow(), 8192);
}

#[test]
fn scanning_is_restartable() {
    let probe = FakeDescriptors::linux_gdt();
    let first: Vec<_> = scan(&probe, ScanRange::GDT).collect();
    let second: Vec<_> = scan(&probe, ScanRange::GDT).collect();
    assert_eq!(first, second);

    let scanner = scan(&probe, ScanRange::GDT);
    let cloned = scanner.clone();
    assert_eq!(scanner.count(), cloned.count());
}

#[test]
fn probe_selector_reports_invalid() {
    let probe = FakeDescriptors::linux_gdt();
    let sel = Selector::from_u16(0x50);
    assert_eq!(
        probe_selector(&probe, sel),
        Err(DescriptorError::InvalidSelector(sel))
    );
    assert!(probe.detail_queries.borrow().is_empty());
}

#[test]
fn rendered_rows_for_linux_gdt() {
    let probe = FakeDescriptors::linux_gdt();
    let rows: Vec<String> = scan(&probe, ScanRange::GDT).map(|r| r.to_string()).collect();

    assert_eq!(
        rows[1],
        "2  0x010: LAR=0x00af9b00 LSL=0xffffffff r\n   \
         exec/read,accessed dpl=0 granularity=page present 64-bit,code reserved-bit=clear"
    );
    assert_eq!(
        rows[3],
        "8  0x040: LAR=0x00008b00 LSL=0x0000206f\n   \
         Busy 32-bit TSS dpl=0 granularity=byte present reserved-bit=clear"
    );
    assert_eq!(
        rows[4],
        "15 0x078: LAR=0x0040f500 LSL=0x00000001 r\n   \
         read-only,expand-down,accessed dpl=3 granularity=byte present reserved-bit=clear"
    );
}

#[test]
fn custom_range_counts_candidates() {
    let probe = FakeDescriptors::linux_gdt();
    let range = ScanRange::new(0, 0x20, 8);
    assert_eq!(range.len(), 4);
    assert_eq!(scan(&probe, range).count(), 3);
    assert_eq!(*probe.validity_queries.borrow(), 4);
}
