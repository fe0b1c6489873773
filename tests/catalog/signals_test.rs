//! Signal catalog lookups.

use coroner::signals::{catalog, lookup_signal, signal_label};

const SUPPORTED: [i32; 4] = [libc::SIGSEGV, libc::SIGABRT, libc::SIGBUS, libc::SIGFPE];

#[test]
fn segfault_entry_is_fixed() {
    let entry = lookup_signal(libc::SIGSEGV).expect("SIGSEGV is catalogued");
    assert_eq!(entry.code, libc::SIGSEGV);
    assert_eq!(entry.name, "SIGSEGV");
    assert_eq!(entry.description, "Segmentation fault - invalid memory access");
}

#[test]
fn abort_bus_and_fpe_entries_are_fixed() {
    let abort = lookup_signal(libc::SIGABRT).expect("SIGABRT is catalogued");
    assert_eq!(abort.name, "SIGABRT");
    assert_eq!(abort.description, "Abort signal - abnormal termination");

    let bus = lookup_signal(libc::SIGBUS).expect("SIGBUS is catalogued");
    assert_eq!(bus.name, "SIGBUS");
    assert_eq!(bus.description, "Bus error - invalid memory access alignment");

    let fpe = lookup_signal(libc::SIGFPE).expect("SIGFPE is catalogued");
    assert_eq!(fpe.name, "SIGFPE");
    assert_eq!(fpe.description, "Floating-point exception - arithmetic error");
}

#[test]
fn every_other_signal_is_not_found() {
    for code in 1..=64 {
        if SUPPORTED.contains(&code) {
            continue;
        }
        assert!(lookup_signal(code).is_none(), "signal {code} should not be catalogued");
    }
}

#[test]
fn catalog_has_exactly_four_entries() {
    let codes: Vec<i32> = catalog().iter().map(|e| e.code).collect();
    assert_eq!(codes.len(), 4);
    for code in SUPPORTED {
        assert!(codes.contains(&code));
    }
}

#[test]
fn label_falls_back_to_number() {
    assert_eq!(signal_label(libc::SIGBUS), "SIGBUS");
    assert_eq!(signal_label(libc::SIGKILL), format!("signal {}", libc::SIGKILL));
}
