//! Integration tests for reversible byte patches

use memhook::{Address, MemoryAccessor, Patch};
use pretty_assertions::assert_eq;

fn nop_buffer() -> Vec<u8> {
    vec![0x90, 0x90, 0x90]
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn apply_then_remove_restores_pristine_bytes() {
    let mut buf = nop_buffer();
    let addr = Address::from(buf.as_mut_ptr());
    let accessor = MemoryAccessor::new();

    let patch = Patch::new(addr, vec![0xCC, 0xCC, 0xCC], "int3-fill");

    assert!(patch.apply());
    assert!(patch.is_applied());
    assert_eq!(accessor.read_bytes(addr, 3), vec![0xCC, 0xCC, 0xCC]);

    assert!(patch.remove());
    assert!(!patch.is_applied());
    assert_eq!(accessor.read_bytes(addr, 3), vec![0x90, 0x90, 0x90]);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn apply_is_idempotent() {
    let mut buf = nop_buffer();
    let addr = Address::from(buf.as_mut_ptr());
    let accessor = MemoryAccessor::new();

    let patch = Patch::new(addr, vec![0xCC, 0xCC, 0xCC], "idempotent");

    assert!(patch.apply());
    let after_one = accessor.read_bytes(addr, 3);
    assert!(patch.apply());
    assert_eq!(accessor.read_bytes(addr, 3), after_one);

    assert!(patch.remove());
    let after_remove = accessor.read_bytes(addr, 3);
    assert!(patch.remove());
    assert_eq!(accessor.read_bytes(addr, 3), after_remove);
    assert_eq!(after_remove, vec![0x90, 0x90, 0x90]);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn is_applied_tracks_live_memory_not_cached_state() {
    let mut buf = nop_buffer();
    let addr = Address::from(buf.as_mut_ptr());

    let patch = Patch::new(addr, vec![0xCC, 0xCC, 0xCC], "live-check");
    assert!(patch.apply());
    assert!(patch.is_applied());

    // Another actor rewrites the same memory behind the patch's back
    buf[0] = 0x90;
    assert!(!patch.is_applied());

    // Put the patch byte back so drop-revert has something to undo
    buf[0] = 0xCC;
    assert!(patch.is_applied());
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn dropping_an_applied_patch_reverts_memory() {
    let mut buf = nop_buffer();
    let addr = Address::from(buf.as_mut_ptr());
    let accessor = MemoryAccessor::new();

    {
        let patch = Patch::new(addr, vec![0xCC, 0xCC, 0xCC], "scoped");
        assert!(patch.apply());
        assert_eq!(accessor.read_bytes(addr, 3), vec![0xCC, 0xCC, 0xCC]);
    }

    assert_eq!(accessor.read_bytes(addr, 3), vec![0x90, 0x90, 0x90]);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn dropping_an_unapplied_patch_leaves_memory_alone() {
    let buf = vec![0xAB, 0xCD];
    let addr = Address::from(buf.as_ptr());
    let accessor = MemoryAccessor::new();

    {
        let _patch = Patch::new(addr, vec![0x11, 0x22], "never-applied");
    }

    assert_eq!(accessor.read_bytes(addr, 2), vec![0xAB, 0xCD]);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn single_byte_roundtrip() {
    let mut buf = vec![0x7Fu8];
    let addr = Address::from(buf.as_mut_ptr());
    let accessor = MemoryAccessor::new();

    let patch = Patch::new(addr, vec![0x00], "one-byte");
    assert!(patch.apply());
    assert_eq!(accessor.read_bytes(addr, 1), vec![0x00]);
    assert!(patch.remove());
    assert_eq!(accessor.read_bytes(addr, 1), vec![0x7F]);
}

#[test]
#[cfg_attr(miri, ignore = "FFI not supported in Miri")]
fn wide_range_roundtrip() {
    let mut buf: Vec<u8> = (0u8..128).collect();
    let addr = Address::from(buf.as_mut_ptr());
    let accessor = MemoryAccessor::new();

    let replacement = vec![0xEE; 128];
    let patch = Patch::new(addr, replacement.clone(), "wide");
    assert!(patch.apply());
    assert_eq!(accessor.read_bytes(addr, 128), replacement);
    assert!(patch.remove());
    assert_eq!(accessor.read_bytes(addr, 128), (0u8..128).collect::<Vec<u8>>());
}
