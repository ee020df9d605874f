//! Reversible byte patches

use crate::core::types::Address;
use crate::hooks::lock;
use crate::memory::MemoryAccessor;

/// A named, reversible byte-range replacement at a fixed address.
///
/// Construction snapshots the bytes currently at the address; `apply`
/// writes the replacement and `remove` writes the snapshot back. Whether
/// the patch is applied is never cached: [`Patch::is_applied`] re-reads
/// the live bytes, so it stays truthful even if another actor modified
/// the same memory.
///
/// An applied patch never outlives its owner: dropping a `Patch` reverts
/// the live memory if the patch bytes are still present.
pub struct Patch {
    name: String,
    address: Address,
    patch_bytes: Vec<u8>,
    original_bytes: Vec<u8>,
    enabled: bool,
    accessor: MemoryAccessor,
}

impl Patch {
    /// Create a patch for `address`, snapshotting the current bytes.
    ///
    /// If the address is unreadable the snapshot is empty (per the
    /// accessor's fault-softening contract) and a later `remove` cannot
    /// restore anything; validate readability before constructing a patch
    /// over questionable memory.
    pub fn new(address: Address, patch_with: impl Into<Vec<u8>>, name: impl Into<String>) -> Self {
        let accessor = MemoryAccessor::new();
        let patch_bytes = patch_with.into();
        let original_bytes = accessor.read_bytes(address, patch_bytes.len());

        Patch {
            name: name.into(),
            address,
            patch_bytes,
            original_bytes,
            enabled: false,
            accessor,
        }
    }

    /// The name of this patch
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The patched address
    pub fn address(&self) -> Address {
        self.address
    }

    /// The replacement bytes
    pub fn patch_bytes(&self) -> &[u8] {
        &self.patch_bytes
    }

    /// The snapshot taken at construction time
    pub fn original_bytes(&self) -> &[u8] {
        &self.original_bytes
    }

    /// Advisory enabled flag; not consulted by apply/remove
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Set the advisory enabled flag
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Write the patch bytes. Returns true iff the full length was
    /// written; failures never panic.
    pub fn apply(&self) -> bool {
        let guard = lock::lock_for(self.address);
        let _locked = guard.lock().unwrap_or_else(|e| e.into_inner());
        self.accessor.write_bytes(self.address, &self.patch_bytes) == self.patch_bytes.len()
    }

    /// Write the snapshot back. Returns true iff the full length was
    /// written.
    pub fn remove(&self) -> bool {
        let guard = lock::lock_for(self.address);
        let _locked = guard.lock().unwrap_or_else(|e| e.into_inner());
        self.accessor.write_bytes(self.address, &self.original_bytes) == self.original_bytes.len()
    }

    /// Live check: re-reads the target range and compares it with the
    /// patch bytes.
    pub fn is_applied(&self) -> bool {
        !self.patch_bytes.is_empty()
            && self.accessor.read_bytes(self.address, self.patch_bytes.len()) == self.patch_bytes
    }
}

impl Drop for Patch {
    fn drop(&mut self) {
        if self.is_applied() && !self.remove() {
            tracing::warn!(
                name = %self.name,
                address = %self.address,
                "failed to revert patch on drop"
            );
        }
    }
}

impl std::fmt::Debug for Patch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Patch")
            .field("name", &self.name)
            .field("address", &self.address)
            .field("len", &self.patch_bytes.len())
            .field("enabled", &self.enabled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_with(bytes: &[u8]) -> Vec<u8> {
        bytes.to_vec()
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_snapshot_taken_at_construction() {
        let buf = buffer_with(&[0x90, 0x90, 0x90]);
        let addr = Address::from(buf.as_ptr());

        let patch = Patch::new(addr, vec![0xCC, 0xCC, 0xCC], "int3");
        assert_eq!(patch.original_bytes(), &[0x90, 0x90, 0x90]);
        assert_eq!(patch.patch_bytes(), &[0xCC, 0xCC, 0xCC]);
        assert!(!patch.is_applied());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_unreadable_address_gives_empty_snapshot() {
        let patch = Patch::new(Address::new(0x10), vec![0xCC], "bad");
        assert!(patch.original_bytes().is_empty());
        assert!(!patch.is_applied());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_advisory_enabled_flag() {
        let buf = buffer_with(&[0x00]);
        let mut patch = Patch::new(Address::from(buf.as_ptr()), vec![0x01], "flag");
        assert!(!patch.enabled());
        patch.set_enabled(true);
        assert!(patch.enabled());
        // Enabled is advisory only; memory is untouched
        assert!(!patch.is_applied());
    }

    #[test]
    #[cfg_attr(miri, ignore = "FFI not supported in Miri")]
    fn test_debug_format() {
        let buf = buffer_with(&[0x00, 0x00]);
        let patch = Patch::new(Address::from(buf.as_ptr()), vec![0x01, 0x02], "dbg");
        let s = format!("{:?}", patch);
        assert!(s.contains("dbg"));
        assert!(s.contains("len: 2"));
    }
}
