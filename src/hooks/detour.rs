//! Reversible function detours

use crate::core::types::{Address, HookResult};
use crate::hooks::callable::Callable;
use crate::hooks::lock;
use crate::hooks::stub::StubArch;
use crate::memory::MemoryAccessor;

/// A named, reversible redirection of a function's entry point to a hook,
/// with call-through to the original implementation.
///
/// Construction resolves the target and hook callables to addresses,
/// snapshots the prologue bytes that will be overwritten, and encodes the
/// redirect stub. Unlike [`Patch`](crate::hooks::Patch), the applied
/// state is explicit: it flips only when a full-length stub or restore
/// write succeeds.
///
/// The target function must be at least `stub_len()` bytes long and must
/// not be jumped into mid-prologue from elsewhere while the detour
/// exists, or behavior is undefined. Dropping an applied detour restores
/// the original prologue.
pub struct Detour {
    name: String,
    target: Address,
    hook: Address,
    original_bytes: Vec<u8>,
    redirect_stub: Vec<u8>,
    applied: bool,
    accessor: MemoryAccessor,
}

impl Detour {
    /// Create a detour using the default 6-byte `push imm32 / ret` stub.
    ///
    /// Fails if the hook address does not fit a 32-bit push.
    pub fn new(
        target: impl Callable,
        hook: impl Callable,
        name: impl Into<String>,
    ) -> HookResult<Self> {
        Self::with_arch(target, hook, name, StubArch::X86)
    }

    /// Create a detour with an explicit stub architecture.
    pub fn with_arch(
        target: impl Callable,
        hook: impl Callable,
        name: impl Into<String>,
        arch: StubArch,
    ) -> HookResult<Self> {
        let target = target.entry_address();
        let hook = hook.entry_address();
        let redirect_stub = arch.encode(hook)?;
        let accessor = MemoryAccessor::new();
        let original_bytes = accessor.read_bytes(target, redirect_stub.len());

        Ok(Detour {
            name: name.into(),
            target,
            hook,
            original_bytes,
            redirect_stub,
            applied: false,
            accessor,
        })
    }

    /// The name of this detour
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entry point of the hooked function
    pub fn target(&self) -> Address {
        self.target
    }

    /// Entry point of the replacement handler
    pub fn hook(&self) -> Address {
        self.hook
    }

    /// The prologue bytes captured at construction
    pub fn original_bytes(&self) -> &[u8] {
        &self.original_bytes
    }

    /// The encoded redirect stub
    pub fn redirect_stub(&self) -> &[u8] {
        &self.redirect_stub
    }

    /// Explicit applied state, toggled by apply/remove on write success.
    ///
    /// Trustworthy only while apply/remove have not silently failed; the
    /// boolean returns of those calls are the authoritative signal.
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Write the redirect stub over the target prologue.
    ///
    /// Returns true and marks the detour applied iff the full stub was
    /// written; otherwise state is left unchanged.
    pub fn apply(&mut self) -> bool {
        let guard = lock::lock_for(self.target);
        let _locked = guard.lock().unwrap_or_else(|e| e.into_inner());
        if self.write_stub() {
            self.applied = true;
            true
        } else {
            false
        }
    }

    /// Restore the original prologue bytes.
    ///
    /// Returns true and marks the detour removed iff the full restore was
    /// written.
    pub fn remove(&mut self) -> bool {
        let guard = lock::lock_for(self.target);
        let _locked = guard.lock().unwrap_or_else(|e| e.into_inner());
        if self.write_original() {
            self.applied = false;
            true
        } else {
            false
        }
    }

    /// Invoke the original, unhooked function.
    ///
    /// The sequence is: restore the prologue, run `invoke` (which must
    /// call the target's entry point), re-apply the stub, return the
    /// result. The address lock is held for the whole window, so other
    /// togglers of this target serialize; other threads *executing
    /// through* the target during the window still observe the unhooked
    /// function, and that concurrency is the caller's responsibility.
    ///
    /// Write failures in either step are logged rather than surfaced; the
    /// invocation result is always returned, but the detour may be left
    /// removed if the re-apply fails.
    pub fn call_original<R>(&mut self, invoke: impl FnOnce() -> R) -> R {
        let guard = lock::lock_for(self.target);
        let _locked = guard.lock().unwrap_or_else(|e| e.into_inner());

        if self.write_original() {
            self.applied = false;
        } else {
            tracing::warn!(
                name = %self.name,
                target = %self.target,
                "call-through could not restore original bytes"
            );
        }

        let result = invoke();

        if self.write_stub() {
            self.applied = true;
        } else {
            tracing::warn!(
                name = %self.name,
                target = %self.target,
                "call-through could not re-apply stub; detour left removed"
            );
        }

        result
    }

    fn write_stub(&self) -> bool {
        self.accessor.write_bytes(self.target, &self.redirect_stub) == self.redirect_stub.len()
    }

    fn write_original(&self) -> bool {
        !self.original_bytes.is_empty()
            && self.accessor.write_bytes(self.target, &self.original_bytes)
                == self.original_bytes.len()
    }
}

impl Drop for Detour {
    fn drop(&mut self) {
        if self.applied && !self.remove() {
            tracing::warn!(
                name = %self.name,
                target = %self.target,
                "failed to revert detour on drop"
            );
        }
    }
}

impl std::fmt::Debug for Detour {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Detour")
            .field("name", &self.name)
            .field("target", &self.target)
            .field("hook", &self.hook)
            .field("applied", &self.applied)
            .finish()
    }
}
