//! Per-address lock registry
//!
//! The live bytes of the host process are global mutable state shared by
//! every patch, detour and thread. This registry maps a target address to
//! a guard mutex; apply, remove and the whole of a call-through hold the
//! lock for their address so togglers of the same location serialize.
//! It does not stop other threads from *executing through* a target
//! mid-transition; that remains the caller's contract.

use crate::core::types::Address;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

lazy_static! {
    static ref ADDRESS_LOCKS: Mutex<HashMap<usize, Arc<Mutex<()>>>> = Mutex::new(HashMap::new());
}

/// Get the guard lock for `address`, creating it on first use.
///
/// Locks are never removed from the registry; one entry per hooked
/// address for the process lifetime.
pub fn lock_for(address: Address) -> Arc<Mutex<()>> {
    let mut map = ADDRESS_LOCKS.lock().unwrap_or_else(|e| e.into_inner());
    map.entry(address.as_usize())
        .or_insert_with(|| Arc::new(Mutex::new(())))
        .clone()
}
