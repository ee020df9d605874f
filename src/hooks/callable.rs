//! Resolving callables to entry-point addresses
//!
//! A detour is built from two callable entry points. [`Callable`] is the
//! seam that turns a function pointer (or an already-resolved address)
//! into the [`Address`] the detour patches. Function pointers are
//! `'static`, so unlike delegate-based environments there is no separate
//! object whose lifetime must be pinned while the hook is live.

use crate::core::types::Address;

/// Anything that can be resolved to a function entry-point address.
pub trait Callable {
    /// The address of the first instruction of this callable.
    fn entry_address(&self) -> Address;
}

/// Already-resolved addresses pass through unchanged.
impl Callable for Address {
    fn entry_address(&self) -> Address {
        *self
    }
}

macro_rules! impl_callable {
    ($($arg:ident),*) => {
        impl<R, $($arg),*> Callable for fn($($arg),*) -> R {
            fn entry_address(&self) -> Address {
                Address::new(*self as usize)
            }
        }

        impl<R, $($arg),*> Callable for extern "C" fn($($arg),*) -> R {
            fn entry_address(&self) -> Address {
                Address::new(*self as usize)
            }
        }
    };
}

impl_callable!();
impl_callable!(A);
impl_callable!(A, B);
impl_callable!(A, B, C);
impl_callable!(A, B, C, D);
impl_callable!(A, B, C, D, E);
impl_callable!(A, B, C, D, E, F);
