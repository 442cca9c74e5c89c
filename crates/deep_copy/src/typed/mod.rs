//! Deep copies of ordinary Rust values.
//!
//! [`DeepCopy`] is implemented for the standard library's containers and
//! smart pointers and derived for user types with `#[derive(DeepCopy)]`.
//! `Rc`/`Arc` play the role of pointers: two handles to one allocation copy
//! to two handles to one new allocation, and `Weak` handles follow them.
//! Cycles are rebuilt in two phases: the copy of a shared allocation is
//! created from a placeholder and recorded, then refilled through its
//! `RefCell`/`Cell` fields, so back references resolve to it.
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! use deep_copy::DeepCopy;
//!
//! #[derive(DeepCopy)]
//! struct Account {
//!     owner: String,
//!     balance: Rc<RefCell<i64>>,
//! }
//!
//! let shared = Rc::new(RefCell::new(100));
//! let accounts = vec![
//!     Account { owner: "a".into(), balance: Rc::clone(&shared) },
//!     Account { owner: "b".into(), balance: Rc::clone(&shared) },
//! ];
//!
//! let copy = deep_copy::copy(&accounts).unwrap();
//! *copy[0].balance.borrow_mut() += 1;
//!
//! assert_eq!(*copy[1].balance.borrow(), 101);
//! assert_eq!(*shared.borrow(), 100);
//! ```

mod context;
mod dynamic;
mod impls;

use tracing::debug;

use crate::{CopyConfig, CopyError, Kind};

pub use context::CopyContext;
pub use dynamic::DynDeepCopy;

/// A type whose values can be copied with no shared mutable storage.
pub trait DeepCopy: Sized {
    /// Structural kind of the type.
    const KIND: Kind;

    /// Whether [`refill`](Self::refill) can overwrite a value in place
    /// through a shared reference.
    ///
    /// Shared allocations of such types are copied in two phases: a
    /// [`placeholder`](Self::placeholder) is allocated and recorded first,
    /// then refilled, so cycles back to the allocation resolve to it.
    const REFILLABLE: bool = false;

    /// Whether [`placeholder`](Self::placeholder) already returns a complete
    /// copy, so nothing is left to refill. True for scalars and for
    /// by-value aggregates of them.
    const EXACT_PLACEHOLDER: bool = false;

    /// Copy `self`.
    ///
    /// # Errors
    ///
    /// Fails if any part of the value cannot be copied. No partial copy is
    /// returned.
    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError>;

    /// A cheap value of the same type to stand in for the copy while it is
    /// built. `None` if there is no such value.
    fn placeholder(&self) -> Option<Self> {
        None
    }

    /// Overwrite `target` with a copy of `self`.
    ///
    /// # Errors
    ///
    /// As [`deep_copy`](Self::deep_copy). Types that are not
    /// [`REFILLABLE`](Self::REFILLABLE) always fail.
    fn refill(&self, target: &Self, cx: &mut CopyContext) -> Result<(), CopyError> {
        let _ = (target, cx);
        Err(CopyError::unbuildable(std::any::type_name::<Self>()))
    }
}

/// Deep-copy `value` with the default policy.
///
/// # Errors
///
/// See [`copy_with`].
pub fn copy<T: DeepCopy>(value: &T) -> Result<T, CopyError> {
    copy_with(value, &CopyConfig::default())
}

/// Deep-copy `value` under `config`.
///
/// # Errors
///
/// [`CopyError::Unsupported`] if the value reaches a function, channel, lock
/// or I/O handle; [`CopyError::DepthLimitExceeded`] past the configured
/// depth; [`CopyError::UnbuildableCycle`] for a cycle that runs only through
/// immutable shared allocations; [`CopyError::Borrowed`] if a `RefCell` in
/// the value is mutably borrowed.
pub fn copy_with<T: DeepCopy>(value: &T, config: &CopyConfig) -> Result<T, CopyError> {
    let mut cx = CopyContext::new(*config);
    let result = value.deep_copy(&mut cx);
    match &result {
        Ok(_) => debug!(
            ty = std::any::type_name::<T>(),
            shared = cx.shared_count(),
            revisits = cx.revisits(),
            "deep copy complete"
        ),
        Err(err) => debug!(ty = std::any::type_name::<T>(), error = %err, "deep copy failed"),
    }
    result
}
