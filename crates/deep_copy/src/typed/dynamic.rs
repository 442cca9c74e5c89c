//! Type-erased values: the interface analog of the typed layer.

use std::any::{type_name, Any};

use super::{CopyContext, DeepCopy};
use crate::{CopyError, Kind};

/// Object-safe face of [`DeepCopy`]. `Box<dyn DynDeepCopy>` holds a value
/// together with its concrete type, and copying it copies the value under
/// that type.
pub trait DynDeepCopy: Any {
    /// Copy the value into a new box of the same concrete type.
    ///
    /// # Errors
    ///
    /// As [`DeepCopy::deep_copy`] for the concrete type.
    fn dyn_deep_copy(&self, cx: &mut CopyContext) -> Result<Box<dyn DynDeepCopy>, CopyError>;

    fn as_any(&self) -> &dyn Any;

    /// Name of the concrete type.
    fn type_name(&self) -> &'static str;
}

impl<T: DeepCopy + 'static> DynDeepCopy for T {
    fn dyn_deep_copy(&self, cx: &mut CopyContext) -> Result<Box<dyn DynDeepCopy>, CopyError> {
        Ok(Box::new(self.deep_copy(cx)?))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        type_name::<T>()
    }
}

impl dyn DynDeepCopy {
    pub fn is<T: Any>(&self) -> bool {
        self.as_any().is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

impl DeepCopy for Box<dyn DynDeepCopy> {
    const KIND: Kind = Kind::Interface;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        // Dispatch on the boxed value, not on the box.
        let inner: &dyn DynDeepCopy = &**self;
        cx.nested(|cx| inner.dyn_deep_copy(cx))
    }
}
