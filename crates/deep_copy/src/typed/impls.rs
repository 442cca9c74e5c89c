//! `DeepCopy` for standard library types.

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};
use std::marker::PhantomData;
use std::rc::{Rc, Weak as RcWeak};
use std::sync::{mpsc, Arc, Mutex, RwLock, Weak as ArcWeak};

use super::{CopyContext, DeepCopy};
use crate::{CopyError, Kind, UnsupportedKindError};

// Scalars

macro_rules! scalar {
    ($($ty:ty),* $(,)?) => {$(
        impl DeepCopy for $ty {
            const KIND: Kind = Kind::Scalar;
            const EXACT_PLACEHOLDER: bool = true;

            #[inline]
            fn deep_copy(&self, _: &mut CopyContext) -> Result<Self, CopyError> {
                Ok(*self)
            }

            #[inline]
            fn placeholder(&self) -> Option<Self> {
                Some(*self)
            }
        }
    )*};
}

scalar!(
    bool,
    char,
    (),
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    &'static str,
);

impl DeepCopy for String {
    const KIND: Kind = Kind::Scalar;
    const EXACT_PLACEHOLDER: bool = true;

    fn deep_copy(&self, _: &mut CopyContext) -> Result<Self, CopyError> {
        Ok(self.clone())
    }

    fn placeholder(&self) -> Option<Self> {
        Some(self.clone())
    }
}

// Immutable shared text: copies share the allocation.
macro_rules! shared_str {
    ($($ptr:ident),*) => {$(
        impl DeepCopy for $ptr<str> {
            const KIND: Kind = Kind::Scalar;
            const EXACT_PLACEHOLDER: bool = true;

            fn deep_copy(&self, _: &mut CopyContext) -> Result<Self, CopyError> {
                Ok($ptr::clone(self))
            }

            fn placeholder(&self) -> Option<Self> {
                Some($ptr::clone(self))
            }
        }
    )*};
}

shared_str!(Rc, Arc);

impl<T: ?Sized> DeepCopy for PhantomData<T> {
    const KIND: Kind = Kind::Scalar;
    const EXACT_PLACEHOLDER: bool = true;

    fn deep_copy(&self, _: &mut CopyContext) -> Result<Self, CopyError> {
        Ok(PhantomData)
    }

    fn placeholder(&self) -> Option<Self> {
        Some(PhantomData)
    }
}

// Owning pointers and wrappers

impl<T: DeepCopy> DeepCopy for Box<T> {
    const KIND: Kind = Kind::Pointer;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        cx.nested(|cx| (**self).deep_copy(cx)).map(Box::new)
    }

    fn placeholder(&self) -> Option<Self> {
        (**self).placeholder().map(Box::new)
    }
}

impl<T: DeepCopy> DeepCopy for Option<T> {
    const KIND: Kind = T::KIND;
    const REFILLABLE: bool = T::REFILLABLE;
    const EXACT_PLACEHOLDER: bool = T::EXACT_PLACEHOLDER;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        self.as_ref().map(|inner| inner.deep_copy(cx)).transpose()
    }

    /// Keeps `Some` when the contents can stand in for their copy or be
    /// refilled later; otherwise `None`, to be overwritten as a whole.
    fn placeholder(&self) -> Option<Self> {
        match self {
            Some(inner) if T::EXACT_PLACEHOLDER || T::REFILLABLE => {
                inner.placeholder().map(Some)
            }
            _ => Some(None),
        }
    }

    fn refill(&self, target: &Self, cx: &mut CopyContext) -> Result<(), CopyError> {
        match (self, target) {
            (Some(inner), Some(slot)) if T::REFILLABLE => inner.refill(slot, cx),
            (Some(_), Some(_)) if T::EXACT_PLACEHOLDER => Ok(()),
            (None, None) => Ok(()),
            _ => Err(CopyError::unbuildable(type_name::<Self>())),
        }
    }
}

impl<T: DeepCopy> DeepCopy for RefCell<T> {
    const KIND: Kind = T::KIND;
    const REFILLABLE: bool = true;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        let inner = self
            .try_borrow()
            .map_err(|_| CopyError::borrowed(type_name::<Self>()))?;
        inner.deep_copy(cx).map(RefCell::new)
    }

    fn placeholder(&self) -> Option<Self> {
        self.try_borrow().ok()?.placeholder().map(RefCell::new)
    }

    fn refill(&self, target: &Self, cx: &mut CopyContext) -> Result<(), CopyError> {
        let copied = self
            .try_borrow()
            .map_err(|_| CopyError::borrowed(type_name::<Self>()))?
            .deep_copy(cx)?;
        *target
            .try_borrow_mut()
            .map_err(|_| CopyError::borrowed(type_name::<Self>()))? = copied;
        Ok(())
    }
}

impl<T: DeepCopy + Copy> DeepCopy for Cell<T> {
    const KIND: Kind = T::KIND;
    const REFILLABLE: bool = true;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        self.get().deep_copy(cx).map(Cell::new)
    }

    fn placeholder(&self) -> Option<Self> {
        Some(Cell::new(self.get()))
    }

    fn refill(&self, target: &Self, cx: &mut CopyContext) -> Result<(), CopyError> {
        target.set(self.get().deep_copy(cx)?);
        Ok(())
    }
}

// Shared pointers
//
// The allocation address is the identity. A placeholder is recorded before
// the contents are copied when the pointee can be refilled in place, so
// cycles through `RefCell`/`Cell` resolve to the copy under construction.
// Without that, meeting the allocation again mid-copy is an unbuildable
// cycle.

macro_rules! shared {
    ($ptr:ident) => {
        impl<T: DeepCopy + 'static> DeepCopy for $ptr<T> {
            const KIND: Kind = Kind::Pointer;

            fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
                let addr = $ptr::as_ptr(self) as usize;
                if let Some(done) = cx.lookup::<Self>(addr) {
                    return Ok(done);
                }

                if T::REFILLABLE {
                    if let Some(seed) = (**self).placeholder() {
                        let fresh = $ptr::new(seed);
                        cx.record(addr, $ptr::clone(&fresh));
                        cx.nested(|cx| (**self).refill(&fresh, cx))?;
                        return Ok(fresh);
                    }
                }

                if !cx.begin::<Self>(addr) {
                    return Err(CopyError::unbuildable(type_name::<Self>()));
                }
                let inner = cx.nested(|cx| (**self).deep_copy(cx));
                cx.finish::<Self>(addr);
                let fresh = $ptr::new(inner?);
                cx.record(addr, $ptr::clone(&fresh));
                Ok(fresh)
            }

            /// The source handle itself; only ever held until refilled.
            fn placeholder(&self) -> Option<Self> {
                Some($ptr::clone(self))
            }
        }
    };
}

shared!(Rc);
shared!(Arc);

// Weak pointers
//
// A live weak pointer follows its allocation through the strong copy, so it
// ends up pointing at the same copy as every strong alias. The strong copy
// is kept alive by the context until the copy finishes. A dangling one
// copies to a fresh dangling pointer.

macro_rules! weak {
    ($weak:ident, $ptr:ident) => {
        impl<T: DeepCopy + 'static> DeepCopy for $weak<T> {
            const KIND: Kind = Kind::Pointer;

            fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
                match self.upgrade() {
                    Some(strong) => Ok($ptr::downgrade(&strong.deep_copy(cx)?)),
                    None => Ok($weak::new()),
                }
            }

            fn placeholder(&self) -> Option<Self> {
                Some($weak::new())
            }
        }
    };
}

weak!(RcWeak, Rc);
weak!(ArcWeak, Arc);

// Sequences

impl<T: DeepCopy> DeepCopy for Vec<T> {
    const KIND: Kind = Kind::Slice;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        cx.nested(|cx| {
            let mut out = Vec::with_capacity(self.capacity());
            for item in self {
                out.push(item.deep_copy(cx)?);
            }
            Ok(out)
        })
    }

    fn placeholder(&self) -> Option<Self> {
        Some(Vec::new())
    }
}

impl<T: DeepCopy> DeepCopy for VecDeque<T> {
    const KIND: Kind = Kind::Slice;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        cx.nested(|cx| {
            let mut out = VecDeque::with_capacity(self.capacity());
            for item in self {
                out.push_back(item.deep_copy(cx)?);
            }
            Ok(out)
        })
    }

    fn placeholder(&self) -> Option<Self> {
        Some(VecDeque::new())
    }
}

impl<T: DeepCopy, const N: usize> DeepCopy for [T; N] {
    const KIND: Kind = Kind::Array;
    const EXACT_PLACEHOLDER: bool = T::EXACT_PLACEHOLDER;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        let items = self
            .iter()
            .map(|item| item.deep_copy(cx))
            .collect::<Result<Vec<_>, _>>()?;
        <[T; N]>::try_from(items).map_err(|_| CopyError::ShapeMismatch {
            type_name: type_name::<Self>().to_owned(),
            found: "array",
        })
    }

    fn placeholder(&self) -> Option<Self> {
        let items = self
            .iter()
            .map(DeepCopy::placeholder)
            .collect::<Option<Vec<_>>>()?;
        <[T; N]>::try_from(items).ok()
    }
}

// Tuples

macro_rules! tuple {
    ($($name:ident),+) => {
        impl<$($name: DeepCopy),+> DeepCopy for ($($name,)+) {
            const KIND: Kind = Kind::Struct;
            const EXACT_PLACEHOLDER: bool = true $(&& $name::EXACT_PLACEHOLDER)+;

            #[allow(non_snake_case)]
            fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
                let ($($name,)+) = self;
                Ok(($($name.deep_copy(cx)?,)+))
            }

            #[allow(non_snake_case)]
            fn placeholder(&self) -> Option<Self> {
                let ($($name,)+) = self;
                Some(($($name.placeholder()?,)+))
            }
        }
    };
}

tuple!(A);
tuple!(A, B);
tuple!(A, B, C);
tuple!(A, B, C, D);
tuple!(A, B, C, D, E);
tuple!(A, B, C, D, E, F);

// Maps and sets. Keys are copied too.

impl<K, V, S> DeepCopy for HashMap<K, V, S>
where
    K: DeepCopy + Eq + Hash,
    V: DeepCopy,
    S: BuildHasher + Clone,
{
    const KIND: Kind = Kind::Map;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        cx.nested(|cx| {
            let mut out = HashMap::with_capacity_and_hasher(self.len(), self.hasher().clone());
            for (key, value) in self {
                out.insert(key.deep_copy(cx)?, value.deep_copy(cx)?);
            }
            Ok(out)
        })
    }

    fn placeholder(&self) -> Option<Self> {
        Some(HashMap::with_hasher(self.hasher().clone()))
    }
}

impl<T, S> DeepCopy for HashSet<T, S>
where
    T: DeepCopy + Eq + Hash,
    S: BuildHasher + Clone,
{
    const KIND: Kind = Kind::Map;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        cx.nested(|cx| {
            let mut out = HashSet::with_capacity_and_hasher(self.len(), self.hasher().clone());
            for item in self {
                out.insert(item.deep_copy(cx)?);
            }
            Ok(out)
        })
    }

    fn placeholder(&self) -> Option<Self> {
        Some(HashSet::with_hasher(self.hasher().clone()))
    }
}

impl<K: DeepCopy + Ord, V: DeepCopy> DeepCopy for BTreeMap<K, V> {
    const KIND: Kind = Kind::Map;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        cx.nested(|cx| {
            let mut out = BTreeMap::new();
            for (key, value) in self {
                out.insert(key.deep_copy(cx)?, value.deep_copy(cx)?);
            }
            Ok(out)
        })
    }

    fn placeholder(&self) -> Option<Self> {
        Some(BTreeMap::new())
    }
}

impl<T: DeepCopy + Ord> DeepCopy for BTreeSet<T> {
    const KIND: Kind = Kind::Map;

    fn deep_copy(&self, cx: &mut CopyContext) -> Result<Self, CopyError> {
        cx.nested(|cx| {
            let mut out = BTreeSet::new();
            for item in self {
                out.insert(item.deep_copy(cx)?);
            }
            Ok(out)
        })
    }

    fn placeholder(&self) -> Option<Self> {
        Some(BTreeSet::new())
    }
}

// Unsupported: code, synchronization, and live I/O handles.

macro_rules! unsupported {
    ($([$($generic:ident),*] $ty:ty),* $(,)?) => {$(
        impl<$($generic),*> DeepCopy for $ty {
            const KIND: Kind = Kind::Unsupported;

            fn deep_copy(&self, _: &mut CopyContext) -> Result<Self, CopyError> {
                Err(UnsupportedKindError::new(Kind::Unsupported, type_name::<Self>()).into())
            }
        }
    )*};
}

unsupported!(
    [R] fn() -> R,
    [A, R] fn(A) -> R,
    [A, B, R] fn(A, B) -> R,
    [A, B, C, R] fn(A, B, C) -> R,
    [T] Mutex<T>,
    [T] RwLock<T>,
    [T] mpsc::Sender<T>,
    [T] mpsc::SyncSender<T>,
    [T] mpsc::Receiver<T>,
    [] std::fs::File,
    [] std::net::TcpStream,
    [] std::net::TcpListener,
    [] std::net::UdpSocket,
);
