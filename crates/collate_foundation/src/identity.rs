//! Identity comparison for memoization.
//!
//! [`SameValue`] answers "is this the same value I saw last time" as cheaply
//! as possible. Shared values (`Arc`, persistent collections) compare by
//! allocation, never by content, so a structurally equal but freshly built
//! value counts as different. Plain data compares by value. Floats follow
//! same-value semantics: `NaN` equals `NaN`, `0.0` differs from `-0.0`.

use std::hash::Hash;
use std::sync::Arc;

use crate::collections::{EntityMap, IdList};

/// Cheap identity comparison used as the default memo equality check.
pub trait SameValue {
    /// Returns true if `self` and `other` are the same value.
    fn same_value(&self, other: &Self) -> bool;
}

macro_rules! same_value_by_eq {
    ($($ty:ty),* $(,)?) => {
        $(
            impl SameValue for $ty {
                fn same_value(&self, other: &Self) -> bool {
                    self == other
                }
            }
        )*
    };
}

same_value_by_eq!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    String,
    &'static str,
);

impl SameValue for f32 {
    fn same_value(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits() || (self.is_nan() && other.is_nan())
    }
}

impl SameValue for f64 {
    fn same_value(&self, other: &Self) -> bool {
        self.to_bits() == other.to_bits() || (self.is_nan() && other.is_nan())
    }
}

impl<T: ?Sized> SameValue for Arc<T> {
    fn same_value(&self, other: &Self) -> bool {
        Arc::ptr_eq(self, other)
    }
}

impl<T: SameValue> SameValue for Option<T> {
    fn same_value(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_value(b),
            (None, None) => true,
            _ => false,
        }
    }
}

impl<T: SameValue> SameValue for Vec<T> {
    fn same_value(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(a, b)| a.same_value(b))
    }
}

impl<Id: Clone> SameValue for IdList<Id> {
    fn same_value(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl<Id: Clone + Eq + Hash, T> SameValue for EntityMap<Id, T> {
    fn same_value(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

macro_rules! same_value_tuple {
    ($($name:ident : $idx:tt),+) => {
        impl<$($name: SameValue),+> SameValue for ($($name,)+) {
            fn same_value(&self, other: &Self) -> bool {
                $(self.$idx.same_value(&other.$idx))&&+
            }
        }
    };
}

same_value_tuple!(A: 0);
same_value_tuple!(A: 0, B: 1);
same_value_tuple!(A: 0, B: 1, C: 2);
same_value_tuple!(A: 0, B: 1, C: 2, D: 3);
same_value_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4);
same_value_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5);
same_value_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6);
same_value_tuple!(A: 0, B: 1, C: 2, D: 3, E: 4, F: 5, G: 6, H: 7);
