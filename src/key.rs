//! Equality keys.
//!
//! `unique`, `intersect` and `concat` decide membership through a hash set
//! of keys rather than through pairwise `PartialEq`. A type opts in by
//! implementing [`Keyed`]. Scalars and strings are their own key. Floats
//! are keyed by their normalized bit pattern. Containers are keyed by the
//! keys of their contents. Structured records are keyed by a
//! [`Fingerprint`], usually through the [`keyed_record!`](crate::keyed_record)
//! macro.

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::hash::Hash;

use rustc_hash::FxHashSet;

use crate::fingerprint::Fingerprint;

/// A value that can produce a hashable equality key.
///
/// Two values with equal keys are treated as duplicates. The key must be
/// deterministic: the same value always yields the same key.
pub trait Keyed {
    type Key: Eq + Hash;

    fn key(&self) -> Self::Key;
}

/// Collect the key set of a slice.
pub fn key_set<T: Keyed>(items: &[T]) -> FxHashSet<T::Key> {
    let mut keys = FxHashSet::default();
    keys.reserve(items.len());
    for item in items {
        keys.insert(item.key());
    }
    return keys;
}

/// Map a float onto a hashable bit pattern.
///
/// `-0.0` and `0.0` share a key, and every NaN shares one key.
#[inline]
pub fn float_bits(value: f64) -> u64 {
    if value == 0.0 {
        return 0.0f64.to_bits();
    }
    if value.is_nan() {
        return f64::NAN.to_bits();
    }
    return value.to_bits();
}

macro_rules! keyed_by_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Keyed for $ty {
                type Key = $ty;

                #[inline]
                fn key(&self) -> $ty {
                    return self.clone();
                }
            }
        )*
    };
}

keyed_by_value!(
    (), bool, char,
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    String,
);

impl<'a> Keyed for &'a str {
    type Key = &'a str;

    #[inline]
    fn key(&self) -> &'a str {
        return *self;
    }
}

impl Keyed for f32 {
    type Key = u64;

    #[inline]
    fn key(&self) -> u64 {
        return float_bits(f64::from(*self));
    }
}

impl Keyed for f64 {
    type Key = u64;

    #[inline]
    fn key(&self) -> u64 {
        return float_bits(*self);
    }
}

impl Keyed for Fingerprint {
    type Key = Fingerprint;

    fn key(&self) -> Fingerprint {
        return self.clone();
    }
}

impl<T: Keyed + ?Sized> Keyed for Box<T> {
    type Key = T::Key;

    fn key(&self) -> T::Key {
        return (**self).key();
    }
}

impl<T: Keyed> Keyed for Option<T> {
    type Key = Option<T::Key>;

    fn key(&self) -> Option<T::Key> {
        return self.as_ref().map(Keyed::key);
    }
}

impl<T: Keyed> Keyed for Vec<T> {
    type Key = Vec<T::Key>;

    fn key(&self) -> Vec<T::Key> {
        return self.iter().map(Keyed::key).collect();
    }
}

impl<T: Keyed, const N: usize> Keyed for [T; N] {
    type Key = [T::Key; N];

    fn key(&self) -> [T::Key; N] {
        return self.each_ref().map(|item| item.key());
    }
}

impl<T: Keyed> Keyed for BTreeSet<T> {
    type Key = Vec<T::Key>;

    fn key(&self) -> Vec<T::Key> {
        return self.iter().map(Keyed::key).collect();
    }
}

impl<K: Keyed, V: Keyed> Keyed for BTreeMap<K, V> {
    type Key = Vec<(K::Key, V::Key)>;

    fn key(&self) -> Vec<(K::Key, V::Key)> {
        return self.iter().map(|(k, v)| (k.key(), v.key())).collect();
    }
}

macro_rules! keyed_tuple {
    ($($name:ident),+) => {
        impl<$($name: Keyed),+> Keyed for ($($name,)+) {
            type Key = ($($name::Key,)+);

            #[allow(non_snake_case)]
            fn key(&self) -> Self::Key {
                let ($($name,)+) = self;
                return ($($name.key(),)+);
            }
        }
    };
}

keyed_tuple!(A);
keyed_tuple!(A, B);
keyed_tuple!(A, B, C);
keyed_tuple!(A, B, C, D);
