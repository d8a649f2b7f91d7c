//! Typed sequence operations.
//!
//! Each operation is generic over the element type. Structural equality
//! (`contains`, `remove`, `replace`) goes through `PartialEq`; membership
//! checks against a whole set of values (`unique`, `intersect`, `concat`)
//! go through [`Keyed`] and a hash set of keys.
//!
//! Mutating operations take `&mut Vec<T>` and return how many elements
//! they removed, appended or replaced.
//!
//! ```
//! use slicekit::seq;
//! use slicekit::Needle;
//!
//! let mut names = vec!["b", "a", "b", "c"];
//! seq::unique(&mut names);
//! assert_eq!(names, vec!["b", "a", "c"]);
//!
//! seq::remove(&mut names, Needle::Many(&["a", "x"]));
//! assert_eq!(names, vec!["b", "c"]);
//! assert!(seq::contains(&names, Needle::One(&"c")));
//! ```

use rustc_hash::FxHashSet;

use crate::filter;
use crate::filter::Exclusions;
use crate::key::key_set;
use crate::key::Keyed;

/// What to look for: one value, or any of several.
#[derive(Debug)]
pub enum Needle<'a, T> {
    One(&'a T),
    Many(&'a [T]),
}

impl<T> Clone for Needle<'_, T> {
    fn clone(&self) -> Self {
        return *self;
    }
}

impl<T> Copy for Needle<'_, T> {}

impl<'a, T> Needle<'a, T> {
    /// The needle values as a slice.
    pub fn as_slice(&self) -> &'a [T] {
        match *self {
            Needle::One(value) => return std::slice::from_ref(value),
            Needle::Many(values) => return values,
        }
    }
}

/// Return true if `source` contains the needle, or any of the needles.
pub fn contains<T: PartialEq>(source: &[T], needle: Needle<'_, T>) -> bool {
    match needle {
        Needle::One(value) => return source.iter().any(|item| item == value),
        Needle::Many(values) => {
            return values.iter().any(|value| contains(source, Needle::One(value)));
        }
    }
}

/// Mark every position of `source` equal to any needle value.
pub fn matching<T: PartialEq>(source: &[T], needle: Needle<'_, T>) -> Exclusions {
    let values = needle.as_slice();
    let mut marked = Exclusions::new();
    for (index, item) in source.iter().enumerate() {
        if values.iter().any(|value| value == item) {
            marked.insert(index);
        }
    }
    return marked;
}

/// Remove every element equal to the needle, or to any of the needles.
pub fn remove<T: PartialEq>(source: &mut Vec<T>, needle: Needle<'_, T>) -> usize {
    let marked = matching(source, needle);
    filter::retain_except(source, &marked);
    return marked.len();
}

/// Keep the first occurrence of each key.
pub fn unique<T: Keyed>(source: &mut Vec<T>) -> usize {
    let mut seen = FxHashSet::default();
    let mut marked = Exclusions::new();
    for (index, item) in source.iter().enumerate() {
        if !seen.insert(item.key()) {
            marked.insert(index);
        }
    }
    filter::retain_except(source, &marked);
    return marked.len();
}

/// Keep only the elements of `source` whose key occurs in `other`.
///
/// Only `source` changes. Duplicates in `source` survive as long as their
/// key is in `other`.
pub fn intersect<T: Keyed>(source: &mut Vec<T>, other: &[T]) -> usize {
    let keys = key_set(other);
    let mut marked = Exclusions::new();
    for (index, item) in source.iter().enumerate() {
        if !keys.contains(&item.key()) {
            marked.insert(index);
        }
    }
    filter::retain_except(source, &marked);
    return marked.len();
}

/// Append the addend values whose key is not yet in `dest`.
///
/// A key is appended at most once per call, so repeating the same call
/// changes nothing.
pub fn concat<T: Keyed + Clone>(dest: &mut Vec<T>, addend: Needle<'_, T>) -> usize {
    let mut keys = key_set(dest);
    let before = dest.len();
    for value in addend.as_slice() {
        if keys.insert(value.key()) {
            dest.push(value.clone());
        }
    }
    return dest.len() - before;
}

/// Overwrite every element equal to `old` with a copy of `new`.
pub fn replace<T: PartialEq + Clone>(source: &mut [T], old: &T, new: T) -> usize {
    let mut replaced = 0;
    for item in source.iter_mut() {
        if item == old {
            *item = new.clone();
            replaced += 1;
        }
    }
    return replaced;
}

/// Concatenate the inner sequences, one level deep.
pub fn flatten<T: Clone, S: AsRef<[T]>>(outer: &[S]) -> Vec<T> {
    let len = outer.iter().map(|inner| inner.as_ref().len()).sum();
    let mut out = Vec::with_capacity(len);
    for inner in outer {
        out.extend_from_slice(inner.as_ref());
    }
    return out;
}

/// The first smallest element.
pub fn shortest<T: Ord>(source: &[T]) -> Option<&T> {
    return source.iter().min();
}

/// The first string of minimal byte length.
pub fn shortest_str<S: AsRef<str>>(source: &[S]) -> Option<&S> {
    return source.iter().min_by_key(|item| item.as_ref().len());
}
