//! Index-filtered copies.
//!
//! `remove`, `unique` and `intersect` all work in two passes: first mark
//! the positions to drop, then rebuild the sequence without them. The
//! marks live in [`Exclusions`]; the rebuild is [`without`] (copying) or
//! [`retain_except`] (in place).

use smallvec::SmallVec;

/// A sorted set of indices to leave out.
///
/// Indices are usually marked in ascending order during a single scan, so
/// insertion is a push in the common case.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Exclusions {
    indices: SmallVec<[usize; 16]>,
}

impl Exclusions {
    pub fn new() -> Exclusions {
        return Exclusions { indices: SmallVec::new() };
    }

    /// Mark an index. Returns false if it was already marked.
    pub fn insert(&mut self, index: usize) -> bool {
        match self.indices.last() {
            None => {
                self.indices.push(index);
                return true;
            }
            Some(&last) if last < index => {
                self.indices.push(index);
                return true;
            }
            _ => {}
        }
        match self.indices.binary_search(&index) {
            Ok(_) => return false,
            Err(at) => {
                self.indices.insert(at, index);
                return true;
            }
        }
    }

    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        return self.indices.binary_search(&index).is_ok();
    }

    #[inline]
    pub fn len(&self) -> usize {
        return self.indices.len();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.indices.is_empty();
    }

    /// Marked indices in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        return self.indices.iter().copied();
    }

    /// Number of marked indices that fall inside a sequence of `len`.
    fn count_below(&self, len: usize) -> usize {
        return self.indices.partition_point(|&index| index < len);
    }
}

impl FromIterator<usize> for Exclusions {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Exclusions {
        let mut exclusions = Exclusions::new();
        exclusions.extend(iter);
        return exclusions;
    }
}

impl Extend<usize> for Exclusions {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.insert(index);
        }
    }
}

/// Copy `source` without the excluded positions, preserving order.
///
/// The result has length and capacity `source.len() - excluded` (counting
/// only exclusions that fall inside `source`).
pub fn without<T: Clone>(source: &[T], excluded: &Exclusions) -> Vec<T> {
    let kept = source.len() - excluded.count_below(source.len());
    let mut out = Vec::with_capacity(kept);
    let mut marks = excluded.indices.iter().copied().peekable();
    for (index, item) in source.iter().enumerate() {
        if marks.peek() == Some(&index) {
            marks.next();
            continue;
        }
        out.push(item.clone());
    }
    return out;
}

/// Rebuild `target` without the excluded positions, moving the kept
/// elements. The capacity shrinks by exactly the number of dropped
/// elements. Leaves `target` as it is when nothing inside it is excluded.
pub fn retain_except<T>(target: &mut Vec<T>, excluded: &Exclusions) {
    let dropped = excluded.count_below(target.len());
    if dropped == 0 {
        return;
    }
    let mut out = Vec::with_capacity(target.capacity() - dropped);
    let mut marks = excluded.indices.iter().copied().peekable();
    for (index, item) in target.drain(..).enumerate() {
        if marks.peek() == Some(&index) {
            marks.next();
            continue;
        }
        out.push(item);
    }
    *target = out;
}
