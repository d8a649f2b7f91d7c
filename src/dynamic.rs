//! Sequence operations over runtime-typed [`Value`]s.
//!
//! Every operation here checks the argument shapes before touching
//! anything, in a fixed order: mutable reference first, then sequence,
//! then element kinds. On error the target is unchanged.
//!
//! Mutating operations take a [`Slot`], which is how a caller says
//! whether it is handing over a mutable reference or only a shared value.
//!
//! ```
//! use slicekit::dynamic;
//! use slicekit::Error;
//! use slicekit::Value;
//!
//! let mut names = Value::from(vec!["b", "a", "b"]);
//! dynamic::unique(&mut names).unwrap();
//! assert_eq!(names, Value::from(vec!["b", "a"]));
//!
//! // A shared value cannot be mutated.
//! assert_eq!(dynamic::unique(&names), Err(Error::NotAPointer));
//! ```
//!
//! # Needles
//!
//! `contains`, `remove` and `concat` accept either one value or a
//! sequence of values. A sequence is read as "any of these" unless the
//! source holds sequences itself and the needle's elements are not
//! sequences; then the needle is a single element of the source.

use std::borrow::Cow;

use crate::error::Error;
use crate::error::Result;
use crate::filter;
use crate::filter::Exclusions;
use crate::seq;
use crate::seq::Needle;
use crate::value::Kind;
use crate::value::Sequence;
use crate::value::Value;

/// An argument that may or may not be mutable.
#[derive(Debug)]
pub enum Slot<'a> {
    /// A shared value; mutating operations reject it.
    Ref(&'a Value),
    /// A mutable reference to a caller-owned value.
    Mut(&'a mut Value),
}

impl<'a> From<&'a Value> for Slot<'a> {
    fn from(value: &'a Value) -> Slot<'a> {
        return Slot::Ref(value);
    }
}

impl<'a> From<&'a mut Value> for Slot<'a> {
    fn from(value: &'a mut Value) -> Slot<'a> {
        return Slot::Mut(value);
    }
}

impl<'a> Slot<'a> {
    fn exclusive(self) -> Result<&'a mut Value> {
        match self {
            Slot::Mut(value) => return Ok(value),
            Slot::Ref(_) => return Err(Error::NotAPointer),
        }
    }
}

fn sequence(value: &Value) -> Result<&Sequence> {
    return value.as_seq().ok_or(Error::NotASequence);
}

fn sequence_mut<'a>(slot: impl Into<Slot<'a>>) -> Result<&'a mut Sequence> {
    let value = slot.into().exclusive()?;
    return value.as_seq_mut().ok_or(Error::NotASequence);
}

/// Expand a needle into the individual values it stands for, given the
/// element kind of the sequence it is matched against.
fn needles<'v>(elem: Kind, needle: &'v Value, out: &mut Vec<&'v Value>) {
    match needle {
        Value::Seq(inner) if elem == Kind::Seq => {
            if inner.elem() == Kind::Seq {
                out.extend(inner.iter());
            } else {
                out.push(needle);
            }
        }
        Value::Seq(inner) => {
            for item in inner {
                needles(elem, item, out);
            }
        }
        _ => out.push(needle),
    }
}

fn resolve(elem: Kind, needle: &Value) -> Vec<&Value> {
    let mut out = Vec::new();
    needles(elem, needle, &mut out);
    return out;
}

/// Return true if `source` contains the needle, or any value of a
/// sequence needle. Values of another kind are never found.
pub fn contains(source: &Value, needle: &Value) -> Result<bool> {
    let source = sequence(source)?;
    let found = resolve(source.elem(), needle)
        .into_iter()
        .any(|value| seq::contains(source.items(), Needle::One(value)));
    return Ok(found);
}

/// Remove every element equal to the needle, or to any value of a
/// sequence needle.
///
/// Every needle value must have the source's element kind; the kinds are
/// checked before anything is removed.
pub fn remove<'a>(source: impl Into<Slot<'a>>, needle: &Value) -> Result<()> {
    let source = sequence_mut(source)?;
    let values = resolve(source.elem(), needle);
    if values.iter().any(|value| value.kind() != source.elem()) {
        return Err(Error::TypeMismatch);
    }
    let mut marked = Exclusions::new();
    for value in values {
        marked.extend(seq::matching(source.items(), Needle::One(value)).iter());
    }
    filter::retain_except(source.items_mut(), &marked);
    return Ok(());
}

/// Keep the first occurrence of each distinct element.
pub fn unique<'a>(source: impl Into<Slot<'a>>) -> Result<()> {
    let source = sequence_mut(source)?;
    seq::unique(source.items_mut());
    return Ok(());
}

/// Keep only the elements of `source` that also occur in `other`.
pub fn intersect<'a>(source: impl Into<Slot<'a>>, other: &Value) -> Result<()> {
    let source = sequence_mut(source)?;
    let other = sequence(other)?;
    seq::intersect(source.items_mut(), other.items());
    return Ok(());
}

/// Append the addend, or the values of a sequence addend, skipping
/// values already present.
///
/// The addend resolves like a `remove` needle, and every resolved value
/// must have the destination's element kind.
pub fn concat<'a>(dest: impl Into<Slot<'a>>, addend: &Value) -> Result<()> {
    let dest = sequence_mut(dest)?;
    let elem = dest.elem();
    let values = resolve(elem, addend);
    if values.iter().any(|value| value.kind() != elem) {
        return Err(Error::TypeMismatch);
    }
    let values: Vec<Value> = values.into_iter().cloned().collect();
    seq::concat(dest.items_mut(), Needle::Many(&values));
    return Ok(());
}

/// Overwrite every element equal to `old` with `new`.
pub fn replace<'a>(source: impl Into<Slot<'a>>, old: &Value, new: Value) -> Result<()> {
    let source = sequence_mut(source)?;
    if new.kind() != source.elem() {
        return Err(Error::TypeMismatch);
    }
    seq::replace(source.items_mut(), old, new);
    return Ok(());
}

/// Concatenate a sequence of sequences, one level deep.
///
/// Returns [`Cow::Owned`] with the flattened sequence, or
/// [`Cow::Borrowed`] with the input unchanged when it is not a non-empty
/// sequence of sequences, or when its non-empty inner sequences disagree
/// on element kind.
pub fn flatten(value: &Value) -> Cow<'_, Value> {
    let Value::Seq(outer) = value else {
        return Cow::Borrowed(value);
    };
    let mut inners = Vec::with_capacity(outer.len());
    for item in outer {
        match item {
            Value::Seq(inner) => inners.push(inner.items()),
            _ => return Cow::Borrowed(value),
        }
    }
    let Some(first) = outer.iter().filter_map(Value::as_seq).next() else {
        return Cow::Borrowed(value);
    };
    let elem = outer
        .iter()
        .filter_map(Value::as_seq)
        .find(|inner| !inner.is_empty())
        .map_or(first.elem(), Sequence::elem);
    let agrees = outer
        .iter()
        .filter_map(Value::as_seq)
        .all(|inner| inner.is_empty() || inner.elem() == elem);
    if !agrees {
        return Cow::Borrowed(value);
    }
    let items = seq::flatten(&inners);
    return Cow::Owned(Value::Seq(Sequence::trusted(elem, items)));
}

/// The first shortest string of a string sequence, or the first smallest
/// number of a numeric sequence. Any other sequence yields its first
/// element; an empty sequence yields `None`.
pub fn shortest(source: &Value) -> Result<Option<Value>> {
    let source = sequence(source)?;
    let items = source.items();
    let found = match source.elem() {
        Kind::Str => seq::shortest_str(&strings(items)).map(|entry| &items[entry.1]),
        Kind::Int | Kind::Uint | Kind::Float => first_min(items),
        _ => items.first(),
    };
    return Ok(found.cloned());
}

/// Pair each string with its index, so the winner can be mapped back.
fn strings(items: &[Value]) -> Vec<Indexed<'_>> {
    let mut out = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if let Value::Str(text) = item {
            out.push(Indexed(text.as_str(), index));
        }
    }
    return out;
}

#[derive(Clone, Copy)]
struct Indexed<'a>(&'a str, usize);

impl AsRef<str> for Indexed<'_> {
    fn as_ref(&self) -> &str {
        return self.0;
    }
}

fn first_min(items: &[Value]) -> Option<&Value> {
    let mut best: Option<&Value> = None;
    for item in items {
        best = match best {
            Some(current) if !is_nan(current) && !less(item, current) => Some(current),
            _ => Some(item),
        };
    }
    return best;
}

fn is_nan(value: &Value) -> bool {
    return matches!(value, Value::Float(value) if value.is_nan());
}

fn less(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => return a < b,
        (Value::Uint(a), Value::Uint(b)) => return a < b,
        (Value::Float(a), Value::Float(b)) => return a < b,
        _ => return false,
    }
}
