//! Canonical encodings for structured values.
//!
//! A record type has no natural hash key, so it is keyed by a
//! [`Fingerprint`]: the bytes of its canonical encoding. Every scalar is
//! written behind a one-byte type tag, and every string, byte string,
//! sequence and record behind its length or field count. The encoding is
//! therefore prefix-free, and two values of different shape can never
//! produce the same fingerprint.
//!
//! ```
//! use slicekit::keyed_record;
//! use slicekit::Keyed;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Point {
//!     x: f64,
//!     y: f64,
//! }
//!
//! keyed_record!(Point { x, y });
//!
//! let a = Point { x: 1.0, y: 2.0 };
//! let b = Point { x: 1.0, y: 2.0 };
//! assert_eq!(a.key(), b.key());
//! ```

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::key::float_bits;

pub const TAG_UNIT: u8 = 0x00;
pub const TAG_BOOL: u8 = 0x01;
pub const TAG_INT: u8 = 0x02;
pub const TAG_UINT: u8 = 0x03;
pub const TAG_WIDE_INT: u8 = 0x04;
pub const TAG_WIDE_UINT: u8 = 0x05;
pub const TAG_FLOAT: u8 = 0x06;
pub const TAG_CHAR: u8 = 0x07;
pub const TAG_STR: u8 = 0x08;
pub const TAG_BYTES: u8 = 0x09;
pub const TAG_SEQ: u8 = 0x0a;
pub const TAG_TUPLE: u8 = 0x0b;
pub const TAG_NONE: u8 = 0x0c;
pub const TAG_SOME: u8 = 0x0d;
pub const TAG_RECORD: u8 = 0x0e;
pub const TAG_MAP: u8 = 0x0f;
pub const TAG_FINGERPRINT: u8 = 0x10;
pub const TAG_TYPED_SEQ: u8 = 0x11;

/// Domain separator for [`Fingerprint::digest`].
const TYPE_DIGEST: u8 = 0x46;

/// A value with a canonical byte encoding.
pub trait Canonical {
    fn encode(&self, encoder: &mut Encoder);
}

/// Accumulates a canonical encoding.
#[derive(Clone, Debug, Default)]
pub struct Encoder {
    bytes: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Encoder {
        return Encoder { bytes: Vec::new() };
    }

    fn tag(&mut self, tag: u8) {
        self.bytes.push(tag);
    }

    fn len(&mut self, len: usize) {
        self.bytes.extend_from_slice(&(len as u64).to_le_bytes());
    }

    pub fn unit(&mut self) {
        self.tag(TAG_UNIT);
    }

    pub fn bool(&mut self, value: bool) {
        self.tag(TAG_BOOL);
        self.bytes.push(value as u8);
    }

    pub fn int(&mut self, value: i64) {
        self.tag(TAG_INT);
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn uint(&mut self, value: u64) {
        self.tag(TAG_UINT);
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn wide_int(&mut self, value: i128) {
        self.tag(TAG_WIDE_INT);
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    pub fn wide_uint(&mut self, value: u128) {
        self.tag(TAG_WIDE_UINT);
        self.bytes.extend_from_slice(&value.to_le_bytes());
    }

    /// Floats are written with the same normalization as their key, so
    /// `-0.0` and `0.0` encode identically, as do all NaNs.
    pub fn float(&mut self, value: f64) {
        self.tag(TAG_FLOAT);
        self.bytes.extend_from_slice(&float_bits(value).to_le_bytes());
    }

    pub fn char(&mut self, value: char) {
        self.tag(TAG_CHAR);
        self.bytes.extend_from_slice(&(value as u32).to_le_bytes());
    }

    pub fn str(&mut self, value: &str) {
        self.tag(TAG_STR);
        self.len(value.len());
        self.bytes.extend_from_slice(value.as_bytes());
    }

    pub fn bytes(&mut self, value: &[u8]) {
        self.tag(TAG_BYTES);
        self.len(value.len());
        self.bytes.extend_from_slice(value);
    }

    pub fn none(&mut self) {
        self.tag(TAG_NONE);
    }

    pub fn some<T: Canonical + ?Sized>(&mut self, value: &T) {
        self.tag(TAG_SOME);
        value.encode(self);
    }

    /// Start a sequence of `len` elements. The caller encodes exactly
    /// `len` values afterwards.
    pub fn begin_seq(&mut self, len: usize) {
        self.tag(TAG_SEQ);
        self.len(len);
    }

    pub fn seq<T: Canonical>(&mut self, items: &[T]) {
        self.begin_seq(items.len());
        for item in items {
            item.encode(self);
        }
    }

    /// Start a sequence that declares its element type. `elem` is written
    /// before the length, so two empty sequences of different element
    /// types still encode differently.
    pub fn begin_typed_seq(&mut self, elem: u8, len: usize) {
        self.tag(TAG_TYPED_SEQ);
        self.bytes.push(elem);
        self.len(len);
    }

    pub fn begin_tuple(&mut self, len: usize) {
        self.tag(TAG_TUPLE);
        self.len(len);
    }

    pub fn begin_map(&mut self, len: usize) {
        self.tag(TAG_MAP);
        self.len(len);
    }

    /// Start a record called `name` with `fields` fields. The caller
    /// follows with exactly that many [`Encoder::field`] calls.
    pub fn begin_record(&mut self, name: &str, fields: usize) {
        self.tag(TAG_RECORD);
        self.len(name.len());
        self.bytes.extend_from_slice(name.as_bytes());
        self.len(fields);
    }

    pub fn field<T: Canonical + ?Sized>(&mut self, name: &str, value: &T) {
        self.len(name.len());
        self.bytes.extend_from_slice(name.as_bytes());
        value.encode(self);
    }

    pub fn finish(self) -> Fingerprint {
        return Fingerprint(self.bytes);
    }
}

/// The canonical encoding of a value, usable as a hash key.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(Vec<u8>);

/// A blake3 digest of a fingerprint, 32 bytes.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digest(pub [u8; 32]);

impl Fingerprint {
    /// Encode a value.
    pub fn of<T: Canonical + ?Sized>(value: &T) -> Fingerprint {
        let mut encoder = Encoder::new();
        value.encode(&mut encoder);
        return encoder.finish();
    }

    pub fn as_bytes(&self) -> &[u8] {
        return &self.0;
    }

    pub fn len(&self) -> usize {
        return self.0.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.0.is_empty();
    }

    /// A fixed-size digest of the encoding, for display and logging.
    /// Equality of fingerprints is decided on the full bytes, never on
    /// the digest.
    pub fn digest(&self) -> Digest {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[TYPE_DIGEST]);
        hasher.update(&(self.0.len() as u64).to_le_bytes());
        hasher.update(&self.0);
        return Digest(*hasher.finalize().as_bytes());
    }
}

fn hex(bytes: &[u8]) -> String {
    return bytes.iter().map(|b| format!("{:02x}", b)).collect();
}

impl std::fmt::Display for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", hex(&self.0));
    }
}

impl std::fmt::Debug for Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "Digest({})", hex(&self.0));
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let digest = self.digest();
        return write!(f, "Fingerprint({}, {} bytes)", hex(&digest.0[..8]), self.0.len());
    }
}

/// Derive [`Canonical`] and [`Keyed`](crate::Keyed) for a struct.
///
/// Only the listed fields take part in the fingerprint, in the listed
/// order. Every listed field must itself implement [`Canonical`].
#[macro_export]
macro_rules! keyed_record {
    ($name:ident { $($field:ident),* $(,)? }) => {
        impl $crate::fingerprint::Canonical for $name {
            fn encode(&self, encoder: &mut $crate::fingerprint::Encoder) {
                const FIELDS: &[&str] = &[$(stringify!($field)),*];
                encoder.begin_record(stringify!($name), FIELDS.len());
                $( encoder.field(stringify!($field), &self.$field); )*
            }
        }

        impl $crate::key::Keyed for $name {
            type Key = $crate::fingerprint::Fingerprint;

            fn key(&self) -> $crate::fingerprint::Fingerprint {
                return $crate::fingerprint::Fingerprint::of(self);
            }
        }
    };
}

macro_rules! canonical_int {
    ($method:ident as $wide:ty: $($ty:ty),*) => {
        $(
            impl Canonical for $ty {
                fn encode(&self, encoder: &mut Encoder) {
                    encoder.$method(*self as $wide);
                }
            }
        )*
    };
}

canonical_int!(int as i64: i8, i16, i32, i64, isize);
canonical_int!(uint as u64: u8, u16, u32, u64, usize);
canonical_int!(wide_int as i128: i128);
canonical_int!(wide_uint as u128: u128);

impl Canonical for () {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.unit();
    }
}

impl Canonical for bool {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.bool(*self);
    }
}

impl Canonical for char {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.char(*self);
    }
}

impl Canonical for f32 {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.float(f64::from(*self));
    }
}

impl Canonical for f64 {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.float(*self);
    }
}

impl Canonical for str {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.str(self);
    }
}

impl Canonical for String {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.str(self);
    }
}

impl Canonical for Fingerprint {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.tag(TAG_FINGERPRINT);
        encoder.len(self.0.len());
        encoder.bytes.extend_from_slice(&self.0);
    }
}

impl<T: Canonical + ?Sized> Canonical for &T {
    fn encode(&self, encoder: &mut Encoder) {
        (**self).encode(encoder);
    }
}

impl<T: Canonical + ?Sized> Canonical for Box<T> {
    fn encode(&self, encoder: &mut Encoder) {
        (**self).encode(encoder);
    }
}

impl<T: Canonical> Canonical for Option<T> {
    fn encode(&self, encoder: &mut Encoder) {
        match self {
            Some(value) => encoder.some(value),
            None => encoder.none(),
        }
    }
}

impl<T: Canonical> Canonical for [T] {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.seq(self);
    }
}

impl<T: Canonical, const N: usize> Canonical for [T; N] {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.seq(self.as_slice());
    }
}

impl<T: Canonical> Canonical for Vec<T> {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.seq(self.as_slice());
    }
}

impl<T: Canonical> Canonical for BTreeSet<T> {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.begin_seq(self.len());
        for item in self {
            item.encode(encoder);
        }
    }
}

impl<K: Canonical, V: Canonical> Canonical for BTreeMap<K, V> {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.begin_map(self.len());
        for (key, value) in self {
            key.encode(encoder);
            value.encode(encoder);
        }
    }
}

macro_rules! canonical_tuple {
    ($len:expr; $($name:ident),+) => {
        impl<$($name: Canonical),+> Canonical for ($($name,)+) {
            #[allow(non_snake_case)]
            fn encode(&self, encoder: &mut Encoder) {
                let ($($name,)+) = self;
                encoder.begin_tuple($len);
                $( $name.encode(encoder); )+
            }
        }
    };
}

canonical_tuple!(1; A);
canonical_tuple!(2; A, B);
canonical_tuple!(3; A, B, C);
canonical_tuple!(4; A, B, C, D);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Keyed;

    #[derive(Clone, Debug, PartialEq)]
    struct Point {
        x: i32,
        y: i32,
    }

    keyed_record!(Point { x, y });

    #[derive(Clone, Debug, PartialEq)]
    struct Span {
        x: i32,
        y: i32,
    }

    keyed_record!(Span { x, y });

    #[derive(Clone, Debug, PartialEq)]
    struct Label {
        name: String,
        tags: Vec<String>,
        weight: Option<f64>,
    }

    keyed_record!(Label { name, tags, weight });

    #[derive(Clone, Debug, PartialEq)]
    struct Marker;

    keyed_record!(Marker {});

    #[test]
    fn equal_records_share_a_fingerprint() {
        let a = Point { x: 1, y: 2 };
        let b = Point { x: 1, y: 2 };
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), Point { x: 2, y: 1 }.key());
    }

    #[test]
    fn record_name_is_part_of_the_fingerprint() {
        let point = Point { x: 1, y: 2 };
        let span = Span { x: 1, y: 2 };
        assert_ne!(point.key(), span.key());
    }

    #[test]
    fn nested_fields() {
        let a = Label { name: "a".into(), tags: vec!["x".into(), "y".into()], weight: Some(0.5) };
        let mut b = a.clone();
        assert_eq!(a.key(), b.key());
        b.tags.push("z".into());
        assert_ne!(a.key(), b.key());
        b.tags.pop();
        b.weight = None;
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn empty_record() {
        assert_eq!(Marker.key(), Marker.key());
        assert!(!Marker.key().is_empty());
    }

    #[test]
    fn string_boundaries_do_not_collide() {
        // ("ab", "c") and ("a", "bc") concatenate to the same text.
        let a = Fingerprint::of(&("ab", "c"));
        let b = Fingerprint::of(&("a", "bc"));
        assert_ne!(a, b);
    }

    #[test]
    fn shape_is_part_of_the_encoding() {
        let nested = Fingerprint::of(&vec![vec![1u8, 2], vec![3]]);
        let flat = Fingerprint::of(&vec![1u8, 2, 3]);
        assert_ne!(nested, flat);
        assert_ne!(Fingerprint::of(&1i32), Fingerprint::of(&1u32));
        assert_ne!(Fingerprint::of(&Some(0u8)), Fingerprint::of(&0u8));
        assert_ne!(Fingerprint::of("1"), Fingerprint::of(&'1'));
    }

    #[test]
    fn typed_sequences_carry_their_element_type() {
        let mut ints = Encoder::new();
        ints.begin_typed_seq(1, 0);
        let mut strs = Encoder::new();
        strs.begin_typed_seq(2, 0);
        let (ints, strs) = (ints.finish(), strs.finish());
        assert_ne!(ints, strs);
        assert_eq!(ints.as_bytes()[0], TAG_TYPED_SEQ);
        assert_eq!(ints.as_bytes()[1], 1);
        assert_eq!(ints.len(), 10);
    }

    #[test]
    fn integer_widths_share_an_encoding() {
        assert_eq!(Fingerprint::of(&7i8), Fingerprint::of(&7i64));
        assert_eq!(Fingerprint::of(&7u16), Fingerprint::of(&7usize));
    }

    #[test]
    fn digest_is_deterministic() {
        let a = Fingerprint::of(&Point { x: 3, y: 4 });
        let b = Fingerprint::of(&Point { x: 3, y: 4 });
        assert_eq!(a.digest(), b.digest());
        assert_ne!(a.digest(), Fingerprint::of(&Point { x: 4, y: 3 }).digest());
        assert_eq!(a.digest().to_string().len(), 64);
    }

    #[test]
    fn debug_shows_digest_prefix() {
        let fingerprint = Fingerprint::of("hello");
        let text = format!("{:?}", fingerprint);
        assert!(text.starts_with("Fingerprint("));
        assert!(text.ends_with(&format!("{} bytes)", fingerprint.len())));
    }
}
