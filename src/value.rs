//! Runtime-typed values.
//!
//! [`Value`] models data whose element type is only known at run time.
//! A [`Sequence`] records its element [`Kind`] explicitly, so the kind is
//! known even when the sequence is empty, and every value in it has that
//! kind. Kinds are shallow: a sequence of integer sequences and a sequence
//! of string sequences both have element kind [`Kind::Seq`].

use crate::error::Error;
use crate::error::Result;
use crate::fingerprint::Canonical;
use crate::fingerprint::Encoder;
use crate::fingerprint::Fingerprint;
use crate::key::float_bits;
use crate::key::Keyed;

/// The shallow kind of a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    Null,
    Bool,
    Int,
    Uint,
    Float,
    Str,
    Bytes,
    Seq,
    Record,
}

/// A runtime-typed value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Sequence),
    Record(Record),
}

/// A homogeneous sequence of values.
#[derive(Clone, Debug, PartialEq)]
pub struct Sequence {
    elem: Kind,
    items: Vec<Value>,
}

/// A named record with ordered fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    name: String,
    fields: Vec<(String, Value)>,
}

/// The equality key of a [`Value`].
///
/// Scalars key by value, sequences by their element kind and the keys of
/// their items, records by their [`Fingerprint`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Float(u64),
    Str(String),
    Bytes(Vec<u8>),
    Seq(Kind, Vec<ValueKey>),
    Record(Fingerprint),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => return Kind::Null,
            Value::Bool(_) => return Kind::Bool,
            Value::Int(_) => return Kind::Int,
            Value::Uint(_) => return Kind::Uint,
            Value::Float(_) => return Kind::Float,
            Value::Str(_) => return Kind::Str,
            Value::Bytes(_) => return Kind::Bytes,
            Value::Seq(_) => return Kind::Seq,
            Value::Record(_) => return Kind::Record,
        }
    }

    pub fn as_seq(&self) -> Option<&Sequence> {
        match self {
            Value::Seq(sequence) => return Some(sequence),
            _ => return None,
        }
    }

    pub fn as_seq_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Value::Seq(sequence) => return Some(sequence),
            _ => return None,
        }
    }

    pub fn is_seq(&self) -> bool {
        return matches!(self, Value::Seq(_));
    }
}

impl Sequence {
    /// Create an empty sequence of the given element kind.
    pub fn new(elem: Kind) -> Sequence {
        return Sequence { elem, items: Vec::new() };
    }

    /// Create a sequence, checking that every item has kind `elem`.
    pub fn from_values(elem: Kind, items: Vec<Value>) -> Result<Sequence> {
        if items.iter().any(|item| item.kind() != elem) {
            return Err(Error::TypeMismatch);
        }
        return Ok(Sequence { elem, items });
    }

    /// Create a sequence whose element kind is the kind of its first item.
    /// An empty list gives an empty sequence of kind [`Kind::Null`].
    pub fn infer(items: Vec<Value>) -> Result<Sequence> {
        let elem = items.first().map_or(Kind::Null, Value::kind);
        return Sequence::from_values(elem, items);
    }

    /// Build a sequence whose items are known to have kind `elem`.
    pub(crate) fn trusted(elem: Kind, items: Vec<Value>) -> Sequence {
        debug_assert!(items.iter().all(|item| item.kind() == elem));
        return Sequence { elem, items };
    }

    pub fn elem(&self) -> Kind {
        return self.elem;
    }

    pub fn items(&self) -> &[Value] {
        return &self.items;
    }

    /// Mutable access for operations that keep every item of kind `elem`.
    pub(crate) fn items_mut(&mut self) -> &mut Vec<Value> {
        return &mut self.items;
    }

    pub fn into_items(self) -> Vec<Value> {
        return self.items;
    }

    pub fn push(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        if value.kind() != self.elem {
            return Err(Error::TypeMismatch);
        }
        self.items.push(value);
        return Ok(());
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        return self.items.get(index);
    }

    pub fn len(&self) -> usize {
        return self.items.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.items.is_empty();
    }

    pub fn capacity(&self) -> usize {
        return self.items.capacity();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        return self.items.iter();
    }
}

impl<'a> IntoIterator for &'a Sequence {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        return self.items.iter();
    }
}

impl Record {
    pub fn new(name: impl Into<String>) -> Record {
        return Record { name: name.into(), fields: Vec::new() };
    }

    /// Append a field. A record may carry a field name more than once;
    /// [`Record::get`] returns the first.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Record {
        self.fields.push((name.into(), value.into()));
        return self;
    }

    pub fn name(&self) -> &str {
        return &self.name;
    }

    pub fn fields(&self) -> &[(String, Value)] {
        return &self.fields;
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        return self.fields.iter().find(|(field, _)| field == name).map(|(_, value)| value);
    }
}

impl Canonical for Value {
    fn encode(&self, encoder: &mut Encoder) {
        match self {
            Value::Null => encoder.unit(),
            Value::Bool(value) => encoder.bool(*value),
            Value::Int(value) => encoder.int(*value),
            Value::Uint(value) => encoder.uint(*value),
            Value::Float(value) => encoder.float(*value),
            Value::Str(value) => encoder.str(value),
            Value::Bytes(value) => encoder.bytes(value),
            Value::Seq(sequence) => sequence.encode(encoder),
            Value::Record(record) => record.encode(encoder),
        }
    }
}

impl Canonical for Sequence {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.begin_typed_seq(self.elem as u8, self.items.len());
        for item in &self.items {
            item.encode(encoder);
        }
    }
}

impl Canonical for Record {
    fn encode(&self, encoder: &mut Encoder) {
        encoder.begin_record(&self.name, self.fields.len());
        for (name, value) in &self.fields {
            encoder.field(name, value);
        }
    }
}

impl Keyed for Record {
    type Key = Fingerprint;

    fn key(&self) -> Fingerprint {
        return Fingerprint::of(self);
    }
}

impl Keyed for Value {
    type Key = ValueKey;

    fn key(&self) -> ValueKey {
        match self {
            Value::Null => return ValueKey::Null,
            Value::Bool(value) => return ValueKey::Bool(*value),
            Value::Int(value) => return ValueKey::Int(*value),
            Value::Uint(value) => return ValueKey::Uint(*value),
            Value::Float(value) => return ValueKey::Float(float_bits(*value)),
            Value::Str(value) => return ValueKey::Str(value.clone()),
            Value::Bytes(value) => return ValueKey::Bytes(value.clone()),
            Value::Seq(sequence) => {
                let items = sequence.iter().map(Keyed::key).collect();
                return ValueKey::Seq(sequence.elem(), items);
            }
            Value::Record(record) => return ValueKey::Record(record.key()),
        }
    }
}

macro_rules! value_from {
    ($($ty:ty => $variant:ident as $kind:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(value: $ty) -> Value {
                    return Value::$variant(value.into());
                }
            }

            impl From<Vec<$ty>> for Sequence {
                fn from(items: Vec<$ty>) -> Sequence {
                    let items = items.into_iter().map(Value::from).collect();
                    return Sequence::trusted(Kind::$kind, items);
                }
            }
        )*
    };
}

value_from!(
    bool => Bool as Bool,
    i32 => Int as Int,
    i64 => Int as Int,
    u32 => Uint as Uint,
    u64 => Uint as Uint,
    f64 => Float as Float,
    String => Str as Str,
    &str => Str as Str,
    Sequence => Seq as Seq,
    Record => Record as Record,
);

impl<T> From<Vec<T>> for Value
where
    Sequence: From<Vec<T>>,
{
    fn from(items: Vec<T>) -> Value {
        return Value::Seq(Sequence::from(items));
    }
}

#[cfg(feature = "json")]
impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    /// Arrays must be homogeneous; objects become records named `""`.
    fn try_from(json: serde_json::Value) -> Result<Value> {
        match json {
            serde_json::Value::Null => return Ok(Value::Null),
            serde_json::Value::Bool(value) => return Ok(Value::Bool(value)),
            serde_json::Value::Number(number) => {
                if let Some(value) = number.as_i64() {
                    return Ok(Value::Int(value));
                }
                if let Some(value) = number.as_u64() {
                    return Ok(Value::Uint(value));
                }
                return Ok(Value::Float(number.as_f64().unwrap_or(f64::NAN)));
            }
            serde_json::Value::String(value) => return Ok(Value::Str(value)),
            serde_json::Value::Array(items) => {
                let items = items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<Vec<_>>>()?;
                return Ok(Value::Seq(Sequence::infer(items)?));
            }
            serde_json::Value::Object(map) => {
                let mut record = Record::new("");
                for (name, value) in map {
                    record = record.with(name, Value::try_from(value)?);
                }
                return Ok(Value::Record(record));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert_eq!(Value::from(1i64).kind(), Kind::Int);
        assert_eq!(Value::from(1u64).kind(), Kind::Uint);
        assert_eq!(Value::from("a").kind(), Kind::Str);
        assert_eq!(Value::from(vec![1i64]).kind(), Kind::Seq);
        assert_eq!(Value::Null.kind(), Kind::Null);
    }

    #[test]
    fn empty_sequence_knows_its_kind() {
        let sequence = Sequence::from(Vec::<String>::new());
        assert_eq!(sequence.elem(), Kind::Str);
        assert!(sequence.is_empty());
    }

    #[test]
    fn from_values_rejects_mixed_kinds() {
        let items = vec![Value::Int(1), Value::Str("a".into())];
        assert_eq!(Sequence::from_values(Kind::Int, items), Err(Error::TypeMismatch));
    }

    #[test]
    fn infer_takes_first_kind() {
        let sequence = Sequence::infer(vec![Value::Bool(true), Value::Bool(false)]).unwrap();
        assert_eq!(sequence.elem(), Kind::Bool);
        assert_eq!(Sequence::infer(vec![]).unwrap().elem(), Kind::Null);
        assert!(Sequence::infer(vec![Value::Bool(true), Value::Null]).is_err());
    }

    #[test]
    fn push_checks_kind() {
        let mut sequence = Sequence::new(Kind::Int);
        assert_eq!(sequence.push(3i64), Ok(()));
        assert_eq!(sequence.push("x"), Err(Error::TypeMismatch));
        assert_eq!(sequence.len(), 1);
    }

    #[test]
    fn record_fields() {
        let record = Record::new("user").with("name", "ada").with("age", 36i64);
        assert_eq!(record.name(), "user");
        assert_eq!(record.get("age"), Some(&Value::Int(36)));
        assert_eq!(record.get("email"), None);
        assert_eq!(record.fields().len(), 2);
    }

    #[test]
    fn record_keys_follow_fields() {
        let a = Value::from(Record::new("p").with("x", 1i64));
        let b = Value::from(Record::new("p").with("x", 1i64));
        let c = Value::from(Record::new("p").with("x", 2i64));
        let d = Value::from(Record::new("q").with("x", 1i64));
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
        assert_ne!(a.key(), d.key());
    }

    #[test]
    fn nested_sequences_key_structurally() {
        let a = Value::from(vec![Sequence::from(vec![1i64, 2]), Sequence::from(vec![3i64])]);
        let b = Value::from(vec![Sequence::from(vec![1i64, 2]), Sequence::from(vec![3i64])]);
        let c = Value::from(vec![Sequence::from(vec![1i64]), Sequence::from(vec![2i64, 3])]);
        assert_eq!(a.key(), b.key());
        assert_ne!(a.key(), c.key());
    }

    #[test]
    fn int_and_uint_keys_differ() {
        assert_ne!(Value::Int(1).key(), Value::Uint(1).key());
    }

    #[test]
    fn structural_equality_distinguishes_element_kinds() {
        let ints = Value::Seq(Sequence::new(Kind::Int));
        let strs = Value::Seq(Sequence::new(Kind::Str));
        assert_ne!(ints, strs);
    }

    #[test]
    fn element_kind_is_part_of_the_key() {
        let ints = Value::Seq(Sequence::new(Kind::Int));
        let strs = Value::Seq(Sequence::new(Kind::Str));
        assert_ne!(ints.key(), strs.key());
        assert_ne!(Fingerprint::of(&ints), Fingerprint::of(&strs));

        let a = Record::new("r").with("tags", Sequence::new(Kind::Int));
        let b = Record::new("r").with("tags", Sequence::new(Kind::Str));
        assert_ne!(a, b);
        assert_ne!(a.key(), b.key());
    }

    #[test]
    fn sequence_accessors() {
        let value = Value::from(vec![4i64, 5]);
        assert!(value.is_seq());
        assert!(!Value::Int(4).is_seq());

        let sequence = Sequence::from(vec![4i64, 5]);
        assert_eq!(sequence.get(1), Some(&Value::Int(5)));
        assert_eq!(sequence.get(2), None);
        assert_eq!(sequence.into_items(), vec![Value::Int(4), Value::Int(5)]);
    }

    #[cfg(feature = "json")]
    #[test]
    fn from_json() {
        let json = serde_json::json!([{"a": 1}, {"a": 2}]);
        let value = Value::try_from(json).unwrap();
        let sequence = value.as_seq().unwrap();
        assert_eq!(sequence.elem(), Kind::Record);
        assert_eq!(sequence.len(), 2);

        let mixed = serde_json::json!([1, "two"]);
        assert_eq!(Value::try_from(mixed), Err(Error::TypeMismatch));

        let big = serde_json::json!(u64::MAX);
        assert_eq!(Value::try_from(big), Ok(Value::Uint(u64::MAX)));
    }
}
