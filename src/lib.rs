//! slicekit - generic sequence operations.
//!
//! Membership, removal, deduplication, intersection, concatenation,
//! replacement and flattening, at two levels:
//!
//! - [`seq`]: typed functions over `&[T]` and `&mut Vec<T>`. They cannot
//!   fail; element types are checked by the compiler.
//! - [`dynamic`]: the same operations over runtime-typed [`Value`]s,
//!   reporting [`Error::NotASequence`], [`Error::NotAPointer`] and
//!   [`Error::TypeMismatch`] when arguments have the wrong shape.
//!
//! Operations that test equality against one needle use `PartialEq`.
//! Operations that test against a whole set (`unique`, `intersect`,
//! `concat`) use the [`Keyed`] trait. Record types get a key from their
//! canonical encoding through [`keyed_record!`].
//!
//! # Quick Start
//!
//! ```
//! use slicekit::keyed_record;
//! use slicekit::seq;
//! use slicekit::Needle;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Tag {
//!     name: String,
//!     weight: u32,
//! }
//!
//! keyed_record!(Tag { name, weight });
//!
//! let a = Tag { name: "a".into(), weight: 1 };
//! let b = Tag { name: "b".into(), weight: 2 };
//!
//! let mut tags = vec![a.clone(), b.clone(), a.clone()];
//! seq::unique(&mut tags);
//! assert_eq!(tags, vec![a.clone(), b.clone()]);
//!
//! seq::concat(&mut tags, Needle::Many(&[b.clone(), a.clone()]));
//! assert_eq!(tags.len(), 2);
//! ```

pub mod dynamic;
pub mod error;
pub mod filter;
pub mod fingerprint;
pub mod key;
pub mod seq;
pub mod value;

pub use dynamic::Slot;
pub use error::Error;
pub use error::Result;
pub use fingerprint::Canonical;
pub use fingerprint::Fingerprint;
pub use key::Keyed;
pub use seq::Needle;
pub use value::Kind;
pub use value::Record;
pub use value::Sequence;
pub use value::Value;
