//! Errors reported by the runtime-typed operations in [`crate::dynamic`].
//!
//! The typed operations in [`crate::seq`] cannot fail: the compiler already
//! guarantees that the source is a sequence, that it is borrowed mutably,
//! and that needles have the element type. The dynamic layer has to check
//! all three at run time and reports them with these sentinels.

/// A comparable error sentinel.
///
/// Shape errors (`NotASequence`, `NotAPointer`) say the caller passed the
/// wrong argument form. `TypeMismatch` says element kinds disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Error {
    /// The argument that should hold a sequence holds something else.
    #[error("not a sequence")]
    NotASequence,

    /// A mutating operation was handed a shared value instead of a
    /// mutable reference.
    #[error("not a mutable reference")]
    NotAPointer,

    /// A needle, addend or replacement has a different kind than the
    /// sequence's element kind.
    #[error("element kinds do not match")]
    TypeMismatch,
}

pub type Result<T> = std::result::Result<T, Error>;
