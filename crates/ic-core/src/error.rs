//! Typed errors for the embedding interface.
//!
//! `ParseError` from `spec.md` §7's table is intentionally absent: parsing
//! surface syntax is an external collaborator's concern (see `SPEC_FULL.md`
//! §7), so it is never raised by this crate.

use thiserror::Error;

/// Errors the core can raise.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum IcError {
    /// A heap allocation would exceed the context's configured capacity.
    /// Fatal for the context: the caller must create a new one.
    #[error("heap exhausted: requested {requested} slot(s), {remaining} remaining of {capacity}")]
    HeapExhausted {
        /// Slots the failing allocation asked for.
        requested: u32,
        /// Slots left before this request.
        remaining: u32,
        /// Total configured heap capacity.
        capacity: u32,
    },

    /// The WHNF redex-frame stack would exceed its configured capacity.
    /// Fatal for the context, same recovery policy as `HeapExhausted`.
    #[error("stack exhausted: requested {requested} frame(s), {remaining} remaining of {capacity}")]
    StackExhausted {
        /// Frames the failing push asked for.
        requested: u32,
        /// Frames left before this request.
        remaining: u32,
        /// Total configured stack capacity.
        capacity: u32,
    },

    /// A `heap_size`/`stack_size` configuration value was invalid (must be
    /// a nonzero power of two within the 26-bit value field).
    #[error("invalid configuration: {field} = {value} is not a nonzero power of two")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// The value that was rejected.
        value: u32,
    },

    /// A variable or duplication endpoint addressed a cell that cannot
    /// hold what it claims to (e.g. a `VAR` pointing outside any binder).
    /// This is a programmer/producer error, not a runtime condition a
    /// well-formed graph can reach; see `SPEC_FULL.md` §7.
    #[error("malformed graph: {0}")]
    MalformedGraph(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IcError>;

/// Assert an invariant about the graph, returning `MalformedGraph` in
/// release builds and panicking in debug builds (per `spec.md` §7's
/// "programmer error; abort in debug" recovery policy).
#[inline]
pub(crate) fn graph_assert(cond: bool, msg: &'static str) -> Result<()> {
    if cond {
        Ok(())
    } else {
        debug_assert!(cond, "{msg}");
        Err(IcError::MalformedGraph(msg))
    }
}
