//! The embedding interface: [`Config`] and [`Context`].
//!
//! A `Context` owns the heap arena, the WHNF redex-frame stack, and the
//! interaction counter. It is the single point of mutable state a caller
//! holds; everything else in the crate is a free function or method that
//! takes `&mut Context`.

use crate::error::Result;
#[allow(unused_imports)]
use crate::error::IcError; // referenced from doc comments below
use crate::heap::{Arena, Kind};
use crate::term::{Term, MAX_VALUE};
use tracing::warn;

/// Default heap capacity: 2^26 slots (see `SPEC_FULL.md` §3 for why this
/// is 2^26 and not the nominal 2^27 in `spec.md`).
pub const DEFAULT_HEAP_SIZE: u32 = 1 << 26;
/// Default stack capacity: 2^24 frames.
pub const DEFAULT_STACK_SIZE: u32 = 1 << 24;

/// The only two knobs the core recognizes (`spec.md` §6). Both must be
/// nonzero powers of two that fit the 26-bit value field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Heap capacity, in 32-bit term slots.
    pub heap_size: u32,
    /// Redex-frame stack capacity, in term slots.
    pub stack_size: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            heap_size: DEFAULT_HEAP_SIZE,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

/// An Interaction Calculus evaluation context: heap, redex stack, and
/// interaction counter.
///
/// There is no `free_context` in this API — `Drop` retires the backing
/// arenas when the context goes out of scope, matching `spec.md` §6's
/// `free_context` in spirit without an explicit call.
#[derive(Debug)]
pub struct Context {
    pub(crate) heap: Arena,
    pub(crate) stack: Arena,
    interactions: u64,
}

impl Context {
    /// Create a new context with the given configuration.
    ///
    /// # Errors
    /// Returns [`IcError::InvalidConfig`] if either size is not a nonzero
    /// power of two that fits the 26-bit value field.
    pub fn new(config: Config) -> Result<Self> {
        let heap = Arena::new(Kind::Heap, config.heap_size)?;
        let stack = Arena::new(Kind::Stack, config.stack_size)?;
        Ok(Self {
            heap,
            stack,
            interactions: 0,
        })
    }

    /// Create a new context with [`Config::default`] sizes.
    ///
    /// # Errors
    /// Never fails with the default configuration; returns `Result` for
    /// symmetry with [`Context::new`].
    pub fn default_new() -> Result<Self> {
        Self::new(Config::default())
    }

    /// Allocate `n` consecutive term slots on the heap, returning the
    /// starting index.
    ///
    /// # Errors
    /// Returns [`IcError::HeapExhausted`] if the bump position would
    /// exceed the configured capacity.
    pub fn alloc(&mut self, n: u32) -> Result<u32> {
        let r = self.heap.alloc(n);
        if let Err(e) = &r {
            warn!(error = %e, "heap allocation failed");
        }
        r
    }

    /// Push a pending redex frame onto the WHNF stack.
    ///
    /// # Errors
    /// Returns [`IcError::StackExhausted`] if the stack would exceed its
    /// configured capacity.
    pub(crate) fn push_frame(&mut self, frame: Term) -> Result<()> {
        let at = self.stack.alloc(1).map_err(|e| {
            warn!(error = %e, "redex stack exhausted");
            e
        })?;
        self.stack.set(at, frame);
        Ok(())
    }

    /// Pop the most recently pushed redex frame, if any.
    pub(crate) fn pop_frame(&mut self) -> Option<Term> {
        if self.stack.len() == 0 {
            return None;
        }
        let at = self.stack.len() - 1;
        let frame = self.stack.get(at);
        // Bump position only ever decreases here; this is the one place
        // the "monotonic growth" invariant is scoped to the heap, not the
        // stack, since the stack is a true LIFO working set.
        self.rewind_stack(at);
        Some(frame)
    }

    fn rewind_stack(&mut self, new_pos: u32) {
        // Safety valve for the bump allocator abstraction: the stack (unlike
        // the heap) is popped as well as pushed, so its "position" must be
        // settable directly. `Arena` doesn't expose that generally to keep
        // the heap's monotonic-growth invariant easy to see by
        // construction; the stack is the one caller allowed to rewind.
        self.stack.rewind(new_pos);
    }

    /// Read a heap cell.
    #[inline]
    pub(crate) fn heap_get(&self, loc: u32) -> Term {
        self.heap.get(loc)
    }

    /// Write a heap cell.
    #[inline]
    pub(crate) fn heap_set(&mut self, loc: u32, term: Term) {
        self.heap.set(loc, term);
    }

    /// Number of interactions fired so far.
    #[inline]
    #[must_use]
    pub fn interactions(&self) -> u64 {
        self.interactions
    }

    /// Count one interaction firing. Called by every rule in
    /// [`crate::interactions`] and [`crate::collapse`].
    #[inline]
    pub(crate) fn count_interaction(&mut self) {
        self.interactions += 1;
    }

    /// Current heap occupancy, in slots.
    #[inline]
    #[must_use]
    pub fn heap_len(&self) -> u32 {
        self.heap.len()
    }

    /// Configured heap capacity, in slots.
    #[inline]
    #[must_use]
    pub fn heap_capacity(&self) -> u32 {
        self.heap.capacity()
    }

    /// Maximum representable value (26-bit field, see `SPEC_FULL.md` §3).
    #[inline]
    #[must_use]
    pub const fn max_value() -> u32 {
        MAX_VALUE
    }
}
