//! Term constructors.
//!
//! Each constructor is a thin wrapper over [`Context::alloc`] that writes
//! the slots a tag requires and hands back the `Term` that addresses them.
//! `Era`, `Num`, and `Var` never touch the heap — their payload lives
//! entirely in the word itself.

use crate::context::Context;
use crate::error::Result;
use crate::term::{Label, Tag, Term};

/// A variable occurrence pointing at an existing binder slot.
///
/// `loc` must be the heap index of a `LAM` cell (or, during construction,
/// a slot that will become one); the core never validates this at
/// construction time, only when the slot is later read (see
/// [`crate::error::IcError::MalformedGraph`]).
#[inline]
#[must_use]
pub fn var(loc: u32) -> Term {
    Term::make(Tag::Var, loc)
}

/// A lambda `λx.body`. Allocates one slot holding `body`; the slot doubles
/// as `x`'s binder — occurrences of `x` are `var(slot)`.
pub fn lam(ctx: &mut Context, body: Term) -> Result<Term> {
    let slot = ctx.alloc(1)?;
    ctx.heap_set(slot, body);
    Ok(Term::make(Tag::Lam, slot))
}

/// A lambda whose body refers back to its own binder, e.g. `λx.x`.
///
/// The binder slot doesn't exist until it's allocated, so a
/// self-referencing body can't be built as an ordinary [`Term`] up front
/// the way [`lam`] expects. `build_body` is handed `var(slot)` for the
/// slot this lambda will occupy and returns the body to store there.
pub fn lam_with(ctx: &mut Context, build_body: impl FnOnce(Term) -> Term) -> Result<Term> {
    let slot = ctx.alloc(1)?;
    let body = build_body(var(slot));
    ctx.heap_set(slot, body);
    Ok(Term::make(Tag::Lam, slot))
}

/// Like [`lam_with`], but for a body that itself needs to allocate —
/// typically a binder used more than once, threaded through a [`dup`].
/// `build_body` gets `ctx` back along with `var(slot)`.
pub fn lam_with_ctx(
    ctx: &mut Context,
    build_body: impl FnOnce(&mut Context, Term) -> Result<Term>,
) -> Result<Term> {
    let slot = ctx.alloc(1)?;
    let x = var(slot);
    let body = build_body(ctx, x)?;
    ctx.heap_set(slot, body);
    Ok(Term::make(Tag::Lam, slot))
}

/// An application `(f x)`. Allocates two slots: function, then argument.
pub fn app(ctx: &mut Context, f: Term, x: Term) -> Result<Term> {
    let slot = ctx.alloc(2)?;
    ctx.heap_set(slot, f);
    ctx.heap_set(slot + 1, x);
    Ok(Term::make(Tag::App, slot))
}

/// A superposition `&L{a,b}`. Allocates two slots.
pub fn sup(ctx: &mut Context, label: Label, a: Term, b: Term) -> Result<Term> {
    let slot = ctx.alloc(2)?;
    ctx.heap_set(slot, a);
    ctx.heap_set(slot + 1, b);
    Ok(Term::make(Tag::Sup(label), slot))
}

/// A duplication `!&L{x0,x1} = v`. Allocates one shared slot holding `v`
/// and returns both projection endpoints.
pub fn dup(ctx: &mut Context, label: Label, v: Term) -> Result<(Term, Term)> {
    let slot = ctx.alloc(1)?;
    ctx.heap_set(slot, v);
    Ok((Term::make(Tag::Dp0(label), slot), Term::make(Tag::Dp1(label), slot)))
}

/// The erasure constant `⋆`. Never allocates.
#[inline]
#[must_use]
pub fn era() -> Term {
    Term::make(Tag::Era, 0)
}

/// A natural numeral literal. Packs `k` directly into the value field;
/// never allocates.
///
/// # Panics
/// In debug builds, panics if `k` exceeds [`crate::term::MAX_VALUE`]
/// (26 bits); see [`Term::make`].
#[inline]
#[must_use]
pub fn num(k: u32) -> Term {
    Term::make(Tag::Num, k)
}

/// A successor node `+n`. Allocates one slot holding the predecessor.
pub fn suc(ctx: &mut Context, n: Term) -> Result<Term> {
    let slot = ctx.alloc(1)?;
    ctx.heap_set(slot, n);
    Ok(Term::make(Tag::Suc, slot))
}

/// A zero/succ switch `~n{0:z;+:s}`. Allocates three slots: scrutinee,
/// zero branch, successor branch.
pub fn swi(ctx: &mut Context, n: Term, z: Term, s: Term) -> Result<Term> {
    let slot = ctx.alloc(3)?;
    ctx.heap_set(slot, n);
    ctx.heap_set(slot + 1, z);
    ctx.heap_set(slot + 2, s);
    Ok(Term::make(Tag::Swi, slot))
}
