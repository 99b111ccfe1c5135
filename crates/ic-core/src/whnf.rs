//! The WHNF reducer (C5): drive rules 1–7 along the spine to weak head
//! normal form using an explicit stack of pending redex frames, never the
//! host call stack.

use crate::context::Context;
use crate::error::{graph_assert, Result};
use crate::interactions;
use crate::term::{Tag, Term};

/// Reduce `term` to weak head normal form: its head constructor is one of
/// `Lam`, `Sup`, `Era`, `Num`, `Suc`, `Swi`, and no runtime interaction
/// (rules 1–7) applies at the root.
///
/// Every substitution read along the way is destructive (the slot is
/// overwritten with its cleared content), so re-running `whnf` on an
/// already-reduced term is cheap: there is nothing left to consume.
pub fn whnf(ctx: &mut Context, term: Term) -> Result<Term> {
    let mut cur = term;
    loop {
        cur = match cur.tag() {
            Tag::Var => match read_substitution(ctx, cur.val()) {
                Some(next) => next,
                None => match settle(ctx, cur)? {
                    Settled::Done(t) => return Ok(t),
                    Settled::Fired(t) => t,
                },
            },
            Tag::Dp0(_) | Tag::Dp1(_) => match read_substitution(ctx, cur.val()) {
                Some(next) => next,
                None => {
                    ctx.push_frame(cur)?;
                    ctx.heap_get(cur.val())
                }
            },
            Tag::App => {
                ctx.push_frame(cur)?;
                ctx.heap_get(cur.val())
            }
            Tag::Lam | Tag::Sup(_) | Tag::Era | Tag::Num | Tag::Suc | Tag::Swi => {
                match settle(ctx, cur)? {
                    Settled::Done(t) => return Ok(t),
                    Settled::Fired(t) => t,
                }
            }
        };
    }
}

enum Settled {
    /// Nothing pending reacts further; this is the final WHNF result.
    Done(Term),
    /// A frame fired; its result needs another pass through the main
    /// loop, since it isn't necessarily WHNF-stable itself.
    Fired(Term),
}

/// `head` is a stable value -- a free `VAR`, or one of `LAM`/`SUP`/`ERA`/
/// `NUM`/`SUC`/`SWI` -- with an empty redex stack, or with the stack
/// still holding whatever pending `APP`/`DUP` frames were drilling
/// through looking for it. React `head` against the top frame, if any.
///
/// An `APP` or `DUP` frame can only react to a `LAM`/`SUP`/`ERA` head
/// (the three runtime-reducible shapes). Against anything else -- a free
/// `VAR`, a numeral, or another still-stuck `DUP` -- the frame itself has
/// no runtime rule and becomes the next `head` in its place, so the
/// frame above it (if any) gets a chance to react instead. A `DUP` (or
/// `APP`) that bottoms out this way surfaces as an ordinary, if inert,
/// WHNF value rather than an error: `collapse`'s Pass A/B are what
/// actually know what to do with a stuck `APP`/`DUP`.
fn settle(ctx: &mut Context, mut head: Term) -> Result<Settled> {
    loop {
        let Some(frame) = ctx.pop_frame() else {
            return Ok(Settled::Done(head));
        };
        if reacts(head.tag()) {
            return apply_frame(ctx, frame, head).map(Settled::Fired);
        }
        head = frame;
    }
}

/// Whether a head shape is one of the three runtime-reducible values an
/// `APP` or `DUP` frame knows how to react to.
fn reacts(tag: Tag) -> bool {
    matches!(tag, Tag::Lam | Tag::Sup(_) | Tag::Era)
}

/// `normalize(term)`: WHNF, then recurse into every structural child and
/// normalize it too. Unlike [`crate::collapse::collapse`], this never
/// applies the collapse-time rules — superpositions and duplications that
/// WHNF alone can't resolve are left in place.
pub fn normalize(ctx: &mut Context, term: Term) -> Result<Term> {
    let head = whnf(ctx, term)?;
    match head.tag() {
        Tag::Var | Tag::Era | Tag::Num => Ok(head),
        Tag::Lam | Tag::Suc => {
            let loc = head.val();
            let body = normalize(ctx, ctx.heap_get(loc))?;
            ctx.heap_set(loc, body);
            Ok(head)
        }
        Tag::App | Tag::Sup(_) => {
            let loc = head.val();
            let a = normalize(ctx, ctx.heap_get(loc))?;
            let b = normalize(ctx, ctx.heap_get(loc + 1))?;
            ctx.heap_set(loc, a);
            ctx.heap_set(loc + 1, b);
            Ok(head)
        }
        Tag::Dp0(_) | Tag::Dp1(_) => {
            let loc = head.val();
            let target = normalize(ctx, ctx.heap_get(loc))?;
            ctx.heap_set(loc, target);
            Ok(head)
        }
        Tag::Swi => {
            let loc = head.val();
            let n = normalize(ctx, ctx.heap_get(loc))?;
            let z = normalize(ctx, ctx.heap_get(loc + 1))?;
            let s = normalize(ctx, ctx.heap_get(loc + 2))?;
            ctx.heap_set(loc, n);
            ctx.heap_set(loc + 1, z);
            ctx.heap_set(loc + 2, s);
            Ok(head)
        }
    }
}

/// Read a slot that may hold a substitution, consuming it if present.
///
/// Returns `Some(value)` and clears the slot's substitution bit in the
/// same step (property 3: every substitution is observed at most once).
/// Returns `None` if the slot is still plain content.
fn read_substitution(ctx: &mut Context, loc: u32) -> Option<Term> {
    let cell = ctx.heap_get(loc);
    if cell.is_sub() {
        let value = cell.clear_sub();
        ctx.heap_set(loc, value);
        Some(value)
    } else {
        None
    }
}

/// Apply the interaction matching a popped frame against the WHNF value
/// that was sitting at its function/target position. `settle` only calls
/// this once `head` has already passed [`reacts`], so the fallback arms
/// below guard an invariant rather than a reachable input shape.
fn apply_frame(ctx: &mut Context, frame: Term, head: Term) -> Result<Term> {
    match frame.tag() {
        Tag::App => {
            let arg = ctx.heap_get(frame.val() + 1);
            match head.tag() {
                Tag::Lam => interactions::app_lam(ctx, head, arg),
                Tag::Sup(_) => interactions::app_sup(ctx, head, arg),
                Tag::Era => Ok(interactions::app_era(ctx, arg)),
                _ => malformed("settle only hands APP a reducible head"),
            }
        }
        Tag::Dp0(_) | Tag::Dp1(_) => {
            let dup_loc = frame.val();
            match head.tag() {
                Tag::Lam => interactions::dup_lam(ctx, frame.tag(), dup_loc, head),
                Tag::Sup(_) if head.label() == frame.label() => {
                    interactions::dup_sup_same(ctx, frame.tag(), dup_loc, head)
                }
                Tag::Sup(_) => interactions::dup_sup_cross(ctx, frame.tag(), dup_loc, head),
                Tag::Era => Ok(interactions::dup_era(ctx, dup_loc)),
                _ => malformed("settle only hands DUP a reducible head"),
            }
        }
        _ => malformed("only APP and DUP frames are ever pushed"),
    }
}

fn malformed(msg: &'static str) -> Result<Term> {
    graph_assert(false, msg)?;
    unreachable!("graph_assert(false, ..) always errors or panics")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::ctor;

    fn ctx() -> Context {
        Context::default_new().unwrap()
    }

    #[test]
    fn whnf_on_a_value_is_a_no_op() {
        let mut c = ctx();
        let n = ctor::num(7);
        assert_eq!(whnf(&mut c, n).unwrap(), n);
        assert_eq!(c.interactions(), 0);
    }

    /// Builds `λx.x` as a lambda whose body is a `VAR` pointing back at its
    /// own binder slot, the standard self-referential encoding (see
    /// [`crate::ctor::lam`]).
    fn identity(ctx: &mut Context) -> Term {
        let slot = ctx.alloc(1).unwrap();
        ctx.heap_set(slot, ctor::var(slot));
        Term::make(Tag::Lam, slot)
    }

    #[test]
    fn e1_identity_applied_to_identity() {
        // ((λx.x) (λy.y)) -- E1, expected 1 interaction, result λy.y
        let mut c = ctx();
        let f = identity(&mut c);
        let arg = identity(&mut c);
        let app = ctor::app(&mut c, f, arg).unwrap();
        let result = whnf(&mut c, app).unwrap();
        assert_eq!(result, arg);
        assert_eq!(c.interactions(), 1);
    }

    #[test]
    fn app_era_erases_argument() {
        let mut c = ctx();
        let arg = ctor::num(3);
        let era = ctor::era();
        let app = ctor::app(&mut c, era, arg).unwrap();
        let result = whnf(&mut c, app).unwrap();
        assert_eq!(result, ctor::era());
        assert_eq!(c.interactions(), 1);
    }

    #[test]
    fn free_variable_with_empty_stack_is_its_own_whnf() {
        let mut c = ctx();
        let slot = c.alloc(1).unwrap();
        let x = ctor::var(slot);
        c.heap_set(slot, ctor::num(0)); // unsubstituted plain content
        let result = whnf(&mut c, x).unwrap();
        assert_eq!(result, x);
    }

    /// `(x 5)` where `x` is a free variable has no runtime rule to fire
    /// (only `LAM`/`SUP`/`ERA` react to an `APP`): it's a neutral term,
    /// stable as-is, not a malformed graph.
    #[test]
    fn application_with_a_free_function_is_a_stuck_neutral_term() {
        let mut c = ctx();
        let slot = c.alloc(1).unwrap();
        let f = ctor::var(slot);
        c.heap_set(slot, ctor::num(0));
        let app = ctor::app(&mut c, f, ctor::num(5)).unwrap();
        let result = whnf(&mut c, app).unwrap();
        assert_eq!(result, app);
        assert_eq!(c.interactions(), 0);
    }

    /// A `DUP` over a free variable is equally stuck at the `whnf` level
    /// (no runtime rule matches a `VAR` head); `collapse`'s Pass B is the
    /// one that knows `DUP-VAR`.
    #[test]
    fn dup_over_a_free_variable_is_a_stuck_neutral_term() {
        let mut c = ctx();
        let slot = c.alloc(1).unwrap();
        let x = ctor::var(slot);
        c.heap_set(slot, ctor::num(0));
        let (a, _b) = ctor::dup(&mut c, 0, x).unwrap();
        let result = whnf(&mut c, a).unwrap();
        assert_eq!(result, a);
        assert_eq!(c.interactions(), 0);
    }
}
