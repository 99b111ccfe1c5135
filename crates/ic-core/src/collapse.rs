//! The two-phase collapser (C6): Pass A pushes superpositions outward
//! through binders; Pass B dissolves duplications into substitutions.
//! [`collapse`] runs both and returns a term satisfying the invariants in
//! the module-level rule list below.
//!
//! - no `SUP` under a binder
//! - no `SUP{R}` whose child is `SUP{L}` with `L < R` (residual sups are
//!   label-sorted)
//! - no `DUP` endpoint whose target resolves to a `VAR`, `APP`, or `ERA`

use crate::context::Context;
use crate::error::Result;
use crate::interactions;
use crate::term::{Tag, Term};
use crate::whnf::whnf;

/// Run both collapser passes to completion.
pub fn collapse(ctx: &mut Context, term: Term) -> Result<Term> {
    let a = collapse_sups(ctx, term)?;
    collapse_dups(ctx, a)
}

/// Pass A: collapse superpositions through binders, applications,
/// superpositions, and switches (rules 8, 9, ERA-APP, 10, 11).
fn collapse_sups(ctx: &mut Context, term: Term) -> Result<Term> {
    let mut head = whnf(ctx, term)?;
    recurse_children(ctx, head, collapse_sups)?;
    head = whnf(ctx, head)?;

    if let Some(rewritten) = try_sup_rule(ctx, head)? {
        return collapse_sups(ctx, rewritten);
    }
    Ok(head)
}

/// Structural children, by tag, shared between both passes: lambda body,
/// application spine, superposition arms, successor argument, switch
/// scrutinee and both branches.
fn recurse_children(
    ctx: &mut Context,
    head: Term,
    mut step: impl FnMut(&mut Context, Term) -> Result<Term>,
) -> Result<()> {
    match head.tag() {
        Tag::Var | Tag::Era | Tag::Num => {}
        Tag::Lam | Tag::Suc => {
            let loc = head.val();
            let child = step(ctx, ctx.heap_get(loc))?;
            ctx.heap_set(loc, child);
        }
        Tag::App | Tag::Sup(_) => {
            let loc = head.val();
            let a = step(ctx, ctx.heap_get(loc))?;
            let b = step(ctx, ctx.heap_get(loc + 1))?;
            ctx.heap_set(loc, a);
            ctx.heap_set(loc + 1, b);
        }
        Tag::Dp0(_) | Tag::Dp1(_) => {
            let loc = head.val();
            let target = step(ctx, ctx.heap_get(loc))?;
            ctx.heap_set(loc, target);
        }
        Tag::Swi => {
            let loc = head.val();
            let n = step(ctx, ctx.heap_get(loc))?;
            let z = step(ctx, ctx.heap_get(loc + 1))?;
            let s = step(ctx, ctx.heap_get(loc + 2))?;
            ctx.heap_set(loc, n);
            ctx.heap_set(loc + 1, z);
            ctx.heap_set(loc + 2, s);
        }
    }
    Ok(())
}

/// Try to fire one of rules 8–11 (plus the `ERA-APP`/`ERA-LAM` shapes) at
/// `head`. Returns `None` if none apply.
fn try_sup_rule(ctx: &mut Context, head: Term) -> Result<Option<Term>> {
    match head.tag() {
        Tag::Lam => {
            let body = ctx.heap_get(head.val());
            match body.tag() {
                Tag::Sup(_) => Ok(Some(interactions::sup_lam(ctx, head, body)?)),
                Tag::Era => Ok(Some(interactions::era_lam(ctx, head))),
                _ => Ok(None),
            }
        }
        Tag::App => {
            let loc = head.val();
            let f = ctx.heap_get(loc);
            let x = ctx.heap_get(loc + 1);
            match x.tag() {
                Tag::Sup(_) => Ok(Some(interactions::app_sup_arg(ctx, f, x)?)),
                Tag::Era => Ok(Some(interactions::era_app(ctx))),
                _ => Ok(None),
            }
        }
        Tag::Sup(r) => {
            let loc = head.val();
            let left = ctx.heap_get(loc);
            let right = ctx.heap_get(loc + 1);
            if let Tag::Sup(l) = left.tag() {
                if l < r {
                    return Ok(Some(interactions::sup_sup_x(ctx, head, left)?));
                }
            }
            if let Tag::Sup(l) = right.tag() {
                if l < r {
                    return Ok(Some(interactions::sup_sup_y(ctx, head, right)?));
                }
            }
            Ok(None)
        }
        Tag::Swi => {
            let loc = head.val();
            let n = ctx.heap_get(loc);
            let z = ctx.heap_get(loc + 1);
            let s = ctx.heap_get(loc + 2);
            if matches!(z.tag(), Tag::Sup(_)) {
                Ok(Some(interactions::sup_swi_z(ctx, n, z, s)?))
            } else if matches!(s.tag(), Tag::Sup(_)) {
                Ok(Some(interactions::sup_swi_s(ctx, n, z, s)?))
            } else {
                Ok(None)
            }
        }
        _ => Ok(None),
    }
}

/// Pass B: dissolve duplications into substitutions (DUP-VAR, DUP-APP,
/// DUP-ERA), recursing into every structural child for everything else.
fn collapse_dups(ctx: &mut Context, term: Term) -> Result<Term> {
    let head = whnf(ctx, term)?;
    match head.tag() {
        Tag::Dp0(_) | Tag::Dp1(_) => {
            let dup_loc = head.val();
            let raw_target = ctx.heap_get(dup_loc);
            let target = collapse_dups(ctx, raw_target)?;
            match target.tag() {
                // Re-enter on the result: a `DUP-VAR`/`DUP-APP` firing can
                // itself land on further dup-collapsible structure (e.g.
                // one of `DUP-APP`'s freshly split children resolving to
                // another free variable), mirroring `collapse_sups`'s own
                // loop on its rewritten output.
                Tag::Var => collapse_dups(ctx, interactions::dup_var(ctx, dup_loc, target)),
                Tag::App => {
                    let result = interactions::dup_app(ctx, head.tag(), dup_loc, target)?;
                    collapse_dups(ctx, result)
                }
                Tag::Era => collapse_dups(ctx, interactions::dup_era(ctx, dup_loc)),
                _ => {
                    ctx.heap_set(dup_loc, target);
                    Ok(head)
                }
            }
        }
        _ => {
            recurse_children(ctx, head, collapse_dups)?;
            Ok(head)
        }
    }
}
