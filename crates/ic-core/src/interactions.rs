//! The eleven local rewrite rules.
//!
//! Runtime rules (1–7) are driven by [`crate::whnf`] and matched only at
//! the head. Collapse-time rules (8–11) are driven by [`crate::collapse`]
//! and may fire anywhere in the graph. Every rule here does exactly one
//! thing: read its two adjacent operands, allocate whatever the rewrite
//! needs, mutate the one or two cells the rewrite touches, bump the
//! interaction counter, and return the new head term. None of them loop
//! or recurse — that's the driver's job.

use crate::context::Context;
use crate::ctor;
use crate::error::Result;
use crate::term::{Label, Tag, Term};

/// Which endpoint of a duplication is the one currently firing. The
/// *other* endpoint is the one that receives the installed substitution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Zero,
    One,
}

impl Side {
    fn of(tag: Tag) -> Self {
        match tag {
            Tag::Dp0(_) => Side::Zero,
            Tag::Dp1(_) => Side::One,
            _ => unreachable!("Side::of called on a non-DUP tag"),
        }
    }
}

// ---- runtime interactions (1-7) -------------------------------------------

/// Rule 1: `(λx.body) arg` ⇒ install `x ← arg`, return `body`.
pub(crate) fn app_lam(ctx: &mut Context, lam: Term, arg: Term) -> Result<Term> {
    let loc = lam.val();
    let body = ctx.heap_get(loc);
    ctx.heap_set(loc, arg.make_sub());
    ctx.count_interaction();
    Ok(body)
}

/// Rule 2: `(&L{a,b} x)` ⇒ `&L{(a x0),(b x1)}` with `x` freshly duplicated.
pub(crate) fn app_sup(ctx: &mut Context, sup: Term, arg: Term) -> Result<Term> {
    let label = sup.label();
    let loc = sup.val();
    let a = ctx.heap_get(loc);
    let b = ctx.heap_get(loc + 1);
    let (x0, x1) = ctor::dup(ctx, label, arg)?;
    let left = ctor::app(ctx, a, x0)?;
    let right = ctor::app(ctx, b, x1)?;
    let result = ctor::sup(ctx, label, left, right)?;
    ctx.count_interaction();
    Ok(result)
}

/// Rule 3: `(⋆ x)` ⇒ `⋆`. `x` is discarded untouched.
pub(crate) fn app_era(ctx: &mut Context, _arg: Term) -> Term {
    ctx.count_interaction();
    ctor::era()
}

/// Rule 4: `!&L{r0,r1} = λx.f` ⇒ two fresh lambdas with independently
/// reducible bodies `f0`/`f1` (duplicated from `f` under a fresh `DUP{L}`,
/// the same "wrap the shared operand" shape `app_sup` uses for its `x`), a
/// fresh `SUP{L}` rewriting `x`'s binder, and a substitution for the
/// endpoint that did not fire.
pub(crate) fn dup_lam(ctx: &mut Context, dup_tag: Tag, dup_loc: u32, lam: Term) -> Result<Term> {
    let label = dup_label(dup_tag);
    let x_loc = lam.val();
    let f = ctx.heap_get(x_loc);
    let (f0, f1) = ctor::dup(ctx, label, f)?;

    let lam0 = ctor::lam(ctx, f0)?;
    let lam1 = ctor::lam(ctx, f1)?;
    let x0 = ctor::var(lam0.val());
    let x1 = ctor::var(lam1.val());
    let rewired = ctor::sup(ctx, label, x0, x1)?;
    ctx.heap_set(x_loc, rewired.make_sub());

    let (own, other) = match Side::of(dup_tag) {
        Side::Zero => (lam0, lam1),
        Side::One => (lam1, lam0),
    };
    ctx.heap_set(dup_loc, other.make_sub());
    ctx.count_interaction();
    Ok(own)
}

/// Rule 5: `!&L{r0,r1} = &L{a,b}` ⇒ annihilate; `r0 ← a`, `r1 ← b`.
pub(crate) fn dup_sup_same(ctx: &mut Context, dup_tag: Tag, dup_loc: u32, sup: Term) -> Result<Term> {
    let loc = sup.val();
    let a = ctx.heap_get(loc);
    let b = ctx.heap_get(loc + 1);
    let (own, other) = match Side::of(dup_tag) {
        Side::Zero => (a, b),
        Side::One => (b, a),
    };
    ctx.heap_set(dup_loc, other.make_sub());
    ctx.count_interaction();
    Ok(own)
}

/// Rule 6: `!&L{r0,r1} = &M{a,b}`, `L ≠ M` ⇒ commute: duplicate `a` and
/// `b` under `L`, rebuild the `SUP{M}` pairwise over the fresh endpoints.
pub(crate) fn dup_sup_cross(
    ctx: &mut Context,
    dup_tag: Tag,
    dup_loc: u32,
    sup: Term,
) -> Result<Term> {
    let label = dup_label(dup_tag);
    let outer = sup.label();
    let loc = sup.val();
    let a = ctx.heap_get(loc);
    let b = ctx.heap_get(loc + 1);

    let (a0, a1) = ctor::dup(ctx, label, a)?;
    let (b0, b1) = ctor::dup(ctx, label, b)?;
    let sup0 = ctor::sup(ctx, outer, a0, b0)?;
    let sup1 = ctor::sup(ctx, outer, a1, b1)?;

    let (own, other) = match Side::of(dup_tag) {
        Side::Zero => (sup0, sup1),
        Side::One => (sup1, sup0),
    };
    ctx.heap_set(dup_loc, other.make_sub());
    ctx.count_interaction();
    Ok(own)
}

/// Rule 7: `!&L{r0,r1} = ⋆` ⇒ both endpoints resolve to `⋆`.
pub(crate) fn dup_era(ctx: &mut Context, dup_loc: u32) -> Term {
    ctx.heap_set(dup_loc, ctor::era().make_sub());
    ctx.count_interaction();
    ctor::era()
}

fn dup_label(dup_tag: Tag) -> Label {
    match dup_tag {
        Tag::Dp0(l) | Tag::Dp1(l) => l,
        _ => unreachable!("dup_label called on a non-DUP tag"),
    }
}

// ---- collapse-time interactions (8-11) ------------------------------------

/// Rule 8: `λx.&L{f0,f1}` ⇒ `x ← &L{x0,x1}`, result `&L{λx0.f0, λx1.f1}`.
pub(crate) fn sup_lam(ctx: &mut Context, lam: Term, sup_body: Term) -> Result<Term> {
    let label = sup_body.label();
    let sup_loc = sup_body.val();
    let f0 = ctx.heap_get(sup_loc);
    let f1 = ctx.heap_get(sup_loc + 1);

    let x_loc = lam.val();
    let lam0 = ctor::lam(ctx, f0)?;
    let lam1 = ctor::lam(ctx, f1)?;
    let rewired = ctor::sup(ctx, label, ctor::var(lam0.val()), ctor::var(lam1.val()))?;
    ctx.heap_set(x_loc, rewired.make_sub());

    let result = ctor::sup(ctx, label, lam0, lam1)?;
    ctx.count_interaction();
    Ok(result)
}

/// Rule 9: `λx.⋆` ⇒ `x ← ⋆`, result `⋆`.
pub(crate) fn era_lam(ctx: &mut Context, lam: Term) -> Term {
    ctx.heap_set(lam.val(), ctor::era().make_sub());
    ctx.count_interaction();
    ctor::era()
}

/// The `(f ⋆)` shape: applying anything to an erased argument erases.
/// Shares the rule 3 body; kept as its own entry point since the collapser
/// reaches it from `APP` with an `ERA` argument rather than an `ERA` head.
pub(crate) fn era_app(ctx: &mut Context) -> Term {
    ctx.count_interaction();
    ctor::era()
}

/// Rule 10 (X): outer `SUP{R}` with inner `SUP{L}` on the left, `L < R`.
/// Re-associate: `&R{&L{x0,x1},y}` ⇒ `&L{&R{x0,y0}, &R{x1,y1}}`.
pub(crate) fn sup_sup_x(ctx: &mut Context, outer: Term, inner: Term) -> Result<Term> {
    let r = outer.label();
    let l = inner.label();
    debug_assert!(l < r, "sup_sup_x requires inner label < outer label");
    let outer_loc = outer.val();
    let y = ctx.heap_get(outer_loc + 1);
    let inner_loc = inner.val();
    let x0 = ctx.heap_get(inner_loc);
    let x1 = ctx.heap_get(inner_loc + 1);

    let (y0, y1) = ctor::dup(ctx, r, y)?;
    let left = ctor::sup(ctx, r, x0, y0)?;
    let right = ctor::sup(ctx, r, x1, y1)?;
    let result = ctor::sup(ctx, l, left, right)?;
    ctx.count_interaction();
    Ok(result)
}

/// Rule 10 (Y): outer `SUP{R}` with inner `SUP{L}` on the right, `L < R`.
/// Symmetric to [`sup_sup_x`].
pub(crate) fn sup_sup_y(ctx: &mut Context, outer: Term, inner: Term) -> Result<Term> {
    let r = outer.label();
    let l = inner.label();
    debug_assert!(l < r, "sup_sup_y requires inner label < outer label");
    let outer_loc = outer.val();
    let x = ctx.heap_get(outer_loc);
    let inner_loc = inner.val();
    let y0 = ctx.heap_get(inner_loc);
    let y1 = ctx.heap_get(inner_loc + 1);

    let (x0, x1) = ctor::dup(ctx, r, x)?;
    let left = ctor::sup(ctx, r, x0, y0)?;
    let right = ctor::sup(ctx, r, x1, y1)?;
    let result = ctor::sup(ctx, l, left, right)?;
    ctx.count_interaction();
    Ok(result)
}

/// Rule 11 (Z): `~N{0:&L{z0,z1};+:s}` ⇒ distribute the switch through the
/// zero branch's superposition, duplicating the untouched fields.
pub(crate) fn sup_swi_z(ctx: &mut Context, n: Term, sup_z: Term, s: Term) -> Result<Term> {
    let label = sup_z.label();
    let loc = sup_z.val();
    let z0 = ctx.heap_get(loc);
    let z1 = ctx.heap_get(loc + 1);
    let (n0, n1) = ctor::dup(ctx, label, n)?;
    let (s0, s1) = ctor::dup(ctx, label, s)?;
    let left = ctor::swi(ctx, n0, z0, s0)?;
    let right = ctor::swi(ctx, n1, z1, s1)?;
    let result = ctor::sup(ctx, label, left, right)?;
    ctx.count_interaction();
    Ok(result)
}

/// Rule 11 (S): symmetric to [`sup_swi_z`], distributing through the
/// successor branch instead.
pub(crate) fn sup_swi_s(ctx: &mut Context, n: Term, z: Term, sup_s: Term) -> Result<Term> {
    let label = sup_s.label();
    let loc = sup_s.val();
    let s0 = ctx.heap_get(loc);
    let s1 = ctx.heap_get(loc + 1);
    let (n0, n1) = ctor::dup(ctx, label, n)?;
    let (z0, z1) = ctor::dup(ctx, label, z)?;
    let left = ctor::swi(ctx, n0, z0, s0)?;
    let right = ctor::swi(ctx, n1, z1, s1)?;
    let result = ctor::sup(ctx, label, left, right)?;
    ctx.count_interaction();
    Ok(result)
}

/// Dup-phase push-down: a `DUP` over a `VAR` becomes a direct substitution
/// on the variable's binder rather than staying a live duplicator. Both
/// projections of a duplicated variable are simply that variable, so the
/// installed substitution resolves whichever endpoint is visited second
/// through the ordinary substitution-read path.
pub(crate) fn dup_var(ctx: &mut Context, dup_loc: u32, var: Term) -> Term {
    ctx.heap_set(dup_loc, var.make_sub());
    ctx.count_interaction();
    var
}

/// Dup-phase push-down: a `DUP` over an `APP` installs a fresh `DUP` on
/// each of the application's two children independently, and (as with the
/// runtime `DUP` rules) installs a substitution for the endpoint that did
/// not fire.
pub(crate) fn dup_app(ctx: &mut Context, dup_tag: Tag, dup_loc: u32, app_term: Term) -> Result<Term> {
    let label = dup_label(dup_tag);
    let loc = app_term.val();
    let f = ctx.heap_get(loc);
    let x = ctx.heap_get(loc + 1);
    let (f0, f1) = ctor::dup(ctx, label, f)?;
    let (x0, x1) = ctor::dup(ctx, label, x)?;
    let left = ctor::app(ctx, f0, x0)?;
    let right = ctor::app(ctx, f1, x1)?;

    let (own, other) = match Side::of(dup_tag) {
        Side::Zero => (left, right),
        Side::One => (right, left),
    };
    ctx.heap_set(dup_loc, other.make_sub());
    ctx.count_interaction();
    Ok(own)
}

/// The collapse-time mirror of [`app_sup`]: `(f &L{a,b})` with the
/// superposition in argument position rather than function position.
/// Duplicates `f` instead of the argument.
pub(crate) fn app_sup_arg(ctx: &mut Context, f: Term, sup_arg: Term) -> Result<Term> {
    let label = sup_arg.label();
    let loc = sup_arg.val();
    let a = ctx.heap_get(loc);
    let b = ctx.heap_get(loc + 1);
    let (f0, f1) = ctor::dup(ctx, label, f)?;
    let left = ctor::app(ctx, f0, a)?;
    let right = ctor::app(ctx, f1, b)?;
    let result = ctor::sup(ctx, label, left, right)?;
    ctx.count_interaction();
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;

    fn ctx() -> Context {
        Context::default_new().unwrap()
    }

    #[test]
    fn app_lam_installs_substitution_and_returns_body() {
        let mut c = ctx();
        let body = ctor::num(5);
        let lam = ctor::lam(&mut c, body).unwrap();
        let arg = ctor::num(9);
        let before = c.interactions();
        let result = app_lam(&mut c, lam, arg).unwrap();
        assert_eq!(result, body);
        assert_eq!(c.heap_get(lam.val()), arg.make_sub());
        assert_eq!(c.interactions(), before + 1);
    }

    #[test]
    fn dup_lam_gives_each_copy_an_independently_reducible_body() {
        let mut c = ctx();
        let body = ctor::num(5);
        let lam = ctor::lam(&mut c, body).unwrap();
        let (d0, _d1) = ctor::dup(&mut c, 0, lam).unwrap();
        let result = dup_lam(&mut c, d0.tag(), d0.val(), lam).unwrap();
        assert_eq!(result.tag(), Tag::Lam);
        // The body is duplicated through a fresh DUP, not the same raw
        // term reused in both lambdas -- otherwise a lambda that uses its
        // own bound variable would have both copies aliasing one binder.
        let f0 = c.heap_get(result.val());
        assert!(matches!(f0.tag(), Tag::Dp0(_) | Tag::Dp1(_)));
    }

    #[test]
    fn dup_era_resolves_both_sides_to_era() {
        let mut c = ctx();
        let (d0, _d1) = ctor::dup(&mut c, 0, ctor::era()).unwrap();
        let result = dup_era(&mut c, d0.val());
        assert_eq!(result, ctor::era());
    }

    #[test]
    fn dup_sup_same_label_annihilates() {
        let mut c = ctx();
        let a = ctor::num(1);
        let b = ctor::num(2);
        let sup = ctor::sup(&mut c, 3, a, b).unwrap();
        let (d0, _d1) = ctor::dup(&mut c, 3, sup).unwrap();
        let result = dup_sup_same(&mut c, d0.tag(), d0.val(), sup).unwrap();
        assert_eq!(result, a);
        assert_eq!(c.heap_get(d0.val()), b.make_sub());
    }

    #[test]
    fn dup_sup_cross_label_commutes() {
        let mut c = ctx();
        let a = ctor::num(1);
        let b = ctor::num(2);
        let sup = ctor::sup(&mut c, 5, a, b).unwrap();
        let (d0, _d1) = ctor::dup(&mut c, 1, sup).unwrap();
        let result = dup_sup_cross(&mut c, d0.tag(), d0.val(), sup).unwrap();
        assert_eq!(result.tag(), Tag::Sup(5));
    }

    #[test]
    fn sup_sup_x_reorders_so_smaller_label_is_outer() {
        let mut c = ctx();
        let x0 = ctor::num(1);
        let x1 = ctor::num(2);
        let y = ctor::num(3);
        let inner = ctor::sup(&mut c, 0, x0, x1).unwrap();
        let outer = ctor::sup(&mut c, 2, inner, y).unwrap();
        let result = sup_sup_x(&mut c, outer, inner).unwrap();
        assert_eq!(result.tag(), Tag::Sup(0));
    }
}
