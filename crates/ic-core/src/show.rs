//! Readable syntax (C7): render a term as the surface grammar fixed in
//! `spec.md` §6, plus the numeral forms.
//!
//! This is a read-only printer modeled on `original_source/src/show.c`'s
//! `assign_var_ids`/`stringify_collapsers` split: naming runs as two
//! separate batch walks of the graph (every `LAM` binder first, then every
//! surviving duplicator), followed by a walk that emits the duplicator
//! preambles and the term itself. Neither naming walk, nor the final
//! emission, ever writes to the heap — a substitution slot is peeked, not
//! consumed, so calling `show` does not disturb a term you intend to keep
//! reducing.

use std::collections::HashMap;
use std::fmt::Write as _;

use crate::context::Context;
use crate::term::{Label, Tag, Term};

/// Render `term` as readable Interaction Calculus syntax.
///
/// Surviving duplicators (ones Pass B's collapser didn't already dissolve)
/// are hoisted to `! &L{a,b} = value;` preambles, one per line, in the
/// order their binder is first reached; the term follows on its own line.
#[must_use]
pub fn show(ctx: &Context, term: Term) -> String {
    let mut names = Names::default();
    collect(ctx, term, &mut names);

    let mut out = String::new();
    for &loc in &names.collapser_order {
        let label = names.collapser_labels[&loc];
        let (a, b) = &names.collapsers[&loc];
        let _ = write!(out, "! &{label}{{{a},{b}}} = ");
        let value = ctx.heap_get(loc);
        stringify(ctx, value, &names, &mut out);
        out.push_str(";\n");
    }
    stringify(ctx, term, &names, &mut out);
    out
}

/// Which role a binder slot was registered under. A `LAM` slot and a `DUP`
/// slot never collide (a `DUP`'s shared cell gets two names, `a`/`b`; a
/// `LAM`'s single cell gets one, `x`), so the lookup only ever needs the
/// address plus which side of a `DUP` is being named.
#[derive(Default)]
struct Names {
    /// `LAM` slot -> binder name (`xN`).
    vars: HashMap<u32, String>,
    /// `DUP` shared slot -> (`Dp0` name, `Dp1` name).
    collapsers: HashMap<u32, (String, String)>,
    collapser_labels: HashMap<u32, Label>,
    /// Encounter order, for preamble emission.
    collapser_order: Vec<u32>,
    next_id: u32,
}

impl Names {
    fn fresh(&mut self, prefix: &str) -> String {
        let id = self.next_id;
        self.next_id += 1;
        format!("{prefix}{id}")
    }
}

/// Two separate batch walks of `term`: every `LAM` binder is named first,
/// then every surviving `DUP` is registered, mirroring
/// `original_source/src/show.c`'s `assign_var_ids`/`stringify_collapsers`
/// split rather than interleaving the two kinds of naming in one pass.
fn collect(ctx: &Context, term: Term, names: &mut Names) {
    assign_var_names(ctx, term, names);
    assign_collapser_names(ctx, term, names);
}

/// Pass 1a: name every `LAM` binder in encounter order. Does not register
/// collapsers; a `DUP` endpoint is only a path to more lambdas here.
fn assign_var_names(ctx: &Context, term: Term, names: &mut Names) {
    match term.tag() {
        Tag::Var => {
            let cell = ctx.heap_get(term.val());
            if cell.is_sub() {
                assign_var_names(ctx, cell.clear_sub(), names);
            }
            // Else: this is the binder occurrence itself; the `Lam` arm
            // below is what registers its name.
        }
        Tag::Dp0(_) | Tag::Dp1(_) => {
            let cell = ctx.heap_get(term.val());
            let target = if cell.is_sub() { cell.clear_sub() } else { cell };
            assign_var_names(ctx, target, names);
        }
        Tag::Lam => {
            let loc = term.val();
            if !names.vars.contains_key(&loc) {
                let name = names.fresh("x");
                names.vars.insert(loc, name);
            }
            assign_var_names(ctx, ctx.heap_get(loc), names);
        }
        Tag::Suc => assign_var_names(ctx, ctx.heap_get(term.val()), names),
        Tag::App | Tag::Sup(_) => {
            let loc = term.val();
            assign_var_names(ctx, ctx.heap_get(loc), names);
            assign_var_names(ctx, ctx.heap_get(loc + 1), names);
        }
        Tag::Swi => {
            let loc = term.val();
            assign_var_names(ctx, ctx.heap_get(loc), names);
            assign_var_names(ctx, ctx.heap_get(loc + 1), names);
            assign_var_names(ctx, ctx.heap_get(loc + 2), names);
        }
        Tag::Era | Tag::Num => {}
    }
}

/// Pass 1b: register every `DUP` whose shared cell hasn't already been
/// substituted away. A `DUP` already resolved to a value (its slot carries
/// a plain, non-collapser term) is not a surviving collapser at all and is
/// simply read through.
fn assign_collapser_names(ctx: &Context, term: Term, names: &mut Names) {
    match term.tag() {
        Tag::Var => {
            let cell = ctx.heap_get(term.val());
            if cell.is_sub() {
                assign_collapser_names(ctx, cell.clear_sub(), names);
            }
        }
        Tag::Dp0(label) | Tag::Dp1(label) => {
            let loc = term.val();
            let cell = ctx.heap_get(loc);
            if cell.is_sub() {
                assign_collapser_names(ctx, cell.clear_sub(), names);
            } else if !names.collapsers.contains_key(&loc) {
                let a = names.fresh("a");
                let b = names.fresh("b");
                names.collapsers.insert(loc, (a, b));
                names.collapser_labels.insert(loc, label);
                names.collapser_order.push(loc);
                assign_collapser_names(ctx, cell, names);
            }
        }
        Tag::Lam => assign_collapser_names(ctx, ctx.heap_get(term.val()), names),
        Tag::Suc => assign_collapser_names(ctx, ctx.heap_get(term.val()), names),
        Tag::App | Tag::Sup(_) => {
            let loc = term.val();
            assign_collapser_names(ctx, ctx.heap_get(loc), names);
            assign_collapser_names(ctx, ctx.heap_get(loc + 1), names);
        }
        Tag::Swi => {
            let loc = term.val();
            assign_collapser_names(ctx, ctx.heap_get(loc), names);
            assign_collapser_names(ctx, ctx.heap_get(loc + 1), names);
            assign_collapser_names(ctx, ctx.heap_get(loc + 2), names);
        }
        Tag::Era | Tag::Num => {}
    }
}

fn stringify(ctx: &Context, term: Term, names: &Names, out: &mut String) {
    match term.tag() {
        Tag::Var => {
            let loc = term.val();
            let cell = ctx.heap_get(loc);
            if cell.is_sub() {
                stringify(ctx, cell.clear_sub(), names, out);
            } else {
                out.push_str(names.vars.get(&loc).map_or("?", String::as_str));
            }
        }
        Tag::Dp0(_) => stringify_dup_endpoint(ctx, term, names, out, true),
        Tag::Dp1(_) => stringify_dup_endpoint(ctx, term, names, out, false),
        Tag::Lam => {
            let loc = term.val();
            let name = names.vars.get(&loc).map_or("?", String::as_str);
            let _ = write!(out, "λ{name}.");
            stringify(ctx, ctx.heap_get(loc), names, out);
        }
        Tag::App => {
            let loc = term.val();
            out.push('(');
            stringify(ctx, ctx.heap_get(loc), names, out);
            out.push(' ');
            stringify(ctx, ctx.heap_get(loc + 1), names, out);
            out.push(')');
        }
        Tag::Sup(label) => {
            let loc = term.val();
            let _ = write!(out, "&{label}{{");
            stringify(ctx, ctx.heap_get(loc), names, out);
            out.push(',');
            stringify(ctx, ctx.heap_get(loc + 1), names, out);
            out.push('}');
        }
        Tag::Era => out.push('⋆'),
        Tag::Num => {
            let _ = write!(out, "{}", term.val());
        }
        Tag::Suc => {
            out.push('+');
            stringify(ctx, ctx.heap_get(term.val()), names, out);
        }
        Tag::Swi => {
            let loc = term.val();
            out.push('~');
            stringify(ctx, ctx.heap_get(loc), names, out);
            out.push_str("{0:");
            stringify(ctx, ctx.heap_get(loc + 1), names, out);
            out.push_str(";+:");
            stringify(ctx, ctx.heap_get(loc + 2), names, out);
            out.push('}');
        }
    }
}

fn stringify_dup_endpoint(ctx: &Context, term: Term, names: &Names, out: &mut String, is_zero: bool) {
    let loc = term.val();
    let cell = ctx.heap_get(loc);
    if cell.is_sub() {
        stringify(ctx, cell.clear_sub(), names, out);
        return;
    }
    match names.collapsers.get(&loc) {
        Some((a, b)) => out.push_str(if is_zero { a } else { b }),
        None => out.push('?'),
    }
}
