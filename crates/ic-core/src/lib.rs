//! Interaction Calculus evaluator core.
//!
//! This crate implements the Interaction Calculus (IC): a graph-rewriting
//! runtime combining lambda calculus with explicit superpositions (`&L{a,b}`)
//! and duplications (`!&L{x0,x1}=v`), reduced with optimal-sharing
//! interaction rules over a packed, bump-allocated term heap.
//!
//! # Layout
//!
//! - [`term`] — the packed 32-bit term word and its tag space.
//! - [`context`] — [`Context`], the heap/stack/interaction-counter handle
//!   every other function in this crate operates on.
//! - [`ctor`] — term constructors (`lam`, `app`, `sup`, `dup`, ...).
//! - [`interactions`] — the eleven local rewrite rules.
//! - [`whnf`] — the weak-head-normal-form reducer (runtime rules 1–7).
//! - [`collapse`] — the two-phase collapser (rules 8–11 plus the dup
//!   push-down rules), reducing a term to a sup/dup-free normal shape.
//! - [`show`] — the readable-syntax printer.
//! - [`error`] — [`IcError`] and the crate's [`Result`] alias.
//!
//! # Example
//!
//! `(λx.x) 7` reduces, via `APP-LAM`, straight to `7`:
//!
//! ```
//! use ic_core::{ctor, whnf, Context};
//!
//! let mut ctx = Context::default_new().unwrap();
//! let identity = ctor::lam_with(&mut ctx, |x| x).unwrap();
//! let seven = ctor::num(7);
//!
//! let app = ctor::app(&mut ctx, identity, seven).unwrap();
//! let result = whnf(&mut ctx, app).unwrap();
//! assert_eq!(result, seven);
//! assert_eq!(ctx.interactions(), 1);
//! ```

mod collapse;
mod context;
pub mod ctor;
mod error;
mod heap;
mod interactions;
mod show;
mod term;
mod whnf;

pub use collapse::collapse;
pub use context::{Config, Context, DEFAULT_HEAP_SIZE, DEFAULT_STACK_SIZE};
pub use error::{IcError, Result};
pub use show::show;
pub use term::{Label, Tag, Term, MAX_VALUE};
pub use whnf::{normalize, whnf};
