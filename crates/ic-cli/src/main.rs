#![forbid(unsafe_code)]
#![deny(
    rust_2018_idioms,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo
)]

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand, ValueEnum};
use ic_core::{collapse, ctor, normalize, show, whnf, Context, Term};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "ic-cli",
    about = "Interaction Calculus evaluator demo CLI",
    long_about = "Builds one of a handful of built-in Interaction Calculus terms with the ic-core constructor API, reduces it, and prints the result in readable syntax.\n\nThere is no surface-syntax parser here: a producer of ic-core terms is always Rust code calling the constructors, and this binary is one such producer.",
    version = env!("CARGO_PKG_VERSION"),
    disable_help_subcommand = true
)]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Reduce a built-in demo term and print the result.
    Eval {
        /// Which demo term to build
        #[arg(value_enum)]
        term: DemoTerm,

        /// How far to reduce it
        #[arg(long, value_enum, default_value_t = Mode::Collapse)]
        mode: Mode,
    },

    /// List the built-in demo terms.
    List,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum DemoTerm {
    /// `(λx.x λy.y)` -- E1
    Identity,
    /// `! &0{a,b} = λz.z; (a b)` -- E3
    DupLambda,
    /// `! &0{a,b} = &0{λx.x, λy.y}; (a b)` -- E4
    SupOfLambdas,
    /// `(λx.⋆ λy.y)` -- E6
    EraLambda,
    /// `~(+0){0:9;+:8}` -- numeral switch on a successor
    SwitchOnSuccessor,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default)]
enum Mode {
    /// Weak head normal form only (rules 1-7).
    Whnf,
    /// WHNF recursed into every structural child, sups/dups left in place.
    Normalize,
    /// Full two-phase collapse: no residual SUP/DUP left in the result.
    #[default]
    Collapse,
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    match cli.cmd {
        Cmd::Eval { term, mode } => eval(term, mode),
        Cmd::List => {
            for t in DemoTerm::value_variants() {
                println!("{t:?}");
            }
            Ok(())
        }
    }
}

fn eval(demo: DemoTerm, mode: Mode) -> Result<()> {
    let mut ctx = Context::default_new().context("allocating evaluation context")?;
    let term = build(&mut ctx, demo).context("building demo term")?;

    info!(?demo, ?mode, "reducing demo term");
    let result = match mode {
        Mode::Whnf => whnf(&mut ctx, term).context("reducing to weak head normal form")?,
        Mode::Normalize => normalize(&mut ctx, term).context("normalizing")?,
        Mode::Collapse => collapse(&mut ctx, term).context("collapsing")?,
    };

    println!("{}", show(&ctx, result));
    println!("interactions: {}", ctx.interactions());
    Ok(())
}

/// Build one of the fixed demo terms with the constructor API -- the same
/// role a surface-syntax parser would play for a producer that had one.
fn build(ctx: &mut Context, demo: DemoTerm) -> Result<Term> {
    match demo {
        DemoTerm::Identity => {
            let f = ctor::lam_with(ctx, |x| x)?;
            let arg = ctor::lam_with(ctx, |x| x)?;
            Ok(ctor::app(ctx, f, arg)?)
        }
        DemoTerm::DupLambda => {
            let id = ctor::lam_with(ctx, |x| x)?;
            let (a, b) = ctor::dup(ctx, 0, id)?;
            Ok(ctor::app(ctx, a, b)?)
        }
        DemoTerm::SupOfLambdas => {
            let lam0 = ctor::lam_with(ctx, |x| x)?;
            let lam1 = ctor::lam_with(ctx, |x| x)?;
            let sup = ctor::sup(ctx, 0, lam0, lam1)?;
            let (a, b) = ctor::dup(ctx, 0, sup)?;
            Ok(ctor::app(ctx, a, b)?)
        }
        DemoTerm::EraLambda => {
            let eraser = ctor::lam_with(ctx, |_x| ctor::era())?;
            let id = ctor::lam_with(ctx, |x| x)?;
            Ok(ctor::app(ctx, eraser, id)?)
        }
        DemoTerm::SwitchOnSuccessor => {
            let one = ctor::suc(ctx, ctor::num(0))?;
            Ok(ctor::swi(ctx, one, ctor::num(9), ctor::num(8))?)
        }
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_level(true).compact();

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
