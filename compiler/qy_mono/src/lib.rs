//! Monomorphization and compile-time evaluation.
//!
//! A [`Session`] owns every table of one compilation: MAST, definitions,
//! values, cells, argument lists, types and modules. The front-end fills in
//! polymorphic modules and definitions, then asks the session to evaluate
//! root definitions or modules. Along the way the session:
//!
//! 1. rewrites polymorphic MAST into monomorphic MAST under a
//!    [`Substitution`] (the p2m pass), instantiating every polymorphic
//!    module that is actually referenced;
//! 2. evaluates the monomorphic MAST down to canonical values and types
//!    against a lexical [`Stack`].
//!
//! Instantiations, types and values are all hash-consed, so equal structure
//! always yields equal IDs.
//!
//! # Usage
//!
//! ```text
//! let mut session = Session::new();
//! let x = session.interner.intern_value("x");
//! let bv = session.defs.define_bound_var_exp(x);
//! // ... build `y = x + 1` in session.mast, declare the poly module ...
//! let args = session.arg_lists.from_args(&session.values, &[Arg::Value(five)])?;
//! let mono = session.instantiate_poly_mod(poly, args)?;
//! ```

mod config;
mod eval;
mod modules;
mod printer;
mod rewrite;
mod session;
mod subst;

pub use config::{CyclePolicy, SessionConfig, SessionConfigBuilder};
pub use eval::{FrameKind, Stack};
pub use modules::{ModParent, ModuleTable, MonoField, MonoModule, PolyModule};
pub use session::Session;
pub use subst::Substitution;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install a stderr subscriber filtered by `RUST_LOG`, e.g.
/// `RUST_LOG=qy_mono::rewrite=trace`.
///
/// Does nothing when `RUST_LOG` is unset; later calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    TRACING.call_once(|| {
        let Ok(directives) = std::env::var("RUST_LOG") else {
            return;
        };
        let layer = fmt::layer().with_writer(std::io::stderr).without_time();
        // A subscriber installed by the embedding compiler wins.
        let _ = tracing_subscriber::registry()
            .with(layer)
            .with(EnvFilter::new(directives))
            .try_init();
    });
}
