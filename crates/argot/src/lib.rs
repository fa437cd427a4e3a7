//! Declarative command trees with typed flag and argument hydration.
//!
//! `argot` turns a raw argument vector into a call to one command's action,
//! with the command's inputs parsed, validated, and written into a typed
//! record.
//!
//! # Quick Start
//!
//! ```rust
//! use argot::{App, Command, Hydrate, Input};
//! use argot::validate::OneOf;
//!
//! #[derive(Default, Hydrate)]
//! struct Greet {
//!     #[argot(name = "name")]
//!     name: String,
//!     #[argot(name = "greeting")]
//!     greeting: String,
//!     #[argot(name = "times")]
//!     times: u8,
//! }
//!
//! let app = App::builder("hello", "1.0.0")
//!     .command(
//!         Command::new("greet", |ctx, _| {
//!             let mut greet = Greet::default();
//!             ctx.hydrate(&mut greet)?;
//!             for _ in 0..greet.times {
//!                 println!("{}, {}!", greet.greeting, greet.name);
//!             }
//!             Ok(())
//!         })
//!         .argument(Input::<String>::new("name").required().argument())
//!         .flag(
//!             Input::<String>::new("greeting")
//!                 .default("Hello".to_string())
//!                 .validator(OneOf::new(["Hello", "Hi"].map(String::from)))
//!                 .flag()
//!                 .env(["HELLO_GREETING"]),
//!         )
//!         .flag(Input::<u8>::new("times").default(1).flag()),
//!     )
//!     .build()
//!     .unwrap();
//!
//! app.dispatch(["hello", "greet", "world", "--times", "2"]).unwrap();
//! ```
//!
//! # Architecture
//!
//! ```text
//! argv ─► tokenize ─► ParsedArgs { flags, positionals }
//!                          │
//!                          ▼
//!              CommandTree::resolve ─► command + remaining positionals
//!                          │
//!                          ▼
//!           hooks::execute ─► action ─► Context::hydrate(&mut record)
//! ```
//!
//! - [`tokenize`]: splits `--flag value`, `--flag=value`, and bare `--flag`
//!   from positionals.
//! - [`CommandTree`]: an arena of [`Command`]s, validated when built.
//! - [`hydrate()`]: fills a [`Hydrate`] record. Flag values come from the
//!   command line, then the first set environment variable, then the default.
//! - [`validate`]: typed validators behind a type-erased boundary.
//! - [`hooks`]: persistent and local pre/post hooks around the action.
//!
//! # Logging
//!
//! The crate emits `tracing` events (resolution, flag value sources, hook
//! phases) and never installs a subscriber.

extern crate self as argot;

mod app;
mod bind;
mod command;
mod context;
pub mod env;
mod error;
mod help;
pub mod hooks;
mod hydrate;
mod input;
mod tokenize;
mod tree;
pub mod validate;
mod value;

pub use app::{App, AppBuilder, RunResult};
pub use bind::{BindingTable, Bindings, Field, FieldKind, Hydrate};
pub use command::{noop_hook, Command, Hook};
pub use context::{CancelToken, Context, Extensions};
pub use env::{EnvReader, MockEnv, RealEnv};
pub use error::{ArgotError, ConversionError, ExitError, FieldError, ValidationError};
pub use hooks::HookPhase;
pub use hydrate::hydrate;
pub use input::{Argument, Flag, Input};
pub use tokenize::{tokenize, ParsedArgs};
pub use tree::{CommandId, CommandTree, Resolution};
pub use validate::{AnyValidator, Validator};
pub use value::{InputValue, Scalar, ValueKind};

/// Derives [`Hydrate`] from `#[argot(name = "...")]` field attributes.
pub use argot_macros::Hydrate;
