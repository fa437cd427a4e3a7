//! Implementation of the `#[derive(Hydrate)]` macro.
//!
//! Generates the binding table of a destination record from `#[argot(...)]`
//! field annotations.

mod attrs;
mod derive;

pub use derive::hydrate_derive_impl;
