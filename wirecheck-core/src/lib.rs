//! Core traits and types for wirecheck.
//!
//! This crate defines the shared abstractions that the lookup tables and the
//! compliance calculators build on:
//!
//! - [`Component`]: a deterministic callable that maps a typed input to a
//!   typed output or a typed error
//! - [`constraint`]: numeric invariants (strictly positive, non-negative,
//!   left-open unit interval) checked once at construction time

mod component;
pub mod constraint;

pub use component::Component;
