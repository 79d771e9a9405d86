//! This library is an internal component of [`descent`],
//! which defines the integer grid geometry that dungeon pieces are placed on.
//!
//! Everything here is pure math: no randomness, no logging, no allocation.
//!
//! [`descent`]: https://crates.io/crates/descent/

#![no_std]
// Crate-specific lint settings. (General settings can be found in the workspace manifest.)
#![cfg_attr(
    not(test),
    warn(clippy::std_instead_of_core, clippy::std_instead_of_alloc)
)]
#![warn(clippy::missing_inline_in_public_items)]

#[cfg(test)]
#[macro_use]
extern crate std;

/// Coordinates, directions, rotations, and boxes on the block grid.
pub mod math;

// reexport for convenience of dependents and tests
#[doc(hidden)]
pub use euclid;
