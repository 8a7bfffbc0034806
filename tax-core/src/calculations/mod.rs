//! Income tax computation for the old and new regimes.
//!
//! The engine is a pure function of a [`crate::TaxInput`]: it performs no
//! I/O, holds no state and never rounds. Slab and surcharge schedules live
//! in [`slabs`] as ordered tables so they can be tested on their own.

pub mod common;
pub mod comparison;
pub mod engine;
pub mod slabs;

pub use comparison::{RegimeComparison, compare};
pub use engine::{TaxCalculator, ValidationError, compute};
pub use slabs::{Slab, SurchargeTier};
