//! # Operations
//!
//! Pure state transitions, one module per concern. Every function here
//! takes the current snapshot (or a slice of it) and returns replacement
//! data; the [`crate::Engine`] swaps the replacements in under the store
//! lock. None of these functions touch a clock, a lock, or any I/O.

pub mod aggregate;
pub mod estimate;
pub mod payment;
pub mod sale;
pub mod stock;
