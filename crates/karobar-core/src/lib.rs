//! # karobar-core: Pure Business Logic for Karobar
//!
//! This crate is the **heart** of Karobar. It contains all business logic
//! as pure functions and plain data types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Karobar Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Dashboard Frontend (collaborator)               │   │
//! │  │    Sale form ──► Estimate dialog ──► Payment form ──► Reports  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain data objects                     │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    karobar-engine                               │   │
//! │  │    entity store, stock ledger, aggregator, sale recorder,      │   │
//! │  │    estimate conversion, payments                               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ karobar-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   dedup   │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Bounded  │  │   rules   │  │   │
//! │  │   │Sale/Client│  │  (paise)  │  │ DedupSet  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, Client, Estimate, Payment)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation rules
//! - [`dedup`] - Bounded transaction-id dedup cache
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in paise (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics
//!
//! ## Example Usage
//!
//! ```rust
//! use karobar_core::dedup::{BoundedDedupSet, DedupCache};
//! use karobar_core::money::Money;
//!
//! // Create money from paise (never from floats!)
//! let price = Money::from_paise(24900); // ₹249.00
//! let line_total = price.multiply_quantity(3);
//! assert_eq!(line_total, Money::from_rupees(747));
//!
//! // Transaction ids are applied at most once
//! let mut seen = BoundedDedupSet::new();
//! assert!(!seen.seen("tx-1"));
//! seen.mark_seen("tx-1");
//! assert!(seen.seen("tx-1"));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dedup;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use karobar_core::Money` instead of
// `use karobar_core::money::Money`

pub use dedup::{BoundedDedupSet, DedupCache};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Hard cap on the transaction dedup set.
///
/// When the set reaches this size it is cleared in full before the next
/// insert. See [`dedup::BoundedDedupSet`] for the policy and its
/// consequences.
pub const DEDUP_CACHE_CAPACITY: usize = 1000;
