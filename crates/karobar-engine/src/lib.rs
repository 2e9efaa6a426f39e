//! # karobar-engine: The Transactional Core of Karobar
//!
//! This crate keeps the dashboard's numbers honest. It owns the one shared
//! snapshot of Products, Sales, Clients and Payments, and funnels every
//! mutation through a synchronous, single-writer transition:
//!
//! - **Stock stays consistent**: recording a sale decrements inventory,
//!   deleting a sale returns it, and the count never goes below zero.
//! - **Client aggregates never double-count**: purchase application is
//!   idempotent per transaction id, and totals can always be rebuilt from
//!   the purchase history.
//! - **Estimate conversion resumes correctly**: a multi-item estimate is
//!   converted one committed sale at a time, surviving dialog closes and
//!   re-renders, and signals when it is time to take payment.
//!
//! ## Module Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        karobar-engine                                   │
//! │                                                                         │
//! │  ┌───────────┐     one method per contract      ┌──────────────────┐   │
//! │  │  engine   │ ───────────────────────────────► │  ops             │   │
//! │  │  Engine   │   lock, transition, replace      │  stock,sale,     │   │
//! │  └─────┬─────┘                                  │  aggregate,      │   │
//! │        │                                        │  estimate,       │   │
//! │        ▼                                        │  payment         │   │
//! │  ┌───────────┐                                  └──────────────────┘   │
//! │  │  state    │  EntityStore + StoreState (Mutex)                       │
//! │  └───────────┘                                                         │
//! │  ┌───────────┐                                                         │
//! │  │  txn      │  fallback transaction-id generator                      │
//! │  └───────────┘                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use chrono::Utc;
//! use karobar_core::{Money, Product, ProductId};
//! use karobar_engine::{Engine, EntityStore, SaleInput};
//!
//! let mut store = EntityStore::new();
//! store.products.push(Product {
//!     id: ProductId(1),
//!     name: "Steel Bottle 1L".to_string(),
//!     category: "Kitchen".to_string(),
//!     unit_price: Money::from_rupees(249),
//!     units: "10".to_string(),
//!     reorder_level: 2,
//!     created_at: Utc::now(),
//! });
//!
//! let engine = Engine::new(store);
//! let sale = engine
//!     .record_sale(&SaleInput {
//!         product_id: ProductId(1),
//!         quantity: 3,
//!         selling_price: Money::from_rupees(249),
//!         client_id: None,
//!         client_name: "Acme Traders".to_string(),
//!         estimate_id: None,
//!     })
//!     .unwrap();
//!
//! assert_eq!(engine.products()[0].units, "7");
//! assert_eq!(sale.line_total(), Money::from_rupees(747));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

mod engine;
pub mod ops;
pub mod state;
pub mod txn;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use engine::{ApplyPurchaseInput, Engine, EstimateStepOutcome};
pub use ops::aggregate::PurchaseEvent;
pub use ops::estimate::{resolve_item, ConversionState, ConversionStep, ItemResolution};
pub use ops::payment::PaymentInput;
pub use ops::sale::SaleInput;
pub use state::{EntityStore, StoreState};
