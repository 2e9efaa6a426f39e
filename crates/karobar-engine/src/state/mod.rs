//! # State Module
//!
//! Owns the shared entity snapshot.
//!
//! ## One Snapshot, One Lock
//! The entity store is the single shared mutable resource in the system.
//! Rather than one lock per entity type, the WHOLE snapshot sits behind one
//! `Mutex`:
//!
//! 1. **Single-writer discipline**: a mutation never interleaves with
//!    another mutation, so cross-entity operations (record sale = check
//!    product + append sale + decrement stock) are atomic by construction
//! 2. **No lock ordering to get wrong**: there is only one lock
//! 3. **Operations are short**: every mutation is a pure in-memory
//!    transition; holding the lock for its duration costs microseconds
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  Collaborator call         Engine                  StoreState           │
//! │  ─────────────────         ──────                  ──────────           │
//! │                                                                         │
//! │  record_sale(input) ─────► validate ─────────────► with_store_mut(|s|  │
//! │                                                      compute new slices │
//! │                                                      replace slices)    │
//! │                                                                         │
//! │  products() ─────────────► read snapshot ────────► with_store(|s|      │
//! │                                                      s.products.clone())│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod store;

pub use store::{EntityStore, StoreState};
