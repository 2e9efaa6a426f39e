//! # Engine
//!
//! The single coordinator every collaborator talks to. Owns the
//! Mutex-guarded entity store and the transaction dedup cache, and exposes
//! one method per operation contract.
//!
//! ## Call Contracts
//! ```text
//! ┌────────────────────────────┬──────────────────────────────────────────┐
//! │ Operation                  │ Result                                   │
//! ├────────────────────────────┼──────────────────────────────────────────┤
//! │ record_sale                │ Sale or CoreError                        │
//! │ delete_sale                │ () or SaleNotFound                       │
//! │ apply_purchase             │ updated Client list (no-ops silent)      │
//! │ recalculate_totals         │ updated Client list                      │
//! │ start_estimate_conversion  │ initial ConversionState                  │
//! │ record_next_estimate_item  │ recorded Sale + next step, or CoreError  │
//! │ record_payment             │ Payment or CoreError                     │
//! └────────────────────────────┴──────────────────────────────────────────┘
//! ```
//!
//! Every mutation acquires the store lock, runs one pure transition from
//! `ops`, swaps the replacement slices in, and releases, so mutations
//! never interleave. Results are definite before the method returns; any
//! persistence a collaborator performs happens after, with the data this
//! engine handed back.
//!
//! Duplicate `record_sale` submissions (double-click, re-render) are the
//! CALLER's job to guard with a submitting flag; the engine dedupes only
//! purchase aggregation, by transaction id.

use std::sync::Mutex;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use karobar_core::{
    BoundedDedupSet, Client, ClientId, CoreError, CoreResult, Estimate, Money, Payment, Product,
    ProductPurchase, Sale, SaleId,
};

use crate::ops::aggregate::{self, PurchaseEvent};
use crate::ops::estimate::{self, ConversionState, ConversionStep};
use crate::ops::payment::{self, PaymentInput, RecordedPayment};
use crate::ops::sale::{self, DeletedSale, RecordedSale, SaleInput};
use crate::state::{EntityStore, StoreState};
use crate::txn;

// =============================================================================
// Inputs / Outputs
// =============================================================================

/// Input for applying a purchase to a client's aggregates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyPurchaseInput {
    /// Client the purchase belongs to.
    pub client_name: String,

    /// Total amount of the purchase.
    pub amount: Money,

    /// Name of the product purchased.
    pub product_name: String,

    /// Units purchased.
    pub quantity: i64,

    /// Stable idempotency key. When absent, an id is generated from the
    /// purchase fields plus the clock; such ids never match across
    /// retries, so pass a stable id wherever a retry is possible.
    pub transaction_id: Option<String>,
}

/// Outcome of one estimate conversion step.
#[derive(Debug, Clone)]
pub struct EstimateStepOutcome {
    /// The sale recorded for the current line item. `None` only when the
    /// estimate had no items at all.
    pub sale: Option<Sale>,

    /// Where the conversion stands now.
    pub step: ConversionStep,
}

// =============================================================================
// Engine
// =============================================================================

/// The transactional core behind the dashboard.
#[derive(Debug)]
pub struct Engine {
    store: StoreState,
    deduper: Mutex<BoundedDedupSet>,
}

impl Engine {
    /// Creates an engine over a seeded store with a fresh dedup cache.
    pub fn new(store: EntityStore) -> Self {
        Engine::with_dedup_cache(store, BoundedDedupSet::new())
    }

    /// Creates an engine with a custom dedup cache (tests exercise the
    /// overflow policy through this).
    pub fn with_dedup_cache(store: EntityStore, deduper: BoundedDedupSet) -> Self {
        Engine {
            store: StoreState::new(store),
            deduper: Mutex::new(deduper),
        }
    }

    // -------------------------------------------------------------------------
    // Snapshot Reads
    // -------------------------------------------------------------------------
    // Collaborators receive cloned slices: plain data they can render or
    // persist without holding any lock.

    /// Current product catalog.
    pub fn products(&self) -> Vec<Product> {
        self.store.with_store(|s| s.products.clone())
    }

    /// Recorded sales.
    pub fn sales(&self) -> Vec<Sale> {
        self.store.with_store(|s| s.sales.clone())
    }

    /// Clients with their running aggregates.
    pub fn clients(&self) -> Vec<Client> {
        self.store.with_store(|s| s.clients.clone())
    }

    /// Received payments.
    pub fn payments(&self) -> Vec<Payment> {
        self.store.with_store(|s| s.payments.clone())
    }

    /// Products at or below their reorder threshold.
    pub fn low_stock_products(&self) -> Vec<Product> {
        self.store
            .with_store(|s| s.products.iter().filter(|p| p.needs_reorder()).cloned().collect())
    }

    /// A client's most recent purchases, newest first.
    pub fn recent_purchases(&self, client_id: ClientId, limit: usize) -> Vec<ProductPurchase> {
        self.store.with_store(|s| {
            s.client(client_id)
                .map(|c| c.purchase_history.iter().take(limit).cloned().collect())
                .unwrap_or_default()
        })
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    /// Validates and records a sale, decrementing stock.
    ///
    /// See [`crate::ops::sale::record_sale`] for the validation order.
    pub fn record_sale(&self, input: &SaleInput) -> CoreResult<Sale> {
        debug!(product_id = %input.product_id, quantity = input.quantity, "record_sale");

        let sold_at = Utc::now();
        let result = self.store.with_store_mut(|s| {
            let RecordedSale { sale, products } = sale::record_sale(s, input, sold_at)?;
            s.products = products;
            s.sales.push(sale.clone());
            Ok(sale)
        });

        if let Ok(sale) = &result {
            info!(
                sale_id = %sale.id,
                product = %sale.product.name,
                quantity = sale.quantity,
                total = %sale.line_total(),
                "Sale recorded"
            );
        }

        result
    }

    /// Deletes a sale and returns its quantity to stock.
    ///
    /// Client totals are left alone; run [`Engine::recalculate_totals`]
    /// when a client's aggregates must follow a deletion.
    pub fn delete_sale(&self, sale_id: SaleId) -> CoreResult<()> {
        debug!(sale_id = %sale_id, "delete_sale");

        let deleted = self.store.with_store_mut(|s| {
            let DeletedSale {
                sale,
                sales,
                products,
            } = sale::delete_sale(s, sale_id)?;
            s.sales = sales;
            s.products = products;
            Ok::<_, CoreError>(sale)
        })?;

        info!(
            sale_id = %deleted.id,
            product = %deleted.product.name,
            restored = deleted.quantity,
            "Sale deleted, stock restored"
        );

        Ok(())
    }

    // -------------------------------------------------------------------------
    // Client Aggregates
    // -------------------------------------------------------------------------

    /// Applies a purchase to the matching client's running totals.
    ///
    /// Returns the updated client list. Rejected events (blank client,
    /// non-positive amount/quantity, unknown client, duplicate transaction
    /// id) return the list unchanged, silently, so retried UI actions are
    /// harmless.
    pub fn apply_purchase(&self, input: &ApplyPurchaseInput) -> Vec<Client> {
        let transaction_id = input.transaction_id.clone().unwrap_or_else(|| {
            txn::generate_transaction_id(
                &input.client_name,
                &input.product_name,
                input.quantity,
                input.amount,
            )
        });

        debug!(
            client = %input.client_name,
            amount = %input.amount,
            transaction_id = %transaction_id,
            "apply_purchase"
        );

        let event = PurchaseEvent {
            client_name: input.client_name.clone(),
            amount: input.amount,
            product_name: input.product_name.clone(),
            quantity: input.quantity,
            transaction_id,
        };

        let applied_at = Utc::now();
        self.store.with_store_mut(|s| {
            // Store lock is held first, then the dedup lock; both are
            // released together at the end of this closure.
            let mut deduper = self.deduper.lock().expect("Dedup mutex poisoned");
            s.clients = aggregate::apply_purchase(&s.clients, &mut *deduper, &event, applied_at);
            s.clients.clone()
        })
    }

    /// Recomputes a client's totals from their purchase history.
    pub fn recalculate_totals(&self, client_id: ClientId) -> Vec<Client> {
        debug!(client_id = %client_id, "recalculate_totals");

        self.store.with_store_mut(|s| {
            s.clients = aggregate::recalculate_totals(&s.clients, client_id);
            s.clients.clone()
        })
    }

    // -------------------------------------------------------------------------
    // Estimate Conversion
    // -------------------------------------------------------------------------

    /// Starts converting an approved estimate into recorded sales.
    pub fn start_estimate_conversion(&self, estimate: Estimate) -> ConversionState {
        info!(
            estimate_id = %estimate.id,
            client = %estimate.client_name,
            items = estimate.items.len(),
            "Estimate conversion started"
        );

        ConversionState::start(estimate)
    }

    /// Records a sale for the conversion's current line item and advances.
    ///
    /// On failure (unmatched item, validation, insufficient stock) the
    /// caller keeps its current state: the index does not move, nothing was
    /// recorded, and the specific error says why. There is no auto-retry.
    ///
    /// Sales recorded by earlier steps stay recorded whatever happens
    /// later: abandoning a conversion mid-way is partial fulfillment, not
    /// an error.
    pub fn record_next_estimate_item(
        &self,
        state: &ConversionState,
    ) -> CoreResult<EstimateStepOutcome> {
        let estimate = state.estimate();
        debug!(estimate_id = %estimate.id, index = state.index(), "record_next_estimate_item");

        let Some(item) = state.current_item() else {
            // An estimate with no items has nothing to record; hand the
            // caller straight to payment.
            return Ok(EstimateStepOutcome {
                sale: None,
                step: ConversionStep::Complete {
                    estimate_id: estimate.id,
                },
            });
        };

        let sold_at = Utc::now();
        let outcome = self.store.with_store_mut(|s| {
            let product_id = estimate::resolve_item(&s.products, item)
                .product()
                .map(|p| p.id)
                .ok_or_else(|| CoreError::ProductNotMatched(item.product_name.clone()))?;

            let input = SaleInput {
                product_id,
                quantity: item.quantity,
                selling_price: item.unit_price,
                client_id: s.client_by_name(&estimate.client_name).map(|c| c.id),
                client_name: estimate.client_name.clone(),
                estimate_id: Some(estimate.id),
            };

            let RecordedSale { sale, products } = sale::record_sale(s, &input, sold_at)?;
            s.products = products;
            s.sales.push(sale.clone());

            Ok(EstimateStepOutcome {
                sale: Some(sale),
                step: estimate::advance(state.clone()),
            })
        });

        if let Ok(step_outcome) = &outcome {
            info!(
                estimate_id = %estimate.id,
                index = state.index(),
                complete = matches!(step_outcome.step, ConversionStep::Complete { .. }),
                "Estimate item recorded"
            );
        }

        outcome
    }

    // -------------------------------------------------------------------------
    // Payments
    // -------------------------------------------------------------------------

    /// Validates and records a payment.
    pub fn record_payment(&self, input: &PaymentInput) -> CoreResult<Payment> {
        debug!(client = %input.client_name, amount = %input.amount, "record_payment");

        let paid_at = Utc::now();
        let result = self.store.with_store_mut(|s| {
            let RecordedPayment { payment, payments } = payment::record_payment(s, input, paid_at)?;
            s.payments = payments;
            Ok(payment)
        });

        if let Ok(payment) = &result {
            info!(
                payment_id = %payment.id,
                amount = %payment.amount,
                client = %payment.client_name,
                "Payment recorded"
            );
        }

        result
    }
}
