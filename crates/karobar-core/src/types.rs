//! # Domain Types
//!
//! Core domain types used throughout Karobar.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │     Client      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  unit_price     │   │  product (snap) │   │  total_spent    │       │
//! │  │  units (String) │   │  selling_price  │   │  history (MRU)  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │ ProductPurchase │   │    Estimate     │   │    Payment      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  transaction_id │   │  ordered items  │   │  method         │       │
//! │  │  amount         │   │  client_name    │   │  estimate link  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity carries an `i64` id wrapped in a newtype. Ids are unique and
//! monotonic within one store snapshot: the next id is always
//! `max(existing) + 1`, or 1 for an empty slice. A backing store with a real
//! sequence can substitute its own allocation without touching these types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Entity Ids
// =============================================================================

macro_rules! entity_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn value(&self) -> i64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

entity_id!(
    /// Product identifier.
    ProductId
);
entity_id!(
    /// Sale identifier.
    SaleId
);
entity_id!(
    /// Client identifier.
    ClientId
);
entity_id!(
    /// Payment identifier.
    PaymentId
);
entity_id!(
    /// Estimate identifier.
    EstimateId
);

// =============================================================================
// Product
// =============================================================================

/// A product available for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier.
    pub id: ProductId,

    /// Display name shown on the dashboard and on receipts.
    pub name: String,

    /// Product category (free-form; the dashboard groups by it).
    pub category: String,

    /// Price per unit. Never negative.
    pub unit_price: Money,

    /// Units in stock, kept as a numeric string.
    ///
    /// The store collaborator persists this field as a string, so the core
    /// carries it as one. It must always hold a non-negative integer; parse
    /// it with [`crate::validation::parse_units`] or [`Product::units_in_stock`].
    /// Stock is only ever changed through the stock ledger.
    pub units: String,

    /// Reorder threshold: at or below this level the product shows up in
    /// the low-stock report.
    pub reorder_level: i64,

    /// When the product was created.
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Parses the units-in-stock field.
    ///
    /// Returns `None` when the field does not hold a non-negative integer.
    pub fn units_in_stock(&self) -> Option<i64> {
        crate::validation::parse_units(&self.units).ok()
    }

    /// Checks whether the requested quantity can be fulfilled from stock.
    ///
    /// An unparseable units field counts as zero stock.
    pub fn can_fulfill(&self, quantity: i64) -> bool {
        self.units_in_stock().unwrap_or(0) >= quantity
    }

    /// Checks whether stock has fallen to the reorder threshold.
    pub fn needs_reorder(&self) -> bool {
        self.units_in_stock().unwrap_or(0) <= self.reorder_level
    }

    /// Takes the denormalized snapshot that gets frozen onto a sale record.
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot {
            name: self.name.clone(),
            category: self.category.clone(),
            unit_price: self.unit_price,
        }
    }
}

/// Product data frozen onto a sale at the moment it is recorded.
///
/// ## Why a Snapshot?
/// The sale must keep displaying what was actually sold even if the product
/// is later renamed, recategorized or repriced. Same pattern as a receipt:
/// the paper does not change when the shelf price does.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    /// Product name at time of sale (frozen).
    pub name: String,

    /// Category at time of sale (frozen).
    pub category: String,

    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale of one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    /// Unique identifier.
    pub id: SaleId,

    /// The product that was sold (live reference for stock reversal).
    pub product_id: ProductId,

    /// Product data frozen at the moment of sale.
    pub product: ProductSnapshot,

    /// Quantity sold. Always positive.
    pub quantity: i64,

    /// Selling price per unit. Always positive. May differ from the
    /// product's list price (negotiated or discounted sales).
    pub selling_price: Money,

    /// When the sale was recorded.
    pub sold_at: DateTime<Utc>,

    /// The buying client, when one was selected from the client list.
    pub client_id: Option<ClientId>,

    /// Client name as entered on the sale form. May name a client that has
    /// no record yet.
    pub client_name: String,

    /// Set when this sale was recorded as one step of an estimate
    /// conversion; links the sale back to its originating estimate.
    pub estimate_id: Option<EstimateId>,
}

impl Sale {
    /// Line total for this sale (selling price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.selling_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Client
// =============================================================================

/// A client with running purchase aggregates.
///
/// ## Aggregate Invariant (soft)
/// `total_purchases` and `total_spent` should equal the sums over
/// `purchase_history`. Incremental updates can drift when a dedup check is
/// bypassed; `recalculate_totals` restores the invariant from the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique identifier.
    pub id: ClientId,

    /// Client name. Purchase application matches on the trimmed name,
    /// case-sensitively.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone.
    pub phone: String,

    /// When the client joined.
    pub joined_at: DateTime<Utc>,

    /// Running count of units purchased across all applied purchases.
    pub total_purchases: i64,

    /// Running sum of purchase amounts.
    pub total_spent: Money,

    /// Timestamp of the most recently applied purchase.
    pub last_purchase: Option<DateTime<Utc>>,

    /// Purchase history, most-recent-first.
    ///
    /// The ordering is a contract: "recent purchases" views read a prefix
    /// of this list without sorting.
    pub purchase_history: Vec<ProductPurchase>,

    /// GST registration number, when the client has one.
    pub gst_number: Option<String>,

    /// Billing address.
    pub address: Option<String>,
}

/// One purchase applied to a client's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPurchase {
    /// Name of the product purchased.
    pub product_name: String,

    /// Units purchased.
    pub quantity: i64,

    /// Total amount for this purchase.
    pub amount: Money,

    /// When the purchase was applied.
    pub purchased_at: DateTime<Utc>,

    /// Idempotency key for this apply-purchase event. Also the join key
    /// for recomputation audits.
    pub transaction_id: String,
}

// =============================================================================
// Estimate
// =============================================================================

/// A proposed multi-line order awaiting conversion into recorded sales.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Estimate {
    /// Unique identifier.
    pub id: EstimateId,

    /// Client the estimate was prepared for.
    pub client_name: String,

    /// Ordered line items. Conversion records one sale per item, in order.
    pub items: Vec<EstimateItem>,
}

/// One line item on an estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateItem {
    /// Product reference, when the estimate was built from the catalog.
    /// Items typed in free-form carry only a name.
    pub product_id: Option<ProductId>,

    /// Product name as written on the estimate.
    pub product_name: String,

    /// Quantity proposed.
    pub quantity: i64,

    /// Unit price proposed.
    pub unit_price: Money,
}

impl EstimateItem {
    /// Line total for this item (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Payment
// =============================================================================

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// UPI transfer.
    Upi,
    /// Cheque.
    Cheque,
    /// Direct bank transfer.
    BankTransfer,
}

/// A payment received from a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,

    /// Amount received. Always positive.
    pub amount: Money,

    /// How the payment was made.
    pub method: PaymentMethod,

    /// Paying client's name.
    pub client_name: String,

    /// The sale this payment settles, when it settles exactly one.
    pub sale_id: Option<SaleId>,

    /// Set when the payment concludes an estimate conversion; links the
    /// payment back to the converted estimate.
    pub estimate_id: Option<EstimateId>,

    /// When the payment was received.
    pub paid_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================
