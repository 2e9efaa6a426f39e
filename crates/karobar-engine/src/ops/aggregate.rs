//! # Client Aggregator
//!
//! Applies purchase events to a client's running totals and purchase
//! history, and recomputes those totals from history when they drift.
//!
//! ## Idempotency
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The dashboard fires apply-purchase from several places: the sale      │
//! │  form's submit handler, the estimate conversion loop, and a payment    │
//! │  dialog that re-renders. Any of them can fire twice for one logical    │
//! │  event. The transaction id + dedup cache make the second application   │
//! │  a no-op, so client totals count each purchase exactly once.           │
//! │                                                                         │
//! │  apply_purchase(ev, "tx-1")  →  totals += amount, history ← front-push │
//! │  apply_purchase(ev, "tx-1")  →  no-op (seen)                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No-op, Not Error
//! A rejected event (blank client, non-positive amount or quantity, unknown
//! client, duplicate id) returns the client slice unchanged. Callers
//! validate before calling; the checks here are the second line. Surfacing
//! them as errors would turn every retried click into an error toast.

use chrono::{DateTime, Utc};

use karobar_core::{Client, ClientId, DedupCache, Money, ProductPurchase};

/// One purchase-application event, with its idempotency key resolved.
#[derive(Debug, Clone)]
pub struct PurchaseEvent {
    /// Client the purchase belongs to (matched by trimmed name,
    /// case-sensitively).
    pub client_name: String,

    /// Total amount of the purchase.
    pub amount: Money,

    /// Name of the product purchased.
    pub product_name: String,

    /// Units purchased.
    pub quantity: i64,

    /// Idempotency key: caller-supplied stable id, or a generated one.
    pub transaction_id: String,
}

/// Applies a purchase event to the matching client.
///
/// Returns the replacement client slice. The slice comes back unchanged
/// when the event is rejected (see module docs); otherwise the matching
/// client gets:
/// - a new [`ProductPurchase`] at the FRONT of `purchase_history`
///   (most-recent-first ordering is a contract other components rely on)
/// - `total_purchases` incremented by the quantity
/// - `total_spent` incremented by the amount
/// - `last_purchase` set to `applied_at`
///
/// and the transaction id is marked seen.
///
/// Clients are never created here: an unknown name is a no-op.
pub fn apply_purchase(
    clients: &[Client],
    deduper: &mut dyn DedupCache,
    event: &PurchaseEvent,
    applied_at: DateTime<Utc>,
) -> Vec<Client> {
    let client_name = event.client_name.trim();
    if client_name.is_empty() || !event.amount.is_positive() || event.quantity <= 0 {
        return clients.to_vec();
    }

    if deduper.seen(&event.transaction_id) {
        return clients.to_vec();
    }

    if !clients.iter().any(|c| c.name.trim() == client_name) {
        return clients.to_vec();
    }

    let next = clients
        .iter()
        .map(|c| {
            if c.name.trim() != client_name {
                return c.clone();
            }

            let mut updated = c.clone();
            updated.purchase_history.insert(
                0,
                ProductPurchase {
                    product_name: event.product_name.clone(),
                    quantity: event.quantity,
                    amount: event.amount,
                    purchased_at: applied_at,
                    transaction_id: event.transaction_id.clone(),
                },
            );
            updated.total_purchases += event.quantity;
            updated.total_spent += event.amount;
            updated.last_purchase = Some(applied_at);
            updated
        })
        .collect();

    deduper.mark_seen(&event.transaction_id);

    next
}

/// Recomputes a client's totals from their purchase history.
///
/// This is the authoritative repair for aggregate drift: history entries
/// with a positive quantity and a non-negative amount are summed; anything
/// else is discarded from the sums silently. The history itself and
/// `last_purchase` are left as they are.
///
/// An unknown client id returns the slice unchanged.
pub fn recalculate_totals(clients: &[Client], client_id: ClientId) -> Vec<Client> {
    clients
        .iter()
        .map(|c| {
            if c.id != client_id {
                return c.clone();
            }

            let valid: Vec<&ProductPurchase> = c
                .purchase_history
                .iter()
                .filter(|p| p.quantity > 0 && !p.amount.is_negative())
                .collect();

            let mut updated = c.clone();
            updated.total_purchases = valid.iter().map(|p| p.quantity).sum();
            updated.total_spent = valid
                .iter()
                .fold(Money::zero(), |acc, p| acc + p.amount);
            updated
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use karobar_core::BoundedDedupSet;

    fn clients() -> Vec<Client> {
        vec![Client {
            id: ClientId(1),
            name: "Acme Traders".to_string(),
            email: "acme@example.com".to_string(),
            phone: "9876543210".to_string(),
            joined_at: Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap(),
            total_purchases: 0,
            total_spent: Money::zero(),
            last_purchase: None,
            purchase_history: Vec::new(),
            gst_number: None,
            address: None,
        }]
    }

    fn event(txn: &str) -> PurchaseEvent {
        PurchaseEvent {
            client_name: "Acme Traders".to_string(),
            amount: Money::from_rupees(300),
            product_name: "Steel Bottle 1L".to_string(),
            quantity: 3,
            transaction_id: txn.to_string(),
        }
    }

    #[test]
    fn test_apply_purchase_updates_totals_and_history() {
        let mut deduper = BoundedDedupSet::new();
        let now = Utc::now();

        let next = apply_purchase(&clients(), &mut deduper, &event("tx-1"), now);

        let acme = &next[0];
        assert_eq!(acme.total_purchases, 3);
        assert_eq!(acme.total_spent, Money::from_rupees(300));
        assert_eq!(acme.last_purchase, Some(now));
        assert_eq!(acme.purchase_history.len(), 1);
        assert_eq!(acme.purchase_history[0].transaction_id, "tx-1");
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let mut deduper = BoundedDedupSet::new();
        let now = Utc::now();

        let step1 = apply_purchase(&clients(), &mut deduper, &event("tx-1"), now);
        let mut second = event("tx-2");
        second.product_name = "Copper Jug".to_string();
        let step2 = apply_purchase(&step1, &mut deduper, &second, now);

        let history = &step2[0].purchase_history;
        assert_eq!(history[0].product_name, "Copper Jug");
        assert_eq!(history[1].product_name, "Steel Bottle 1L");
    }

    #[test]
    fn test_duplicate_transaction_is_a_noop() {
        let mut deduper = BoundedDedupSet::new();
        let now = Utc::now();

        let once = apply_purchase(&clients(), &mut deduper, &event("tx-1"), now);
        let twice = apply_purchase(&once, &mut deduper, &event("tx-1"), now);

        assert_eq!(twice[0].total_spent, Money::from_rupees(300));
        assert_eq!(twice[0].purchase_history.len(), 1);
    }

    #[test]
    fn test_rejected_events_leave_clients_unchanged() {
        let mut deduper = BoundedDedupSet::new();
        let now = Utc::now();
        let before = clients();

        let mut blank = event("tx-1");
        blank.client_name = "   ".to_string();
        assert_eq!(apply_purchase(&before, &mut deduper, &blank, now), before);

        let mut zero_amount = event("tx-2");
        zero_amount.amount = Money::zero();
        assert_eq!(
            apply_purchase(&before, &mut deduper, &zero_amount, now),
            before
        );

        let mut zero_qty = event("tx-3");
        zero_qty.quantity = 0;
        assert_eq!(apply_purchase(&before, &mut deduper, &zero_qty, now), before);

        // Rejected events must not burn their transaction id.
        assert!(!deduper.seen("tx-1"));
        assert!(!deduper.seen("tx-2"));
        assert!(!deduper.seen("tx-3"));
    }

    #[test]
    fn test_unknown_client_is_never_created() {
        let mut deduper = BoundedDedupSet::new();
        let mut unknown = event("tx-1");
        unknown.client_name = "Nobody & Sons".to_string();

        let next = apply_purchase(&clients(), &mut deduper, &unknown, Utc::now());
        assert_eq!(next.len(), 1);
        assert_eq!(next[0].name, "Acme Traders");
        assert!(!deduper.seen("tx-1"));
    }

    #[test]
    fn test_name_match_trims_but_keeps_case() {
        let mut deduper = BoundedDedupSet::new();
        let mut padded = event("tx-1");
        padded.client_name = "  Acme Traders  ".to_string();

        let next = apply_purchase(&clients(), &mut deduper, &padded, Utc::now());
        assert_eq!(next[0].total_purchases, 3);

        let mut wrong_case = event("tx-2");
        wrong_case.client_name = "acme traders".to_string();
        let unchanged = apply_purchase(&next, &mut deduper, &wrong_case, Utc::now());
        assert_eq!(unchanged[0].total_purchases, 3);
    }

    #[test]
    fn test_recalculate_totals_filters_invalid_entries() {
        let mut list = clients();
        let now = Utc::now();
        list[0].purchase_history = vec![
            ProductPurchase {
                product_name: "Steel Bottle 1L".to_string(),
                quantity: 3,
                amount: Money::from_rupees(300),
                purchased_at: now,
                transaction_id: "tx-1".to_string(),
            },
            ProductPurchase {
                product_name: "Copper Jug".to_string(),
                quantity: 0, // invalid: dropped from the sums
                amount: Money::from_rupees(599),
                purchased_at: now,
                transaction_id: "tx-2".to_string(),
            },
            ProductPurchase {
                product_name: "Clay Pot".to_string(),
                quantity: 2,
                amount: Money::from_rupees(-50), // invalid: dropped from the sums
                purchased_at: now,
                transaction_id: "tx-3".to_string(),
            },
        ];
        // Drifted totals.
        list[0].total_purchases = 42;
        list[0].total_spent = Money::from_rupees(9999);

        let next = recalculate_totals(&list, ClientId(1));
        assert_eq!(next[0].total_purchases, 3);
        assert_eq!(next[0].total_spent, Money::from_rupees(300));
        // History is repaired reading material, not rewritten.
        assert_eq!(next[0].purchase_history.len(), 3);
    }

    #[test]
    fn test_recalculate_totals_unknown_client() {
        let before = clients();
        assert_eq!(recalculate_totals(&before, ClientId(99)), before);
    }
}
