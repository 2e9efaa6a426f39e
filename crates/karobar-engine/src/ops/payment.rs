//! # Payment Recording
//!
//! Records payments received from clients. A payment can settle a single
//! sale, conclude an estimate conversion (carrying the estimate id the
//! Complete signal handed over), or stand alone as an on-account receipt.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use karobar_core::validation::{validate_client_name, validate_payment_amount};
use karobar_core::{CoreResult, EstimateId, Money, Payment, PaymentMethod, SaleId};

use crate::state::EntityStore;

/// Input for recording one payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    /// Amount received.
    pub amount: Money,

    /// How the payment was made.
    pub method: PaymentMethod,

    /// Paying client's name.
    pub client_name: String,

    /// The sale this payment settles, when it settles exactly one.
    pub sale_id: Option<SaleId>,

    /// The estimate whose conversion this payment concludes.
    pub estimate_id: Option<EstimateId>,
}

/// A successfully recorded payment plus the replacement payment slice.
#[derive(Debug, Clone)]
pub struct RecordedPayment {
    /// The new payment record.
    pub payment: Payment,

    /// Payment slice with the new record appended.
    pub payments: Vec<Payment>,
}

/// Validates and records a payment.
///
/// ## Errors
/// - `Validation(MustBePositive)` for a zero or negative amount
/// - `Validation(Required)` for a blank client name
pub fn record_payment(
    store: &EntityStore,
    input: &PaymentInput,
    paid_at: DateTime<Utc>,
) -> CoreResult<RecordedPayment> {
    validate_payment_amount(input.amount)?;
    let client_name = validate_client_name(&input.client_name)?;

    let payment = Payment {
        id: store.next_payment_id(),
        amount: input.amount,
        method: input.method,
        client_name: client_name.to_string(),
        sale_id: input.sale_id,
        estimate_id: input.estimate_id,
        paid_at,
    };

    let mut payments = store.payments.clone();
    payments.push(payment.clone());

    Ok(RecordedPayment { payment, payments })
}

#[cfg(test)]
mod tests {
    use super::*;
    use karobar_core::{CoreError, PaymentId};

    fn input() -> PaymentInput {
        PaymentInput {
            amount: Money::from_rupees(600),
            method: PaymentMethod::Upi,
            client_name: "Acme Traders".to_string(),
            sale_id: None,
            estimate_id: Some(EstimateId(7)),
        }
    }

    #[test]
    fn test_record_payment_links_estimate() {
        let store = EntityStore::new();
        let recorded = record_payment(&store, &input(), Utc::now()).unwrap();

        assert_eq!(recorded.payment.id, PaymentId(1));
        assert_eq!(recorded.payment.estimate_id, Some(EstimateId(7)));
        assert_eq!(recorded.payments.len(), 1);
    }

    #[test]
    fn test_record_payment_rejects_non_positive_amount() {
        let store = EntityStore::new();
        let mut zero = input();
        zero.amount = Money::zero();
        assert!(matches!(
            record_payment(&store, &zero, Utc::now()).unwrap_err(),
            CoreError::Validation(_)
        ));
    }

    #[test]
    fn test_record_payment_requires_client_name() {
        let store = EntityStore::new();
        let mut blank = input();
        blank.client_name = "   ".to_string();
        assert!(matches!(
            record_payment(&store, &blank, Utc::now()).unwrap_err(),
            CoreError::Validation(_)
        ));
    }
}
