//! Rent payments, payment status, and the deduplicated payment ledger.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{DateWindow, Month, PaymentId, PropertyId, RoomId, RoomTenantId, Rwf, TenantId};

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash handed to the landlord or manager.
    Cash,
    /// MTN MoMo or Airtel Money.
    MobileMoney,
    /// Bank transfer.
    BankTransfer,
}

impl PaymentMethod {
    /// Database string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::MobileMoney => "mobile_money",
            Self::BankTransfer => "bank_transfer",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row in `payments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    /// Primary key.
    pub id: PaymentId,
    /// Occupancy the payment is for.
    pub room_tenant_id: RoomTenantId,
    /// Amount in whole francs.
    pub amount: Rwf,
    /// Day the money was received.
    pub payment_date: NaiveDate,
    /// Payment channel.
    pub payment_method: PaymentMethod,
    /// Receipt or transaction reference.
    pub reference: Option<String>,
    /// Soft-delete marker.
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Validation failures for payment input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaymentValidationError {
    /// Amount is zero or negative.
    #[error("payment amount must be greater than zero")]
    NonPositiveAmount,
    /// Payment date is after today.
    #[error("payment date {date} is in the future")]
    FutureDate {
        /// Rejected date.
        date: NaiveDate,
    },
}

impl PaymentValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::NonPositiveAmount => "amount",
            Self::FutureDate { .. } => "paymentDate",
        }
    }
}

/// Input for recording a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    /// Occupancy being paid for.
    pub room_tenant_id: RoomTenantId,
    /// Amount received.
    pub amount: Rwf,
    /// Day received.
    pub payment_date: NaiveDate,
    /// Channel used.
    pub payment_method: PaymentMethod,
    /// Optional reference.
    pub reference: Option<String>,
}

impl NewPayment {
    /// Require a positive amount and a date no later than `today`.
    pub fn validated(self, today: NaiveDate) -> Result<Self, PaymentValidationError> {
        if !self.amount.is_positive() {
            return Err(PaymentValidationError::NonPositiveAmount);
        }
        if self.payment_date > today {
            return Err(PaymentValidationError::FutureDate {
                date: self.payment_date,
            });
        }
        Ok(Self {
            reference: self
                .reference
                .map(|r| r.trim().to_owned())
                .filter(|r| !r.is_empty()),
            ..self
        })
    }
}

/// A payment tagged with the property its occupancy belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributedPayment {
    /// Property of the paid-for room.
    pub property_id: PropertyId,
    /// The payment row.
    pub payment: Payment,
}

/// Rent status of an occupancy for one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Paid in full.
    Paid,
    /// Something paid, but less than the rent.
    Partial,
    /// Nothing paid and the due date has passed.
    Overdue,
    /// Nothing paid yet, not due.
    Pending,
}

/// Classify a period's rent.
///
/// Rules apply in order: paid in full, partially paid, overdue (nothing paid
/// and `today` is after `due_date`), otherwise pending.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use icumbi::domain::{PaymentStatus, Rwf, payment_status};
///
/// let due = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
/// let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
/// assert_eq!(
///     payment_status(Rwf::new(80_000), Rwf::ZERO, today, due),
///     PaymentStatus::Overdue
/// );
/// ```
#[must_use]
pub fn payment_status(
    expected_rent: Rwf,
    paid_in_period: Rwf,
    today: NaiveDate,
    due_date: NaiveDate,
) -> PaymentStatus {
    if paid_in_period >= expected_rent {
        PaymentStatus::Paid
    } else if paid_in_period.is_positive() {
        PaymentStatus::Partial
    } else if today > due_date {
        PaymentStatus::Overdue
    } else {
        PaymentStatus::Pending
    }
}

/// One occupancy's standing for a month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantPaymentSummary {
    /// Occupancy the summary describes.
    pub occupancy_id: RoomTenantId,
    /// Tenant id.
    pub tenant_id: TenantId,
    /// Tenant name.
    pub tenant_name: String,
    /// Room id.
    pub room_id: RoomId,
    /// Room label.
    pub room_number: String,
    /// Rent due for the month.
    pub rent: Rwf,
    /// Paid within the month.
    pub paid: Rwf,
    /// Outstanding, never negative.
    pub balance: Rwf,
    /// Derived status.
    pub status: PaymentStatus,
}

/// Payments keyed by id so a row fetched twice is counted once.
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use icumbi::domain::{DateWindow, Payment, PaymentId, PaymentLedger, PaymentMethod, RoomTenantId, Rwf};
///
/// let payment = Payment {
///     id: PaymentId::random(),
///     room_tenant_id: RoomTenantId::random(),
///     amount: Rwf::new(60_000),
///     payment_date: NaiveDate::from_ymd_opt(2024, 6, 3).unwrap(),
///     payment_method: PaymentMethod::Cash,
///     reference: None,
///     deleted_at: None,
/// };
/// let ledger = PaymentLedger::from_rows([payment.clone(), payment]);
/// let june = DateWindow::current_month(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
/// assert_eq!(ledger.total_in(&june), Rwf::new(60_000));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentLedger {
    rows: BTreeMap<PaymentId, Payment>,
}

impl PaymentLedger {
    /// Build a ledger, dropping duplicate ids and trashed rows.
    pub fn from_rows(rows: impl IntoIterator<Item = Payment>) -> Self {
        let mut ledger = Self::default();
        ledger.extend(rows);
        ledger
    }

    /// Merge more rows; ids already present are ignored.
    pub fn extend(&mut self, rows: impl IntoIterator<Item = Payment>) {
        for row in rows.into_iter().filter(|row| row.deleted_at.is_none()) {
            self.rows.entry(row.id).or_insert(row);
        }
    }

    /// Number of distinct payments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no payments are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate distinct payments in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Payment> {
        self.rows.values()
    }

    /// Sum of payments dated within `window`.
    #[must_use]
    pub fn total_in(&self, window: &DateWindow) -> Rwf {
        self.iter()
            .filter(|p| window.contains(p.payment_date))
            .map(|p| p.amount)
            .sum()
    }

    /// Sum paid against one occupancy within `window`.
    #[must_use]
    pub fn paid_for(&self, occupancy: RoomTenantId, window: &DateWindow) -> Rwf {
        self.iter()
            .filter(|p| p.room_tenant_id == occupancy && window.contains(p.payment_date))
            .map(|p| p.amount)
            .sum()
    }

    /// Monthly totals across `window`, with empty months present as zero.
    #[must_use]
    pub fn monthly_totals(&self, window: &DateWindow) -> BTreeMap<Month, Rwf> {
        let mut totals: BTreeMap<Month, Rwf> = window
            .months()
            .into_iter()
            .map(|month| (month, Rwf::ZERO))
            .collect();
        for payment in self.iter().filter(|p| window.contains(p.payment_date)) {
            *totals
                .entry(Month::containing(payment.payment_date))
                .or_default() += payment.amount;
        }
        totals
    }
}
