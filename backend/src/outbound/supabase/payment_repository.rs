//! PostgREST-backed `PaymentRepository` adapter.

use async_trait::async_trait;
use tracing::warn;

use super::client::SupabaseClient;
use super::dto::{PAYMENT_PROPERTY_FILTER, PAYMENT_WITH_PROPERTY, PaymentInsert, PaymentRow};
use super::error::{BackendError, BackendErrorKind};
use super::error_mapping::map_basic_backend_error;
use super::query::TableQuery;
use crate::domain::ports::{PaymentRepository, PaymentRepositoryError};
use crate::domain::{
    AttributedPayment, Caller, DateWindow, NewPayment, Payment, PropertyId, RoomTenantId,
};

const TABLE: &str = "payments";

/// Payment rows read and written with the caller's token.
#[derive(Debug, Clone)]
pub struct SupabasePaymentRepository {
    client: SupabaseClient,
}

impl SupabasePaymentRepository {
    /// Create the adapter.
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }
}

fn map_error(error: BackendError) -> PaymentRepositoryError {
    map_basic_backend_error(
        error,
        PaymentRepositoryError::connection,
        PaymentRepositoryError::denied,
        PaymentRepositoryError::query,
    )
}

fn in_window(query: TableQuery, window: &DateWindow) -> TableQuery {
    query
        .is_null("deleted_at")
        .gte("payment_date", window.start())
        .lte("payment_date", window.end())
        .order("payment_date", false)
}

fn occupancy_query(occupancies: &[RoomTenantId], window: &DateWindow) -> TableQuery {
    in_window(
        TableQuery::table(TABLE).in_("room_tenant_id", occupancies),
        window,
    )
}

fn property_query(property_ids: &[PropertyId], window: &DateWindow) -> TableQuery {
    in_window(
        TableQuery::table(TABLE)
            .select(PAYMENT_WITH_PROPERTY)
            .in_(PAYMENT_PROPERTY_FILTER, property_ids),
        window,
    )
}

fn attribute(rows: Vec<PaymentRow>) -> Vec<AttributedPayment> {
    rows.into_iter()
        .filter_map(|row| match row.property_id() {
            Some(property_id) => Some(AttributedPayment {
                property_id,
                payment: Payment::from(row),
            }),
            None => {
                warn!("payment row returned without its property embed; skipping");
                None
            }
        })
        .collect()
}

#[async_trait]
impl PaymentRepository for SupabasePaymentRepository {
    async fn insert(
        &self,
        caller: &Caller,
        payment: &NewPayment,
    ) -> Result<Payment, PaymentRepositoryError> {
        let rows: Vec<PaymentRow> = self
            .client
            .insert(&caller.token, TABLE, &PaymentInsert::from(payment))
            .await
            .map_err(map_error)?;
        rows.into_iter().next().map(Payment::from).ok_or_else(|| {
            map_error(BackendError::new(
                BackendErrorKind::Decode,
                "insert payments",
                "no row returned",
            ))
        })
    }

    async fn list_for_occupancies(
        &self,
        caller: &Caller,
        occupancies: &[RoomTenantId],
        window: &DateWindow,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        if occupancies.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<PaymentRow> = self
            .client
            .select(&caller.token, &occupancy_query(occupancies, window))
            .await
            .map_err(map_error)?;
        Ok(rows.into_iter().map(Payment::from).collect())
    }

    async fn list_for_properties(
        &self,
        caller: &Caller,
        property_ids: &[PropertyId],
        window: &DateWindow,
    ) -> Result<Vec<AttributedPayment>, PaymentRepositoryError> {
        if property_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<PaymentRow> = self
            .client
            .select(&caller.token, &property_query(property_ids, window))
            .await
            .map_err(map_error)?;
        Ok(attribute(rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn june() -> DateWindow {
        DateWindow::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).expect("date"),
            NaiveDate::from_ymd_opt(2024, 6, 30).expect("date"),
        )
        .expect("window")
    }

    #[test]
    fn window_bounds_are_inclusive_and_exclude_trash() {
        let params = occupancy_query(&[RoomTenantId::random()], &june()).params();
        assert!(params.contains(&("payment_date".to_owned(), "gte.2024-06-01".to_owned())));
        assert!(params.contains(&("payment_date".to_owned(), "lte.2024-06-30".to_owned())));
        assert!(params.contains(&("deleted_at".to_owned(), "is.null".to_owned())));
    }

    #[test]
    fn property_query_embeds_the_owning_room() {
        let property = PropertyId::random();
        let params = property_query(&[property], &june()).params();
        assert_eq!(params[0].1, PAYMENT_WITH_PROPERTY);
        assert_eq!(
            params[1],
            (
                "room_tenants.rooms.property_id".to_owned(),
                format!("in.(\"{property}\")")
            )
        );
    }
}
