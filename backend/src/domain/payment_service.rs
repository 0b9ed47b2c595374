//! Payment recording, listings, and monthly rent status.

use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::domain::access::AccessPolicy;
use crate::domain::ports::{PaymentRepository, RoomRepository, TenantRepository};
use crate::domain::service_support::{
    invalid_field, map_payment_error, map_room_error, map_tenant_error,
};
use crate::domain::tenancy_service::TenancyService;
use crate::domain::{
    Caller, DateWindow, Error, Month, NewPayment, OccupancyDetails, Payment, PaymentLedger,
    PropertyId, RoomTenantId, TenantPaymentSummary, payment_status,
};

/// Default day of the month rent falls due.
pub const DEFAULT_RENT_DUE_DAY: u32 = 5;

/// Payment use cases.
#[derive(Clone)]
pub struct PaymentService {
    access: AccessPolicy,
    tenancy: TenancyService,
    rooms: Arc<dyn RoomRepository>,
    tenants: Arc<dyn TenantRepository>,
    payments: Arc<dyn PaymentRepository>,
    clock: Arc<dyn Clock>,
    due_day: u32,
}

impl PaymentService {
    /// Create the service; `due_day` is the day of month rent is due.
    pub fn new(
        access: AccessPolicy,
        rooms: Arc<dyn RoomRepository>,
        tenants: Arc<dyn TenantRepository>,
        payments: Arc<dyn PaymentRepository>,
        clock: Arc<dyn Clock>,
        due_day: u32,
    ) -> Self {
        let tenancy = TenancyService::new(access.clone(), rooms.clone(), tenants.clone());
        Self {
            access,
            tenancy,
            rooms,
            tenants,
            payments,
            clock,
            due_day,
        }
    }

    /// Record a payment against an occupancy the caller manages.
    pub async fn record_payment(
        &self,
        caller: &Caller,
        input: NewPayment,
    ) -> Result<Payment, Error> {
        let today = self.clock.utc().date_naive();
        let input = input
            .validated(today)
            .map_err(|e| invalid_field(e.field(), e.to_string()))?;
        self.check_occupancy_access(caller, input.room_tenant_id)
            .await?;
        let payment = self
            .payments
            .insert(caller, &input)
            .await
            .map_err(map_payment_error)?;
        info!(
            payment_id = %payment.id,
            occupancy_id = %payment.room_tenant_id,
            amount = payment.amount.amount(),
            "payment recorded"
        );
        Ok(payment)
    }

    async fn check_occupancy_access(
        &self,
        caller: &Caller,
        occupancy_id: RoomTenantId,
    ) -> Result<(), Error> {
        let occupancy = self
            .tenants
            .find_occupancy(caller, occupancy_id)
            .await
            .map_err(map_tenant_error)?
            .ok_or_else(|| Error::not_found(format!("occupancy {occupancy_id} not found")))?;
        let room = self
            .rooms
            .find(caller, occupancy.room_id)
            .await
            .map_err(map_room_error)?
            .ok_or_else(|| Error::not_found(format!("room {} not found", occupancy.room_id)))?;
        self.access
            .accessible_property(caller, room.property_id)
            .await?;
        Ok(())
    }

    /// Payments for a property's occupancies within `window`, newest first.
    pub async fn list_payments(
        &self,
        caller: &Caller,
        property_id: PropertyId,
        window: DateWindow,
    ) -> Result<Vec<Payment>, Error> {
        let occupancies = self.tenancy.list_tenants(caller, property_id).await?;
        let ledger = self.ledger_for(caller, &occupancies, &window).await?;
        let mut payments: Vec<Payment> = ledger.iter().cloned().collect();
        payments.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        Ok(payments)
    }

    /// Deduplicated payments for `occupancies` within `window`.
    pub(crate) async fn ledger_for(
        &self,
        caller: &Caller,
        occupancies: &[OccupancyDetails],
        window: &DateWindow,
    ) -> Result<PaymentLedger, Error> {
        if occupancies.is_empty() {
            return Ok(PaymentLedger::default());
        }
        let ids: Vec<RoomTenantId> = occupancies.iter().map(|o| o.occupancy.id).collect();
        let rows = self
            .payments
            .list_for_occupancies(caller, &ids, window)
            .await
            .map_err(map_payment_error)?;
        Ok(PaymentLedger::from_rows(rows))
    }

    /// Rent standing of every active occupancy for `month`.
    pub async fn tenant_payment_summaries(
        &self,
        caller: &Caller,
        property_id: PropertyId,
        month: Month,
    ) -> Result<Vec<TenantPaymentSummary>, Error> {
        let occupancies = self.tenancy.list_tenants(caller, property_id).await?;
        let window = month.window();
        let ledger = self.ledger_for(caller, &occupancies, &window).await?;
        let today = self.clock.utc().date_naive();
        let due_date = month.due_date(self.due_day);
        Ok(occupancies
            .into_iter()
            .map(|details| {
                let rent = details.room.rent_amount;
                let paid = ledger.paid_for(details.occupancy.id, &window);
                TenantPaymentSummary {
                    occupancy_id: details.occupancy.id,
                    tenant_id: details.tenant.id,
                    tenant_name: details.tenant.full_name,
                    room_id: details.room.id,
                    room_number: details.room.room_number,
                    rent,
                    paid,
                    balance: rent.saturating_balance(paid),
                    status: payment_status(rent, paid, today, due_date),
                }
            })
            .collect())
    }
}
