//! Revenue and arrears reports.

use std::sync::Arc;

use crate::domain::access::AccessPolicy;
use crate::domain::payment_service::PaymentService;
use crate::domain::ports::PaymentRepository;
use crate::domain::service_support::map_payment_error;
use crate::domain::{
    Caller, DateWindow, Error, Month, PaymentLedger, PropertyId, RevenueReport,
    TenantPaymentSummary,
};

/// Report use cases.
#[derive(Clone)]
pub struct ReportService {
    access: AccessPolicy,
    payments: Arc<dyn PaymentRepository>,
    payment_service: PaymentService,
}

impl ReportService {
    /// Create the service.
    pub fn new(
        access: AccessPolicy,
        payments: Arc<dyn PaymentRepository>,
        payment_service: PaymentService,
    ) -> Self {
        Self {
            access,
            payments,
            payment_service,
        }
    }

    /// Monthly revenue for one property, or for everything the caller sees.
    pub async fn revenue_report(
        &self,
        caller: &Caller,
        property_id: Option<PropertyId>,
        window: DateWindow,
    ) -> Result<RevenueReport, Error> {
        let ids: Vec<PropertyId> = match property_id {
            Some(id) => vec![self.access.accessible_property(caller, id).await?.id],
            None => self
                .access
                .visible_properties(caller)
                .await?
                .into_iter()
                .map(|p| p.id)
                .collect(),
        };
        let ledger = if ids.is_empty() {
            PaymentLedger::default()
        } else {
            let rows = self
                .payments
                .list_for_properties(caller, &ids, &window)
                .await
                .map_err(map_payment_error)?;
            PaymentLedger::from_rows(rows.into_iter().map(|row| row.payment))
        };
        Ok(RevenueReport::from_totals(
            window,
            property_id,
            ledger.monthly_totals(&window),
        ))
    }

    /// Occupancies with an unpaid balance for `month`, largest first.
    pub async fn outstanding_balances(
        &self,
        caller: &Caller,
        property_id: PropertyId,
        month: Month,
    ) -> Result<Vec<TenantPaymentSummary>, Error> {
        let mut owing: Vec<TenantPaymentSummary> = self
            .payment_service
            .tenant_payment_summaries(caller, property_id, month)
            .await?
            .into_iter()
            .filter(|summary| summary.balance.is_positive())
            .collect();
        owing.sort_by(|a, b| {
            b.balance
                .cmp(&a.balance)
                .then_with(|| a.room_number.cmp(&b.room_number))
        });
        Ok(owing)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{caller, clock_at, date, occupancy, payment, property, room, tenant};
    use crate::domain::payment_service::DEFAULT_RENT_DUE_DAY;
    use crate::domain::ports::{
        MockManagerRepository, MockPaymentRepository, MockPropertyRepository, MockRoomRepository,
        MockTenantRepository, PropertyRepository,
    };
    use crate::domain::{AttributedPayment, ErrorCode, Property, RoomStatus, Rwf, UserRole};

    fn service(
        home: Property,
        rooms: MockRoomRepository,
        tenants: MockTenantRepository,
        payments: MockPaymentRepository,
    ) -> ReportService {
        let mut properties = MockPropertyRepository::new();
        let listed = home.clone();
        properties
            .expect_find()
            .returning(move |_, _| Ok(Some(home.clone())));
        properties
            .expect_list_active()
            .returning(move |_, _| Ok(vec![listed.clone()]));
        let properties: Arc<dyn PropertyRepository> = Arc::new(properties);
        let access = AccessPolicy::new(properties, Arc::new(MockManagerRepository::new()));
        let payments: Arc<dyn PaymentRepository> = Arc::new(payments);
        let payment_service = PaymentService::new(
            access.clone(),
            Arc::new(rooms),
            Arc::new(tenants),
            payments.clone(),
            Arc::new(clock_at(date(2024, 6, 20))),
            DEFAULT_RENT_DUE_DAY,
        );
        ReportService::new(access, payments, payment_service)
    }

    #[tokio::test]
    async fn revenue_report_zero_fills_and_totals_months() {
        let landlord = caller(UserRole::Landlord);
        let home = property(landlord.id());
        let home_id = home.id;
        let stay = occupancy(
            room(home.id, "A1", 50_000, RoomStatus::Occupied).id,
            tenant("Ange").id,
            date(2024, 1, 1),
        );
        let january = payment(stay.id, 50_000, date(2024, 1, 5));
        let march = payment(stay.id, 45_000, date(2024, 3, 9));
        let rows: Vec<AttributedPayment> = [january.clone(), january, march]
            .into_iter()
            .map(|payment| AttributedPayment {
                property_id: home_id,
                payment,
            })
            .collect();
        let mut payments = MockPaymentRepository::new();
        payments
            .expect_list_for_properties()
            .withf(move |_, ids, _| ids == [home_id])
            .return_once(move |_, _, _| Ok(rows));

        let window = DateWindow::new(date(2024, 1, 1), date(2024, 3, 31)).expect("window");
        let report = service(
            home,
            MockRoomRepository::new(),
            MockTenantRepository::new(),
            payments,
        )
        .revenue_report(&landlord, None, window)
        .await
        .expect("report");

        let months: Vec<(&str, i64)> = report
            .months
            .iter()
            .map(|m| (m.month.as_str(), m.revenue.amount()))
            .collect();
        assert_eq!(
            months,
            [("2024-01", 50_000), ("2024-02", 0), ("2024-03", 45_000)]
        );
        assert_eq!(report.total, Rwf::new(95_000));
    }

    #[tokio::test]
    async fn revenue_report_for_foreign_property_is_forbidden() {
        let landlord = caller(UserRole::Landlord);
        let other = property(crate::domain::UserId::random());
        let other_id = other.id;
        let mut payments = MockPaymentRepository::new();
        payments.expect_list_for_properties().never();
        let err = service(
            other,
            MockRoomRepository::new(),
            MockTenantRepository::new(),
            payments,
        )
        .revenue_report(
            &landlord,
            Some(other_id),
            DateWindow::current_month(date(2024, 6, 1)),
        )
        .await
        .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn outstanding_balances_sorted_largest_first() {
        let landlord = caller(UserRole::Landlord);
        let home = property(landlord.id());
        let small = room(home.id, "A1", 40_000, RoomStatus::Occupied);
        let large = room(home.id, "A2", 90_000, RoomStatus::Occupied);
        let settled = room(home.id, "A3", 30_000, RoomStatus::Occupied);
        let (t1, t2, t3) = (tenant("Ange"), tenant("Bosco"), tenant("Chantal"));
        let stays = vec![
            occupancy(small.id, t1.id, date(2024, 1, 1)),
            occupancy(large.id, t2.id, date(2024, 1, 1)),
            occupancy(settled.id, t3.id, date(2024, 1, 1)),
        ];
        let rows = vec![
            payment(stays[0].id, 10_000, date(2024, 6, 2)),
            payment(stays[2].id, 30_000, date(2024, 6, 2)),
        ];

        let mut rooms = MockRoomRepository::new();
        rooms
            .expect_list_for_properties()
            .return_once(move |_, _| Ok(vec![small, large, settled]));
        let mut tenants = MockTenantRepository::new();
        tenants
            .expect_list_active_occupancies()
            .return_once(move |_, _| Ok(stays));
        tenants
            .expect_find_tenants()
            .return_once(move |_, _| Ok(vec![t1, t2, t3]));
        let mut payments = MockPaymentRepository::new();
        payments
            .expect_list_for_occupancies()
            .return_once(move |_, _, _| Ok(rows));

        let owing = service(home.clone(), rooms, tenants, payments)
            .outstanding_balances(&landlord, home.id, Month::new(2024, 6).expect("month"))
            .await
            .expect("balances");

        let balances: Vec<i64> = owing.iter().map(|s| s.balance.amount()).collect();
        assert_eq!(balances, [90_000, 30_000]);
    }
}
