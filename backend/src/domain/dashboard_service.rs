//! Landlord and admin dashboards.

use std::sync::Arc;

use tracing::debug;

use crate::domain::access::AccessPolicy;
use crate::domain::ports::{
    BookingRepository, PaymentRepository, PropertyRepository, PropertyScope, RoomRepository,
    TenantRepository, TrashRepository, UserDirectory,
};
use crate::domain::service_support::{
    map_booking_error, map_payment_error, map_property_error, map_room_error, map_tenant_error,
    map_user_directory_error,
};
use crate::domain::trash_service::TrashService;
use crate::domain::{
    AdminDashboard, BookingStatus, Caller, DashboardInputs, DateWindow, Error, LandlordDashboard,
    PropertyId, RoleCounts, TrashCount, UserRole,
};

/// Ports the dashboards read from.
#[derive(Clone)]
pub struct DashboardPorts {
    /// Property rows.
    pub properties: Arc<dyn PropertyRepository>,
    /// Room rows.
    pub rooms: Arc<dyn RoomRepository>,
    /// Tenants and occupancies.
    pub tenants: Arc<dyn TenantRepository>,
    /// Payment rows.
    pub payments: Arc<dyn PaymentRepository>,
    /// Booking requests.
    pub bookings: Arc<dyn BookingRepository>,
    /// User roles.
    pub users: Arc<dyn UserDirectory>,
    /// Trash tables.
    pub trash: Arc<dyn TrashRepository>,
}

/// Read-only aggregate views.
#[derive(Clone)]
pub struct DashboardService {
    access: AccessPolicy,
    ports: DashboardPorts,
    trash: TrashService,
}

impl DashboardService {
    /// Create the service.
    pub fn new(access: AccessPolicy, ports: DashboardPorts) -> Self {
        let trash = TrashService::new(ports.trash.clone());
        Self {
            access,
            ports,
            trash,
        }
    }

    /// Fetch the rows behind a landlord dashboard.
    ///
    /// Rooms, occupancies, and payments are requested concurrently once the
    /// property scope is known.
    pub(crate) async fn landlord_inputs(
        &self,
        caller: &Caller,
        window: &DateWindow,
    ) -> Result<DashboardInputs, Error> {
        let properties = self.access.visible_properties(caller).await?;
        if properties.is_empty() {
            return Ok(DashboardInputs::default());
        }
        let ids: Vec<PropertyId> = properties.iter().map(|p| p.id).collect();
        let (rooms, occupancies, payments) = tokio::try_join!(
            async {
                self.ports
                    .rooms
                    .list_for_properties(caller, &ids)
                    .await
                    .map_err(map_room_error)
            },
            async {
                self.ports
                    .tenants
                    .list_active_occupancies_for_properties(caller, &ids)
                    .await
                    .map_err(map_tenant_error)
            },
            async {
                self.ports
                    .payments
                    .list_for_properties(caller, &ids, window)
                    .await
                    .map_err(map_payment_error)
            },
        )?;
        Ok(DashboardInputs {
            properties,
            rooms,
            occupancies,
            payments,
        })
    }

    /// Occupancy and revenue figures for every property the caller manages.
    pub async fn landlord_dashboard(
        &self,
        caller: &Caller,
        window: DateWindow,
    ) -> Result<LandlordDashboard, Error> {
        let inputs = self.landlord_inputs(caller, &window).await?;
        let dashboard = inputs.summarise(window);
        debug!(
            user_id = %caller.id(),
            properties = dashboard.total_properties,
            revenue = dashboard.revenue.amount(),
            "landlord dashboard computed"
        );
        Ok(dashboard)
    }

    /// Platform-wide counts. Admin only.
    pub async fn admin_dashboard(&self, caller: &Caller) -> Result<AdminDashboard, Error> {
        caller.require_role(&[UserRole::Admin])?;
        let (roles, properties, bookings, trashed) = tokio::try_join!(
            async {
                self.ports
                    .users
                    .list_roles(caller)
                    .await
                    .map_err(map_user_directory_error)
            },
            async {
                self.ports
                    .properties
                    .list_active(caller, &PropertyScope::All)
                    .await
                    .map_err(map_property_error)
            },
            async {
                self.ports
                    .bookings
                    .list_all(caller)
                    .await
                    .map_err(map_booking_error)
            },
            self.trash.trashed_counts(caller),
        )?;

        let ids: Vec<PropertyId> = properties.iter().map(|p| p.id).collect();
        let total_rooms = if ids.is_empty() {
            0
        } else {
            self.ports
                .rooms
                .list_for_properties(caller, &ids)
                .await
                .map_err(map_room_error)?
                .iter()
                .filter(|room| room.deleted_at.is_none())
                .count()
        };
        let users_by_role = RoleCounts::tally(&roles);

        Ok(AdminDashboard {
            users_by_role,
            total_users: users_by_role.total(),
            active_properties: properties.len(),
            total_rooms,
            pending_bookings: bookings
                .iter()
                .filter(|b| b.status == BookingStatus::Pending)
                .count(),
            trashed_records: trashed
                .into_iter()
                .map(|(table, trashed)| TrashCount { table, trashed })
                .collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fixtures::{caller, date, occupancy, payment, property, room};
    use crate::domain::ports::{
        MockBookingRepository, MockManagerRepository, MockPaymentRepository,
        MockPropertyRepository, MockRoomRepository, MockTenantRepository, MockTrashRepository,
        MockUserDirectory,
    };
    use crate::domain::{
        AttributedPayment, ErrorCode, RecordId, RoomStatus, Rwf, TenantId, TrashRecord, TrashTable,
    };
    use chrono::Utc;

    struct Mocks {
        properties: MockPropertyRepository,
        rooms: MockRoomRepository,
        tenants: MockTenantRepository,
        payments: MockPaymentRepository,
        bookings: MockBookingRepository,
        users: MockUserDirectory,
        trash: MockTrashRepository,
    }

    impl Mocks {
        fn new() -> Self {
            Self {
                properties: MockPropertyRepository::new(),
                rooms: MockRoomRepository::new(),
                tenants: MockTenantRepository::new(),
                payments: MockPaymentRepository::new(),
                bookings: MockBookingRepository::new(),
                users: MockUserDirectory::new(),
                trash: MockTrashRepository::new(),
            }
        }

        fn build(self) -> DashboardService {
            let properties: Arc<dyn PropertyRepository> = Arc::new(self.properties);
            let access = AccessPolicy::new(properties.clone(), Arc::new(MockManagerRepository::new()));
            DashboardService::new(
                access,
                DashboardPorts {
                    properties,
                    rooms: Arc::new(self.rooms),
                    tenants: Arc::new(self.tenants),
                    payments: Arc::new(self.payments),
                    bookings: Arc::new(self.bookings),
                    users: Arc::new(self.users),
                    trash: Arc::new(self.trash),
                },
            )
        }
    }

    #[tokio::test]
    async fn landlord_dashboard_counts_each_payment_once() {
        let landlord = caller(UserRole::Landlord);
        let home = property(landlord.id());
        let occupied = room(home.id, "A1", 100_000, RoomStatus::Occupied);
        let vacant = room(home.id, "A2", 80_000, RoomStatus::Available);
        let stay = occupancy(occupied.id, TenantId::random(), date(2024, 3, 1));
        let rent = payment(stay.id, 100_000, date(2024, 6, 4));
        let tagged = AttributedPayment {
            property_id: home.id,
            payment: rent,
        };

        let mut mocks = Mocks::new();
        let listed = home.clone();
        mocks
            .properties
            .expect_list_active()
            .withf(|_, scope| matches!(scope, PropertyScope::Landlord(_)))
            .return_once(move |_, _| Ok(vec![listed]));
        mocks
            .rooms
            .expect_list_for_properties()
            .return_once(move |_, _| Ok(vec![occupied, vacant]));
        mocks
            .tenants
            .expect_list_active_occupancies_for_properties()
            .return_once(move |_, _| Ok(vec![stay]));
        mocks
            .payments
            .expect_list_for_properties()
            .return_once(move |_, _, _| Ok(vec![tagged.clone(), tagged]));

        let dashboard = mocks
            .build()
            .landlord_dashboard(&landlord, DateWindow::current_month(date(2024, 6, 20)))
            .await
            .expect("dashboard");

        assert_eq!(dashboard.revenue, Rwf::new(100_000));
        assert_eq!(dashboard.expected_revenue, Rwf::new(100_000));
        assert!((dashboard.collection_rate - 100.0).abs() < f64::EPSILON);
        assert!((dashboard.occupancy_rate - 50.0).abs() < f64::EPSILON);
        assert_eq!(dashboard.total_tenants, 1);
    }

    #[tokio::test]
    async fn landlord_without_properties_skips_detail_queries() {
        let landlord = caller(UserRole::Landlord);
        let mut mocks = Mocks::new();
        mocks
            .properties
            .expect_list_active()
            .return_once(|_, _| Ok(Vec::new()));
        mocks.rooms.expect_list_for_properties().never();
        mocks.payments.expect_list_for_properties().never();

        let dashboard = mocks
            .build()
            .landlord_dashboard(&landlord, DateWindow::current_month(date(2024, 6, 20)))
            .await
            .expect("dashboard");
        assert_eq!(dashboard.total_properties, 0);
        assert_eq!(dashboard.revenue, Rwf::ZERO);
    }

    #[tokio::test]
    async fn tenants_cannot_see_landlord_dashboard() {
        let err = Mocks::new()
            .build()
            .landlord_dashboard(
                &caller(UserRole::Tenant),
                DateWindow::current_month(date(2024, 6, 20)),
            )
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn admin_dashboard_requires_admin() {
        let mut mocks = Mocks::new();
        mocks.users.expect_list_roles().never();
        let err = mocks
            .build()
            .admin_dashboard(&caller(UserRole::Landlord))
            .await
            .expect_err("forbidden");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn admin_dashboard_aggregates_platform_counts() {
        let admin = caller(UserRole::Admin);
        let home = property(admin.id());
        let home_id = home.id;
        let mut mocks = Mocks::new();
        mocks.users.expect_list_roles().return_once(|_| {
            Ok(vec![UserRole::Admin, UserRole::Landlord, UserRole::Tenant, UserRole::Tenant])
        });
        mocks
            .properties
            .expect_list_active()
            .return_once(move |_, _| Ok(vec![home]));
        mocks.bookings.expect_list_all().return_once(|_| Ok(Vec::new()));
        mocks.rooms.expect_list_for_properties().return_once(move |_, _| {
            Ok(vec![
                room(home_id, "A1", 50_000, RoomStatus::Available),
                room(home_id, "A2", 50_000, RoomStatus::Occupied),
            ])
        });
        mocks.trash.expect_list_records().returning(|_, table| {
            let trashed = TrashRecord {
                id: RecordId::random(),
                label: "old".to_owned(),
                deleted_at: Some(Utc::now()),
            };
            Ok(if table == TrashTable::Payments {
                vec![trashed]
            } else {
                Vec::new()
            })
        });

        let dashboard = mocks.build().admin_dashboard(&admin).await.expect("dashboard");

        assert_eq!(dashboard.total_users, 4);
        assert_eq!(dashboard.users_by_role.tenant, 2);
        assert_eq!(dashboard.active_properties, 1);
        assert_eq!(dashboard.total_rooms, 2);
        assert_eq!(dashboard.pending_bookings, 0);
        let payments = dashboard
            .trashed_records
            .iter()
            .find(|c| c.table == TrashTable::Payments)
            .expect("payments count");
        assert_eq!(payments.trashed, 1);
        assert_eq!(dashboard.trashed_records.len(), TrashTable::ALL.len());
    }
}
