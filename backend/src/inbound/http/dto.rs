//! Response payloads shared by the HTTP handlers.
//!
//! Domain types stay free of OpenAPI derives; these mirrors add the schema
//! and render every money field as [`MoneyBody`] so clients never format RWF
//! themselves.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{
    AdminDashboard, AuthUser, BookingId, BookingOutcome, BookingPath, BookingStatus, DateWindow,
    LandlordDashboard, ManagerStatus, MonthlyRevenue, OccupancyDetails, Payment, PaymentId,
    PaymentMethod, PaymentStatus, Property, PropertyId, PropertyManager, PropertyManagerId,
    PropertyStats, RecordId, RevenueReport, Room, RoomId, RoomStatus, RoomTenant, RoomTenantId,
    Rwf, Tenant, TenantBooking, TenantId, TenantPaymentSummary, TrashCount, TrashRecord,
    TrashTable, TrashView, UserId, UserRole, format_compact, format_percentage,
};

/// An RWF amount with its display form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MoneyBody {
    /// Whole francs.
    #[schema(example = 150_000)]
    pub amount: i64,
    /// `RWF 150,000`
    #[schema(example = "RWF 150,000")]
    pub formatted: String,
}

impl From<Rwf> for MoneyBody {
    fn from(value: Rwf) -> Self {
        Self {
            amount: value.amount(),
            formatted: value.formatted(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowBody {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl From<DateWindow> for WindowBody {
    fn from(value: DateWindow) -> Self {
        Self {
            start: value.start(),
            end: value.end(),
        }
    }
}

/// The signed-in user.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: UserId,
    #[schema(value_type = Option<String>)]
    pub email: Option<String>,
    pub full_name: Option<String>,
    #[schema(value_type = String, example = "landlord")]
    pub role: UserRole,
}

impl From<AuthUser> for UserBody {
    fn from(value: AuthUser) -> Self {
        Self {
            id: value.id,
            email: value.email.map(|email| email.as_str().to_owned()),
            full_name: value.full_name,
            role: value.role,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: PropertyId,
    #[schema(value_type = String, format = Uuid)]
    pub landlord_id: UserId,
    pub name: String,
    pub address: String,
    pub description: Option<String>,
    pub property_type: String,
    pub price_range_min: MoneyBody,
    pub price_range_max: MoneyBody,
    /// Listing form, e.g. `RWF 50,000 - RWF 80,000`.
    pub price_range: String,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Property> for PropertyBody {
    fn from(value: Property) -> Self {
        let price_range = value.display_price_range();
        Self {
            id: value.id,
            landlord_id: value.landlord_id,
            name: value.name,
            address: value.address,
            description: value.description,
            property_type: value.property_type,
            price_range_min: value.price_range_min.into(),
            price_range_max: value.price_range_max.into(),
            price_range,
            image_urls: value.image_urls,
            created_at: value.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: RoomId,
    #[schema(value_type = String, format = Uuid)]
    pub property_id: PropertyId,
    pub room_number: String,
    pub rent_amount: MoneyBody,
    #[schema(value_type = String, example = "available")]
    pub status: RoomStatus,
}

impl From<Room> for RoomBody {
    fn from(value: Room) -> Self {
        Self {
            id: value.id,
            property_id: value.property_id,
            room_number: value.room_number,
            rent_amount: value.rent_amount.into(),
            status: value.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenantBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: TenantId,
    pub full_name: String,
    /// `+250…` form.
    pub phone: String,
    pub email: Option<String>,
    pub id_number: Option<String>,
}

impl From<Tenant> for TenantBody {
    fn from(value: Tenant) -> Self {
        Self {
            id: value.id,
            full_name: value.full_name,
            phone: value.phone,
            email: value.email,
            id_number: value.id_number,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OccupancyBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: RoomTenantId,
    #[schema(value_type = String, format = Uuid)]
    pub room_id: RoomId,
    #[schema(value_type = String, format = Uuid)]
    pub tenant_id: TenantId,
    pub move_in_date: NaiveDate,
    pub move_out_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl From<RoomTenant> for OccupancyBody {
    fn from(value: RoomTenant) -> Self {
        Self {
            id: value.id,
            room_id: value.room_id,
            tenant_id: value.tenant_id,
            move_in_date: value.move_in_date,
            move_out_date: value.move_out_date,
            is_active: value.is_active,
        }
    }
}

/// A tenant in a room.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TenancyBody {
    pub occupancy: OccupancyBody,
    pub tenant: TenantBody,
    pub room: RoomBody,
}

impl From<OccupancyDetails> for TenancyBody {
    fn from(value: OccupancyDetails) -> Self {
        Self {
            occupancy: value.occupancy.into(),
            tenant: value.tenant.into(),
            room: value.room.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: PaymentId,
    #[schema(value_type = String, format = Uuid)]
    pub room_tenant_id: RoomTenantId,
    pub amount: MoneyBody,
    pub payment_date: NaiveDate,
    #[schema(value_type = String, example = "mobile_money")]
    pub payment_method: PaymentMethod,
    pub reference: Option<String>,
}

impl From<Payment> for PaymentBody {
    fn from(value: Payment) -> Self {
        Self {
            id: value.id,
            room_tenant_id: value.room_tenant_id,
            amount: value.amount.into(),
            payment_date: value.payment_date,
            payment_method: value.payment_method,
            reference: value.reference,
        }
    }
}

/// One tenant's rent position for a month.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummaryBody {
    #[schema(value_type = String, format = Uuid)]
    pub occupancy_id: RoomTenantId,
    #[schema(value_type = String, format = Uuid)]
    pub tenant_id: TenantId,
    pub tenant_name: String,
    #[schema(value_type = String, format = Uuid)]
    pub room_id: RoomId,
    pub room_number: String,
    pub rent: MoneyBody,
    pub paid: MoneyBody,
    pub balance: MoneyBody,
    #[schema(value_type = String, example = "overdue")]
    pub status: PaymentStatus,
}

impl From<TenantPaymentSummary> for PaymentSummaryBody {
    fn from(value: TenantPaymentSummary) -> Self {
        Self {
            occupancy_id: value.occupancy_id,
            tenant_id: value.tenant_id,
            tenant_name: value.tenant_name,
            room_id: value.room_id,
            room_number: value.room_number,
            rent: value.rent.into(),
            paid: value.paid.into(),
            balance: value.balance.into(),
            status: value.status,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: BookingId,
    #[schema(value_type = String, format = Uuid)]
    pub property_id: PropertyId,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub room_id: Option<RoomId>,
    #[schema(value_type = String, format = Uuid)]
    pub tenant_user_id: UserId,
    pub full_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub message: Option<String>,
    pub preferred_move_in: Option<NaiveDate>,
    #[schema(value_type = String, example = "pending")]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl From<TenantBooking> for BookingBody {
    fn from(value: TenantBooking) -> Self {
        Self {
            id: value.id,
            property_id: value.property_id,
            room_id: value.room_id,
            tenant_user_id: value.tenant_user_id,
            full_name: value.full_name,
            phone: value.phone,
            email: value.email,
            message: value.message,
            preferred_move_in: value.preferred_move_in,
            status: value.status,
            created_at: value.created_at,
        }
    }
}

/// Result of submitting a booking request.
#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingCreatedBody {
    #[schema(value_type = String, format = Uuid)]
    pub booking_id: BookingId,
    /// `rpc` or `direct_insert`.
    #[schema(value_type = String, example = "rpc")]
    pub path: BookingPath,
}

impl From<BookingOutcome> for BookingCreatedBody {
    fn from(value: BookingOutcome) -> Self {
        Self {
            booking_id: value.booking_id,
            path: value.path,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ManagerBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: PropertyManagerId,
    #[schema(value_type = String, format = Uuid)]
    pub property_id: PropertyId,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub manager_id: Option<UserId>,
    pub email: String,
    #[schema(value_type = String, example = "pending")]
    pub status: ManagerStatus,
    pub invited_at: DateTime<Utc>,
}

impl From<PropertyManager> for ManagerBody {
    fn from(value: PropertyManager) -> Self {
        Self {
            id: value.id,
            property_id: value.property_id,
            manager_id: value.manager_id,
            email: value.email.as_str().to_owned(),
            status: value.status,
            invited_at: value.invited_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrashRecordBody {
    #[schema(value_type = String, format = Uuid)]
    pub id: RecordId,
    pub label: String,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl From<TrashRecord> for TrashRecordBody {
    fn from(value: TrashRecord) -> Self {
        Self {
            id: value.id,
            label: value.label,
            deleted_at: value.deleted_at,
        }
    }
}

/// One table split into live and trashed rows.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrashViewBody {
    #[schema(value_type = String, example = "rooms")]
    pub table: TrashTable,
    pub active: Vec<TrashRecordBody>,
    pub trashed: Vec<TrashRecordBody>,
}

impl TrashViewBody {
    pub fn new(table: TrashTable, view: TrashView) -> Self {
        Self {
            table,
            active: view.active.into_iter().map(Into::into).collect(),
            trashed: view.trashed.into_iter().map(Into::into).collect(),
        }
    }
}

/// Outcome of a soft delete or restore.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrashActionBody {
    #[schema(value_type = String, example = "rooms")]
    pub table: TrashTable,
    #[schema(value_type = String, format = Uuid)]
    pub id: RecordId,
    /// Timestamp reported by the backend, when it returned one.
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyStatsBody {
    #[schema(value_type = String, format = Uuid)]
    pub property_id: PropertyId,
    pub name: String,
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub occupancy_rate: f64,
    pub revenue: MoneyBody,
    pub expected_revenue: MoneyBody,
    pub collection_rate: f64,
    pub performance_score: f64,
}

impl From<PropertyStats> for PropertyStatsBody {
    fn from(value: PropertyStats) -> Self {
        Self {
            property_id: value.property_id,
            name: value.name,
            total_rooms: value.total_rooms,
            occupied_rooms: value.occupied_rooms,
            occupancy_rate: value.occupancy_rate,
            revenue: value.revenue.into(),
            expected_revenue: value.expected_revenue.into(),
            collection_rate: value.collection_rate,
            performance_score: value.performance_score,
        }
    }
}

/// Landlord or manager overview for a window.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LandlordDashboardBody {
    pub window: WindowBody,
    pub total_properties: usize,
    pub total_rooms: usize,
    pub occupied_rooms: usize,
    pub available_rooms: usize,
    pub occupancy_rate: f64,
    /// `85.5%`
    pub occupancy_rate_label: String,
    pub total_tenants: usize,
    pub revenue: MoneyBody,
    /// `1.5M`
    pub revenue_compact: String,
    pub expected_revenue: MoneyBody,
    pub collection_rate: f64,
    pub properties: Vec<PropertyStatsBody>,
}

impl From<LandlordDashboard> for LandlordDashboardBody {
    fn from(value: LandlordDashboard) -> Self {
        Self {
            window: value.window.into(),
            total_properties: value.total_properties,
            total_rooms: value.total_rooms,
            occupied_rooms: value.occupied_rooms,
            available_rooms: value.available_rooms,
            occupancy_rate: value.occupancy_rate,
            occupancy_rate_label: format_percentage(value.occupancy_rate),
            total_tenants: value.total_tenants,
            revenue_compact: format_compact(value.revenue.amount()),
            revenue: value.revenue.into(),
            expected_revenue: value.expected_revenue.into(),
            collection_rate: value.collection_rate,
            properties: value.properties.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleCountsBody {
    pub admin: usize,
    pub landlord: usize,
    pub manager: usize,
    pub tenant: usize,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrashCountBody {
    #[schema(value_type = String, example = "payments")]
    pub table: TrashTable,
    pub trashed: usize,
}

impl From<TrashCount> for TrashCountBody {
    fn from(value: TrashCount) -> Self {
        Self {
            table: value.table,
            trashed: value.trashed,
        }
    }
}

/// Platform-wide counts for administrators.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboardBody {
    pub users_by_role: RoleCountsBody,
    pub total_users: usize,
    pub active_properties: usize,
    pub total_rooms: usize,
    pub pending_bookings: usize,
    pub trashed_records: Vec<TrashCountBody>,
}

impl From<AdminDashboard> for AdminDashboardBody {
    fn from(value: AdminDashboard) -> Self {
        let roles = value.users_by_role;
        Self {
            users_by_role: RoleCountsBody {
                admin: roles.admin,
                landlord: roles.landlord,
                manager: roles.manager,
                tenant: roles.tenant,
            },
            total_users: value.total_users,
            active_properties: value.active_properties,
            total_rooms: value.total_rooms,
            pending_bookings: value.pending_bookings,
            trashed_records: value.trashed_records.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyRevenueBody {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: MoneyBody,
}

impl From<MonthlyRevenue> for MonthlyRevenueBody {
    fn from(value: MonthlyRevenue) -> Self {
        Self {
            month: value.month,
            revenue: value.revenue.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReportBody {
    pub window: WindowBody,
    #[schema(value_type = Option<String>, format = Uuid)]
    pub property_id: Option<PropertyId>,
    pub months: Vec<MonthlyRevenueBody>,
    pub total: MoneyBody,
}

impl From<RevenueReport> for RevenueReportBody {
    fn from(value: RevenueReport) -> Self {
        Self {
            window: value.window.into(),
            property_id: value.property_id,
            months: value.months.into_iter().map(Into::into).collect(),
            total: value.total.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn money_carries_amount_and_display_form() {
        let body = serde_json::to_value(MoneyBody::from(Rwf::new(1_250_000))).expect("json");
        assert_eq!(body, json!({"amount": 1_250_000, "formatted": "RWF 1,250,000"}));
    }

    #[test]
    fn rooms_serialise_in_camel_case() {
        let room = Room {
            id: RoomId::random(),
            property_id: PropertyId::random(),
            room_number: "B2".to_owned(),
            rent_amount: Rwf::new(80_000),
            status: RoomStatus::Maintenance,
            deleted_at: None,
        };
        let body = serde_json::to_value(RoomBody::from(room)).expect("json");
        assert_eq!(body["roomNumber"], "B2");
        assert_eq!(body["rentAmount"]["formatted"], "RWF 80,000");
        assert_eq!(body["status"], "maintenance");
    }
}
