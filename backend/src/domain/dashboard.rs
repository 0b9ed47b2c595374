//! Dashboard read models and the reductions that build them.
//!
//! Revenue is always computed from a [`PaymentLedger`], so a payment row that
//! arrives twice (overlapping fetches, retries) contributes once.

use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::{
    AttributedPayment, DateWindow, PaymentId, PaymentLedger, Property, PropertyId, Room,
    RoomStatus, RoomTenant, Rwf, TrashTable, UserRole,
};

/// Weight of occupancy in the performance score.
const OCCUPANCY_WEIGHT: f64 = 0.6;
/// Weight of (capped) collection in the performance score.
const COLLECTION_WEIGHT: f64 = 0.4;

/// `part / whole × 100`, or 0 when `whole` is 0.
#[must_use]
pub fn percentage(part: i64, whole: i64) -> f64 {
    if whole <= 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Round to one decimal place.
#[must_use]
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// `0.6 × occupancy + 0.4 × min(collection, 100)`, rounded to one decimal.
///
/// # Examples
/// ```
/// use icumbi::domain::performance_score;
///
/// assert_eq!(performance_score(50.0, 150.0), 70.0);
/// assert_eq!(performance_score(0.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn performance_score(occupancy_rate: f64, collection_rate: f64) -> f64 {
    round_one_decimal(
        OCCUPANCY_WEIGHT * occupancy_rate + COLLECTION_WEIGHT * collection_rate.min(100.0),
    )
}

/// Figures for one property.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyStats {
    /// Property id.
    pub property_id: PropertyId,
    /// Property name.
    pub name: String,
    /// Active rooms.
    pub total_rooms: usize,
    /// Rooms marked occupied.
    pub occupied_rooms: usize,
    /// Occupied share, percent.
    pub occupancy_rate: f64,
    /// Payments received in the window.
    pub revenue: Rwf,
    /// Monthly rent of active occupancies.
    pub expected_revenue: Rwf,
    /// Revenue over expected, percent.
    pub collection_rate: f64,
    /// Weighted score; see [`performance_score`].
    pub performance_score: f64,
}

/// Landlord or manager overview for a date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LandlordDashboard {
    /// Window the revenue figures cover.
    pub window: DateWindow,
    /// Active properties in scope.
    pub total_properties: usize,
    /// Active rooms.
    pub total_rooms: usize,
    /// Rooms marked occupied.
    pub occupied_rooms: usize,
    /// Rooms marked available.
    pub available_rooms: usize,
    /// Occupied share, percent.
    pub occupancy_rate: f64,
    /// Distinct tenants with an active occupancy.
    pub total_tenants: usize,
    /// Sum of distinct payments dated inside the window.
    pub revenue: Rwf,
    /// Monthly rent of active occupancies.
    pub expected_revenue: Rwf,
    /// Revenue over expected, percent.
    pub collection_rate: f64,
    /// Per-property breakdown, best score first.
    pub properties: Vec<PropertyStats>,
}

/// Raw rows fetched for a landlord dashboard.
#[derive(Debug, Clone, Default)]
pub struct DashboardInputs {
    /// Properties in scope.
    pub properties: Vec<Property>,
    /// Their active rooms.
    pub rooms: Vec<Room>,
    /// Their active occupancies.
    pub occupancies: Vec<RoomTenant>,
    /// Payments in the window, tagged with property.
    pub payments: Vec<AttributedPayment>,
}

#[derive(Default)]
struct Tally {
    rooms: usize,
    occupied: usize,
    expected: Rwf,
    revenue: Rwf,
}

impl DashboardInputs {
    /// Reduce the fetched rows into dashboard figures.
    #[must_use]
    pub fn summarise(self, window: DateWindow) -> LandlordDashboard {
        let in_scope: HashSet<PropertyId> = self.properties.iter().map(|p| p.id).collect();
        let rooms: Vec<&Room> = self
            .rooms
            .iter()
            .filter(|room| room.deleted_at.is_none() && in_scope.contains(&room.property_id))
            .collect();
        let room_index: HashMap<_, _> = rooms.iter().map(|room| (room.id, *room)).collect();

        let mut tallies: HashMap<PropertyId, Tally> = HashMap::new();
        for room in &rooms {
            let tally = tallies.entry(room.property_id).or_default();
            tally.rooms += 1;
            if room.status == RoomStatus::Occupied {
                tally.occupied += 1;
            }
        }

        let active: Vec<&RoomTenant> = self
            .occupancies
            .iter()
            .filter(|o| o.is_active && room_index.contains_key(&o.room_id))
            .collect();
        for occupancy in &active {
            if let Some(room) = room_index.get(&occupancy.room_id) {
                tallies.entry(room.property_id).or_default().expected += room.rent_amount;
            }
        }
        let total_tenants = active
            .iter()
            .map(|o| o.tenant_id)
            .collect::<HashSet<_>>()
            .len();

        let owner: HashMap<PaymentId, PropertyId> = self
            .payments
            .iter()
            .filter(|p| in_scope.contains(&p.property_id))
            .map(|p| (p.payment.id, p.property_id))
            .collect();
        let ledger = PaymentLedger::from_rows(
            self.payments
                .into_iter()
                .filter(|p| in_scope.contains(&p.property_id))
                .map(|p| p.payment),
        );
        for payment in ledger.iter().filter(|p| window.contains(p.payment_date)) {
            if let Some(property_id) = owner.get(&payment.id) {
                tallies.entry(*property_id).or_default().revenue += payment.amount;
            }
        }

        let mut stats: Vec<PropertyStats> = self
            .properties
            .iter()
            .map(|property| {
                let tally = tallies.remove(&property.id).unwrap_or_default();
                let occupancy_rate = percentage(tally.occupied as i64, tally.rooms as i64);
                let collection_rate = percentage(tally.revenue.amount(), tally.expected.amount());
                PropertyStats {
                    property_id: property.id,
                    name: property.name.clone(),
                    total_rooms: tally.rooms,
                    occupied_rooms: tally.occupied,
                    occupancy_rate: round_one_decimal(occupancy_rate),
                    revenue: tally.revenue,
                    expected_revenue: tally.expected,
                    collection_rate: round_one_decimal(collection_rate),
                    performance_score: performance_score(occupancy_rate, collection_rate),
                }
            })
            .collect();
        stats.sort_by(|a, b| {
            b.performance_score
                .total_cmp(&a.performance_score)
                .then_with(|| a.name.cmp(&b.name))
        });

        let total_rooms = rooms.len();
        let occupied_rooms = rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Occupied)
            .count();
        let available_rooms = rooms
            .iter()
            .filter(|r| r.status == RoomStatus::Available)
            .count();
        let revenue = ledger.total_in(&window);
        let expected_revenue: Rwf = stats.iter().map(|s| s.expected_revenue).sum();

        LandlordDashboard {
            window,
            total_properties: self.properties.len(),
            total_rooms,
            occupied_rooms,
            available_rooms,
            occupancy_rate: round_one_decimal(percentage(occupied_rooms as i64, total_rooms as i64)),
            total_tenants,
            revenue,
            expected_revenue,
            collection_rate: round_one_decimal(percentage(
                revenue.amount(),
                expected_revenue.amount(),
            )),
            properties: stats,
        }
    }
}

/// Users per role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoleCounts {
    /// Administrators.
    pub admin: usize,
    /// Landlords.
    pub landlord: usize,
    /// Managers.
    pub manager: usize,
    /// Tenants.
    pub tenant: usize,
}

impl RoleCounts {
    /// Count roles.
    #[must_use]
    pub fn tally(roles: &[UserRole]) -> Self {
        roles.iter().fold(Self::default(), |mut counts, role| {
            match role {
                UserRole::Admin => counts.admin += 1,
                UserRole::Landlord => counts.landlord += 1,
                UserRole::Manager => counts.manager += 1,
                UserRole::Tenant => counts.tenant += 1,
            }
            counts
        })
    }

    /// All users.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.admin + self.landlord + self.manager + self.tenant
    }
}

/// Trashed rows in one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashCount {
    /// Table.
    pub table: TrashTable,
    /// Rows with `deleted_at` set.
    pub trashed: usize,
}

/// Platform-wide overview for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    /// Users per role.
    pub users_by_role: RoleCounts,
    /// All users.
    pub total_users: usize,
    /// Properties not in the trash.
    pub active_properties: usize,
    /// Rooms not in the trash.
    pub total_rooms: usize,
    /// Bookings awaiting a decision.
    pub pending_bookings: usize,
    /// Trash size per table.
    pub trashed_records: Vec<TrashCount>,
}
