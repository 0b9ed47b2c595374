//! In-memory stand-in for the managed backend.
//!
//! One [`InMemoryBackend`] implements every port, so a whole
//! [`HttpState`](crate::inbound::http::state::HttpState) can be wired without
//! network access. Row-level security is not modelled: the services' own
//! access checks are what the tests exercise. Failure toggles let tests
//! drive the booking RPC fallback and the invitation and mailer error paths.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use uuid::Uuid;

use super::FixedClock;
use crate::domain::ports::{
    AuthGateway, AuthGatewayError, BookingRepository, BookingRepositoryError, InvitationError,
    InvitationSender, MailerError, ManagerRepository, ManagerRepositoryError, ObjectStorage,
    ObjectStorageError, PaymentRepository, PaymentRepositoryError, PropertyRepository,
    PropertyRepositoryError, PropertyScope, ResetPinMailer, RoomRepository, RoomRepositoryError,
    TenantRepository, TenantRepositoryError, TrashRepository, TrashRepositoryError, UserDirectory,
    UserDirectoryError,
};
use crate::domain::{
    AccessToken, AttributedPayment, AuthUser, BookingId, BookingStatus, Caller, DEFAULT_RENT_DUE_DAY,
    DateWindow, EmailAddress, InvitationReceipt, MailReceipt, ManagerInvitation, ManagerStatus,
    NewBooking, NewOccupancy, NewPayment, NewProperty, NewRoom, OutgoingEmail, Payment, PaymentId,
    Property, PropertyId, PropertyManager, PropertyManagerId, RecordId, Room, RoomId, RoomStatus,
    RoomTenant, RoomTenantId, Rwf, Tenant, TenantBooking, TenantDraft, TenantId, TrashRecord,
    TrashTable, UserId, UserRole, format_currency,
};
use crate::inbound::http::state::HttpStatePorts;

const BOOKING_RPC: &str = "create_tenant_booking";
const PUBLIC_STORAGE_BASE: &str = "https://storage.test/object/public";

/// An object stored through [`ObjectStorage::upload`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub bucket: String,
    pub path: String,
    pub content_type: String,
    pub size: usize,
}

#[derive(Default)]
struct Store {
    sessions: HashMap<String, AuthUser>,
    revoked: HashSet<String>,
    properties: Vec<Property>,
    rooms: Vec<Room>,
    tenants: Vec<Tenant>,
    occupancies: Vec<RoomTenant>,
    payments: Vec<Payment>,
    bookings: Vec<TenantBooking>,
    trashed_bookings: HashMap<BookingId, DateTime<Utc>>,
    managers: Vec<PropertyManager>,
    objects: Vec<StoredObject>,
    invitations: Vec<ManagerInvitation>,
    emails: Vec<OutgoingEmail>,
    booking_rpc_available: bool,
    invitation_failure: Option<InvitationError>,
    mailer_failure: Option<MailerError>,
}

impl Store {
    fn property_of_room(&self, room_id: RoomId) -> Option<PropertyId> {
        self.rooms
            .iter()
            .find(|room| room.id == room_id)
            .map(|room| room.property_id)
    }

    fn property_of_occupancy(&self, id: RoomTenantId) -> Option<PropertyId> {
        self.occupancies
            .iter()
            .find(|occupancy| occupancy.id == id)
            .and_then(|occupancy| self.property_of_room(occupancy.room_id))
    }

    fn trash_record(&self, table: TrashTable, id: Uuid) -> Option<TrashRecord> {
        self.trash_records(table)
            .into_iter()
            .find(|record| record.id.as_uuid() == &id)
    }

    fn trash_records(&self, table: TrashTable) -> Vec<TrashRecord> {
        fn record(id: &Uuid, label: String, deleted_at: Option<DateTime<Utc>>) -> TrashRecord {
            TrashRecord {
                id: RecordId::from_uuid(*id),
                label,
                deleted_at,
            }
        }
        match table {
            TrashTable::Properties => self
                .properties
                .iter()
                .map(|p| record(p.id.as_uuid(), p.name.clone(), p.deleted_at))
                .collect(),
            TrashTable::Rooms => self
                .rooms
                .iter()
                .map(|r| record(r.id.as_uuid(), format!("Room {}", r.room_number), r.deleted_at))
                .collect(),
            TrashTable::Tenants => self
                .tenants
                .iter()
                .map(|t| record(t.id.as_uuid(), t.full_name.clone(), t.deleted_at))
                .collect(),
            TrashTable::Payments => self
                .payments
                .iter()
                .map(|p| {
                    let label = format!(
                        "{} on {}",
                        format_currency(p.amount.amount()),
                        p.payment_date
                    );
                    record(p.id.as_uuid(), label, p.deleted_at)
                })
                .collect(),
            TrashTable::TenantBookings => self
                .bookings
                .iter()
                .map(|b| {
                    let deleted_at = self.trashed_bookings.get(&b.id).copied();
                    record(b.id.as_uuid(), b.full_name.clone(), deleted_at)
                })
                .collect(),
        }
    }

    /// Set or clear `deleted_at`; `false` when the row does not exist.
    fn mark(&mut self, table: TrashTable, id: Uuid, deleted_at: Option<DateTime<Utc>>) -> bool {
        match table {
            TrashTable::Properties => set_deleted(&mut self.properties, id, deleted_at, |p| {
                (p.id.as_uuid().to_owned(), &mut p.deleted_at)
            }),
            TrashTable::Rooms => set_deleted(&mut self.rooms, id, deleted_at, |r| {
                (r.id.as_uuid().to_owned(), &mut r.deleted_at)
            }),
            TrashTable::Tenants => set_deleted(&mut self.tenants, id, deleted_at, |t| {
                (t.id.as_uuid().to_owned(), &mut t.deleted_at)
            }),
            TrashTable::Payments => set_deleted(&mut self.payments, id, deleted_at, |p| {
                (p.id.as_uuid().to_owned(), &mut p.deleted_at)
            }),
            TrashTable::TenantBookings => {
                let booking_id = BookingId::from_uuid(id);
                if !self.bookings.iter().any(|b| b.id == booking_id) {
                    return false;
                }
                match deleted_at {
                    Some(at) => self.trashed_bookings.insert(booking_id, at),
                    None => self.trashed_bookings.remove(&booking_id),
                };
                true
            }
        }
    }

    fn remove(&mut self, table: TrashTable, id: Uuid) {
        match table {
            TrashTable::Properties => self.properties.retain(|p| p.id.as_uuid() != &id),
            TrashTable::Rooms => self.rooms.retain(|r| r.id.as_uuid() != &id),
            TrashTable::Tenants => self.tenants.retain(|t| t.id.as_uuid() != &id),
            TrashTable::Payments => self.payments.retain(|p| p.id.as_uuid() != &id),
            TrashTable::TenantBookings => {
                self.bookings.retain(|b| b.id.as_uuid() != &id);
                self.trashed_bookings.remove(&BookingId::from_uuid(id));
            }
        }
    }
}

fn set_deleted<T>(
    rows: &mut [T],
    id: Uuid,
    deleted_at: Option<DateTime<Utc>>,
    project: impl Fn(&mut T) -> (Uuid, &mut Option<DateTime<Utc>>),
) -> bool {
    for row in rows.iter_mut() {
        let (row_id, slot) = project(row);
        if row_id == id {
            *slot = deleted_at;
            return true;
        }
    }
    false
}

/// In-memory implementation of every port.
pub struct InMemoryBackend {
    clock: FixedClock,
    store: Mutex<Store>,
}

impl InMemoryBackend {
    /// Empty backend whose clock reads noon UTC on `today`. The booking RPC
    /// starts deployed.
    pub fn new(today: NaiveDate) -> Arc<Self> {
        Arc::new(Self {
            clock: FixedClock::at_noon(today),
            store: Mutex::new(Store {
                booking_rpc_available: true,
                ..Store::default()
            }),
        })
    }

    fn store(&self) -> MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now(&self) -> DateTime<Utc> {
        self.clock.utc()
    }

    pub fn clock(&self) -> FixedClock {
        self.clock
    }

    /// Port bundle backed by this instance, with the default rent due day.
    pub fn ports(self: &Arc<Self>) -> HttpStatePorts {
        HttpStatePorts {
            auth: self.clone(),
            properties: self.clone(),
            rooms: self.clone(),
            tenants: self.clone(),
            payments: self.clone(),
            bookings: self.clone(),
            managers: self.clone(),
            trash: self.clone(),
            users: self.clone(),
            storage: self.clone(),
            invitations: self.clone(),
            mailer: self.clone(),
            clock: Arc::new(self.clock),
            rent_due_day: DEFAULT_RENT_DUE_DAY,
        }
    }

    /// Create a user with a fresh access token and return the resolved caller.
    pub fn sign_in(&self, role: UserRole, full_name: &str, email: Option<&str>) -> Caller {
        let token = format!("token-{}", Uuid::new_v4());
        let user = AuthUser {
            id: UserId::random(),
            email: email.and_then(|raw| EmailAddress::parse(raw).ok()),
            full_name: Some(full_name.to_owned()),
            role,
        };
        self.store().sessions.insert(token.clone(), user.clone());
        match AccessToken::new(token) {
            Ok(token) => Caller::new(user, token),
            Err(error) => panic!("generated token rejected: {error}"),
        }
    }

    pub fn seed_property(&self, landlord: UserId, name: &str) -> Property {
        let property = Property {
            id: PropertyId::random(),
            landlord_id: landlord,
            name: name.to_owned(),
            address: "KG 7 Ave, Kigali".to_owned(),
            description: None,
            property_type: "apartment".to_owned(),
            price_range_min: Rwf::new(50_000),
            price_range_max: Rwf::new(120_000),
            image_urls: Vec::new(),
            created_at: self.now(),
            deleted_at: None,
        };
        self.store().properties.push(property.clone());
        property
    }

    pub fn seed_room(&self, property_id: PropertyId, number: &str, rent: i64, status: RoomStatus) -> Room {
        let room = Room {
            id: RoomId::random(),
            property_id,
            room_number: number.to_owned(),
            rent_amount: Rwf::new(rent),
            status,
            deleted_at: None,
        };
        self.store().rooms.push(room.clone());
        room
    }

    /// Record `manager` as an active manager of `property_id`.
    pub fn seed_active_manager(&self, property_id: PropertyId, manager: &Caller) {
        let email = manager
            .user
            .email
            .clone()
            .unwrap_or_else(|| panic!("manager needs an email"));
        let row = PropertyManager {
            id: PropertyManagerId::random(),
            property_id,
            manager_id: Some(manager.id()),
            email,
            status: ManagerStatus::Active,
            invited_at: self.now(),
        };
        self.store().managers.push(row);
    }

    /// Simulate a project where the booking RPC has not been deployed.
    pub fn set_booking_rpc_available(&self, available: bool) {
        self.store().booking_rpc_available = available;
    }

    pub fn fail_invitations_with(&self, error: Option<InvitationError>) {
        self.store().invitation_failure = error;
    }

    pub fn fail_mail_with(&self, error: Option<MailerError>) {
        self.store().mailer_failure = error;
    }

    pub fn property(&self, id: PropertyId) -> Option<Property> {
        self.store().properties.iter().find(|p| p.id == id).cloned()
    }

    pub fn room(&self, id: RoomId) -> Option<Room> {
        self.store().rooms.iter().find(|r| r.id == id).cloned()
    }

    pub fn bookings(&self) -> Vec<TenantBooking> {
        self.store().bookings.clone()
    }

    pub fn payments(&self) -> Vec<Payment> {
        self.store().payments.clone()
    }

    pub fn stored_objects(&self) -> Vec<StoredObject> {
        self.store().objects.clone()
    }

    pub fn sent_invitations(&self) -> Vec<ManagerInvitation> {
        self.store().invitations.clone()
    }

    pub fn sent_emails(&self) -> Vec<OutgoingEmail> {
        self.store().emails.clone()
    }
}

#[async_trait]
impl AuthGateway for InMemoryBackend {
    async fn current_user(&self, token: &AccessToken) -> Result<AuthUser, AuthGatewayError> {
        let store = self.store();
        if store.revoked.contains(token.expose()) {
            return Err(AuthGatewayError::invalid_token("session revoked"));
        }
        store
            .sessions
            .get(token.expose())
            .cloned()
            .ok_or_else(|| AuthGatewayError::invalid_token("unknown token"))
    }

    async fn sign_out(&self, token: &AccessToken) -> Result<(), AuthGatewayError> {
        self.store().revoked.insert(token.expose().to_owned());
        Ok(())
    }
}

#[async_trait]
impl PropertyRepository for InMemoryBackend {
    async fn list_active(
        &self,
        _caller: &Caller,
        scope: &PropertyScope,
    ) -> Result<Vec<Property>, PropertyRepositoryError> {
        let store = self.store();
        let mut rows: Vec<Property> = store
            .properties
            .iter()
            .filter(|p| p.deleted_at.is_none())
            .filter(|p| match scope {
                PropertyScope::All => true,
                PropertyScope::Landlord(landlord) => p.landlord_id == *landlord,
                PropertyScope::Ids(ids) => ids.contains(&p.id),
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find(
        &self,
        _caller: &Caller,
        id: PropertyId,
    ) -> Result<Option<Property>, PropertyRepositoryError> {
        Ok(self
            .store()
            .properties
            .iter()
            .find(|p| p.id == id && p.deleted_at.is_none())
            .cloned())
    }

    async fn insert(
        &self,
        _caller: &Caller,
        landlord_id: UserId,
        property: &NewProperty,
    ) -> Result<Property, PropertyRepositoryError> {
        let row = Property {
            id: PropertyId::random(),
            landlord_id,
            name: property.name.clone(),
            address: property.address.clone(),
            description: property.description.clone(),
            property_type: property.property_type.clone(),
            price_range_min: property.price_range_min,
            price_range_max: property.price_range_max,
            image_urls: Vec::new(),
            created_at: self.now(),
            deleted_at: None,
        };
        self.store().properties.push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        _caller: &Caller,
        property: &Property,
    ) -> Result<Property, PropertyRepositoryError> {
        let mut store = self.store();
        let slot = store
            .properties
            .iter_mut()
            .find(|p| p.id == property.id)
            .ok_or_else(|| PropertyRepositoryError::query("no row updated"))?;
        *slot = property.clone();
        Ok(property.clone())
    }
}

#[async_trait]
impl RoomRepository for InMemoryBackend {
    async fn list_for_properties(
        &self,
        _caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<Room>, RoomRepositoryError> {
        let mut rows: Vec<Room> = self
            .store()
            .rooms
            .iter()
            .filter(|r| r.deleted_at.is_none() && property_ids.contains(&r.property_id))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.room_number.cmp(&b.room_number));
        Ok(rows)
    }

    async fn find(&self, _caller: &Caller, id: RoomId) -> Result<Option<Room>, RoomRepositoryError> {
        Ok(self
            .store()
            .rooms
            .iter()
            .find(|r| r.id == id && r.deleted_at.is_none())
            .cloned())
    }

    async fn insert(&self, _caller: &Caller, room: &NewRoom) -> Result<Room, RoomRepositoryError> {
        let row = Room {
            id: RoomId::random(),
            property_id: room.property_id,
            room_number: room.room_number.clone(),
            rent_amount: room.rent_amount,
            status: RoomStatus::Available,
            deleted_at: None,
        };
        self.store().rooms.push(row.clone());
        Ok(row)
    }

    async fn set_status(
        &self,
        _caller: &Caller,
        id: RoomId,
        status: RoomStatus,
    ) -> Result<Room, RoomRepositoryError> {
        let mut store = self.store();
        let room = store
            .rooms
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| RoomRepositoryError::query(format!("room {id} not found")))?;
        room.status = status;
        Ok(room.clone())
    }
}

#[async_trait]
impl TenantRepository for InMemoryBackend {
    async fn insert_tenant(
        &self,
        _caller: &Caller,
        tenant: &TenantDraft,
    ) -> Result<Tenant, TenantRepositoryError> {
        let row = Tenant {
            id: TenantId::random(),
            full_name: tenant.full_name.clone(),
            phone: tenant.phone.e164(),
            email: tenant.email.as_ref().map(|e| e.as_str().to_owned()),
            id_number: tenant.id_number.clone(),
            deleted_at: None,
        };
        self.store().tenants.push(row.clone());
        Ok(row)
    }

    async fn delete_tenant(
        &self,
        _caller: &Caller,
        id: TenantId,
    ) -> Result<(), TenantRepositoryError> {
        let mut store = self.store();
        if store.occupancies.iter().any(|o| o.tenant_id == id) {
            return Err(TenantRepositoryError::constraint(
                "tenant is referenced by an occupancy",
            ));
        }
        store.tenants.retain(|t| t.id != id);
        Ok(())
    }

    async fn find_tenants(
        &self,
        _caller: &Caller,
        ids: &[TenantId],
    ) -> Result<Vec<Tenant>, TenantRepositoryError> {
        Ok(self
            .store()
            .tenants
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }

    async fn insert_occupancy(
        &self,
        _caller: &Caller,
        occupancy: &NewOccupancy,
    ) -> Result<RoomTenant, TenantRepositoryError> {
        let mut store = self.store();
        if store
            .occupancies
            .iter()
            .any(|o| o.room_id == occupancy.room_id && o.is_active)
        {
            return Err(TenantRepositoryError::constraint(
                "room already has an active occupancy",
            ));
        }
        let row = RoomTenant {
            id: RoomTenantId::random(),
            room_id: occupancy.room_id,
            tenant_id: occupancy.tenant_id,
            move_in_date: occupancy.move_in_date,
            move_out_date: None,
            is_active: true,
        };
        store.occupancies.push(row.clone());
        Ok(row)
    }

    async fn find_occupancy(
        &self,
        _caller: &Caller,
        id: RoomTenantId,
    ) -> Result<Option<RoomTenant>, TenantRepositoryError> {
        Ok(self
            .store()
            .occupancies
            .iter()
            .find(|o| o.id == id)
            .cloned())
    }

    async fn end_occupancy(
        &self,
        _caller: &Caller,
        id: RoomTenantId,
        move_out_date: NaiveDate,
    ) -> Result<RoomTenant, TenantRepositoryError> {
        let mut store = self.store();
        let occupancy = store
            .occupancies
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| TenantRepositoryError::query(format!("occupancy {id} not found")))?;
        occupancy.move_out_date = Some(move_out_date);
        occupancy.is_active = false;
        Ok(occupancy.clone())
    }

    async fn list_active_occupancies(
        &self,
        _caller: &Caller,
        room_ids: &[RoomId],
    ) -> Result<Vec<RoomTenant>, TenantRepositoryError> {
        Ok(self
            .store()
            .occupancies
            .iter()
            .filter(|o| o.is_active && room_ids.contains(&o.room_id))
            .cloned()
            .collect())
    }

    async fn list_active_occupancies_for_properties(
        &self,
        _caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<RoomTenant>, TenantRepositoryError> {
        let store = self.store();
        Ok(store
            .occupancies
            .iter()
            .filter(|o| o.is_active)
            .filter(|o| {
                store
                    .property_of_room(o.room_id)
                    .is_some_and(|pid| property_ids.contains(&pid))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl PaymentRepository for InMemoryBackend {
    async fn insert(
        &self,
        _caller: &Caller,
        payment: &NewPayment,
    ) -> Result<Payment, PaymentRepositoryError> {
        let row = Payment {
            id: PaymentId::random(),
            room_tenant_id: payment.room_tenant_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
            payment_method: payment.payment_method,
            reference: payment.reference.clone(),
            deleted_at: None,
        };
        self.store().payments.push(row.clone());
        Ok(row)
    }

    async fn list_for_occupancies(
        &self,
        _caller: &Caller,
        occupancies: &[RoomTenantId],
        window: &DateWindow,
    ) -> Result<Vec<Payment>, PaymentRepositoryError> {
        let mut rows: Vec<Payment> = self
            .store()
            .payments
            .iter()
            .filter(|p| p.deleted_at.is_none())
            .filter(|p| occupancies.contains(&p.room_tenant_id) && window.contains(p.payment_date))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.payment_date.cmp(&a.payment_date));
        Ok(rows)
    }

    async fn list_for_properties(
        &self,
        _caller: &Caller,
        property_ids: &[PropertyId],
        window: &DateWindow,
    ) -> Result<Vec<AttributedPayment>, PaymentRepositoryError> {
        let store = self.store();
        let mut rows: Vec<AttributedPayment> = store
            .payments
            .iter()
            .filter(|p| p.deleted_at.is_none() && window.contains(p.payment_date))
            .filter_map(|p| {
                let property_id = store.property_of_occupancy(p.room_tenant_id)?;
                property_ids.contains(&property_id).then(|| AttributedPayment {
                    property_id,
                    payment: p.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.payment.payment_date.cmp(&a.payment.payment_date));
        Ok(rows)
    }
}

impl InMemoryBackend {
    fn booking_row(&self, booking: &NewBooking) -> TenantBooking {
        TenantBooking {
            id: BookingId::random(),
            property_id: booking.property_id,
            room_id: booking.room_id,
            tenant_user_id: booking.tenant_user_id,
            full_name: booking.full_name.clone(),
            phone: booking.phone.e164(),
            email: booking.email.as_ref().map(|e| e.as_str().to_owned()),
            message: booking.message.clone(),
            preferred_move_in: booking.preferred_move_in,
            status: BookingStatus::Pending,
            created_at: self.now(),
        }
    }
}

fn newest_first(mut rows: Vec<TenantBooking>) -> Vec<TenantBooking> {
    rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rows
}

#[async_trait]
impl BookingRepository for InMemoryBackend {
    async fn create_via_rpc(
        &self,
        _caller: &Caller,
        booking: &NewBooking,
    ) -> Result<BookingId, BookingRepositoryError> {
        let row = self.booking_row(booking);
        let mut store = self.store();
        if !store.booking_rpc_available {
            return Err(BookingRepositoryError::function_missing(BOOKING_RPC));
        }
        let id = row.id;
        store.bookings.push(row);
        Ok(id)
    }

    async fn insert(
        &self,
        _caller: &Caller,
        booking: &NewBooking,
    ) -> Result<TenantBooking, BookingRepositoryError> {
        let row = self.booking_row(booking);
        self.store().bookings.push(row.clone());
        Ok(row)
    }

    async fn find(
        &self,
        _caller: &Caller,
        id: BookingId,
    ) -> Result<Option<TenantBooking>, BookingRepositoryError> {
        Ok(self.store().bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_for_properties(
        &self,
        _caller: &Caller,
        property_ids: &[PropertyId],
    ) -> Result<Vec<TenantBooking>, BookingRepositoryError> {
        let rows = self
            .store()
            .bookings
            .iter()
            .filter(|b| property_ids.contains(&b.property_id))
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn list_for_tenant(
        &self,
        _caller: &Caller,
        tenant: UserId,
    ) -> Result<Vec<TenantBooking>, BookingRepositoryError> {
        let rows = self
            .store()
            .bookings
            .iter()
            .filter(|b| b.tenant_user_id == tenant)
            .cloned()
            .collect();
        Ok(newest_first(rows))
    }

    async fn list_all(&self, _caller: &Caller) -> Result<Vec<TenantBooking>, BookingRepositoryError> {
        Ok(newest_first(self.store().bookings.clone()))
    }

    async fn update_status(
        &self,
        _caller: &Caller,
        id: BookingId,
        status: BookingStatus,
    ) -> Result<TenantBooking, BookingRepositoryError> {
        let mut store = self.store();
        let booking = store
            .bookings
            .iter_mut()
            .find(|b| b.id == id)
            .ok_or_else(|| BookingRepositoryError::query(format!("booking {id} not found")))?;
        booking.status = status;
        Ok(booking.clone())
    }
}

#[async_trait]
impl ManagerRepository for InMemoryBackend {
    async fn list_for_property(
        &self,
        _caller: &Caller,
        property_id: PropertyId,
    ) -> Result<Vec<PropertyManager>, ManagerRepositoryError> {
        Ok(self
            .store()
            .managers
            .iter()
            .filter(|m| m.property_id == property_id)
            .cloned()
            .collect())
    }

    async fn list_active_for_manager(
        &self,
        _caller: &Caller,
        manager: UserId,
    ) -> Result<Vec<PropertyManager>, ManagerRepositoryError> {
        Ok(self
            .store()
            .managers
            .iter()
            .filter(|m| m.status == ManagerStatus::Active && m.manager_id == Some(manager))
            .cloned()
            .collect())
    }

    async fn insert_pending(
        &self,
        _caller: &Caller,
        property_id: PropertyId,
        email: &EmailAddress,
    ) -> Result<PropertyManager, ManagerRepositoryError> {
        let mut store = self.store();
        if store
            .managers
            .iter()
            .any(|m| m.property_id == property_id && m.email == *email)
        {
            return Err(ManagerRepositoryError::duplicate());
        }
        let row = PropertyManager {
            id: PropertyManagerId::random(),
            property_id,
            manager_id: None,
            email: email.clone(),
            status: ManagerStatus::Pending,
            invited_at: self.clock.utc(),
        };
        store.managers.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl TrashRepository for InMemoryBackend {
    async fn soft_delete(
        &self,
        _caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        let now = self.now();
        if self.store().mark(table, *id.as_uuid(), Some(now)) {
            Ok(())
        } else {
            Err(TrashRepositoryError::query(format!("{table} record {id} not found")))
        }
    }

    async fn restore(
        &self,
        _caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        if self.store().mark(table, *id.as_uuid(), None) {
            Ok(())
        } else {
            Err(TrashRepositoryError::query(format!("{table} record {id} not found")))
        }
    }

    async fn purge(
        &self,
        _caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<(), TrashRepositoryError> {
        self.store().remove(table, *id.as_uuid());
        Ok(())
    }

    async fn find_record(
        &self,
        _caller: &Caller,
        table: TrashTable,
        id: RecordId,
    ) -> Result<Option<TrashRecord>, TrashRepositoryError> {
        Ok(self.store().trash_record(table, *id.as_uuid()))
    }

    async fn list_records(
        &self,
        _caller: &Caller,
        table: TrashTable,
    ) -> Result<Vec<TrashRecord>, TrashRepositoryError> {
        Ok(self.store().trash_records(table))
    }
}

#[async_trait]
impl UserDirectory for InMemoryBackend {
    async fn list_roles(&self, _caller: &Caller) -> Result<Vec<UserRole>, UserDirectoryError> {
        Ok(self.store().sessions.values().map(|user| user.role).collect())
    }
}

#[async_trait]
impl ObjectStorage for InMemoryBackend {
    async fn upload(
        &self,
        _caller: &Caller,
        bucket: &str,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ObjectStorageError> {
        let mut store = self.store();
        if store.objects.iter().any(|o| o.bucket == bucket && o.path == path) {
            return Err(ObjectStorageError::rejected("The resource already exists"));
        }
        store.objects.push(StoredObject {
            bucket: bucket.to_owned(),
            path: path.to_owned(),
            content_type: content_type.to_owned(),
            size: bytes.len(),
        });
        Ok(())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        format!("{PUBLIC_STORAGE_BASE}/{bucket}/{path}")
    }
}

#[async_trait]
impl InvitationSender for InMemoryBackend {
    async fn send(
        &self,
        _token: &AccessToken,
        invitation: &ManagerInvitation,
    ) -> Result<InvitationReceipt, InvitationError> {
        let mut store = self.store();
        if let Some(error) = store.invitation_failure.clone() {
            return Err(error);
        }
        store.invitations.push(invitation.clone());
        Ok(InvitationReceipt {
            message: Some("Invitation sent".to_owned()),
        })
    }
}

#[async_trait]
impl ResetPinMailer for InMemoryBackend {
    async fn deliver(&self, email: &OutgoingEmail) -> Result<MailReceipt, MailerError> {
        let mut store = self.store();
        if let Some(error) = store.mailer_failure.clone() {
            return Err(error);
        }
        store.emails.push(email.clone());
        Ok(MailReceipt {
            message_id: format!("<{}@icumbi.test>", Uuid::new_v4()),
        })
    }
}
