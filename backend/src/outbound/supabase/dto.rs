//! Row DTOs for PostgREST tables and GoTrue payloads.
//!
//! Rows are decoded into these snake_case transport structs first, then
//! mapped into domain entities. Write bodies live here too so column names
//! are spelled in one place.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::{
    BookingId, BookingStatus, EmailAddress, ManagerStatus, NewBooking, NewOccupancy, NewPayment,
    NewProperty, NewRoom, Payment, PaymentId, PaymentMethod, Property, PropertyId,
    PropertyManager, PropertyManagerId, RecordId, Room, RoomId, RoomStatus, RoomTenant,
    RoomTenantId, Rwf, Tenant, TenantBooking, TenantDraft, TenantId, TrashRecord, TrashTable,
    UserId, format_currency,
};

/// `numeric` columns arrive as JSON numbers or, for large values, strings.
#[derive(Deserialize)]
#[serde(untagged)]
enum AmountRepr {
    Int(i64),
    Float(f64),
    Text(String),
}

impl AmountRepr {
    fn into_amount(self) -> Result<i64, String> {
        let value = match self {
            Self::Int(value) => return Ok(value),
            Self::Float(value) => value,
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .map_err(|error| format!("amount `{text}` is not numeric: {error}"))?,
        };
        if !value.is_finite() {
            return Err(format!("amount `{value}` is not finite"));
        }
        #[expect(clippy::cast_possible_truncation, reason = "RWF has no minor unit")]
        let whole = value.round() as i64;
        Ok(whole)
    }
}

fn rwf<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rwf, D::Error> {
    AmountRepr::deserialize(deserializer)?
        .into_amount()
        .map(Rwf::new)
        .map_err(serde::de::Error::custom)
}

fn rwf_or_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Rwf, D::Error> {
    Option::<AmountRepr>::deserialize(deserializer)?
        .map_or(Ok(0), AmountRepr::into_amount)
        .map(Rwf::new)
        .map_err(serde::de::Error::custom)
}

#[derive(Debug, Deserialize)]
pub(super) struct PropertyRow {
    id: PropertyId,
    landlord_id: UserId,
    name: String,
    address: String,
    description: Option<String>,
    property_type: Option<String>,
    #[serde(default, deserialize_with = "rwf_or_zero")]
    price_range_min: Rwf,
    #[serde(default, deserialize_with = "rwf_or_zero")]
    price_range_max: Rwf,
    image_urls: Option<Vec<String>>,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<PropertyRow> for Property {
    fn from(row: PropertyRow) -> Self {
        Self {
            id: row.id,
            landlord_id: row.landlord_id,
            name: row.name,
            address: row.address,
            description: row.description,
            property_type: row.property_type.unwrap_or_default(),
            price_range_min: row.price_range_min,
            price_range_max: row.price_range_max,
            image_urls: row.image_urls.unwrap_or_default(),
            created_at: row.created_at,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PropertyWrite<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    landlord_id: Option<UserId>,
    name: &'a str,
    address: &'a str,
    description: Option<&'a str>,
    property_type: &'a str,
    price_range_min: Rwf,
    price_range_max: Rwf,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_urls: Option<&'a [String]>,
}

impl<'a> PropertyWrite<'a> {
    pub(super) fn insert(landlord_id: UserId, property: &'a NewProperty) -> Self {
        Self {
            landlord_id: Some(landlord_id),
            name: &property.name,
            address: &property.address,
            description: property.description.as_deref(),
            property_type: &property.property_type,
            price_range_min: property.price_range_min,
            price_range_max: property.price_range_max,
            image_urls: None,
        }
    }

    pub(super) fn update(property: &'a Property) -> Self {
        Self {
            landlord_id: None,
            name: &property.name,
            address: &property.address,
            description: property.description.as_deref(),
            property_type: &property.property_type,
            price_range_min: property.price_range_min,
            price_range_max: property.price_range_max,
            image_urls: Some(&property.image_urls),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RoomRow {
    id: RoomId,
    property_id: PropertyId,
    room_number: String,
    #[serde(deserialize_with = "rwf")]
    rent_amount: Rwf,
    status: RoomStatus,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Self {
            id: row.id,
            property_id: row.property_id,
            room_number: row.room_number,
            rent_amount: row.rent_amount,
            status: row.status,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RoomInsert<'a> {
    property_id: PropertyId,
    room_number: &'a str,
    rent_amount: Rwf,
    status: RoomStatus,
}

impl<'a> From<&'a NewRoom> for RoomInsert<'a> {
    fn from(room: &'a NewRoom) -> Self {
        Self {
            property_id: room.property_id,
            room_number: &room.room_number,
            rent_amount: room.rent_amount,
            status: RoomStatus::Available,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct RoomStatusPatch {
    pub(super) status: RoomStatus,
}

#[derive(Debug, Deserialize)]
pub(super) struct TenantRow {
    id: TenantId,
    full_name: String,
    phone: String,
    email: Option<String>,
    id_number: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
}

impl From<TenantRow> for Tenant {
    fn from(row: TenantRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            id_number: row.id_number,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct TenantInsert {
    full_name: String,
    phone: String,
    email: Option<String>,
    id_number: Option<String>,
}

impl From<&TenantDraft> for TenantInsert {
    fn from(tenant: &TenantDraft) -> Self {
        Self {
            full_name: tenant.full_name.clone(),
            phone: tenant.phone.e164(),
            email: tenant.email.as_ref().map(|email| email.as_str().to_owned()),
            id_number: tenant.id_number.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct RoomTenantRow {
    id: RoomTenantId,
    room_id: RoomId,
    tenant_id: TenantId,
    move_in_date: NaiveDate,
    move_out_date: Option<NaiveDate>,
    is_active: bool,
}

impl From<RoomTenantRow> for RoomTenant {
    fn from(row: RoomTenantRow) -> Self {
        Self {
            id: row.id,
            room_id: row.room_id,
            tenant_id: row.tenant_id,
            move_in_date: row.move_in_date,
            move_out_date: row.move_out_date,
            is_active: row.is_active,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct OccupancyInsert {
    room_id: RoomId,
    tenant_id: TenantId,
    move_in_date: NaiveDate,
    is_active: bool,
}

impl From<&NewOccupancy> for OccupancyInsert {
    fn from(occupancy: &NewOccupancy) -> Self {
        Self {
            room_id: occupancy.room_id,
            tenant_id: occupancy.tenant_id,
            move_in_date: occupancy.move_in_date,
            is_active: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct OccupancyEnd {
    pub(super) is_active: bool,
    pub(super) move_out_date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub(super) struct PaymentRow {
    id: PaymentId,
    room_tenant_id: RoomTenantId,
    #[serde(deserialize_with = "rwf")]
    amount: Rwf,
    payment_date: NaiveDate,
    payment_method: PaymentMethod,
    reference: Option<String>,
    deleted_at: Option<DateTime<Utc>>,
    /// Present when selected with [`PAYMENT_WITH_PROPERTY`].
    room_tenants: Option<EmbeddedOccupancy>,
}

#[derive(Debug, Deserialize)]
struct EmbeddedOccupancy {
    rooms: EmbeddedRoom,
}

#[derive(Debug, Deserialize)]
struct EmbeddedRoom {
    property_id: PropertyId,
}

/// Payment columns plus the owning property through the occupancy's room.
pub(super) const PAYMENT_WITH_PROPERTY: &str = "id,room_tenant_id,amount,payment_date,\
payment_method,reference,deleted_at,room_tenants!inner(rooms!inner(property_id))";

/// Embedded filter path for [`PAYMENT_WITH_PROPERTY`].
pub(super) const PAYMENT_PROPERTY_FILTER: &str = "room_tenants.rooms.property_id";

impl PaymentRow {
    /// Owning property, when the embed was selected.
    pub(super) fn property_id(&self) -> Option<PropertyId> {
        self.room_tenants
            .as_ref()
            .map(|occupancy| occupancy.rooms.property_id)
    }
}

impl From<PaymentRow> for Payment {
    fn from(row: PaymentRow) -> Self {
        Self {
            id: row.id,
            room_tenant_id: row.room_tenant_id,
            amount: row.amount,
            payment_date: row.payment_date,
            payment_method: row.payment_method,
            reference: row.reference,
            deleted_at: row.deleted_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PaymentInsert<'a> {
    room_tenant_id: RoomTenantId,
    amount: Rwf,
    payment_date: NaiveDate,
    payment_method: PaymentMethod,
    reference: Option<&'a str>,
}

impl<'a> From<&'a NewPayment> for PaymentInsert<'a> {
    fn from(payment: &'a NewPayment) -> Self {
        Self {
            room_tenant_id: payment.room_tenant_id,
            amount: payment.amount,
            payment_date: payment.payment_date,
            payment_method: payment.payment_method,
            reference: payment.reference.as_deref(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct BookingRow {
    id: BookingId,
    property_id: PropertyId,
    room_id: Option<RoomId>,
    tenant_user_id: UserId,
    full_name: String,
    phone: String,
    email: Option<String>,
    message: Option<String>,
    preferred_move_in: Option<NaiveDate>,
    status: BookingStatus,
    created_at: DateTime<Utc>,
}

impl From<BookingRow> for TenantBooking {
    fn from(row: BookingRow) -> Self {
        Self {
            id: row.id,
            property_id: row.property_id,
            room_id: row.room_id,
            tenant_user_id: row.tenant_user_id,
            full_name: row.full_name,
            phone: row.phone,
            email: row.email,
            message: row.message,
            preferred_move_in: row.preferred_move_in,
            status: row.status,
            created_at: row.created_at,
        }
    }
}

/// Column values shared by the direct insert and the RPC arguments.
#[derive(Debug, Serialize)]
pub(super) struct BookingInsert {
    property_id: PropertyId,
    room_id: Option<RoomId>,
    tenant_user_id: UserId,
    full_name: String,
    phone: String,
    email: Option<String>,
    message: Option<String>,
    preferred_move_in: Option<NaiveDate>,
    status: BookingStatus,
}

impl From<&NewBooking> for BookingInsert {
    fn from(booking: &NewBooking) -> Self {
        Self {
            property_id: booking.property_id,
            room_id: booking.room_id,
            tenant_user_id: booking.tenant_user_id,
            full_name: booking.full_name.clone(),
            phone: booking.phone.e164(),
            email: booking.email.as_ref().map(|email| email.as_str().to_owned()),
            message: booking.message.clone(),
            preferred_move_in: booking.preferred_move_in,
            status: BookingStatus::Pending,
        }
    }
}

/// Arguments of `create_tenant_booking`, prefixed the way the function
/// declares them.
#[derive(Debug, Serialize)]
pub(super) struct CreateBookingArgs {
    p_property_id: PropertyId,
    p_room_id: Option<RoomId>,
    p_full_name: String,
    p_phone: String,
    p_email: Option<String>,
    p_message: Option<String>,
    p_preferred_move_in: Option<NaiveDate>,
}

impl From<&NewBooking> for CreateBookingArgs {
    fn from(booking: &NewBooking) -> Self {
        Self {
            p_property_id: booking.property_id,
            p_room_id: booking.room_id,
            p_full_name: booking.full_name.clone(),
            p_phone: booking.phone.e164(),
            p_email: booking.email.as_ref().map(|email| email.as_str().to_owned()),
            p_message: booking.message.clone(),
            p_preferred_move_in: booking.preferred_move_in,
        }
    }
}

/// `create_tenant_booking` returns either the new id or the new row. A
/// `null` result decodes as `None` through `Option<CreatedBooking>`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum CreatedBooking {
    Id(BookingId),
    Row { id: BookingId },
    Rows(Vec<CreatedBookingRow>),
}

#[derive(Debug, Deserialize)]
pub(super) struct CreatedBookingRow {
    id: BookingId,
}

impl CreatedBooking {
    pub(super) fn id(self) -> Option<BookingId> {
        match self {
            Self::Id(id) | Self::Row { id } => Some(id),
            Self::Rows(rows) => rows.into_iter().next().map(|row| row.id),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct BookingStatusPatch {
    pub(super) status: BookingStatus,
}

#[derive(Debug, Deserialize)]
pub(super) struct ManagerRow {
    id: PropertyManagerId,
    property_id: PropertyId,
    manager_id: Option<UserId>,
    email: EmailAddress,
    status: ManagerStatus,
    #[serde(alias = "invited_at")]
    created_at: DateTime<Utc>,
}

impl From<ManagerRow> for PropertyManager {
    fn from(row: ManagerRow) -> Self {
        Self {
            id: row.id,
            property_id: row.property_id,
            manager_id: row.manager_id,
            email: row.email,
            status: row.status,
            invited_at: row.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct ManagerInsert<'a> {
    pub(super) property_id: PropertyId,
    pub(super) email: &'a str,
    pub(super) status: ManagerStatus,
}

#[derive(Debug, Deserialize)]
pub(super) struct UserRow {
    pub(super) role: Option<String>,
    pub(super) full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct RoleRow {
    pub(super) role: Option<String>,
}

/// GoTrue `/auth/v1/user` payload.
#[derive(Debug, Deserialize)]
pub(super) struct AuthUserDto {
    pub(super) id: UserId,
    pub(super) email: Option<String>,
    #[serde(default)]
    pub(super) user_metadata: Map<String, Value>,
}

impl AuthUserDto {
    pub(super) fn metadata_name(&self) -> Option<String> {
        self.user_metadata
            .get("full_name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
    }
}

#[derive(Debug, Serialize)]
pub(super) struct TrashArgs {
    table_name: &'static str,
    record_id: RecordId,
}

impl TrashArgs {
    pub(super) fn new(table: TrashTable, id: RecordId) -> Self {
        Self {
            table_name: table.as_str(),
            record_id: id,
        }
    }
}

/// Columns selected to build a [`TrashRecord`] label for each table.
pub(super) const fn trash_select(table: TrashTable) -> &'static str {
    match table {
        TrashTable::Properties => "id,deleted_at,name",
        TrashTable::Rooms => "id,deleted_at,room_number",
        TrashTable::Tenants | TrashTable::TenantBookings => "id,deleted_at,full_name",
        TrashTable::Payments => "id,deleted_at,amount,payment_date",
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TrashRow {
    id: RecordId,
    deleted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    columns: Map<String, Value>,
}

impl TrashRow {
    pub(super) fn into_record(self, table: TrashTable) -> TrashRecord {
        let label = self.label(table);
        TrashRecord {
            id: self.id,
            label,
            deleted_at: self.deleted_at,
        }
    }

    fn text(&self, column: &str) -> Option<String> {
        match self.columns.get(column)? {
            Value::String(text) => Some(text.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }

    fn label(&self, table: TrashTable) -> String {
        let label = match table {
            TrashTable::Properties => self.text("name"),
            TrashTable::Rooms => self.text("room_number").map(|number| format!("Room {number}")),
            TrashTable::Tenants | TrashTable::TenantBookings => self.text("full_name"),
            TrashTable::Payments => self.payment_label(),
        };
        label.unwrap_or_else(|| self.id.to_string())
    }

    fn payment_label(&self) -> Option<String> {
        let amount = self
            .columns
            .get("amount")
            .cloned()
            .and_then(|value| AmountRepr::deserialize(value).ok())
            .and_then(|amount| amount.into_amount().ok())?;
        let formatted = format_currency(amount);
        Some(match self.text("payment_date") {
            Some(date) => format!("{formatted} on {date}"),
            None => formatted,
        })
    }
}
