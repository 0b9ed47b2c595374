//! Shared builders for service unit tests.

use chrono::{NaiveDate, Utc};

use crate::domain::{
    AccessToken, AuthUser, Caller, Payment, PaymentId, PaymentMethod, Property, PropertyId, Room,
    RoomId, RoomStatus, RoomTenant, RoomTenantId, Rwf, Tenant, TenantId, UserId, UserRole,
};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub(crate) fn caller(role: UserRole) -> Caller {
    Caller::new(
        AuthUser {
            id: UserId::random(),
            email: None,
            full_name: Some("Test User".to_owned()),
            role,
        },
        AccessToken::new("test-jwt").expect("token"),
    )
}

pub(crate) use crate::test_support::FixedClock;

pub(crate) fn clock_at(today: NaiveDate) -> FixedClock {
    FixedClock::at_noon(today)
}

pub(crate) fn property(landlord: UserId) -> Property {
    Property {
        id: PropertyId::random(),
        landlord_id: landlord,
        name: "Kimihurura Residence".to_owned(),
        address: "KG 5 Ave".to_owned(),
        description: None,
        property_type: "apartment".to_owned(),
        price_range_min: Rwf::new(50_000),
        price_range_max: Rwf::new(90_000),
        image_urls: Vec::new(),
        created_at: Utc::now(),
        deleted_at: None,
    }
}

pub(crate) fn room(property_id: PropertyId, number: &str, rent: i64, status: RoomStatus) -> Room {
    Room {
        id: RoomId::random(),
        property_id,
        room_number: number.to_owned(),
        rent_amount: Rwf::new(rent),
        status,
        deleted_at: None,
    }
}

pub(crate) fn tenant(name: &str) -> Tenant {
    Tenant {
        id: TenantId::random(),
        full_name: name.to_owned(),
        phone: "+250788123456".to_owned(),
        email: None,
        id_number: None,
        deleted_at: None,
    }
}

pub(crate) fn occupancy(room_id: RoomId, tenant_id: TenantId, move_in: NaiveDate) -> RoomTenant {
    RoomTenant {
        id: RoomTenantId::random(),
        room_id,
        tenant_id,
        move_in_date: move_in,
        move_out_date: None,
        is_active: true,
    }
}

pub(crate) fn payment(occupancy: RoomTenantId, amount: i64, on: NaiveDate) -> Payment {
    Payment {
        id: PaymentId::random(),
        room_tenant_id: occupancy,
        amount: Rwf::new(amount),
        payment_date: on,
        payment_method: PaymentMethod::MobileMoney,
        reference: None,
        deleted_at: None,
    }
}
