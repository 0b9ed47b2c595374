//! Booking requests sent by prospective tenants.

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{
    BookingId, EmailAddress, EmailValidationError, PhoneNumber, PhoneValidationError, PropertyId,
    RoomId, UserId,
};

/// Lifecycle state of a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    /// Awaiting a landlord decision.
    Pending,
    /// Accepted by the landlord or a manager.
    Approved,
    /// Declined by the landlord or a manager.
    Rejected,
    /// Withdrawn by the tenant.
    Cancelled,
}

impl BookingStatus {
    /// Database string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A row in `tenant_bookings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenantBooking {
    /// Primary key.
    pub id: BookingId,
    /// Requested property.
    pub property_id: PropertyId,
    /// Requested room, when the tenant picked one.
    pub room_id: Option<RoomId>,
    /// Requesting user.
    pub tenant_user_id: UserId,
    /// Applicant name.
    pub full_name: String,
    /// Applicant phone (E.164).
    pub phone: String,
    /// Applicant email.
    pub email: Option<String>,
    /// Note to the landlord.
    pub message: Option<String>,
    /// Desired move-in date.
    pub preferred_move_in: Option<NaiveDate>,
    /// Current state.
    pub status: BookingStatus,
    /// Submission time.
    pub created_at: DateTime<Utc>,
}

/// Booking form as submitted by a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    /// Property being requested.
    pub property_id: PropertyId,
    /// Optional specific room.
    pub room_id: Option<RoomId>,
    /// Applicant name.
    pub full_name: String,
    /// Applicant phone.
    pub phone: String,
    /// Applicant email.
    pub email: Option<String>,
    /// Note to the landlord.
    pub message: Option<String>,
    /// Desired move-in date.
    pub preferred_move_in: Option<NaiveDate>,
}

/// Validation failures for booking requests.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingValidationError {
    /// Applicant name is blank.
    #[error("full name must not be empty")]
    EmptyName,
    /// Phone failed validation.
    #[error(transparent)]
    Phone(#[from] PhoneValidationError),
    /// Email failed validation.
    #[error(transparent)]
    Email(#[from] EmailValidationError),
    /// Move-in date is before today.
    #[error("preferred move-in date {date} is in the past")]
    MoveInInPast {
        /// Rejected date.
        date: NaiveDate,
    },
}

impl BookingValidationError {
    /// Request field the failure refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyName => "fullName",
            Self::Phone(_) => "phone",
            Self::Email(_) => "email",
            Self::MoveInInPast { .. } => "preferredMoveIn",
        }
    }
}

/// A validated booking ready for the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Property being requested.
    pub property_id: PropertyId,
    /// Optional specific room.
    pub room_id: Option<RoomId>,
    /// Requesting user.
    pub tenant_user_id: UserId,
    /// Applicant name.
    pub full_name: String,
    /// Normalised phone.
    pub phone: PhoneNumber,
    /// Normalised email.
    pub email: Option<EmailAddress>,
    /// Trimmed note.
    pub message: Option<String>,
    /// Desired move-in date.
    pub preferred_move_in: Option<NaiveDate>,
}

impl BookingRequest {
    /// Validate the form on behalf of `tenant`, relative to `today`.
    pub fn validate(
        self,
        tenant: UserId,
        today: NaiveDate,
    ) -> Result<NewBooking, BookingValidationError> {
        let full_name = self.full_name.trim().to_owned();
        if full_name.is_empty() {
            return Err(BookingValidationError::EmptyName);
        }
        let phone = PhoneNumber::parse(&self.phone)?;
        let email = self
            .email
            .filter(|raw| !raw.trim().is_empty())
            .map(|raw| EmailAddress::parse(&raw))
            .transpose()?;
        if let Some(date) = self.preferred_move_in.filter(|date| *date < today) {
            return Err(BookingValidationError::MoveInInPast { date });
        }
        Ok(NewBooking {
            property_id: self.property_id,
            room_id: self.room_id,
            tenant_user_id: tenant,
            full_name,
            phone,
            email,
            message: self
                .message
                .map(|m| m.trim().to_owned())
                .filter(|m| !m.is_empty()),
            preferred_move_in: self.preferred_move_in,
        })
    }
}

/// Which step of the submission strategy created the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingPath {
    /// The `create_tenant_booking` RPC.
    Rpc,
    /// Direct insert after the RPC was reported missing.
    DirectInsert,
}

/// Result of a successful booking submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingOutcome {
    /// Id of the created row.
    pub booking_id: BookingId,
    /// Step that created it.
    pub path: BookingPath,
}

/// Landlord decision on a pending booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingDecision {
    /// Accept.
    Approve,
    /// Decline.
    Reject,
}

impl BookingDecision {
    /// Status the booking moves to.
    #[must_use]
    pub const fn target_status(self) -> BookingStatus {
        match self {
            Self::Approve => BookingStatus::Approved,
            Self::Reject => BookingStatus::Rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).expect("date")
    }

    #[fixture]
    fn request() -> BookingRequest {
        BookingRequest {
            property_id: PropertyId::random(),
            room_id: None,
            full_name: " Grace Uwase ".to_owned(),
            phone: "0788123456".to_owned(),
            email: Some("grace@example.rw".to_owned()),
            message: Some(" ".to_owned()),
            preferred_move_in: Some(today()),
        }
    }

    #[rstest]
    fn validates_and_normalises(request: BookingRequest) {
        let tenant = UserId::random();
        let booking = request.validate(tenant, today()).expect("valid");
        assert_eq!(booking.full_name, "Grace Uwase");
        assert_eq!(booking.phone.e164(), "+250788123456");
        assert_eq!(booking.tenant_user_id, tenant);
        assert_eq!(booking.message, None);
    }

    #[rstest]
    fn rejects_past_move_in(mut request: BookingRequest) {
        request.preferred_move_in = today().pred_opt();
        let err = request
            .validate(UserId::random(), today())
            .expect_err("past");
        assert_eq!(err.field(), "preferredMoveIn");
    }

    #[rstest]
    fn rejects_bad_phone(mut request: BookingRequest) {
        request.phone = "123456".to_owned();
        let err = request
            .validate(UserId::random(), today())
            .expect_err("phone");
        assert_eq!(err.field(), "phone");
    }

    #[rstest]
    #[case(BookingDecision::Approve, BookingStatus::Approved)]
    #[case(BookingDecision::Reject, BookingStatus::Rejected)]
    fn decisions_map_to_statuses(#[case] decision: BookingDecision, #[case] status: BookingStatus) {
        assert_eq!(decision.target_status(), status);
    }
}
