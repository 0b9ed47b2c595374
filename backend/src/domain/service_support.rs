//! Mapping from port errors and validation failures to domain errors.

use serde_json::json;

use crate::domain::Error;
use crate::domain::ports::{
    AuthGatewayError, BookingRepositoryError, InvitationError, MailerError,
    ManagerRepositoryError, ObjectStorageError, PaymentRepositoryError, PropertyRepositoryError,
    RoomRepositoryError, TenantRepositoryError, TrashRepositoryError, UserDirectoryError,
};

/// Build an `invalid_request` error pointing at one request field.
pub(crate) fn invalid_field(field: &str, message: impl Into<String>) -> Error {
    let message = message.into();
    Error::invalid_request(message.clone()).with_details(json!({
        "field": field,
        "message": message,
        "code": "validation_failed",
    }))
}

pub(crate) fn map_auth_error(error: AuthGatewayError) -> Error {
    match error {
        AuthGatewayError::InvalidToken { .. } => Error::unauthorized("invalid or expired session"),
        AuthGatewayError::Connection { message } => {
            Error::service_unavailable(format!("auth service unavailable: {message}"))
        }
        AuthGatewayError::Query { message } => {
            Error::internal(format!("auth service error: {message}"))
        }
    }
}

pub(crate) fn map_property_error(error: PropertyRepositoryError) -> Error {
    match error {
        PropertyRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("property store unavailable: {message}"))
        }
        PropertyRepositoryError::Denied { message } => Error::forbidden(message),
        PropertyRepositoryError::Query { message } => {
            Error::internal(format!("property store error: {message}"))
        }
    }
}

pub(crate) fn map_room_error(error: RoomRepositoryError) -> Error {
    match error {
        RoomRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("room store unavailable: {message}"))
        }
        RoomRepositoryError::Denied { message } => Error::forbidden(message),
        RoomRepositoryError::Query { message } => {
            Error::internal(format!("room store error: {message}"))
        }
    }
}

pub(crate) fn map_tenant_error(error: TenantRepositoryError) -> Error {
    match error {
        TenantRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("tenant store unavailable: {message}"))
        }
        TenantRepositoryError::Denied { message } => Error::forbidden(message),
        TenantRepositoryError::Constraint { message } => Error::conflict(message),
        TenantRepositoryError::Query { message } => {
            Error::internal(format!("tenant store error: {message}"))
        }
    }
}

pub(crate) fn map_payment_error(error: PaymentRepositoryError) -> Error {
    match error {
        PaymentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("payment store unavailable: {message}"))
        }
        PaymentRepositoryError::Denied { message } => Error::forbidden(message),
        PaymentRepositoryError::Query { message } => {
            Error::internal(format!("payment store error: {message}"))
        }
    }
}

pub(crate) fn map_booking_error(error: BookingRepositoryError) -> Error {
    match error {
        BookingRepositoryError::FunctionMissing { function } => {
            Error::internal(format!("backend function `{function}` is not deployed"))
        }
        BookingRepositoryError::Rejected { message } => Error::conflict(message),
        BookingRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("booking store unavailable: {message}"))
        }
        BookingRepositoryError::Query { message } => {
            Error::internal(format!("booking store error: {message}"))
        }
    }
}

pub(crate) fn map_trash_error(error: TrashRepositoryError) -> Error {
    match error {
        TrashRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("trash store unavailable: {message}"))
        }
        TrashRepositoryError::Denied { message } => Error::forbidden(message),
        TrashRepositoryError::Query { message } => {
            Error::internal(format!("trash store error: {message}"))
        }
    }
}

pub(crate) fn map_manager_error(error: ManagerRepositoryError) -> Error {
    match error {
        ManagerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("manager store unavailable: {message}"))
        }
        ManagerRepositoryError::Duplicate => {
            Error::conflict("this email already has an invitation for the property")
        }
        ManagerRepositoryError::Query { message } => {
            Error::internal(format!("manager store error: {message}"))
        }
    }
}

pub(crate) fn map_user_directory_error(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

pub(crate) fn map_storage_error(error: ObjectStorageError) -> Error {
    match error {
        ObjectStorageError::Connection { message } => {
            Error::service_unavailable(format!("object storage unavailable: {message}"))
        }
        ObjectStorageError::Rejected { message } => {
            Error::invalid_request(format!("upload rejected: {message}"))
        }
    }
}

pub(crate) fn map_invitation_error(error: InvitationError) -> Error {
    match error {
        InvitationError::Rejected { message } => {
            Error::invalid_request(format!("invitation was not sent: {message}"))
        }
        InvitationError::Status { status, message } => Error::service_unavailable(format!(
            "invitation endpoint returned {status}: {message}"
        )),
        InvitationError::Timeout { message } | InvitationError::Transport { message } => {
            Error::service_unavailable(format!("invitation endpoint unavailable: {message}"))
        }
        InvitationError::Decode { message } => {
            Error::internal(format!("invitation endpoint response malformed: {message}"))
        }
    }
}

pub(crate) fn map_mailer_error(error: MailerError) -> Error {
    match error {
        MailerError::Delivery { message } => {
            Error::internal(format!("email delivery failed: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(map_booking_error(BookingRepositoryError::rejected("duplicate")), ErrorCode::Conflict)]
    #[case(map_booking_error(BookingRepositoryError::connection("refused")), ErrorCode::ServiceUnavailable)]
    #[case(map_trash_error(TrashRepositoryError::denied("rls")), ErrorCode::Forbidden)]
    #[case(map_manager_error(ManagerRepositoryError::duplicate()), ErrorCode::Conflict)]
    #[case(map_auth_error(AuthGatewayError::invalid_token("expired")), ErrorCode::Unauthorized)]
    #[case(map_invitation_error(InvitationError::timeout("10s")), ErrorCode::ServiceUnavailable)]
    fn maps_port_errors_to_codes(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[test]
    fn invalid_field_names_the_field() {
        let error = invalid_field("phone", "bad phone");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        let details = error.details().expect("details");
        assert_eq!(details["field"], "phone");
    }
}
