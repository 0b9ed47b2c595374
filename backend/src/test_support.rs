//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`, via
//! the `test-support` feature). Nothing here is compiled into release builds.

pub mod in_memory;

pub use in_memory::InMemoryBackend;

pub mod clock {
    //! Frozen clocks for date-sensitive services.

    use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone, Utc};
    use mockable::Clock;

    /// Clock that always reports the same instant.
    #[derive(Debug, Clone, Copy)]
    pub struct FixedClock(DateTime<Utc>);

    impl FixedClock {
        pub fn new(now: DateTime<Utc>) -> Self {
            Self(now)
        }

        /// Noon UTC on `today`, far enough from midnight that local and UTC
        /// dates agree in East Africa.
        pub fn at_noon(today: NaiveDate) -> Self {
            Self(Utc.from_utc_datetime(&today.and_time(NaiveTime::MIN)) + chrono::Duration::hours(12))
        }
    }

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }
}

pub use clock::FixedClock;

pub mod openapi {
    //! OpenAPI schema traversal helpers.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Extract an `Object` schema, panicking with a diagnostic otherwise.
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(obj)) => obj,
            RefOr::Ref(reference) => {
                panic!(
                    "schema '{name}' is a $ref to '{}'; resolve the reference first",
                    reference.ref_location
                );
            }
            _ => panic!("schema '{name}' is not an Object"),
        }
    }

    /// Property of an Object schema; panics when missing.
    pub fn get_property<'a>(obj: &'a Object, field: &str) -> &'a RefOr<Schema> {
        match obj.properties.get(field) {
            Some(property) => property,
            None => panic!("property '{field}' not found"),
        }
    }
}
