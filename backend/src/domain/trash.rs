//! Soft-deleted records and the admin trash view.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordId;

/// Tables that support soft delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrashTable {
    /// `properties`
    Properties,
    /// `rooms`
    Rooms,
    /// `tenants`
    Tenants,
    /// `payments`
    Payments,
    /// `tenant_bookings`
    TenantBookings,
}

impl TrashTable {
    /// Every trashable table.
    pub const ALL: [Self; 5] = [
        Self::Properties,
        Self::Rooms,
        Self::Tenants,
        Self::Payments,
        Self::TenantBookings,
    ];

    /// Backend table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Properties => "properties",
            Self::Rooms => "rooms",
            Self::Tenants => "tenants",
            Self::Payments => "payments",
            Self::TenantBookings => "tenant_bookings",
        }
    }
}

impl fmt::Display for TrashTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for tables outside the trash allow-list.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("table `{0}` does not support trash")]
pub struct UnknownTrashTable(pub String);

impl FromStr for TrashTable {
    type Err = UnknownTrashTable;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|table| table.as_str() == s)
            .ok_or_else(|| UnknownTrashTable(s.to_owned()))
    }
}

/// A row as shown in the trash screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashRecord {
    /// Row id.
    pub id: RecordId,
    /// Human-readable label (name, room number, reference).
    pub label: String,
    /// Set when the row is in the trash.
    pub deleted_at: Option<DateTime<Utc>>,
}

impl TrashRecord {
    /// True when the row is in the trash.
    #[must_use]
    pub const fn is_trashed(&self) -> bool {
        self.deleted_at.is_some()
    }
}

/// Records split into live and trashed partitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrashView {
    /// Live rows sorted by label.
    pub active: Vec<TrashRecord>,
    /// Trashed rows, most recently deleted first.
    pub trashed: Vec<TrashRecord>,
}

impl TrashView {
    /// Partition on `deleted_at` and sort each side.
    #[must_use]
    pub fn partition(records: Vec<TrashRecord>) -> Self {
        let (mut trashed, mut active): (Vec<_>, Vec<_>) =
            records.into_iter().partition(TrashRecord::is_trashed);
        active.sort_by(by_label);
        trashed.sort_by(|a, b| b.deleted_at.cmp(&a.deleted_at).then_with(|| by_label(a, b)));
        Self { active, trashed }
    }
}

fn by_label(a: &TrashRecord, b: &TrashRecord) -> Ordering {
    a.label
        .to_lowercase()
        .cmp(&b.label.to_lowercase())
        .then_with(|| a.id.cmp(&b.id))
}
