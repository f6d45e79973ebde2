//! The canonical entity: the vendor-agnostic normalized record shape.
//!
//! Every vendor feed normalizes into [`CanonicalEntity`] behind the
//! adapter's boundary. `entity_code` (`"<VENDOR>-<provider_id>"`) is the
//! idempotency anchor: re-syncing the same code is an upsert, never a
//! duplicate insert. Attribute groups are namespaced and independently
//! versioned — adding `EVENT.META.v2` must not break `v1` consumers, so
//! group payload structs are closed (`deny_unknown_fields`) and never
//! mutated once published.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{CanonicalStatus, EntityKind};
use crate::smart_code::SmartCode;

/// Attribute group key for event metadata, version 1.
pub const ATTR_EVENT_META_V1: &str = "EVENT.META.v1";
/// Attribute group key for event scheduling, version 1.
pub const ATTR_EVENT_SCHEDULE_V1: &str = "EVENT.SCHEDULE.v1";
/// Attribute group key for invite metadata, version 1.
pub const ATTR_INVITE_META_V1: &str = "INVITE.META.v1";

/// The normalized output unit of any vendor sync.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct CanonicalEntity {
    /// Organization scope that owns this entity.
    pub organization_id: String,

    /// Fixed discriminant per vendor feed.
    pub entity_type: EntityKind,

    /// Display name. Non-empty.
    pub entity_name: String,

    /// Vendor-prefixed unique code (`"<VENDOR>-<provider_id>"`). Stable
    /// across re-syncs; unique per organization+vendor+kind.
    pub entity_code: String,

    /// Versioned classification string. Immutable once assigned to a subtype.
    pub smart_code: SmartCode,

    /// Canonical lifecycle status. Cancellation is modeled here, not as
    /// deletion.
    pub status: CanonicalStatus,

    /// Namespaced attribute-group payloads keyed by group id
    /// (e.g. `"EVENT.META.v1"`). Each group is independently versioned.
    pub attributes: BTreeMap<String, serde_json::Value>,

    /// The vendor's change timestamp for this record. Drives cursor
    /// advancement and update-vs-skip decisions.
    pub changed_at: DateTime<Utc>,
}

impl CanonicalEntity {
    /// Fetch and deserialize one attribute group, if present.
    ///
    /// # Errors
    ///
    /// Returns a `serde_json` error if the stored payload does not match
    /// the requested group type (a contract violation upstream).
    pub fn attribute_group<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, serde_json::Error> {
        self.attributes
            .get(key)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
    }
}

/// Event metadata attribute group, version 1. Closed shape.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EventMetaV1 {
    /// Event title as shown by the vendor.
    pub title: String,
    /// Public event URL, if any.
    pub url: Option<String>,
    /// Whether the event is held online.
    pub online_event: bool,
    /// Derived event subtype (e.g. `webinar`, `conference`).
    pub event_type: String,
    /// Venue capacity, if the vendor reports one.
    pub capacity: Option<u32>,
    /// Short summary text.
    pub summary: Option<String>,
}

/// Event scheduling attribute group, version 1. Closed shape.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EventScheduleV1 {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    /// IANA timezone name the vendor scheduled the event in.
    pub timezone: String,
}

/// Invite metadata attribute group, version 1. Closed shape.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct InviteMetaV1 {
    /// `entity_code` of the event this invite belongs to.
    pub event_code: String,
    /// Attendee email, if the vendor shares it.
    pub email: Option<String>,
    /// Attendee display name.
    pub attendee_name: String,
    /// Whether the attendee checked in at the event.
    pub checked_in: bool,
    /// Ticket class name, if any.
    pub ticket_class: Option<String>,
}
