//! Vendor-native Eventbrite payload shapes.
//!
//! These types exist only inside the adapter. They are converted through
//! the `normalize` boundary into [`relay_core::entities::CanonicalEntity`]
//! and never leak past it.

use serde::Deserialize;

/// Pagination envelope common to all Eventbrite list responses.
#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    /// Opaque continuation token for the next page.
    pub continuation: Option<String>,
    pub has_more_items: bool,
}

/// One page of the events feed.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsPage {
    pub events: Vec<EventbriteEvent>,
    pub pagination: Pagination,
}

/// One page of an event's attendees feed.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendeesPage {
    pub attendees: Vec<EventbriteAttendee>,
    pub pagination: Pagination,
}

/// Localized text wrapper Eventbrite uses for names and descriptions.
#[derive(Debug, Clone, Deserialize)]
pub struct MultipartText {
    pub text: Option<String>,
}

/// Timezone-qualified timestamp pair.
#[derive(Debug, Clone, Deserialize)]
pub struct DateTimeTz {
    pub timezone: String,
    pub utc: String,
}

/// A vendor-native event record.
#[derive(Debug, Clone, Deserialize)]
pub struct EventbriteEvent {
    pub id: String,
    pub name: MultipartText,
    pub url: Option<String>,
    /// Vendor status enum: `draft | live | started | ended | completed | canceled`.
    pub status: String,
    /// RFC 3339 change timestamp; drives cursor advancement.
    pub changed: String,
    pub start: DateTimeTz,
    pub end: DateTimeTz,
    #[serde(default)]
    pub online_event: bool,
    pub format_id: Option<String>,
    pub category_id: Option<String>,
    pub capacity: Option<u32>,
    pub summary: Option<String>,
}

/// Attendee profile sub-object.
#[derive(Debug, Clone, Deserialize)]
pub struct AttendeeProfile {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// A vendor-native attendee record.
#[derive(Debug, Clone, Deserialize)]
pub struct EventbriteAttendee {
    pub id: String,
    pub event_id: String,
    pub changed: String,
    #[serde(default)]
    pub cancelled: bool,
    #[serde(default)]
    pub refunded: bool,
    #[serde(default)]
    pub checked_in: bool,
    pub profile: AttendeeProfile,
    pub ticket_class_name: Option<String>,
}
