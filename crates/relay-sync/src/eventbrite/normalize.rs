//! Normalization boundary: vendor-native records → canonical entities.
//!
//! All vendor/canonical mapping lives here as explicit match tables. An
//! unmapped vendor status is an error, never a default — silent mis-mapping
//! under vendor API drift is the failure mode this whole layer exists to
//! prevent.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use relay_core::entities::{
    ATTR_EVENT_META_V1, ATTR_EVENT_SCHEDULE_V1, ATTR_INVITE_META_V1, CanonicalEntity,
    EventMetaV1, EventScheduleV1, InviteMetaV1,
};
use relay_core::enums::{CanonicalStatus, EntityKind};
use relay_core::smart_code::SmartCode;

use super::types::{EventbriteAttendee, EventbriteEvent};
use crate::error::SyncError;

/// Vendor prefix used in entity codes and smart codes.
pub const VENDOR: &str = "EVB";
/// Smart-code domain segment for this feed.
pub const DOMAIN: &str = "EVENTS";

/// Vendor-prefixed unique code: the idempotency anchor for upserts.
#[must_use]
pub fn entity_code(provider_id: &str) -> String {
    format!("{VENDOR}-{provider_id}")
}

/// Deterministic idempotency key for one operation on one vendor record.
///
/// Two pulls of the same record produce the same key, so downstream
/// persistence treats re-processing as an upsert.
#[must_use]
pub fn idempotency_key(
    organization_id: &str,
    kind: EntityKind,
    provider_id: &str,
    operation: &str,
) -> String {
    format!("{organization_id}:{VENDOR}:{kind}:{provider_id}:{operation}")
}

/// Vendor event status → canonical status.
///
/// | vendor      | canonical   |
/// |-------------|-------------|
/// | `draft`     | `draft`     |
/// | `live`      | `live`      |
/// | `started`   | `live`      |
/// | `ended`     | `completed` |
/// | `completed` | `completed` |
/// | `canceled`  | `cancelled` |
///
/// # Errors
///
/// Returns [`SyncError::UnmappedStatus`] for any other value.
pub fn map_event_status(status: &str) -> Result<CanonicalStatus, SyncError> {
    match status {
        "draft" => Ok(CanonicalStatus::Draft),
        "live" | "started" => Ok(CanonicalStatus::Live),
        "ended" | "completed" => Ok(CanonicalStatus::Completed),
        "canceled" => Ok(CanonicalStatus::Cancelled),
        other => Err(SyncError::UnmappedStatus {
            record_kind: EntityKind::Event.to_string(),
            status: other.to_string(),
        }),
    }
}

/// Attendee flags → canonical invite status.
///
/// Cancellation (or refund) wins over check-in; check-in wins over plain
/// registration. Total over all flag combinations, so no attendee state is
/// ever dropped.
#[must_use]
pub const fn map_attendee_status(
    cancelled: bool,
    refunded: bool,
    checked_in: bool,
) -> CanonicalStatus {
    if cancelled || refunded {
        CanonicalStatus::Cancelled
    } else if checked_in {
        CanonicalStatus::Attended
    } else {
        CanonicalStatus::Registered
    }
}

/// Derive the event subtype from vendor format/category fields.
///
/// Heuristic table, checked in order:
/// 1. `format_id`: 1 → `conference`, 2 → `seminar`, 9 → `workshop`,
///    10 → `networking`, 11 → `social`
/// 2. `category_id`: 101 (business) → `conference`, 102 (science & tech)
///    → `meetup`
/// 3. default → `webinar`
#[must_use]
pub fn event_subtype(format_id: Option<&str>, category_id: Option<&str>) -> &'static str {
    match format_id {
        Some("1") => return "conference",
        Some("2") => return "seminar",
        Some("9") => return "workshop",
        Some("10") => return "networking",
        Some("11") => return "social",
        _ => {}
    }
    match category_id {
        Some("101") => "conference",
        Some("102") => "meetup",
        _ => "webinar",
    }
}

fn parse_changed(record_kind: EntityKind, provider_id: &str, raw: &str) -> Result<DateTime<Utc>, SyncError> {
    raw.parse().map_err(|e| SyncError::Normalize {
        record_kind: record_kind.to_string(),
        provider_id: provider_id.to_string(),
        message: format!("bad timestamp '{raw}': {e}"),
    })
}

/// Normalize one vendor event into a canonical entity.
///
/// # Errors
///
/// Returns [`SyncError::UnmappedStatus`] or [`SyncError::Normalize`] on an
/// unknown status, an empty name, or a malformed timestamp. The caller
/// isolates the failure to this record.
pub fn normalize_event(
    organization_id: &str,
    event: &EventbriteEvent,
) -> Result<CanonicalEntity, SyncError> {
    let name = event
        .name
        .text
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| SyncError::Normalize {
            record_kind: EntityKind::Event.to_string(),
            provider_id: event.id.clone(),
            message: "event name is empty".into(),
        })?;

    let status = map_event_status(&event.status)?;
    let subtype = event_subtype(event.format_id.as_deref(), event.category_id.as_deref());
    let smart_code = SmartCode::new(VENDOR, DOMAIN, "EVENT", &subtype.to_uppercase(), 1)?;
    let changed_at = parse_changed(EntityKind::Event, &event.id, &event.changed)?;
    let starts_at = parse_changed(EntityKind::Event, &event.id, &event.start.utc)?;
    let ends_at = parse_changed(EntityKind::Event, &event.id, &event.end.utc)?;

    let meta = EventMetaV1 {
        title: name.to_string(),
        url: event.url.clone(),
        online_event: event.online_event,
        event_type: subtype.to_string(),
        capacity: event.capacity,
        summary: event.summary.clone(),
    };
    let schedule = EventScheduleV1 {
        starts_at,
        ends_at,
        timezone: event.start.timezone.clone(),
    };

    let mut attributes = BTreeMap::new();
    attributes.insert(
        ATTR_EVENT_META_V1.to_string(),
        serde_json::to_value(meta).map_err(|e| SyncError::Normalize {
            record_kind: EntityKind::Event.to_string(),
            provider_id: event.id.clone(),
            message: e.to_string(),
        })?,
    );
    attributes.insert(
        ATTR_EVENT_SCHEDULE_V1.to_string(),
        serde_json::to_value(schedule).map_err(|e| SyncError::Normalize {
            record_kind: EntityKind::Event.to_string(),
            provider_id: event.id.clone(),
            message: e.to_string(),
        })?,
    );

    Ok(CanonicalEntity {
        organization_id: organization_id.to_string(),
        entity_type: EntityKind::Event,
        entity_name: name.to_string(),
        entity_code: entity_code(&event.id),
        smart_code,
        status,
        attributes,
        changed_at,
    })
}

/// Normalize one vendor attendee into a canonical event-invite entity.
///
/// # Errors
///
/// Returns [`SyncError::Normalize`] on a malformed timestamp.
pub fn normalize_attendee(
    organization_id: &str,
    attendee: &EventbriteAttendee,
) -> Result<CanonicalEntity, SyncError> {
    let status = map_attendee_status(attendee.cancelled, attendee.refunded, attendee.checked_in);
    let changed_at = parse_changed(EntityKind::EventInvite, &attendee.id, &attendee.changed)?;
    let name = attendee
        .profile
        .name
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map_or_else(|| format!("Attendee {}", attendee.id), ToString::to_string);

    let meta = InviteMetaV1 {
        event_code: entity_code(&attendee.event_id),
        email: attendee.profile.email.clone(),
        attendee_name: name.clone(),
        checked_in: attendee.checked_in,
        ticket_class: attendee.ticket_class_name.clone(),
    };
    let mut attributes = BTreeMap::new();
    attributes.insert(
        ATTR_INVITE_META_V1.to_string(),
        serde_json::to_value(meta).map_err(|e| SyncError::Normalize {
            record_kind: EntityKind::EventInvite.to_string(),
            provider_id: attendee.id.clone(),
            message: e.to_string(),
        })?,
    );

    Ok(CanonicalEntity {
        organization_id: organization_id.to_string(),
        entity_type: EntityKind::EventInvite,
        entity_name: name,
        entity_code: entity_code(&attendee.id),
        smart_code: SmartCode::new(VENDOR, DOMAIN, "INVITE", "STANDARD", 1)?,
        status,
        attributes,
        changed_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::eventbrite::types::{AttendeeProfile, DateTimeTz, MultipartText};

    fn event(status: &str) -> EventbriteEvent {
        EventbriteEvent {
            id: "777".into(),
            name: MultipartText {
                text: Some("Launch Day".into()),
            },
            url: Some("https://vendor.test/e/777".into()),
            status: status.into(),
            changed: "2026-03-10T08:30:00Z".into(),
            start: DateTimeTz {
                timezone: "UTC".into(),
                utc: "2026-04-01T17:00:00Z".into(),
            },
            end: DateTimeTz {
                timezone: "UTC".into(),
                utc: "2026-04-01T19:00:00Z".into(),
            },
            online_event: false,
            format_id: None,
            category_id: None,
            capacity: None,
            summary: None,
        }
    }

    #[rstest]
    #[case("draft", CanonicalStatus::Draft)]
    #[case("live", CanonicalStatus::Live)]
    #[case("started", CanonicalStatus::Live)]
    #[case("ended", CanonicalStatus::Completed)]
    #[case("completed", CanonicalStatus::Completed)]
    #[case("canceled", CanonicalStatus::Cancelled)]
    fn event_status_table_is_total(#[case] vendor: &str, #[case] expected: CanonicalStatus) {
        assert_eq!(map_event_status(vendor).unwrap(), expected);
    }

    #[test]
    fn unmapped_event_status_is_an_error_not_a_default() {
        let err = map_event_status("postponed").unwrap_err();
        assert!(matches!(err, SyncError::UnmappedStatus { .. }));
        assert!(err.to_string().contains("postponed"));
    }

    #[rstest]
    #[case(true, false, true, CanonicalStatus::Cancelled)]
    #[case(false, true, false, CanonicalStatus::Cancelled)]
    #[case(false, false, true, CanonicalStatus::Attended)]
    #[case(false, false, false, CanonicalStatus::Registered)]
    fn attendee_status_table(
        #[case] cancelled: bool,
        #[case] refunded: bool,
        #[case] checked_in: bool,
        #[case] expected: CanonicalStatus,
    ) {
        assert_eq!(
            map_attendee_status(cancelled, refunded, checked_in),
            expected
        );
    }

    #[rstest]
    #[case(Some("1"), None, "conference")]
    #[case(Some("9"), None, "workshop")]
    #[case(None, Some("101"), "conference")]
    #[case(None, Some("102"), "meetup")]
    #[case(None, None, "webinar")]
    #[case(Some("999"), Some("999"), "webinar")]
    fn subtype_heuristic_table(
        #[case] format_id: Option<&str>,
        #[case] category_id: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(event_subtype(format_id, category_id), expected);
    }

    #[test]
    fn live_event_without_format_becomes_webinar() {
        // The canonical end-to-end example: live, in-person, no format or
        // category info.
        let normalized = normalize_event("org-1", &event("live")).unwrap();
        assert_eq!(normalized.status, CanonicalStatus::Live);
        assert_eq!(normalized.entity_code, "EVB-777");
        assert_eq!(
            normalized.smart_code.to_string(),
            "EVB.EVENTS.EVENT.WEBINAR.v1"
        );
        let meta: EventMetaV1 = serde_json::from_value(
            normalized.attributes.get(ATTR_EVENT_META_V1).unwrap().clone(),
        )
        .unwrap();
        assert_eq!(meta.event_type, "webinar");
        assert!(!meta.online_event);
    }

    #[test]
    fn checked_in_attendee_becomes_attended() {
        let attendee = EventbriteAttendee {
            id: "at-42".into(),
            event_id: "777".into(),
            changed: "2026-03-11T09:00:00Z".into(),
            cancelled: false,
            refunded: false,
            checked_in: true,
            profile: AttendeeProfile {
                name: Some("Grace".into()),
                email: Some("grace@example.test".into()),
            },
            ticket_class_name: Some("General".into()),
        };
        let normalized = normalize_attendee("org-1", &attendee).unwrap();
        assert_eq!(normalized.status, CanonicalStatus::Attended);
        assert_eq!(normalized.entity_code, "EVB-at-42");
        let meta: InviteMetaV1 = serde_json::from_value(
            normalized
                .attributes
                .get(ATTR_INVITE_META_V1)
                .unwrap()
                .clone(),
        )
        .unwrap();
        assert_eq!(meta.event_code, "EVB-777");
    }

    #[test]
    fn empty_event_name_fails_normalization() {
        let mut e = event("live");
        e.name.text = Some("   ".into());
        let err = normalize_event("org-1", &e).unwrap_err();
        assert!(matches!(err, SyncError::Normalize { .. }));
    }

    #[test]
    fn malformed_timestamp_fails_normalization() {
        let mut e = event("live");
        e.changed = "yesterday".into();
        assert!(matches!(
            normalize_event("org-1", &e),
            Err(SyncError::Normalize { .. })
        ));
    }

    #[test]
    fn idempotency_key_is_deterministic() {
        let a = idempotency_key("org-1", EntityKind::Event, "777", "upsert");
        let b = idempotency_key("org-1", EntityKind::Event, "777", "upsert");
        assert_eq!(a, b);
        assert_eq!(a, "org-1:EVB:event:777:upsert");
    }
}
