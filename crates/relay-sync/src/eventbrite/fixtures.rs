//! Deterministic demo-mode fixture pages.
//!
//! Demo pulls replace only the network fetch: fixture pages are parsed
//! from vendor-shaped JSON and flow through the same pagination,
//! normalization, and validation path as a live pull, so the demo path
//! cannot drift from the live one.

use super::types::{AttendeesPage, EventsPage};

/// Fixture event pages, in vendor pagination order.
///
/// # Panics
///
/// Panics if the embedded fixture JSON is malformed — a defect caught by
/// the fixture tests below, never at runtime with real data.
#[must_use]
pub fn events_pages() -> Vec<EventsPage> {
    vec![
        serde_json::from_str(EVENTS_PAGE_1).expect("fixture page 1 parses"),
        serde_json::from_str(EVENTS_PAGE_2).expect("fixture page 2 parses"),
    ]
}

/// Fixture attendee pages for one event. Only event `5001` has attendees.
#[must_use]
pub fn attendees_pages(event_id: &str) -> Vec<AttendeesPage> {
    if event_id == "5001" {
        vec![serde_json::from_str(ATTENDEES_5001).expect("attendee fixture parses")]
    } else {
        vec![serde_json::from_str(ATTENDEES_EMPTY).expect("empty attendee fixture parses")]
    }
}

const EVENTS_PAGE_1: &str = r#"{
    "events": [
        {
            "id": "5001",
            "name": {"text": "Customer Roundtable"},
            "url": "https://vendor.test/e/5001",
            "status": "live",
            "changed": "2026-03-10T08:30:00Z",
            "start": {"timezone": "UTC", "utc": "2026-04-01T17:00:00Z"},
            "end": {"timezone": "UTC", "utc": "2026-04-01T18:30:00Z"},
            "online_event": false,
            "format_id": null,
            "category_id": null,
            "capacity": 50,
            "summary": "Monthly customer feedback session."
        },
        {
            "id": "5002",
            "name": {"text": "Rust in Production"},
            "url": "https://vendor.test/e/5002",
            "status": "completed",
            "changed": "2026-03-11T12:00:00Z",
            "start": {"timezone": "Europe/Berlin", "utc": "2026-03-05T09:00:00Z"},
            "end": {"timezone": "Europe/Berlin", "utc": "2026-03-05T17:00:00Z"},
            "online_event": false,
            "format_id": "1",
            "category_id": "102",
            "capacity": 300,
            "summary": "One-day conference."
        }
    ],
    "pagination": {"continuation": "page2", "has_more_items": true}
}"#;

const EVENTS_PAGE_2: &str = r#"{
    "events": [
        {
            "id": "5003",
            "name": {"text": "Spring Gala"},
            "url": "https://vendor.test/e/5003",
            "status": "draft",
            "changed": "2026-03-12T15:45:00Z",
            "start": {"timezone": "America/New_York", "utc": "2026-05-20T23:00:00Z"},
            "end": {"timezone": "America/New_York", "utc": "2026-05-21T03:00:00Z"},
            "online_event": false,
            "format_id": "11",
            "category_id": null,
            "capacity": null,
            "summary": null
        }
    ],
    "pagination": {"continuation": null, "has_more_items": false}
}"#;

const ATTENDEES_5001: &str = r#"{
    "attendees": [
        {
            "id": "9001",
            "event_id": "5001",
            "changed": "2026-03-10T09:15:00Z",
            "cancelled": false,
            "refunded": false,
            "checked_in": true,
            "profile": {"name": "Grace Hopper", "email": "grace@example.test"},
            "ticket_class_name": "General"
        },
        {
            "id": "9002",
            "event_id": "5001",
            "changed": "2026-03-10T10:00:00Z",
            "cancelled": true,
            "refunded": false,
            "checked_in": false,
            "profile": {"name": "Hugo Vries", "email": null},
            "ticket_class_name": "General"
        }
    ],
    "pagination": {"continuation": null, "has_more_items": false}
}"#;

const ATTENDEES_EMPTY: &str = r#"{
    "attendees": [],
    "pagination": {"continuation": null, "has_more_items": false}
}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixture_pages_parse_and_paginate() {
        let pages = events_pages();
        assert_eq!(pages.len(), 2);
        assert!(pages[0].pagination.has_more_items);
        assert!(!pages[1].pagination.has_more_items);
        let total: usize = pages.iter().map(|p| p.events.len()).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn attendee_fixtures_are_scoped_to_event() {
        assert_eq!(attendees_pages("5001")[0].attendees.len(), 2);
        assert!(attendees_pages("5002")[0].attendees.is_empty());
    }

    #[test]
    fn fixtures_are_deterministic() {
        let first: Vec<String> = events_pages()
            .iter()
            .flat_map(|p| p.events.iter().map(|e| e.id.clone()))
            .collect();
        let second: Vec<String> = events_pages()
            .iter()
            .flat_map(|p| p.events.iter().map(|e| e.id.clone()))
            .collect();
        assert_eq!(first, second);
    }
}
