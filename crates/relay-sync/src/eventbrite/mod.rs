//! Eventbrite vendor adapter.
//!
//! Pull-based incremental sync: follows vendor pagination in order,
//! respects rate limits, normalizes each record behind the
//! [`normalize`] boundary, validates against published contracts, and
//! upserts by `entity_code`. One bad record never aborts the run — it is
//! reported in `partial_errors` and the pull continues.
//!
//! State machine per run:
//! `Idle -> Fetching -> Normalizing -> (per record: Validating ->
//! Committing | Erroring) -> Completed(success | partial | failure)`.

pub mod fixtures;
pub mod normalize;
pub mod types;

use chrono::{DateTime, Utc};
use relay_audit::{AuditRecorder, TransactionContext};
use relay_core::entities::CanonicalEntity;
use relay_core::enums::{AuditLineType, EntityKind, TransactionKind, TransactionStatus};
use relay_core::ids::{self, PREFIX_CORRELATION, PREFIX_SYNC_RUN};
use relay_schema::ContractRegistry;
use serde::de::DeserializeOwned;

use crate::error::SyncError;
use crate::http::check_response;
use crate::retry::RetryConfig;
use crate::store::{EntityStore, UpsertOutcome};
use crate::{ConnectionCheck, Credentials, PullRequest, RecordError, SyncResult, SyncStats};

use types::{AttendeesPage, EventsPage};

const DEFAULT_BASE_URL: &str = "https://www.eventbriteapi.com/v3";

/// Map an attribute-group key to its published contract name.
///
/// An unknown group key is a strictness violation: groups are published
/// contracts, and a normalizer emitting an unregistered group is a bug.
fn contract_for_group(key: &str) -> Option<&'static str> {
    match key {
        relay_core::entities::ATTR_EVENT_META_V1 => Some(relay_schema::CONTRACT_EVENT_META_V1),
        relay_core::entities::ATTR_EVENT_SCHEDULE_V1 => {
            Some(relay_schema::CONTRACT_EVENT_SCHEDULE_V1)
        }
        relay_core::entities::ATTR_INVITE_META_V1 => Some(relay_schema::CONTRACT_INVITE_META_V1),
        _ => None,
    }
}

const fn contract_for_kind(kind: EntityKind) -> &'static str {
    match kind {
        EntityKind::Event => relay_schema::CONTRACT_EVENT_V1,
        EntityKind::EventInvite => relay_schema::CONTRACT_EVENT_INVITE_V1,
    }
}

/// Mutable accumulator for one sync run.
#[derive(Default)]
struct RunState {
    stats: SyncStats,
    partial_errors: Vec<RecordError>,
    succeeded: Vec<DateTime<Utc>>,
    failed: Vec<DateTime<Utc>>,
    /// A record failed before its `changed_at` could be parsed; the cursor
    /// must not advance past it, so it holds at the incoming watermark.
    unplaceable_failure: bool,
}

/// Eventbrite sync adapter.
pub struct EventbriteAdapter {
    http: reqwest::Client,
    base_url: String,
    retry: RetryConfig,
}

impl Default for EventbriteAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventbriteAdapter {
    /// Create an adapter against the production Eventbrite API.
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string(), RetryConfig::default())
    }

    /// Create an adapter against an alternate base URL (test servers).
    ///
    /// # Panics
    ///
    /// Panics if the underlying `reqwest::Client` fails to build.
    #[must_use]
    pub fn with_base_url(base_url: String, retry: RetryConfig) -> Self {
        Self {
            http: reqwest::Client::builder()
                .user_agent("relay/0.1")
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("reqwest client should build"),
            base_url,
            retry,
        }
    }

    /// Single lightweight authenticated call to verify credentials before
    /// a full pull is attempted.
    pub async fn test_connection(&self, credentials: &Credentials) -> ConnectionCheck {
        let url = format!("{}/users/me/", self.base_url);
        match self
            .fetch_json::<serde_json::Value>(&url, &credentials.token)
            .await
        {
            Ok(_) => ConnectionCheck {
                success: true,
                message: "authenticated".into(),
            },
            Err(e) => ConnectionCheck {
                success: false,
                message: e.to_string(),
            },
        }
    }

    /// Run one incremental pull.
    ///
    /// Always returns a statistics report on a completed run, even when
    /// every record failed (`success == false`, `errors > 0`). A returned
    /// `Err` means the run itself could not proceed (exhausted retries on
    /// a page fetch, permanent vendor error, audit failure) — the audit
    /// transaction is finalized as `failed` either way.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError`] for run-level failures. Per-record failures
    /// are reported in `SyncResult::partial_errors` instead.
    pub async fn pull(
        &self,
        req: &PullRequest,
        store: &dyn EntityStore,
        contracts: &ContractRegistry,
        recorder: &AuditRecorder,
    ) -> Result<SyncResult, SyncError> {
        let txn_id = recorder.start(&TransactionContext {
            correlation_id: ids::new_id(PREFIX_CORRELATION)?,
            organization_id: req.organization_id.clone(),
            kind: TransactionKind::VendorSync,
        })?;
        let run_id = ids::new_id(PREFIX_SYNC_RUN)?;
        recorder.append_line(
            &txn_id,
            AuditLineType::SyncStarted,
            serde_json::json!({
                "run_id": run_id,
                "vendor": normalize::VENDOR,
                "since": req.since,
                "demo_mode": req.demo_mode,
            }),
        )?;

        match self.run(req, store, contracts, recorder, &txn_id).await {
            Ok(mut result) => {
                recorder.append_line(
                    &txn_id,
                    AuditLineType::SyncFinalized,
                    serde_json::to_value(&result.stats).unwrap_or_default(),
                )?;
                let outcome = if result.stats.errors == 0 {
                    TransactionStatus::Success
                } else if result.stats.errors == result.stats.processed {
                    TransactionStatus::Failed
                } else {
                    TransactionStatus::Partial
                };
                recorder.finalize(&txn_id, outcome)?;
                result.transaction_id = txn_id;
                Ok(result)
            }
            Err(e) => {
                recorder.append_line(
                    &txn_id,
                    AuditLineType::Error,
                    serde_json::json!({"error": e.to_string()}),
                )?;
                recorder.finalize(&txn_id, TransactionStatus::Failed)?;
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        req: &PullRequest,
        store: &dyn EntityStore,
        contracts: &ContractRegistry,
        recorder: &AuditRecorder,
        txn_id: &str,
    ) -> Result<SyncResult, SyncError> {
        let mut state = RunState::default();

        let event_pages = if req.demo_mode {
            fixtures::events_pages()
        } else {
            self.fetch_all_event_pages(req, recorder, txn_id).await?
        };
        if req.demo_mode {
            for page in &event_pages {
                recorder.append_line(
                    txn_id,
                    AuditLineType::PageFetched,
                    serde_json::json!({"feed": "events", "count": page.events.len()}),
                )?;
            }
        }

        // Pages are processed strictly in vendor pagination order.
        for page in &event_pages {
            for event in &page.events {
                let normalized = normalize::normalize_event(&req.organization_id, event);
                commit_record(
                    normalized,
                    EntityKind::Event,
                    &event.id,
                    store,
                    contracts,
                    recorder,
                    txn_id,
                    &mut state,
                )?;

                let attendee_pages = if req.demo_mode {
                    let pages = fixtures::attendees_pages(&event.id);
                    for attendee_page in &pages {
                        recorder.append_line(
                            txn_id,
                            AuditLineType::PageFetched,
                            serde_json::json!({
                                "feed": "attendees",
                                "event_id": event.id,
                                "count": attendee_page.attendees.len(),
                            }),
                        )?;
                    }
                    pages
                } else {
                    self.fetch_all_attendee_pages(req, &event.id, recorder, txn_id)
                        .await?
                };
                for attendee_page in &attendee_pages {
                    for attendee in &attendee_page.attendees {
                        let normalized =
                            normalize::normalize_attendee(&req.organization_id, attendee);
                        commit_record(
                            normalized,
                            EntityKind::EventInvite,
                            &attendee.id,
                            store,
                            contracts,
                            recorder,
                            txn_id,
                            &mut state,
                        )?;
                    }
                }
            }
        }

        let cursor = if state.unplaceable_failure {
            req.since
        } else {
            req.since.advanced(&state.succeeded, &state.failed)
        };

        Ok(SyncResult {
            success: state.stats.errors == 0,
            stats: state.stats,
            cursor,
            partial_errors: state.partial_errors,
            transaction_id: String::new(),
        })
    }

    async fn fetch_all_event_pages(
        &self,
        req: &PullRequest,
        recorder: &AuditRecorder,
        txn_id: &str,
    ) -> Result<Vec<EventsPage>, SyncError> {
        let mut pages = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let mut url = format!(
                "{}/organizations/{}/events/?order_by=changed_asc",
                self.base_url, req.organization_id
            );
            if let Some(since) = req.since.last_changed_at {
                url.push_str(&format!(
                    "&changed_since={}",
                    urlencoding::encode(&since.to_rfc3339())
                ));
            }
            if let Some(token) = &continuation {
                url.push_str(&format!("&continuation={}", urlencoding::encode(token)));
            }

            let page: EventsPage = self.fetch_json(&url, &req.credentials.token).await?;
            recorder.append_line(
                txn_id,
                AuditLineType::PageFetched,
                serde_json::json!({"feed": "events", "count": page.events.len()}),
            )?;
            let has_more = page.pagination.has_more_items;
            continuation = page.pagination.continuation.clone();
            pages.push(page);
            if !has_more || continuation.is_none() {
                return Ok(pages);
            }
            tokio::time::sleep(self.retry.page_delay).await;
        }
    }

    async fn fetch_all_attendee_pages(
        &self,
        req: &PullRequest,
        event_id: &str,
        recorder: &AuditRecorder,
        txn_id: &str,
    ) -> Result<Vec<AttendeesPage>, SyncError> {
        let mut pages = Vec::new();
        let mut continuation: Option<String> = None;
        loop {
            let mut url = format!("{}/events/{event_id}/attendees/", self.base_url);
            if let Some(token) = &continuation {
                url.push_str(&format!("?continuation={}", urlencoding::encode(token)));
            }

            let page: AttendeesPage = self.fetch_json(&url, &req.credentials.token).await?;
            recorder.append_line(
                txn_id,
                AuditLineType::PageFetched,
                serde_json::json!({
                    "feed": "attendees",
                    "event_id": event_id,
                    "count": page.attendees.len(),
                }),
            )?;
            let has_more = page.pagination.has_more_items;
            continuation = page.pagination.continuation.clone();
            pages.push(page);
            if !has_more || continuation.is_none() {
                return Ok(pages);
            }
            tokio::time::sleep(self.retry.page_delay).await;
        }
    }

    /// Authenticated GET with the run's retry policy.
    ///
    /// 429 sleeps the advertised `Retry-After`; transient transport errors
    /// back off exponentially; both share `max_attempts`. Any other
    /// non-2xx fails immediately — permanent errors are never retried.
    async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> Result<T, SyncError> {
        let mut attempt: u32 = 1;
        loop {
            let err = match self.http.get(url).bearer_auth(token).send().await {
                Ok(resp) => match check_response(resp).await {
                    Ok(resp) => return Ok(resp.json::<T>().await?),
                    Err(e) => e,
                },
                Err(e) => SyncError::Http(e),
            };

            if !err.is_transient() {
                return Err(err);
            }
            if attempt >= self.retry.max_attempts {
                return Err(SyncError::RetriesExhausted {
                    attempts: attempt,
                    source: Box::new(err),
                });
            }
            let delay = match &err {
                SyncError::RateLimited { retry_after_secs } => {
                    std::time::Duration::from_secs(*retry_after_secs)
                }
                _ => self.retry.backoff_delay(attempt),
            };
            tracing::warn!(url, attempt, delay_secs = delay.as_secs_f64(), error = %err, "transient vendor failure; retrying");
            tokio::time::sleep(delay).await;
            attempt += 1;
        }
    }
}

/// Commit one normalized record: validate, upsert, account for it in the
/// run state. A failure at any step is recorded and the run continues.
#[allow(clippy::too_many_arguments)]
fn commit_record(
    normalized: Result<CanonicalEntity, SyncError>,
    kind: EntityKind,
    provider_id: &str,
    store: &dyn EntityStore,
    contracts: &ContractRegistry,
    recorder: &AuditRecorder,
    txn_id: &str,
    state: &mut RunState,
) -> Result<(), SyncError> {
    state.stats.processed += 1;

    let entity = match normalized {
        Ok(entity) => entity,
        Err(e) => {
            // Normalization failed before a changed_at could be parsed.
            return record_failure(
                kind,
                provider_id,
                None,
                &e.to_string(),
                recorder,
                txn_id,
                state,
            );
        }
    };

    if let Err(message) = validate_entity(contracts, &entity) {
        return record_failure(
            kind,
            provider_id,
            Some(entity.changed_at),
            &message,
            recorder,
            txn_id,
            state,
        );
    }

    match store.upsert(&entity) {
        Ok(outcome) => {
            match outcome {
                UpsertOutcome::Created => state.stats.created += 1,
                UpsertOutcome::Updated => state.stats.updated += 1,
                UpsertOutcome::Skipped => state.stats.skipped += 1,
            }
            state.succeeded.push(entity.changed_at);
            let idempotency_key =
                normalize::idempotency_key(&entity.organization_id, kind, provider_id, "upsert");
            recorder.append_line(
                txn_id,
                AuditLineType::RecordCommitted,
                serde_json::json!({
                    "kind": kind,
                    "entity_code": entity.entity_code,
                    "smart_code": entity.smart_code,
                    "idempotency_key": idempotency_key,
                    "outcome": match outcome {
                        UpsertOutcome::Created => "created",
                        UpsertOutcome::Updated => "updated",
                        UpsertOutcome::Skipped => "skipped",
                    },
                }),
            )?;
            Ok(())
        }
        Err(e) => record_failure(
            kind,
            provider_id,
            Some(entity.changed_at),
            &e.to_string(),
            recorder,
            txn_id,
            state,
        ),
    }
}

/// Record one failed record without aborting the run. The failure pins
/// the cursor: a placeable failure holds it at that record's `changed_at`,
/// an unplaceable one holds it at the incoming watermark.
fn record_failure(
    kind: EntityKind,
    provider_id: &str,
    changed_at: Option<DateTime<Utc>>,
    message: &str,
    recorder: &AuditRecorder,
    txn_id: &str,
    state: &mut RunState,
) -> Result<(), SyncError> {
    tracing::warn!(
        kind = %kind,
        provider_id,
        message,
        "record failed; continuing run"
    );
    state.stats.errors += 1;
    state.partial_errors.push(RecordError {
        record_kind: kind,
        provider_id: provider_id.to_string(),
        message: message.to_string(),
    });
    match changed_at {
        Some(ts) => state.failed.push(ts),
        None => state.unplaceable_failure = true,
    }
    recorder.append_line(
        txn_id,
        AuditLineType::RecordError,
        serde_json::json!({
            "kind": kind,
            "provider_id": provider_id,
            "error": message,
        }),
    )?;
    Ok(())
}

/// Validate one canonical entity against its entity-level contract and
/// every attribute group's contract. Returns a combined violation message
/// naming every offending path, or `Ok(())`.
fn validate_entity(contracts: &ContractRegistry, entity: &CanonicalEntity) -> Result<(), String> {
    let mut violations: Vec<String> = Vec::new();

    let value = serde_json::to_value(entity).map_err(|e| e.to_string())?;
    match contracts.report(contract_for_kind(entity.entity_type), &value) {
        Ok(report) => {
            violations.extend(
                report
                    .violations
                    .into_iter()
                    .map(|v| format!("{}: {}", v.path, v.message)),
            );
        }
        Err(e) => violations.push(e.to_string()),
    }

    for (key, payload) in &entity.attributes {
        let Some(contract) = contract_for_group(key) else {
            violations.push(format!("unknown attribute group '{key}'"));
            continue;
        };
        match contracts.report(contract, payload) {
            Ok(report) => violations.extend(
                report
                    .violations
                    .into_iter()
                    .map(|v| format!("{key}{}: {}", v.path, v.message)),
            ),
            Err(e) => violations.push(e.to_string()),
        }
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations.join("; "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relay_core::enums::CanonicalStatus;

    fn contracts() -> ContractRegistry {
        ContractRegistry::new().unwrap()
    }

    #[test]
    fn validate_entity_accepts_normalized_fixture_records() {
        let reg = contracts();
        for page in fixtures::events_pages() {
            for event in &page.events {
                let entity = normalize::normalize_event("org-1", event).unwrap();
                assert_eq!(validate_entity(&reg, &entity), Ok(()));
            }
        }
    }

    #[test]
    fn validate_entity_names_offending_group_path() {
        let reg = contracts();
        let page = &fixtures::events_pages()[0];
        let mut entity = normalize::normalize_event("org-1", &page.events[0]).unwrap();
        // Corrupt the meta group: drop a required field.
        let meta = entity
            .attributes
            .get_mut(relay_core::entities::ATTR_EVENT_META_V1)
            .unwrap();
        meta.as_object_mut().unwrap().remove("title");
        let message = validate_entity(&reg, &entity).unwrap_err();
        assert!(message.contains("title"), "got: {message}");
        assert!(message.contains(relay_core::entities::ATTR_EVENT_META_V1));
    }

    #[test]
    fn validate_entity_rejects_unregistered_group() {
        let reg = contracts();
        let page = &fixtures::events_pages()[0];
        let mut entity = normalize::normalize_event("org-1", &page.events[0]).unwrap();
        entity
            .attributes
            .insert("EVENT.ROGUE.v1".into(), serde_json::json!({}));
        let message = validate_entity(&reg, &entity).unwrap_err();
        assert!(message.contains("EVENT.ROGUE.v1"));
    }

    #[test]
    fn fixture_statuses_map_to_expected_canonical() {
        let statuses: Vec<CanonicalStatus> = fixtures::events_pages()
            .iter()
            .flat_map(|p| p.events.iter())
            .map(|e| normalize::normalize_event("org-1", e).unwrap().status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                CanonicalStatus::Live,
                CanonicalStatus::Completed,
                CanonicalStatus::Draft
            ]
        );
    }
}
