//! Cost guardrails.
//!
//! The daily cap is summed from a [`CostLedger`]. A ledger outage must not
//! take down all traffic, so a failed query fails open: the attempt is
//! allowed and the failure is logged and audited.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use relay_core::routing::RoutingPolicy;

/// Recorded provider spend, per organization per day.
#[async_trait]
pub trait CostLedger: Send + Sync {
    /// Total spend recorded for this organization today, in USD.
    ///
    /// # Errors
    ///
    /// Returns a backend-specific message on query failure; the caller
    /// fails open.
    async fn spent_today(&self, organization_id: &str) -> Result<f64, String>;

    /// Record one attempt's spend.
    ///
    /// # Errors
    ///
    /// Returns a backend-specific message on write failure.
    async fn record(&self, organization_id: &str, cost_usd: f64) -> Result<(), String>;
}

/// Outcome of a guardrail check. Blocking is a routing decision, not an
/// error: a blocked message is still answered by the free provider.
#[derive(Debug, Clone, PartialEq)]
pub struct GuardrailDecision {
    pub allowed: bool,
    pub reason: Option<String>,
    /// Spend the decision was based on, when the ledger answered.
    pub spent_today_usd: Option<f64>,
}

impl GuardrailDecision {
    fn allow(spent: Option<f64>) -> Self {
        Self {
            allowed: true,
            reason: None,
            spent_today_usd: spent,
        }
    }
}

/// Check the daily cap for one organization.
pub async fn check_guardrails(
    ledger: &dyn CostLedger,
    policy: &RoutingPolicy,
    organization_id: &str,
) -> GuardrailDecision {
    match ledger.spent_today(organization_id).await {
        Ok(spent) if spent >= policy.daily_cost_cap_usd => GuardrailDecision {
            allowed: false,
            reason: Some(format!(
                "daily cost cap reached: {spent:.4} >= {:.4} USD",
                policy.daily_cost_cap_usd
            )),
            spent_today_usd: Some(spent),
        },
        Ok(spent) => GuardrailDecision::allow(Some(spent)),
        Err(message) => {
            // Fail open: a monitoring outage must not block all traffic.
            tracing::warn!(
                organization_id,
                error = %message,
                "cost ledger query failed; allowing attempt"
            );
            GuardrailDecision::allow(None)
        }
    }
}

/// In-memory cost ledger for tests and demos.
#[derive(Default)]
pub struct InMemoryCostLedger {
    spend: Mutex<HashMap<String, f64>>,
}

impl InMemoryCostLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed today's spend for an organization.
    pub fn seed(&self, organization_id: &str, spent_usd: f64) {
        if let Ok(mut spend) = self.spend.lock() {
            spend.insert(organization_id.to_string(), spent_usd);
        }
    }
}

#[async_trait]
impl CostLedger for InMemoryCostLedger {
    async fn spent_today(&self, organization_id: &str) -> Result<f64, String> {
        Ok(self
            .spend
            .lock()
            .map_err(|_| "ledger lock poisoned".to_string())?
            .get(organization_id)
            .copied()
            .unwrap_or(0.0))
    }

    async fn record(&self, organization_id: &str, cost_usd: f64) -> Result<(), String> {
        let mut spend = self
            .spend
            .lock()
            .map_err(|_| "ledger lock poisoned".to_string())?;
        *spend.entry(organization_id.to_string()).or_insert(0.0) += cost_usd;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn policy(daily_cap: f64) -> RoutingPolicy {
        RoutingPolicy {
            providers: vec![],
            daily_cost_cap_usd: daily_cap,
            per_message_cost_cap_usd: 0.25,
        }
    }

    #[tokio::test]
    async fn under_cap_allows() {
        let ledger = InMemoryCostLedger::new();
        ledger.seed("org-1", 4.0);
        let decision = check_guardrails(&ledger, &policy(10.0), "org-1").await;
        assert!(decision.allowed);
        assert_eq!(decision.spent_today_usd, Some(4.0));
    }

    #[tokio::test]
    async fn at_cap_blocks() {
        let ledger = InMemoryCostLedger::new();
        ledger.seed("org-1", 10.0);
        let decision = check_guardrails(&ledger, &policy(10.0), "org-1").await;
        assert!(!decision.allowed);
        assert!(decision.reason.unwrap().contains("daily cost cap"));
    }

    #[tokio::test]
    async fn ledger_failure_fails_open() {
        struct BrokenLedger;

        #[async_trait]
        impl CostLedger for BrokenLedger {
            async fn spent_today(&self, _organization_id: &str) -> Result<f64, String> {
                Err("connection refused".into())
            }
            async fn record(&self, _organization_id: &str, _cost_usd: f64) -> Result<(), String> {
                Err("connection refused".into())
            }
        }

        let decision = check_guardrails(&BrokenLedger, &policy(10.0), "org-1").await;
        assert!(decision.allowed);
        assert_eq!(decision.spent_today_usd, None);
    }

    #[tokio::test]
    async fn record_accumulates() {
        let ledger = InMemoryCostLedger::new();
        ledger.record("org-1", 0.10).await.unwrap();
        ledger.record("org-1", 0.15).await.unwrap();
        let spent = ledger.spent_today("org-1").await.unwrap();
        assert!((spent - 0.25).abs() < 1e-9);
    }
}
