//! # relay-router
//!
//! Configuration-driven message router: resolves an inbound message to an
//! intent through an ordered provider chain with cost guardrails, runs the
//! intent's configured tools, and always sends exactly one response.
//!
//! Routing state machine per message:
//! `Received -> ConfigLoaded | NoConfig -> GuardrailCheck ->
//! (per provider: Attempting -> Succeeded | Failed(classified)) ->
//! Responding -> Completed`.
//!
//! Entry point: [`Router::route`].

pub mod error;
pub mod guardrails;
pub mod outbound;
pub mod provider;
pub mod rules;
pub mod tools;

use std::sync::Arc;
use std::time::Duration;

use relay_audit::{AuditRecorder, TransactionContext};
use relay_config::{ConfigLoader, GeneralConfig};
use relay_core::config::{KeywordRules, PromptPack};
use relay_core::enums::{AuditLineType, FailureClass, TransactionKind, TransactionStatus};
use relay_core::ids::{self, PREFIX_MESSAGE};
use relay_core::routing::{ProviderSpec, RoutingPolicy};

pub use error::RouteError;
use guardrails::{CostLedger, check_guardrails};
use outbound::OutboundChannel;
use provider::{Provider, ProviderFailure, ProviderInput, ProviderOutcome, ProviderRegistry};
use rules::{RULES_PROVIDER, RuleBasedProvider};
use tools::ToolDispatcher;

/// Sent when an organization has no usable configuration and no prompt
/// pack to say so in its own words.
const DEFAULT_UNAVAILABLE: &str =
    "This service is temporarily unavailable. Please try again later.";
/// Sent when no provider produced a usable reply.
const DEFAULT_CLARIFY: &str = "Sorry, I didn't quite get that. Could you rephrase?";

/// One inbound channel message.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InboundMessage {
    pub organization_id: String,
    /// Channel-native message identifier.
    pub message_id: String,
    /// Channel-native sender; also the response recipient.
    pub sender_id: String,
    pub text: String,
    pub correlation_id: String,
}

/// Terminal result of routing one message.
#[derive(Debug, Clone, serde::Serialize)]
pub struct RouteOutcome {
    /// True when a provider attempt succeeded end to end.
    pub success: bool,
    pub provider_used: Option<String>,
    pub confidence: f64,
    pub intent: Option<String>,
    pub cost_usd: f64,
    /// Populated on every non-success path; the sender still got a
    /// response.
    pub error: Option<String>,
    /// Audit transaction covering this message.
    pub transaction_id: String,
}

impl RouteOutcome {
    fn failed(error: String) -> Self {
        Self {
            success: false,
            provider_used: None,
            confidence: 0.0,
            intent: None,
            cost_usd: 0.0,
            error: Some(error),
            transaction_id: String::new(),
        }
    }
}

/// Message router over per-organization configuration.
pub struct Router {
    config: Arc<ConfigLoader>,
    providers: ProviderRegistry,
    tools: ToolDispatcher,
    ledger: Arc<dyn CostLedger>,
    outbound: Arc<dyn OutboundChannel>,
    general: GeneralConfig,
}

impl Router {
    #[must_use]
    pub fn new(
        config: Arc<ConfigLoader>,
        providers: ProviderRegistry,
        tools: ToolDispatcher,
        ledger: Arc<dyn CostLedger>,
        outbound: Arc<dyn OutboundChannel>,
        general: GeneralConfig,
    ) -> Self {
        Self {
            config,
            providers,
            tools,
            ledger,
            outbound,
            general,
        }
    }

    /// Route one inbound message.
    ///
    /// Every path through this function sends exactly one outbound
    /// message and finalizes exactly one audit transaction. Failures the
    /// provider chain absorbs are reported in the outcome's `error`
    /// field; a returned `Err` means routing infrastructure itself broke
    /// (config backend, audit recording, outbound delivery).
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] for infrastructure failures only.
    pub async fn route(
        &self,
        msg: &InboundMessage,
        recorder: &AuditRecorder,
    ) -> Result<RouteOutcome, RouteError> {
        let txn_id = recorder.start(&TransactionContext {
            correlation_id: msg.correlation_id.clone(),
            organization_id: msg.organization_id.clone(),
            kind: TransactionKind::InboundMessage,
        })?;
        recorder.append_line(
            &txn_id,
            AuditLineType::MessageReceived,
            serde_json::json!({
                "message_id": msg.message_id,
                "sender_id": msg.sender_id,
                "text": msg.text,
            }),
        )?;

        match self.run(msg, recorder, &txn_id).await {
            Ok((mut outcome, status)) => {
                recorder.finalize(&txn_id, status)?;
                outcome.transaction_id = txn_id;
                Ok(outcome)
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
        msg: &InboundMessage,
        recorder: &AuditRecorder,
        txn_id: &str,
    ) -> Result<(RouteOutcome, TransactionStatus), RouteError> {
        let org = &msg.organization_id;
        let channel = self.config.channel_config(org)?;
        let policy = self.config.routing_policy(org)?;
        let prompts = self.config.prompt_pack(org)?.unwrap_or_else(|| PromptPack {
            system: String::new(),
            clarify: DEFAULT_CLARIFY.to_string(),
            unavailable: DEFAULT_UNAVAILABLE.to_string(),
        });

        let usable = matches!(&channel, Some(c) if c.enabled) && policy.is_some();
        let Some(policy) = policy.filter(|_| usable) else {
            let error = RouteError::ConfigurationMissing {
                organization_id: org.clone(),
            };
            tracing::warn!(organization_id = %org, "no usable routing configuration");
            self.respond(msg, &prompts.unavailable, recorder, txn_id)
                .await?;
            return Ok((RouteOutcome::failed(error.to_string()), TransactionStatus::NoConfig));
        };
        // A channel binding with no language falls back to the runtime
        // default.
        let language = match channel {
            Some(c) if !c.language.is_empty() => c.language,
            _ => self.general.default_language.clone(),
        };

        let decision = check_guardrails(self.ledger.as_ref(), &policy, org).await;
        recorder.append_line(
            txn_id,
            AuditLineType::GuardrailCheck,
            serde_json::json!({
                "allowed": decision.allowed,
                "reason": decision.reason,
                "spent_today_usd": decision.spent_today_usd,
            }),
        )?;

        let rules = self.config.keyword_rules(org)?.unwrap_or_default();
        let input = ProviderInput {
            organization_id: org.clone(),
            text: msg.text.clone(),
            system_prompt: prompts.system.clone(),
            language,
        };

        // Providers are attempted strictly in ascending priority. A
        // guardrail block is a routing decision, not an error: the chain
        // collapses to the single zero-cost provider.
        let mut excluded: Vec<String> = Vec::new();
        let forced_free = !decision.allowed;
        loop {
            let spec = if forced_free {
                policy.free_provider()
            } else {
                policy.next_provider(&excluded)
            };
            let Some(spec) = spec else { break };

            recorder.append_line(
                txn_id,
                AuditLineType::ProviderSelected,
                serde_json::json!({
                    "provider": spec.name,
                    "priority": spec.priority,
                    "forced_by_guardrail": forced_free,
                }),
            )?;

            match self.attempt(spec, &policy, &input, &rules).await {
                Ok(outcome) => {
                    return self
                        .complete_success(msg, spec, outcome, &prompts, recorder, txn_id)
                        .await;
                }
                Err(failure) => {
                    tracing::warn!(
                        provider = %spec.name,
                        class = %failure.class,
                        error = %failure.message,
                        "provider attempt failed"
                    );
                    recorder.append_line(
                        txn_id,
                        AuditLineType::ProviderFailed,
                        serde_json::json!({
                            "provider": spec.name,
                            "class": failure.class,
                            "error": failure.message,
                        }),
                    )?;

                    if !forced_free && spec.triggers_fallback(failure.class) {
                        excluded.push(spec.name.clone());
                        continue;
                    }
                    if forced_free {
                        // The last resort itself failed; nothing else may
                        // spend money.
                        break;
                    }
                    // Unconfigured failure class: a real bug must not be
                    // masked as "try the next one".
                    let error = RouteError::Provider {
                        provider: spec.name.clone(),
                        class: failure.class,
                        message: failure.message,
                    };
                    self.respond(msg, &prompts.clarify, recorder, txn_id).await?;
                    return Ok((
                        RouteOutcome::failed(error.to_string()),
                        TransactionStatus::Failed,
                    ));
                }
            }
        }

        // Soft terminal failure: the system still responds.
        self.respond(msg, &prompts.clarify, recorder, txn_id).await?;
        Ok((
            RouteOutcome::failed(RouteError::AllProvidersExhausted.to_string()),
            TransactionStatus::Partial,
        ))
    }

    /// Run one provider attempt under the policy's hard timeout.
    async fn attempt(
        &self,
        spec: &ProviderSpec,
        policy: &RoutingPolicy,
        input: &ProviderInput,
        rules: &KeywordRules,
    ) -> Result<ProviderOutcome, ProviderFailure> {
        // The rule provider is built per request from the organization's
        // own rule table; everything else comes from the static registry.
        let provider: Arc<dyn Provider> = if spec.name == RULES_PROVIDER {
            Arc::new(RuleBasedProvider::new(rules.clone()))
        } else {
            self.providers.get(&spec.name).ok_or_else(|| {
                ProviderFailure::new(FailureClass::ServerError, "provider not registered")
            })?
        };

        let budget = Duration::from_millis(spec.timeout_ms);
        let outcome = match tokio::time::timeout(budget, provider.infer(input)).await {
            Err(_) => {
                return Err(ProviderFailure::new(
                    FailureClass::Timeout,
                    format!("attempt exceeded {}ms", spec.timeout_ms),
                ));
            }
            Ok(Err(failure)) => return Err(failure),
            Ok(Ok(outcome)) => outcome,
        };

        if outcome.cost_usd > policy.per_message_cost_cap_usd {
            return Err(ProviderFailure::new(
                FailureClass::GuardrailViolation,
                format!(
                    "attempt cost {:.4} exceeds per-message cap {:.4} USD",
                    outcome.cost_usd, policy.per_message_cost_cap_usd
                ),
            ));
        }
        Ok(outcome)
    }

    async fn complete_success(
        &self,
        msg: &InboundMessage,
        spec: &ProviderSpec,
        outcome: ProviderOutcome,
        prompts: &PromptPack,
        recorder: &AuditRecorder,
        txn_id: &str,
    ) -> Result<(RouteOutcome, TransactionStatus), RouteError> {
        if outcome.cost_usd > 0.0 {
            if let Err(message) = self
                .ledger
                .record(&msg.organization_id, outcome.cost_usd)
                .await
            {
                tracing::warn!(error = %message, "cost ledger write failed");
            }
        }
        recorder.append_line(
            txn_id,
            AuditLineType::ProviderSucceeded,
            serde_json::json!({
                "provider": spec.name,
                "intent": outcome.intent,
                "confidence": outcome.confidence,
                "cost_usd": outcome.cost_usd,
            }),
        )?;

        if let Some(intent) = &outcome.intent {
            let tool_map = self
                .config
                .tool_map(&msg.organization_id)?
                .unwrap_or_default();
            let payload = serde_json::json!({
                "message_id": msg.message_id,
                "sender_id": msg.sender_id,
                "text": msg.text,
            });
            self.tools
                .dispatch(
                    &msg.organization_id,
                    intent,
                    &tool_map,
                    &payload,
                    recorder,
                    txn_id,
                )
                .await?;
        }

        let reply = outcome.reply.clone().unwrap_or_else(|| prompts.clarify.clone());
        self.respond(msg, &reply, recorder, txn_id).await?;

        Ok((
            RouteOutcome {
                success: true,
                provider_used: Some(spec.name.clone()),
                confidence: outcome.confidence,
                intent: outcome.intent,
                cost_usd: outcome.cost_usd,
                error: None,
                transaction_id: String::new(),
            },
            TransactionStatus::Success,
        ))
    }

    /// Deliver the single response message and audit it.
    async fn respond(
        &self,
        msg: &InboundMessage,
        text: &str,
        recorder: &AuditRecorder,
        txn_id: &str,
    ) -> Result<(), RouteError> {
        let message_id = ids::new_id(PREFIX_MESSAGE)?;
        self.outbound
            .send(&msg.organization_id, &msg.sender_id, text)
            .await
            .map_err(RouteError::Outbound)?;
        recorder.append_line(
            txn_id,
            AuditLineType::MessageSent,
            serde_json::json!({
                "message_id": message_id,
                "recipient": msg.sender_id,
                "text": text,
            }),
        )?;
        Ok(())
    }
}
