//! Intent → tool dispatch.
//!
//! Once an intent is resolved, its configured tools run in order. Tool
//! failures are isolated: one failing tool is reported and the rest of
//! the sequence still runs, mirroring the per-record isolation of the
//! sync engine.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use relay_audit::AuditRecorder;
use relay_core::config::ToolMap;
use relay_core::enums::AuditLineType;

use crate::error::RouteError;

/// One invocable business action.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    /// Run the tool for one organization and message.
    ///
    /// # Errors
    ///
    /// Returns a tool-specific message; the dispatcher isolates it.
    async fn invoke(
        &self,
        organization_id: &str,
        payload: &serde_json::Value,
    ) -> Result<serde_json::Value, String>;
}

/// Result of one tool invocation within a dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolReport {
    pub tool: String,
    pub success: bool,
    /// What the tool produced, on success.
    pub data: Option<serde_json::Value>,
    pub message: Option<String>,
}

/// Name → implementation lookup plus dispatch.
#[derive(Default, Clone)]
pub struct ToolDispatcher {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    /// Run every tool mapped to `intent`, in configured order.
    ///
    /// An intent with no mapping is a valid terminal state (FAQ-only
    /// intents run no tools) and is audited as such. A missing
    /// implementation or a failing tool is reported and never aborts the
    /// rest of the sequence.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Audit`] only when audit recording fails.
    pub async fn dispatch(
        &self,
        organization_id: &str,
        intent: &str,
        tool_map: &ToolMap,
        payload: &serde_json::Value,
        recorder: &AuditRecorder,
        txn_id: &str,
    ) -> Result<Vec<ToolReport>, RouteError> {
        let tool_names = tool_map.tools_for(intent);
        if tool_names.is_empty() {
            recorder.append_line(
                txn_id,
                AuditLineType::NoToolsMapped,
                serde_json::json!({"intent": intent}),
            )?;
            return Ok(Vec::new());
        }

        let mut reports = Vec::with_capacity(tool_names.len());
        for name in tool_names {
            let report = match self.tools.get(name) {
                None => {
                    tracing::warn!(intent, tool = %name, "configured tool has no implementation");
                    ToolReport {
                        tool: name.clone(),
                        success: false,
                        data: None,
                        message: Some("not registered".into()),
                    }
                }
                Some(tool) => match tool.invoke(organization_id, payload).await {
                    Ok(data) => ToolReport {
                        tool: name.clone(),
                        success: true,
                        data: Some(data),
                        message: None,
                    },
                    Err(message) => {
                        tracing::warn!(intent, tool = %name, error = %message, "tool failed; continuing");
                        ToolReport {
                            tool: name.clone(),
                            success: false,
                            data: None,
                            message: Some(message),
                        }
                    }
                },
            };
            recorder.append_line(
                txn_id,
                AuditLineType::ToolCalled,
                serde_json::json!({
                    "intent": intent,
                    "tool": report.tool,
                    "success": report.success,
                    "data": report.data,
                    "error": report.message,
                }),
            )?;
            reports.push(report);
        }
        Ok(reports)
    }
}

/// Tool that records its invocations, for tests and demos.
pub struct RecordingTool {
    name: String,
    fail_with: Option<String>,
    calls: Mutex<u32>,
}

impl RecordingTool {
    #[must_use]
    pub fn succeeding(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_with: None,
            calls: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn failing(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            fail_with: Some(message.to_string()),
            calls: Mutex::new(0),
        }
    }

    #[must_use]
    pub fn calls(&self) -> u32 {
        self.calls.lock().map(|c| *c).unwrap_or(0)
    }
}

#[async_trait]
impl Tool for RecordingTool {
    fn name(&self) -> &str {
        &self.name
    }

    async fn invoke(
        &self,
        _organization_id: &str,
        _payload: &serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        if let Ok(mut calls) = self.calls.lock() {
            *calls += 1;
        }
        match &self.fail_with {
            Some(message) => Err(message.clone()),
            None => Ok(serde_json::json!({"ok": true})),
        }
    }
}
