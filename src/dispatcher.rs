//! Automation fan-out.
//!
//! One lead goes to every integration the client configured, plus the team
//! notification. All calls start together and are joined with an all-settle
//! barrier: a failing adapter is recorded and logged but never cancels or
//! delays its siblings, and never fails the dispatch itself.

use crate::errors::AppError;
use crate::integrations::{
    scheduling_link, slack, zapier, HubSpotClient, SlackNotifier, ZapierClient,
};
use crate::models::{IntegrationConfig, Lead};
use futures::future::{join_all, BoxFuture, FutureExt};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    HubSpot,
    Zapier,
    Calendly,
    Notification,
}

impl fmt::Display for AdapterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AdapterKind::HubSpot => "hubspot",
            AdapterKind::Zapier => "zapier",
            AdapterKind::Calendly => "calendly",
            AdapterKind::Notification => "notification",
        };
        f.write_str(name)
    }
}

/// How one adapter call settled.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Settlement {
    Fulfilled {
        #[serde(skip_serializing_if = "Option::is_none")]
        detail: Option<String>,
    },
    Rejected {
        reason: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AutomationResult {
    pub adapter: AdapterKind,
    #[serde(flatten)]
    pub settlement: Settlement,
}

impl AutomationResult {
    pub fn is_fulfilled(&self) -> bool {
        matches!(self.settlement, Settlement::Fulfilled { .. })
    }
}

/// Aggregate outcome of one dispatch.
#[derive(Debug, Clone)]
pub struct DispatchReport {
    /// Number of adapters that settled successfully.
    pub triggered: usize,
    /// One entry per launched adapter, in launch order.
    pub outcomes: Vec<AutomationResult>,
}

impl DispatchReport {
    /// Number of adapters that were launched.
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }
}

type AdapterCall<'a> = BoxFuture<'a, Result<Option<String>, AppError>>;

#[derive(Clone)]
pub struct AutomationDispatcher {
    hubspot: HubSpotClient,
    zapier: ZapierClient,
    notifier: SlackNotifier,
    calendly_base_url: String,
}

impl AutomationDispatcher {
    pub fn new(
        hubspot: HubSpotClient,
        zapier: ZapierClient,
        notifier: SlackNotifier,
        calendly_base_url: impl Into<String>,
    ) -> Self {
        Self {
            hubspot,
            zapier,
            notifier,
            calendly_base_url: calendly_base_url.into(),
        }
    }

    /// Runs every configured automation for `lead` and waits for all of them
    /// to settle.
    pub async fn dispatch(
        &self,
        lead: &Lead,
        client_id: &str,
        lead_id: &str,
        integrations: &IntegrationConfig,
    ) -> DispatchReport {
        let mut calls: Vec<(AdapterKind, AdapterCall<'_>)> = Vec::new();

        if let Some(api_key) = integrations.hubspot_api_key() {
            calls.push((
                AdapterKind::HubSpot,
                async move { self.hubspot.create_contact(api_key, lead).await.map(Some) }
                    .boxed(),
            ));
        }

        if let Some(webhook_url) = integrations.zapier_webhook_url() {
            let payload = zapier::flatten_lead(lead, client_id, lead_id);
            calls.push((
                AdapterKind::Zapier,
                async move {
                    self.zapier
                        .send(webhook_url, &payload)
                        .await
                        .map(|_| None::<String>)
                }
                .boxed(),
            ));
        }

        if let Some(username) = integrations.calendly_username() {
            let base_url = self.calendly_base_url.as_str();
            calls.push((
                AdapterKind::Calendly,
                async move { scheduling_link(base_url, username, lead).map(Some) }.boxed(),
            ));
        }

        // Unconditional; the notifier swallows its own failures.
        let message = slack::lead_message(
            "⚡ Automation triggered",
            lead,
            Some(&format!("client `{}` · lead `{}`", client_id, lead_id)),
        );
        calls.push((
            AdapterKind::Notification,
            async move {
                let delivered = self.notifier.notify(&message).await;
                let detail = if delivered { "delivered" } else { "not delivered" };
                Ok::<_, AppError>(Some(detail.to_string()))
            }
            .boxed(),
        ));

        let (kinds, pending): (Vec<_>, Vec<_>) = calls.into_iter().unzip();
        tracing::info!(
            "Dispatching {} automation(s) for client {}",
            kinds.len(),
            client_id
        );

        let settled = join_all(pending).await;

        let outcomes: Vec<AutomationResult> = kinds
            .into_iter()
            .zip(settled)
            .enumerate()
            .map(|(index, (adapter, result))| {
                let settlement = match result {
                    Ok(detail) => Settlement::Fulfilled { detail },
                    Err(e) => {
                        tracing::warn!("Automation {} ({}) failed: {}", index, adapter, e);
                        Settlement::Rejected {
                            reason: e.to_string(),
                        }
                    }
                };
                AutomationResult {
                    adapter,
                    settlement,
                }
            })
            .collect();

        let triggered = outcomes.iter().filter(|o| o.is_fulfilled()).count();
        tracing::info!(
            "Automations settled for lead {}: {}/{} succeeded",
            lead_id,
            triggered,
            outcomes.len()
        );

        DispatchReport {
            triggered,
            outcomes,
        }
    }
}
