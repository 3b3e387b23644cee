use crate::errors::{AppError, ResultExt};
use crate::handlers::{json_body, lead_document, AppState};
use crate::integrations::search::{CONVERSATIONS_INDEX, LEADS_INDEX};
use crate::integrations::slack;
use crate::models::{clean, Lead, LeadSubmission, WebhookEvent, WebhookQuery, WebhookResponse};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;
use uuid::Uuid;

/// Chat-widget webhook handler.
///
/// Receives conversation events for one client site (`?client=`). Known event
/// types are indexed for analytics; qualified leads are also announced to the
/// team and sent an SMS follow-up. Unknown event types are logged and
/// acknowledged so the sender does not retry them.
pub async fn webhook(
    State(state): State<Arc<AppState>>,
    query: Result<Query<WebhookQuery>, QueryRejection>,
    payload: Result<Json<WebhookEvent>, JsonRejection>,
) -> Result<Json<WebhookResponse>, AppError> {
    let Query(query) = query.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let client = clean(query.client)
        .ok_or_else(|| AppError::BadRequest("Missing client parameter".to_string()))?;
    let event = json_body(payload)?;

    tracing::info!(
        "Received webhook event '{}' for client {}",
        event.event_type,
        client
    );

    match event.event_type.as_str() {
        "message_received" => handle_message_received(&state, &client, &event).await?,
        "conversation_ended" => handle_conversation_ended(&state, &client, &event).await?,
        "lead_qualified" => handle_lead_qualified(&state, &client, &event).await?,
        other => {
            tracing::info!("Ignoring unhandled webhook event '{}'", other);
            return Ok(Json(WebhookResponse {
                success: true,
                event: None,
            }));
        }
    }

    Ok(Json(WebhookResponse {
        success: true,
        event: Some(event.event_type),
    }))
}

async fn handle_message_received(
    state: &AppState,
    client: &str,
    event: &WebhookEvent,
) -> Result<(), AppError> {
    let id = string_field(event, "message_id").unwrap_or_else(|| Uuid::new_v4().to_string());
    tracing::debug!(
        "Message {} in conversation {:?}",
        id,
        string_field(event, "conversation_id")
    );

    state
        .search
        .index_document(CONVERSATIONS_INDEX, &id, &event_document(client, event))
        .await
        .with_context(|| format!("Failed to index message {}", id))
}

async fn handle_conversation_ended(
    state: &AppState,
    client: &str,
    event: &WebhookEvent,
) -> Result<(), AppError> {
    let id = string_field(event, "conversation_id")
        .map(|c| format!("{}-ended", c))
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    if let Some(duration) = event.data.get("duration").and_then(Value::as_f64) {
        tracing::info!("Conversation {} ended after {}s", id, duration);
    }

    state
        .search
        .index_document(CONVERSATIONS_INDEX, &id, &event_document(client, event))
        .await
        .context("Failed to index ended conversation")
}

/// A chat conversation produced a qualified lead: score it, tell the team,
/// send the SMS follow-up and index it alongside form-captured leads.
async fn handle_lead_qualified(
    state: &AppState,
    client: &str,
    event: &WebhookEvent,
) -> Result<(), AppError> {
    let submission: LeadSubmission = match event.data.get("lead") {
        Some(value) => serde_json::from_value(value.clone())
            .map_err(|e| AppError::BadRequest(format!("Invalid lead object: {}", e)))?,
        None => {
            return Err(AppError::BadRequest(
                "lead_qualified event requires a lead object".to_string(),
            ))
        }
    };
    let lead = Lead::from_submission(submission, None);
    let lead_id = string_field(event, "lead_id").unwrap_or_else(|| Uuid::new_v4().to_string());

    tracing::info!(
        "Qualified lead {} for client {} (score {})",
        lead_id,
        client,
        lead.lead_score
    );

    state.notifier.notify_in_background(slack::lead_message(
        "✅ Lead qualified in chat",
        &lead,
        Some(&format!("client `{}`", client)),
    ));

    if let Some(phone) = &lead.phone {
        let body = format!(
            "Hi {}, thanks for chatting with us! We'll reach out shortly to book your tint appointment.",
            lead.split_name().0
        );
        if let Err(e) = state.sms.send(phone, &body).await {
            tracing::warn!("SMS follow-up skipped for lead {}: {}", lead_id, e);
        }
    }

    let document = lead_document(&lead, &lead_id, Some(client))?;
    state
        .search
        .index_document(LEADS_INDEX, &lead_id, &document)
        .await
        .context("Failed to index qualified lead")
}

fn event_document(client: &str, event: &WebhookEvent) -> Value {
    let mut document = json!(event.data);
    if let Some(fields) = document.as_object_mut() {
        fields.insert("eventType".to_string(), json!(event.event_type));
        fields.insert("client".to_string(), json!(client));
        fields.insert("receivedAt".to_string(), json!(Utc::now().to_rfc3339()));
    }
    document
}

/// Reads a string-or-number field from the event payload.
fn string_field(event: &WebhookEvent, key: &str) -> Option<String> {
    match event.data.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
