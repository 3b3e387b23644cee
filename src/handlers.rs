use crate::config::Config;
use crate::dispatcher::AutomationDispatcher;
use crate::errors::{AppError, ResultExt};
use crate::integrations::search::{LEADS_INDEX, SUBSCRIBERS_INDEX};
use crate::integrations::{
    http_client, slack, HubSpotClient, SearchClient, SlackNotifier, SmsSender, ZapierClient,
};
use crate::models::*;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use regex::Regex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Shared application state injected into handlers.
///
/// Every outbound client is built here from [`Config`], so tests can point
/// them at local doubles by adjusting the base URLs.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Search/analytics index for leads, subscribers and conversations.
    pub search: SearchClient,
    /// Team notifications (best-effort).
    pub notifier: SlackNotifier,
    /// SMS follow-ups (stub).
    pub sms: SmsSender,
    /// Fan-out for `trigger-automation`.
    pub dispatcher: AutomationDispatcher,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, AppError> {
        let client = http_client(Duration::from_secs(config.outbound_timeout_secs))?;
        let notifier = SlackNotifier::new(client.clone(), config.slack_webhook_url.clone());

        let dispatcher = AutomationDispatcher::new(
            HubSpotClient::new(client.clone(), config.hubspot_base_url.clone()),
            ZapierClient::new(client.clone()),
            notifier.clone(),
            config.calendly_base_url.clone(),
        );

        Ok(Self {
            search: SearchClient::new(client, &config),
            notifier,
            sms: SmsSender::new(),
            dispatcher,
            config,
        })
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Fallback for any method other than POST on the `/api/*` routes.
///
/// OPTIONS never reaches this: the CORS layer answers preflights itself.
pub async fn method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}

/// POST /api/capture-lead
///
/// Scores the submitted lead, attributes it from the `Referer` header, indexes
/// it and pings the team in the background.
pub async fn capture_lead(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<LeadSubmission>, JsonRejection>,
) -> Result<Json<CaptureLeadResponse>, AppError> {
    let submission = json_body(payload)?;
    let lead = Lead::from_submission(submission, referer(&headers));
    let lead_id = Uuid::new_v4().to_string();

    tracing::info!(
        "POST /capture-lead - lead_id: {}, score: {}",
        lead_id,
        lead.lead_score
    );

    let document = lead_document(&lead, &lead_id, None)?;
    state
        .search
        .index_document(LEADS_INDEX, &lead_id, &document)
        .await
        .context("Failed to index captured lead")?;

    state
        .notifier
        .notify_in_background(slack::lead_message("🚗 New lead captured", &lead, None));

    Ok(Json(CaptureLeadResponse {
        success: true,
        lead_id,
        lead_score: lead.lead_score,
    }))
}

/// POST /api/subscribe
///
/// Adds an email to the newsletter list. The email doubles as the document
/// id, so re-subscribing simply refreshes the entry.
pub async fn subscribe(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<Json<SubscribeResponse>, AppError> {
    let request = json_body(payload)?;

    let email = clean(request.email)
        .map(|e| e.to_lowercase())
        .filter(|e| is_valid_email(e))
        .ok_or_else(|| AppError::BadRequest("A valid email address is required".to_string()))?;
    let source = clean(request.source).unwrap_or_else(|| "website".to_string());

    tracing::info!("POST /subscribe - source: {}", source);

    let document = json!({
        "email": email,
        "source": source,
        "subscribedAt": Utc::now().to_rfc3339(),
    });
    state
        .search
        .index_document(SUBSCRIBERS_INDEX, &email, &document)
        .await
        .context("Failed to store subscriber")?;

    Ok(Json(SubscribeResponse {
        success: true,
        email,
    }))
}

/// POST /api/trigger-automation
///
/// Runs the client's configured integrations for one lead. Adapter failures
/// are absorbed by the dispatcher; they only lower `automationsTriggered`
/// relative to `automationsAttempted`.
pub async fn trigger_automation(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<TriggerAutomationRequest>, JsonRejection>,
) -> Result<Json<TriggerAutomationResponse>, AppError> {
    let request = json_body(payload)?;
    let client_id = clean(request.client_id).unwrap_or_else(|| "unknown".to_string());
    let lead = Lead::from_submission(request.lead_data, referer(&headers));
    let lead_id = Uuid::new_v4().to_string();

    tracing::info!(
        "POST /trigger-automation - client: {}, lead_id: {}, score: {}",
        client_id,
        lead_id,
        lead.lead_score
    );

    let report = state
        .dispatcher
        .dispatch(&lead, &client_id, &lead_id, &request.integrations)
        .await;

    Ok(Json(TriggerAutomationResponse {
        success: true,
        message: format!(
            "{} of {} automations triggered",
            report.triggered,
            report.attempted()
        ),
        lead_id,
        automations_triggered: report.triggered,
        automations_attempted: report.attempted(),
    }))
}

/// Email check used by `subscribe`: something@something.tld, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

/// Builds the indexed representation of a lead.
pub(crate) fn lead_document(
    lead: &Lead,
    lead_id: &str,
    client_id: Option<&str>,
) -> Result<Value, AppError> {
    let mut document = serde_json::to_value(lead)?;
    if let Some(fields) = document.as_object_mut() {
        fields.insert("leadId".to_string(), json!(lead_id));
        fields.insert("capturedAt".to_string(), json!(Utc::now().to_rfc3339()));
        if let Some(client_id) = client_id {
            fields.insert("clientId".to_string(), json!(client_id));
        }
    }
    Ok(document)
}

/// Unwraps a JSON body, turning extractor rejections into 400s with our envelope.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| match rejection.status() {
            StatusCode::PAYLOAD_TOO_LARGE => AppError::PayloadTooLarge(rejection.body_text()),
            _ => AppError::BadRequest(rejection.body_text()),
        })
}

fn referer(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::REFERER).and_then(|v| v.to_str().ok())
}
