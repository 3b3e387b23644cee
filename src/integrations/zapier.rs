use crate::errors::AppError;
use crate::models::Lead;
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Map, Value};

/// Posts flattened leads to a client's Zapier catch hook.
#[derive(Clone)]
pub struct ZapierClient {
    client: Client,
}

impl ZapierClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Sends `payload` to the caller-supplied webhook URL as-is.
    pub async fn send(
        &self,
        webhook_url: &str,
        payload: &Map<String, Value>,
    ) -> Result<(), AppError> {
        tracing::info!("Posting lead to Zapier webhook");

        let response = self
            .client
            .post(webhook_url)
            .json(payload)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Zapier request failed: {}", e)))?;

        super::ensure_success(response, "Zapier").await?;

        tracing::info!("✓ Zapier webhook accepted lead");
        Ok(())
    }
}

/// Flattens a lead into one level of keys, which is what Zapier's field
/// mapper handles best.
pub fn flatten_lead(lead: &Lead, client_id: &str, lead_id: &str) -> Map<String, Value> {
    let vehicle = lead.vehicle_info.clone().unwrap_or_default();

    let mut flat = Map::new();
    flat.insert("lead_id".to_string(), json!(lead_id));
    flat.insert("client_id".to_string(), json!(client_id));
    flat.insert("name".to_string(), json!(lead.name));
    flat.insert("email".to_string(), json!(lead.email));
    flat.insert("phone".to_string(), json!(lead.phone));
    flat.insert("business".to_string(), json!(lead.business));
    flat.insert("challenges".to_string(), json!(lead.challenges));
    flat.insert("vehicle_make".to_string(), json!(vehicle.make));
    flat.insert("vehicle_model".to_string(), json!(vehicle.model));
    flat.insert("vehicle_year".to_string(), json!(vehicle.year));
    flat.insert(
        "service_preferences".to_string(),
        json!(lead.service_preferences.join(", ")),
    );
    flat.insert("lead_score".to_string(), json!(lead.lead_score));
    flat.insert("utm_source".to_string(), json!(lead.utm.utm_source));
    flat.insert("utm_medium".to_string(), json!(lead.utm.utm_medium));
    flat.insert("utm_campaign".to_string(), json!(lead.utm.utm_campaign));
    flat.insert("utm_term".to_string(), json!(lead.utm.utm_term));
    flat.insert("utm_content".to_string(), json!(lead.utm.utm_content));
    flat.insert("submitted_at".to_string(), json!(Utc::now().to_rfc3339()));
    flat
}
