use crate::errors::AppError;
use crate::models::Lead;
use reqwest::Client;
use serde_json::{json, Map, Value};

/// Client for the HubSpot CRM contacts API.
///
/// The API key is per client and arrives with each request, so it is passed
/// to [`HubSpotClient::create_contact`] rather than stored here.
#[derive(Clone)]
pub struct HubSpotClient {
    client: Client,
    base_url: String,
}

impl HubSpotClient {
    pub fn new(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    /// Creates a CRM contact for the lead.
    ///
    /// # Returns
    ///
    /// * `Result<String, AppError>` - The HubSpot contact id, or `"created"`
    ///   when the response carries none.
    pub async fn create_contact(&self, api_key: &str, lead: &Lead) -> Result<String, AppError> {
        let url = format!("{}/crm/v3/objects/contacts", self.base_url);
        tracing::info!("Creating HubSpot contact for {}", lead.email);

        let body = json!({ "properties": contact_properties(lead) });

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("HubSpot request failed: {}", e)))?;

        let response = super::ensure_success(response, "HubSpot").await?;

        let data: Value = response.json().await.unwrap_or(Value::Null);
        let contact_id = data
            .get("id")
            .and_then(|id| id.as_str())
            .unwrap_or("created")
            .to_string();

        tracing::info!("✓ HubSpot contact created: {}", contact_id);
        Ok(contact_id)
    }
}

/// Maps a lead onto HubSpot contact properties. Absent fields are omitted.
pub fn contact_properties(lead: &Lead) -> Map<String, Value> {
    let (first, last) = lead.split_name();

    let mut props = Map::new();
    props.insert("email".to_string(), json!(lead.email));
    props.insert("firstname".to_string(), json!(first));
    props.insert("lastname".to_string(), json!(last));
    props.insert("lifecyclestage".to_string(), json!("lead"));
    props.insert("hs_lead_status".to_string(), json!("NEW"));
    props.insert("lead_score".to_string(), json!(lead.lead_score.to_string()));

    if let Some(phone) = &lead.phone {
        props.insert("phone".to_string(), json!(phone));
    }
    if let Some(business) = &lead.business {
        props.insert("company".to_string(), json!(business));
    }
    if let Some(challenges) = &lead.challenges {
        props.insert("tint_challenges".to_string(), json!(challenges));
    }
    if let Some(source) = &lead.utm.utm_source {
        props.insert("utm_source".to_string(), json!(source));
    }
    if let Some(campaign) = &lead.utm.utm_campaign {
        props.insert("utm_campaign".to_string(), json!(campaign));
    }

    props
}
