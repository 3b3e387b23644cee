use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{scoring, utm};

// ============ Lead Models ============

/// Vehicle details a visitor attaches to a quote request.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    #[serde(default)]
    pub make: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    /// Forms send the year either as a number or as text.
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
}

impl VehicleInfo {
    fn normalized(self) -> Option<Self> {
        let info = Self {
            make: clean(self.make),
            model: clean(self.model),
            year: clean(self.year),
        };
        if info.make.is_none() && info.model.is_none() && info.year.is_none() {
            None
        } else {
            Some(info)
        }
    }
}

/// Raw lead fields as they arrive from the site's forms.
///
/// Every field is optional; [`Lead::from_submission`] normalizes them once at
/// the boundary so downstream code never has to probe for blanks.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default, alias = "company", alias = "businessName")]
    pub business: Option<String>,
    #[serde(default)]
    pub challenges: Option<String>,
    #[serde(default)]
    pub vehicle_info: Option<VehicleInfo>,
    #[serde(default)]
    pub service_preferences: Vec<String>,
}

/// Campaign attribution parsed from a referer URL.
///
/// The default value (all fields null) is the "empty mapping".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UtmParams {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_term: Option<String>,
    pub utm_content: Option<String>,
}

impl UtmParams {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// A normalized, enriched lead. Lives only for the duration of one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lead {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub business: Option<String>,
    pub challenges: Option<String>,
    pub vehicle_info: Option<VehicleInfo>,
    pub service_preferences: Vec<String>,
    pub lead_score: u8,
    pub utm: UtmParams,
}

impl Lead {
    /// Builds a lead from form input: trims fields, drops blanks, then scores
    /// the lead and attaches UTM attribution from the referer.
    pub fn from_submission(submission: LeadSubmission, referer: Option<&str>) -> Self {
        let mut lead = Self {
            name: clean(submission.name).unwrap_or_default(),
            email: clean(submission.email)
                .map(|e| e.to_lowercase())
                .unwrap_or_default(),
            phone: clean(submission.phone),
            business: clean(submission.business),
            challenges: clean(submission.challenges),
            vehicle_info: submission.vehicle_info.and_then(VehicleInfo::normalized),
            service_preferences: submission
                .service_preferences
                .into_iter()
                .filter_map(|p| clean(Some(p)))
                .collect(),
            lead_score: 0,
            utm: referer.map(utm::extract_utm).unwrap_or_default(),
        };
        lead.lead_score = scoring::score_lead(&lead);
        lead
    }

    /// Splits the full name at the first space into (first, last).
    pub fn split_name(&self) -> (&str, &str) {
        match self.name.split_once(' ') {
            Some((first, last)) => (first, last.trim_start()),
            None => (self.name.as_str(), ""),
        }
    }

    /// Display name used in notifications.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Unknown visitor"
        } else {
            &self.name
        }
    }
}

// ============ Integration Config ============

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HubSpotIntegration {
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZapierIntegration {
    #[serde(default)]
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendlyIntegration {
    #[serde(default)]
    pub username: Option<String>,
}

/// Per-client integration credentials, supplied with every automation request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntegrationConfig {
    #[serde(default)]
    pub hubspot: Option<HubSpotIntegration>,
    #[serde(default)]
    pub zapier: Option<ZapierIntegration>,
    #[serde(default)]
    pub calendly: Option<CalendlyIntegration>,
}

impl IntegrationConfig {
    pub fn hubspot_api_key(&self) -> Option<&str> {
        self.hubspot
            .as_ref()
            .and_then(|h| non_blank(h.api_key.as_deref()))
    }

    pub fn zapier_webhook_url(&self) -> Option<&str> {
        self.zapier
            .as_ref()
            .and_then(|z| non_blank(z.webhook_url.as_deref()))
    }

    pub fn calendly_username(&self) -> Option<&str> {
        self.calendly
            .as_ref()
            .and_then(|c| non_blank(c.username.as_deref()))
    }
}

// ============ Request/Response Models ============

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureLeadResponse {
    pub success: bool,
    pub lead_id: String,
    pub lead_score: u8,
}

#[derive(Debug, Default, Deserialize)]
pub struct SubscribeRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAutomationRequest {
    #[serde(default)]
    pub client_id: Option<String>,
    #[serde(default)]
    pub lead_data: LeadSubmission,
    #[serde(default)]
    pub integrations: IntegrationConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TriggerAutomationResponse {
    pub success: bool,
    pub lead_id: String,
    pub automations_triggered: usize,
    pub automations_attempted: usize,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    pub client: Option<String>,
}

/// Inbound chat-widget event. Fields beyond `event_type` are kept verbatim.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event_type: String,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Serialize)]
pub struct WebhookResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
}

// ============ Helpers ============

/// Trims a value and turns blanks into `None`.
pub fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submission_is_normalized() {
        let json = r#"
        {
            "name": "  Dana Reyes ",
            "email": " DANA@TintPros.com ",
            "phone": "   ",
            "company": "Tint Pros",
            "vehicleInfo": {"make": "Tesla", "model": "", "year": 2022},
            "servicePreferences": ["ceramic", " ", "windshield"]
        }
        "#;

        let submission: LeadSubmission = serde_json::from_str(json).unwrap();
        let lead = Lead::from_submission(submission, None);

        assert_eq!(lead.name, "Dana Reyes");
        assert_eq!(lead.email, "dana@tintpros.com");
        assert_eq!(lead.phone, None);
        assert_eq!(lead.business.as_deref(), Some("Tint Pros"));
        let vehicle = lead.vehicle_info.unwrap();
        assert_eq!(vehicle.model, None);
        assert_eq!(vehicle.year.as_deref(), Some("2022"));
        assert_eq!(lead.service_preferences, vec!["ceramic", "windshield"]);
        assert!(lead.utm.is_empty());
    }

    #[test]
    fn test_empty_vehicle_info_is_dropped() {
        let submission = LeadSubmission {
            vehicle_info: Some(VehicleInfo {
                make: Some(" ".to_string()),
                ..VehicleInfo::default()
            }),
            ..LeadSubmission::default()
        };
        assert!(Lead::from_submission(submission, None).vehicle_info.is_none());
    }

    #[test]
    fn test_split_name_at_first_space() {
        let mut lead = Lead {
            name: "Jane Mary Doe".to_string(),
            ..Lead::default()
        };
        assert_eq!(lead.split_name(), ("Jane", "Mary Doe"));

        lead.name = "Cher".to_string();
        assert_eq!(lead.split_name(), ("Cher", ""));
    }

    #[test]
    fn test_blank_integration_credentials_are_unconfigured() {
        let json = r#"
        {
            "hubspot": {"apiKey": "  "},
            "zapier": {"webhookUrl": "https://hooks.zapier.com/hooks/catch/1/abc"},
            "calendly": {}
        }
        "#;
        let config: IntegrationConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.hubspot_api_key(), None);
        assert_eq!(
            config.zapier_webhook_url(),
            Some("https://hooks.zapier.com/hooks/catch/1/abc")
        );
        assert_eq!(config.calendly_username(), None);
    }

    #[test]
    fn test_webhook_event_keeps_extra_fields() {
        let json = r#"{"event_type": "message_received", "message": "hi", "conversation_id": "c1"}"#;
        let event: WebhookEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "message_received");
        assert_eq!(event.data.get("message"), Some(&Value::from("hi")));
        assert!(!event.data.contains_key("event_type"));
    }
}
