use crate::models::Lead;
use reqwest::Client;
use serde_json::{json, Value};

/// Team notifications through a Slack incoming webhook.
///
/// Best-effort and non-blocking: [`SlackNotifier::notify`] never returns an
/// error. Delivery failures are logged and dropped, and with no webhook URL
/// configured every call is a no-op.
#[derive(Clone)]
pub struct SlackNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl SlackNotifier {
    pub fn new(client: Client, webhook_url: Option<String>) -> Self {
        Self {
            client,
            webhook_url,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Posts `message` to Slack. Returns whether Slack accepted it.
    pub async fn notify(&self, message: &Value) -> bool {
        let Some(url) = self.webhook_url.as_deref() else {
            tracing::debug!("Slack webhook not configured, skipping notification");
            return false;
        };

        let result = match self.client.post(url).json(message).send().await {
            Ok(response) => super::ensure_success(response, "Slack").await.map(|_| ()),
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(()) => {
                tracing::debug!("✓ Slack notification delivered");
                true
            }
            Err(e) => {
                tracing::warn!("Slack notification failed (ignored): {}", e);
                false
            }
        }
    }

    /// Sends `message` from a detached task so the caller never waits on Slack.
    pub fn notify_in_background(&self, message: Value) {
        if !self.is_enabled() {
            return;
        }
        let notifier = self.clone();
        tokio::spawn(async move {
            notifier.notify(&message).await;
        });
    }
}

/// Formats a lead as a Block Kit message: a header followed by a fields section.
pub fn lead_message(headline: &str, lead: &Lead, context: Option<&str>) -> Value {
    let mut fields = vec![
        field("Name", lead.display_name()),
        field("Email", non_empty(&lead.email)),
        field("Score", &format!("{}/100", lead.lead_score)),
    ];
    if let Some(phone) = &lead.phone {
        fields.push(field("Phone", phone));
    }
    if let Some(business) = &lead.business {
        fields.push(field("Business", business));
    }
    if let Some(source) = &lead.utm.utm_source {
        fields.push(field("Source", source));
    }

    let mut blocks = vec![
        json!({
            "type": "header",
            "text": { "type": "plain_text", "text": headline }
        }),
        json!({ "type": "section", "fields": fields }),
    ];

    if let Some(challenges) = &lead.challenges {
        blocks.push(json!({
            "type": "section",
            "text": { "type": "mrkdwn", "text": format!("*Challenges:*\n{}", challenges) }
        }));
    }
    if let Some(context) = context {
        blocks.push(json!({
            "type": "context",
            "elements": [{ "type": "mrkdwn", "text": context }]
        }));
    }

    json!({
        "text": format!("{}: {} (score {})", headline, lead.display_name(), lead.lead_score),
        "blocks": blocks,
    })
}

fn field(label: &str, value: &str) -> Value {
    json!({ "type": "mrkdwn", "text": format!("*{}:*\n{}", label, value) })
}

fn non_empty(value: &str) -> &str {
    if value.is_empty() {
        "-"
    } else {
        value
    }
}
