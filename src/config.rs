use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub hubspot_base_url: String,
    pub calendly_base_url: String,
    pub slack_webhook_url: Option<String>,
    pub search_url: String,
    pub search_api_key: Option<String>,
    pub search_index_prefix: String,
    pub outbound_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            hubspot_base_url: "https://api.hubapi.com".to_string(),
            calendly_base_url: "https://calendly.com".to_string(),
            slack_webhook_url: None,
            search_url: "http://localhost:9200".to_string(),
            search_api_key: None,
            search_index_prefix: String::new(),
            outbound_timeout_secs: 10,
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| defaults.port.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            hubspot_base_url: http_url_var("HUBSPOT_BASE_URL", defaults.hubspot_base_url)?,
            calendly_base_url: http_url_var("CALENDLY_BASE_URL", defaults.calendly_base_url)?,
            slack_webhook_url: optional_var("SLACK_WEBHOOK_URL"),
            search_url: http_url_var("SEARCH_URL", defaults.search_url)?,
            search_api_key: optional_var("SEARCH_API_KEY"),
            search_index_prefix: optional_var("SEARCH_INDEX_PREFIX").unwrap_or_default(),
            outbound_timeout_secs: std::env::var("OUTBOUND_TIMEOUT_SECS")
                .unwrap_or_else(|_| defaults.outbound_timeout_secs.to_string())
                .parse::<u64>()
                .map_err(|_| anyhow::anyhow!("OUTBOUND_TIMEOUT_SECS must be a whole number"))
                .and_then(|secs| {
                    if secs == 0 {
                        anyhow::bail!("OUTBOUND_TIMEOUT_SECS must be greater than zero");
                    }
                    Ok(secs)
                })?,
        };

        // Log successful configuration load (without sensitive values)
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("HubSpot Base URL: {}", config.hubspot_base_url);
        tracing::debug!("Calendly Base URL: {}", config.calendly_base_url);
        tracing::debug!("Search URL: {}", config.search_url);
        if config.slack_webhook_url.is_none() {
            tracing::warn!("SLACK_WEBHOOK_URL not set, team notifications are disabled");
        }
        tracing::debug!("Outbound timeout: {}s", config.outbound_timeout_secs);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn optional_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.trim().is_empty())
}

fn http_url_var(key: &str, default: String) -> anyhow::Result<String> {
    let url = std::env::var(key).unwrap_or(default);
    if url.trim().is_empty() {
        anyhow::bail!("{} cannot be empty", key);
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        anyhow::bail!("{} must start with http:// or https://", key);
    }
    Ok(url.trim_end_matches('/').to_string())
}
