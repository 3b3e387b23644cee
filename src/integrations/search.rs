use crate::config::Config;
use crate::errors::AppError;
use reqwest::Client;
use serde_json::Value;

pub const LEADS_INDEX: &str = "leads";
pub const SUBSCRIBERS_INDEX: &str = "subscribers";
pub const CONVERSATIONS_INDEX: &str = "conversations";

/// Client for the search/analytics index (Elasticsearch document API).
#[derive(Clone)]
pub struct SearchClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    index_prefix: String,
}

impl SearchClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.search_url.clone(),
            api_key: config.search_api_key.clone(),
            index_prefix: config.search_index_prefix.clone(),
        }
    }

    /// Stores `document` under `id` in `index` (prefix applied), replacing any
    /// previous version.
    pub async fn index_document(
        &self,
        index: &str,
        id: &str,
        document: &Value,
    ) -> Result<(), AppError> {
        let index = self.index_name(index);
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| AppError::InternalError(format!("Invalid search URL: {}", e)))?;
        url.path_segments_mut()
            .map_err(|_| AppError::InternalError("Search URL cannot be a base".to_string()))?
            .pop_if_empty()
            .extend([index.as_str(), "_doc", id]);

        tracing::debug!("Indexing document {} into {}", id, index);

        let mut request = self.client.put(url).json(document);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("ApiKey {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalApiError(format!("Search request failed: {}", e)))?;

        super::ensure_success(response, "Search").await?;

        tracing::info!("✓ Indexed {} into {}", id, index);
        Ok(())
    }

    /// Full index name with the configured prefix, e.g. `prod-leads`.
    pub fn index_name(&self, index: &str) -> String {
        format!("{}{}", self.index_prefix, index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_name_applies_prefix() {
        let config = Config {
            search_index_prefix: "staging-".to_string(),
            ..Config::default()
        };
        let search = SearchClient::new(Client::new(), &config);
        assert_eq!(search.index_name(LEADS_INDEX), "staging-leads");
    }
}
