use crate::errors::AppError;
use crate::models::Lead;
use url::Url;

/// Builds a prefilled Calendly scheduling-page link for the lead.
///
/// No booking call is made; the visitor picks a slot on the page. `a1`/`a2`
/// are Calendly's custom-answer slots, used here for phone and business.
pub fn scheduling_link(base_url: &str, username: &str, lead: &Lead) -> Result<String, AppError> {
    let mut url = Url::parse(base_url)
        .map_err(|e| AppError::InternalError(format!("Invalid Calendly base URL: {}", e)))?;

    url.path_segments_mut()
        .map_err(|_| AppError::InternalError("Calendly base URL cannot be a base".to_string()))?
        .pop_if_empty()
        .push(username.trim());

    {
        let mut query = url.query_pairs_mut();
        query.append_pair("name", &lead.name);
        query.append_pair("email", &lead.email);
        if let Some(phone) = &lead.phone {
            query.append_pair("a1", phone);
        }
        if let Some(business) = &lead.business {
            query.append_pair("a2", business);
        }
        if let Some(source) = &lead.utm.utm_source {
            query.append_pair("utm_source", source);
        }
        if let Some(campaign) = &lead.utm.utm_campaign {
            query.append_pair("utm_campaign", campaign);
        }
    }

    tracing::debug!("Calendly link built for {}", username);
    Ok(url.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_encodes_lead_fields() {
        let lead = Lead {
            name: "Rosa Diaz".to_string(),
            email: "rosa@example.com".to_string(),
            phone: Some("+1 555 0100".to_string()),
            ..Lead::default()
        };

        let link = scheduling_link("https://calendly.com", "tint-shop", &lead).unwrap();
        assert_eq!(
            link,
            "https://calendly.com/tint-shop?name=Rosa+Diaz&email=rosa%40example.com&a1=%2B1+555+0100"
        );
    }

    #[test]
    fn test_username_is_path_escaped() {
        let link = scheduling_link("https://calendly.com/", "a b/c", &Lead::default()).unwrap();
        assert!(link.starts_with("https://calendly.com/a%20b%2Fc?"));
    }
}
