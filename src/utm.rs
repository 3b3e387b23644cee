use url::Url;

use crate::models::UtmParams;

/// Extracts UTM campaign parameters from a referer URL.
///
/// Only absolute URLs are considered. Anything that fails to parse yields the
/// empty mapping. When a parameter repeats, the first occurrence wins and
/// blank values are treated as absent.
pub fn extract_utm(referer: &str) -> UtmParams {
    let url = match Url::parse(referer.trim()) {
        Ok(url) => url,
        Err(e) => {
            tracing::debug!("Referer is not a URL ({}): {}", e, referer);
            return UtmParams::default();
        }
    };

    let mut utm = UtmParams::default();
    for (key, value) in url.query_pairs() {
        let slot = match key.as_ref() {
            "utm_source" => &mut utm.utm_source,
            "utm_medium" => &mut utm.utm_medium,
            "utm_campaign" => &mut utm.utm_campaign,
            "utm_term" => &mut utm.utm_term,
            "utm_content" => &mut utm.utm_content,
            _ => continue,
        };
        if slot.is_none() && !value.trim().is_empty() {
            *slot = Some(value.into_owned());
        }
    }

    utm
}
