use crate::errors::AppError;
use phonenumber::country::Id as CountryId;
use phonenumber::Mode;

/// SMS follow-up sender.
///
/// No SMS provider is wired in yet: messages are validated and logged, and
/// the call reports success so callers treat it like a delivered message.
#[derive(Clone, Default)]
pub struct SmsSender;

impl SmsSender {
    pub fn new() -> Self {
        Self
    }

    /// "Sends" `body` to `phone`, returning the normalized E.164 number.
    pub async fn send(&self, phone: &str, body: &str) -> Result<String, AppError> {
        let normalized = normalize_phone(phone)
            .ok_or_else(|| {
                AppError::InternalError(format!("Invalid phone number: {}", phone))
            })?;

        tracing::info!(
            "SMS stub: would send {} chars to {}",
            body.chars().count(),
            normalized
        );
        tracing::debug!("SMS stub body: {}", body);

        Ok(normalized)
    }
}

/// Normalizes a phone number to E.164, assuming US numbering when no country
/// code is given.
pub fn normalize_phone(raw: &str) -> Option<String> {
    if raw.trim().is_empty() {
        return None;
    }

    match phonenumber::parse(Some(CountryId::US), raw) {
        Ok(number) if phonenumber::is_valid(&number) => {
            let formatted = number.format().mode(Mode::E164).to_string();
            tracing::debug!("✓ Valid phone: {} → {}", raw, formatted);
            Some(formatted)
        }
        Ok(_) => {
            tracing::warn!("Invalid phone number: {}", raw);
            None
        }
        Err(e) => {
            tracing::warn!("Failed to parse phone '{}': {:?}", raw, e);
            None
        }
    }
}
