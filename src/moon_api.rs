use chrono::{NaiveTime, Utc};
use serde::Deserialize;
use std::env;

/// FarmSense moon phase client. The service is keyed on a Unix timestamp;
/// the bot always asks about today's 00:00:00 UTC so every run within a
/// day sees the same answer.
#[derive(Clone)]
pub struct MoonApiClient {
    client: reqwest::Client,
    api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoonPhaseData {
    #[serde(rename = "Phase")]
    pub phase: String,
    /// Fraction in [0, 1]; callers multiply by 100 for display.
    #[serde(rename = "Illumination")]
    pub illumination: f64,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl MoonApiClient {
    pub fn from_env() -> Self {
        let api_base = env::var("MOON_API_BASE")
            .unwrap_or_else(|_| "https://api.farmsense.net/v1".to_string());
        Self {
            client: reqwest::Client::new(),
            api_base,
        }
    }

    pub async fn fetch_today(&self) -> Result<MoonPhaseData, String> {
        let midnight = Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc();
        self.fetch_at(midnight.timestamp()).await
    }

    pub async fn fetch_at(&self, unix_timestamp: i64) -> Result<MoonPhaseData, String> {
        let response = self
            .client
            .get(format!("{}/moonphases/", self.api_base.trim_end_matches('/')))
            .query(&[("d", unix_timestamp.to_string())])
            .send()
            .await
            .map_err(|err| format!("moon phase request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("moon phase API error: {}", status));
            }
            return Err(format!("moon phase API error: {} {}", status, detail));
        }

        let body: Vec<MoonPhaseData> = response
            .json()
            .await
            .map_err(|err| format!("moon phase response parse failed: {}", err))?;

        let data = body
            .into_iter()
            .next()
            .ok_or_else(|| "no moon phase data received".to_string())?;

        if let Some(error) = data.error.as_deref().filter(|value| !value.is_empty()) {
            return Err(format!("moon phase API reported an error: {}", error));
        }
        if data.phase.trim().is_empty() {
            return Err("moon phase response missing phase name".to_string());
        }

        Ok(data)
    }
}
