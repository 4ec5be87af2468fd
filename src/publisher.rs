use chrono::{DateTime, Datelike, SecondsFormat, Utc};
use tracing::{info, warn};

use moonbot::config::MessageConfig;
use moonbot::facet::locate_hashtag;
use moonbot::message;
use moonbot::ComposedMessage;

use crate::bluesky::{BlueskyClient, Facet, PostRecord};
use crate::moon_api::MoonApiClient;

/// The publish callback handed to the scheduler: fetch today's phase,
/// compose the post, annotate the hashtag, send it.
pub struct MoonPostPublisher {
    bluesky: BlueskyClient,
    moon_api: MoonApiClient,
    config: MessageConfig,
}

impl MoonPostPublisher {
    pub fn from_env(config: MessageConfig) -> Option<Self> {
        Some(Self {
            bluesky: BlueskyClient::from_env()?,
            moon_api: MoonApiClient::from_env(),
            config,
        })
    }

    pub async fn publish_today(&self) -> Result<(), String> {
        info!("attempting to post today's moon phase");

        // Missing data is not an error worth retrying all day: log, skip
        // this cycle, and let the normal cadence pick up tomorrow.
        let data = match self.moon_api.fetch_today().await {
            Ok(data) => data,
            Err(err) => {
                warn!("no moon phase data available, skipping this cycle: {}", err);
                return Ok(());
            }
        };

        let now = Utc::now();
        let message = message::compose(
            &data.phase,
            data.illumination * 100.0,
            now.month0() as usize,
            &self.config,
        )
        .map_err(|err| format!("message composition failed: {}", err))?;

        let record = build_post_record(&message, now);
        self.bluesky.post(record).await?;

        info!("just posted: {}", message.text);
        Ok(())
    }
}

pub fn build_post_record(message: &ComposedMessage, created_at: DateTime<Utc>) -> PostRecord {
    let mut facets = Vec::new();
    if let Some(span) = locate_hashtag(&message.text, message.hashtag) {
        facets.push(Facet::tag(span, message.hashtag));
    }
    // The record format wants annotations ordered by their start offset.
    facets.sort_by_key(|facet| facet.index.byte_start);

    PostRecord::new(
        message.text.clone(),
        facets,
        created_at.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use moonbot::ComposedMessage;

    use super::build_post_record;

    #[test]
    fn post_record_carries_hashtag_facet() {
        let message = ComposedMessage {
            text: "🌕 By Jove, a magnificent Full Moon! 99.8% light. Awooo! #FullMoon"
                .to_string(),
            hashtag: "#FullMoon",
        };
        let created_at = Utc.with_ymd_and_hms(2025, 6, 11, 0, 0, 3).unwrap();

        let record = build_post_record(&message, created_at);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["$type"], "app.bsky.feed.post");
        assert_eq!(json["langs"][0], "en");
        assert_eq!(json["createdAt"], "2025-06-11T00:00:03.000Z");

        let facet = &json["facets"][0];
        let expected_start = message.text.len() - "#FullMoon".len();
        assert_eq!(facet["index"]["byteStart"], expected_start as u64);
        assert_eq!(facet["index"]["byteEnd"], message.text.len() as u64);
        assert_eq!(facet["features"][0]["$type"], "app.bsky.richtext.facet#tag");
        assert_eq!(facet["features"][0]["tag"], "FullMoon");
    }

    #[test]
    fn post_record_omits_facets_when_hashtag_is_gone() {
        let message = ComposedMessage {
            text: "🌑 It's a New Moon, barely a whisper! Illumination: 0.1%. Awo..."
                .to_string(),
            hashtag: "#NewMoon",
        };
        let created_at = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();

        let record = build_post_record(&message, created_at);
        let json = serde_json::to_value(&record).unwrap();

        assert!(json.get("facets").is_none());
    }
}
