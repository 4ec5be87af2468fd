use reqwest::header::AUTHORIZATION;
use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use moonbot::facet::FacetSpan;

/// Minimal AT Protocol client for posting to a Bluesky PDS. Sessions are
/// created lazily and cached; a 401 on posting drops the cache so the next
/// attempt logs in again.
#[derive(Clone)]
pub struct BlueskyClient {
    client: reqwest::Client,
    pds_base: String,
    identifier: String,
    password: String,
    session: Arc<Mutex<Option<Session>>>,
}

#[derive(Clone)]
struct Session {
    access_jwt: String,
    did: String,
}

impl BlueskyClient {
    pub fn from_env() -> Option<Self> {
        let identifier = env::var("BLUESKY_USERNAME").ok()?;
        let password = env::var("BLUESKY_PASSWORD").ok()?;
        let pds_base =
            env::var("BLUESKY_PDS_URL").unwrap_or_else(|_| "https://bsky.social".to_string());

        Some(Self {
            client: reqwest::Client::new(),
            pds_base,
            identifier,
            password,
            session: Arc::new(Mutex::new(None)),
        })
    }

    pub async fn post(&self, record: PostRecord) -> Result<(), String> {
        let session = self.session().await?;
        let request = CreateRecordRequest {
            repo: session.did.clone(),
            collection: "app.bsky.feed.post".to_string(),
            record,
        };

        let response = self
            .client
            .post(format!(
                "{}/xrpc/com.atproto.repo.createRecord",
                self.pds_base.trim_end_matches('/')
            ))
            .header(AUTHORIZATION, format!("Bearer {}", session.access_jwt))
            .json(&request)
            .send()
            .await
            .map_err(|err| format!("Bluesky request failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            if status == reqwest::StatusCode::UNAUTHORIZED {
                let mut guard = self.session.lock().await;
                *guard = None;
            }
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("Bluesky API error: {}", status));
            }
            return Err(format!("Bluesky API error: {} {}", status, detail));
        }

        Ok(())
    }

    async fn session(&self) -> Result<Session, String> {
        {
            let guard = self.session.lock().await;
            if let Some(session) = guard.as_ref() {
                return Ok(session.clone());
            }
        }

        let session = self.create_session().await?;
        let mut guard = self.session.lock().await;
        *guard = Some(session.clone());
        Ok(session)
    }

    async fn create_session(&self) -> Result<Session, String> {
        let response = self
            .client
            .post(format!(
                "{}/xrpc/com.atproto.server.createSession",
                self.pds_base.trim_end_matches('/')
            ))
            .json(&CreateSessionRequest {
                identifier: self.identifier.clone(),
                password: self.password.clone(),
            })
            .send()
            .await
            .map_err(|err| format!("Bluesky login failed: {}", err))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_else(|_| String::new());
            let detail = error_body.trim();
            if detail.is_empty() {
                return Err(format!("Bluesky login error: {}", status));
            }
            return Err(format!("Bluesky login error: {} {}", status, detail));
        }

        let body: CreateSessionResponse = response
            .json()
            .await
            .map_err(|err| format!("Bluesky login parse failed: {}", err))?;

        info!("logged in to Bluesky as {}", body.handle);
        Ok(Session {
            access_jwt: body.access_jwt,
            did: body.did,
        })
    }
}

#[derive(Serialize)]
struct CreateSessionRequest {
    identifier: String,
    password: String,
}

#[derive(Deserialize)]
struct CreateSessionResponse {
    #[serde(rename = "accessJwt")]
    access_jwt: String,
    did: String,
    handle: String,
}

#[derive(Serialize)]
struct CreateRecordRequest {
    repo: String,
    collection: String,
    record: PostRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostRecord {
    #[serde(rename = "$type")]
    record_type: &'static str,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub facets: Vec<Facet>,
    pub langs: Vec<String>,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

impl PostRecord {
    pub fn new(text: String, facets: Vec<Facet>, created_at: String) -> Self {
        Self {
            record_type: "app.bsky.feed.post",
            text,
            facets,
            langs: vec!["en".to_string()],
            created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Facet {
    pub index: FacetIndex,
    pub features: Vec<TagFeature>,
}

impl Facet {
    /// Builds a hashtag facet; the tag value is sent without the leading `#`.
    pub fn tag(span: FacetSpan, hashtag: &str) -> Self {
        Self {
            index: FacetIndex {
                byte_start: span.byte_start,
                byte_end: span.byte_end,
            },
            features: vec![TagFeature {
                feature_type: "app.bsky.richtext.facet#tag",
                tag: hashtag.trim_start_matches('#').to_string(),
            }],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FacetIndex {
    #[serde(rename = "byteStart")]
    pub byte_start: usize,
    #[serde(rename = "byteEnd")]
    pub byte_end: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagFeature {
    #[serde(rename = "$type")]
    feature_type: &'static str,
    pub tag: String,
}
