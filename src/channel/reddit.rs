use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::channel::{Channel, ChannelError};
use crate::config::Credentials;

pub const DEFAULT_AUTH_BASE: &str = "https://www.reddit.com";
pub const DEFAULT_API_BASE: &str = "https://oauth.reddit.com";

/// Reddit caps listings at 100 items per page.
const MAX_LISTING_LIMIT: usize = 100;
const MAX_TITLE_CHARS: usize = 300;

/// Base URLs for the token endpoint and the OAuth API.
#[derive(Debug, Clone)]
pub struct RedditEndpoints {
    pub auth_base: String,
    pub api_base: String,
}

impl Default for RedditEndpoints {
    fn default() -> Self {
        Self {
            auth_base: DEFAULT_AUTH_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl RedditEndpoints {
    /// Use one base URL for both the token endpoint and the API.
    pub fn single(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            auth_base: base.clone(),
            api_base: base,
        }
    }
}

/// An authenticated Reddit session using the script-app password grant.
pub struct RedditClient {
    client: Client,
    endpoints: RedditEndpoints,
    token: SecretString,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    error: Option<String>,
}

#[derive(Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
    after: Option<String>,
}

#[derive(Deserialize)]
struct Thing {
    data: Post,
}

#[derive(Deserialize)]
struct Post {
    url: Option<String>,
}

#[derive(Deserialize)]
struct SubmitResponse {
    json: SubmitBody,
}

#[derive(Deserialize)]
struct SubmitBody {
    #[serde(default)]
    errors: Vec<Vec<serde_json::Value>>,
}

impl RedditClient {
    /// `feedo:<client id>:<version>`, the shape Reddit asks script apps to use.
    pub fn user_agent(client_id: &str) -> String {
        format!("feedo:{}:{}", client_id, env!("CARGO_PKG_VERSION"))
    }

    /// Exchange the credentials for an access token.
    pub async fn login(
        credentials: &Credentials,
        endpoints: RedditEndpoints,
        timeout: Duration,
    ) -> Result<Self, ChannelError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(Self::user_agent(&credentials.client_id))
            .build()?;

        let response = client
            .post(format!("{}/api/v1/access_token", endpoints.auth_base))
            .basic_auth(
                &credentials.client_id,
                Some(credentials.client_secret.expose_secret()),
            )
            .form(&[
                ("grant_type", "password"),
                ("username", credentials.username.as_str()),
                ("password", credentials.password.expose_secret()),
            ])
            .send()
            .await?;

        let token: TokenResponse = check_status(response).await?.json().await?;
        match token.access_token {
            Some(access_token) if !access_token.is_empty() => {
                tracing::debug!("Authenticated as {}", credentials.username);
                Ok(Self {
                    client,
                    endpoints,
                    token: SecretString::from(access_token),
                })
            }
            _ => Err(ChannelError::Client(format!(
                "authentication failed: {}",
                token.error.as_deref().unwrap_or("no access token in response")
            ))),
        }
    }
}

#[async_trait]
impl Channel for RedditClient {
    async fn recent_links(
        &self,
        destination: &str,
        limit: usize,
    ) -> Result<Vec<String>, ChannelError> {
        let mut links = Vec::with_capacity(limit);
        let mut after: Option<String> = None;

        // Page through the listing until `limit` posts were seen or it runs out.
        let mut seen = 0;
        while seen < limit {
            let page_size = (limit - seen).min(MAX_LISTING_LIMIT).to_string();
            let mut query = vec![("limit", page_size.as_str()), ("raw_json", "1")];
            if let Some(cursor) = after.as_deref() {
                query.push(("after", cursor));
            }

            let response = self
                .client
                .get(format!("{}/r/{}/new", self.endpoints.api_base, destination))
                .bearer_auth(self.token.expose_secret())
                .query(&query)
                .send()
                .await?;

            let listing: Listing = check_status(response).await?.json().await?;
            let page_len = listing.data.children.len();
            seen += page_len;
            links.extend(
                listing
                    .data
                    .children
                    .into_iter()
                    .filter_map(|thing| thing.data.url),
            );

            match listing.data.after {
                Some(cursor) if page_len > 0 => after = Some(cursor),
                _ => break,
            }
        }

        links.truncate(limit);
        Ok(links)
    }

    async fn submit(&self, destination: &str, title: &str, link: &str) -> Result<(), ChannelError> {
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(ChannelError::Client(format!(
                "title longer than {} characters",
                MAX_TITLE_CHARS
            )));
        }

        let response = self
            .client
            .post(format!("{}/api/submit", self.endpoints.api_base))
            .bearer_auth(self.token.expose_secret())
            .form(&[
                ("sr", destination),
                ("kind", "link"),
                ("title", title),
                ("url", link),
                ("api_type", "json"),
                ("resubmit", "true"),
            ])
            .send()
            .await?;

        let body: SubmitResponse = check_status(response).await?.json().await?;
        match body.json.errors.first() {
            None => Ok(()),
            Some(error) => {
                let field = |i: usize| {
                    error
                        .get(i)
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string()
                };
                Err(ChannelError::Api {
                    code: field(0),
                    message: field(1),
                })
            }
        }
    }
}

/// Map HTTP status codes onto the channel error classes.
async fn check_status(response: Response) -> Result<Response, ChannelError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = if body.is_empty() {
        status.to_string()
    } else {
        format!("{}: {}", status, body.chars().take(200).collect::<String>())
    };

    Err(match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ChannelError::SessionLost(detail),
        StatusCode::TOO_MANY_REQUESTS => ChannelError::api("RATELIMIT", detail),
        s if s.is_server_error() => ChannelError::api(s.as_u16().to_string(), detail),
        _ => ChannelError::Client(detail),
    })
}
