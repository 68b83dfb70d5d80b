//! MediaWiki Action API client (Wikimedia Commons)
//!
//! Implements [`MediaRepository`] on top of the Action API:
//! - login: login token → `action=login` → CSRF token
//! - upload: `action=upload` by URL, page text rendered as `{{Information}}`
//! - page: latest revision content of the main slot
//! - edit: `action=edit` with the session's CSRF token
//!
//! One client holds one authenticated session (cookie store + CSRF token)
//! shared by every pipeline of a batch. `login` is idempotent: only the first
//! call talks to the wiki.

use super::MediaRepository;
use crate::metadata::{UploadDescriptor, UploadText};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// Default Action API endpoint
pub const DEFAULT_WIKI_API_URL: &str = "https://commons.wikimedia.org/w/api.php";

const USER_AGENT: &str = concat!(
    "rijks-upload/",
    env!("CARGO_PKG_VERSION"),
    " (collection media uploader)"
);

/// MediaWiki client errors
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("HTTP error {0}")]
    Http(u16),

    #[error("{code}: {info}")]
    Api { code: String, info: String },

    #[error("Login rejected: {0}")]
    LoginRejected(String),

    #[error("Not logged in")]
    NotLoggedIn,

    #[error("Upload not accepted: {0}")]
    UploadRejected(String),

    #[error("Edit not accepted: {0}")]
    EditRejected(String),

    #[error("Page does not exist: {0}")]
    MissingPage(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Authenticated session state
struct Session {
    csrf_token: String,
}

/// MediaWiki Action API client
pub struct CommonsClient {
    http_client: Client,
    api_url: Url,
    session: Mutex<Option<Session>>,
}

impl CommonsClient {
    pub fn new(api_url: &str, timeout: Duration) -> Result<Self, WikiError> {
        let api_url = Url::parse(api_url).map_err(|e| WikiError::Parse(format!("{}: {}", api_url, e)))?;

        let http_client = Client::builder()
            .user_agent(USER_AGENT)
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|e| WikiError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_url,
            session: Mutex::new(None),
        })
    }

    async fn get(&self, params: &[(&str, &str)]) -> Result<Value, WikiError> {
        let response = self
            .http_client
            .get(self.api_url.clone())
            .query(params)
            .query(&[("format", "json")])
            .send()
            .await
            .map_err(|e| WikiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    async fn post(&self, params: &[(&str, &str)]) -> Result<Value, WikiError> {
        let mut form: Vec<(&str, &str)> = params.to_vec();
        form.push(("format", "json"));

        let response = self
            .http_client
            .post(self.api_url.clone())
            .form(&form)
            .send()
            .await
            .map_err(|e| WikiError::Network(e.to_string()))?;
        Self::read_json(response).await
    }

    /// Decode the body and surface API-level `error` objects
    async fn read_json(response: reqwest::Response) -> Result<Value, WikiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(WikiError::Http(status.as_u16()));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| WikiError::Parse(e.to_string()))?;

        if let Some(error) = json.get("error") {
            return Err(WikiError::Api {
                code: str_at(error, &["code"]).unwrap_or("unknown").to_string(),
                info: str_at(error, &["info"]).unwrap_or_default().to_string(),
            });
        }

        Ok(json)
    }

    async fn fetch_token(&self, token_type: &str) -> Result<String, WikiError> {
        let json = self
            .get(&[("action", "query"), ("meta", "tokens"), ("type", token_type)])
            .await?;
        let key = format!("{}token", token_type);
        str_at(&json, &["query", "tokens", key.as_str()])
            .map(str::to_string)
            .ok_or_else(|| WikiError::Parse(format!("missing {}", key)))
    }

    async fn csrf_token(&self) -> Result<String, WikiError> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|session| session.csrf_token.clone())
            .ok_or(WikiError::NotLoggedIn)
    }
}

#[async_trait]
impl MediaRepository for CommonsClient {
    async fn login(&self, username: &str, password: &str) -> Result<(), WikiError> {
        let mut session = self.session.lock().await;
        if session.is_some() {
            return Ok(());
        }

        let login_token = self.fetch_token("login").await?;
        let json = self
            .post(&[
                ("action", "login"),
                ("lgname", username),
                ("lgpassword", password),
                ("lgtoken", login_token.as_str()),
            ])
            .await?;

        let result = str_at(&json, &["login", "result"]).unwrap_or("unknown");
        if result != "Success" {
            let reason = str_at(&json, &["login", "reason"]).unwrap_or_default();
            return Err(WikiError::LoginRejected(format!("{} {}", result, reason).trim().to_string()));
        }

        let csrf_token = self.fetch_token("csrf").await?;
        *session = Some(Session { csrf_token });

        info!(user = %username, api = %self.api_url, "Logged in to wiki");
        Ok(())
    }

    async fn upload(&self, descriptor: &UploadDescriptor) -> Result<(), WikiError> {
        let token = self.csrf_token().await?;
        let text = render_file_page(&descriptor.text);

        let json = self
            .post(&[
                ("action", "upload"),
                ("filename", descriptor.filename.as_str()),
                ("url", descriptor.media_url.as_str()),
                ("comment", descriptor.comment.as_str()),
                ("text", text.as_str()),
                ("token", token.as_str()),
            ])
            .await?;

        match str_at(&json, &["upload", "result"]) {
            Some("Success") => {
                debug!(filename = %descriptor.filename, "Upload accepted");
                Ok(())
            }
            Some(other) => {
                let warnings = warning_codes(&json);
                Err(WikiError::UploadRejected(format!("{} {}", other, warnings).trim().to_string()))
            }
            None => Err(WikiError::Parse("missing upload result".to_string())),
        }
    }

    async fn page(&self, title: &str) -> Result<String, WikiError> {
        let json = self
            .get(&[
                ("action", "query"),
                ("prop", "revisions"),
                ("rvprop", "content"),
                ("rvslots", "main"),
                ("formatversion", "2"),
                ("titles", title),
            ])
            .await?;

        let page = json
            .pointer("/query/pages/0")
            .ok_or_else(|| WikiError::Parse("missing query.pages".to_string()))?;

        if page.get("missing").and_then(Value::as_bool).unwrap_or(false) {
            return Err(WikiError::MissingPage(title.to_string()));
        }

        Ok(page
            .pointer("/revisions/0/slots/main/content")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string())
    }

    async fn edit_page(&self, title: &str, content: &str, summary: &str) -> Result<(), WikiError> {
        let token = self.csrf_token().await?;

        let json = self
            .post(&[
                ("action", "edit"),
                ("title", title),
                ("text", content),
                ("summary", summary),
                ("nocreate", "1"),
                ("token", token.as_str()),
            ])
            .await?;

        match str_at(&json, &["edit", "result"]) {
            Some("Success") => Ok(()),
            Some(other) => Err(WikiError::EditRejected(other.to_string())),
            None => Err(WikiError::Parse("missing edit result".to_string())),
        }
    }
}

/// File description page text for an upload
pub fn render_file_page(text: &UploadText) -> String {
    format!(
        "== {{{{int:filedesc}}}} ==\n{{{{Information\n|description={}\n|date={}\n|source={}\n|author={}\n}}}}\n",
        text.description, text.date, text.source, text.author
    )
}

/// Upload warning codes joined with `;` (`exists;duplicate`)
fn warning_codes(json: &Value) -> String {
    json.pointer("/upload/warnings")
        .and_then(Value::as_object)
        .map(|warnings| warnings.keys().map(String::as_str).collect::<Vec<_>>().join(";"))
        .unwrap_or_default()
}

fn str_at<'a>(value: &'a Value, path: &[&str]) -> Option<&'a str> {
    path.iter()
        .try_fold(value, |current, key| current.get(*key))
        .and_then(Value::as_str)
}
