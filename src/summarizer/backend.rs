use crate::error::SummarizeError;
use crate::summarizer::config::BackendConfig;
use crate::summarizer::record::{NewSummary, PersistedSummary, SummaryRecord};
use crate::summarizer::session::{Session, User};
use anyhow::{Context, Result};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{COOKIE, SET_COOKIE};
use serde::Deserialize;
use std::time::Duration;

const MAX_ERROR_BODY_CHARS: usize = 2_000;

pub trait SummaryStore {
    fn create(&self, summary: &NewSummary) -> Result<SummaryRecord, SummarizeError>;
    fn list(&self) -> Result<Vec<SummaryRecord>, SummarizeError>;
}

pub struct HttpBackend {
    client: Client,
    base_url: String,
    cookie: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LoginBody {
    Wrapped { user: User },
    Bare(User),
}

impl HttpBackend {
    pub fn new(cfg: &BackendConfig, session: &Session) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(cfg.timeout_secs))
            .build()
            .context("failed to build backend http client")?;
        Ok(Self {
            client,
            base_url: cfg.base_url.trim_end_matches('/').to_string(),
            cookie: session.cookie_header(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn with_credentials(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.cookie {
            Some(cookie) => request.header(COOKIE, cookie),
            None => request,
        }
    }

    pub fn login(&self, email: &str, password: &str) -> Result<(User, Vec<String>)> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .context("login request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            anyhow::bail!("login rejected with status {}: {}", status, clip(&body));
        }

        let credentials = session_cookies(&response);
        let body: LoginBody = response.json().context("login response is not a user")?;
        let user = match body {
            LoginBody::Wrapped { user } => user,
            LoginBody::Bare(user) => user,
        };
        Ok((user, credentials))
    }

    pub fn logout(&self) -> Result<()> {
        let response = self
            .with_credentials(self.client.post(self.url("/auth/logout")))
            .send()
            .context("logout request failed")?;
        if !response.status().is_success() {
            anyhow::bail!("logout rejected with status {}", response.status());
        }
        Ok(())
    }
}

impl SummaryStore for HttpBackend {
    fn create(&self, summary: &NewSummary) -> Result<SummaryRecord, SummarizeError> {
        let response = self
            .with_credentials(self.client.post(self.url("/summarize")))
            .json(summary)
            .send()
            .map_err(SummarizeError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(SummarizeError::BackendPersist {
                status: status.as_u16(),
                body: clip(&body),
            });
        }

        let raw = response.text().map_err(SummarizeError::from_transport)?;
        let echo = match serde_json::from_str::<PersistedSummary>(&raw) {
            Ok(echo) => echo,
            Err(err) => {
                tracing::warn!(kind = "backend_echo", error = %err, "backend echo unreadable; using sent summary");
                PersistedSummary::default()
            }
        };
        Ok(echo.into_record(summary))
    }

    fn list(&self) -> Result<Vec<SummaryRecord>, SummarizeError> {
        let response = self
            .with_credentials(self.client.get(self.url("/summaries")))
            .send()
            .map_err(SummarizeError::from_transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(SummarizeError::HistoryFetch(format!("status {status}")));
        }
        response
            .json::<Vec<SummaryRecord>>()
            .map_err(|err| SummarizeError::HistoryFetch(format!("unreadable listing: {err}")))
    }
}

fn session_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(cookie_pair)
        .collect()
}

/// `sid=abc; Path=/; HttpOnly` -> `sid=abc`
fn cookie_pair(set_cookie: &str) -> Option<String> {
    let pair = set_cookie.split(';').next()?.trim();
    if pair.is_empty() || !pair.contains('=') {
        return None;
    }
    Some(pair.to_string())
}

fn clip(body: &str) -> String {
    body.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cookie_pair_drops_attributes() {
        assert_eq!(
            cookie_pair("sid=abc123; Path=/; HttpOnly; SameSite=Lax").as_deref(),
            Some("sid=abc123")
        );
        assert_eq!(cookie_pair("token=x").as_deref(), Some("token=x"));
        assert_eq!(cookie_pair("; Path=/"), None);
        assert_eq!(cookie_pair("garbage"), None);
    }

    #[test]
    fn login_body_accepts_wrapped_and_bare_user() {
        let wrapped: LoginBody =
            serde_json::from_str(r#"{"user":{"name":"Alice","email":"a@example.com"}}"#)
                .expect("wrapped");
        let bare: LoginBody =
            serde_json::from_str(r#"{"name":"Bob","email":"b@example.com"}"#).expect("bare");
        assert!(matches!(wrapped, LoginBody::Wrapped { user } if user.display_name() == "Alice"));
        assert!(matches!(bare, LoginBody::Bare(user) if user.display_name() == "Bob"));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let cfg = BackendConfig {
            base_url: "http://127.0.0.1:9/api/".into(),
            timeout_secs: 1,
        };
        let backend = HttpBackend::new(&cfg, &Session::anonymous()).expect("backend");
        assert_eq!(backend.url("/summaries"), "http://127.0.0.1:9/api/summaries");
        assert!(backend.cookie.is_none());
    }
}
