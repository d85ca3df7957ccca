#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::time::Duration;

use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: &'static str,
    pub status: u16,
    pub body: String,
    pub headers: Vec<(String, String)>,
    pub delay: Option<Duration>,
}

impl Route {
    pub fn json(method: &'static str, path: &'static str, status: u16, body: &str) -> Self {
        Self {
            method,
            path,
            status,
            body: body.to_string(),
            headers: Vec::new(),
            delay: None,
        }
    }

    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn template(&self) -> ResponseTemplate {
        let mut template = ResponseTemplate::new(self.status)
            .set_body_raw(self.body.clone().into_bytes(), "application/json");
        for (name, value) in &self.headers {
            template = template.insert_header(name.as_str(), value.as_str());
        }
        if let Some(delay) = self.delay {
            template = template.set_delay(delay);
        }
        template
    }
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl Recorded {
    fn from_request(req: &Request) -> Self {
        Self {
            method: req.method.as_str().to_string(),
            path: req.url.path().to_string(),
            headers: req
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect(),
            body: String::from_utf8_lossy(&req.body).to_string(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// wiremock server driven from synchronous tests. Unmatched requests get 404.
pub struct FakeServer {
    runtime: Runtime,
    server: MockServer,
}

impl FakeServer {
    pub fn start(routes: Vec<Route>) -> Self {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        let server = runtime.block_on(async {
            let server = MockServer::start().await;
            for route in &routes {
                Mock::given(method(route.method))
                    .and(path(route.path))
                    .respond_with(route.template())
                    .mount(&server)
                    .await;
            }
            server
        });
        Self { runtime, server }
    }

    pub fn backend_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    pub fn ai_url(&self) -> String {
        format!("{}/ai/chat/completions", self.server.uri())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.runtime
            .block_on(self.server.received_requests())
            .unwrap_or_default()
            .iter()
            .map(Recorded::from_request)
            .collect()
    }

    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }
}

/// Base URL on a port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{port}/api")
}

pub fn write_session(home: &Path) {
    fs::create_dir_all(home).expect("mkdir home");
    fs::write(
        home.join("session.json"),
        r#"{"user":{"name":"Alice","email":"alice@example.com"},"credentials":["sid=abc"]}"#,
    )
    .expect("write session");
}

pub fn summarizer_cmd(home: &Path, server: &FakeServer) -> assert_cmd::Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("summarizer");
    cmd.current_dir(home)
        .env("SUMMARIZER_HOME", home)
        .env("SUMMARIZER_BACKEND_URL", server.backend_url())
        .env("SUMMARIZER_AI_URL", server.ai_url())
        .env("SUMMARIZER_TIMEZONE", "UTC")
        .env_remove("SUMMARIZER_AI_API_KEY")
        .env_remove("OPENROUTER_API_KEY")
        .env_remove("SUMMARIZER_MODEL")
        .env_remove("SUMMARIZER_DRY_RUN")
        .env_remove("SUMMARIZER_CONFIG_PATH")
        .env_remove("SUMMARIZER_SESSION_FILE");
    for proxy in [
        "HTTP_PROXY",
        "HTTPS_PROXY",
        "ALL_PROXY",
        "http_proxy",
        "https_proxy",
        "all_proxy",
    ] {
        cmd.env_remove(proxy);
    }
    cmd
}
