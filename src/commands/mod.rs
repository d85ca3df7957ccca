pub mod delete;
pub mod history;
pub mod login;
pub mod logout;
pub mod status;
pub mod summarize;
pub mod whoami;

use anyhow::Result;
use serde::Serialize;
use serde_json::Value;

use crate::summarizer::config::{SummarizerConfig, load_config};
use crate::summarizer::paths::{SummarizerPaths, resolve_paths};
use crate::summarizer::session::{self, GateVerdict, Session, gate};

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub body: Vec<String>,
    pub details: Vec<String>,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            body: Vec::new(),
            details: Vec::new(),
            issues: Vec::new(),
            data: None,
        }
    }

    pub fn emit(&mut self, text: impl Into<String>) {
        self.body.push(text.into());
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }

    pub fn attach(&mut self, data: Value) {
        self.data = Some(data);
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    pub paths: SummarizerPaths,
    pub config: SummarizerConfig,
    pub session: Session,
}

pub fn load_context() -> Result<AppContext> {
    let paths = resolve_paths()?;
    let config = load_config(&paths.config_file)?;
    let session = session::load(&paths.session_file)?;
    Ok(AppContext {
        paths,
        config,
        session,
    })
}

pub fn ensure_admitted(session: &Session, report: &mut CommandReport) -> bool {
    match gate(session) {
        GateVerdict::Admit => true,
        GateVerdict::Loading => {
            report.issue("session not resolved yet; try again");
            false
        }
        GateVerdict::Redirect { to } => {
            report.detail(format!("redirect={to}"));
            report.issue("not logged in; run `summarizer login --email <EMAIL> --password <PASSWORD>`");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarizer::session::{Loading, User};

    #[test]
    fn anonymous_session_is_redirected() {
        let mut report = CommandReport::new("history");
        assert!(!ensure_admitted(&Session::anonymous(), &mut report));
        assert!(!report.ok);
        assert!(report.details.contains(&"redirect=/login".to_string()));
    }

    #[test]
    fn unresolved_session_is_held() {
        let mut report = CommandReport::new("history");
        let session = Session {
            loading: Loading::Unknown,
            ..Session::default()
        };
        assert!(!ensure_admitted(&session, &mut report));
        assert!(report.issues[0].contains("not resolved"));
    }

    #[test]
    fn authenticated_session_passes_without_issues() {
        let mut report = CommandReport::new("history");
        let user = User {
            name: Some("Alice".into()),
            email: None,
        };
        assert!(ensure_admitted(&Session::authenticated(user, Vec::new()), &mut report));
        assert!(report.ok);
        assert!(report.issues.is_empty());
    }
}
