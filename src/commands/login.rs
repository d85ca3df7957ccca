use anyhow::Result;

use crate::commands::{CommandReport, load_context};
use crate::summarizer::backend::HttpBackend;
use crate::summarizer::session::{self, Session};

#[derive(Debug, Clone)]
pub struct LoginOptions {
    pub email: String,
    pub password: String,
}

pub fn run(opts: &LoginOptions) -> Result<CommandReport> {
    let ctx = load_context()?;
    let mut report = CommandReport::new("login");

    let email = opts.email.trim();
    if email.is_empty() || opts.password.is_empty() {
        report.issue("email and password are required");
        return Ok(report);
    }

    let backend = HttpBackend::new(&ctx.config.backend, &Session::anonymous())?;
    let (user, credentials) = match backend.login(email, &opts.password) {
        Ok(out) => out,
        Err(err) => {
            report.issue(format!("login failed: {err:#}"));
            return Ok(report);
        }
    };
    if credentials.is_empty() {
        tracing::warn!(kind = "login", "backend set no session cookie");
    }

    let session = Session::authenticated(user, credentials);
    session::save(&ctx.paths.session_file, &session)?;

    if let Some(user) = &session.user {
        report.emit(format!("Welcome, {}", user.display_name()));
    }
    report.detail(format!("session_file={}", ctx.paths.session_file.display()));
    report.detail(format!("credentials={}", session.credentials.len()));
    Ok(report)
}
