use anyhow::Result;

use crate::commands::{CommandReport, load_context};
use crate::summarizer::backend::HttpBackend;
use crate::summarizer::session;

pub fn run() -> Result<CommandReport> {
    let ctx = load_context()?;
    let mut report = CommandReport::new("logout");

    if ctx.session.user.is_some() {
        let backend = HttpBackend::new(&ctx.config.backend, &ctx.session)?;
        if let Err(err) = backend.logout() {
            tracing::warn!(kind = "logout", error = %err, "backend logout failed; clearing local session anyway");
            report.detail("backend.logout=failed");
        } else {
            report.detail("backend.logout=ok");
        }
    }

    let removed = session::clear(&ctx.paths.session_file)?;
    report.detail(format!("session.cleared={removed}"));
    Ok(report)
}
