use anyhow::Result;

use crate::commands::{CommandReport, ensure_admitted, load_context};

pub fn run() -> Result<CommandReport> {
    let ctx = load_context()?;
    let mut report = CommandReport::new("whoami");
    if !ensure_admitted(&ctx.session, &mut report) {
        return Ok(report);
    }

    if let Some(user) = &ctx.session.user {
        report.emit(format!("Welcome, {}", user.display_name()));
        if let Some(email) = &user.email {
            report.detail(format!("email={email}"));
        }
    }
    Ok(report)
}
