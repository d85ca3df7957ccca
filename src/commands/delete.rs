use anyhow::Result;

use crate::commands::{CommandReport, ensure_admitted, load_context};
use crate::summarizer::history::{DeleteOutcome, request_delete};

#[derive(Debug, Clone)]
pub struct DeleteOptions {
    pub id: String,
}

pub fn run(opts: &DeleteOptions) -> Result<CommandReport> {
    let ctx = load_context()?;
    let mut report = CommandReport::new("delete");
    if !ensure_admitted(&ctx.session, &mut report) {
        return Ok(report);
    }

    let id = opts.id.trim();
    if id.is_empty() {
        report.issue("summary id cannot be empty");
        return Ok(report);
    }

    match request_delete(id) {
        DeleteOutcome::NotImplemented => {
            report.detail(format!("delete.requested={id}"));
            report.detail("delete.status=not_implemented (no change made)");
        }
    }
    Ok(report)
}
