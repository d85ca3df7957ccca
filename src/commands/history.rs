use anyhow::Result;

use crate::commands::{CommandReport, ensure_admitted, load_context};
use crate::summarizer::backend::{HttpBackend, SummaryStore};
use crate::summarizer::history::{HistoryRow, HistoryView};

#[derive(Debug, Clone, Default)]
pub struct HistoryOptions {
    pub search: Option<String>,
    pub max_chars: Option<usize>,
    pub full: bool,
}

fn render_row(row: &HistoryRow, full: bool) -> String {
    let (input, summary) = if full {
        (&row.input_text, &row.summary_text)
    } else {
        (&row.input_preview, &row.summary_preview)
    };
    format!(
        "[{}] #{} ({})\n  input:   {}\n  summary: {}",
        row.created, row.id, row.model_used, input, summary
    )
}

pub fn run(opts: &HistoryOptions) -> Result<CommandReport> {
    let ctx = load_context()?;
    let mut report = CommandReport::new("history");
    if !ensure_admitted(&ctx.session, &mut report) {
        return Ok(report);
    }

    let store = HttpBackend::new(&ctx.config.backend, &ctx.session)?;
    let records = match store.list() {
        Ok(records) => records,
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "history fetch failed");
            report.detail(format!("error.cause={err}"));
            report.issue(err.advisory());
            return Ok(report);
        }
    };

    let max_chars = opts
        .max_chars
        .filter(|n| *n > 0)
        .unwrap_or(ctx.config.history.max_display_chars);
    let view = HistoryView::new(&records, max_chars, ctx.config.timezone())
        .with_search(opts.search.clone().unwrap_or_default());

    let rows = view.rows();
    for row in &rows {
        report.emit(render_row(row, opts.full));
    }
    if let Some(notice) = view.notice() {
        report.emit(notice);
    }
    report.detail(view.counter());
    report.attach(serde_json::to_value(&rows)?);

    Ok(report)
}
