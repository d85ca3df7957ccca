use anyhow::{Context, Result};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;

use crate::commands::{CommandReport, ensure_admitted, load_context};
use crate::summarizer::backend::HttpBackend;
use crate::summarizer::completion::ChatCompleter;
use crate::summarizer::orchestrator::{Summarizer, SummaryMode};

#[derive(Debug, Clone, Default)]
pub struct SummarizeOptions {
    pub text: Option<String>,
    pub file: Option<PathBuf>,
    pub model: Option<String>,
    pub dry_run: bool,
}

fn read_input(opts: &SummarizeOptions) -> Result<String> {
    if let Some(text) = &opts.text {
        return Ok(text.clone());
    }
    if let Some(path) = &opts.file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("failed to read stdin")?;
    Ok(buf)
}

pub fn run(opts: &SummarizeOptions) -> Result<CommandReport> {
    let ctx = load_context()?;
    let mut report = CommandReport::new("summarize");
    if !ensure_admitted(&ctx.session, &mut report) {
        return Ok(report);
    }

    let input = read_input(opts)?;
    if input.trim().is_empty() {
        report.detail("input.blank=true (nothing submitted)");
        return Ok(report);
    }
    let model = opts
        .model
        .clone()
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| ctx.config.ai.model.clone());
    let dry_run = opts.dry_run || ctx.config.ai.dry_run;

    let mode = if dry_run {
        SummaryMode::DryRun
    } else {
        match ChatCompleter::from_config(&ctx.config.ai) {
            Ok(completer) => SummaryMode::Ai(Box::new(completer)),
            Err(err) => {
                report.issue(format!("{err:#}"));
                return Ok(report);
            }
        }
    };
    let store = HttpBackend::new(&ctx.config.backend, &ctx.session)?;
    let mut summarizer = Summarizer::new(mode, Box::new(store));

    report.detail(format!("model={model}"));
    report.detail(format!("dry_run={}", summarizer.is_dry_run()));

    match summarizer.summarize(&input, &model) {
        Ok(Some(record)) => {
            report.emit(summarizer.displayed_summary().to_string());
            report.detail(format!("id={}", record.id));
            report.detail(format!("history.count={}", summarizer.history().len()));
            report.attach(serde_json::to_value(&record)?);
        }
        Ok(None) => report.detail("input.blank=true (nothing submitted)"),
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "summarize failed");
            report.detail(format!("error.kind={}", err.kind()));
            report.detail(format!("error.cause={err}"));
            report.issue(err.advisory());
        }
    }

    Ok(report)
}
