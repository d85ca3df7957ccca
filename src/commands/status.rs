use anyhow::Result;
use std::env;

use crate::commands::{CommandReport, load_context};
use crate::summarizer::session::{GateVerdict, gate};

include!(concat!(env!("OUT_DIR"), "/summarizer_env_allowlist.rs"));

fn is_secret_key(key: &str) -> bool {
    key.contains("KEY") || key.contains("PASSWORD") || key.contains("TOKEN")
}

pub fn env_overrides(keys: &[&str], lookup: impl Fn(&str) -> Option<String>) -> Vec<String> {
    keys.iter()
        .filter_map(|key| {
            let value = lookup(*key)?;
            let shown = if is_secret_key(key) {
                "***".to_string()
            } else {
                value
            };
            Some(format!("env.{key}={shown}"))
        })
        .collect()
}

pub fn run() -> Result<CommandReport> {
    let ctx = load_context()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("build_id={}", env!("BUILD_ID")));
    report.detail(format!("home={}", ctx.paths.home.display()));
    report.detail(format!("config_file={}", ctx.paths.config_file.display()));
    report.detail(format!("session_file={}", ctx.paths.session_file.display()));
    report.detail(format!("backend.base_url={}", ctx.config.backend.base_url));
    report.detail(format!("backend.timeout_secs={}", ctx.config.backend.timeout_secs));
    report.detail(format!("ai.endpoint={}", ctx.config.ai.endpoint));
    report.detail(format!("ai.model={}", ctx.config.ai.model));
    report.detail(format!("ai.timeout_secs={}", ctx.config.ai.timeout_secs));
    report.detail(format!("ai.dry_run={}", ctx.config.ai.dry_run));
    report.detail(format!(
        "history.max_display_chars={}",
        ctx.config.history.max_display_chars
    ));
    report.detail(format!(
        "history.timezone={}",
        ctx.config.history.timezone.as_deref().unwrap_or("local")
    ));

    let session_state = match gate(&ctx.session) {
        GateVerdict::Admit => "authenticated",
        GateVerdict::Redirect { .. } => "anonymous",
        GateVerdict::Loading => "unresolved",
    };
    report.detail(format!("session={session_state}"));

    for line in env_overrides(GENERATED_SUMMARIZER_ENV_ALLOWLIST, |key| {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }) {
        report.detail(line);
    }

    let has_key = ctx
        .config
        .ai
        .api_key
        .as_deref()
        .is_some_and(|k| !k.trim().is_empty());
    if !has_key && !ctx.config.ai.dry_run {
        report.issue("ai api key missing (SUMMARIZER_AI_API_KEY); only --dry-run summaries will work");
    }

    Ok(report)
}
