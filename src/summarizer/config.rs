use anyhow::{Result, anyhow};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

pub const DEFAULT_MODEL: &str = "deepseek/deepseek-chat-v3-0324:free";
pub const DEFAULT_AI_ENDPOINT: &str = "https://openrouter.ai/api/v1/chat/completions";
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:5000/api";
pub const DEFAULT_MAX_DISPLAY_CHARS: usize = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub endpoint: String,
    pub model: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub referer: Option<String>,
    pub title: String,
    pub timeout_secs: u64,
    pub dry_run: bool,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_AI_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            referer: None,
            title: "AI Summarizer".to_string(),
            timeout_secs: 45,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_display_chars: usize,
    pub timezone: Option<String>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_display_chars: DEFAULT_MAX_DISPLAY_CHARS,
            timezone: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SummarizerConfig {
    pub backend: BackendConfig,
    pub ai: AiConfig,
    pub history: HistoryConfig,
}

impl SummarizerConfig {
    pub fn timezone(&self) -> Option<Tz> {
        self.history
            .timezone
            .as_deref()
            .and_then(|name| name.trim().parse::<Tz>().ok())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialSummarizerConfig {
    backend: Option<BackendConfig>,
    ai: Option<AiConfig>,
    history: Option<HistoryConfig>,
}

fn env_non_empty(var: &str) -> Option<String> {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => Some(v.trim().to_string()),
        _ => None,
    }
}

fn env_or_u64(var: &str, fallback: u64) -> u64 {
    match env::var(var) {
        Ok(v) => v.trim().parse::<u64>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_usize(var: &str, fallback: usize) -> usize {
    match env::var(var) {
        Ok(v) => v.trim().parse::<usize>().ok().unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "on" => Some(true),
        "0" | "false" | "FALSE" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn env_or_bool(var: &str, fallback: bool) -> bool {
    match env::var(var) {
        Ok(v) => parse_bool(&v).unwrap_or(fallback),
        Err(_) => fallback,
    }
}

fn env_or_string(var: &str, fallback: &str) -> String {
    env_non_empty(var).unwrap_or_else(|| fallback.to_string())
}

fn is_http_url(raw: &str) -> bool {
    let lower = raw.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn validate(cfg: &SummarizerConfig) -> Result<()> {
    if !is_http_url(&cfg.backend.base_url) {
        return Err(anyhow!(
            "invalid backend base url `{}`: must start with http:// or https://",
            cfg.backend.base_url
        ));
    }
    if !is_http_url(&cfg.ai.endpoint) {
        return Err(anyhow!(
            "invalid ai endpoint `{}`: must start with http:// or https://",
            cfg.ai.endpoint
        ));
    }
    if cfg.ai.model.trim().is_empty() {
        return Err(anyhow!("invalid ai model: cannot be empty"));
    }
    if cfg.backend.timeout_secs == 0 {
        return Err(anyhow!("invalid backend timeout: must be >= 1 second"));
    }
    if cfg.ai.timeout_secs == 0 {
        return Err(anyhow!("invalid ai timeout: must be >= 1 second"));
    }
    if cfg.history.max_display_chars == 0 {
        return Err(anyhow!("invalid history max display chars: must be >= 1"));
    }
    if let Some(name) = cfg.history.timezone.as_deref()
        && name.trim().parse::<Tz>().is_err()
    {
        return Err(anyhow!("invalid history timezone `{name}`: use an IANA name"));
    }
    Ok(())
}

fn merge_toml(base: &mut SummarizerConfig, raw: &str, origin: &Path) -> Result<()> {
    let parsed: PartialSummarizerConfig = toml::from_str(raw)
        .map_err(|err| anyhow!("failed to parse summarizer config {}: {err}", origin.display()))?;
    if let Some(backend) = parsed.backend {
        base.backend = backend;
    }
    if let Some(ai) = parsed.ai {
        base.ai = ai;
    }
    if let Some(history) = parsed.history {
        base.history = history;
    }
    Ok(())
}

fn merge_file_config(base: &mut SummarizerConfig, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }
    let raw = fs::read_to_string(path)?;
    merge_toml(base, &raw, path)
}

fn merge_env(cfg: &mut SummarizerConfig) {
    cfg.backend.base_url = env_or_string("SUMMARIZER_BACKEND_URL", &cfg.backend.base_url);
    cfg.backend.timeout_secs =
        env_or_u64("SUMMARIZER_BACKEND_TIMEOUT_SECS", cfg.backend.timeout_secs);

    cfg.ai.endpoint = env_or_string("SUMMARIZER_AI_URL", &cfg.ai.endpoint);
    cfg.ai.model = env_or_string("SUMMARIZER_MODEL", &cfg.ai.model);
    if let Some(key) =
        env_non_empty("SUMMARIZER_AI_API_KEY").or_else(|| env_non_empty("OPENROUTER_API_KEY"))
    {
        cfg.ai.api_key = Some(key);
    }
    if let Some(referer) = env_non_empty("SUMMARIZER_AI_REFERER") {
        cfg.ai.referer = Some(referer);
    }
    cfg.ai.title = env_or_string("SUMMARIZER_AI_TITLE", &cfg.ai.title);
    cfg.ai.timeout_secs = env_or_u64("SUMMARIZER_AI_TIMEOUT_SECS", cfg.ai.timeout_secs);
    cfg.ai.dry_run = env_or_bool("SUMMARIZER_DRY_RUN", cfg.ai.dry_run);

    cfg.history.max_display_chars = env_or_usize(
        "SUMMARIZER_HISTORY_MAX_CHARS",
        cfg.history.max_display_chars,
    );
    if let Some(tz) = env_non_empty("SUMMARIZER_TIMEZONE") {
        cfg.history.timezone = Some(tz);
    }
}

pub fn load_config(config_file: &Path) -> Result<SummarizerConfig> {
    let mut cfg = SummarizerConfig::default();
    merge_file_config(&mut cfg, config_file)?;
    merge_env(&mut cfg);

    validate(&cfg)?;
    Ok(cfg)
}
