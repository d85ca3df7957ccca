use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SummarizerPaths {
    pub home: PathBuf,
    pub config_file: PathBuf,
    pub session_file: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<SummarizerPaths> {
    let home = match env::var("SUMMARIZER_HOME") {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => required_home_dir()?.join(".ai-summarizer"),
    };

    let config_file = env_or_default_path("SUMMARIZER_CONFIG_PATH", home.join("config.toml"));
    let session_file = env_or_default_path("SUMMARIZER_SESSION_FILE", home.join("session.json"));

    Ok(SummarizerPaths {
        home,
        config_file,
        session_file,
    })
}
