use thiserror::Error;

/// `HistoryFetch` comes only from the reload step and is never returned by
/// `Summarizer::summarize`.
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("ai service returned status {status}: {body}")]
    AiService { status: u16, body: String },
    #[error("ai response missing generated text: {0}")]
    InvalidAiResponse(String),
    #[error("backend rejected summary with status {status}: {body}")]
    BackendPersist { status: u16, body: String },
    #[error("backend history listing failed: {0}")]
    HistoryFetch(String),
    #[error("network failure: {0}")]
    Network(String),
    #[error("request timed out: {0}")]
    Timeout(String),
}

impl SummarizeError {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::AiService { .. } => "ai_service",
            Self::InvalidAiResponse(_) => "invalid_ai_response",
            Self::BackendPersist { .. } => "backend_persist",
            Self::HistoryFetch(_) => "history_fetch",
            Self::Network(_) => "network",
            Self::Timeout(_) => "timeout",
        }
    }

    pub fn advisory(&self) -> &'static str {
        match self {
            Self::AiService { .. } => {
                "The AI service is unavailable right now. Please try again later."
            }
            Self::InvalidAiResponse(_) => {
                "The AI service returned an unusable response. Please try again."
            }
            Self::BackendPersist { .. } => {
                "The summary was generated but could not be saved. Please try again."
            }
            Self::HistoryFetch(_) => "Could not refresh the summary history.",
            Self::Network(_) | Self::Timeout(_) => {
                "Could not reach the server. Check your connection and try again."
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SummarizeError;

    #[test]
    fn advisories_distinguish_failed_half() {
        let ai = SummarizeError::AiService {
            status: 500,
            body: String::new(),
        };
        let save = SummarizeError::BackendPersist {
            status: 503,
            body: String::new(),
        };
        let malformed = SummarizeError::InvalidAiResponse("empty choices".into());
        let net = SummarizeError::Network("refused".into());

        let all = [ai.advisory(), save.advisory(), malformed.advisory(), net.advisory()];
        for (i, a) in all.iter().enumerate() {
            for b in &all[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn timeout_shares_connectivity_advisory() {
        let timeout = SummarizeError::Timeout("45s".into());
        let net = SummarizeError::Network("reset".into());
        assert_eq!(timeout.advisory(), net.advisory());
        assert_eq!(timeout.kind(), "timeout");
    }
}
