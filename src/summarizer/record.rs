use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend-assigned identifier. Backends differ on whether ids are strings or
/// integers, so both are accepted and treated as opaque.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{n}"),
            RecordId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRecord {
    pub id: RecordId,
    pub input_text: String,
    #[serde(default)]
    pub summary_text: String,
    #[serde(default)]
    pub model_used: String,
    #[serde(default)]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSummary {
    pub input_text: String,
    pub summary_text: String,
    pub model_used: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedSummary {
    pub id: Option<RecordId>,
    pub input_text: Option<String>,
    pub summary_text: Option<String>,
    pub model_used: Option<String>,
    pub created_at: Option<String>,
}

impl PersistedSummary {
    pub fn into_record(self, sent: &NewSummary) -> SummaryRecord {
        let summary_text = self
            .summary_text
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| sent.summary_text.clone());
        SummaryRecord {
            id: self.id.unwrap_or(RecordId::Text(String::new())),
            input_text: self.input_text.unwrap_or_else(|| sent.input_text.clone()),
            summary_text,
            model_used: self.model_used.unwrap_or_else(|| sent.model_used.clone()),
            created_at: self.created_at.unwrap_or_default(),
        }
    }
}
