use crate::summarizer::record::{RecordId, SummaryRecord};
use chrono::{DateTime, Local, NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::Serialize;

pub const ELLIPSIS: &str = "...";
const TIMESTAMP_FORMAT: &str = "%d %b %Y, %H:%M";

/// A blank term keeps everything. Any other term is matched as typed,
/// surrounding spaces included.
pub fn filter_records<'a>(records: &'a [SummaryRecord], term: &str) -> Vec<&'a SummaryRecord> {
    if term.trim().is_empty() {
        return records.iter().collect();
    }
    let needle = term.to_lowercase();
    records
        .iter()
        .filter(|record| {
            record.input_text.to_lowercase().contains(&needle)
                || record.summary_text.to_lowercase().contains(&needle)
        })
        .collect()
}

pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str(ELLIPSIS);
    out
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
}

pub fn format_timestamp(raw: &str, tz: Option<Tz>) -> String {
    let Some(at) = parse_timestamp(raw) else {
        return raw.to_string();
    };
    match tz {
        Some(tz) => at.with_timezone(&tz).format(TIMESTAMP_FORMAT).to_string(),
        None => at.with_timezone(&Local).format(TIMESTAMP_FORMAT).to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRow {
    pub id: RecordId,
    pub created: String,
    pub input_preview: String,
    pub input_text: String,
    pub summary_preview: String,
    pub summary_text: String,
    pub model_used: String,
}

pub struct HistoryView<'a> {
    records: &'a [SummaryRecord],
    search: String,
    max_chars: usize,
    tz: Option<Tz>,
}

impl<'a> HistoryView<'a> {
    pub fn new(records: &'a [SummaryRecord], max_chars: usize, tz: Option<Tz>) -> Self {
        Self {
            records,
            search: String::new(),
            max_chars,
            tz,
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = term.into();
        self
    }

    pub fn visible(&self) -> Vec<&'a SummaryRecord> {
        filter_records(self.records, &self.search)
    }

    pub fn rows(&self) -> Vec<HistoryRow> {
        self.visible()
            .into_iter()
            .map(|record| HistoryRow {
                id: record.id.clone(),
                created: format_timestamp(&record.created_at, self.tz),
                input_preview: truncate_text(&record.input_text, self.max_chars),
                input_text: record.input_text.clone(),
                summary_preview: truncate_text(&record.summary_text, self.max_chars),
                summary_text: record.summary_text.clone(),
                model_used: record.model_used.clone(),
            })
            .collect()
    }

    pub fn counter(&self) -> String {
        format!(
            "showing {} of {} summaries",
            self.visible().len(),
            self.records.len()
        )
    }

    pub fn notice(&self) -> Option<String> {
        if self.records.is_empty() {
            return Some("No summaries yet. Create your first summary!".to_string());
        }
        if !self.search.trim().is_empty() && self.visible().is_empty() {
            return Some(format!("No results found for \"{}\"", self.search));
        }
        None
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    NotImplemented,
}

pub fn request_delete(id: &str) -> DeleteOutcome {
    tracing::info!(id, "delete requested; not implemented, no change made");
    DeleteOutcome::NotImplemented
}
