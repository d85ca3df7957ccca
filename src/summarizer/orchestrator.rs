use crate::error::SummarizeError;
use crate::summarizer::backend::SummaryStore;
use crate::summarizer::completion::{Completer, build_prompt};
use crate::summarizer::record::{NewSummary, SummaryRecord};

const PLACEHOLDER_PREVIEW_CHARS: usize = 50;

pub enum SummaryMode {
    Ai(Box<dyn Completer>),
    DryRun,
}

impl SummaryMode {
    pub fn is_dry_run(&self) -> bool {
        matches!(self, SummaryMode::DryRun)
    }
}

pub fn placeholder_summary(input_text: &str) -> String {
    let preview: String = input_text.chars().take(PLACEHOLDER_PREVIEW_CHARS).collect();
    let ellipsis = if input_text.chars().count() > PLACEHOLDER_PREVIEW_CHARS {
        "..."
    } else {
        ""
    };
    format!("Test summary for: \"{preview}{ellipsis}\"")
}

/// Owns the displayed summary and the cached history. Only `reload_history`
/// writes the cache.
pub struct Summarizer {
    mode: SummaryMode,
    store: Box<dyn SummaryStore>,
    displayed_summary: String,
    history: Vec<SummaryRecord>,
}

impl Summarizer {
    pub fn new(mode: SummaryMode, store: Box<dyn SummaryStore>) -> Self {
        Self {
            mode,
            store,
            displayed_summary: String::new(),
            history: Vec::new(),
        }
    }

    pub fn displayed_summary(&self) -> &str {
        &self.displayed_summary
    }

    pub fn history(&self) -> &[SummaryRecord] {
        &self.history
    }

    pub fn is_dry_run(&self) -> bool {
        self.mode.is_dry_run()
    }

    /// Blank input returns `Ok(None)` without touching the network or the
    /// displayed summary. The reload after a successful persist never affects
    /// the returned value.
    pub fn summarize(
        &mut self,
        input_text: &str,
        model: &str,
    ) -> Result<Option<SummaryRecord>, SummarizeError> {
        if input_text.trim().is_empty() {
            return Ok(None);
        }
        self.displayed_summary.clear();

        let generated = self.generate(input_text, model)?;
        tracing::debug!(model, chars = generated.chars().count(), "summary generated");

        let sent = NewSummary {
            input_text: input_text.to_string(),
            summary_text: generated,
            model_used: model.to_string(),
        };
        let record = self.store.create(&sent)?;
        self.displayed_summary = record.summary_text.clone();
        tracing::info!(id = %record.id, model, "summary persisted");

        if let Err(err) = self.reload_history() {
            tracing::warn!(kind = err.kind(), error = %err, "history reload after summarize failed");
        }

        Ok(Some(record))
    }

    fn generate(&self, input_text: &str, model: &str) -> Result<String, SummarizeError> {
        match &self.mode {
            SummaryMode::DryRun => Ok(placeholder_summary(input_text)),
            SummaryMode::Ai(completer) => completer.complete(model, &build_prompt(input_text)),
        }
    }

    pub fn reload_history(&mut self) -> Result<usize, SummarizeError> {
        let records = self.store.list()?;
        self.history = records;
        Ok(self.history.len())
    }
}
