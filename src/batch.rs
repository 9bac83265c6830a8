//! Sequential batch execution with per-item accounting.
//!
//! Bulk actions run one backend call at a time so every item gets its own
//! outcome. Nothing is rolled back: a partially applied batch leaves whatever
//! the successful calls produced.

use std::fmt::Display;

use serde::Serialize;

/// Work item prepared for a batch, or the reason it is skipped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchStep<T> {
    Run(T),
    Skip(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum BatchOutcome {
    Succeeded,
    Failed(String),
    Skipped(String),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BatchItemResult {
    pub key: String,
    pub outcome: BatchOutcome,
}

/// Per-item results of a batch, in submission order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub results: Vec<BatchItemResult>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Succeeded))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, BatchOutcome::Skipped(_)))
    }

    fn count(&self, pred: impl Fn(&BatchOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }

    /// Items that failed with their error message.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &str)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            BatchOutcome::Failed(reason) => Some((r.key.as_str(), reason.as_str())),
            _ => None,
        })
    }

    /// One-line summary shown to the operator after the sweep.
    pub fn summary(&self) -> String {
        let mut summary = format!("{} succeeded, {} failed", self.succeeded(), self.failed());
        if self.skipped() > 0 {
            summary.push_str(&format!(", {} skipped", self.skipped()));
        }
        summary
    }
}

/// Runs `op` for each runnable step strictly one after another.
pub fn run_sequential<T, E, I, F>(steps: I, mut op: F) -> BatchReport
where
    I: IntoIterator<Item = (String, BatchStep<T>)>,
    F: FnMut(T) -> Result<(), E>,
    E: Display,
{
    let results = steps
        .into_iter()
        .map(|(key, step)| {
            let outcome = match step {
                BatchStep::Skip(reason) => BatchOutcome::Skipped(reason),
                BatchStep::Run(item) => match op(item) {
                    Ok(()) => BatchOutcome::Succeeded,
                    Err(err) => BatchOutcome::Failed(err.to_string()),
                },
            };
            BatchItemResult { key, outcome }
        })
        .collect();
    BatchReport { results }
}
