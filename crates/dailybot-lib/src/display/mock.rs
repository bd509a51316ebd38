//! Mock display provider implementation for testing
//!
//! Records every display call so tests can assert on what a command showed.

use super::providers::*;
use std::sync::{Arc, Mutex};

/// Mock implementation of DisplayProvider that records all calls
#[derive(Clone, Default)]
pub struct MockDisplayProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl MockDisplayProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded display calls for testing assertions
    pub fn get_calls(&self) -> Vec<DisplayCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Check if a specific call was made
    pub fn has_call(&self, expected: &DisplayCall) -> bool {
        self.get_calls().contains(expected)
    }

    /// Get count of calls of a specific type
    pub fn count_calls(&self, call_type: &str) -> usize {
        self.get_calls()
            .iter()
            .filter(|call| call.call_type() == call_type)
            .count()
    }

    /// Messages passed to `status().error`
    pub fn errors(&self) -> Vec<String> {
        self.get_calls()
            .into_iter()
            .filter_map(|call| match call {
                DisplayCall::StatusError { message } => Some(message),
                _ => None,
            })
            .collect()
    }

    /// Every piece of text shown, flattened, for substring assertions
    pub fn output(&self) -> String {
        self.get_calls()
            .iter()
            .map(DisplayCall::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Whether any displayed text contains `needle`
    pub fn shows(&self, needle: &str) -> bool {
        self.output().contains(needle)
    }
}

impl DisplayProvider for MockDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider> {
        Box::new(MockStatusProvider {
            calls: self.calls.clone(),
        })
    }

    fn progress(&self) -> Box<dyn ProgressProvider> {
        Box::new(MockProgressProvider {
            calls: self.calls.clone(),
        })
    }

    fn table(&self) -> Box<dyn StructuredProvider> {
        Box::new(MockStructuredProvider {
            calls: self.calls.clone(),
        })
    }
}

/// Recorded display call for testing
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayCall {
    // Status calls
    StatusSuccess { message: String },
    StatusError { message: String },
    StatusWarning { message: String },
    StatusInfo { message: String },
    StatusEmphasis { text: String },
    StatusList { items: Vec<String> },

    // Progress calls
    ProgressSpinner { message: String },
    ProgressFinishClear,

    // Structured calls
    StructuredTable {
        title: String,
        headers: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    StructuredProperties {
        title: String,
        pairs: Vec<(String, String)>,
    },
    StructuredPanel {
        title: String,
        lines: Vec<String>,
    },
}

impl DisplayCall {
    pub fn call_type(&self) -> &'static str {
        match self {
            DisplayCall::StatusSuccess { .. } => "status_success",
            DisplayCall::StatusError { .. } => "status_error",
            DisplayCall::StatusWarning { .. } => "status_warning",
            DisplayCall::StatusInfo { .. } => "status_info",
            DisplayCall::StatusEmphasis { .. } => "status_emphasis",
            DisplayCall::StatusList { .. } => "status_list",
            DisplayCall::ProgressSpinner { .. } => "progress_spinner",
            DisplayCall::ProgressFinishClear => "progress_finish_clear",
            DisplayCall::StructuredTable { .. } => "structured_table",
            DisplayCall::StructuredProperties { .. } => "structured_properties",
            DisplayCall::StructuredPanel { .. } => "structured_panel",
        }
    }

    /// Plain text carried by the call
    pub fn text(&self) -> String {
        match self {
            DisplayCall::StatusSuccess { message }
            | DisplayCall::StatusError { message }
            | DisplayCall::StatusWarning { message }
            | DisplayCall::StatusInfo { message }
            | DisplayCall::ProgressSpinner { message } => message.clone(),
            DisplayCall::StatusEmphasis { text } => text.clone(),
            DisplayCall::StatusList { items } => items.join("\n"),
            DisplayCall::ProgressFinishClear => String::new(),
            DisplayCall::StructuredTable {
                title,
                headers,
                rows,
            } => {
                let mut lines = vec![title.clone(), headers.join(" | ")];
                lines.extend(rows.iter().map(|row| row.join(" | ")));
                lines.join("\n")
            }
            DisplayCall::StructuredProperties { title, pairs } => {
                let mut lines = vec![title.clone()];
                lines.extend(pairs.iter().map(|(k, v)| format!("{k}: {v}")));
                lines.join("\n")
            }
            DisplayCall::StructuredPanel { title, lines } => {
                let mut all = vec![title.clone()];
                all.extend(lines.iter().cloned());
                all.join("\n")
            }
        }
    }
}

fn record(calls: &Arc<Mutex<Vec<DisplayCall>>>, call: DisplayCall) {
    calls.lock().unwrap().push(call);
}

/// Mock status provider
struct MockStatusProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl StatusProvider for MockStatusProvider {
    fn success(&self, message: &str) {
        record(&self.calls, DisplayCall::StatusSuccess { message: message.to_string() });
    }

    fn error(&self, message: &str) {
        record(&self.calls, DisplayCall::StatusError { message: message.to_string() });
    }

    fn warning(&self, message: &str) {
        record(&self.calls, DisplayCall::StatusWarning { message: message.to_string() });
    }

    fn info(&self, message: &str) {
        record(&self.calls, DisplayCall::StatusInfo { message: message.to_string() });
    }

    fn emphasis(&self, text: &str) {
        record(&self.calls, DisplayCall::StatusEmphasis { text: text.to_string() });
    }

    fn list(&self, items: &[&str]) {
        record(
            &self.calls,
            DisplayCall::StatusList {
                items: items.iter().map(|s| s.to_string()).collect(),
            },
        );
    }
}

/// Mock progress provider
struct MockProgressProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl ProgressProvider for MockProgressProvider {
    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker> {
        record(&self.calls, DisplayCall::ProgressSpinner { message: message.to_string() });
        Box::new(MockProgressTracker {
            calls: self.calls.clone(),
        })
    }
}

/// Mock progress tracker
struct MockProgressTracker {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl ProgressTracker for MockProgressTracker {
    fn finish_clear(&self) {
        record(&self.calls, DisplayCall::ProgressFinishClear);
    }
}

/// Mock structured provider
struct MockStructuredProvider {
    calls: Arc<Mutex<Vec<DisplayCall>>>,
}

impl StructuredProvider for MockStructuredProvider {
    fn table(&self, title: &str, headers: &[&str], rows: &[Vec<String>]) {
        record(
            &self.calls,
            DisplayCall::StructuredTable {
                title: title.to_string(),
                headers: headers.iter().map(|h| h.to_string()).collect(),
                rows: rows.to_vec(),
            },
        );
    }

    fn properties(&self, title: &str, pairs: &[(&str, &str)]) {
        record(
            &self.calls,
            DisplayCall::StructuredProperties {
                title: title.to_string(),
                pairs: pairs
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            },
        );
    }

    fn panel(&self, title: &str, lines: &[String]) {
        record(
            &self.calls,
            DisplayCall::StructuredPanel {
                title: title.to_string(),
                lines: lines.to_vec(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    include!("mock.test.rs");
}
