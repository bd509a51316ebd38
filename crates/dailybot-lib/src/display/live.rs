//! Live display provider implementation
//!
//! Regular output goes to stdout, errors and spinners to stderr.

use super::providers::*;
use super::structured::{format_properties, format_table};
use super::styling::StyleManager;
use crate::primitives::ColorChoice;
use console::Term;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;

/// Fallback width when stdout is not a terminal
const DEFAULT_WIDTH: usize = 100;

/// Live implementation of DisplayProvider
#[derive(Clone)]
pub struct LiveDisplayProvider {
    styling: Arc<StyleManager>,
}

impl LiveDisplayProvider {
    pub fn new(color: ColorChoice) -> Self {
        Self {
            styling: Arc::new(StyleManager::new(color)),
        }
    }
}

impl DisplayProvider for LiveDisplayProvider {
    fn status(&self) -> Box<dyn StatusProvider> {
        Box::new(LiveStatusProvider {
            styling: self.styling.clone(),
        })
    }

    fn progress(&self) -> Box<dyn ProgressProvider> {
        Box::new(LiveProgressProvider)
    }

    fn table(&self) -> Box<dyn StructuredProvider> {
        Box::new(LiveStructuredProvider {
            styling: self.styling.clone(),
        })
    }
}

struct LiveStatusProvider {
    styling: Arc<StyleManager>,
}

impl StatusProvider for LiveStatusProvider {
    fn success(&self, message: &str) {
        println!("{}", self.styling.format_success(message));
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.styling.format_error(message));
    }

    fn warning(&self, message: &str) {
        println!("{}", self.styling.format_warning(message));
    }

    fn info(&self, message: &str) {
        println!("{}", self.styling.format_info(message));
    }

    fn emphasis(&self, text: &str) {
        println!("{}", self.styling.style_emphasis(text));
    }

    fn list(&self, items: &[&str]) {
        for item in items {
            println!("  {} {}", self.styling.style_subtle(self.styling.bullet()), item);
        }
    }
}

struct LiveProgressProvider;

impl ProgressProvider for LiveProgressProvider {
    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker> {
        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("{spinner:.cyan} {msg}") {
            bar.set_style(style);
        }
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Box::new(SpinnerTracker { bar })
    }
}

/// Spinner that wraps an indicatif ProgressBar directly
struct SpinnerTracker {
    bar: ProgressBar,
}

impl ProgressTracker for SpinnerTracker {
    fn finish_clear(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for SpinnerTracker {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

struct LiveStructuredProvider {
    styling: Arc<StyleManager>,
}

impl LiveStructuredProvider {
    fn width() -> usize {
        Term::stdout()
            .size_checked()
            .map_or(DEFAULT_WIDTH, |(_, cols)| cols as usize)
    }

    fn title(&self, title: &str) {
        if !title.is_empty() {
            println!("{}", self.styling.style_accent(title));
        }
    }
}

impl StructuredProvider for LiveStructuredProvider {
    fn table(&self, title: &str, headers: &[&str], rows: &[Vec<String>]) {
        self.title(title);
        for (i, line) in format_table(headers, rows, Self::width()).iter().enumerate() {
            match i {
                0 if !headers.is_empty() => println!("{}", self.styling.style_emphasis(line)),
                1 if !headers.is_empty() => println!("{}", self.styling.style_subtle(line)),
                _ => println!("{line}"),
            }
        }
    }

    fn properties(&self, title: &str, pairs: &[(&str, &str)]) {
        self.title(title);
        for (key, value) in format_properties(pairs) {
            println!("  {}  {}", self.styling.style_emphasis(&key), self.styling.style_state(&value));
        }
    }

    fn panel(&self, title: &str, lines: &[String]) {
        self.title(title);
        for line in lines {
            println!("  {line}");
        }
    }
}
