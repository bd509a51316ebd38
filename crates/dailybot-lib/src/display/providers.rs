//! Display provider traits for dependency injection
//!
//! All user-facing output goes through these traits so command handlers can
//! be exercised against a recording mock.

/// Provider trait for all user-facing communication
pub trait DisplayProvider {
    /// Display status messages with semantic meaning
    fn status(&self) -> Box<dyn StatusProvider>;

    /// Display progress for network calls
    fn progress(&self) -> Box<dyn ProgressProvider>;

    /// Display structured output (tables, panels)
    fn table(&self) -> Box<dyn StructuredProvider>;
}

/// Provider trait for status updates and user feedback
pub trait StatusProvider {
    /// Display a success status
    fn success(&self, message: &str);

    /// Display an error; goes to stderr in the live provider
    fn error(&self, message: &str);

    /// Display a warning
    fn warning(&self, message: &str);

    /// Display a secondary, informational status
    fn info(&self, message: &str);

    /// Display an emphasized message
    fn emphasis(&self, text: &str);

    /// Display a list of items with bullets
    fn list(&self, items: &[&str]);
}

/// Provider trait for progress indication
pub trait ProgressProvider {
    /// Create a spinner for an operation of unknown duration
    fn spinner(&self, message: &str) -> Box<dyn ProgressTracker>;
}

/// Individual progress tracker interface
pub trait ProgressTracker {
    /// Finish and clear the spinner
    fn finish_clear(&self);
}

/// Provider trait for structured output
pub trait StructuredProvider {
    /// Display rows under a header line, with an optional title
    fn table(&self, title: &str, headers: &[&str], rows: &[Vec<String>]);

    /// Display titled key-value pairs
    fn properties(&self, title: &str, pairs: &[(&str, &str)]);

    /// Display a titled block of pre-formatted lines
    fn panel(&self, title: &str, lines: &[String]);
}

/// Extension trait for common display patterns used in commands
pub trait DisplayProviderExt: DisplayProvider {
    /// Run `operation` under a spinner that is cleared afterwards
    fn with_spinner<T, E>(
        &self,
        message: &str,
        operation: impl FnOnce() -> Result<T, E>,
    ) -> Result<T, E> {
        let spinner = self.progress().spinner(message);
        let result = operation();
        spinner.finish_clear();
        result
    }
}

impl<T: DisplayProvider + ?Sized> DisplayProviderExt for T {}
