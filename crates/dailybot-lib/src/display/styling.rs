//! Semantic styling on top of `console`
//!
//! Colors follow the resolved [`ColorChoice`]; `auto` leaves the decision to
//! console's own terminal detection.

use crate::primitives::ColorChoice;
use console::{Style, StyledObject};

/// Style manager mapping semantic intents to console styles
#[derive(Debug, Clone)]
pub struct StyleManager {
    success: Style,
    error: Style,
    warning: Style,
    subtle: Style,
    emphasis: Style,
    accent: Style,
}

impl StyleManager {
    pub fn new(color: ColorChoice) -> Self {
        match color {
            ColorChoice::Always => {
                console::set_colors_enabled(true);
                console::set_colors_enabled_stderr(true);
            }
            ColorChoice::Never => {
                console::set_colors_enabled(false);
                console::set_colors_enabled_stderr(false);
            }
            ColorChoice::Auto => {}
        }

        Self {
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warning: Style::new().yellow().bold(),
            subtle: Style::new().dim(),
            emphasis: Style::new().bold(),
            accent: Style::new().cyan().bold(),
        }
    }

    pub fn style_success<'a>(&self, text: &'a str) -> StyledObject<&'a str> {
        self.success.apply_to(text)
    }

    /// Error styling, checked against stderr color support
    pub fn style_error<'a>(&self, text: &'a str) -> StyledObject<&'a str> {
        self.error.clone().for_stderr().apply_to(text)
    }

    pub fn style_warning<'a>(&self, text: &'a str) -> StyledObject<&'a str> {
        self.warning.apply_to(text)
    }

    pub fn style_subtle<'a>(&self, text: &'a str) -> StyledObject<&'a str> {
        self.subtle.apply_to(text)
    }

    pub fn style_emphasis<'a>(&self, text: &'a str) -> StyledObject<&'a str> {
        self.emphasis.apply_to(text)
    }

    pub fn style_accent<'a>(&self, text: &'a str) -> StyledObject<&'a str> {
        self.accent.apply_to(text)
    }

    /// Color a health or delivery state
    pub fn style_state<'a>(&self, text: &'a str) -> StyledObject<&'a str> {
        match text {
            "healthy" | "yes" => self.success.apply_to(text),
            "unhealthy" => self.error.apply_to(text),
            "no" => self.warning.apply_to(text),
            _ => Style::new().apply_to(text),
        }
    }

    pub fn format_success(&self, message: &str) -> String {
        format!("{} {}", self.style_success("OK"), message)
    }

    pub fn format_error(&self, message: &str) -> String {
        format!("{} {}", self.style_error("Error:"), message)
    }

    pub fn format_warning(&self, message: &str) -> String {
        format!("{} {}", self.style_warning("Warning:"), message)
    }

    pub fn format_info(&self, message: &str) -> String {
        self.style_subtle(message).to_string()
    }

    pub fn bullet(&self) -> &'static str {
        "-"
    }
}
