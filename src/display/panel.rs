// src/display/panel.rs
use std::fmt::Display;

use colored::Colorize;

use crate::search::{CellState, Step};

/// Rendered search window of one search
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPanel {
    pub title: String,
    pub cells: Vec<(String, CellState)>,
    pub remaining: usize,
}

impl SearchPanel {
    pub fn from_step<T: Display>(label: &str, step: &Step<'_, T>) -> Self {
        Self {
            title: format!("Search space of {}", label),
            cells: step
                .cells()
                .map(|(value, state)| (value.to_string(), state))
                .collect(),
            remaining: step.remaining(),
        }
    }

    /// Value currently marked as probed, if any
    pub fn probed(&self) -> Option<&str> {
        self.cells
            .iter()
            .find(|(_, state)| *state == CellState::Probed)
            .map(|(value, _)| value.as_str())
    }

    /// Three lines: title, window, legend. Without color the probed value
    /// is bracketed and excluded values are replaced by dots.
    pub fn render(&self, color: bool) -> String {
        let window = self
            .cells
            .iter()
            .map(|(value, state)| match (state, color) {
                (CellState::Probed, true) => value.red().bold().to_string(),
                (CellState::Candidate, true) => value.cyan().bold().to_string(),
                (CellState::Excluded, true) => value.clone(),
                (CellState::Probed, false) => format!("[{}]", value),
                (CellState::Candidate, false) => value.clone(),
                (CellState::Excluded, false) => ".".repeat(value.chars().count().max(1)),
            })
            .collect::<Vec<_>>()
            .join(" ");

        if color {
            format!(
                "{}\n{}\n{} and {} - still {} to go",
                self.title.yellow(),
                window,
                "tested value in red".red(),
                "candidates in cyan".cyan(),
                self.remaining.to_string().cyan()
            )
        } else {
            format!(
                "{}\n{}\ntested value in brackets - still {} to go",
                self.title, window, self.remaining
            )
        }
    }
}
