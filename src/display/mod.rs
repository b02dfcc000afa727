// src/display/mod.rs
//! Terminal presentation of running searches.
//!
//! A `Grid` is rebuilt on every observer notification from typed rows and
//! either logged or pushed into an `indicatif` progress bar.

pub mod board;
pub mod observer;
pub mod panel;
pub mod progress;

pub use board::{SearchBoard, SharedBoard};
pub use observer::GridObserver;
pub use panel::SearchPanel;
pub use progress::ProgressRecord;

/// One renderable row of a grid
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Header(String),
    Progress(ProgressRecord),
    Panel(SearchPanel),
    Footer(String),
}

impl Row {
    pub fn render(&self, color: bool) -> Option<String> {
        match self {
            Row::Header(text) | Row::Footer(text) => Some(text.clone()),
            Row::Progress(record) if record.visible => Some(record.render()),
            Row::Progress(_) => None,
            Row::Panel(panel) => Some(panel.render(color)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Row>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn render(&self, color: bool) -> String {
        self.rows
            .iter()
            .filter_map(|row| row.render(color))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
