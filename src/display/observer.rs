// src/display/observer.rs
use std::fmt::Display;

use indicatif::ProgressBar;
use tracing::{debug, enabled, Level};

use crate::display::board::SharedBoard;
use crate::display::panel::SearchPanel;
use crate::display::progress::ProgressRecord;
use crate::display::{Grid, Row};
use crate::error::SolverError;
use crate::search::{ObserverError, Step, StepObserver};

type TextFn = Box<dyn Fn() -> String + Send + Sync>;

/// Observer that renders every step as a grid: optional header, the
/// progress of this search, the search window (or every active window of a
/// shared board), optional footer.
pub struct GridObserver {
    label: String,
    header: Option<TextFn>,
    footer: Option<TextFn>,
    board: Option<(SharedBoard, usize)>,
    live: Option<ProgressBar>,
}

impl GridObserver {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            header: None,
            footer: None,
            board: None,
            live: None,
        }
    }

    pub fn with_header(mut self, header: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.header = Some(Box::new(header));
        self
    }

    pub fn with_footer(mut self, footer: impl Fn() -> String + Send + Sync + 'static) -> Self {
        self.footer = Some(Box::new(footer));
        self
    }

    /// Render into `slot` of a shared board instead of a private window
    pub fn on_board(mut self, board: SharedBoard, slot: usize) -> Result<Self, SolverError> {
        board
            .lock()
            .map_err(|_| SolverError::InvalidInput("search board lock poisoned".to_string()))?
            .check_slot(slot)?;
        self.board = Some((board, slot));
        Ok(self)
    }

    /// Push each rendered grid into `bar`. A bar owned by a single search
    /// also tracks its probe depth; a board's bar is driven by the caller.
    pub fn live(mut self, bar: ProgressBar) -> Self {
        self.live = Some(bar);
        self
    }

    pub fn grid<T: Display>(&self, step: &Step<'_, T>) -> Result<Grid, ObserverError> {
        let mut grid = Grid::new();

        if let Some(header) = &self.header {
            grid.add_row(Row::Header(header()));
        }

        let progress = ProgressRecord::from_step(step);
        let panel = SearchPanel::from_step(&self.label, step);
        match &self.board {
            Some((board, slot)) => {
                let mut board = board.lock().map_err(|_| "search board lock poisoned")?;
                if step.is_final() {
                    board.clear(*slot)?;
                } else {
                    board.set(*slot, progress, panel)?;
                }
                for (progress, panel) in board.active() {
                    grid.add_row(Row::Progress(*progress));
                    grid.add_row(Row::Panel(panel.clone()));
                }
            }
            None => {
                grid.add_row(Row::Progress(progress));
                if !step.is_final() {
                    grid.add_row(Row::Panel(panel));
                }
            }
        }

        if let Some(footer) = &self.footer {
            grid.add_row(Row::Footer(footer()));
        }

        Ok(grid)
    }
}

impl<T: Display> StepObserver<T> for GridObserver {
    fn on_step(&mut self, step: &Step<'_, T>) -> Result<(), ObserverError> {
        let grid = self.grid(step)?;

        if enabled!(Level::DEBUG) {
            debug!("\n{}", grid.render(false));
        }

        if let Some(bar) = &self.live {
            if self.board.is_none() {
                let record = ProgressRecord::from_step(step);
                bar.set_length(record.total as u64);
                bar.set_position(record.completed.round() as u64);
            }
            bar.set_message(grid.render(true));
        }

        Ok(())
    }
}
