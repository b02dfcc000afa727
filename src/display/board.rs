// src/display/board.rs
use std::sync::{Arc, Mutex};

use crate::display::panel::SearchPanel;
use crate::display::progress::ProgressRecord;
use crate::error::SolverError;

/// Board shared by concurrent searches
pub type SharedBoard = Arc<Mutex<SearchBoard>>;

/// Display surface with one entry per search. A search writes only its own
/// slot and clears it when it settles.
#[derive(Debug, Default)]
pub struct SearchBoard {
    slots: Vec<Option<(ProgressRecord, SearchPanel)>>,
}

impl SearchBoard {
    pub fn new(slots: usize) -> Self {
        Self { slots: vec![None; slots] }
    }

    pub fn shared(slots: usize) -> SharedBoard {
        Arc::new(Mutex::new(Self::new(slots)))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn check_slot(&self, slot: usize) -> Result<(), SolverError> {
        if slot < self.slots.len() {
            Ok(())
        } else {
            Err(SolverError::InvalidInput(format!(
                "board slot {} out of range (board has {} slots)",
                slot,
                self.slots.len()
            )))
        }
    }

    pub fn set(
        &mut self,
        slot: usize,
        progress: ProgressRecord,
        panel: SearchPanel,
    ) -> Result<(), SolverError> {
        self.check_slot(slot)?;
        self.slots[slot] = Some((progress, panel));
        Ok(())
    }

    pub fn clear(&mut self, slot: usize) -> Result<(), SolverError> {
        self.check_slot(slot)?;
        self.slots[slot] = None;
        Ok(())
    }

    /// Progress and window of searches still running, in slot order
    pub fn active(&self) -> impl Iterator<Item = &(ProgressRecord, SearchPanel)> {
        self.slots.iter().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn panel(title: &str) -> SearchPanel {
        SearchPanel { title: title.to_string(), cells: Vec::new(), remaining: 2 }
    }

    fn progress(completed: f64) -> ProgressRecord {
        ProgressRecord { completed, total: 4.0, visible: true }
    }

    #[test]
    fn test_slots_are_independent() {
        let mut board = SearchBoard::new(3);
        board.set(2, progress(1.0), panel("char 3")).unwrap();
        board.set(0, progress(3.0), panel("char 1")).unwrap();

        let titles: Vec<&str> = board.active().map(|(_, p)| p.title.as_str()).collect();
        assert_eq!(titles, vec!["char 1", "char 3"]);
        let done: Vec<f64> = board.active().map(|(record, _)| record.completed).collect();
        assert_eq!(done, vec![3.0, 1.0]);

        board.clear(0).unwrap();
        let titles: Vec<&str> = board.active().map(|(_, p)| p.title.as_str()).collect();
        assert_eq!(titles, vec!["char 3"]);
    }

    #[test]
    fn test_out_of_range_slot() {
        let mut board = SearchBoard::new(2);
        assert!(matches!(board.set(2, progress(0.0), panel("x")), Err(SolverError::InvalidInput(_))));
        assert!(board.check_slot(1).is_ok());
        assert!(SearchBoard::new(0).is_empty());
    }
}
