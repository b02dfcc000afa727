// src/search/step.rs
//! Snapshot of a search handed to observers.

/// How a single candidate relates to the current search window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    /// Outside `[low, high]`, already ruled out
    Excluded,
    /// Inside `[low, high]`, still possible
    Candidate,
    /// The midpoint about to be sent to the oracle
    Probed,
}

/// One observer notification: the full sequence and the `(low, mid, high)`
/// triple. `low == mid == high` marks the terminal notification.
#[derive(Debug)]
pub struct Step<'a, T> {
    pub values: &'a [T],
    pub low: usize,
    pub mid: usize,
    pub high: usize,
}

// Manual impls: a derive would require `T: Clone`.
impl<T> Clone for Step<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Step<'_, T> {}

impl<'a, T> Step<'a, T> {
    pub fn is_final(&self) -> bool {
        self.low == self.high
    }

    /// Number of values still in the window
    pub fn remaining(&self) -> usize {
        self.high - self.low + 1
    }

    /// The value about to be probed (the settled value on the final step)
    pub fn probed(&self) -> &'a T {
        &self.values[self.mid]
    }

    /// `log2(high - low + 1)`: probes still needed in the worst case
    pub fn remaining_depth(&self) -> f64 {
        (self.remaining() as f64).log2()
    }

    /// `ceil(log2(len))`: probes the whole search needs in the worst case
    pub fn total_depth(&self) -> f64 {
        (self.values.len() as f64).log2().ceil()
    }

    pub fn completed_depth(&self) -> f64 {
        (self.total_depth() - self.remaining_depth()).max(0.0)
    }

    pub fn cell_state(&self, index: usize) -> CellState {
        if index == self.mid && !self.is_final() {
            CellState::Probed
        } else if (self.low..=self.high).contains(&index) {
            CellState::Candidate
        } else {
            CellState::Excluded
        }
    }

    /// Values paired with their state, in sequence order
    pub fn cells(&self) -> impl Iterator<Item = (&'a T, CellState)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(move |(index, value)| (value, self.cell_state(index)))
    }
}
