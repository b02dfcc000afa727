// src/display/progress.rs
use crate::search::Step;

const BAR_WIDTH: usize = 20;

/// Binary-search depth progress of one search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressRecord {
    pub completed: f64,
    pub total: f64,
    /// Hidden once the search has settled
    pub visible: bool,
}

impl ProgressRecord {
    pub fn from_step<T>(step: &Step<'_, T>) -> Self {
        Self {
            completed: step.completed_depth(),
            total: step.total_depth(),
            visible: !step.is_final(),
        }
    }

    pub fn fraction(&self) -> f64 {
        if self.total <= 0.0 {
            1.0
        } else {
            (self.completed / self.total).clamp(0.0, 1.0)
        }
    }

    pub fn render(&self) -> String {
        let filled = (self.fraction() * BAR_WIDTH as f64).round() as usize;
        format!(
            "[{}{}] {:.1}/{:.0} probes",
            "#".repeat(filled),
            "-".repeat(BAR_WIDTH - filled),
            self.completed,
            self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_from_first_step() {
        let values: Vec<u32> = (0..16).collect();
        let record = ProgressRecord::from_step(&Step { values: &values, low: 0, mid: 7, high: 15 });

        assert_eq!(record.total, 4.0);
        assert_eq!(record.completed, 0.0);
        assert!(record.visible);
        assert_eq!(record.render(), "[--------------------] 0.0/4 probes");
    }

    #[test]
    fn test_progress_halfway() {
        let values: Vec<u32> = (0..16).collect();
        let record = ProgressRecord::from_step(&Step { values: &values, low: 8, mid: 9, high: 11 });

        assert_eq!(record.completed, 2.0);
        assert_eq!(record.fraction(), 0.5);
        assert_eq!(record.render(), "[##########----------] 2.0/4 probes");
    }

    #[test]
    fn test_settled_progress_is_hidden_and_full() {
        let values = ['q'];
        let record = ProgressRecord::from_step(&Step { values: &values, low: 0, mid: 0, high: 0 });
        assert!(!record.visible);
        assert_eq!(record.fraction(), 1.0);
    }
}
