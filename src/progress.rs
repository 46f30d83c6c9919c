use crate::state::GraphStore;

/// Completion summary shown in the workflow info panel.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressReport {
    pub completed: usize,
    pub total: usize,
    pub percentage: f64,
    pub text: String,
}

impl ProgressReport {
    pub fn new(completed: usize, total: usize) -> Self {
        // An empty workflow reads as 0%, not NaN.
        let percentage = if total == 0 {
            0.0
        } else {
            completed as f64 / total as f64 * 100.0
        };
        Self {
            completed,
            total,
            percentage,
            text: format!("{} of {} steps completed", completed, total),
        }
    }

    pub fn is_finished(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

impl Default for ProgressReport {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/// Derives completion metrics from the graph store.
pub struct ProgressTracker;

impl ProgressTracker {
    pub fn report(store: &GraphStore) -> ProgressReport {
        ProgressReport::new(store.completed_count(), store.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Step, StepStatus, Viewport};

    #[test]
    fn empty_store_reports_zero() {
        let report = ProgressTracker::report(&GraphStore::new());
        assert_eq!(report.completed, 0);
        assert_eq!(report.total, 0);
        assert_eq!(report.percentage, 0.0);
        assert_eq!(report.text, "0 of 0 steps completed");
        assert!(!report.is_finished());
    }

    #[test]
    fn counts_completed_steps() {
        let mut store = GraphStore::new();
        let steps = ["a", "b", "c", "d"].iter().map(|id| Step::new(id, id, "")).collect();
        store.initialize(steps, Viewport::new(800.0, 600.0)).unwrap();
        store.set_status("a", StepStatus::Completed, None).unwrap();
        store.set_status("b", StepStatus::InProgress, None).unwrap();

        let report = ProgressTracker::report(&store);
        assert_eq!(report.completed, 1);
        assert_eq!(report.percentage, 25.0);
        assert_eq!(report.text, "1 of 4 steps completed");

        for id in ["b", "c", "d"] {
            store.set_status(id, StepStatus::Completed, None).unwrap();
        }
        let report = ProgressTracker::report(&store);
        assert_eq!(report.percentage, 100.0);
        assert_eq!(report.completed, report.total);
        assert!(report.is_finished());
    }
}
