use serde::{Deserialize, Serialize};

use crate::simulation::StepReport;

/// Step-by-step record of a run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StepTrace {
    /// RNG seed, enough to replay the run from the same setup
    pub seed: u64,
    pub steps: Vec<StepReport>,
}

impl StepTrace {
    pub fn new(seed: u64) -> Self {
        StepTrace {
            seed,
            steps: Vec::new(),
        }
    }

    pub fn push(&mut self, report: StepReport) {
        self.steps.push(report);
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// First tick at which any evader shared a cell with a pursuer
    pub fn first_capture(&self) -> Option<u64> {
        self.steps.iter().find(|s| s.captured > 0).map(|s| s.tick)
    }

    pub fn summary(&self) -> String {
        let captured = self.steps.last().map_or(0, |s| s.captured);
        let evaders = self.steps.last().map_or(0, |s| s.evaders.len());
        let first = match self.first_capture() {
            Some(tick) => format!("first capture at tick {}", tick),
            None => "no captures".to_string(),
        };
        format!(
            "seed {}: {} steps, {}/{} evaders captured, {}",
            self.seed,
            self.steps.len(),
            captured,
            evaders,
            first
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn report(tick: u64, captured: usize) -> StepReport {
        StepReport {
            tick,
            pursuers: vec![Cell::new(0, 0)],
            evaders: vec![Cell::new(0, 1)],
            captured,
        }
    }

    #[test]
    fn test_summary_and_first_capture() {
        let mut trace = StepTrace::new(3);
        assert_eq!(trace.first_capture(), None);
        trace.push(report(1, 0));
        trace.push(report(2, 1));
        trace.push(report(3, 1));
        assert_eq!(trace.first_capture(), Some(2));
        assert_eq!(
            trace.summary(),
            "seed 3: 3 steps, 1/1 evaders captured, first capture at tick 2"
        );
    }

    #[test]
    fn test_cells_serialize_as_pairs() {
        let mut trace = StepTrace::new(0);
        trace.push(report(1, 0));
        let json: serde_json::Value = serde_json::from_str(&trace.to_json().unwrap()).unwrap();
        assert_eq!(json["steps"][0]["evaders"][0], serde_json::json!([0, 1]));
    }
}
