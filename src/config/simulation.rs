use std::time::Duration;
use serde::Deserialize;

use crate::models::team::Position;

/// Tuning knobs for the live match generator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    /// Cumulative thresholds for drawing a match's total goal count. A draw
    /// below `thresholds[i]` yields `i` goals; a draw above every threshold
    /// yields `thresholds.len()` goals.
    pub goal_count_thresholds: Vec<f64>,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    pub home_goal_probability: f64,
    pub assist_probability: f64,
    pub scorer_weights: PositionWeights,
    pub assist_weights: PositionWeights,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            goal_count_thresholds: vec![0.08, 0.26, 0.51, 0.73, 0.87, 0.95],
            min_delay_ms: 1000,
            max_delay_ms: 3000,
            home_goal_probability: 0.55,
            assist_probability: 0.85,
            scorer_weights: PositionWeights {
                forward: 6.0,
                midfielder: 3.0,
                defender: 1.0,
                goalkeeper: 0.05,
                other: 1.0,
            },
            assist_weights: PositionWeights {
                forward: 3.5,
                midfielder: 5.0,
                defender: 1.5,
                goalkeeper: 0.1,
                other: 1.0,
            },
        }
    }
}

impl SimulationSettings {
    pub fn delay_bounds(&self) -> (Duration, Duration) {
        let min = self.min_delay_ms.min(self.max_delay_ms);
        let max = self.min_delay_ms.max(self.max_delay_ms);
        (Duration::from_millis(min), Duration::from_millis(max))
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PositionWeights {
    pub forward: f64,
    pub midfielder: f64,
    pub defender: f64,
    pub goalkeeper: f64,
    #[serde(default = "default_other_weight")]
    pub other: f64,
}

fn default_other_weight() -> f64 {
    1.0
}

impl PositionWeights {
    pub fn weight_for(&self, position: Position) -> f64 {
        match position {
            Position::Forward => self.forward,
            Position::Midfielder => self.midfielder,
            Position::Defender => self.defender,
            Position::Goalkeeper => self.goalkeeper,
            Position::Other => self.other,
        }
    }
}
