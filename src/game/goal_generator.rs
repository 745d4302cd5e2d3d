use std::time::Duration;

use rand::Rng;
use uuid::Uuid;

use crate::config::simulation::{PositionWeights, SimulationSettings};
use crate::game::weighted::weighted_pick;
use crate::models::team::Player;

/// Random draws that make up a simulated match: how many goals, when,
/// which side, who scored and who assisted.
#[derive(Debug, Clone)]
pub struct GoalGenerator {
    settings: SimulationSettings,
}

impl GoalGenerator {
    pub fn new(settings: SimulationSettings) -> Self {
        Self { settings }
    }

    /// Total goals for a match, drawn from the configured cumulative thresholds.
    pub fn draw_goal_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let draw = rng.gen::<f64>();
        let thresholds = &self.settings.goal_count_thresholds;
        thresholds
            .iter()
            .position(|threshold| draw < *threshold)
            .unwrap_or(thresholds.len())
    }

    /// `count` minutes drawn uniformly from 1..=90, sorted ascending. Ties are kept.
    pub fn draw_goal_minutes<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<i32> {
        let mut minutes: Vec<i32> = (0..count).map(|_| rng.gen_range(1..=90)).collect();
        minutes.sort_unstable();
        minutes
    }

    pub fn draw_is_home_goal<R: Rng + ?Sized>(&self, rng: &mut R) -> bool {
        rng.gen::<f64>() < self.settings.home_goal_probability
    }

    /// Real-time pause before the next goal is emitted.
    pub fn draw_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let (min, max) = self.settings.delay_bounds();
        if min == max {
            return min;
        }
        let millis = rng.gen_range(min.as_millis() as u64..=max.as_millis() as u64);
        Duration::from_millis(millis)
    }

    pub fn pick_scorer<'p, R: Rng + ?Sized>(&self, squad: &'p [Player], rng: &mut R) -> Option<&'p Player> {
        pick_by_position(squad.iter(), &self.settings.scorer_weights, rng)
    }

    /// Assister from the same squad, excluding the scorer. `None` when the
    /// goal is unassisted or nobody else is available.
    pub fn pick_assister<'p, R: Rng + ?Sized>(
        &self,
        squad: &'p [Player],
        scorer_id: Uuid,
        rng: &mut R,
    ) -> Option<&'p Player> {
        if rng.gen::<f64>() >= self.settings.assist_probability {
            return None;
        }
        pick_by_position(
            squad.iter().filter(|player| player.id != scorer_id),
            &self.settings.assist_weights,
            rng,
        )
    }
}

fn pick_by_position<'p, R: Rng + ?Sized>(
    players: impl Iterator<Item = &'p Player>,
    weights: &PositionWeights,
    rng: &mut R,
) -> Option<&'p Player> {
    let candidates: Vec<(&'p Player, f64)> = players
        .map(|player| (player, weights.weight_for(player.position_kind())))
        .collect();
    weighted_pick(&candidates, rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn player(position: &str, number: i32) -> Player {
        Player {
            id: Uuid::new_v4(),
            team_id: Uuid::nil(),
            name: format!("{} {}", position, number),
            display_name: None,
            position: position.to_string(),
            jersey_number: number,
            nationality: None,
            image_path: None,
            goals: 0,
            assists: 0,
            clean_sheets: 0,
        }
    }

    #[test]
    fn test_goal_count_stays_within_distribution() {
        let generator = GoalGenerator::new(SimulationSettings::default());
        let mut rng = StdRng::seed_from_u64(1);
        let mut seen_zero = false;
        for _ in 0..5_000 {
            let count = generator.draw_goal_count(&mut rng);
            assert!(count <= 6);
            seen_zero |= count == 0;
        }
        assert!(seen_zero);
    }

    #[test]
    fn test_goal_minutes_are_sorted_and_in_range() {
        let generator = GoalGenerator::new(SimulationSettings::default());
        let mut rng = StdRng::seed_from_u64(9);
        for count in 0..8 {
            let minutes = generator.draw_goal_minutes(count, &mut rng);
            assert_eq!(minutes.len(), count);
            assert!(minutes.windows(2).all(|pair| pair[0] <= pair[1]));
            assert!(minutes.iter().all(|minute| (1..=90).contains(minute)));
        }
    }

    #[test]
    fn test_delay_respects_bounds() {
        let generator = GoalGenerator::new(SimulationSettings::default());
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..1_000 {
            let delay = generator.draw_delay(&mut rng);
            assert!(delay >= Duration::from_millis(1000) && delay <= Duration::from_millis(3000));
        }
    }

    #[test]
    fn test_assister_is_never_the_scorer() {
        let mut settings = SimulationSettings::default();
        settings.assist_probability = 1.0;
        let generator = GoalGenerator::new(settings);
        let squad = vec![player("Forward", 9), player("Midfielder", 8), player("Goalkeeper", 1)];
        let mut rng = StdRng::seed_from_u64(77);
        for _ in 0..1_000 {
            let scorer = generator.pick_scorer(&squad, &mut rng).unwrap();
            let assister = generator.pick_assister(&squad, scorer.id, &mut rng).unwrap();
            assert_ne!(scorer.id, assister.id);
        }
    }

    #[test]
    fn test_lone_player_scores_unassisted() {
        let mut settings = SimulationSettings::default();
        settings.assist_probability = 1.0;
        let generator = GoalGenerator::new(settings);
        let squad = vec![player("Goalkeeper", 1)];
        let mut rng = StdRng::seed_from_u64(13);
        let scorer = generator.pick_scorer(&squad, &mut rng).unwrap();
        assert_eq!(scorer.id, squad[0].id);
        assert!(generator.pick_assister(&squad, scorer.id, &mut rng).is_none());
    }

    #[test]
    fn test_forwards_outscore_goalkeepers() {
        let generator = GoalGenerator::new(SimulationSettings::default());
        let squad = vec![player("Attacker", 9), player("Goalkeeper", 1)];
        let mut rng = StdRng::seed_from_u64(21);
        let keeper_goals = (0..10_000)
            .filter(|_| generator.pick_scorer(&squad, &mut rng).unwrap().jersey_number == 1)
            .count();
        // 0.05 / 6.05 of the draws, with generous slack
        assert!(keeper_goals < 300, "goalkeeper scored {} times", keeper_goals);
    }
}
