use crate::models::league::LeagueMatch;

/// Smallest matchday that still has a match which is not finished.
///
/// When every match is finished the highest matchday is returned, and an
/// empty fixture list yields matchday 1. Recomputed from the match list on
/// every call so it stays correct when fixtures are added out of order.
pub fn active_matchday(matches: &[LeagueMatch]) -> i32 {
    matches
        .iter()
        .filter(|fixture| !fixture.is_finished())
        .map(|fixture| fixture.matchday)
        .min()
        .or_else(|| matches.iter().map(|fixture| fixture.matchday).max())
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::league::MatchStatus;
    use chrono::Utc;
    use uuid::Uuid;

    fn fixture(matchday: i32, status: MatchStatus) -> LeagueMatch {
        let mut fixture = LeagueMatch::new(Uuid::new_v4(), Uuid::new_v4(), matchday, Utc::now());
        fixture.status = status;
        fixture
    }

    #[test]
    fn test_no_matches_defaults_to_first_matchday() {
        assert_eq!(active_matchday(&[]), 1);
    }

    #[test]
    fn test_lowest_unfinished_matchday_is_active() {
        let matches = vec![
            fixture(1, MatchStatus::Finished),
            fixture(1, MatchStatus::Finished),
            fixture(2, MatchStatus::Live),
            fixture(2, MatchStatus::Scheduled),
            fixture(3, MatchStatus::Scheduled),
        ];
        assert_eq!(active_matchday(&matches), 2);
    }

    #[test]
    fn test_one_open_match_holds_back_the_round() {
        let matches = vec![
            fixture(2, MatchStatus::Finished),
            fixture(1, MatchStatus::Scheduled),
            fixture(1, MatchStatus::Finished),
        ];
        assert_eq!(active_matchday(&matches), 1);
    }

    #[test]
    fn test_all_finished_returns_last_matchday() {
        let matches = vec![
            fixture(1, MatchStatus::Finished),
            fixture(4, MatchStatus::Finished),
            fixture(2, MatchStatus::Finished),
        ];
        assert_eq!(active_matchday(&matches), 4);
    }
}
