use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::db::LeagueStore;
use crate::error::LeagueResult;
use crate::league::score::recalculate_match_score;
use crate::models::league::{LeagueMatch, Standing, StandingWithTeam};
use crate::models::team::Team;

/// Number of results shown in a team's form guide
pub const FORM_LENGTH: usize = 5;

/// Service responsible for managing league standings
#[derive(Clone)]
pub struct StandingsService {
    store: Arc<dyn LeagueStore>,
}

impl StandingsService {
    pub fn new(store: Arc<dyn LeagueStore>) -> Self {
        Self { store }
    }

    /// Apply one newly finished match to both teams' rows.
    ///
    /// Append-only: calling this twice for the same match double counts it
    /// until the next full rebuild.
    pub async fn update_after_match(&self, fixture: &LeagueMatch) -> LeagueResult<()> {
        tracing::info!(
            "🏆 Updating standings for match {}: {} - {}",
            fixture.id,
            fixture.home_score,
            fixture.away_score
        );

        self.store
            .record_standing_result(fixture.home_team_id, fixture.home_score, fixture.away_score)
            .await?;
        self.store
            .record_standing_result(fixture.away_team_id, fixture.away_score, fixture.home_score)
            .await?;
        Ok(())
    }

    /// Discard every row and replay all finished matches, resyncing each
    /// match score from its goal events first. Returns the number of matches replayed.
    ///
    /// Not safe to run concurrently with another rebuild or with a match
    /// finishing; callers serialize it.
    pub async fn rebuild(&self) -> LeagueResult<usize> {
        let mut finished = self.store.finished_matches().await?;

        for fixture in finished.iter_mut() {
            let (home_score, away_score) =
                recalculate_match_score(self.store.as_ref(), fixture.id).await?;
            fixture.home_score = home_score;
            fixture.away_score = away_score;
        }

        let rows = replay(&finished);
        self.store.replace_standings(&rows).await?;

        tracing::info!(
            "Rebuilt standings for {} teams from {} finished matches",
            rows.len(),
            finished.len()
        );
        Ok(finished.len())
    }

    /// The presentation table: every known team ranked, with form and next opponent.
    pub async fn table(&self) -> LeagueResult<Vec<StandingWithTeam>> {
        let teams = self.store.list_teams().await?;
        let standings = self.store.list_standings().await?;
        let matches = self.store.list_matches().await?;
        Ok(build_table(&teams, standings, &matches))
    }
}

/// Fold finished matches into fresh rows. Order of `matches` does not affect the result.
pub fn replay(matches: &[LeagueMatch]) -> Vec<Standing> {
    let mut rows: HashMap<Uuid, Standing> = HashMap::new();
    for fixture in matches.iter().filter(|fixture| fixture.is_finished()) {
        rows.entry(fixture.home_team_id)
            .or_insert_with(|| Standing::new(fixture.home_team_id))
            .record(fixture.home_score, fixture.away_score);
        rows.entry(fixture.away_team_id)
            .or_insert_with(|| Standing::new(fixture.away_team_id))
            .record(fixture.away_score, fixture.home_score);
    }

    let mut rows: Vec<Standing> = rows.into_values().collect();
    rows.sort_by_key(|row| row.team_id);
    rows
}

/// Points, goal difference and goals for descending, then team name and id ascending.
pub fn compare_rows(a: (&Standing, &str), b: (&Standing, &str)) -> Ordering {
    let (row_a, name_a) = a;
    let (row_b, name_b) = b;
    row_b
        .points
        .cmp(&row_a.points)
        .then(row_b.goal_difference.cmp(&row_a.goal_difference))
        .then(row_b.goals_for.cmp(&row_a.goals_for))
        .then(name_a.cmp(name_b))
        .then(row_a.team_id.cmp(&row_b.team_id))
}

pub fn build_table(
    teams: &[Team],
    standings: Vec<Standing>,
    matches: &[LeagueMatch],
) -> Vec<StandingWithTeam> {
    let teams_by_id: HashMap<Uuid, &Team> = teams.iter().map(|team| (team.id, team)).collect();

    let mut rows: HashMap<Uuid, Standing> = teams
        .iter()
        .map(|team| (team.id, Standing::new(team.id)))
        .collect();
    for standing in standings {
        rows.insert(standing.team_id, standing);
    }

    let name_of = |team_id: &Uuid| -> String {
        teams_by_id
            .get(team_id)
            .map(|team| team.name.clone())
            .unwrap_or_else(|| "Unknown".to_string())
    };

    let mut named: Vec<(Standing, String)> = rows
        .into_values()
        .map(|row| {
            let name = name_of(&row.team_id);
            (row, name)
        })
        .collect();
    named.sort_by(|(row_a, name_a), (row_b, name_b)| {
        compare_rows((row_a, name_a.as_str()), (row_b, name_b.as_str()))
    });

    named
        .into_iter()
        .enumerate()
        .map(|(index, (standing, team_name))| {
            let team_id = standing.team_id;
            let next_opponent = next_fixture(team_id, matches)
                .and_then(|fixture| fixture.opponent_of(team_id))
                .and_then(|opponent| teams_by_id.get(&opponent).copied());

            StandingWithTeam {
                position: index + 1,
                team_name,
                logo_url: teams_by_id.get(&team_id).and_then(|team| team.logo_url.clone()),
                form: recent_form(team_id, matches, FORM_LENGTH),
                next_opponent: next_opponent.map(|team| team.name.clone()),
                next_opponent_logo: next_opponent.and_then(|team| team.logo_url.clone()),
                standing,
            }
        })
        .collect()
}

/// Finished matches of one team, most recent first.
pub fn recent_results(team_id: Uuid, matches: &[LeagueMatch]) -> Vec<&LeagueMatch> {
    let mut played: Vec<&LeagueMatch> = matches
        .iter()
        .filter(|fixture| fixture.is_finished() && fixture.involves(team_id))
        .collect();
    played.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at).then(b.id.cmp(&a.id)));
    played
}

/// Up to `length` result letters (W, D, L), most recent first.
pub fn recent_form(team_id: Uuid, matches: &[LeagueMatch], length: usize) -> Vec<String> {
    recent_results(team_id, matches)
        .into_iter()
        .filter_map(|fixture| fixture.result_for(team_id))
        .take(length)
        .map(|result| result.form_letter().to_string())
        .collect()
}

/// Fixtures of one team that are not finished yet, soonest first.
pub fn open_fixtures(team_id: Uuid, matches: &[LeagueMatch]) -> Vec<&LeagueMatch> {
    let mut open: Vec<&LeagueMatch> = matches
        .iter()
        .filter(|fixture| !fixture.is_finished() && fixture.involves(team_id))
        .collect();
    open.sort_by(|a, b| a.scheduled_at.cmp(&b.scheduled_at).then(a.id.cmp(&b.id)));
    open
}

pub fn next_fixture(team_id: Uuid, matches: &[LeagueMatch]) -> Option<&LeagueMatch> {
    open_fixtures(team_id, matches).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::league::MatchStatus;
    use chrono::{Duration, TimeZone, Utc};

    fn team(name: &str) -> Team {
        Team {
            id: Uuid::new_v4(),
            name: name.to_string(),
            short_name: None,
            city: None,
            stadium: None,
            logo_url: None,
            created_at: Utc::now(),
        }
    }

    fn finished(home: &Team, away: &Team, home_score: i32, away_score: i32, day: i64) -> LeagueMatch {
        let kickoff = Utc.with_ymd_and_hms(2024, 8, 1, 15, 0, 0).unwrap() + Duration::days(day);
        let mut fixture = LeagueMatch::new(home.id, away.id, day as i32 + 1, kickoff);
        fixture.status = MatchStatus::Finished;
        fixture.home_score = home_score;
        fixture.away_score = away_score;
        fixture
    }

    #[test]
    fn test_replay_is_order_independent() {
        let (a, b, c) = (team("Alpha"), team("Bravo"), team("Charlie"));
        let mut matches = vec![
            finished(&a, &b, 2, 1, 0),
            finished(&b, &c, 0, 0, 1),
            finished(&c, &a, 3, 1, 2),
            finished(&a, &c, 1, 1, 3),
        ];
        let forward = replay(&matches);
        matches.reverse();
        let backward = replay(&matches);
        matches.swap(0, 2);
        let shuffled = replay(&matches);

        assert_eq!(forward, backward);
        assert_eq!(forward, shuffled);
    }

    #[test]
    fn test_replayed_rows_respect_points_formula() {
        let (a, b) = (team("Alpha"), team("Bravo"));
        let rows = replay(&[finished(&a, &b, 2, 1, 0), finished(&b, &a, 2, 2, 1), finished(&b, &a, 4, 0, 2)]);
        for row in rows {
            assert_eq!(row.points, 3 * row.wins + row.draws);
            assert_eq!(row.points, row.calculate_points());
            assert_eq!(row.goal_difference, row.goals_for - row.goals_against);
            assert_eq!(row.played, row.wins + row.draws + row.losses);
        }
    }

    #[test]
    fn test_full_ties_are_broken_by_team_name() {
        let (zulu, alpha) = (team("Zulu"), team("Alpha"));
        let table = build_table(&[zulu.clone(), alpha.clone()], Vec::new(), &[]);
        assert_eq!(table[0].team_name, "Alpha");
        assert_eq!(table[0].position, 1);
        assert_eq!(table[1].team_name, "Zulu");
        assert_eq!(table[1].position, 2);
    }

    #[test]
    fn test_goals_for_separates_equal_points_and_difference() {
        let (a, b, c, d) = (team("Alpha"), team("Bravo"), team("Charlie"), team("Delta"));
        let matches = vec![finished(&b, &c, 3, 2, 0), finished(&a, &d, 1, 0, 0)];
        let rows = replay(&matches);
        let table = build_table(&[a.clone(), b.clone(), c.clone(), d.clone()], rows, &matches);
        let order: Vec<&str> = table.iter().map(|row| row.team_name.as_str()).collect();
        assert_eq!(order, vec!["Bravo", "Alpha", "Charlie", "Delta"]);
    }

    #[test]
    fn test_form_lists_latest_five_most_recent_first() {
        let (a, b) = (team("Alpha"), team("Bravo"));
        let matches = vec![
            finished(&a, &b, 1, 0, 0),
            finished(&a, &b, 0, 1, 1),
            finished(&a, &b, 1, 1, 2),
            finished(&b, &a, 0, 2, 3),
            finished(&b, &a, 3, 0, 4),
            finished(&a, &b, 2, 2, 5),
        ];
        assert_eq!(recent_form(a.id, &matches, FORM_LENGTH), vec!["D", "L", "W", "D", "L"]);
        assert_eq!(recent_form(b.id, &matches, 2), vec!["D", "W"]);
    }

    #[test]
    fn test_next_opponent_is_earliest_open_fixture() {
        let (a, b, c) = (team("Alpha"), team("Bravo"), team("Charlie"));
        let later = LeagueMatch::new(a.id, c.id, 3, Utc::now() + Duration::days(14));
        let sooner = LeagueMatch::new(b.id, a.id, 2, Utc::now() + Duration::days(7));
        let matches = vec![finished(&a, &b, 1, 0, 0), later, sooner];

        let table = build_table(&[a.clone(), b.clone(), c.clone()], replay(&matches), &matches);
        let alpha = table.iter().find(|row| row.standing.team_id == a.id).unwrap();
        assert_eq!(alpha.next_opponent.as_deref(), Some("Bravo"));
        assert_eq!(alpha.form, vec!["W"]);
    }
}
