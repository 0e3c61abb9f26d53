use std::collections::HashMap;

use serde::Serialize;

use crate::stats_store::{latest_first, MatchInnings, Query, StatsStore};

// The team picker's "everything" option
pub const ALL_TEAMS: &str = "All";

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct TeamTotal {
    pub team: String,
    pub runs: u64,
    pub matches: u32,
}

// Restricts to the selected team (unless it's "All"), then sums runs per team and counts
// innings. Sorted by runs descending; ties stay in order of first appearance.
pub fn aggregate(innings: &[MatchInnings], team_filter: Option<&str>) -> Vec<TeamTotal> {
    let selected = team_filter.filter(|t| *t != ALL_TEAMS);

    let mut totals: Vec<TeamTotal> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for inn in innings {
        if selected.is_some_and(|team| team != inn.team) { continue; }

        let idx = *index.entry(inn.team.as_str()).or_insert_with(|| {
            totals.push(TeamTotal { team: inn.team.clone(), runs: 0, matches: 0 });
            totals.len() - 1
        });

        totals[idx].runs += inn.runs;
        totals[idx].matches += 1;
    }

    totals.sort_by(|a, b| b.runs.cmp(&a.runs));
    totals
}

// Distinct team names, alphabetical. Feeds the team picker.
pub fn team_names(innings: &[MatchInnings]) -> Vec<String> {
    let mut names: Vec<String> = innings.iter().map(|i| i.team.clone()).collect();
    names.sort();
    names.dedup();
    names
}

// What the matches page shows for one team selection. The team filter goes to the store,
// and the totals and the team list are built from whatever came back.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchesView {
    pub innings: Vec<MatchInnings>,
    pub totals: Vec<TeamTotal>,
    pub teams: Vec<String>,
}

pub fn matches_view(store: &StatsStore, team: &str) -> MatchesView {
    let mut query = Query::ordered_by("total_score");
    if team != ALL_TEAMS {
        query = query.team(team);
    }

    let mut innings: Vec<MatchInnings> = store.query(&query);
    latest_first(&mut innings);

    let totals = aggregate(&innings, Some(team));
    let teams = team_names(&innings);
    MatchesView { innings, totals, teams }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn innings() -> Vec<MatchInnings> {
        vec![
            MatchInnings::new("X", 150),
            MatchInnings::new("Y", 200),
            MatchInnings::new("X", 180),
        ]
    }

    fn total(team: &str, runs: u64, matches: u32) -> TeamTotal {
        TeamTotal { team: team.to_string(), runs, matches }
    }

    #[test]
    fn all_teams_sorted_by_runs() {
        assert_eq!(
            aggregate(&innings(), Some(ALL_TEAMS)),
            vec![total("X", 330, 2), total("Y", 200, 1)]
        );
    }

    #[test]
    fn no_filter_is_the_same_as_all() {
        assert_eq!(aggregate(&innings(), None), aggregate(&innings(), Some(ALL_TEAMS)));
    }

    #[test]
    fn single_team_filter() {
        assert_eq!(aggregate(&innings(), Some("X")), vec![total("X", 330, 2)]);
    }

    #[test]
    fn filter_is_case_sensitive() {
        assert!(aggregate(&innings(), Some("x")).is_empty());
    }

    #[test]
    fn empty_in_empty_out() {
        assert!(aggregate(&[], None).is_empty());
    }

    #[test]
    fn team_names_are_unique_and_sorted() {
        let mut rows = innings();
        rows.push(MatchInnings::new("Afghanistan", 99));
        assert_eq!(team_names(&rows), vec!["Afghanistan", "X", "Y"]);
    }

    const MATCHES: &str = "\
match_id,match_date,venue,batting_team,total_score
1,2023-10-08,Chennai,Australia,199
1,2023-10-08,Chennai,India,201
2,2023-11-19,Ahmedabad,India,240
2,2023-11-19,Ahmedabad,Australia,241
";

    fn store_with_matches() -> (tempfile::TempDir, StatsStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = StatsStore::new(dir.path());
        std::fs::write(store.table_path(crate::stats_store::MATCH_TABLE), MATCHES).unwrap();
        (dir, store)
    }

    #[test]
    fn matches_view_filters_through_the_store() {
        let (_dir, store) = store_with_matches();

        let view = matches_view(&store, "India");
        assert_eq!(view.innings.len(), 2);
        assert!(view.innings.iter().all(|i| i.team == "India"));
        assert_eq!(view.innings[0].match_date, "2023-11-19");
        assert_eq!(view.totals, vec![total("India", 441, 2)]);
        assert_eq!(view.teams, vec!["India"]);
    }

    #[test]
    fn matches_view_for_all_teams() {
        let (_dir, store) = store_with_matches();

        let view = matches_view(&store, ALL_TEAMS);
        assert_eq!(view.innings.len(), 4);
        assert_eq!(view.totals, vec![total("India", 441, 2), total("Australia", 440, 2)]);
        assert_eq!(view.teams, vec!["Australia", "India"]);
    }

    #[test]
    fn matches_view_with_missing_table_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let view = matches_view(&StatsStore::new(dir.path()), "India");
        assert!(view.innings.is_empty() && view.totals.is_empty() && view.teams.is_empty());
    }

    #[test]
    fn random_innings_conserve_runs_and_matches() {
        let teams = ["India", "Australia", "England", "Pakistan", "New Zealand"];
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..100 {
            let rows: Vec<MatchInnings> = (0..rng.random_range(0..80))
                .map(|_| MatchInnings::new(teams[rng.random_range(0..teams.len())], rng.random_range(0..450)))
                .collect();

            let filter = if rng.random_bool(0.5) { ALL_TEAMS } else { teams[rng.random_range(0..teams.len())] };
            let out = aggregate(&rows, Some(filter));

            let expected: Vec<&MatchInnings> = rows
                .iter()
                .filter(|r| filter == ALL_TEAMS || r.team == filter)
                .collect();

            assert_eq!(out.iter().map(|t| t.runs).sum::<u64>(), expected.iter().map(|r| r.runs).sum::<u64>());
            assert_eq!(out.iter().map(|t| t.matches as usize).sum::<usize>(), expected.len());

            for pair in out.windows(2) {
                assert!(pair[0].runs >= pair[1].runs);
            }
        }
    }
}
