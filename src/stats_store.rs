use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::de::DeserializeOwned;
use serde::*;

// Stand-in for the hosted tables. Each table is a CSV export with the upstream column names,
// and this module is the only place that knows those names.
pub const BATTER_TABLE: &str = "batter_stats";
pub const BOWLER_TABLE: &str = "bowler_stats";
pub const MATCH_TABLE: &str = "match_stats";

pub trait StatRow: DeserializeOwned {
    const TABLE: &'static str;

    // Numeric value of a column by its upstream name. None for unknown or empty columns.
    fn numeric(&self, column: &str) -> Option<f64>;

    // Only match rows have a team to filter on
    fn team(&self) -> Option<&str> { None }
}

// Filter, sort and limit the way the dashboard queries the hosted store:
// `column >= min`, ordered by `column` descending, at most `limit` rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub column: String,
    pub min: Option<f64>,
    pub team: Option<String>,
    pub limit: Option<usize>,
}

impl Query {
    pub fn ordered_by(column: &str) -> Self {
        Self {
            column: column.to_string(),
            min: None,
            team: None,
            limit: None,
        }
    }

    pub fn at_least(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn team(mut self, team: &str) -> Self {
        self.team = Some(team.to_string());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn run<'a, R: StatRow>(&self, rows: &'a [R]) -> Vec<&'a R> {
        let mut out: Vec<&R> = rows
            .iter()
            .filter(|r| match self.min {
                Some(min) => r.numeric(&self.column).is_some_and(|v| v >= min),
                None => true,
            })
            .filter(|r| match &self.team {
                Some(team) => r.team() == Some(team.as_str()),
                None => true,
            })
            .collect();

        // Rows without a value sort to the end, like NULLS LAST
        out.sort_by(|a, b| {
            let av = a.numeric(&self.column).unwrap_or(f64::NEG_INFINITY);
            let bv = b.numeric(&self.column).unwrap_or(f64::NEG_INFINITY);
            bv.total_cmp(&av)
        });

        if let Some(limit) = self.limit {
            out.truncate(limit);
        }
        out
    }
}

pub struct StatsStore {
    root: PathBuf,
}

impl StatsStore {
    pub fn new(root: &Path) -> Self {
        Self { root: root.to_path_buf() }
    }

    pub fn table_path(&self, table: &str) -> PathBuf {
        self.root.join(format!("{table}.csv"))
    }

    pub fn load<R: StatRow>(&self) -> Result<Vec<R>> {
        let path = self.table_path(R::TABLE);
        let file = File::open(&path)
            .with_context(|| format!("failed to open table {}", path.display()))?;

        let rows = read_rows(file).with_context(|| format!("failed to read table {}", path.display()))?;
        log::info!("loaded {} rows from {}", rows.len(), R::TABLE);
        Ok(rows)
    }

    // Same deal as the snapshot: a table that won't load shows up as an empty view
    pub fn load_or_empty<R: StatRow>(&self) -> Vec<R> {
        self.load().unwrap_or_else(|err| {
            log::error!("error loading {}: {err:#}", R::TABLE);
            Vec::new()
        })
    }

    pub fn query<R: StatRow>(&self, query: &Query) -> Vec<R>
    where
        R: Clone,
    {
        let rows: Vec<R> = self.load_or_empty();
        query.run(&rows).into_iter().cloned().collect()
    }
}

// Malformed rows are skipped with a warning rather than failing the whole table.
// A missing or unreadable header still fails.
pub fn read_rows<R: StatRow, T: Read>(reader: T) -> Result<Vec<R>> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    csv_reader
        .headers()
        .map_err(|e| anyhow!("bad header: {e}"))?;

    let mut rows = Vec::new();
    for (line, record) in csv_reader.deserialize::<R>().enumerate() {
        match record {
            Ok(row) => rows.push(row),
            Err(err) => log::warn!("skipping row {} of {}: {err}", line + 1, R::TABLE),
        }
    }
    Ok(rows)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BatterStats {
    pub batter: String,
    pub matches_played: u32,
    pub total_runs: u64,
    #[serde(default)]
    pub balls_faced: u64,
    #[serde(default)]
    pub times_out: u32,
    #[serde(default)]
    pub total_fours: u32,
    #[serde(default)]
    pub total_sixes: u32,
    #[serde(default)]
    pub dot_balls: u64,
    #[serde(default)]
    pub batting_average: Option<f64>,
    #[serde(default)]
    pub strike_rate: Option<f64>,
    #[serde(default)]
    pub dot_ball_percentage: Option<f64>,
    #[serde(default)]
    pub highest_score: u32,
    #[serde(default)]
    pub half_centuries: u32,
    #[serde(default)]
    pub centuries: u32,
    #[serde(default)]
    pub innings: u32,
}

impl StatRow for BatterStats {
    const TABLE: &'static str = BATTER_TABLE;

    fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "matches_played" => Some(self.matches_played as f64),
            "total_runs" => Some(self.total_runs as f64),
            "balls_faced" => Some(self.balls_faced as f64),
            "times_out" => Some(self.times_out as f64),
            "total_fours" => Some(self.total_fours as f64),
            "total_sixes" => Some(self.total_sixes as f64),
            "dot_balls" => Some(self.dot_balls as f64),
            "batting_average" => self.batting_average,
            "strike_rate" => self.strike_rate,
            "dot_ball_percentage" => self.dot_ball_percentage,
            "highest_score" => Some(self.highest_score as f64),
            "half_centuries" => Some(self.half_centuries as f64),
            "centuries" => Some(self.centuries as f64),
            "innings" => Some(self.innings as f64),
            _ => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BowlerStats {
    pub bowler: String,
    pub matches_played: u32,
    pub wickets_taken: u32,
    #[serde(default)]
    pub balls_bowled: u64,
    #[serde(default)]
    pub runs_conceded: u64,
    #[serde(default)]
    pub dot_balls: u64,
    #[serde(default)]
    pub extras_conceded: u64,
    #[serde(default)]
    pub overs_bowled: f64,
    #[serde(default)]
    pub bowling_average: Option<f64>,
    #[serde(default)]
    pub economy_rate: Option<f64>,
    #[serde(default)]
    pub strike_rate: Option<f64>,
    #[serde(default)]
    pub four_wickets: u32,
    #[serde(default)]
    pub five_wickets: u32,
    #[serde(default)]
    pub innings_bowled: u32,
}

impl StatRow for BowlerStats {
    const TABLE: &'static str = BOWLER_TABLE;

    fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "matches_played" => Some(self.matches_played as f64),
            "wickets_taken" => Some(self.wickets_taken as f64),
            "balls_bowled" => Some(self.balls_bowled as f64),
            "runs_conceded" => Some(self.runs_conceded as f64),
            "dot_balls" => Some(self.dot_balls as f64),
            "extras_conceded" => Some(self.extras_conceded as f64),
            "overs_bowled" => Some(self.overs_bowled),
            "bowling_average" => self.bowling_average,
            "economy_rate" => self.economy_rate,
            "strike_rate" => self.strike_rate,
            "four_wickets" => Some(self.four_wickets as f64),
            "five_wickets" => Some(self.five_wickets as f64),
            "innings_bowled" => Some(self.innings_bowled as f64),
            _ => None,
        }
    }
}

// One team's innings in one match. Only team and runs matter for the team totals,
// the rest is for the innings table.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MatchInnings {
    #[serde(rename = "batting_team")]
    pub team: String,
    #[serde(rename = "total_score")]
    pub runs: u64,
    #[serde(default)]
    pub match_id: String,
    #[serde(default)]
    pub match_date: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub venue: String,
    #[serde(default)]
    pub extras: u32,
    #[serde(default)]
    pub wickets: u32,
    #[serde(default)]
    pub boundaries: u32,
    #[serde(default)]
    pub sixes: u32,
    #[serde(default)]
    pub balls_faced: u32,
    #[serde(default)]
    pub overs: f64,
}

#[cfg(test)]
impl MatchInnings {
    pub fn new(team: &str, runs: u64) -> Self {
        Self {
            team: team.to_string(),
            runs,
            match_id: String::new(),
            match_date: String::new(),
            city: None,
            venue: String::new(),
            extras: 0,
            wickets: 0,
            boundaries: 0,
            sixes: 0,
            balls_faced: 0,
            overs: 0.0,
        }
    }
}

impl StatRow for MatchInnings {
    const TABLE: &'static str = MATCH_TABLE;

    fn numeric(&self, column: &str) -> Option<f64> {
        match column {
            "total_score" => Some(self.runs as f64),
            "extras" => Some(self.extras as f64),
            "wickets" => Some(self.wickets as f64),
            "boundaries" => Some(self.boundaries as f64),
            "sixes" => Some(self.sixes as f64),
            "balls_faced" => Some(self.balls_faced as f64),
            "overs" => Some(self.overs),
            _ => None,
        }
    }

    fn team(&self) -> Option<&str> {
        Some(&self.team)
    }
}

// Match rows are listed newest first. Dates are ISO so string order is date order.
pub fn latest_first(innings: &mut [MatchInnings]) {
    innings.sort_by(|a, b| b.match_date.cmp(&a.match_date));
}
