use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::*;
use serde_aux::field_attributes::deserialize_number_from_string;

pub const METRICS_FILE: &str = "metrics.json";
pub const PLAYERS_FILE: &str = "players.json";
pub const EDGES_FILE: &str = "edges.json";
pub const MATCHUPS_FILE: &str = "asymmetric_matchups.json";

// Everything the network pages need, read once at startup from the JSON snapshot directory.
// Players are expected sorted by pagerank descending, but the projector doesn't rely on it.
#[derive(Debug, Default, Clone)]
pub struct Snapshot {
    pub metrics: OverallMetrics,
    pub players: Vec<PlayerRanking>,
    pub edges: Vec<RelationshipEdge>,
    pub matchups: Vec<AsymmetricMatchup>,
}

#[cfg(test)]
impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.players.is_empty() && self.edges.is_empty() && self.matchups.is_empty()
    }
}

pub fn load_snapshot(data_dir: &Path) -> Result<Snapshot> {
    let metrics: OverallMetrics = read_json(&data_dir.join(METRICS_FILE))?;
    let players: Vec<PlayerRanking> = read_json(&data_dir.join(PLAYERS_FILE))?;
    let edges: Vec<RelationshipEdge> = read_json(&data_dir.join(EDGES_FILE))?;
    let matchups: Vec<AsymmetricMatchup> = read_json(&data_dir.join(MATCHUPS_FILE))?;

    log::info!(
        "loaded snapshot from {}: {} players, {} edges, {} matchups",
        data_dir.display(),
        players.len(),
        edges.len(),
        matchups.len(),
    );

    Ok(Snapshot { metrics, players, edges, matchups })
}

// A failed load never takes the view down with it. We log and hand back an empty snapshot,
// which renders as empty charts and tables.
pub fn load_snapshot_or_empty(data_dir: &Path) -> Snapshot {
    match load_snapshot(data_dir) {
        Ok(snapshot) => snapshot,
        Err(err) => {
            log::error!("error loading snapshot: {err:#}");
            Snapshot::default()
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    serde_json::from_str(&data).with_context(|| format!("invalid JSON in {}", path.display()))
}

// Counters can come through as strings depending on which writer produced the file
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct OverallMetrics {
    #[serde(deserialize_with = "deserialize_number_from_string", default)]
    pub total_players: u64,
    #[serde(deserialize_with = "deserialize_number_from_string", default)]
    pub total_interactions: u64,
    #[serde(deserialize_with = "deserialize_number_from_string", default)]
    pub total_deliveries_analyzed: u64,
    #[serde(default)]
    pub top_players_by_pagerank: Vec<PagerankEntry>,
    #[serde(default)]
    pub most_active_batters: Vec<ActiveBatter>,
    #[serde(default)]
    pub most_active_bowlers: Vec<ActiveBowler>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PagerankEntry {
    pub player: String,
    pub score: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActiveBatter {
    pub player: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub bowlers_faced: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ActiveBowler {
    pub player: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub batters_bowled_to: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlayerRole {
    Batter,
    Bowler,
    #[default]
    #[serde(other)]
    Unknown,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PlayerRanking {
    pub id: String,
    #[serde(rename(deserialize = "pagerank"))]
    pub influence: f64,
    #[serde(rename = "type", default)]
    pub role: PlayerRole,
    #[serde(default)]
    pub career_runs: u64,
    #[serde(default)]
    pub wickets: u64,
}

#[cfg(test)]
impl PlayerRanking {
    pub fn new(id: &str, influence: f64) -> Self {
        Self {
            id: id.to_string(),
            influence,
            role: PlayerRole::Unknown,
            career_runs: 0,
            wickets: 0,
        }
    }
}

// Batter -> bowler. Dominance is runs per ball minus a penalty per dismissal, so it can go
// negative even though most of the interesting ones are positive.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RelationshipEdge {
    pub source: String,
    pub target: String,
    pub dominance: f64,
    #[serde(default)]
    pub runs: u32,
    #[serde(default)]
    pub balls: u32,
    #[serde(default)]
    pub dismissals: u32,
    #[serde(default)]
    pub strike_rate: f64,
    #[serde(default)]
    pub dot_balls: u32,
    #[serde(default)]
    pub fours: u32,
    #[serde(default)]
    pub sixes: u32,
}

#[cfg(test)]
impl RelationshipEdge {
    pub fn new(source: &str, target: &str, dominance: f64) -> Self {
        Self {
            source: source.to_string(),
            target: target.to_string(),
            dominance,
            runs: 0,
            balls: 0,
            dismissals: 0,
            strike_rate: 0.0,
            dot_balls: 0,
            fours: 0,
            sixes: 0,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AsymmetricMatchup {
    pub batter: String,
    pub bowler: String,
    pub runs: u32,
    pub balls: u32,
    pub dismissals: u32,
    pub dominance: f64,
    pub strike_rate: f64,
    #[serde(default)]
    pub bowler_career_wickets: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_snapshot(dir: &Path) {
        fs::write(dir.join(METRICS_FILE), r#"{
            "total_players": "1200",
            "total_interactions": 5400,
            "total_deliveries_analyzed": 2100000,
            "top_players_by_pagerank": [{"player": "V Kohli", "score": 0.42}],
            "most_active_batters": [{"player": "V Kohli", "bowlers_faced": 310}],
            "most_active_bowlers": [{"player": "R Ashwin", "batters_bowled_to": "290"}]
        }"#).unwrap();
        fs::write(dir.join(PLAYERS_FILE), r#"[
            {"id": "V Kohli", "pagerank": 0.42, "type": "batter", "career_runs": 9000, "wickets": 4},
            {"id": "R Ashwin", "pagerank": 0.31, "type": "bowler", "career_runs": 800, "wickets": 180},
            {"id": "Someone", "pagerank": 0.01, "type": "wicketkeeper"}
        ]"#).unwrap();
        fs::write(dir.join(EDGES_FILE), r#"[
            {"source": "V Kohli", "target": "R Ashwin", "runs": 120, "balls": 90, "dismissals": 1,
             "dominance": -6.66, "strike_rate": 133.3, "dot_balls": 30, "fours": 10, "sixes": 3}
        ]"#).unwrap();
        fs::write(dir.join(MATCHUPS_FILE), r#"[
            {"batter": "V Kohli", "bowler": "R Ashwin", "runs": 120, "balls": 90, "dismissals": 0,
             "dominance": 1.33, "strike_rate": 133.3, "bowler_career_wickets": 180}
        ]"#).unwrap();
    }

    #[test]
    fn loads_all_four_collections() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path());

        let snapshot = load_snapshot(dir.path()).unwrap();
        assert_eq!(snapshot.metrics.total_players, 1200);
        assert_eq!(snapshot.metrics.most_active_bowlers[0].batters_bowled_to, 290);
        assert_eq!(snapshot.players.len(), 3);
        assert_eq!(snapshot.players[0].influence, 0.42);
        assert_eq!(snapshot.players[1].role, PlayerRole::Bowler);
        assert_eq!(snapshot.players[2].role, PlayerRole::Unknown);
        assert_eq!(snapshot.edges[0].dominance, -6.66);
        assert_eq!(snapshot.matchups[0].bowler_career_wickets, 180);
    }

    #[test]
    fn missing_file_is_reported_with_its_path() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path());
        fs::remove_file(dir.path().join(EDGES_FILE)).unwrap();

        let err = load_snapshot(dir.path()).unwrap_err();
        assert!(format!("{err:#}").contains(EDGES_FILE));
    }

    #[test]
    fn broken_snapshot_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        write_snapshot(dir.path());
        fs::write(dir.path().join(PLAYERS_FILE), "[{not json").unwrap();

        let snapshot = load_snapshot_or_empty(dir.path());
        assert!(snapshot.is_empty());
        assert_eq!(snapshot.metrics.total_players, 0);
    }
}
