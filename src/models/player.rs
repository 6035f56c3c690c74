use super::{DisplayName, Position};
use crate::utils::nationality::Country;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// (column header, Stats API key) shown for hitters
pub const HITTING_COLUMNS: [(&str, &str); 9] = [
    ("AB", "atBats"),
    ("R", "runs"),
    ("H", "hits"),
    ("HR", "homeRuns"),
    ("RBI", "rbi"),
    ("SB", "stolenBases"),
    ("AVG", "avg"),
    ("OBP", "obp"),
    ("OPS", "ops"),
];

pub const PITCHING_COLUMNS: [(&str, &str); 9] = [
    ("W", "wins"),
    ("L", "losses"),
    ("ERA", "era"),
    ("G", "gamesPlayed"),
    ("IP", "inningsPitched"),
    ("H", "hits"),
    ("SO", "strikeOuts"),
    ("BB", "baseOnBalls"),
    ("WHIP", "whip"),
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandCode {
    #[serde(default)]
    pub code: String,
}

/// A player from `/people/{id}` hydrated with season and career stats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerProfile {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub primary_number: Option<String>,
    #[serde(default)]
    pub primary_position: Option<Position>,
    #[serde(default)]
    pub bat_side: Option<HandCode>,
    #[serde(default)]
    pub pitch_hand: Option<HandCode>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub weight: Option<u32>,
    #[serde(default)]
    pub birth_date: Option<String>,
    #[serde(default)]
    pub birth_city: Option<String>,
    #[serde(default)]
    pub birth_country: Option<String>,
    #[serde(default)]
    pub stats: Vec<ProfileStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileStats {
    #[serde(default, rename = "type")]
    pub kind: Option<DisplayName>,
    #[serde(default)]
    pub group: Option<DisplayName>,
    #[serde(default)]
    pub splits: Vec<StatSplit>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatSplit {
    #[serde(default)]
    pub season: Option<String>,
    #[serde(default)]
    pub stat: BTreeMap<String, Value>,
}

/// One row of a profile stats table
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatRow {
    pub label: String,
    pub values: Vec<String>,
}

fn stat_text(stat: &BTreeMap<String, Value>, key: &str) -> String {
    match stat.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => "-".to_string(),
        Some(other) => other.to_string(),
    }
}

impl PlayerProfile {
    pub fn is_pitcher(&self) -> bool {
        self.primary_position
            .as_ref()
            .and_then(|p| p.kind.as_deref())
            == Some("Pitcher")
    }

    /// First split for a stat group ("hitting"/"pitching") and type ("season"/"career")
    pub fn split(&self, group: &str, kind: &str) -> Option<&StatSplit> {
        self.stats
            .iter()
            .find(|s| {
                s.group.as_ref().map(|g| g.display_name.as_str()) == Some(group)
                    && s.kind.as_ref().map(|k| k.display_name.as_str()) == Some(kind)
            })
            .and_then(|s| s.splits.first())
    }

    fn rows(&self, group: &str, columns: &[(&str, &str)]) -> Vec<StatRow> {
        [("season", None), ("career", Some("Carrera"))]
            .into_iter()
            .filter_map(|(kind, label)| {
                let split = self.split(group, kind)?;
                Some(StatRow {
                    label: label
                        .map(str::to_string)
                        .or_else(|| split.season.clone())
                        .unwrap_or_else(|| "Temporada".to_string()),
                    values: columns
                        .iter()
                        .map(|(_, key)| stat_text(&split.stat, key))
                        .collect(),
                })
            })
            .collect()
    }

    /// Season and career hitting rows; pitchers show none
    pub fn hitting_rows(&self) -> Vec<StatRow> {
        if self.is_pitcher() {
            return Vec::new();
        }
        self.rows("hitting", &HITTING_COLUMNS)
    }

    pub fn pitching_rows(&self) -> Vec<StatRow> {
        self.rows("pitching", &PITCHING_COLUMNS)
    }
}

/// A league leader born in the selected country
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderEntry {
    pub id: u64,
    pub name: String,
    pub team_name: String,
    pub value: String,
    pub rank: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderCategory {
    pub key: String,
    pub label: String,
    pub abbreviation: String,
    pub leaders: Vec<LeaderEntry>,
}

/// Per-country leaderboard for one season
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryLeaders {
    pub season: i32,
    pub country: Country,
    pub hitting: Vec<LeaderCategory>,
    pub pitching: Vec<LeaderCategory>,
}

impl CountryLeaders {
    pub fn is_empty(&self) -> bool {
        self.hitting
            .iter()
            .chain(&self.pitching)
            .all(|c| c.leaders.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE: &str = r#"{
        "id": 665742,
        "fullName": "Juan Soto",
        "primaryNumber": "22",
        "primaryPosition": {"abbreviation": "RF", "type": "Outfielder"},
        "batSide": {"code": "L"},
        "pitchHand": {"code": "L"},
        "height": "6' 2\"",
        "weight": 224,
        "birthCountry": "Dominican Republic",
        "stats": [
            {"type": {"displayName": "season"}, "group": {"displayName": "hitting"},
             "splits": [{"season": "2025", "stat": {"atBats": 520, "homeRuns": 38, "avg": ".268"}}]},
            {"type": {"displayName": "career"}, "group": {"displayName": "hitting"},
             "splits": [{"stat": {"atBats": 3600, "homeRuns": 240, "avg": ".282", "obp": ".419"}}]},
            {"type": {"displayName": "season"}, "group": {"displayName": "fielding"},
             "splits": [{"stat": {"errors": 3}}]}
        ]
    }"#;

    #[test]
    fn test_profile_rows() {
        let profile: PlayerProfile = serde_json::from_str(PROFILE).unwrap();
        assert!(!profile.is_pitcher());
        assert_eq!(profile.bat_side.as_ref().unwrap().code, "L");

        let rows = profile.hitting_rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "2025");
        assert_eq!(rows[0].values[0], "520");
        assert_eq!(rows[0].values[3], "38");
        assert_eq!(rows[0].values[6], ".268");
        assert_eq!(rows[0].values[7], "-");
        assert_eq!(rows[1].label, "Carrera");
        assert_eq!(rows[1].values[7], ".419");

        assert!(profile.pitching_rows().is_empty());
    }

    #[test]
    fn test_pitcher_profile_hides_hitting() {
        let profile: PlayerProfile = serde_json::from_str(
            r#"{"id": 1, "primaryPosition": {"abbreviation": "P", "type": "Pitcher"},
                "stats": [
                    {"type": {"displayName": "season"}, "group": {"displayName": "hitting"},
                     "splits": [{"stat": {"atBats": 2}}]},
                    {"type": {"displayName": "season"}, "group": {"displayName": "pitching"},
                     "splits": [{"stat": {"wins": 11, "era": "2.95"}}]}
                ]}"#,
        )
        .unwrap();
        assert!(profile.is_pitcher());
        assert!(profile.hitting_rows().is_empty());

        let rows = profile.pitching_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].label, "Temporada");
        assert_eq!(rows[0].values[0], "11");
        assert_eq!(rows[0].values[2], "2.95");
    }
}
