use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Boxscore for one game, as returned by `/game/{gamePk}/boxscore`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Boxscore {
    #[serde(default)]
    pub teams: BoxscoreTeams,
}

impl Boxscore {
    /// Both sides, home first
    pub fn sides(&self) -> impl Iterator<Item = &BoxscoreTeam> {
        self.teams.home.iter().chain(self.teams.away.iter())
    }

    pub fn sides_mut(&mut self) -> impl Iterator<Item = &mut BoxscoreTeam> {
        self.teams.home.iter_mut().chain(self.teams.away.iter_mut())
    }

    /// Ids of players the boxscore lists without a birth country
    pub fn players_missing_birth_country(&self) -> impl Iterator<Item = u64> + '_ {
        self.sides()
            .flat_map(|team| team.players.values())
            .filter(|player| player.person.birth_country.is_none() && player.person.id != 0)
            .map(|player| player.person.id)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxscoreTeams {
    #[serde(default)]
    pub home: Option<BoxscoreTeam>,
    #[serde(default)]
    pub away: Option<BoxscoreTeam>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoxscoreTeam {
    /// Keyed by "ID{personId}"; lineup order lives in `batters` and `pitchers`
    #[serde(default)]
    pub players: BTreeMap<String, BoxscorePlayer>,
    #[serde(default)]
    pub batters: Vec<u64>,
    #[serde(default)]
    pub pitchers: Vec<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxscorePlayer {
    #[serde(default)]
    pub person: Person,
    #[serde(default)]
    pub jersey_number: Option<String>,
    #[serde(default)]
    pub position: Option<Position>,
    #[serde(default)]
    pub stats: PlayerStats,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub birth_country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default)]
    pub batting: BattingStats,
    #[serde(default)]
    pub pitching: PitchingStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingStats {
    pub at_bats: Option<u32>,
    pub plate_appearances: Option<u32>,
    pub hits: Option<u32>,
    pub runs: Option<u32>,
    pub rbi: Option<u32>,
    pub home_runs: Option<u32>,
    pub strike_outs: Option<u32>,
    pub base_on_balls: Option<u32>,
    pub avg: Option<String>,
    pub ops: Option<String>,
}

impl BattingStats {
    pub fn is_empty(&self) -> bool {
        *self == BattingStats::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchingStats {
    pub innings_pitched: Option<String>,
    pub hits: Option<u32>,
    pub runs: Option<u32>,
    pub earned_runs: Option<u32>,
    pub strike_outs: Option<u32>,
    pub base_on_balls: Option<u32>,
    pub era: Option<String>,
}

impl PitchingStats {
    pub fn is_empty(&self) -> bool {
        *self == PitchingStats::default()
    }
}
