use crate::models::{Boxscore, BoxscorePlayer, BoxscoreTeam};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Countries whose players can be highlighted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    DominicanRepublic,
    Venezuela,
}

impl Country {
    pub fn code(&self) -> &'static str {
        match self {
            Country::DominicanRepublic => "DR",
            Country::Venezuela => "VE",
        }
    }

    /// Spellings of the country seen in the `birthCountry` field
    pub fn birth_countries(&self) -> &'static [&'static str] {
        match self {
            Country::DominicanRepublic => &["Dominican Republic", "D.R.", "Republica Dominicana"],
            Country::Venezuela => &["Venezuela"],
        }
    }

    pub fn flag(&self) -> &'static str {
        match self {
            Country::DominicanRepublic => "🇩🇴",
            Country::Venezuela => "🇻🇪",
        }
    }

    pub fn demonym(&self) -> &'static str {
        match self {
            Country::DominicanRepublic => "Dominicanos",
            Country::Venezuela => "Venezolanos",
        }
    }

    pub fn matches(&self, birth_country: &str) -> bool {
        self.birth_countries().contains(&birth_country)
    }
}

impl FromStr for Country {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DR" | "DO" => Ok(Country::DominicanRepublic),
            "VE" => Ok(Country::Venezuela),
            other => Err(format!("Unknown country code: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BattingLine {
    pub at_bats: u32,
    pub hits: u32,
    pub runs: u32,
    pub rbi: u32,
    pub home_runs: u32,
    pub strike_outs: u32,
    pub base_on_balls: u32,
    pub avg: String,
    pub ops: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchingLine {
    pub innings_pitched: String,
    pub hits: u32,
    pub runs: u32,
    pub earned_runs: u32,
    pub strike_outs: u32,
    pub walks: u32,
    pub era: String,
}

/// A highlighted player's line for one game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLine {
    pub id: u64,
    pub name: String,
    pub position: String,
    pub jersey_number: Option<String>,
    pub batting: BattingLine,
    pub pitching: PitchingLine,
    pub is_pitcher: bool,
    pub participated: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamPlayers {
    pub home: Vec<PlayerLine>,
    pub away: Vec<PlayerLine>,
}

impl TeamPlayers {
    pub fn is_empty(&self) -> bool {
        self.home.is_empty() && self.away.is_empty()
    }
}

fn player_line(key: &str, player: &BoxscorePlayer, team: &BoxscoreTeam) -> PlayerLine {
    let batting = &player.stats.batting;
    let pitching = &player.stats.pitching;
    let person_id = key
        .strip_prefix("ID")
        .and_then(|id| id.parse::<u64>().ok())
        .unwrap_or(player.person.id);

    let listed = team.batters.contains(&person_id) || team.pitchers.contains(&person_id);

    let batted = !batting.is_empty()
        && (batting.at_bats.unwrap_or(0) > 0
            || batting.plate_appearances.unwrap_or(0) > 0
            || batting.runs.unwrap_or(0) > 0);

    let pitched = !pitching.is_empty()
        && pitching
            .innings_pitched
            .as_deref()
            .is_some_and(|ip| ip != "0.0" && ip != "0");

    let is_pitcher = player
        .position
        .as_ref()
        .and_then(|p| p.kind.as_deref())
        .is_some_and(|kind| kind == "Pitcher")
        || !pitching.is_empty();

    PlayerLine {
        id: player.person.id,
        name: player.person.full_name.clone().unwrap_or_default(),
        position: player
            .position
            .as_ref()
            .and_then(|p| p.abbreviation.clone())
            .unwrap_or_else(|| "N/A".to_string()),
        jersey_number: player.jersey_number.clone(),
        batting: BattingLine {
            at_bats: batting.at_bats.unwrap_or(0),
            hits: batting.hits.unwrap_or(0),
            runs: batting.runs.unwrap_or(0),
            rbi: batting.rbi.unwrap_or(0),
            home_runs: batting.home_runs.unwrap_or(0),
            strike_outs: batting.strike_outs.unwrap_or(0),
            base_on_balls: batting.base_on_balls.unwrap_or(0),
            avg: batting.avg.clone().unwrap_or_else(|| ".000".to_string()),
            ops: batting.ops.clone().unwrap_or_else(|| ".000".to_string()),
        },
        pitching: PitchingLine {
            innings_pitched: pitching
                .innings_pitched
                .clone()
                .unwrap_or_else(|| "0.0".to_string()),
            hits: pitching.hits.unwrap_or(0),
            runs: pitching.runs.unwrap_or(0),
            earned_runs: pitching.earned_runs.unwrap_or(0),
            strike_outs: pitching.strike_outs.unwrap_or(0),
            walks: pitching.base_on_balls.unwrap_or(0),
            era: pitching.era.clone().unwrap_or_else(|| "0.00".to_string()),
        },
        is_pitcher,
        participated: listed || batted || pitched,
    }
}

fn team_players(team: Option<&BoxscoreTeam>, country: Country) -> Vec<PlayerLine> {
    let Some(team) = team else {
        return Vec::new();
    };

    let mut players: Vec<PlayerLine> = team
        .players
        .iter()
        .filter(|(_, player)| {
            player
                .person
                .birth_country
                .as_deref()
                .is_some_and(|c| country.matches(c))
        })
        .map(|(key, player)| player_line(key, player, team))
        .collect();

    // Participants first, then batting order, pitchers, and the rest by id
    players.sort_by_key(|p| (!p.participated, lineup_rank(team, p.id), p.id));
    players
}

/// Position in the team's batters list, then its pitchers list
fn lineup_rank(team: &BoxscoreTeam, person_id: u64) -> usize {
    let batters = team.batters.len();
    team.batters
        .iter()
        .position(|&id| id == person_id)
        .or_else(|| {
            team.pitchers
                .iter()
                .position(|&id| id == person_id)
                .map(|i| batters + i)
        })
        .unwrap_or(usize::MAX)
}

/// Players born in `country` on each side of the boxscore
pub fn extract_players(boxscore: &Boxscore, country: Country) -> TeamPlayers {
    TeamPlayers {
        home: team_players(boxscore.teams.home.as_ref(), country),
        away: team_players(boxscore.teams.away.as_ref(), country),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOXSCORE: &str = r#"{
        "teams": {
            "home": {
                "players": {
                    "ID665742": {
                        "person": {"id": 665742, "fullName": "Juan Soto", "birthCountry": "Dominican Republic"},
                        "jerseyNumber": "22",
                        "position": {"abbreviation": "RF", "type": "Outfielder"},
                        "stats": {"batting": {"atBats": 4, "hits": 2, "homeRuns": 1, "rbi": 3}, "pitching": {}}
                    },
                    "ID600001": {
                        "person": {"id": 600001, "fullName": "Bench Guy", "birthCountry": "D.R."},
                        "position": {"abbreviation": "C", "type": "Catcher"},
                        "stats": {"batting": {}, "pitching": {}}
                    },
                    "ID592450": {
                        "person": {"id": 592450, "fullName": "Aaron Judge", "birthCountry": "USA"},
                        "stats": {"batting": {"atBats": 4}}
                    }
                },
                "batters": [665742, 592450],
                "pitchers": []
            },
            "away": {
                "players": {
                    "ID500001": {
                        "person": {"id": 500001, "fullName": "Closer Arm", "birthCountry": "Venezuela"},
                        "position": {"abbreviation": "P", "type": "Pitcher"},
                        "stats": {"batting": {}, "pitching": {"inningsPitched": "1.0", "strikeOuts": 2}}
                    }
                },
                "batters": [],
                "pitchers": [500001]
            }
        }
    }"#;

    fn boxscore() -> Boxscore {
        serde_json::from_str(BOXSCORE).unwrap()
    }

    #[test]
    fn test_extracts_dominican_players() {
        let players = extract_players(&boxscore(), Country::DominicanRepublic);
        assert!(players.away.is_empty());
        assert_eq!(players.home.len(), 2);

        let soto = &players.home[0];
        assert_eq!(soto.name, "Juan Soto");
        assert!(soto.participated);
        assert!(!soto.is_pitcher);
        assert_eq!(soto.batting.hits, 2);
        assert_eq!(soto.batting.avg, ".000");
        assert_eq!(soto.jersey_number.as_deref(), Some("22"));

        let bench = &players.home[1];
        assert!(!bench.participated);
        assert_eq!(bench.position, "C");
        assert_eq!(bench.pitching.innings_pitched, "0.0");
    }

    #[test]
    fn test_extracts_venezuelan_pitcher() {
        let players = extract_players(&boxscore(), Country::Venezuela);
        assert!(players.home.is_empty());
        let arm = &players.away[0];
        assert!(arm.is_pitcher);
        assert!(arm.participated);
        assert_eq!(arm.pitching.strike_outs, 2);
    }

    #[test]
    fn test_players_follow_lineup_not_key_order() {
        let boxscore: Boxscore = serde_json::from_str(
            r#"{"teams": {"home": {
                "players": {
                    "ID10": {"person": {"id": 10, "fullName": "Second Listed", "birthCountry": "Dominican Republic"},
                             "stats": {"batting": {"atBats": 3}}},
                    "ID9": {"person": {"id": 9, "fullName": "First Listed", "birthCountry": "Dominican Republic"},
                            "stats": {"batting": {"atBats": 4}}},
                    "ID30": {"person": {"id": 30, "fullName": "Reliever", "birthCountry": "Dominican Republic"},
                             "position": {"abbreviation": "P", "type": "Pitcher"},
                             "stats": {"pitching": {"inningsPitched": "1.0"}}},
                    "ID2": {"person": {"id": 2, "fullName": "Bench Bat", "birthCountry": "Dominican Republic"}}
                },
                "batters": [9, 10],
                "pitchers": [30]
            }}}"#,
        )
        .unwrap();

        let names: Vec<String> = extract_players(&boxscore, Country::DominicanRepublic)
            .home
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["First Listed", "Second Listed", "Reliever", "Bench Bat"]);
    }

    #[test]
    fn test_empty_boxscore() {
        let players = extract_players(&Boxscore::default(), Country::DominicanRepublic);
        assert!(players.is_empty());
    }

    #[test]
    fn test_country_codes() {
        assert_eq!("dr".parse::<Country>(), Ok(Country::DominicanRepublic));
        assert_eq!("VE".parse::<Country>(), Ok(Country::Venezuela));
        assert!("MX".parse::<Country>().is_err());
        assert!(Country::DominicanRepublic.matches("Republica Dominicana"));
        assert!(!Country::Venezuela.matches("Dominican Republic"));
    }
}
