mod boxscore;
mod player;

pub use boxscore::*;
pub use player::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// League-average ERA used when a probable pitcher's ERA cannot be parsed
pub const DEFAULT_ERA: f64 = 4.5;

/// A scheduled MLB game as returned by the Stats API schedule endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub game_pk: u64,
    #[serde(default)]
    pub game_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<GameStatus>,
    #[serde(default)]
    pub teams: GameTeams,
    #[serde(default)]
    pub linescore: Option<Linescore>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameTeams {
    #[serde(default)]
    pub home: Option<GameTeam>,
    #[serde(default)]
    pub away: Option<GameTeam>,
}

/// One side of a game: team identity, record, probable starter and score
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameTeam {
    #[serde(default)]
    pub team: Team,
    #[serde(default)]
    pub league_record: Option<LeagueRecord>,
    #[serde(default)]
    pub probable_pitcher: Option<ProbablePitcher>,
    #[serde(default)]
    pub score: Option<u32>,
}

impl GameTeam {
    /// Win percentage, 0.5 when there is no usable record
    pub fn win_pct(&self) -> f64 {
        self.league_record
            .as_ref()
            .map(LeagueRecord::win_pct)
            .unwrap_or(0.5)
    }

    /// Record as "W-L", "0-0" when missing
    pub fn record_string(&self) -> String {
        self.league_record
            .as_ref()
            .map(|r| format!("{}-{}", r.wins, r.losses))
            .unwrap_or_else(|| "0-0".to_string())
    }
}

/// Partial entries deserialize with empty defaults; an empty name marks an unusable team
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Team {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct LeagueRecord {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
}

impl LeagueRecord {
    pub fn win_pct(&self) -> f64 {
        let played = self.wins + self.losses;
        if played == 0 {
            return 0.5;
        }
        self.wins as f64 / played as f64
    }
}

/// Probable starting pitcher, optionally hydrated with season stats
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbablePitcher {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub era: Option<String>,
    #[serde(default)]
    pub stats: Vec<PitcherStatGroup>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PitcherStatGroup {
    #[serde(default)]
    pub group: Option<DisplayName>,
    #[serde(default)]
    pub stats: Option<PitchingSummary>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayName {
    pub display_name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PitchingSummary {
    #[serde(default)]
    pub era: Option<String>,
}

impl ProbablePitcher {
    /// ERA as a number. `None` when the pitcher has no ERA at all; an
    /// unparseable value falls back to [`DEFAULT_ERA`].
    pub fn era(&self) -> Option<f64> {
        let raw = self
            .era
            .as_deref()
            .or_else(|| {
                self.stats
                    .iter()
                    .filter(|s| {
                        s.group
                            .as_ref()
                            .map_or(true, |g| g.display_name == "pitching")
                    })
                    .find_map(|s| s.stats.as_ref()?.era.as_deref())
            })
            .map(str::trim)
            .filter(|s| !s.is_empty())?;

        Some(raw.parse::<f64>().unwrap_or(DEFAULT_ERA))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStatus {
    #[serde(default)]
    pub abstract_game_state: Option<String>,
    #[serde(default)]
    pub detailed_state: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Linescore {
    #[serde(default)]
    pub current_inning: Option<u32>,
    #[serde(default)]
    pub inning_state: Option<String>,
}

impl Game {
    pub fn home_name(&self) -> Option<&str> {
        self.teams.home.as_ref().map(|t| t.team.name.as_str())
    }

    pub fn away_name(&self) -> Option<&str> {
        self.teams.away.as_ref().map(|t| t.team.name.as_str())
    }

    pub fn is_live(&self) -> bool {
        self.abstract_state() == Some("Live")
    }

    pub fn is_final(&self) -> bool {
        self.abstract_state() == Some("Final")
    }

    fn abstract_state(&self) -> Option<&str> {
        self.status.as_ref()?.abstract_game_state.as_deref()
    }

    /// Short status line: inning when live, final state, or start time
    pub fn status_text(&self) -> String {
        if self.is_live() {
            let inning = self
                .linescore
                .as_ref()
                .and_then(|l| l.current_inning)
                .unwrap_or(1);
            let state = self
                .linescore
                .as_ref()
                .and_then(|l| l.inning_state.clone())
                .unwrap_or_else(|| "Top".to_string());
            return format!("{} {}", state, inning);
        }

        if self.is_final() {
            return self
                .status
                .as_ref()
                .and_then(|s| s.detailed_state.clone())
                .unwrap_or_else(|| "Final".to_string());
        }

        match self.game_date {
            Some(date) => date.format("%-I:%M %p").to_string(),
            None => "TBD".to_string(),
        }
    }
}

/// Normalized odds for one game, either from the live feed or synthesized
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameOdds {
    pub id: String,
    pub game_pk: Option<u64>,
    pub home_team: String,
    pub away_team: String,
    pub commence_time: Option<DateTime<Utc>>,
    pub synthesized: bool,
    pub bookmakers: Vec<BookmakerOdds>,
}

/// Markets quoted by a single sportsbook
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmakerOdds {
    pub key: String,
    pub title: String,
    pub moneyline: Option<MoneylinePrices>,
    pub spread: Option<SpreadPrices>,
    pub total: Option<TotalPrices>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneylinePrices {
    pub home: Option<i32>, // American odds format (e.g., -110, +150)
    pub away: Option<i32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadPrices {
    pub home: Option<i32>,
    pub away: Option<i32>,
    pub home_point: Option<f64>,
    pub away_point: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalPrices {
    pub over: Option<i32>,
    pub under: Option<i32>,
    pub point: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_win_pct_defaults() {
        let record = LeagueRecord { wins: 0, losses: 0 };
        assert_eq!(record.win_pct(), 0.5);

        let record = LeagueRecord { wins: 60, losses: 40 };
        assert!((record.win_pct() - 0.6).abs() < 1e-9);

        let team = GameTeam {
            team: Team {
                id: 1,
                name: "Test".to_string(),
            },
            league_record: None,
            probable_pitcher: None,
            score: None,
        };
        assert_eq!(team.win_pct(), 0.5);
        assert_eq!(team.record_string(), "0-0");
    }

    #[test]
    fn test_winless_record_is_zero_not_neutral() {
        // Only an empty record is neutral; 0-N is a real record
        let record = LeagueRecord { wins: 0, losses: 12 };
        assert_eq!(record.win_pct(), 0.0);

        let record = LeagueRecord { wins: 12, losses: 0 };
        assert_eq!(record.win_pct(), 1.0);
    }

    #[test]
    fn test_partial_team_entries_parse_with_defaults() {
        let json = r#"[
            {"gamePk": 1, "teams": {
                "home": {"team": {"id": 119, "name": "Los Angeles Dodgers"},
                         "leagueRecord": {"wins": 70, "losses": 52}},
                "away": {"team": {"id": 135, "name": "San Diego Padres"}}
            }},
            {"gamePk": 2, "teams": {
                "home": {"team": {"id": 0}, "leagueRecord": {"wins": 3}},
                "away": {}
            }}
        ]"#;
        let games: Vec<Game> = serde_json::from_str(json).unwrap();
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].home_name(), Some("Los Angeles Dodgers"));

        let home = games[1].teams.home.as_ref().unwrap();
        assert_eq!(home.team.name, "");
        assert_eq!(home.record_string(), "3-0");
        assert_eq!(games[1].teams.away.as_ref().unwrap().team.id, 0);
    }

    #[test]
    fn test_pitcher_era_sources() {
        let direct = ProbablePitcher {
            era: Some("3.25".to_string()),
            ..Default::default()
        };
        assert_eq!(direct.era(), Some(3.25));

        let hydrated: ProbablePitcher = serde_json::from_str(
            r#"{"id": 1, "fullName": "Sandy Alcantara",
                "stats": [{"group": {"displayName": "pitching"}, "stats": {"era": "2.80"}}]}"#,
        )
        .unwrap();
        assert_eq!(hydrated.era(), Some(2.8));

        let garbage = ProbablePitcher {
            era: Some("-.--".to_string()),
            ..Default::default()
        };
        assert_eq!(garbage.era(), Some(DEFAULT_ERA));

        assert_eq!(ProbablePitcher::default().era(), None);
    }

    #[test]
    fn test_parse_schedule_game() {
        let json = r#"{
            "gamePk": 776543,
            "gameDate": "2025-08-15T23:05:00Z",
            "status": {"abstractGameState": "Live", "detailedState": "In Progress"},
            "teams": {
                "home": {"team": {"id": 119, "name": "Los Angeles Dodgers"},
                         "leagueRecord": {"wins": 70, "losses": 52, "pct": ".574"},
                         "score": 3},
                "away": {"team": {"id": 135, "name": "San Diego Padres"},
                         "leagueRecord": {"wins": 68, "losses": 54}}
            },
            "linescore": {"currentInning": 5, "inningState": "Bottom"}
        }"#;
        let game: Game = serde_json::from_str(json).unwrap();
        assert_eq!(game.game_pk, 776543);
        assert_eq!(game.home_name(), Some("Los Angeles Dodgers"));
        assert_eq!(game.teams.home.as_ref().unwrap().score, Some(3));
        assert_eq!(game.status_text(), "Bottom 5");
    }

    #[test]
    fn test_status_text_final_and_scheduled() {
        let mut game: Game = serde_json::from_str(
            r#"{"gamePk": 1, "gameDate": "2025-08-15T23:05:00Z",
                "status": {"abstractGameState": "Final", "detailedState": "Final"}}"#,
        )
        .unwrap();
        assert_eq!(game.status_text(), "Final");

        game.status = Some(GameStatus {
            abstract_game_state: Some("Preview".to_string()),
            detailed_state: Some("Scheduled".to_string()),
        });
        assert_eq!(game.status_text(), "11:05 PM");
    }
}
