use crate::models::{Game, GameOdds, ProbablePitcher};
use crate::utils::odds_calculator::implied_probability;
use serde::{Deserialize, Serialize};

// Factor weights for the home-perspective score
const RECORD_WEIGHT: f64 = 0.30;
const HOME_WEIGHT: f64 = 0.15;
const ODDS_WEIGHT: f64 = 0.35;
const PITCHER_WEIGHT: f64 = 0.20;

/// Home teams win roughly 54% of MLB games
const HOME_ADVANTAGE: f64 = 0.04;

/// Never report near-certainty
pub const MAX_CONFIDENCE: f64 = 0.85;

const RECORD_REASON_THRESHOLD: f64 = 0.05;
const ODDS_REASON_THRESHOLD: f64 = 0.1;

/// Coarse bucket for a confidence score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= ConfidenceLevel::High.min() {
            ConfidenceLevel::High
        } else if score >= ConfidenceLevel::Medium.min() {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }

    /// Inclusive lower bound of the tier
    pub fn min(&self) -> f64 {
        match self {
            ConfidenceLevel::High => 0.65,
            ConfidenceLevel::Medium => 0.55,
            ConfidenceLevel::Low => 0.0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "Alta",
            ConfidenceLevel::Medium => "Media",
            ConfidenceLevel::Low => "Baja",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ConfidenceLevel::High => "🔥",
            ConfidenceLevel::Medium => "⚡",
            ConfidenceLevel::Low => "💡",
        }
    }
}

/// A recommended side for a single game
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pick {
    pub game_pk: u64,
    pub favored_team: String,
    pub favored_team_id: u32,
    pub opposing_team: String,
    pub confidence: f64,
    pub confidence_level: ConfidenceLevel,
    pub moneyline: Option<i32>,
    pub record: String,
    pub reasons: Vec<String>,
    pub is_home: bool,
    pub home_team: String,
    pub away_team: String,
    pub home_ml: Option<i32>,
    pub away_ml: Option<i32>,
}

impl Pick {
    /// Format the pick as a readable string
    pub fn format(&self) -> String {
        format!(
            "{} {} over {} | Confidence: {:.1}% ({}) | ML: {} | {}",
            self.confidence_level.emoji(),
            self.favored_team,
            self.opposing_team,
            self.confidence * 100.0,
            self.confidence_level.label(),
            crate::utils::odds_calculator::format_odds(self.moneyline),
            self.reasons.join("; ")
        )
    }
}

fn pitcher_era(pitcher: Option<&ProbablePitcher>) -> Option<f64> {
    pitcher.and_then(ProbablePitcher::era)
}

/// Score a game from the home side and pick the favored team.
/// Returns `None` when either team is missing or unnamed in the schedule entry.
pub fn analyze_game(game: &Game, odds: Option<&GameOdds>) -> Option<Pick> {
    let home = game.teams.home.as_ref().filter(|t| !t.team.name.is_empty())?;
    let away = game.teams.away.as_ref().filter(|t| !t.team.name.is_empty())?;

    // Factor 1: record strength
    let home_win_pct = home.win_pct();
    let away_win_pct = away.win_pct();
    let record_diff = home_win_pct - away_win_pct;

    // Factor 3: bookmaker consensus, read from the first book quoted
    let moneyline = odds
        .and_then(|o| o.bookmakers.first())
        .and_then(|book| book.moneyline);
    let (home_ml, away_ml) = moneyline.map_or((None, None), |ml| (ml.home, ml.away));
    let (home_implied, away_implied) = match moneyline {
        Some(ml) => (implied_probability(ml.home), implied_probability(ml.away)),
        None => (0.5, 0.5),
    };

    // Factor 4: starting pitcher ERA gap, normalized
    let home_pitcher = home.probable_pitcher.as_ref();
    let away_pitcher = away.probable_pitcher.as_ref();
    let pitcher_advantage = match (pitcher_era(home_pitcher), pitcher_era(away_pitcher)) {
        (Some(home_era), Some(away_era)) => (away_era - home_era) / 10.0,
        _ => 0.0,
    };

    let home_score = 0.5
        + record_diff * RECORD_WEIGHT
        + HOME_ADVANTAGE * HOME_WEIGHT
        + (home_implied - 0.5) * ODDS_WEIGHT
        + pitcher_advantage * PITCHER_WEIGHT;
    let away_score = 1.0 - home_score;

    let favored_home = home_score >= away_score;
    let confidence = home_score.max(away_score).min(MAX_CONFIDENCE);
    let (favored, opposing) = if favored_home { (home, away) } else { (away, home) };

    let mut reasons = Vec::new();

    if record_diff.abs() > RECORD_REASON_THRESHOLD {
        let better = if home_win_pct > away_win_pct { home } else { away };
        reasons.push(format!(
            "{} tiene récord {}",
            better.team.name,
            better.record_string()
        ));
    }

    if favored_home {
        reasons.push("Ventaja de localía".to_string());
    }

    if (home_implied - away_implied).abs() > ODDS_REASON_THRESHOLD {
        reasons.push("Favorito según las casas de apuestas".to_string());
    }

    if pitcher_advantage != 0.0 {
        let better = if pitcher_advantage > 0.0 {
            home_pitcher
        } else {
            away_pitcher
        };
        if let Some(name) = better.and_then(|p| p.full_name.as_deref()) {
            reasons.push(format!("{} en la loma", name));
        }
    }

    if reasons.is_empty() {
        reasons.push("Análisis estadístico general".to_string());
    }

    Some(Pick {
        game_pk: game.game_pk,
        favored_team: favored.team.name.clone(),
        favored_team_id: favored.team.id,
        opposing_team: opposing.team.name.clone(),
        confidence,
        confidence_level: ConfidenceLevel::from_score(confidence),
        moneyline: if favored_home { home_ml } else { away_ml },
        record: favored.record_string(),
        reasons,
        is_home: favored_home,
        home_team: home.team.name.clone(),
        away_team: away.team.name.clone(),
        home_ml,
        away_ml,
    })
}
