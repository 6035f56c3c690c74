use crate::models::{BookmakerOdds, GameOdds, MoneylinePrices, SpreadPrices, TotalPrices};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

pub const ODDS_API_BASE_URL: &str = "https://api.the-odds-api.com/v4";
const SPORT_KEY: &str = "baseball_mlb";

/// Response from The Odds API for a single game
#[derive(Debug, Deserialize)]
struct OddsApiGame {
    id: String,
    #[serde(default)]
    commence_time: Option<DateTime<Utc>>,
    #[serde(default)]
    home_team: String,
    #[serde(default)]
    away_team: String,
    #[serde(default)]
    bookmakers: Vec<OddsApiBookmaker>,
}

/// Bookmaker data from The Odds API
#[derive(Debug, Deserialize)]
struct OddsApiBookmaker {
    key: String,
    title: String,
    #[serde(default)]
    markets: Vec<OddsApiMarket>,
}

/// Market data (h2h, spreads, totals) from The Odds API
#[derive(Debug, Deserialize)]
struct OddsApiMarket {
    key: String,
    outcomes: Vec<OddsApiOutcome>,
}

/// Outcome data for a team or for Over/Under
#[derive(Debug, Deserialize)]
struct OddsApiOutcome {
    name: String,
    price: f64,
    #[serde(default)]
    point: Option<f64>,
}

impl OddsApiMarket {
    fn outcome(&self, name: &str) -> Option<&OddsApiOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    fn price(&self, name: &str) -> Option<i32> {
        self.outcome(name).map(|o| o.price.round() as i32)
    }

    fn point(&self, name: &str) -> Option<f64> {
        self.outcome(name).and_then(|o| o.point)
    }
}

impl OddsApiGame {
    fn into_game_odds(self) -> GameOdds {
        let home = self.home_team;
        let away = self.away_team;

        let bookmakers = self
            .bookmakers
            .into_iter()
            .map(|bookmaker| {
                let market = |key: &str| bookmaker.markets.iter().find(|m| m.key == key);

                let moneyline = market("h2h").map(|m| MoneylinePrices {
                    home: m.price(&home),
                    away: m.price(&away),
                });
                let spread = market("spreads").map(|m| SpreadPrices {
                    home: m.price(&home),
                    away: m.price(&away),
                    home_point: m.point(&home),
                    away_point: m.point(&away),
                });
                let total = market("totals").map(|m| TotalPrices {
                    over: m.price("Over"),
                    under: m.price("Under"),
                    point: m.point("Over"),
                });

                BookmakerOdds {
                    key: bookmaker.key.clone(),
                    title: bookmaker.title.clone(),
                    moneyline,
                    spread,
                    total,
                }
            })
            .collect();

        GameOdds {
            id: self.id,
            game_pk: None,
            home_team: home,
            away_team: away,
            commence_time: self.commence_time,
            synthesized: false,
            bookmakers,
        }
    }
}

pub struct OddsApiClient {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OddsApiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, ODDS_API_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            base_url,
            client: reqwest::Client::new(),
        }
    }

    /// Fetch current MLB games with moneyline, run line and total markets.
    /// The API has no date parameter; it returns whatever is on the board.
    pub async fn fetch_games(&self) -> Result<Vec<GameOdds>> {
        let url = format!("{}/sports/{}/odds", self.base_url, SPORT_KEY);

        let response = self
            .client
            .get(&url)
            .query(&[
                ("apiKey", self.api_key.as_str()),
                ("regions", "us"),
                ("markets", "h2h,spreads,totals"),
                ("oddsFormat", "american"),
            ])
            .send()
            .await
            .context("Failed to fetch odds from The Odds API")?;

        if !response.status().is_success() {
            anyhow::bail!("Odds API returned error: {}", response.status());
        }

        let api_games: Vec<OddsApiGame> = response
            .json()
            .await
            .context("Failed to parse Odds API response")?;

        Ok(api_games
            .into_iter()
            .map(OddsApiGame::into_game_odds)
            .collect())
    }

    /// Check how many API requests you have remaining
    pub async fn check_usage(&self) -> Result<()> {
        let url = format!("{}/sports", self.base_url);

        let response = self
            .client
            .get(&url)
            .query(&[("apiKey", self.api_key.as_str())])
            .send()
            .await?;

        if let Some(remaining) = response.headers().get("x-requests-remaining") {
            info!("Odds API requests remaining: {:?}", remaining);
        }

        if let Some(used) = response.headers().get("x-requests-used") {
            info!("Odds API requests used: {:?}", used);
        }

        Ok(())
    }
}
