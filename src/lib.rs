pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod utils;

pub use api::*;
pub use config::Config;
pub use error::{ConfigError, DashboardError};
pub use models::*;
pub use utils::*;

use anyhow::Result;
use chrono::NaiveDate;
use futures_util::future::join_all;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::future::Future;
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{info, warn};
use utils::data::{load_from_cache, save_to_cache};

/// Everything the betting views need for one date
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingData {
    pub date: NaiveDate,
    pub odds_mode: OddsMode,
    pub games: Vec<Game>,
    pub odds: Vec<GameOdds>,
    pub best_odds: Vec<BestOdds>,
    pub analysis: BettingAnalysis,
}

/// Use the cache file when allowed, otherwise fetch and refresh the cache
async fn load_or_fetch<T, F, Fut>(cache_file: &Path, use_cache: bool, fetch: F) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if use_cache && cache_file.exists() {
        match load_from_cache(cache_file) {
            Ok(data) => {
                info!("Loaded {} from cache", cache_file.display());
                return Ok(data);
            }
            Err(e) => warn!("Ignoring unreadable cache {}: {:#}", cache_file.display(), e),
        }
    }

    let data = fetch().await?;
    if let Err(e) = save_to_cache(&data, cache_file) {
        warn!("Failed to save cache {}: {:#}", cache_file.display(), e);
    }
    Ok(data)
}

/// The Odds API feed, shared between refreshes. `None` records a failed
/// fetch so a broken upstream is not retried before the entry expires.
pub type OddsFeedCache = TimedCache<Option<Vec<GameOdds>>>;

async fn load_schedule(config: &Config, date: NaiveDate, use_cache: bool) -> Vec<Game> {
    let mlb_client = MlbStatsClient::new(config.mlb_api_base_url.clone());

    let schedule_cache = config
        .cache_dir
        .join(format!("schedule_{}.json", date.format("%Y-%m-%d")));
    load_or_fetch(&schedule_cache, use_cache, || mlb_client.fetch_schedule(date))
        .await
        .unwrap_or_else(|e| {
            warn!("Schedule unavailable for {}: {:#}", date, e);
            Vec::new()
        })
}

async fn load_odds_feed(config: &Config, use_cache: bool) -> Option<Vec<GameOdds>> {
    let api_key = config.odds_api_key.as_ref()?;
    let odds_client =
        OddsApiClient::with_base_url(api_key.clone(), config.odds_api_base_url.clone());
    let odds_cache = config.cache_dir.join("odds_cache.json");

    match load_or_fetch(&odds_cache, use_cache, || odds_client.fetch_games()).await {
        Ok(feed) => Some(feed),
        Err(e) => {
            warn!("Odds API unavailable, using demo odds: {:#}", e);
            None
        }
    }
}

/// Normalize odds, find the best lines and score the slate
pub fn build_betting_data(
    date: NaiveDate,
    games: Vec<Game>,
    feed: Option<&[GameOdds]>,
    api_key_configured: bool,
) -> BettingData {
    let odds_mode = OddsMode::resolve(api_key_configured, feed);
    let mut normalizer = OddsNormalizer::new(odds_mode);
    let odds = normalizer.normalize(&games, feed);
    let best_odds = odds.iter().map(get_best_odds).collect();
    let analysis = analyze_games_for_betting(&games, &odds);

    info!(
        games = games.len(),
        picks = analysis.picks.len(),
        parlays = analysis.parlays.len(),
        "Betting analysis ready ({:?} odds)",
        odds_mode
    );

    BettingData {
        date,
        odds_mode,
        games,
        odds,
        best_odds,
        analysis,
    }
}

/// Fetch the schedule and odds for `date`, then score games and build parlays.
/// Upstream failures degrade to an empty schedule or demo odds; this never fails.
pub async fn fetch_betting_data(config: &Config, date: NaiveDate, use_cache: bool) -> BettingData {
    let games = load_schedule(config, date, use_cache).await;
    let feed = load_odds_feed(config, use_cache).await;
    build_betting_data(date, games, feed.as_deref(), config.has_odds_api_key())
}

/// Same as [`fetch_betting_data`], but the odds feed comes from `odds_feed`
/// while its entry is fresh
pub async fn fetch_betting_data_with(
    config: &Config,
    date: NaiveDate,
    use_cache: bool,
    odds_feed: &OddsFeedCache,
) -> BettingData {
    let games = load_schedule(config, date, use_cache).await;
    let feed = odds_feed
        .get_or_load(|| load_odds_feed(config, use_cache))
        .await;
    build_betting_data(date, games, feed.as_deref(), config.has_odds_api_key())
}

/// Rebuild the betting snapshot for `date` and publish it
pub async fn refresh_betting(
    store: &SnapshotStore<BettingData>,
    config: &Config,
    date: NaiveDate,
    odds_feed: &OddsFeedCache,
) -> bool {
    refresh_with(store, || async move {
        Ok::<_, Infallible>(fetch_betting_data_with(config, date, config.use_cache, odds_feed).await)
    })
    .await
}

/// A game plus the highlighted players from its boxscore
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameCard {
    pub game: Game,
    pub players: TeamPlayers,
    pub boxscore_loaded: bool,
}

/// Why a dashboard has nothing to show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmptyReason {
    NoGames,
    NoQualifyingPlayers,
}

impl EmptyReason {
    pub fn message(&self, country: Country) -> String {
        match self {
            EmptyReason::NoGames => "No hay juegos programados para esta fecha.".to_string(),
            EmptyReason::NoQualifyingPlayers => format!(
                "No se encontraron juegos con {} para esta fecha.",
                country.demonym().to_lowercase()
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub date: NaiveDate,
    pub country: Country,
    pub games: Vec<GameCard>,
}

impl Dashboard {
    /// Games with at least one player from the selected country
    pub fn highlighted(&self) -> impl Iterator<Item = &GameCard> {
        self.games.iter().filter(|card| !card.players.is_empty())
    }

    pub fn empty_reason(&self) -> Option<EmptyReason> {
        if self.games.is_empty() {
            Some(EmptyReason::NoGames)
        } else if self.highlighted().next().is_none() {
            Some(EmptyReason::NoQualifyingPlayers)
        } else {
            None
        }
    }
}

/// Load the schedule, then every boxscore concurrently. A failed boxscore
/// only empties that game's player list; a failed schedule is reported.
pub async fn fetch_dashboard(
    client: &MlbStatsClient,
    date: NaiveDate,
    country: Country,
    cache: &Mutex<BirthCountryCache>,
) -> Result<Dashboard, DashboardError> {
    let games = client
        .fetch_schedule(date)
        .await
        .map_err(|e| DashboardError::ScheduleUnavailable(format!("{:#}", e)))?;

    let mut boxscores: Vec<Option<Boxscore>> =
        join_all(games.iter().map(|game| client.fetch_boxscore(game.game_pk)))
            .await
            .into_iter()
            .zip(&games)
            .map(|(result, game)| {
                result
                    .map_err(|e| warn!(game_pk = game.game_pk, "Boxscore unavailable: {:#}", e))
                    .ok()
            })
            .collect();

    client
        .backfill_birth_countries(boxscores.iter_mut().flatten().collect(), cache)
        .await;

    let cards: Vec<GameCard> = games
        .into_iter()
        .zip(boxscores)
        .map(|(game, boxscore)| GameCard {
            players: boxscore
                .as_ref()
                .map(|b| extract_players(b, country))
                .unwrap_or_default(),
            boxscore_loaded: boxscore.is_some(),
            game,
        })
        .collect();

    let cached_players = cache.lock().await.len();
    info!(
        games = cards.len(),
        cached_players = cached_players,
        "Dashboard loaded for {}",
        date
    );

    Ok(Dashboard {
        date,
        country,
        games: cards,
    })
}
