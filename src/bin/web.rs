use anyhow::{Context, Result};
use askama::Template;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Datelike, Local, NaiveDate};
use mlb_parlay_picks::{
    fetch_betting_data_with, fetch_dashboard, format_odds, format_point, refresh_betting,
    refresh_with, BestOdds, BettingData, BirthCountryCache, Config, CountryLeaders, Dashboard,
    DashboardError, GameCard, GameOdds, LeaderCategory, MlbStatsClient, OddsFeedCache, Parlay,
    Pick, PlayerLine, PlayerProfile, SnapshotStore, StatRow, HITTING_COLUMNS, PITCHING_COLUMNS,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant};
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;
use tower_http::services::ServeDir;
use tracing::{info, warn};

// Custom filters for formatting
mod filters {
    pub fn format_percent(value: &f64) -> ::askama::Result<String> {
        Ok(format!("{:.1}%", value * 100.0))
    }
}

struct PickView {
    emoji: &'static str,
    level: &'static str,
    team: String,
    opponent: String,
    venue: &'static str,
    confidence: f64,
    moneyline: String,
    record: String,
    reasons: Vec<String>,
}

impl From<&Pick> for PickView {
    fn from(pick: &Pick) -> Self {
        Self {
            emoji: pick.confidence_level.emoji(),
            level: pick.confidence_level.label(),
            team: pick.favored_team.clone(),
            opponent: pick.opposing_team.clone(),
            venue: if pick.is_home { "Local" } else { "Visitante" },
            confidence: pick.confidence,
            moneyline: format_odds(pick.moneyline),
            record: pick.record.clone(),
            reasons: pick.reasons.clone(),
        }
    }
}

struct ParlayView {
    emoji: &'static str,
    label: &'static str,
    description: &'static str,
    risk: &'static str,
    combined_confidence: f64,
    payout: i64,
    legs: Vec<PickView>,
}

impl From<&Parlay> for ParlayView {
    fn from(parlay: &Parlay) -> Self {
        Self {
            emoji: parlay.tier.emoji(),
            label: parlay.tier.label(),
            description: parlay.tier.description(),
            risk: parlay.tier.risk_level(),
            combined_confidence: parlay.combined_confidence,
            payout: parlay.estimated_payout,
            legs: parlay.picks.iter().map(PickView::from).collect(),
        }
    }
}

struct BookRow {
    name: String,
    away_ml: String,
    home_ml: String,
    home_spread: String,
    total: String,
}

struct OddsView {
    away_team: String,
    home_team: String,
    synthesized: bool,
    best_moneyline: String,
    best_spread: String,
    best_total: String,
    books: Vec<BookRow>,
}

impl OddsView {
    fn new(odds: &GameOdds, best: &BestOdds) -> Self {
        let best_moneyline = best.moneyline.as_ref().map_or_else(
            || "N/A".to_string(),
            |ml| {
                format!(
                    "{} / {} ({})",
                    format_odds(ml.away),
                    format_odds(ml.home),
                    ml.best_book
                )
            },
        );
        let best_spread = best.spread.as_ref().map_or_else(
            || "N/A".to_string(),
            |s| {
                format!(
                    "{} {} ({})",
                    format_point(s.point, true),
                    format_odds(s.home),
                    s.best_book
                )
            },
        );
        let best_total = best.total.as_ref().map_or_else(
            || "N/A".to_string(),
            |t| {
                format!(
                    "{} O {} / U {} ({})",
                    format_point(t.point, false),
                    format_odds(t.over),
                    format_odds(t.under),
                    t.best_book
                )
            },
        );

        let books = best
            .all_books
            .iter()
            .map(|book| BookRow {
                name: book.name.clone(),
                away_ml: format_odds(book.moneyline.away),
                home_ml: format_odds(book.moneyline.home),
                home_spread: format!(
                    "{} ({})",
                    format_point(book.spread.home_point, true),
                    format_odds(book.spread.home)
                ),
                total: format_point(book.total.point, false),
            })
            .collect();

        Self {
            away_team: odds.away_team.clone(),
            home_team: odds.home_team.clone(),
            synthesized: odds.synthesized,
            best_moneyline,
            best_spread,
            best_total,
            books,
        }
    }
}

struct PlayerRow {
    id: u64,
    name: String,
    position: String,
    jersey: String,
    line: String,
    participated: bool,
}

impl From<&PlayerLine> for PlayerRow {
    fn from(player: &PlayerLine) -> Self {
        let line = if !player.participated {
            "Sin participación".to_string()
        } else if player.is_pitcher {
            let p = &player.pitching;
            format!(
                "{} IP, {} H, {} ER, {} K, {} BB",
                p.innings_pitched, p.hits, p.earned_runs, p.strike_outs, p.walks
            )
        } else {
            let b = &player.batting;
            format!(
                "{}-{}, {} R, {} HR, {} RBI, AVG {}",
                b.hits, b.at_bats, b.runs, b.home_runs, b.rbi, b.avg
            )
        };

        Self {
            id: player.id,
            name: player.name.clone(),
            position: player.position.clone(),
            jersey: player.jersey_number.clone().unwrap_or_default(),
            line,
            participated: player.participated,
        }
    }
}

struct GameCardView {
    away_team: String,
    home_team: String,
    away_score: String,
    home_score: String,
    status: String,
    is_live: bool,
    boxscore_loaded: bool,
    away_players: Vec<PlayerRow>,
    home_players: Vec<PlayerRow>,
}

impl From<&GameCard> for GameCardView {
    fn from(card: &GameCard) -> Self {
        let game = &card.game;
        let score = |team: Option<u32>| team.map(|s| s.to_string()).unwrap_or_default();

        Self {
            away_team: game.away_name().unwrap_or("?").to_string(),
            home_team: game.home_name().unwrap_or("?").to_string(),
            away_score: score(game.teams.away.as_ref().and_then(|t| t.score)),
            home_score: score(game.teams.home.as_ref().and_then(|t| t.score)),
            status: game.status_text(),
            is_live: game.is_live(),
            boxscore_loaded: card.boxscore_loaded,
            away_players: card.players.away.iter().map(PlayerRow::from).collect(),
            home_players: card.players.home.iter().map(PlayerRow::from).collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "home.html")]
struct HomeTemplate {
    active_page: String,
    date: String,
    banner: &'static str,
    game_count: usize,
    parlays: Vec<ParlayView>,
    picks: Vec<PickView>,
}

#[derive(Template)]
#[template(path = "odds.html")]
struct OddsTemplate {
    active_page: String,
    date: String,
    banner: &'static str,
    games: Vec<OddsView>,
}

#[derive(Template)]
#[template(path = "players.html")]
struct PlayersTemplate {
    active_page: String,
    date: String,
    flag: &'static str,
    demonym: &'static str,
    refreshed_at: String,
    error: Option<&'static str>,
    empty_message: Option<String>,
    games: Vec<GameCardView>,
}

#[derive(Template)]
#[template(path = "leaders.html")]
struct LeadersTemplate {
    active_page: String,
    date: String,
    season: i32,
    flag: &'static str,
    demonym: &'static str,
    error: Option<String>,
    empty: bool,
    hitting: Vec<LeaderCategory>,
    pitching: Vec<LeaderCategory>,
}

#[derive(Template)]
#[template(path = "player.html")]
struct PlayerTemplate {
    active_page: String,
    date: String,
    name: String,
    details: Vec<String>,
    hitting_columns: Vec<&'static str>,
    hitting_rows: Vec<StatRow>,
    pitching_columns: Vec<&'static str>,
    pitching_rows: Vec<StatRow>,
}

impl PlayerTemplate {
    fn new(profile: &PlayerProfile) -> Self {
        let mut details = Vec::new();
        if let Some(position) = profile
            .primary_position
            .as_ref()
            .and_then(|p| p.abbreviation.clone())
        {
            details.push(position);
        }
        if let Some(number) = &profile.primary_number {
            details.push(format!("#{}", number));
        }
        if let (Some(bats), Some(throws)) = (&profile.bat_side, &profile.pitch_hand) {
            details.push(format!("B/T: {}/{}", bats.code, throws.code));
        }
        if let Some(height) = &profile.height {
            details.push(height.clone());
        }
        if let Some(weight) = profile.weight {
            details.push(format!("{} lb", weight));
        }
        let birthplace: Vec<&str> = [&profile.birth_city, &profile.birth_country]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect();
        if !birthplace.is_empty() {
            details.push(birthplace.join(", "));
        }

        Self {
            active_page: "leaders".to_string(),
            date: today().to_string(),
            name: profile.full_name.clone().unwrap_or_default(),
            details,
            hitting_columns: HITTING_COLUMNS.iter().map(|(header, _)| *header).collect(),
            hitting_rows: profile.hitting_rows(),
            pitching_columns: PITCHING_COLUMNS.iter().map(|(header, _)| *header).collect(),
            pitching_rows: profile.pitching_rows(),
        }
    }
}

struct HtmlTemplate<T>(T);

impl<T> IntoResponse for HtmlTemplate<T>
where
    T: Template,
{
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to render template: {}", err),
            )
                .into_response(),
        }
    }
}

type DashboardResult = Result<Dashboard, DashboardError>;

struct AppState {
    config: Config,
    client: MlbStatsClient,
    birth_countries: Mutex<BirthCountryCache>,
    odds_feed: OddsFeedCache,
    betting: SnapshotStore<BettingData>,
    dashboard: SnapshotStore<DashboardResult>,
}

type SharedState = Arc<AppState>;

#[derive(Debug, Deserialize)]
struct DateQuery {
    date: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
struct SeasonQuery {
    season: Option<i32>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl AppState {
    /// Betting data for `date`; today's comes from the snapshot, other dates are fetched
    async fn betting_for(&self, date: Option<NaiveDate>) -> Option<Arc<BettingData>> {
        let date = date.unwrap_or_else(today);

        if let Some(snapshot) = self.betting.latest().await {
            if snapshot.data.date == date {
                return Some(snapshot.data);
            }
        }

        if date == today() {
            refresh_betting(&self.betting, &self.config, date, &self.odds_feed).await;
            return self.betting.latest().await.map(|s| s.data);
        }

        Some(Arc::new(
            fetch_betting_data_with(&self.config, date, self.config.use_cache, &self.odds_feed)
                .await,
        ))
    }

    async fn load_dashboard(&self, date: NaiveDate) -> DashboardResult {
        fetch_dashboard(&self.client, date, self.config.country, &self.birth_countries).await
    }
}

async fn home(
    State(state): State<SharedState>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    let data = match state.betting_for(query.date).await {
        Some(data) => data,
        None => {
            return (StatusCode::SERVICE_UNAVAILABLE, "Data not loaded yet").into_response();
        }
    };

    let template = HomeTemplate {
        active_page: "home".to_string(),
        date: data.date.to_string(),
        banner: data.odds_mode.banner(),
        game_count: data.games.len(),
        parlays: data.analysis.parlays.iter().map(ParlayView::from).collect(),
        picks: data.analysis.picks.iter().map(PickView::from).collect(),
    };

    HtmlTemplate(template).into_response()
}

async fn odds(
    State(state): State<SharedState>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    let data = match state.betting_for(query.date).await {
        Some(data) => data,
        None => {
            return (StatusCode::SERVICE_UNAVAILABLE, "Data not loaded yet").into_response();
        }
    };

    let template = OddsTemplate {
        active_page: "odds".to_string(),
        date: data.date.to_string(),
        banner: data.odds_mode.banner(),
        games: data
            .odds
            .iter()
            .zip(&data.best_odds)
            .map(|(odds, best)| OddsView::new(odds, best))
            .collect(),
    };

    HtmlTemplate(template).into_response()
}

async fn players(
    State(state): State<SharedState>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    let date = query.date.unwrap_or_else(today);
    let country = state.config.country;

    let (result, refreshed_at) = match state.dashboard.latest().await {
        Some(snapshot) if date == today() || snapshot_date(&snapshot.data) == Some(date) => {
            let refreshed_at = snapshot
                .refreshed_at
                .with_timezone(&Local)
                .format("%H:%M:%S")
                .to_string();
            (snapshot.data, refreshed_at)
        }
        _ => (Arc::new(state.load_dashboard(date).await), String::new()),
    };

    let (error, empty_message, games) = match result.as_ref() {
        Ok(dashboard) => (
            None,
            dashboard.empty_reason().map(|r| r.message(country)),
            dashboard.highlighted().map(GameCardView::from).collect(),
        ),
        Err(e) => (Some(e.user_message()), None, Vec::new()),
    };

    let template = PlayersTemplate {
        active_page: "players".to_string(),
        date: date.to_string(),
        flag: country.flag(),
        demonym: country.demonym(),
        refreshed_at,
        error,
        empty_message,
        games,
    };

    HtmlTemplate(template).into_response()
}

fn snapshot_date(result: &DashboardResult) -> Option<NaiveDate> {
    result.as_ref().ok().map(|d| d.date)
}

/// Retry button on the players page: reload now and publish even a failure
async fn retry_players(State(state): State<SharedState>) -> Redirect {
    let ticket = state.dashboard.begin();
    let result = state.load_dashboard(today()).await;
    state.dashboard.publish(ticket, result).await;
    Redirect::to("/players")
}

async fn api_analysis(
    State(state): State<SharedState>,
    Query(query): Query<DateQuery>,
) -> impl IntoResponse {
    match state.betting_for(query.date).await {
        Some(data) => Json(data.analysis.clone()).into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "Data not loaded yet").into_response(),
    }
}

async fn api_dashboard(State(state): State<SharedState>) -> impl IntoResponse {
    let Some(snapshot) = state.dashboard.latest().await else {
        return (StatusCode::SERVICE_UNAVAILABLE, "Data not loaded yet").into_response();
    };

    match snapshot.data.as_ref() {
        Ok(dashboard) => Json(dashboard.clone()).into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, e.to_string()).into_response(),
    }
}

async fn leaders(
    State(state): State<SharedState>,
    Query(query): Query<SeasonQuery>,
) -> impl IntoResponse {
    let season = query.season.unwrap_or_else(|| today().year());
    let country = state.config.country;

    let (error, leaders) = match state.client.fetch_leaders(season, country).await {
        Ok(leaders) => (None, Some(leaders)),
        Err(e) => {
            warn!("Leaders unavailable for {}: {:#}", season, e);
            (
                Some("Error al cargar los líderes. Por favor intente de nuevo.".to_string()),
                None,
            )
        }
    };
    let empty = leaders.as_ref().is_some_and(CountryLeaders::is_empty);
    let (hitting, pitching) = leaders
        .map(|l| (l.hitting, l.pitching))
        .unwrap_or_default();

    let template = LeadersTemplate {
        active_page: "leaders".to_string(),
        date: today().to_string(),
        season,
        flag: country.flag(),
        demonym: country.demonym(),
        error,
        empty,
        hitting,
        pitching,
    };

    HtmlTemplate(template).into_response()
}

async fn player(State(state): State<SharedState>, Path(id): Path<u64>) -> impl IntoResponse {
    match state.client.fetch_player_profile(id).await {
        Ok(Some(profile)) => HtmlTemplate(PlayerTemplate::new(&profile)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Player not found").into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, format!("{:#}", e)).into_response(),
    }
}

async fn api_leaders(
    State(state): State<SharedState>,
    Query(query): Query<SeasonQuery>,
) -> impl IntoResponse {
    let season = query.season.unwrap_or_else(|| today().year());

    match state.client.fetch_leaders(season, state.config.country).await {
        Ok(leaders) => Json(leaders).into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, format!("{:#}", e)).into_response(),
    }
}

async fn api_player(State(state): State<SharedState>, Path(id): Path<u64>) -> impl IntoResponse {
    match state.client.fetch_player_profile(id).await {
        Ok(Some(profile)) => Json(profile).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "Player not found").into_response(),
        Err(e) => (StatusCode::BAD_GATEWAY, format!("{:#}", e)).into_response(),
    }
}

/// Keep today's dashboard and betting data fresh. A failed refresh keeps the
/// previous snapshot; odds are only re-requested once the feed cache expires.
async fn refresh_loop(state: SharedState) {
    let period = state.config.refresh_interval;
    let mut ticks = IntervalStream::new(interval_at(Instant::now() + period, period));

    while ticks.next().await.is_some() {
        let date = today();
        let load = state.load_dashboard(date);
        let refreshed = refresh_with(&state.dashboard, || async move { load.await.map(Ok) }).await;

        if refreshed {
            info!("Dashboard refreshed for {}", date);
        }

        if refresh_betting(&state.betting, &state.config, date, &state.odds_feed).await {
            info!("Betting data refreshed for {}", date);
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let date = today();

    println!("Fetching MLB data for {}...", date);

    let state = Arc::new(AppState {
        client: MlbStatsClient::new(config.mlb_api_base_url.clone()),
        birth_countries: Mutex::new(BirthCountryCache::new()),
        odds_feed: OddsFeedCache::new(config.odds_refresh_interval),
        betting: SnapshotStore::new(),
        dashboard: SnapshotStore::new(),
        config,
    });

    let ticket = state.betting.begin();
    let data = fetch_betting_data_with(
        &state.config,
        date,
        state.config.use_cache,
        &state.odds_feed,
    )
    .await;
    println!("Data loaded ({:?} odds)", data.odds_mode);
    println!("  - {} games", data.games.len());
    println!("  - {} picks", data.analysis.picks.len());
    println!("  - {} parlays", data.analysis.parlays.len());
    state.betting.publish(ticket, data).await;

    let ticket = state.dashboard.begin();
    let dashboard = state.load_dashboard(date).await;
    if let Err(e) = &dashboard {
        eprintln!("Error loading players: {}", e);
        eprintln!("Server will start but the players page will offer a retry");
    }
    state.dashboard.publish(ticket, dashboard).await;

    tokio::spawn(refresh_loop(Arc::clone(&state)));

    let bind_addr = state.config.bind_addr.clone();
    println!("\nStarting web server at http://{}", bind_addr);
    println!("Press Ctrl+C to stop\n");

    let app = Router::new()
        .nest_service("/static", ServeDir::new("static"))
        .route("/", get(home))
        .route("/odds", get(odds))
        .route("/players", get(players))
        .route("/players/retry", post(retry_players))
        .route("/leaders", get(leaders))
        .route("/player/:id", get(player))
        .route("/api/analysis", get(api_analysis))
        .route("/api/dashboard", get(api_dashboard))
        .route("/api/leaders", get(api_leaders))
        .route("/api/player/:id", get(api_player))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
