use anyhow::{Context, Result};
use chrono::{Datelike, Local, NaiveDate};
use clap::{Parser, Subcommand};
use mlb_parlay_picks::utils::data::{save_parlays_to_csv, save_picks_to_csv};
use mlb_parlay_picks::{
    fetch_betting_data, fetch_dashboard, format_odds, format_point, BettingData, BirthCountryCache,
    Config, Country, LeaderCategory, MlbStatsClient, OddsApiClient, PlayerLine, StatRow,
    HITTING_COLUMNS, PITCHING_COLUMNS,
};
use std::path::PathBuf;
use tokio::sync::Mutex;

#[derive(Parser)]
#[command(name = "mlb-picks", about = "MLB picks, parlays and player tracker")]
struct Cli {
    /// Date to analyze (YYYY-MM-DD), defaults to today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Score games and build parlays
    Picks {
        /// Reuse cached schedule and odds when available
        #[arg(long)]
        use_cache: bool,

        /// Write picks.csv and parlays.csv into this directory
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Print the full analysis as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// List players from one country in today's boxscores
    Players {
        /// Country code (DR or VE)
        #[arg(long)]
        country: Option<Country>,
    },
    /// Season leaders born in one country
    Leaders {
        /// Season year, defaults to the year of --date
        #[arg(long)]
        season: Option<i32>,

        /// Country code (DR or VE)
        #[arg(long)]
        country: Option<Country>,
    },
    /// Season and career stats for one player
    Profile {
        /// MLB person id
        id: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let date = cli.date.unwrap_or_else(|| Local::now().date_naive());

    match cli.command.unwrap_or(Command::Picks {
        use_cache: config.use_cache,
        csv: None,
        json: false,
    }) {
        Command::Picks {
            use_cache,
            csv,
            json,
        } => run_picks(&config, date, use_cache || config.use_cache, csv, json).await,
        Command::Players { country } => {
            run_players(&config, date, country.unwrap_or(config.country)).await
        }
        Command::Leaders { season, country } => {
            run_leaders(
                &config,
                season.unwrap_or_else(|| date.year()),
                country.unwrap_or(config.country),
            )
            .await
        }
        Command::Profile { id } => run_profile(&config, id).await,
    }
}

async fn run_picks(
    config: &Config,
    date: NaiveDate,
    use_cache: bool,
    csv: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let data = fetch_betting_data(config, date, use_cache).await;

    if json {
        println!("{}", serde_json::to_string_pretty(&data.analysis)?);
    } else {
        print_report(&data);
    }

    if let Some(dir) = csv {
        std::fs::create_dir_all(&dir).context("Failed to create CSV directory")?;
        save_picks_to_csv(&data.analysis.picks, dir.join("picks.csv"))?;
        save_parlays_to_csv(&data.analysis.parlays, dir.join("parlays.csv"))?;
        println!("\nSaved picks and parlays to {}", dir.display());
    }

    if let Some(api_key) = &config.odds_api_key {
        let odds_client =
            OddsApiClient::with_base_url(api_key.clone(), config.odds_api_base_url.clone());
        if let Err(e) = odds_client.check_usage().await {
            eprintln!("Could not check Odds API usage: {:#}", e);
        }
    }

    Ok(())
}

fn print_report(data: &BettingData) {
    println!("MLB Parlay Picks for {}\n", data.date);
    println!("{}\n", data.odds_mode.banner());

    if data.games.is_empty() {
        println!("No games scheduled.");
        return;
    }

    println!("PICKS\n");
    if data.analysis.picks.is_empty() {
        println!("No picks available.");
    }
    for (i, pick) in data.analysis.picks.iter().enumerate() {
        println!("{}. {}", i + 1, pick.format());
    }

    println!("\nPARLAYS\n");
    if data.analysis.parlays.is_empty() {
        println!("Not enough picks for a parlay.");
    }
    for parlay in &data.analysis.parlays {
        println!("{}", parlay.format());
        for pick in &parlay.picks {
            println!(
                "    - {} ({})",
                pick.favored_team,
                format_odds(pick.moneyline)
            );
        }
    }

    println!("\nBEST ODDS\n");
    for (odds, best) in data.odds.iter().zip(&data.best_odds) {
        println!("{} @ {}", odds.away_team, odds.home_team);
        if let Some(ml) = &best.moneyline {
            println!(
                "    ML: {} {} / {} {} ({})",
                odds.away_team,
                format_odds(ml.away),
                odds.home_team,
                format_odds(ml.home),
                ml.best_book
            );
        }
        if let Some(spread) = &best.spread {
            println!(
                "    Run line: home {} {} ({})",
                format_point(spread.point, true),
                format_odds(spread.home),
                spread.best_book
            );
        }
        if let Some(total) = &best.total {
            println!(
                "    Total: {} O {} / U {} ({})",
                format_point(total.point, false),
                format_odds(total.over),
                format_odds(total.under),
                total.best_book
            );
        }
    }
}

async fn run_players(config: &Config, date: NaiveDate, country: Country) -> Result<()> {
    let client = MlbStatsClient::new(config.mlb_api_base_url.clone());
    let cache = Mutex::new(BirthCountryCache::new());

    let dashboard = match fetch_dashboard(&client, date, country, &cache).await {
        Ok(dashboard) => dashboard,
        Err(e) => {
            eprintln!("{}", e.user_message());
            return Err(e.into());
        }
    };

    println!("{} {} en MLB, {}\n", country.flag(), country.demonym(), date);

    if let Some(reason) = dashboard.empty_reason() {
        println!("{}", reason.message(country));
        return Ok(());
    }

    for card in dashboard.highlighted() {
        let game = &card.game;
        println!(
            "{} @ {} [{}]",
            game.away_name().unwrap_or("?"),
            game.home_name().unwrap_or("?"),
            game.status_text()
        );
        for player in card.players.away.iter().chain(&card.players.home) {
            println!("    {}", player_summary(player));
        }
    }

    Ok(())
}

fn player_summary(player: &PlayerLine) -> String {
    if !player.participated {
        return format!("{} ({}) sin participación", player.name, player.position);
    }

    if player.is_pitcher {
        let p = &player.pitching;
        format!(
            "{} ({}) {} IP, {} H, {} ER, {} K, {} BB",
            player.name, player.position, p.innings_pitched, p.hits, p.earned_runs, p.strike_outs, p.walks
        )
    } else {
        let b = &player.batting;
        format!(
            "{} ({}) {}-{}, {} R, {} HR, {} RBI",
            player.name, player.position, b.hits, b.at_bats, b.runs, b.home_runs, b.rbi
        )
    }
}

async fn run_leaders(config: &Config, season: i32, country: Country) -> Result<()> {
    let client = MlbStatsClient::new(config.mlb_api_base_url.clone());
    let leaders = client.fetch_leaders(season, country).await?;

    println!("{} Líderes {} {}\n", country.flag(), country.demonym(), season);

    if leaders.is_empty() {
        println!(
            "No hay líderes {} en esta temporada.",
            country.demonym().to_lowercase()
        );
        return Ok(());
    }

    println!("BATEO\n");
    print_leader_categories(&leaders.hitting);
    println!("\nPITCHEO\n");
    print_leader_categories(&leaders.pitching);

    Ok(())
}

fn print_leader_categories(categories: &[LeaderCategory]) {
    for category in categories.iter().filter(|c| !c.leaders.is_empty()) {
        println!("{} ({})", category.label, category.abbreviation);
        for leader in &category.leaders {
            println!(
                "    {:>3}. {} ({}) {}",
                leader.rank, leader.name, leader.team_name, leader.value
            );
        }
    }
}

async fn run_profile(config: &Config, id: u64) -> Result<()> {
    let client = MlbStatsClient::new(config.mlb_api_base_url.clone());
    let Some(profile) = client.fetch_player_profile(id).await? else {
        anyhow::bail!("No player with id {}", id);
    };

    println!(
        "{} {}",
        profile.full_name.as_deref().unwrap_or("?"),
        profile
            .primary_position
            .as_ref()
            .and_then(|p| p.abbreviation.as_deref())
            .unwrap_or_default()
    );
    if let Some(country) = &profile.birth_country {
        println!("Nacido en {}", country);
    }

    print_stat_table("Bateo", &HITTING_COLUMNS, &profile.hitting_rows());
    print_stat_table("Pitcheo", &PITCHING_COLUMNS, &profile.pitching_rows());

    Ok(())
}

fn print_stat_table(title: &str, columns: &[(&str, &str)], rows: &[StatRow]) {
    if rows.is_empty() {
        return;
    }

    println!("\n{}", title);
    let header: Vec<String> = columns.iter().map(|(h, _)| format!("{:>6}", h)).collect();
    println!("{:<10}{}", "", header.join(""));
    for row in rows {
        let values: Vec<String> = row.values.iter().map(|v| format!("{:>6}", v)).collect();
        println!("{:<10}{}", row.label, values.join(""));
    }
}
