//! Game and odds builders and a local HTTP stub shared by the unit tests.

use crate::models::{
    BookmakerOdds, Game, GameOdds, GameTeam, GameTeams, LeagueRecord, MoneylinePrices,
    ProbablePitcher, Team,
};

pub fn team(id: u32, name: &str, wins: u32, losses: u32) -> GameTeam {
    GameTeam {
        team: Team {
            id,
            name: name.to_string(),
        },
        league_record: Some(LeagueRecord { wins, losses }),
        probable_pitcher: None,
        score: None,
    }
}

pub fn game(game_pk: u64, home: GameTeam, away: GameTeam) -> Game {
    Game {
        game_pk,
        game_date: None,
        status: None,
        teams: GameTeams {
            home: Some(home),
            away: Some(away),
        },
        linescore: None,
    }
}

/// Two .500 clubs with no pitchers announced
pub fn even_game(game_pk: u64) -> Game {
    game(
        game_pk,
        team(100 + game_pk as u32, &format!("Home Club {}", game_pk), 50, 50),
        team(200 + game_pk as u32, &format!("Away Club {}", game_pk), 50, 50),
    )
}

pub fn with_pitcher(mut side: GameTeam, name: &str, era: &str) -> GameTeam {
    side.probable_pitcher = Some(ProbablePitcher {
        id: None,
        full_name: Some(name.to_string()),
        era: Some(era.to_string()),
        stats: Vec::new(),
    });
    side
}

pub fn book(title: &str, home: Option<i32>, away: Option<i32>) -> BookmakerOdds {
    BookmakerOdds {
        key: title.to_lowercase(),
        title: title.to_string(),
        moneyline: Some(MoneylinePrices { home, away }),
        spread: None,
        total: None,
    }
}

pub fn feed_event(home_team: &str, away_team: &str, bookmakers: Vec<BookmakerOdds>) -> GameOdds {
    GameOdds {
        id: format!("evt-{}-{}", home_team, away_team),
        game_pk: None,
        home_team: home_team.to_string(),
        away_team: away_team.to_string(),
        commence_time: None,
        synthesized: false,
        bookmakers,
    }
}

/// Serve `app` on an ephemeral local port and return its base URL
pub async fn serve_stub(app: axum::Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}
