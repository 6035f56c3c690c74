use crate::models::{Game, GameOdds};
use crate::utils::game_scorer::{analyze_game, Pick};
use crate::utils::parlay::{generate_parlays, Parlay};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Picks for every scorable game plus the parlays built from them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingAnalysis {
    pub picks: Vec<Pick>,
    pub parlays: Vec<Parlay>,
}

/// Odds record for a game: by game id first, then by the home nickname
fn find_game_odds<'a>(game: &Game, odds: &'a [GameOdds]) -> Option<&'a GameOdds> {
    let game_id = game.game_pk.to_string();
    odds.iter()
        .find(|o| o.game_pk == Some(game.game_pk) || o.id == game_id)
        .or_else(|| {
            let nickname = game.home_name()?.split_whitespace().last()?;
            odds.iter().find(|o| o.home_team.contains(nickname))
        })
}

/// Score every game against its matched odds and assemble the parlays
pub fn analyze_games_for_betting(games: &[Game], odds: &[GameOdds]) -> BettingAnalysis {
    let picks: Vec<Pick> = games
        .iter()
        .filter_map(|game| {
            let pick = analyze_game(game, find_game_odds(game, odds));
            if pick.is_none() {
                debug!(game_pk = game.game_pk, "Skipping game with a missing team");
            }
            pick
        })
        .collect();

    let parlays = generate_parlays(&picks);

    BettingAnalysis { picks, parlays }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::fixtures::{book, even_game, feed_event, game, team};
    use crate::utils::odds_normalizer::{OddsMode, OddsNormalizer};
    use crate::utils::parlay::ParlayTier;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn demo_analysis(games: &[Game]) -> BettingAnalysis {
        let mut normalizer = OddsNormalizer::with_rng(OddsMode::Demo, StdRng::seed_from_u64(7));
        let odds = normalizer.normalize(games, None);
        analyze_games_for_betting(games, &odds)
    }

    #[test]
    fn test_five_games_fill_every_tier() {
        let games: Vec<Game> = (1..=5).map(even_game).collect();
        let analysis = demo_analysis(&games);

        assert_eq!(analysis.picks.len(), 5);
        let tiers: Vec<(ParlayTier, usize)> = analysis
            .parlays
            .iter()
            .map(|p| (p.tier, p.picks.len()))
            .collect();
        assert_eq!(
            tiers,
            vec![
                (ParlayTier::PickDelDia, 1),
                (ParlayTier::Tripleta, 3),
                (ParlayTier::Cuarteta, 4),
                (ParlayTier::Quinteta, 5),
            ]
        );
    }

    #[test]
    fn test_two_games_only_pick_del_dia() {
        let games: Vec<Game> = (1..=2).map(even_game).collect();
        let analysis = demo_analysis(&games);

        assert_eq!(analysis.parlays.len(), 1);
        assert_eq!(analysis.parlays[0].tier, ParlayTier::PickDelDia);
    }

    #[test]
    fn test_no_games_is_empty() {
        let analysis = demo_analysis(&[]);
        assert!(analysis.picks.is_empty());
        assert!(analysis.parlays.is_empty());
    }

    #[test]
    fn test_games_missing_a_team_are_skipped() {
        let mut broken = even_game(2);
        broken.teams.home = None;
        let games = vec![even_game(1), broken];
        let analysis = demo_analysis(&games);
        assert_eq!(analysis.picks.len(), 1);
        assert_eq!(analysis.picks[0].game_pk, 1);
    }

    #[test]
    fn test_odds_found_by_home_nickname() {
        let games = vec![game(
            42,
            team(119, "LA Dodgers", 50, 50),
            team(135, "San Diego Padres", 50, 50),
        )];
        let odds = vec![feed_event(
            "Los Angeles Dodgers",
            "San Diego Padres",
            vec![book("FanDuel", Some(-180), Some(160))],
        )];
        let analysis = analyze_games_for_betting(&games, &odds);
        assert_eq!(analysis.picks[0].home_ml, Some(-180));
        assert_eq!(analysis.picks[0].moneyline, Some(-180));
    }

    #[test]
    fn test_odds_found_by_game_pk() {
        let games = vec![even_game(1), even_game(2)];
        let mut first = feed_event("Unrelated", "Names", vec![book("A", Some(120), Some(-140))]);
        first.game_pk = Some(2);
        let analysis = analyze_games_for_betting(&games, &[first]);
        assert_eq!(analysis.picks[0].home_ml, None);
        assert_eq!(analysis.picks[1].home_ml, Some(120));
    }
}
