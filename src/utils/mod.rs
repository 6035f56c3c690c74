pub mod best_odds;
pub mod betting_analysis;
pub mod data;
pub mod game_scorer;
pub mod nationality;
pub mod odds_calculator;
pub mod odds_normalizer;
pub mod parlay;
pub mod payout;
pub mod refresh;

#[cfg(test)]
pub(crate) mod fixtures;

pub use best_odds::*;
pub use betting_analysis::*;
pub use game_scorer::*;
pub use nationality::*;
pub use odds_calculator::*;
pub use odds_normalizer::*;
pub use parlay::*;
pub use payout::*;
pub use refresh::*;
