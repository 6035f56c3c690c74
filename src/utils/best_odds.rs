use crate::models::{GameOdds, MoneylinePrices, SpreadPrices, TotalPrices};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestMoneyline {
    pub home: Option<i32>,
    pub away: Option<i32>,
    pub best_book: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSpread {
    pub home: Option<i32>,
    pub away: Option<i32>,
    pub point: Option<f64>,
    pub best_book: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestTotal {
    pub over: Option<i32>,
    pub under: Option<i32>,
    pub point: Option<f64>,
    pub best_book: String,
}

/// One row of the per-book comparison table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookLine {
    pub name: String,
    pub moneyline: MoneylinePrices,
    pub spread: SpreadPrices,
    pub total: TotalPrices,
}

/// Best available line per market for a single game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestOdds {
    pub moneyline: Option<BestMoneyline>,
    pub spread: Option<BestSpread>,
    pub total: Option<BestTotal>,
    pub all_books: Vec<BookLine>,
}

/// A later home price replaces the kept one only when it pays strictly more
fn improves_on(current: Option<i32>, candidate: Option<i32>) -> bool {
    match (current, candidate) {
        (None, _) => true,
        (Some(current), Some(candidate)) => candidate > current,
        (Some(_), None) => false,
    }
}

/// Walk the books in feed order and keep the best line for each market
pub fn get_best_odds(game_odds: &GameOdds) -> BestOdds {
    let mut best = BestOdds::default();

    for book in &game_odds.bookmakers {
        if let Some(ml) = book.moneyline {
            let replace = match &best.moneyline {
                None => true,
                Some(kept) => improves_on(kept.home, ml.home),
            };
            if replace {
                best.moneyline = Some(BestMoneyline {
                    home: ml.home,
                    away: ml.away,
                    best_book: book.title.clone(),
                });
            }
        }

        if let Some(spread) = book.spread {
            if best.spread.as_ref().map_or(true, |kept| kept.home.is_none()) {
                best.spread = Some(BestSpread {
                    home: spread.home,
                    away: spread.away,
                    point: spread.home_point,
                    best_book: book.title.clone(),
                });
            }
        }

        if let Some(total) = book.total {
            if best.total.as_ref().map_or(true, |kept| kept.over.is_none()) {
                best.total = Some(BestTotal {
                    over: total.over,
                    under: total.under,
                    point: total.point,
                    best_book: book.title.clone(),
                });
            }
        }

        best.all_books.push(BookLine {
            name: book.title.clone(),
            moneyline: book.moneyline.unwrap_or_default(),
            spread: book.spread.unwrap_or_default(),
            total: book.total.unwrap_or_default(),
        });
    }

    best
}
