use crate::utils::game_scorer::Pick;

/// Moneyline assumed for a pick that has no price
pub const DEFAULT_MONEYLINE: i32 = -130;

/// Wager used for the estimated payout shown on every parlay
pub const STANDARD_WAGER: f64 = 100.0;

/// Decimal return (stake included) for one leg at American odds.
/// Missing or zero odds are treated as [`DEFAULT_MONEYLINE`].
pub fn payout_multiplier(moneyline: Option<i32>) -> f64 {
    let odds = match moneyline {
        Some(odds) if odds != 0 => odds,
        _ => DEFAULT_MONEYLINE,
    };

    if odds > 0 {
        1.0 + odds as f64 / 100.0
    } else {
        1.0 + 100.0 / odds.abs() as f64
    }
}

/// Compound the per-leg multipliers of a parlay
pub fn parlay_multiplier<I>(moneylines: I) -> f64
where
    I: IntoIterator<Item = Option<i32>>,
{
    moneylines.into_iter().map(payout_multiplier).product()
}

/// Estimated total return, rounded to the dollar, if every pick wins
pub fn calculate_payout(picks: &[Pick], wager: f64) -> i64 {
    let multiplier = parlay_multiplier(picks.iter().map(|p| p.moneyline));
    (wager * multiplier).round() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payout_multiplier() {
        assert!((payout_multiplier(Some(150)) - 2.5).abs() < 1e-9);
        assert!((payout_multiplier(Some(-200)) - 1.5).abs() < 1e-9);
        assert!((payout_multiplier(None) - (1.0 + 100.0 / 130.0)).abs() < 1e-9);
        assert_eq!(payout_multiplier(Some(0)), payout_multiplier(None));
    }

    #[test]
    fn test_single_default_leg_pays_177() {
        let payout = (STANDARD_WAGER * parlay_multiplier([Some(-130)])).round() as i64;
        assert_eq!(payout, 177);
    }

    #[test]
    fn test_parlay_compounds_legs() {
        let multiplier = parlay_multiplier([Some(100), Some(100), Some(100)]);
        assert!((multiplier - 8.0).abs() < 1e-9);
    }

    #[test]
    fn test_payout_increases_with_wager() {
        let multiplier = parlay_multiplier([Some(-150), Some(120)]);
        let mut previous = 0.0;
        for wager in [1.0, 10.0, 50.0, 100.0, 500.0] {
            let payout = wager * multiplier;
            assert!(payout > previous);
            previous = payout;
        }
    }
}
