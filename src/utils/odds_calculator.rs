/// Convert American odds to implied probability
/// Positive odds (+150) mean you win $150 on a $100 bet
/// Negative odds (-150) mean you need to bet $150 to win $100
pub fn american_odds_to_probability(odds: i32) -> f64 {
    if odds > 0 {
        // For positive odds: 100 / (odds + 100)
        100.0 / (odds as f64 + 100.0)
    } else {
        // For negative odds: |odds| / (|odds| + 100)
        let abs_odds = odds.abs() as f64;
        abs_odds / (abs_odds + 100.0)
    }
}

/// Implied probability for a price that may be missing.
/// Missing (or zero) odds carry no information and map to 0.
pub fn implied_probability(odds: Option<i32>) -> f64 {
    match odds {
        Some(odds) if odds != 0 => american_odds_to_probability(odds),
        _ => 0.0,
    }
}

/// Format American odds for display ("+150", "-110", "N/A")
pub fn format_odds(odds: Option<i32>) -> String {
    match odds {
        Some(odds) if odds > 0 => format!("+{}", odds),
        Some(odds) => odds.to_string(),
        None => "N/A".to_string(),
    }
}

/// Format a spread or total line ("-1.5", "+1.5", "N/A")
pub fn format_point(point: Option<f64>, signed: bool) -> String {
    match point {
        Some(point) if signed => format!("{:+.1}", point),
        Some(point) => format!("{:.1}", point),
        None => "N/A".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_american_odds_to_probability() {
        // Positive odds
        let prob = american_odds_to_probability(150);
        assert!((prob - 0.4).abs() < 0.0001);
        // Negative odds
        let prob = american_odds_to_probability(-110);
        assert!((prob - 0.5238).abs() < 0.0001);
        // Even odds
        let prob = american_odds_to_probability(100);
        assert!((prob - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_implied_probability_stays_in_unit_interval() {
        for odds in [-10_000, -500, -130, -100, 100, 101, 250, 10_000] {
            let prob = implied_probability(Some(odds));
            assert!(prob > 0.0 && prob < 1.0, "odds {} gave {}", odds, prob);
        }
    }

    #[test]
    fn test_implied_probability_missing_odds() {
        assert_eq!(implied_probability(None), 0.0);
        assert_eq!(implied_probability(Some(0)), 0.0);
    }

    #[test]
    fn test_format_odds() {
        assert_eq!(format_odds(Some(150)), "+150");
        assert_eq!(format_odds(Some(-110)), "-110");
        assert_eq!(format_odds(None), "N/A");
        assert_eq!(format_point(Some(-1.5), true), "-1.5");
        assert_eq!(format_point(Some(1.5), true), "+1.5");
        assert_eq!(format_point(Some(8.5), false), "8.5");
        assert_eq!(format_point(None, false), "N/A");
    }
}
