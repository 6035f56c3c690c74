use crate::utils::game_scorer::Pick;
use crate::utils::payout::{calculate_payout, STANDARD_WAGER};
use serde::{Deserialize, Serialize};

/// The four fixed parlay bundles, smallest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParlayTier {
    PickDelDia,
    Tripleta,
    Cuarteta,
    Quinteta,
}

impl ParlayTier {
    pub const ALL: [ParlayTier; 4] = [
        ParlayTier::PickDelDia,
        ParlayTier::Tripleta,
        ParlayTier::Cuarteta,
        ParlayTier::Quinteta,
    ];

    /// Number of picks in the bundle
    pub fn size(&self) -> usize {
        match self {
            ParlayTier::PickDelDia => 1,
            ParlayTier::Tripleta => 3,
            ParlayTier::Cuarteta => 4,
            ParlayTier::Quinteta => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ParlayTier::PickDelDia => "Pick del Día",
            ParlayTier::Tripleta => "Tripleta",
            ParlayTier::Cuarteta => "Cuarteta",
            ParlayTier::Quinteta => "Quinteta",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            ParlayTier::PickDelDia => "⭐",
            ParlayTier::Tripleta => "🎯",
            ParlayTier::Cuarteta => "🔥",
            ParlayTier::Quinteta => "💎",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ParlayTier::PickDelDia => "La apuesta individual más fuerte del día",
            ParlayTier::Tripleta => "3 picks seleccionados - balance óptimo",
            ParlayTier::Cuarteta => "4 picks de alta confianza",
            ParlayTier::Quinteta => "5 picks premium - mayor riesgo, mayor pago",
        }
    }

    pub fn risk_level(&self) -> &'static str {
        match self {
            ParlayTier::PickDelDia => "Bajo",
            ParlayTier::Tripleta => "Moderado",
            ParlayTier::Cuarteta => "Alto",
            ParlayTier::Quinteta => "Muy Alto",
        }
    }
}

/// A bundle of the strongest picks of the day
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parlay {
    pub tier: ParlayTier,
    pub picks: Vec<Pick>,
    /// Product of the member confidences (legs treated as independent)
    pub combined_confidence: f64,
    /// Total return on a $100 wager if every leg wins
    pub estimated_payout: i64,
}

impl Parlay {
    fn build(tier: ParlayTier, picks: &[Pick]) -> Self {
        let picks = picks[..tier.size()].to_vec();
        let combined_confidence = picks.iter().map(|p| p.confidence).product();
        let estimated_payout = calculate_payout(&picks, STANDARD_WAGER);

        Self {
            tier,
            picks,
            combined_confidence,
            estimated_payout,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{} {} ({} picks) | Combined: {:.1}% | $100 pays ${} | Risk: {}",
            self.tier.emoji(),
            self.tier.label(),
            self.picks.len(),
            self.combined_confidence * 100.0,
            self.estimated_payout,
            self.tier.risk_level()
        )
    }
}

/// Rank picks by confidence and build every tier there are enough picks for
pub fn generate_parlays(picks: &[Pick]) -> Vec<Parlay> {
    let mut sorted = picks.to_vec();
    sorted.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    ParlayTier::ALL
        .iter()
        .filter(|tier| sorted.len() >= tier.size())
        .map(|&tier| Parlay::build(tier, &sorted))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::game_scorer::ConfidenceLevel;

    fn pick(game_pk: u64, confidence: f64, moneyline: Option<i32>) -> Pick {
        Pick {
            game_pk,
            favored_team: format!("Team {}", game_pk),
            favored_team_id: game_pk as u32,
            opposing_team: "Opponent".to_string(),
            confidence,
            confidence_level: ConfidenceLevel::from_score(confidence),
            moneyline,
            record: "50-50".to_string(),
            reasons: vec!["Ventaja de localía".to_string()],
            is_home: true,
            home_team: format!("Team {}", game_pk),
            away_team: "Opponent".to_string(),
            home_ml: moneyline,
            away_ml: None,
        }
    }

    #[test]
    fn test_no_picks_no_parlays() {
        assert!(generate_parlays(&[]).is_empty());
    }

    #[test]
    fn test_two_picks_only_single() {
        let parlays = generate_parlays(&[pick(1, 0.55, None), pick(2, 0.7, None)]);
        assert_eq!(parlays.len(), 1);
        assert_eq!(parlays[0].tier, ParlayTier::PickDelDia);
        assert_eq!(parlays[0].picks[0].game_pk, 2);
        assert_eq!(parlays[0].combined_confidence, 0.7);
    }

    #[test]
    fn test_all_tiers_with_five_picks() {
        let picks: Vec<Pick> = [0.51, 0.8, 0.6, 0.72, 0.66]
            .iter()
            .enumerate()
            .map(|(i, &c)| pick(i as u64, c, Some(-130)))
            .collect();
        let parlays = generate_parlays(&picks);

        let tiers: Vec<ParlayTier> = parlays.iter().map(|p| p.tier).collect();
        assert_eq!(tiers, ParlayTier::ALL.to_vec());

        let tripleta = &parlays[1];
        let order: Vec<u64> = tripleta.picks.iter().map(|p| p.game_pk).collect();
        assert_eq!(order, vec![1, 3, 4]);
        assert!((tripleta.combined_confidence - 0.8 * 0.72 * 0.66).abs() < 1e-12);
        assert_eq!(parlays[0].estimated_payout, 177);
        assert_eq!(parlays[3].tier.risk_level(), "Muy Alto");
    }

    #[test]
    fn test_combined_confidence_non_increasing() {
        let picks: Vec<Pick> = (0..5).map(|i| pick(i, 0.85 - i as f64 * 0.05, None)).collect();
        let parlays = generate_parlays(&picks);
        for pair in parlays.windows(2) {
            assert!(pair[1].combined_confidence <= pair[0].combined_confidence);
            assert!(pair[1].estimated_payout >= pair[0].estimated_payout);
        }
    }

    #[test]
    fn test_equal_confidence_keeps_input_order() {
        let picks = vec![pick(7, 0.6, None), pick(8, 0.6, None), pick(9, 0.6, None)];
        let parlays = generate_parlays(&picks);
        let order: Vec<u64> = parlays[1].picks.iter().map(|p| p.game_pk).collect();
        assert_eq!(order, vec![7, 8, 9]);
    }

    #[test]
    fn test_payout_uses_pick_moneylines() {
        let picks = vec![pick(1, 0.7, Some(150)), pick(2, 0.6, Some(-200)), pick(3, 0.5, None)];
        let parlays = generate_parlays(&picks);
        // 2.5 * 1.5 * (1 + 100/130) * 100
        assert_eq!(parlays[1].estimated_payout, 663);
    }
}
