use crate::utils::game_scorer::Pick;
use crate::utils::parlay::Parlay;
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Save any serializable data to a JSON cache file
pub fn save_to_cache<T: Serialize + ?Sized>(data: &T, cache_file: impl AsRef<Path>) -> Result<()> {
    let cache_file = cache_file.as_ref();
    if let Some(dir) = cache_file.parent() {
        std::fs::create_dir_all(dir).context("Failed to create cache directory")?;
    }

    let json = serde_json::to_string_pretty(data).context("Failed to serialize cache data")?;
    std::fs::write(cache_file, json).context("Failed to write cache file")?;
    Ok(())
}

/// Load data from a JSON cache file
pub fn load_from_cache<T: DeserializeOwned>(cache_file: impl AsRef<Path>) -> Result<T> {
    let json = std::fs::read_to_string(cache_file).context("Failed to read cache file")?;
    let data = serde_json::from_str(&json).context("Failed to deserialize cache data")?;
    Ok(data)
}

/// Save picks to CSV
pub fn save_picks_to_csv(picks: &[Pick], filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    writer.write_record([
        "Game",
        "Favored Team",
        "Opponent",
        "Home",
        "Moneyline",
        "Confidence (%)",
        "Tier",
        "Record",
        "Reasons",
    ])?;

    for pick in picks {
        writer.write_record([
            pick.game_pk.to_string(),
            pick.favored_team.clone(),
            pick.opposing_team.clone(),
            pick.is_home.to_string(),
            pick.moneyline.map(|ml| ml.to_string()).unwrap_or_default(),
            format!("{:.1}", pick.confidence * 100.0),
            pick.confidence_level.label().to_string(),
            pick.record.clone(),
            pick.reasons.join("; "),
        ])?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

/// Save parlays to CSV, one row per leg
pub fn save_parlays_to_csv(parlays: &[Parlay], filename: impl AsRef<Path>) -> Result<()> {
    let mut writer = csv::Writer::from_path(filename).context("Failed to create CSV file")?;

    writer.write_record([
        "Parlay",
        "Risk",
        "Combined Confidence (%)",
        "Payout on $100",
        "Leg",
        "Pick",
        "Moneyline",
    ])?;

    for parlay in parlays {
        for (i, pick) in parlay.picks.iter().enumerate() {
            writer.write_record([
                parlay.tier.label().to_string(),
                parlay.tier.risk_level().to_string(),
                format!("{:.1}", parlay.combined_confidence * 100.0),
                parlay.estimated_payout.to_string(),
                (i + 1).to_string(),
                pick.favored_team.clone(),
                pick.moneyline.map(|ml| ml.to_string()).unwrap_or_default(),
            ])?;
        }
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}
